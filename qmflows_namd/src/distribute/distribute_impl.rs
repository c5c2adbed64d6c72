use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use shared::{
    ensure,
    log,
    range_format,
    Context,
    Result,
    Trajectory,
};

use crate::cli::write_script;
use crate::core::{
    NamdConfig,
    CHUNK_INPUT_NAME,
    LAUNCH_SCRIPT_NAME,
};
use crate::distribute::{
    Chunk,
    ChunkPlan,
    LaunchScript,
};
use crate::workflow::WorkflowConfig;


/// Splits a workflow into independent chunk jobs.
pub struct Distributor {
    cfg:  WorkflowConfig,
    traj: Trajectory,
    plan: ChunkPlan,
}


impl Distributor {
    /// `cfg` is expected to have gone through [`WorkflowConfig::resolve_paths`].
    pub fn from_config(cfg: &WorkflowConfig) -> Result<Self> {
        ensure!(cfg.get_job_scheduler().is_some(),
            "Field 'job_scheduler' is required to distribute workflow {}.", cfg.get_workflow());
        ensure!(cfg.get_scratch_path().is_some() && cfg.get_path_hdf5().is_some(),
            "Paths of the workflow config are not resolved.");

        if !cfg.get_workflow().is_distributed() {
            log::warn!("Workflow {} is not a distribute_* workflow, splitting it anyway.", cfg.get_workflow());
        }

        let traj = Trajectory::from_file(cfg.get_path_traj_xyz())?;
        log::info!("Read {} geometries of {} atoms from {:?}.", traj.len(), traj.natoms(), cfg.get_path_traj_xyz());

        let plan = ChunkPlan::new(traj.len(), cfg.get_blocks())?;
        if plan.nchunks() < plan.get_blocks() {
            log::warn!("{} geometries fill only {} chunks of {} geometries, {} blocks were requested.",
                plan.get_nframes(), plan.nchunks(), plan.get_chunk_len(), plan.get_blocks());
        }

        Ok(Self {
            cfg: cfg.clone(),
            traj,
            plan,
        })
    }


    pub fn get_config(&self) -> &WorkflowConfig { &self.cfg }
    pub fn get_plan(&self) -> &ChunkPlan { &self.plan }


    /// Writes one folder per chunk into `outdir` and returns their paths, in chunk order.
    pub fn run<P>(&self, outdir: P) -> Result<Vec<PathBuf>>
    where P: AsRef<Path> {
        let outdir = outdir.as_ref();
        fs::create_dir_all(outdir)
            .with_context(|| format!("Failed to create output directory {:?}.", outdir))?;
        let outdir = fs::canonicalize(outdir)?;

        let folders = self.plan.get_chunks()
            .par_iter()
            .map(|chunk| self.write_chunk(chunk, &outdir))
            .collect::<Result<Vec<_>>>()?;

        self.report()?;
        Ok(folders)
    }


    fn write_chunk(&self, chunk: &Chunk, outdir: &Path) -> Result<PathBuf> {
        let folder = outdir.join(chunk.folder_name());
        if folder.is_dir() {
            log::warn!("Chunk folder {:?} exists, its files will be overwritten.", folder);
        }
        fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create chunk folder {:?}.", folder))?;

        self.traj.write_slice(chunk.get_range(), folder.join(chunk.xyz_name()))?;
        self.cfg.for_chunk(chunk, &folder)?
            .to_file(folder.join(CHUNK_INPUT_NAME))?;

        let js = self.cfg.get_job_scheduler()
            .context("Field 'job_scheduler' is required to write launch scripts.")?;
        let job_name = format!("{}_{}",
            js.get_job_name().unwrap_or(self.cfg.get_project_name()),
            chunk.get_suffix());
        let script = LaunchScript::new(js, job_name, &folder).to_string();
        write_script(folder.join(LAUNCH_SCRIPT_NAME), &script, true)?;

        let range = chunk.get_range();
        log::info!("Chunk {} with geometries {} .. {} written to {:?}.",
            chunk.get_suffix(), range.start, range.end, folder);

        Ok(folder)
    }


    /// Logs what is left to do once every chunk job has finished.
    fn report(&self) -> Result<()> {
        let offset = self.cfg.get_enumerate_from();

        for chunk in self.plan.get_chunks() {
            let sub = self.cfg.for_chunk(chunk, Path::new("."))?;
            let guesses = sub.guess_points(chunk.len());
            if !guesses.is_empty() {
                log::info!("Chunk {} computes wavefunction guesses at points {}.",
                    chunk.get_suffix(), range_format(&guesses));
            }
        }

        let seams = self.plan.seams().into_iter()
            .map(|i| i + offset)
            .collect::<Vec<_>>();
        if !seams.is_empty() {
            log::warn!("Overlaps {} join geometries of different chunks and are computed by no chunk, \
                       rerun the workflow on the merged store to fill them.", range_format(&seams));
        }

        let inputs = self.plan.get_chunks().iter()
            .map(|c| self.cfg.chunk_hdf5(c.get_suffix()).map(|p| format!("{:?}", p)))
            .collect::<Result<Vec<_>>>()?;
        let output = self.cfg.get_path_hdf5()
            .context("Field 'path_hdf5' not resolved.")?;
        log::info!("Once every chunk has finished, merge the stores with:\n    qmflows_namd merge -i {} -o {:?}",
            inputs.join(" "), output);
        log::info!("Then drop the couplings of the chunks before rerunning the workflow:\n    qmflows_namd remove -p {} --hdf5 {:?}",
            self.cfg.get_project_name(), output);

        Ok(())
    }
}
