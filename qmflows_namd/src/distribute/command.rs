use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use shared::{
    log,
    Context,
    Result,
};

use crate::OptProcess;
use crate::core::NamdConfig;
use crate::distribute::Distributor;
use crate::logging::logger_redirect;
use crate::workflow::WorkflowConfig;


#[derive(Debug, Parser)]
/// Split the trajectory of a workflow into chunks and prepare one scheduler job per chunk.
///
/// Every chunk folder `chunk_<x>` holds its slice of the trajectory `chunk_xyz_<x>`, the workflow
/// input `input.yml` and the job script `launch.sh`.
pub struct DistributeCommand {
    #[arg(short='n', long, default_value_t=0)]
    /// Number of threads for writing the chunk folders.
    ///
    /// If 0 is set, it will fall back to the number of logic CPU cores of you machine.
    nthreads: usize,

    #[arg(short='i', long, default_value="input.yml", aliases=["cfg", "conf", "config"])]
    /// Workflow input in YAML format.
    ///
    /// Relative paths inside it are taken relative to its directory.
    input: PathBuf,

    #[arg(short='o', long, default_value=".")]
    /// Directory receiving the chunk folders.
    outdir: PathBuf,

    #[arg(long, value_enum, alias="gen")]
    /// Generate auxiliary files for the calculation.
    ///
    /// Nothing is distributed if this flag is set.
    ///
    /// Alias: "gen"
    generate: Option<TemplateGenerator>,
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum TemplateGenerator {
    #[value(aliases=["config", "cfg", "conf"])]
    /// Generate a workflow input template. Aliases: "config", "cfg", "conf".
    ConfigTemplate,
}


/// Absolute directory holding `input`, against which its relative paths are resolved.
fn input_base_dir(input: &Path) -> Result<PathBuf> {
    let base = match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(base)
        .with_context(|| format!("Failed to locate directory of {:?}.", input))
}


impl OptProcess for DistributeCommand {
    fn process(&self) -> Result<()> {
        use TemplateGenerator::*;

        if let Some(g) = self.generate {
            return match g {
                ConfigTemplate => {
                    let fname = "input_template.yml";
                    log::info!("Writing workflow input template to {:?} ...", fname);
                    WorkflowConfig::default().to_file(fname)
                },
            }
        }

        rayon::ThreadPoolBuilder::new().num_threads(self.nthreads).build_global()?;

        let mut cfg = WorkflowConfig::from_file(&self.input)?;
        cfg.resolve_paths(&input_base_dir(&self.input)?);

        fs::create_dir_all(&self.outdir)
            .with_context(|| format!("Failed to create output directory {:?}.", self.outdir))?;
        let logfile = self.outdir.join(format!("{}.log", cfg.get_project_name()));
        logger_redirect(&logfile)?;
        log::info!("Logging redirected to {:?} as well.", logfile);
        log::info!("Workflow input read from {:?}:\n{}", self.input, cfg);

        let folders = Distributor::from_config(&cfg)?.run(&self.outdir)?;
        log::info!("{} chunk folders ready, submit `launch.sh` in each of them.", folders.len());

        Ok(())
    }
}
