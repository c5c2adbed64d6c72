use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use shared::{
    anyhow::{anyhow, Error},
    ensure,
    log,
    Context,
    Result,
};

use crate::core::{
    NamdConfig,
    DEFAULT_HDF5_NAME,
};
use crate::distribute::Chunk;
use crate::workflow::{
    Cp2kGeneralSettings,
    JobScheduler,
};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Workflow {
    DerivativeCouplings,
    AbsorptionSpectrum,
    SinglePoints,
    DistributeDerivativeCouplings,
    DistributeAbsorptionSpectrum,
    DistributeSinglePoints,
}

serde_via_str!(Workflow);


impl Workflow {
    pub fn is_distributed(self) -> bool {
        use Workflow::*;
        matches!(self, DistributeDerivativeCouplings | DistributeAbsorptionSpectrum | DistributeSinglePoints)
    }

    /// The workflow each chunk runs, i.e. without the `distribute_` prefix.
    pub fn undistributed(self) -> Self {
        use Workflow::*;
        match self {
            DistributeDerivativeCouplings => DerivativeCouplings,
            DistributeAbsorptionSpectrum  => AbsorptionSpectrum,
            DistributeSinglePoints        => SinglePoints,
            w => w,
        }
    }
}


impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Workflow::*;
        write!(f, "{}", match self {
            DerivativeCouplings           => "derivative_couplings",
            AbsorptionSpectrum            => "absorption_spectrum",
            SinglePoints                  => "single_points",
            DistributeDerivativeCouplings => "distribute_derivative_couplings",
            DistributeAbsorptionSpectrum  => "distribute_absorption_spectrum",
            DistributeSinglePoints        => "distribute_single_points",
        })
    }
}


impl FromStr for Workflow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        use Workflow::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "derivative_couplings"            => Ok(DerivativeCouplings),
            "absorption_spectrum"             => Ok(AbsorptionSpectrum),
            "single_points"                   => Ok(SinglePoints),
            "distribute_derivative_couplings" => Ok(DistributeDerivativeCouplings),
            "distribute_absorption_spectrum"  => Ok(DistributeAbsorptionSpectrum),
            "distribute_single_points"        => Ok(DistributeSinglePoints),
            _ => Err(anyhow!("Invalid workflow from input: {}, available workflows: \
                              [distribute_]derivative_couplings, [distribute_]absorption_spectrum, \
                              [distribute_]single_points", s)),
        }
    }
}


/// Algorithm of the external worker to turn overlaps into couplings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    Levine,
    ThreePoints,
}

serde_via_str!(Algorithm);


impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Algorithm::Levine      => "levine",
            Algorithm::ThreePoints => "3points",
        })
    }
}


impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "levine"  => Ok(Algorithm::Levine),
            "3points" => Ok(Algorithm::ThreePoints),
            _ => Err(anyhow!("Invalid algorithm from input: {}, available algorithms: levine, 3points", s)),
        }
    }
}


/// Points of the trajectory where a fresh wavefunction guess is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessStrategy {
    First,
    All,
}

serde_via_str!(GuessStrategy);


impl fmt::Display for GuessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            GuessStrategy::First => "first",
            GuessStrategy::All   => "all",
        })
    }
}


impl FromStr for GuessStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(GuessStrategy::First),
            "all"   => Ok(GuessStrategy::All),
            _ => Err(anyhow!("Invalid calculate_guesses from input: {}, available: first, all", s)),
        }
    }
}


#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WorkflowConfig {
    workflow: Workflow,

    project_name: String,

    /// Integration time step of the MD trajectory, in femtoseconds.
    #[serde(default = "WorkflowConfig::default_dt")]
    dt: f64,

    /// `[occupied, virtual]` orbitals around the Fermi level.
    #[serde(default = "WorkflowConfig::default_active_space")]
    active_space: [usize; 2],

    #[serde(default)]
    algorithm: Algorithm,

    #[serde(default = "WorkflowConfig::default_tracking")]
    tracking: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    path_hdf5: Option<PathBuf>,

    path_traj_xyz: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    scratch_path: Option<PathBuf>,

    #[serde(default = "WorkflowConfig::default_workdir")]
    workdir: PathBuf,

    #[serde(default = "WorkflowConfig::default_blocks")]
    blocks: usize,

    #[serde(default)]
    write_overlaps: bool,

    #[serde(default)]
    overlaps_deph: bool,

    /// Index of the first geometry, used to label the entries of the HDF5 store.
    #[serde(default)]
    enumerate_from: usize,

    #[serde(default = "WorkflowConfig::default_calculate_guesses")]
    calculate_guesses: Option<GuessStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    job_scheduler: Option<JobScheduler>,

    cp2k_general_settings: Cp2kGeneralSettings,

    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}


impl WorkflowConfig {
    fn default_dt() -> f64 { 1.0 }
    fn default_active_space() -> [usize; 2] { [10, 10] }
    fn default_tracking() -> bool { true }
    fn default_workdir() -> PathBuf { PathBuf::from(".") }
    fn default_blocks() -> usize { 1 }
    fn default_calculate_guesses() -> Option<GuessStrategy> { Some(GuessStrategy::First) }


    pub fn check_config(&self) -> Result<()> {
        let mut errors = vec![];

        if self.project_name.trim().is_empty() {
            errors.push("Field 'project_name' cannot be empty.".to_string());
        }

        if self.project_name.contains('/') {
            errors.push("Field 'project_name' cannot contain '/', it names a group of the HDF5 store.".to_string());
        }

        if !(self.dt.is_finite() && self.dt > 0.0) {
            errors.push(format!("Field 'dt' = {} must be positive.", self.dt));
        }

        if self.active_space.contains(&0) {
            errors.push(format!("Field 'active_space' = {:?} must hold at least one occupied and one virtual orbital.",
                    self.active_space));
        }

        if self.blocks == 0 {
            errors.push("Field 'blocks' cannot be 0.".to_string());
        }

        if self.path_traj_xyz.as_os_str().is_empty() {
            errors.push("Field 'path_traj_xyz' cannot be empty.".to_string());
        }

        if let Some(js) = self.job_scheduler.as_ref() {
            js.check(&mut errors);
        }

        self.cp2k_general_settings.check(&mut errors);

        ensure!(errors.is_empty(), "Invalid workflow config:\n    {}", errors.join("\n    "));
        Ok(())
    }


    /// Keys this tool does not interpret, passed through to the chunk inputs as they are.
    pub fn unknown_keys(&self) -> Vec<String> {
        let top = self.extra.keys().cloned();
        let cp2k = self.cp2k_general_settings.get_extra().keys()
            .map(|k| format!("cp2k_general_settings.{}", k));
        top.chain(cp2k).collect()
    }


    /// Fills in `scratch_path` and `path_hdf5` if absent and makes every path absolute with
    /// respect to `base`, usually the directory holding the config file.
    pub fn resolve_paths(&mut self, base: &Path) {
        let absolutize = |p: &Path| if p.is_relative() { base.join(p) } else { p.to_path_buf() };

        let scratch = match self.scratch_path.as_ref() {
            Some(p) => absolutize(p),
            None => {
                let user = env::var("USER")
                    .or_else(|_| env::var("USERNAME"))
                    .unwrap_or_else(|_| String::from("unknown"));
                let p = env::temp_dir().join(user).join(&self.project_name);
                log::warn!("path to scratch was not defined, using: {:?}", p);
                p
            },
        };

        let path_hdf5 = match self.path_hdf5.as_ref() {
            Some(p) => absolutize(p),
            None => {
                let p = scratch.join(DEFAULT_HDF5_NAME);
                log::warn!("path to the HDF5 was not defined, using: {:?}", p);
                p
            },
        };

        self.scratch_path  = Some(scratch);
        self.path_hdf5     = Some(path_hdf5);
        self.path_traj_xyz = absolutize(&self.path_traj_xyz);
        self.workdir       = absolutize(&self.workdir);
        self.cp2k_general_settings.absolutize(base);
    }


    /// Geometry indices, counted from `enumerate_from`, that get a new wavefunction guess.
    pub fn guess_points(&self, nframes: usize) -> Vec<usize> {
        match self.calculate_guesses {
            None => vec![],
            Some(GuessStrategy::First) => vec![self.enumerate_from],
            Some(GuessStrategy::All) => (self.enumerate_from .. self.enumerate_from + nframes).collect(),
        }
    }


    /// HDF5 store written by the job of chunk `suffix`, next to the global store.
    pub fn chunk_hdf5(&self, suffix: &str) -> Result<PathBuf> {
        let path = self.path_hdf5.as_ref()
            .context("Field 'path_hdf5' not resolved, call `resolve_paths` first.")?;
        let stem = path.file_stem()
            .with_context(|| format!("Field 'path_hdf5' = {:?} has no file name.", path))?
            .to_string_lossy();
        let ext = path.extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("hdf5"));

        Ok(path.with_file_name(format!("{}_chunk_{}.{}", stem, suffix, ext)))
    }


    /// The input of a single chunk job living in `folder`.
    pub fn for_chunk(&self, chunk: &Chunk, folder: &Path) -> Result<Self> {
        let scratch = self.scratch_path.as_ref()
            .context("Field 'scratch_path' not resolved, call `resolve_paths` first.")?;

        let mut cfg = self.clone();
        cfg.workflow       = self.workflow.undistributed();
        cfg.path_traj_xyz  = folder.join(chunk.xyz_name());
        cfg.path_hdf5      = Some(self.chunk_hdf5(chunk.get_suffix())?);
        cfg.scratch_path   = Some(scratch.join(chunk.folder_name()));
        cfg.workdir        = folder.to_path_buf();
        cfg.enumerate_from = self.enumerate_from + chunk.get_range().start;
        cfg.blocks         = 1;

        Ok(cfg)
    }


    pub fn get_workflow(&self) -> Workflow { self.workflow }
    pub fn get_project_name(&self) -> &str { &self.project_name }
    pub fn get_dt(&self) -> f64 { self.dt }
    pub fn get_active_space(&self) -> [usize; 2] { self.active_space }
    pub fn get_algorithm(&self) -> Algorithm { self.algorithm }
    pub fn get_tracking(&self) -> bool { self.tracking }
    pub fn get_path_hdf5(&self) -> Option<&Path> { self.path_hdf5.as_deref() }
    pub fn get_path_traj_xyz(&self) -> &Path { &self.path_traj_xyz }
    pub fn get_scratch_path(&self) -> Option<&Path> { self.scratch_path.as_deref() }
    pub fn get_workdir(&self) -> &Path { &self.workdir }
    pub fn get_blocks(&self) -> usize { self.blocks }
    pub fn get_write_overlaps(&self) -> bool { self.write_overlaps }
    pub fn get_overlaps_deph(&self) -> bool { self.overlaps_deph }
    pub fn get_enumerate_from(&self) -> usize { self.enumerate_from }
    pub fn get_calculate_guesses(&self) -> Option<GuessStrategy> { self.calculate_guesses }
    pub fn get_job_scheduler(&self) -> Option<&JobScheduler> { self.job_scheduler.as_ref() }
    pub fn get_cp2k_general_settings(&self) -> &Cp2kGeneralSettings { &self.cp2k_general_settings }
    pub fn get_extra(&self) -> &BTreeMap<String, Value> { &self.extra }
}


impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            workflow: Workflow::DistributeDerivativeCouplings,
            project_name: String::from("Cd33Se33"),
            dt: Self::default_dt(),
            active_space: Self::default_active_space(),
            algorithm: Algorithm::Levine,
            tracking: false,
            path_hdf5: Some(PathBuf::from("Cd33Se33.hdf5")),
            path_traj_xyz: PathBuf::from("Cd33Se33_trajectory.xyz"),
            scratch_path: Some(PathBuf::from("/tmp/namd")),
            workdir: Self::default_workdir(),
            blocks: 5,
            write_overlaps: false,
            overlaps_deph: false,
            enumerate_from: 0,
            calculate_guesses: Self::default_calculate_guesses(),
            job_scheduler: Some(JobScheduler::default()),
            cp2k_general_settings: Cp2kGeneralSettings::default(),
            extra: BTreeMap::new(),
        }
    }
}


impl fmt::Display for WorkflowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |p: Option<&PathBuf>| p.map(|p| format!("{:?}", p)).unwrap_or_else(|| String::from("(default)"));
        let guesses = self.calculate_guesses.map(|g| g.to_string()).unwrap_or_else(|| String::from("none"));

        writeln!(f, "####         QMFlows-NAMD workflow input         ####")?;
        writeln!(f)?;

        writeln!(f, " {:>24} = {}",   "workflow",       self.workflow)?;
        writeln!(f, " {:>24} = {:?}", "project_name",   self.project_name)?;
        writeln!(f, " {:>24} = {}",   "dt",             self.dt)?;
        writeln!(f, " {:>24} = {:?}", "active_space",   self.active_space)?;
        writeln!(f, " {:>24} = {}",   "algorithm",      self.algorithm)?;
        writeln!(f, " {:>24} = {}",   "tracking",       self.tracking)?;
        writeln!(f, " {:>24} = {}",   "path_hdf5",      opt(self.path_hdf5.as_ref()))?;
        writeln!(f, " {:>24} = {:?}", "path_traj_xyz",  self.path_traj_xyz)?;
        writeln!(f, " {:>24} = {}",   "scratch_path",   opt(self.scratch_path.as_ref()))?;
        writeln!(f, " {:>24} = {:?}", "workdir",        self.workdir)?;
        writeln!(f, " {:>24} = {}",   "blocks",         self.blocks)?;
        writeln!(f, " {:>24} = {}",   "write_overlaps", self.write_overlaps)?;
        writeln!(f, " {:>24} = {}",   "overlaps_deph",  self.overlaps_deph)?;
        writeln!(f, " {:>24} = {}",   "enumerate_from", self.enumerate_from)?;
        writeln!(f, " {:>24} = {}",   "calculate_guesses", guesses)?;

        for (k, v) in self.extra.iter() {
            let v = serde_yaml::to_string(v).unwrap_or_default();
            writeln!(f, " {:>24} = {}", k, v.trim())?;
        }

        if let Some(js) = self.job_scheduler.as_ref() {
            writeln!(f, " job_scheduler:")?;
            write!(f, "{}", js)?;
        }

        writeln!(f, " cp2k_general_settings:")?;
        write!(f, "{}", self.cp2k_general_settings)?;

        Ok(())
    }
}


impl NamdConfig for WorkflowConfig {
    fn from_file<P>(fname: P) -> Result<Self>
    where P: AsRef<Path> {
        let fname = fname.as_ref();
        ensure!(fname.is_file(), "Config file {:?} for WorkflowConfig not available.", fname);
        let raw = fs::read_to_string(fname)?;
        let cfg = serde_yaml::from_str::<Self>(&raw)
            .with_context(|| format!("Failed to parse {:?} as workflow input.", fname))?;
        cfg.check_config()
            .with_context(|| format!("Config file {:?} rejected.", fname))?;
        for key in cfg.unknown_keys() {
            log::warn!("Unknown key {:?} in {:?} is passed through to the chunk inputs unchecked.", key, fname);
        }
        Ok(cfg)
    }

    fn to_file<P>(&self, fname: P) -> Result<()>
    where P: AsRef<Path> {
        if fname.as_ref().is_file() {
            log::warn!("File {:?} exists, overwriting ...", fname.as_ref());
        }
        let raw = serde_yaml::to_string(self)?;
        fs::write(fname.as_ref(), raw)
            .with_context(|| format!("Failed to write workflow input to {:?}.", fname.as_ref()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TUTORIAL_INPUT: &str = r#"
workflow:
  distribute_derivative_couplings

project_name: Cd33Se33
dt: 1
active_space: [10, 10]
algorithm: "levine"
tracking: false
path_hdf5: "Cd33Se33.hdf5"
path_traj_xyz: "Cd33Se33_fivePoints.xyz"
scratch_path: "/tmp/namd"
workdir: "."
blocks: 5
write_overlaps: true
overlaps_deph: false

job_scheduler:
  scheduler: SLURM
  nodes: 1
  tasks: 24
  wall_time: "24:00:00"
  load_modules: "source activate qmflows\nmodule load cp2k/3.0"

cp2k_general_settings:
  basis:  "DZVP-MOLOPT-SR-GTH"
  potential: "GTH-PBE"
  cell_parameters: 28.0
  periodic: none
  executable: cp2k.popt

  cp2k_settings_main:
    specific:
      template: pbe_main

  cp2k_settings_guess:
    specific:
      template:
        pbe_guess
"#;

    #[test]
    fn test_deserialize() {
        let cfg: WorkflowConfig = serde_yaml::from_str(TUTORIAL_INPUT).unwrap();
        cfg.check_config().unwrap();

        assert_eq!(cfg.get_workflow(), Workflow::DistributeDerivativeCouplings);
        assert_eq!(cfg.get_project_name(), "Cd33Se33");
        assert_eq!(cfg.get_dt(), 1.0);
        assert_eq!(cfg.get_active_space(), [10, 10]);
        assert_eq!(cfg.get_algorithm(), Algorithm::Levine);
        assert!(!cfg.get_tracking());
        assert_eq!(cfg.get_path_hdf5(), Some(Path::new("Cd33Se33.hdf5")));
        assert_eq!(cfg.get_blocks(), 5);
        assert!(cfg.get_write_overlaps());
        assert!(!cfg.get_overlaps_deph());
        assert_eq!(cfg.get_enumerate_from(), 0);
        assert_eq!(cfg.get_calculate_guesses(), Some(GuessStrategy::First));
        assert!(cfg.get_extra().is_empty());

        let js = cfg.get_job_scheduler().unwrap();
        assert_eq!(js.get_tasks(), 24);
        assert_eq!(js.get_load_modules(), "source activate qmflows\nmodule load cp2k/3.0");

        let cp2k = cfg.get_cp2k_general_settings();
        assert_eq!(cp2k.get_cell_parameters(), Some(&Value::from(28.0)));
        assert_eq!(cp2k.get_extra().get("executable"), Some(&Value::from("cp2k.popt")));
        assert_eq!(cp2k.get_cp2k_settings_guess().unwrap()["specific"]["template"], Value::from("pbe_guess"));
    }

    #[test]
    fn test_keywords() {
        assert_eq!("3Points".parse::<Algorithm>().unwrap(), Algorithm::ThreePoints);
        assert!("hammes-schiffer".parse::<Algorithm>().is_err());
        assert_eq!("ALL".parse::<GuessStrategy>().unwrap(), GuessStrategy::All);
        assert_eq!("Absorption_Spectrum".parse::<Workflow>().unwrap(), Workflow::AbsorptionSpectrum);
        assert!("ipr".parse::<Workflow>().is_err());

        assert!(Workflow::DistributeSinglePoints.is_distributed());
        assert!(!Workflow::SinglePoints.is_distributed());
        assert_eq!(Workflow::DistributeAbsorptionSpectrum.undistributed(), Workflow::AbsorptionSpectrum);
        assert_eq!(Workflow::DerivativeCouplings.undistributed(), Workflow::DerivativeCouplings);

        let txt = TUTORIAL_INPUT.replace("\"levine\"", "warp");
        assert!(serde_yaml::from_str::<WorkflowConfig>(&txt).is_err());
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let txt = format!("{}\ngeometry_units: angstrom\nmpi: true\n", TUTORIAL_INPUT);
        let cfg: WorkflowConfig = serde_yaml::from_str(&txt).unwrap();
        assert_eq!(cfg.get_extra().get("geometry_units"), Some(&Value::from("angstrom")));
        assert_eq!(cfg.get_extra().get("mpi"), Some(&Value::from(true)));

        let reread: WorkflowConfig = serde_yaml::from_str(&serde_yaml::to_string(&cfg).unwrap()).unwrap();
        assert_eq!(cfg, reread);
    }

    #[test]
    fn test_unknown_keys_reported() {
        let cfg: WorkflowConfig = serde_yaml::from_str(TUTORIAL_INPUT).unwrap();
        assert_eq!(cfg.unknown_keys(), vec!["cp2k_general_settings.executable".to_string()]);

        let txt = format!("{}\nblock: 5\n", TUTORIAL_INPUT);
        let cfg: WorkflowConfig = serde_yaml::from_str(&txt).unwrap();
        assert_eq!(cfg.get_blocks(), 5);
        assert!(cfg.unknown_keys().contains(&"block".to_string()));

        let txt = TUTORIAL_INPUT.replace("  wall_time:", "  walltime:");
        let err = serde_yaml::from_str::<WorkflowConfig>(&txt).unwrap_err();
        assert!(err.to_string().contains("walltime"));
    }

    #[test]
    fn test_check_config() {
        let mut cfg: WorkflowConfig = serde_yaml::from_str(TUTORIAL_INPUT).unwrap();
        cfg.blocks = 0;
        cfg.dt = -1.0;
        cfg.active_space = [0, 10];
        cfg.project_name = String::from("a/b");

        let msg = format!("{}", cfg.check_config().unwrap_err());
        assert!(msg.contains("'blocks'"));
        assert!(msg.contains("'dt'"));
        assert!(msg.contains("'active_space'"));
        assert!(msg.contains("'project_name'"));
    }

    #[test]
    fn test_template_round_trip() {
        let dir = tempdir().unwrap();
        let fname = dir.path().join("input_template.yml");

        let cfg = WorkflowConfig::default();
        cfg.to_file(&fname).unwrap();
        let reread = WorkflowConfig::from_file(&fname).unwrap();
        assert_eq!(cfg, reread);

        assert!(WorkflowConfig::from_file(dir.path().join("missing.yml")).is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let txt = r#"
workflow: derivative_couplings
project_name: ethylene
path_traj_xyz: traj/ethylene.xyz
cp2k_general_settings:
  path_basis: BASIS_MOLOPT
"#;
        let mut cfg: WorkflowConfig = serde_yaml::from_str(txt).unwrap();
        assert_eq!(cfg.get_path_hdf5(), None);
        assert_eq!(cfg.get_scratch_path(), None);
        assert_eq!(cfg.get_algorithm(), Algorithm::Levine);
        assert!(cfg.get_tracking());

        cfg.resolve_paths(Path::new("/work"));
        let scratch = cfg.get_scratch_path().unwrap().to_path_buf();
        assert!(scratch.ends_with("ethylene"));
        assert!(scratch.is_absolute());
        assert_eq!(cfg.get_path_hdf5(), Some(scratch.join(DEFAULT_HDF5_NAME).as_path()));
        assert_eq!(cfg.get_path_traj_xyz(), Path::new("/work/traj/ethylene.xyz"));
        assert_eq!(cfg.get_workdir(), Path::new("/work/."));
        assert_eq!(cfg.get_cp2k_general_settings().get_path_basis(), Some(Path::new("/work/BASIS_MOLOPT")));

        assert_eq!(cfg.chunk_hdf5("b").unwrap(), scratch.join("quantum_chunk_b.hdf5"));
    }

    #[test]
    fn test_guess_points() {
        let mut cfg: WorkflowConfig = serde_yaml::from_str(TUTORIAL_INPUT).unwrap();
        cfg.enumerate_from = 4;
        assert_eq!(cfg.guess_points(3), vec![4]);

        cfg.calculate_guesses = Some(GuessStrategy::All);
        assert_eq!(cfg.guess_points(3), vec![4, 5, 6]);

        let txt = format!("{}\ncalculate_guesses: null\n", TUTORIAL_INPUT);
        let cfg: WorkflowConfig = serde_yaml::from_str(&txt).unwrap();
        assert_eq!(cfg.get_calculate_guesses(), None);
        assert!(cfg.guess_points(3).is_empty());
    }

    #[test]
    fn test_for_chunk() {
        let mut cfg: WorkflowConfig = serde_yaml::from_str(TUTORIAL_INPUT).unwrap();
        cfg.enumerate_from = 100;
        assert!(cfg.chunk_hdf5("a").is_ok());

        let chunk = Chunk::new(1, 1, 3 .. 6);
        assert!(cfg.clone().for_chunk(&chunk, Path::new("/tmp")).is_ok());

        cfg.scratch_path = None;
        assert!(cfg.for_chunk(&chunk, Path::new("/tmp")).is_err());

        cfg.resolve_paths(Path::new("/work"));
        let folder = Path::new("/work/chunk_b");
        let sub = cfg.for_chunk(&chunk, folder).unwrap();

        assert_eq!(sub.get_workflow(), Workflow::DerivativeCouplings);
        assert_eq!(sub.get_path_traj_xyz(), folder.join("chunk_xyz_b"));
        assert_eq!(sub.get_path_hdf5(), Some(Path::new("/work/Cd33Se33_chunk_b.hdf5")));
        assert_eq!(sub.get_workdir(), folder);
        assert_eq!(sub.get_enumerate_from(), 103);
        assert_eq!(sub.get_blocks(), 1);
        assert_eq!(sub.get_project_name(), cfg.get_project_name());
        assert_eq!(sub.get_cp2k_general_settings(), cfg.get_cp2k_general_settings());
        assert!(sub.get_scratch_path().unwrap().ends_with("chunk_b"));
    }
}
