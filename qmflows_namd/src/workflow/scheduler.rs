use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use shared::{
    anyhow::{anyhow, Error},
    Regex,
};

use crate::core::DEFAULT_RUN_COMMAND;


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scheduler {
    #[default]
    Slurm,
    Pbs,
}

serde_via_str!(Scheduler);


impl fmt::Display for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Scheduler::*;
        write!(f, "{}", match self {
            Slurm => "SLURM",
            Pbs   => "PBS",
        })
    }
}


impl FromStr for Scheduler {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slurm" => Ok(Scheduler::Slurm),
            "pbs"   => Ok(Scheduler::Pbs),
            _ => Err(anyhow!("Invalid scheduler from input: {}, available schedulers: SLURM, PBS", s)),
        }
    }
}


/// Resources requested for every chunk job.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JobScheduler {
    #[serde(default)]
    scheduler: Scheduler,

    #[serde(default = "JobScheduler::default_nodes")]
    nodes: usize,

    /// Tasks per node.
    #[serde(default = "JobScheduler::default_tasks")]
    tasks: usize,

    #[serde(default = "JobScheduler::default_wall_time")]
    wall_time: String,

    /// Shell lines executed before the workflow, e.g. `module load cp2k`.
    #[serde(default)]
    load_modules: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    queue_name: Option<String>,

    /// Falls back to the project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    job_name: Option<String>,

    /// Replaces the generated scheduler header entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    free_format: Option<String>,

    #[serde(default = "JobScheduler::default_run_command")]
    run_command: String,
}


static WALL_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+-)?\d+(:\d{1,2}){0,2}$").unwrap()
});


impl JobScheduler {
    fn default_nodes() -> usize { 1 }
    fn default_tasks() -> usize { 1 }
    fn default_wall_time() -> String { String::from("24:00:00") }
    fn default_run_command() -> String { String::from(DEFAULT_RUN_COMMAND) }


    /// Appends a message for every invalid field to `errors`.
    pub fn check(&self, errors: &mut Vec<String>) {
        if self.nodes == 0 {
            errors.push("Field 'job_scheduler.nodes' cannot be 0.".into());
        }

        if self.tasks == 0 {
            errors.push("Field 'job_scheduler.tasks' cannot be 0.".into());
        }

        if self.nodes.checked_mul(self.tasks).is_none() {
            errors.push(format!("Fields 'job_scheduler.nodes' = {} and 'job_scheduler.tasks' = {} \
                                request too many tasks.", self.nodes, self.tasks));
        }

        if !WALL_TIME_RE.is_match(self.wall_time.trim()) {
            errors.push(format!("Field 'job_scheduler.wall_time' = {:?} is not of form [D-]HH[:MM[:SS]].", self.wall_time));
        }

        if self.run_command.trim().is_empty() {
            errors.push("Field 'job_scheduler.run_command' cannot be empty.".into());
        }
    }


    pub fn get_scheduler(&self) -> Scheduler { self.scheduler }
    pub fn get_nodes(&self) -> usize { self.nodes }
    pub fn get_tasks(&self) -> usize { self.tasks }
    pub fn get_wall_time(&self) -> &str { self.wall_time.trim() }
    pub fn get_load_modules(&self) -> &str { &self.load_modules }
    pub fn get_queue_name(&self) -> Option<&str> { self.queue_name.as_deref() }
    pub fn get_job_name(&self) -> Option<&str> { self.job_name.as_deref() }
    pub fn get_free_format(&self) -> Option<&str> { self.free_format.as_deref() }
    pub fn get_run_command(&self) -> &str { &self.run_command }
}


impl Default for JobScheduler {
    fn default() -> Self {
        Self {
            scheduler: Scheduler::Slurm,
            nodes: 1,
            tasks: 24,
            wall_time: Self::default_wall_time(),
            load_modules: String::from("source activate qmflows\nmodule load cp2k"),
            queue_name: None,
            job_name: None,
            free_format: None,
            run_command: Self::default_run_command(),
        }
    }
}


impl fmt::Display for JobScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " {:>24} = {}",   "scheduler",    self.scheduler)?;
        writeln!(f, " {:>24} = {}",   "nodes",        self.nodes)?;
        writeln!(f, " {:>24} = {}",   "tasks",        self.tasks)?;
        writeln!(f, " {:>24} = {:?}", "wall_time",    self.wall_time)?;
        writeln!(f, " {:>24} = {:?}", "load_modules", self.load_modules)?;
        if let Some(q) = self.queue_name.as_ref() {
            writeln!(f, " {:>24} = {:?}", "queue_name", q)?;
        }
        if let Some(j) = self.job_name.as_ref() {
            writeln!(f, " {:>24} = {:?}", "job_name", j)?;
        }
        if let Some(ff) = self.free_format.as_ref() {
            writeln!(f, " {:>24} = {:?}", "free_format", ff)?;
        }
        writeln!(f, " {:>24} = {:?}", "run_command", self.run_command)?;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize() {
        let txt = r#"
        scheduler: pbs
        nodes: 2
        tasks: 32
        wall_time: "1-12:00:00"
        queue_name: short
        load_modules: |
            source activate qmflows
            module load cp2k/7.1
        "#;

        let js: JobScheduler = serde_yaml::from_str(txt).unwrap();
        assert_eq!(js.get_scheduler(), Scheduler::Pbs);
        assert_eq!(js.get_nodes(), 2);
        assert_eq!(js.get_tasks(), 32);
        assert_eq!(js.get_wall_time(), "1-12:00:00");
        assert_eq!(js.get_queue_name(), Some("short"));
        assert_eq!(js.get_job_name(), None);
        assert_eq!(js.get_load_modules(), "source activate qmflows\nmodule load cp2k/7.1\n");
        assert_eq!(js.get_run_command(), DEFAULT_RUN_COMMAND);

        let mut errors = vec![];
        js.check(&mut errors);
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_scheduler_keyword() {
        assert_eq!("SLURM".parse::<Scheduler>().unwrap(), Scheduler::Slurm);
        assert_eq!(" Pbs ".parse::<Scheduler>().unwrap(), Scheduler::Pbs);
        assert!("sge".parse::<Scheduler>().is_err());
        assert_eq!(serde_yaml::to_string(&Scheduler::Pbs).unwrap().trim(), "PBS");
    }

    #[test]
    fn test_check() {
        let txt = r#"
        nodes: 0
        wall_time: "one day"
        "#;
        let js: JobScheduler = serde_yaml::from_str(txt).unwrap();
        assert_eq!(js.get_scheduler(), Scheduler::Slurm);

        let mut errors = vec![];
        js.check(&mut errors);
        assert_eq!(errors.len(), 2);

        let js: JobScheduler = serde_yaml::from_str(&format!("nodes: {}\ntasks: 4\n", usize::MAX)).unwrap();
        let mut errors = vec![];
        js.check(&mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("too many tasks"));

        for ok in ["24:00:00", "30", "2:30", "3-00:00:00"] {
            assert!(WALL_TIME_RE.is_match(ok), "{}", ok);
        }
        for bad in ["", "24h", "1-", ":30", "1:2:3:4"] {
            assert!(!WALL_TIME_RE.is_match(bad), "{}", bad);
        }
    }


    #[test]
    fn test_misspelled_key_rejected() {
        let txt = r#"
        scheduler: SLURM
        walltime: "48:00:00"
        "#;
        let err = serde_yaml::from_str::<JobScheduler>(txt).unwrap_err();
        assert!(err.to_string().contains("walltime"));
    }
}
