use std::fmt;
use std::path::Path;

use crate::workflow::{
    JobScheduler,
    Scheduler,
};


/// `launch.sh` of one chunk job.
pub struct LaunchScript<'a> {
    js:       &'a JobScheduler,
    job_name: String,
    folder:   &'a Path,
}


impl<'a> LaunchScript<'a> {
    pub fn new(js: &'a JobScheduler, job_name: String, folder: &'a Path) -> Self {
        Self { js, job_name, folder }
    }
}


/// Single-quotes `s` for POSIX shells.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}


impl<'a> fmt::Display for LaunchScript<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let js = self.js;
        writeln!(f, "#!/bin/bash")?;

        match js.get_free_format() {
            Some(header) => writeln!(f, "{}", header.trim_end())?,
            None => match js.get_scheduler() {
                Scheduler::Slurm => {
                    writeln!(f, "#SBATCH -J {}", self.job_name)?;
                    writeln!(f, "#SBATCH -N {}", js.get_nodes())?;
                    writeln!(f, "#SBATCH -n {}", js.get_nodes().saturating_mul(js.get_tasks()))?;
                    writeln!(f, "#SBATCH -t {}", js.get_wall_time())?;
                    if let Some(q) = js.get_queue_name() {
                        writeln!(f, "#SBATCH -p {}", q)?;
                    }
                },
                Scheduler::Pbs => {
                    writeln!(f, "#PBS -N {}", self.job_name)?;
                    writeln!(f, "#PBS -l nodes={}:ppn={}", js.get_nodes(), js.get_tasks())?;
                    writeln!(f, "#PBS -l walltime={}", js.get_wall_time())?;
                    if let Some(q) = js.get_queue_name() {
                        writeln!(f, "#PBS -q {}", q)?;
                    }
                },
            },
        }
        writeln!(f)?;

        let modules = js.get_load_modules().trim_end();
        if !modules.is_empty() {
            writeln!(f, "{}", modules)?;
            writeln!(f)?;
        }

        writeln!(f, "cd {}", shell_quote(&self.folder.to_string_lossy()))?;
        writeln!(f, "{}", js.get_run_command().trim())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(txt: &str) -> JobScheduler {
        serde_yaml::from_str(txt).unwrap()
    }

    #[test]
    fn test_slurm() {
        let js = scheduler(r#"
        scheduler: SLURM
        nodes: 2
        tasks: 24
        wall_time: "48:00:00"
        queue_name: normal
        load_modules: "source activate qmflows\nmodule load cp2k/3.0"
        "#);

        let script = LaunchScript::new(&js, "Cd33Se33_a".into(), Path::new("/work/chunk_a")).to_string();
        let expected = "\
#!/bin/bash
#SBATCH -J Cd33Se33_a
#SBATCH -N 2
#SBATCH -n 48
#SBATCH -t 48:00:00
#SBATCH -p normal

source activate qmflows
module load cp2k/3.0

cd '/work/chunk_a'
run_workflow.py -i input.yml
";
        assert_eq!(script, expected);
    }

    #[test]
    fn test_pbs() {
        let js = scheduler(r#"
        scheduler: pbs
        nodes: 1
        tasks: 16
        wall_time: "12:00:00"
        run_command: "python -m nac.workflows -i input.yml"
        "#);

        let script = LaunchScript::new(&js, "job".into(), Path::new("/it's/here")).to_string();
        let expected = "\
#!/bin/bash
#PBS -N job
#PBS -l nodes=1:ppn=16
#PBS -l walltime=12:00:00

cd '/it'\\''s/here'
python -m nac.workflows -i input.yml
";
        assert_eq!(script, expected);
    }

    #[test]
    fn test_free_format() {
        let js = scheduler(r#"
        free_format: |
            #SBATCH --account=chem
            #SBATCH --gres=gpu:1
        load_modules: module load cp2k
        "#);

        let script = LaunchScript::new(&js, "ignored".into(), Path::new("/w")).to_string();
        assert!(script.starts_with("#!/bin/bash\n#SBATCH --account=chem\n#SBATCH --gres=gpu:1\n\nmodule load cp2k\n"));
        assert!(!script.contains("ignored"));
    }
}
