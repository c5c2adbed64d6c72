use std::path::Path;
use std::fs;
use std::io::Write as _;
use std::sync::OnceLock;

use clap::{
    Parser,
    builder::styling::{
        AnsiColor,
        Effects,
        Styles,
    },
};

use shared::{log, Context, Result};
use crate::version::Version;
use crate::logging::logger_init;


pub fn get_style() -> Styles {
    static INSTANCE: OnceLock<Styles> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        Styles::styled()
            .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
            .usage(AnsiColor::Green.on_default()   | Effects::BOLD)
            .literal(AnsiColor::Green.on_default() | Effects::BOLD)
            .placeholder(AnsiColor::BrightBlue.on_default())
            .error(AnsiColor::BrightRed.on_default())
            .valid(AnsiColor::BrightYellow.on_default())
    }).to_owned()
}


pub trait OptProcess : Parser {
    fn process(&self) -> Result<()>;
}


#[derive(Debug, Parser)]
#[command(name = "qmflows_namd",
          about = Version::new().to_string(),
          long_about = format!("{:#}", Version::new()),
          version,
          styles = get_style())]
enum Opt {
    Distribute(crate::distribute::DistributeCommand),
    Merge(crate::store::MergeCommand),
    Remove(crate::store::RemoveCommand),
    Inspect(crate::store::InspectCommand),
}


impl OptProcess for Opt {
    fn process(&self) -> Result<()> {
        use Opt::*;

        logger_init();
        log::info!("Global logger initialized with targets being stderr and \"./globalrun.log\"");

        match self {
            Distribute(cmd) => cmd.process(),
            Merge(cmd) => cmd.process(),
            Remove(cmd) => cmd.process(),
            Inspect(cmd) => cmd.process(),
        }
    }
}


pub fn run() -> Result<()> {
    Opt::parse().process()
}


pub fn write_script<P>(fname: P, content: &str, with_exe_permission: bool) -> Result<()>
where P: AsRef<Path> {
    let fname = fname.as_ref();
    let mut f = fs::File::create(fname)
        .with_context(|| format!("Failed to create script {:?}.", fname))?;
    f.write_all(content.as_bytes())?;

    #[cfg(unix)]
    if with_exe_permission {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = f.metadata()?.permissions();
        perms.set_mode(0o755);
        f.set_permissions(perms)?;
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn test_cli() {
        Opt::command().debug_assert();

        let opt = Opt::try_parse_from(["qmflows_namd", "remove", "--pn", "Cd33Se33", "--HDF5", "quantum.hdf5", "-o"]).unwrap();
        assert!(matches!(opt, Opt::Remove(_)));

        let opt = Opt::try_parse_from(["qmflows_namd", "merge", "-i", "a.hdf5", "b.hdf5", "-o", "all.hdf5"]).unwrap();
        assert!(matches!(opt, Opt::Merge(_)));

        assert!(Opt::try_parse_from(["qmflows_namd", "merge", "-o", "all.hdf5"]).is_err());
        assert!(Opt::try_parse_from(["qmflows_namd", "distribute", "--gen", "config"]).is_ok());
    }

    #[test]
    fn test_write_script() {
        let dir = tempdir().unwrap();
        let fname = dir.path().join("launch.sh");
        write_script(&fname, "#!/bin/bash\necho hi\n", true).unwrap();
        assert_eq!(fs::read_to_string(&fname).unwrap(), "#!/bin/bash\necho hi\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            assert_eq!(fs::metadata(&fname).unwrap().permissions().mode() & 0o777, 0o755);
        }
    }
}
