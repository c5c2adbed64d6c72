use std::path::Path;
use std::io::IsTerminal;
use once_cell::sync::Lazy;
use std::sync::Mutex;

use shared::{
    anyhow::anyhow,
    Result,
    log::LevelFilter,
};
use log4rs::{
    append::{
        console::{
            ConsoleAppender,
            Target,
        },
        file::FileAppender,
    },
    config::{
        Appender,
        Config,
        Root,
    },
    encode::pattern::PatternEncoder,
    init_config,
    Handle,
};


const ENCODE_STR: &str = "{d(%Y-%m-%d %H:%M:%S)} [{h({l:>5})}] {m}{n}";


pub static HANDLE: Lazy<Mutex<Handle>> = Lazy::new(|| {
    // Falls back to stderr only if the global log file cannot be opened.
    let config = gen_logger_config(Option::<&Path>::None)
        .or_else(|_| stderr_only_config())
        .expect("Failed to build the logger config.");
    let handle = init_config(config).expect("A global logger has been set already.");
    Mutex::new(handle)
});


fn stderr_appender() -> ConsoleAppender {
    ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODE_STR)))
        .target(Target::Stderr)
        .build()
}


fn stderr_only_config() -> Result<Config> {
    Ok(Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender())))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))?)
}


/// Logs to stderr, to `./globalrun.log` when run from a terminal, and to `logfile` if given.
fn gen_logger_config(logfile: Option<impl AsRef<Path>>) -> Result<Config> {
    let level = LevelFilter::Info;
    let isatty = std::io::stderr().is_terminal();

    let global_log = if isatty {
        Some(FileAppender::builder()
             .encoder(Box::new(PatternEncoder::new(ENCODE_STR)))
             .build("./globalrun.log")?)
    } else {
        None
    };

    let logfile = logfile
        .map(|file_path| {
            FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(ENCODE_STR)))
                .build(file_path)
        })
        .transpose()?;

    // generate root for config.build()
    let root = Root::builder().appender("stderr");
    let root = if global_log.is_some() { root.appender("global_log") } else { root };
    let root = if logfile.is_some() { root.appender("logfile") } else { root };
    let root = root.build(level);

    let builder = Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr_appender())));
    let builder = if let Some(global_log) = global_log {
        builder.appender(Appender::builder().build("global_log", Box::new(global_log)))
    } else {
        builder
    };
    let builder = if let Some(logfile) = logfile {
        builder.appender(Appender::builder().build("logfile", Box::new(logfile)))
    } else {
        builder
    };

    Ok(builder.build(root)?)
}


pub fn logger_init() {
    Lazy::force(&HANDLE);
}


/// Adds the file `logfile` to the targets of the global logger.
pub fn logger_redirect(logfile: impl AsRef<Path>) -> Result<()> {
    let config = gen_logger_config(Some(logfile))?;
    HANDLE.lock()
        .map_err(|_| anyhow!("Logger handle poisoned."))?
        .set_config(config);
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logfile_config() {
        let dir = tempdir().unwrap();
        let logfile = dir.path().join("project.log");
        gen_logger_config(Some(&logfile)).unwrap();
        assert!(logfile.is_file());
        assert!(stderr_only_config().is_ok());
    }
}
