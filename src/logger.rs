//! Module provides initialization of global application logger

use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use thiserror::Error;

const PATTERN: &str = "{d:<35} [thread \"{T}\" id {({I}]):<6} {l:<5} {t} >> {m}{n}";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("cannot open log file: {0}")]
    File(#[from] std::io::Error),

    #[error("wrong logger configuration: {0}")]
    Config(#[from] ConfigErrors),

    #[error("logger has already been initialized: {0}")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Initializes the global logger for an application.
///
/// Records are written to stdout and, if `directory` is given,
/// to a file in that directory named after the current time.
///
/// # Errors
/// An error is returned if the log file cannot be created
/// or if logger has already been initialized.
///
pub fn init(level: LevelFilter, directory: Option<&Path>) -> Result<Handle, LoggerError> {
    let encoder = Box::new(PatternEncoder::new(PATTERN));
    let stdout = ConsoleAppender::builder().encoder(encoder.clone()).build();

    let mut builder = Config::builder().appender(Appender::builder().build("stdout", Box::new(stdout)));
    let mut appenders = vec!["stdout"];
    if let Some(directory) = directory {
        let file = FileAppender::builder()
            .encoder(encoder)
            .build(file_name(directory))?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        appenders.push("file");
    }

    let config = builder.build(Root::builder().appenders(appenders).build(level))?;
    Ok(log4rs::init_config(config)?)
}

fn file_name(directory: &Path) -> PathBuf {
    let timestamp = Local::now()
        .to_rfc3339_opts(SecondsFormat::Nanos, true)
        .replace(':', "-");
    directory.join(format!("logfile_{}.log", timestamp))
}
