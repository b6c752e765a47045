use std::{
    fs::{self, File},
    io,
};

use tracing_subscriber::{
    fmt::{self},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use crate::config::{LoggerConfig, LoggerFormat};

pub fn init_logger(opts: LoggerConfig) -> io::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::new(opts.level.clone());

    let stdout_layer = match opts.format {
        LoggerFormat::Pretty => fmt::Layer::default().pretty().boxed(),
        LoggerFormat::Json => fmt::Layer::default().json().boxed(),
        LoggerFormat::Compact => fmt::Layer::default().compact().boxed(),
    };

    let file_layer = match opts.log_file {
        Some(log_file) => {
            if log_file.exists() {
                fs::remove_file(&log_file)?;
            }
            if let Some(parent) = log_file.parent() {
                fs::create_dir_all(parent)?;
            }
            let writer = File::create(log_file)?;
            Some(fmt::Layer::default().json().with_writer(writer))
        }
        None => None,
    };

    match file_layer {
        Some(file_layer) => Registry::default()
            .with(stdout_layer)
            .with(file_layer)
            .with(env_filter)
            .init(),
        None => Registry::default()
            .with(stdout_layer)
            .with(env_filter)
            .init(),
    }

    Ok(())
}
