use anyhow::{anyhow, Context};
use swtcef::{config::read_config, logger::init_logger};
use swtcef_chromium::cef;
use swtcef_natives::{open_bundle, NativeExpander};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = read_config().map_err(|err| anyhow!(err))?;
    init_logger(config.logger.clone()).context("Failed to initialize logger")?;

    let bundle = open_bundle(&config.resources_path).with_context(|| {
        format!(
            "Failed to open native resources at {}",
            config.resources_path.display()
        )
    })?;
    let installation = NativeExpander::new(bundle, &config.cache_root)
        .expand()
        .context("Failed to expand engine natives")?;
    info!(
        version = %installation.version,
        library_dir = %installation.library_dir.display(),
        "Engine natives ready"
    );

    let engine = cef::NativeEngine::load(&installation.library_dir)?;
    let args = cef::MainArgs::from_env()?;
    let settings = cef::Settings {
        log_severity: config.engine.log_severity,
        remote_debugging_port: config.engine.remote_debugging_port,
        ..cef::Settings::for_installation(&installation.library_dir)
    };
    let app = cef::Application::empty();

    match cef::bootstrap(&engine, &args, &settings, &app)? {
        cef::BootstrapOutcome::SubprocessCompleted { exit_code } => std::process::exit(exit_code),
        cef::BootstrapOutcome::ShutDown => info!("Engine shut down"),
    }

    Ok(())
}
