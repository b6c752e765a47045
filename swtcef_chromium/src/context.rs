use log::{debug, info};

use crate::{app::Application, engine::Engine, main_args::MainArgs, settings::Settings};

/// Initialized engine. Dropping it shuts the engine down, so shutdown runs
/// exactly once for every successful initialize.
pub struct Context<'a, E: Engine + ?Sized> {
    engine: &'a E,
}

impl<'a, E: Engine + ?Sized> Context<'a, E> {
    pub fn initialize(
        engine: &'a E,
        args: &MainArgs,
        settings: &Settings,
        app: &Application,
    ) -> Result<Self, ContextError> {
        info!("Calling engine initialize");
        if !engine.initialize(args, settings, app) {
            return Err(ContextError::InitializeFailed);
        }
        Ok(Self { engine })
    }

    /// Blocks until something inside the engine requests termination.
    pub fn run_message_loop(&self) {
        info!("Running engine message loop");
        self.engine.run_message_loop();
        debug!("Engine message loop returned");
    }

    pub fn quit_message_loop(&self) {
        self.engine.quit_message_loop();
    }
}

impl<E: Engine + ?Sized> Drop for Context<'_, E> {
    fn drop(&mut self) {
        info!("Calling engine shutdown");
        self.engine.shutdown();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// This process ran a helper role to completion. The caller must exit
    /// with `exit_code`.
    SubprocessCompleted { exit_code: i32 },
    /// Browser process: initialized, ran its message loop and shut down.
    ShutDown,
}

/// Role check, then initialize, message loop and shutdown.
pub fn bootstrap<E: Engine + ?Sized>(
    engine: &E,
    args: &MainArgs,
    settings: &Settings,
    app: &Application,
) -> Result<BootstrapOutcome, ContextError> {
    let exit_code = engine.execute_process(args, app);
    if exit_code >= 0 {
        info!("Sub-process finished with exit code {exit_code}");
        return Ok(BootstrapOutcome::SubprocessCompleted { exit_code });
    }

    let context = Context::initialize(engine, args, settings, app)?;
    context.run_message_loop();
    drop(context);

    Ok(BootstrapOutcome::ShutDown)
}

/// Entry point of the helper executable: only the role check runs there.
pub fn run_helper<E: Engine + ?Sized>(engine: &E, args: &MainArgs, app: &Application) -> i32 {
    engine.execute_process(args, app)
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("Failed to initialize the engine")]
    InitializeFailed,
}
