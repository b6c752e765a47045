use anyhow::anyhow;
use app::App;
use swtcef_chromium::cef;

mod app;

// Sub-process executable spawned by the engine, lives next to the engine
// library in the extracted natives.
fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let current_exe = std::env::current_exe()?;
    let library_dir = current_exe
        .parent()
        .ok_or_else(|| anyhow!("Helper executable has no parent directory"))?;

    let engine = cef::NativeEngine::load(library_dir)?;
    let args = cef::MainArgs::from_env()?;
    let exit_code = cef::run_helper(&engine, &args, &cef::Application::new(App));
    std::process::exit(exit_code);
}
