use std::{
    os::raw::c_int,
    path::{Path, PathBuf},
    ptr,
};

use libloading::Library;
use log::{debug, info};

use crate::{app::Application, main_args::MainArgs, settings::Settings};

/// Entry points of the engine's C API, in the order the lifecycle uses them.
pub trait Engine {
    /// Runs the process-role check. A non-negative value means this process
    /// was a helper sub-process, has already finished, and should exit with
    /// that code. A negative value means this is the browser process.
    fn execute_process(&self, args: &MainArgs, app: &Application) -> i32;

    /// Returns `true` when the engine is ready to run its message loop.
    fn initialize(&self, args: &MainArgs, settings: &Settings, app: &Application) -> bool;

    /// Blocks until the engine is asked to quit.
    fn run_message_loop(&self);

    fn quit_message_loop(&self);

    fn shutdown(&self);
}

#[cfg(target_os = "linux")]
const LIBRARY_FILE: &str = "libcef.so";
#[cfg(target_os = "windows")]
const LIBRARY_FILE: &str = "libcef.dll";
#[cfg(target_os = "macos")]
const LIBRARY_FILE: &str = "Chromium Embedded Framework.framework/Chromium Embedded Framework";

/// Engine shared library loaded from an explicit path.
///
/// Resolved entry points are plain function pointers, valid while `_library`
/// stays loaded.
pub struct NativeEngine {
    execute_process: chromium_sys::cef_execute_process_fn,
    initialize: chromium_sys::cef_initialize_fn,
    run_message_loop: chromium_sys::cef_run_message_loop_fn,
    quit_message_loop: chromium_sys::cef_quit_message_loop_fn,
    shutdown: chromium_sys::cef_shutdown_fn,
    path: PathBuf,
    _library: Library,
}

impl NativeEngine {
    /// Loads the engine from a directory produced by the natives expander.
    pub fn load(library_dir: &Path) -> Result<Self, EngineLoadError> {
        Self::load_library(&library_dir.join(LIBRARY_FILE))
    }

    pub fn load_library(path: &Path) -> Result<Self, EngineLoadError> {
        debug!("Loading engine library from {}", path.display());
        let library = unsafe { Library::new(path) }.map_err(|source| EngineLoadError::Library {
            path: path.to_path_buf(),
            source,
        })?;

        let engine = unsafe {
            Self {
                execute_process: symbol(&library, chromium_sys::CEF_EXECUTE_PROCESS_SYMBOL)?,
                initialize: symbol(&library, chromium_sys::CEF_INITIALIZE_SYMBOL)?,
                run_message_loop: symbol(&library, chromium_sys::CEF_RUN_MESSAGE_LOOP_SYMBOL)?,
                quit_message_loop: symbol(&library, chromium_sys::CEF_QUIT_MESSAGE_LOOP_SYMBOL)?,
                shutdown: symbol(&library, chromium_sys::CEF_SHUTDOWN_SYMBOL)?,
                path: path.to_path_buf(),
                _library: library,
            }
        };
        info!("Loaded engine library {}", engine.path.display());
        Ok(engine)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

unsafe fn symbol<T: Copy>(library: &Library, name: &'static [u8]) -> Result<T, EngineLoadError> {
    let symbol = unsafe { library.get::<T>(name) }.map_err(|source| EngineLoadError::Symbol {
        name: String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name)).into_owned(),
        source,
    })?;
    Ok(*symbol)
}

impl Engine for NativeEngine {
    fn execute_process(&self, args: &MainArgs, app: &Application) -> i32 {
        let raw_args = args.raw();
        let exit_code: c_int =
            unsafe { (self.execute_process)(raw_args.as_ptr(), app.engine_ref(), ptr::null_mut()) };
        exit_code
    }

    fn initialize(&self, args: &MainArgs, settings: &Settings, app: &Application) -> bool {
        let raw_args = args.raw();
        let raw_settings = settings.raw();

        #[cfg(unix)]
        let signal_handlers = crate::signals::SignalHandlers::save();

        let result = unsafe {
            (self.initialize)(
                raw_args.as_ptr(),
                raw_settings.as_ptr(),
                app.engine_ref(),
                ptr::null_mut(),
            )
        };

        #[cfg(unix)]
        signal_handlers.restore();

        result == 1
    }

    fn run_message_loop(&self) {
        unsafe { (self.run_message_loop)() };
    }

    fn quit_message_loop(&self) {
        unsafe { (self.quit_message_loop)() };
    }

    fn shutdown(&self) {
        unsafe { (self.shutdown)() };
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineLoadError {
    #[error("Failed to load engine library {path}")]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Engine library does not export {name}")]
    Symbol {
        name: String,
        #[source]
        source: libloading::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{EngineLoadError, NativeEngine};

    #[test]
    fn missing_library_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = NativeEngine::load(dir.path());

        match result {
            Err(EngineLoadError::Library { path, .. }) => {
                assert!(path.starts_with(dir.path()));
                assert_ne!(path, Path::new(dir.path()));
            }
            Err(err) => panic!("unexpected error: {err}"),
            Ok(_) => panic!("loaded a library from an empty directory"),
        }
    }
}
