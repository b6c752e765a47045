use std::{
    os::raw::c_int,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::cef_string::CefString;

/// Name of the helper executable the engine spawns for its sub-processes.
#[cfg(not(target_os = "windows"))]
pub const HELPER_EXECUTABLE: &str = "swtcef_helper";
#[cfg(target_os = "windows")]
pub const HELPER_EXECUTABLE: &str = "swtcef_helper.exe";

#[cfg(target_os = "macos")]
const FRAMEWORK_DIR: &str = "Chromium Embedded Framework.framework";

/// Engine-wide settings. `Default` leaves everything to the engine except
/// the sandbox, which is always disabled, and the message loop, which always
/// runs on the calling thread.
#[derive(Debug, Clone)]
pub struct Settings {
    pub browser_subprocess_path: Option<PathBuf>,
    pub framework_dir_path: Option<PathBuf>,
    pub resources_dir_path: Option<PathBuf>,
    pub locales_dir_path: Option<PathBuf>,
    pub cache_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_severity: LogSeverity,
    pub locale: Option<String>,
    pub user_agent: Option<String>,
    pub windowless_rendering_enabled: bool,
    pub command_line_args_disabled: bool,
    pub persist_session_cookies: bool,
    pub persist_user_preferences: bool,
    /// 0 disables remote debugging.
    pub remote_debugging_port: u16,
    /// ARGB, 0 keeps the engine's default.
    pub background_color: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            browser_subprocess_path: None,
            framework_dir_path: None,
            resources_dir_path: None,
            locales_dir_path: None,
            cache_path: None,
            log_file: None,
            log_severity: LogSeverity::Default,
            locale: None,
            user_agent: None,
            windowless_rendering_enabled: false,
            command_line_args_disabled: false,
            persist_session_cookies: false,
            persist_user_preferences: false,
            remote_debugging_port: 0,
            background_color: 0,
        }
    }
}

impl Settings {
    /// Settings pointing the engine at natives extracted to `library_dir`.
    ///
    /// The engine cache lives two levels above the library directory, next to
    /// the versioned install directories, so it survives version upgrades.
    pub fn for_installation(library_dir: &Path) -> Self {
        #[cfg(target_os = "macos")]
        let (resources, locales, framework) = {
            let framework = library_dir.join(FRAMEWORK_DIR);
            let resources = framework.join("Resources");
            (resources.clone(), resources, Some(framework))
        };
        #[cfg(not(target_os = "macos"))]
        let (resources, locales, framework) = (
            library_dir.to_path_buf(),
            library_dir.join("locales"),
            None,
        );

        let cache_path = library_dir
            .parent()
            .and_then(Path::parent)
            .map(|cache_root| cache_root.join("cef_cache"));

        Self {
            browser_subprocess_path: Some(library_dir.join(HELPER_EXECUTABLE)),
            framework_dir_path: framework,
            resources_dir_path: Some(resources),
            locales_dir_path: Some(locales),
            cache_path,
            log_file: Some(library_dir.join("engine.log")),
            log_severity: LogSeverity::Info,
            persist_session_cookies: true,
            persist_user_preferences: true,
            ..Default::default()
        }
    }

    pub(crate) fn raw(&self) -> RawSettings {
        RawSettings::new(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSeverity {
    Default,
    Verbose,
    Info,
    Warning,
    Error,
    Fatal,
    Disable,
}

impl LogSeverity {
    fn raw(self) -> chromium_sys::cef_log_severity_t {
        match self {
            LogSeverity::Default => chromium_sys::cef_log_severity_t_LOGSEVERITY_DEFAULT,
            LogSeverity::Verbose => chromium_sys::cef_log_severity_t_LOGSEVERITY_VERBOSE,
            LogSeverity::Info => chromium_sys::cef_log_severity_t_LOGSEVERITY_INFO,
            LogSeverity::Warning => chromium_sys::cef_log_severity_t_LOGSEVERITY_WARNING,
            LogSeverity::Error => chromium_sys::cef_log_severity_t_LOGSEVERITY_ERROR,
            LogSeverity::Fatal => chromium_sys::cef_log_severity_t_LOGSEVERITY_FATAL,
            LogSeverity::Disable => chromium_sys::cef_log_severity_t_LOGSEVERITY_DISABLE,
        }
    }
}

impl FromStr for LogSeverity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(LogSeverity::Default),
            "verbose" => Ok(LogSeverity::Verbose),
            "info" => Ok(LogSeverity::Info),
            "warning" => Ok(LogSeverity::Warning),
            "error" => Ok(LogSeverity::Error),
            "fatal" => Ok(LogSeverity::Fatal),
            "disable" => Ok(LogSeverity::Disable),
            _ => Err("Invalid engine log severity."),
        }
    }
}

/// Native `cef_settings_t` together with the UTF-16 buffers it points into.
/// The engine copies everything it needs during `initialize`.
pub(crate) struct RawSettings {
    inner: chromium_sys::cef_settings_t,
    _strings: Vec<CefString>,
}

impl RawSettings {
    fn new(settings: &Settings) -> Self {
        let mut strings = Vec::new();
        let mut string = |value: Option<&str>| match value {
            Some(value) => {
                let value = CefString::new(value);
                let raw = value.raw();
                strings.push(value);
                raw
            }
            None => CefString::empty_raw(),
        };
        let path =
            |path: &Option<PathBuf>| path.as_ref().map(|path| path.to_string_lossy().into_owned());

        let browser_subprocess_path = string(path(&settings.browser_subprocess_path).as_deref());
        let framework_dir_path = string(path(&settings.framework_dir_path).as_deref());
        let cache_path = string(path(&settings.cache_path).as_deref());
        let log_file = string(path(&settings.log_file).as_deref());
        let resources_dir_path = string(path(&settings.resources_dir_path).as_deref());
        let locales_dir_path = string(path(&settings.locales_dir_path).as_deref());
        let locale = string(settings.locale.as_deref());
        let user_agent = string(settings.user_agent.as_deref());

        let inner = chromium_sys::cef_settings_t {
            size: std::mem::size_of::<chromium_sys::cef_settings_t>(),
            no_sandbox: true as c_int,
            browser_subprocess_path,
            framework_dir_path,
            main_bundle_path: CefString::empty_raw(),
            chrome_runtime: false as c_int,
            // `bootstrap` drives the loop with `cef_run_message_loop`.
            multi_threaded_message_loop: false as c_int,
            external_message_pump: false as c_int,
            windowless_rendering_enabled: settings.windowless_rendering_enabled as c_int,
            command_line_args_disabled: settings.command_line_args_disabled as c_int,
            cache_path,
            root_cache_path: CefString::empty_raw(),
            persist_session_cookies: settings.persist_session_cookies as c_int,
            persist_user_preferences: settings.persist_user_preferences as c_int,
            user_agent,
            user_agent_product: CefString::empty_raw(),
            locale,
            log_file,
            log_severity: settings.log_severity.raw(),
            javascript_flags: CefString::empty_raw(),
            resources_dir_path,
            locales_dir_path,
            pack_loading_disabled: false as c_int,
            remote_debugging_port: settings.remote_debugging_port as c_int,
            uncaught_exception_stack_size: 0,
            background_color: settings.background_color,
            accept_language_list: CefString::empty_raw(),
            cookieable_schemes_list: CefString::empty_raw(),
            cookieable_schemes_exclude_defaults: false as c_int,
        };

        Self {
            inner,
            _strings: strings,
        }
    }

    pub fn as_ptr(&self) -> *const chromium_sys::cef_settings_t {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{LogSeverity, Settings, HELPER_EXECUTABLE};
    use crate::cef_string::CefString;

    #[test]
    fn default_settings_leave_paths_empty() {
        let raw = Settings::default().raw();
        let inner = unsafe { &*raw.as_ptr() };

        assert_eq!(inner.size, std::mem::size_of::<chromium_sys::cef_settings_t>());
        assert_eq!(inner.no_sandbox, 1);
        assert_eq!(inner.multi_threaded_message_loop, 0);
        assert!(inner.browser_subprocess_path.str_.is_null());
        assert!(inner.log_file.str_.is_null());
        assert_eq!(
            inner.log_severity,
            chromium_sys::cef_log_severity_t_LOGSEVERITY_DEFAULT
        );
    }

    #[test]
    fn installation_settings_point_into_library_dir() {
        let library_dir = Path::new("/home/user/.swtcef/3.3029/linux-x86_64");
        let settings = Settings::for_installation(library_dir);

        assert_eq!(
            settings.browser_subprocess_path.as_deref(),
            Some(library_dir.join(HELPER_EXECUTABLE).as_path())
        );
        assert_eq!(
            settings.cache_path.as_deref(),
            Some(Path::new("/home/user/.swtcef/cef_cache"))
        );
        assert_eq!(settings.log_severity, LogSeverity::Info);

        let raw = settings.raw();
        let inner = unsafe { &*raw.as_ptr() };
        let subprocess = unsafe { CefString::from_raw(&inner.browser_subprocess_path) };
        assert_eq!(
            Path::new(&subprocess),
            library_dir.join(HELPER_EXECUTABLE).as_path()
        );
        assert_eq!(inner.persist_session_cookies, 1);
        assert_eq!(inner.multi_threaded_message_loop, 0);
        assert_eq!(inner.external_message_pump, 0);
    }

    #[test]
    fn overrides_survive_marshaling() {
        let settings = Settings {
            remote_debugging_port: 9222,
            log_severity: LogSeverity::Verbose,
            locale: Some("pl".to_string()),
            ..Default::default()
        };
        let raw = settings.raw();
        let inner = unsafe { &*raw.as_ptr() };

        assert_eq!(inner.remote_debugging_port, 9222);
        assert_eq!(
            inner.log_severity,
            chromium_sys::cef_log_severity_t_LOGSEVERITY_VERBOSE
        );
        assert_eq!(unsafe { CefString::from_raw(&inner.locale) }, "pl");
    }

    #[test]
    fn log_severity_parses_config_values() {
        assert_eq!("warning".parse::<LogSeverity>(), Ok(LogSeverity::Warning));
        assert!("loud".parse::<LogSeverity>().is_err());
    }
}
