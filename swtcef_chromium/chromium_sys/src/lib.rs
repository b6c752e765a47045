//! Raw declarations of the part of the CEF C API used by `swtcef_chromium`.
//!
//! Layouts follow the CEF headers of the release bundled in the natives
//! resource set. Entry points are not linked statically, they are resolved
//! at runtime from the extracted shared library (see the `*_SYMBOL` constants).
#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_int, c_uint, c_void};

pub type char16 = u16;
pub type cef_color_t = u32;

#[repr(C)]
#[derive(Debug)]
pub struct _cef_string_utf16_t {
    pub str_: *mut char16,
    pub length: usize,
    pub dtor: Option<unsafe extern "C" fn(str_: *mut char16)>,
}
pub type cef_string_utf16_t = _cef_string_utf16_t;
pub type cef_string_t = cef_string_utf16_t;
pub type cef_string_userfree_t = *mut cef_string_t;
pub type cef_string_list_t = *mut c_void;
pub type cef_string_map_t = *mut c_void;

#[repr(C)]
#[derive(Debug)]
pub struct _cef_base_ref_counted_t {
    pub size: usize,
    pub add_ref: Option<unsafe extern "C" fn(self_: *mut _cef_base_ref_counted_t)>,
    pub release: Option<unsafe extern "C" fn(self_: *mut _cef_base_ref_counted_t) -> c_int>,
    pub has_one_ref: Option<unsafe extern "C" fn(self_: *mut _cef_base_ref_counted_t) -> c_int>,
    pub has_at_least_one_ref:
        Option<unsafe extern "C" fn(self_: *mut _cef_base_ref_counted_t) -> c_int>,
}
pub type cef_base_ref_counted_t = _cef_base_ref_counted_t;

#[cfg(not(target_os = "windows"))]
#[repr(C)]
#[derive(Debug)]
pub struct _cef_main_args_t {
    pub argc: c_int,
    pub argv: *mut *mut c_char,
}

#[cfg(target_os = "windows")]
#[repr(C)]
#[derive(Debug)]
pub struct _cef_main_args_t {
    /// `HINSTANCE` of the executable module.
    pub instance: *mut c_void,
}
pub type cef_main_args_t = _cef_main_args_t;

pub type cef_log_severity_t = c_uint;
pub const cef_log_severity_t_LOGSEVERITY_DEFAULT: cef_log_severity_t = 0;
pub const cef_log_severity_t_LOGSEVERITY_VERBOSE: cef_log_severity_t = 1;
pub const cef_log_severity_t_LOGSEVERITY_INFO: cef_log_severity_t = 2;
pub const cef_log_severity_t_LOGSEVERITY_WARNING: cef_log_severity_t = 3;
pub const cef_log_severity_t_LOGSEVERITY_ERROR: cef_log_severity_t = 4;
pub const cef_log_severity_t_LOGSEVERITY_FATAL: cef_log_severity_t = 5;
pub const cef_log_severity_t_LOGSEVERITY_DISABLE: cef_log_severity_t = 99;

#[repr(C)]
#[derive(Debug)]
pub struct _cef_settings_t {
    pub size: usize,
    pub no_sandbox: c_int,
    pub browser_subprocess_path: cef_string_t,
    pub framework_dir_path: cef_string_t,
    pub main_bundle_path: cef_string_t,
    pub chrome_runtime: c_int,
    pub multi_threaded_message_loop: c_int,
    pub external_message_pump: c_int,
    pub windowless_rendering_enabled: c_int,
    pub command_line_args_disabled: c_int,
    pub cache_path: cef_string_t,
    pub root_cache_path: cef_string_t,
    pub persist_session_cookies: c_int,
    pub persist_user_preferences: c_int,
    pub user_agent: cef_string_t,
    pub user_agent_product: cef_string_t,
    pub locale: cef_string_t,
    pub log_file: cef_string_t,
    pub log_severity: cef_log_severity_t,
    pub javascript_flags: cef_string_t,
    pub resources_dir_path: cef_string_t,
    pub locales_dir_path: cef_string_t,
    pub pack_loading_disabled: c_int,
    pub remote_debugging_port: c_int,
    pub uncaught_exception_stack_size: c_int,
    pub background_color: cef_color_t,
    pub accept_language_list: cef_string_t,
    pub cookieable_schemes_list: cef_string_t,
    pub cookieable_schemes_exclude_defaults: c_int,
}
pub type cef_settings_t = _cef_settings_t;

#[repr(C)]
#[derive(Debug)]
pub struct _cef_command_line_t {
    pub base: cef_base_ref_counted_t,
    pub is_valid: Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t) -> c_int>,
    pub is_read_only: Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t) -> c_int>,
    pub copy:
        Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t) -> *mut _cef_command_line_t>,
    pub init_from_argv: Option<
        unsafe extern "C" fn(self_: *mut _cef_command_line_t, argc: c_int, argv: *const *const c_char),
    >,
    pub init_from_string: Option<
        unsafe extern "C" fn(self_: *mut _cef_command_line_t, command_line: *const cef_string_t),
    >,
    pub reset: Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t)>,
    pub get_argv: Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t, argv: cef_string_list_t)>,
    pub get_command_line_string:
        Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t) -> cef_string_userfree_t>,
    pub get_program:
        Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t) -> cef_string_userfree_t>,
    pub set_program:
        Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t, program: *const cef_string_t)>,
    pub has_switches: Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t) -> c_int>,
    pub has_switch: Option<
        unsafe extern "C" fn(self_: *mut _cef_command_line_t, name: *const cef_string_t) -> c_int,
    >,
    pub get_switch_value: Option<
        unsafe extern "C" fn(
            self_: *mut _cef_command_line_t,
            name: *const cef_string_t,
        ) -> cef_string_userfree_t,
    >,
    pub get_switches:
        Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t, switches: cef_string_map_t)>,
    pub append_switch:
        Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t, name: *const cef_string_t)>,
    pub append_switch_with_value: Option<
        unsafe extern "C" fn(
            self_: *mut _cef_command_line_t,
            name: *const cef_string_t,
            value: *const cef_string_t,
        ),
    >,
    pub has_arguments: Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t) -> c_int>,
    pub get_arguments:
        Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t, arguments: cef_string_list_t)>,
    pub append_argument:
        Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t, argument: *const cef_string_t)>,
    pub prepend_wrapper:
        Option<unsafe extern "C" fn(self_: *mut _cef_command_line_t, wrapper: *const cef_string_t)>,
}
pub type cef_command_line_t = _cef_command_line_t;

/// Application-level callback table. Handler getters return opaque pointers
/// since this bridge never registers any of those handlers.
#[repr(C)]
#[derive(Debug)]
pub struct _cef_app_t {
    pub base: cef_base_ref_counted_t,
    pub on_before_command_line_processing: Option<
        unsafe extern "C" fn(
            self_: *mut _cef_app_t,
            process_type: *const cef_string_t,
            command_line: *mut _cef_command_line_t,
        ),
    >,
    pub on_register_custom_schemes:
        Option<unsafe extern "C" fn(self_: *mut _cef_app_t, registrar: *mut c_void)>,
    pub get_resource_bundle_handler:
        Option<unsafe extern "C" fn(self_: *mut _cef_app_t) -> *mut c_void>,
    pub get_browser_process_handler:
        Option<unsafe extern "C" fn(self_: *mut _cef_app_t) -> *mut c_void>,
    pub get_render_process_handler:
        Option<unsafe extern "C" fn(self_: *mut _cef_app_t) -> *mut c_void>,
}
pub type cef_app_t = _cef_app_t;

pub type cef_execute_process_fn = unsafe extern "C" fn(
    args: *const cef_main_args_t,
    application: *mut cef_app_t,
    windows_sandbox_info: *mut c_void,
) -> c_int;

pub type cef_initialize_fn = unsafe extern "C" fn(
    args: *const cef_main_args_t,
    settings: *const cef_settings_t,
    application: *mut cef_app_t,
    windows_sandbox_info: *mut c_void,
) -> c_int;

pub type cef_run_message_loop_fn = unsafe extern "C" fn();
pub type cef_quit_message_loop_fn = unsafe extern "C" fn();
pub type cef_shutdown_fn = unsafe extern "C" fn();

pub const CEF_EXECUTE_PROCESS_SYMBOL: &[u8] = b"cef_execute_process\0";
pub const CEF_INITIALIZE_SYMBOL: &[u8] = b"cef_initialize\0";
pub const CEF_RUN_MESSAGE_LOOP_SYMBOL: &[u8] = b"cef_run_message_loop\0";
pub const CEF_QUIT_MESSAGE_LOOP_SYMBOL: &[u8] = b"cef_quit_message_loop\0";
pub const CEF_SHUTDOWN_SYMBOL: &[u8] = b"cef_shutdown\0";
