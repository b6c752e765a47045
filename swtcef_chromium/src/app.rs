use std::ptr;

use crate::{
    cef_ref::{self, CefRefPtr, CefStruct},
    cef_string::CefString,
    command_line::CommandLine,
};

/// Application-level callbacks registered with the engine.
pub trait App {
    /// Called in every process before the engine processes its command line.
    /// `process_type` is empty for the browser process.
    fn on_before_command_line_processing(
        &mut self,
        _process_type: String,
        _command_line: &mut CommandLine,
    ) {
    }
}

pub(crate) struct AppWrapper<A: App>(pub A);

impl<A: App> CefStruct for AppWrapper<A> {
    type CefType = chromium_sys::cef_app_t;

    fn to_cef(&self) -> Self::CefType {
        chromium_sys::cef_app_t {
            base: unsafe { std::mem::zeroed() },
            on_before_command_line_processing: Some(Self::on_before_command_line_processing),
            on_register_custom_schemes: None,
            get_resource_bundle_handler: None,
            get_browser_process_handler: None,
            get_render_process_handler: None,
        }
    }

    fn base_mut(cef: &mut Self::CefType) -> &mut chromium_sys::cef_base_ref_counted_t {
        &mut cef.base
    }
}

/// Callback table with every slot unset.
pub(crate) struct NoCallbacks;

impl CefStruct for NoCallbacks {
    type CefType = chromium_sys::cef_app_t;

    fn to_cef(&self) -> Self::CefType {
        chromium_sys::cef_app_t {
            base: unsafe { std::mem::zeroed() },
            on_before_command_line_processing: None,
            on_register_custom_schemes: None,
            get_resource_bundle_handler: None,
            get_browser_process_handler: None,
            get_render_process_handler: None,
        }
    }

    fn base_mut(cef: &mut Self::CefType) -> &mut chromium_sys::cef_base_ref_counted_t {
        &mut cef.base
    }
}

impl<A: App> AppWrapper<A> {
    extern "C" fn on_before_command_line_processing(
        self_: *mut chromium_sys::cef_app_t,
        process_type: *const chromium_sys::cef_string_t,
        command_line: *mut chromium_sys::cef_command_line_t,
    ) {
        unsafe {
            let self_ref = CefRefPtr::<Self>::from_cef(self_);
            let process_type = CefString::from_raw(process_type);
            let mut command_line = CommandLine(command_line);
            self_ref.0.on_before_command_line_processing(process_type, &mut command_line);
        }
    }
}

/// Owned, ref counted application callback table.
///
/// Keeps one reference for the lifetime of the value; every pointer handed
/// to the engine carries an extra reference that the engine releases.
pub struct Application {
    raw: *mut chromium_sys::cef_app_t,
}

impl Application {
    pub fn new<A: App>(app: A) -> Self {
        Self {
            raw: CefRefPtr::new_ptr(AppWrapper(app)),
        }
    }

    /// Defaults only, no callbacks registered.
    pub fn empty() -> Self {
        Self {
            raw: CefRefPtr::new_ptr(NoCallbacks),
        }
    }

    pub(crate) fn engine_ref(&self) -> *mut chromium_sys::cef_app_t {
        if self.raw.is_null() {
            return ptr::null_mut();
        }
        unsafe { cef_ref::add_ref(self.raw as *mut chromium_sys::cef_base_ref_counted_t) };
        self.raw
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> *mut chromium_sys::cef_app_t {
        self.raw
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        unsafe { cef_ref::release(self.raw as *mut chromium_sys::cef_base_ref_counted_t) };
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::{App, Application};
    use crate::{cef_string::CefString, command_line::CommandLine};

    thread_local! {
        static SWITCHES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    unsafe extern "C" fn record_switch(
        _self: *mut chromium_sys::cef_command_line_t,
        name: *const chromium_sys::cef_string_t,
    ) {
        let name = unsafe { CefString::from_raw(name) };
        SWITCHES.with(|switches| switches.borrow_mut().push(name));
    }

    struct SwitchApp {
        seen_process_types: Rc<RefCell<Vec<String>>>,
    }

    impl App for SwitchApp {
        fn on_before_command_line_processing(
            &mut self,
            process_type: String,
            command_line: &mut CommandLine,
        ) {
            self.seen_process_types.borrow_mut().push(process_type.clone());
            if process_type.is_empty() {
                command_line.append_switch("disable-gpu");
            }
        }
    }

    #[test]
    fn callback_reaches_app_and_command_line() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let app = Application::new(SwitchApp {
            seen_process_types: seen.clone(),
        });

        let mut command_line: chromium_sys::cef_command_line_t = unsafe { std::mem::zeroed() };
        command_line.append_switch = Some(record_switch);

        let raw_app = app.raw();
        let callback = unsafe { (*raw_app).on_before_command_line_processing }
            .expect("callback registered");
        let browser_type = CefString::empty_raw();
        let renderer_type = CefString::new("renderer");
        unsafe {
            callback(raw_app, &browser_type, &mut command_line);
            callback(raw_app, &renderer_type.raw(), &mut command_line);
        }

        assert_eq!(*seen.borrow(), vec![String::new(), "renderer".to_string()]);
        SWITCHES.with(|switches| assert_eq!(*switches.borrow(), vec!["disable-gpu".to_string()]));
    }

    #[test]
    fn empty_application_leaves_every_slot_unset() {
        let app = Application::empty();
        let raw = unsafe { &*app.raw() };

        assert!(raw.on_before_command_line_processing.is_none());
        assert!(raw.on_register_custom_schemes.is_none());
        assert!(raw.get_resource_bundle_handler.is_none());
        assert!(raw.get_browser_process_handler.is_none());
        assert!(raw.get_render_process_handler.is_none());
        assert!(raw.base.release.is_some());
    }

    #[test]
    fn engine_reference_is_counted() {
        let app = Application::empty();
        let raw = app.engine_ref();
        let base = unsafe { &mut (*raw).base };

        let has_one_ref = base.has_one_ref.expect("ref counting installed");
        let release = base.release.expect("ref counting installed");
        assert_eq!(unsafe { has_one_ref(base) }, 0);
        assert_eq!(unsafe { release(base) }, 0);
        assert_eq!(unsafe { has_one_ref(base) }, 1);
        assert_eq!(base.size, std::mem::size_of::<chromium_sys::cef_app_t>());
    }
}
