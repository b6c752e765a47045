use crate::{cef_ref, cef_string::CefString};

/// Command line handed to [`crate::cef::App::on_before_command_line_processing`].
/// Holds the reference the engine passed along with the callback and
/// releases it on drop.
pub struct CommandLine(pub(crate) *mut chromium_sys::cef_command_line_t);

impl CommandLine {
    pub fn append_switch(&mut self, name: &str) {
        let name = CefString::new(name);
        unsafe {
            let cmd = &mut *self.0;
            if let Some(f) = cmd.append_switch {
                f(self.0, &name.raw());
            }
        }
    }

    pub fn append_switch_with_value(&mut self, name: &str, value: &str) {
        let name = CefString::new(name);
        let value = CefString::new(value);
        unsafe {
            let cmd = &mut *self.0;
            if let Some(f) = cmd.append_switch_with_value {
                f(self.0, &name.raw(), &value.raw());
            }
        }
    }

    pub fn has_switch(&self, name: &str) -> bool {
        let name = CefString::new(name);
        unsafe {
            let cmd = &mut *self.0;
            match cmd.has_switch {
                Some(f) => f(self.0, &name.raw()) == 1,
                None => false,
            }
        }
    }
}

impl Drop for CommandLine {
    fn drop(&mut self) {
        unsafe { cef_ref::release(self.0 as *mut chromium_sys::cef_base_ref_counted_t) };
    }
}
