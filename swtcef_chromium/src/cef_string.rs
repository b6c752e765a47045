use widestring::{U16CString, U16Str};

/// UTF-16 string owned on the Rust side. The raw `cef_string_t` borrows the
/// buffer, so it is only valid while `self` is alive and is never freed by
/// the engine (`dtor` is unset).
pub(crate) struct CefString {
    buffer: U16CString,
}

impl CefString {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self {
            buffer: U16CString::from_str_truncate(s.as_ref()),
        }
    }

    pub fn raw(&self) -> chromium_sys::cef_string_t {
        chromium_sys::cef_string_utf16_t {
            str_: self.buffer.as_ptr() as *mut u16,
            length: self.buffer.len(),
            dtor: None,
        }
    }

    pub fn empty_raw() -> chromium_sys::cef_string_t {
        chromium_sys::cef_string_utf16_t {
            str_: std::ptr::null_mut(),
            length: 0,
            dtor: None,
        }
    }

    /// Copies a string received from the engine. Null is read as empty.
    pub unsafe fn from_raw(raw: *const chromium_sys::cef_string_t) -> String {
        if raw.is_null() {
            return String::new();
        }
        let raw = unsafe { &*raw };
        if raw.str_.is_null() || raw.length == 0 {
            return String::new();
        }
        unsafe { U16Str::from_ptr(raw.str_, raw.length) }.to_string_lossy()
    }
}
