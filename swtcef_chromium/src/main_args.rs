use std::{ffi::CString, marker::PhantomData, os::raw::c_char};

/// Process arguments in the form the engine expects them.
///
/// Arguments are owned here; [`MainArgs::raw`] builds the native
/// `argc`/`argv` view that borrows them for the duration of one call.
#[derive(Debug, Clone)]
pub struct MainArgs {
    args: Vec<CString>,
}

impl MainArgs {
    pub fn from_env() -> Result<Self, MainArgsError> {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStringExt;
            let args = std::env::args_os().map(|arg| arg.into_vec()).collect();
            Self::from_bytes(args)
        }
        #[cfg(not(unix))]
        {
            let args = std::env::args_os()
                .map(|arg| arg.to_string_lossy().into_owned().into_bytes())
                .collect();
            Self::from_bytes(args)
        }
    }

    pub fn new<I, S>(args: I) -> Result<Self, MainArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_bytes(args.into_iter().map(|arg| arg.into().into_bytes()).collect())
    }

    fn from_bytes(args: Vec<Vec<u8>>) -> Result<Self, MainArgsError> {
        let args = args
            .into_iter()
            .enumerate()
            .map(|(index, arg)| CString::new(arg).map_err(|_| MainArgsError::InteriorNul(index)))
            .collect::<Result<_, _>>()?;
        Ok(Self { args })
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = std::borrow::Cow<'_, str>> {
        self.args.iter().map(|arg| arg.to_string_lossy())
    }

    pub(crate) fn raw(&self) -> RawMainArgs<'_> {
        RawMainArgs::new(self)
    }
}

/// Native view of [`MainArgs`], valid while the borrowed args are alive.
pub(crate) struct RawMainArgs<'a> {
    inner: chromium_sys::cef_main_args_t,
    _argv: Vec<*mut c_char>,
    _args: PhantomData<&'a MainArgs>,
}

impl<'a> RawMainArgs<'a> {
    #[cfg(not(target_os = "windows"))]
    fn new(args: &'a MainArgs) -> Self {
        // The engine declares argv as mutable but never writes through it.
        let mut argv: Vec<*mut c_char> = args
            .args
            .iter()
            .map(|arg| arg.as_ptr() as *mut c_char)
            .collect();
        argv.push(std::ptr::null_mut());
        let inner = chromium_sys::cef_main_args_t {
            argc: args.args.len() as i32,
            argv: argv.as_mut_ptr(),
        };

        Self {
            inner,
            _argv: argv,
            _args: PhantomData,
        }
    }

    // On Windows the engine reads the command line itself, only the module
    // handle is passed.
    #[cfg(target_os = "windows")]
    fn new(_args: &'a MainArgs) -> Self {
        extern "system" {
            fn GetModuleHandleW(module_name: *const u16) -> *mut std::os::raw::c_void;
        }

        let inner = chromium_sys::cef_main_args_t {
            instance: unsafe { GetModuleHandleW(std::ptr::null()) },
        };

        Self {
            inner,
            _argv: Vec::new(),
            _args: PhantomData,
        }
    }

    pub fn as_ptr(&self) -> *const chromium_sys::cef_main_args_t {
        &self.inner
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MainArgsError {
    #[error("Argument {0} contains an interior NUL byte")]
    InteriorNul(usize),
}

#[cfg(all(test, not(target_os = "windows")))]
mod tests {
    use std::ffi::CStr;

    use super::{MainArgs, MainArgsError};

    #[test]
    fn raw_args_mirror_owned_args() {
        let args = MainArgs::new(["app", "--type=renderer", "https://example.com"]).unwrap();
        let raw = args.raw();
        let inner = unsafe { &*raw.as_ptr() };

        assert_eq!(inner.argc, 3);
        let argv: Vec<_> = (0..inner.argc as usize)
            .map(|i| unsafe { CStr::from_ptr(*inner.argv.add(i)) }.to_str().unwrap())
            .collect();
        assert_eq!(argv, ["app", "--type=renderer", "https://example.com"]);
        assert!(unsafe { *inner.argv.add(3) }.is_null());
    }

    #[test]
    fn interior_nul_is_rejected() {
        let result = MainArgs::new(["app", "bad\0arg"]);
        assert!(matches!(result, Err(MainArgsError::InteriorNul(1))));
    }
}
