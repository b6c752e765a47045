use std::{
    ops::{Deref, DerefMut},
    os::raw::c_int,
    sync::atomic::{fence, AtomicUsize, Ordering},
};

use chromium_sys::cef_base_ref_counted_t as RefCountedBase;

/// Rust value that can be exposed to the engine as a ref counted C struct.
pub(crate) trait CefStruct {
    /// C struct whose first field is a `cef_base_ref_counted_t`.
    type CefType;

    fn to_cef(&self) -> Self::CefType;

    fn base_mut(cef: &mut Self::CefType) -> &mut RefCountedBase;
}

/// Heap block shared with the engine. `#[repr(C)]` puts `cef` at offset 0,
/// so the same address is a `*mut T::CefType`, a `*mut RefCountedBase` and a
/// `*mut CefRefPtr<T>`.
#[repr(C)]
pub(crate) struct CefRefPtr<T: CefStruct> {
    cef: T::CefType,
    value: T,
    refs: AtomicUsize,
}

impl<T: CefStruct> Deref for CefRefPtr<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: CefStruct> DerefMut for CefRefPtr<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: CefStruct> CefRefPtr<T> {
    /// Past this count an overflow is possible before anyone notices.
    const REFS_LIMIT: usize = isize::MAX as usize;

    /// Moves `value` to the heap with one reference, owned by the caller.
    pub fn new_ptr(value: T) -> *mut T::CefType {
        let mut cef = value.to_cef();
        *T::base_mut(&mut cef) = RefCountedBase {
            size: std::mem::size_of::<T::CefType>(),
            add_ref: Some(Self::on_add_ref),
            release: Some(Self::on_release),
            has_one_ref: Some(Self::on_has_one_ref),
            has_at_least_one_ref: Some(Self::on_has_at_least_one_ref),
        };

        let block = Box::new(Self {
            cef,
            value,
            refs: AtomicUsize::new(1),
        });
        Box::into_raw(block).cast()
    }

    /// # Safety
    /// `cef` must come from [`CefRefPtr::new_ptr`] for the same `T` and still
    /// hold a reference.
    pub unsafe fn from_cef<'a>(cef: *mut T::CefType) -> &'a mut Self {
        unsafe { &mut *cef.cast::<Self>() }
    }

    fn refs<'a>(base: *mut RefCountedBase) -> &'a AtomicUsize {
        unsafe { &(*base.cast::<Self>()).refs }
    }

    extern "C" fn on_add_ref(base: *mut RefCountedBase) {
        if Self::refs(base).fetch_add(1, Ordering::Relaxed) >= Self::REFS_LIMIT {
            std::process::abort();
        }
    }

    extern "C" fn on_release(base: *mut RefCountedBase) -> c_int {
        if Self::refs(base).fetch_sub(1, Ordering::Release) != 1 {
            return 0;
        }
        // Last reference: see every write made through the other ones.
        fence(Ordering::Acquire);
        drop(unsafe { Box::from_raw(base.cast::<Self>()) });
        1
    }

    extern "C" fn on_has_one_ref(base: *mut RefCountedBase) -> c_int {
        (Self::refs(base).load(Ordering::Acquire) == 1) as c_int
    }

    extern "C" fn on_has_at_least_one_ref(base: *mut RefCountedBase) -> c_int {
        (Self::refs(base).load(Ordering::Acquire) >= 1) as c_int
    }
}

/// Takes a reference through the struct's own table. Works for engine owned
/// structs too. Null and missing entries are ignored.
pub(crate) unsafe fn add_ref(base: *mut RefCountedBase) {
    if let Some(add_ref) = unsafe { base.as_ref() }.and_then(|base| base.add_ref) {
        unsafe { add_ref(base) };
    }
}

/// Counterpart of [`add_ref`].
pub(crate) unsafe fn release(base: *mut RefCountedBase) {
    if let Some(release) = unsafe { base.as_ref() }.and_then(|base| base.release) {
        unsafe { release(base) };
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::{add_ref, release, CefRefPtr, CefStruct, RefCountedBase};

    #[repr(C)]
    struct Plain {
        base: RefCountedBase,
    }

    struct DropFlag(Rc<Cell<bool>>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    impl CefStruct for DropFlag {
        type CefType = Plain;

        fn to_cef(&self) -> Plain {
            Plain {
                base: unsafe { std::mem::zeroed() },
            }
        }

        fn base_mut(cef: &mut Plain) -> &mut RefCountedBase {
            &mut cef.base
        }
    }

    #[test]
    fn last_release_frees_the_block() {
        let dropped = Rc::new(Cell::new(false));
        let raw = CefRefPtr::new_ptr(DropFlag(dropped.clone()));
        let base = raw.cast::<RefCountedBase>();

        unsafe {
            assert_eq!((*base).size, std::mem::size_of::<Plain>());
            add_ref(base);
            assert_eq!(((*base).has_one_ref.unwrap())(base), 0);
            release(base);
            assert_eq!(((*base).has_one_ref.unwrap())(base), 1);
            assert!(!dropped.get());
            release(base);
        }
        assert!(dropped.get());
    }

    #[test]
    fn null_pointers_are_ignored() {
        unsafe {
            add_ref(std::ptr::null_mut());
            release(std::ptr::null_mut());
        }
    }
}
