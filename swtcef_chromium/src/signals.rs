use std::{mem::MaybeUninit, os::raw::c_int, ptr};

use log::warn;

const PRESERVED_SIGNALS: [c_int; 13] = [
    libc::SIGHUP,
    libc::SIGINT,
    libc::SIGQUIT,
    libc::SIGILL,
    libc::SIGABRT,
    libc::SIGFPE,
    libc::SIGSEGV,
    libc::SIGALRM,
    libc::SIGTERM,
    libc::SIGCHLD,
    libc::SIGBUS,
    libc::SIGTRAP,
    libc::SIGPIPE,
];

/// Signal dispositions captured before engine initialization. The engine
/// installs its own crash handlers, the host process keeps its own.
pub(crate) struct SignalHandlers(Vec<(c_int, libc::sigaction)>);

impl SignalHandlers {
    pub fn save() -> Self {
        let handlers = PRESERVED_SIGNALS
            .iter()
            .filter_map(|&signal| {
                let mut action = MaybeUninit::<libc::sigaction>::zeroed();
                let result = unsafe { libc::sigaction(signal, ptr::null(), action.as_mut_ptr()) };
                if result != 0 {
                    warn!("Failed to read handler for signal {signal}");
                    return None;
                }
                Some((signal, unsafe { action.assume_init() }))
            })
            .collect();
        Self(handlers)
    }

    pub fn restore(self) {
        for (signal, action) in self.0 {
            let result = unsafe { libc::sigaction(signal, &action, ptr::null_mut()) };
            if result != 0 {
                warn!("Failed to restore handler for signal {signal}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{mem::MaybeUninit, ptr};

    use super::SignalHandlers;

    extern "C" fn noop_handler(_: libc::c_int) {}

    fn current_handler(signal: libc::c_int) -> libc::sighandler_t {
        let mut action = MaybeUninit::<libc::sigaction>::zeroed();
        unsafe {
            libc::sigaction(signal, ptr::null(), action.as_mut_ptr());
            action.assume_init().sa_sigaction
        }
    }

    #[test]
    fn restore_reverts_replaced_handler() {
        let original = current_handler(libc::SIGHUP);
        let saved = SignalHandlers::save();

        unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = noop_handler as libc::sighandler_t;
            libc::sigaction(libc::SIGHUP, &action, ptr::null_mut());
        }
        assert_eq!(current_handler(libc::SIGHUP), noop_handler as libc::sighandler_t);

        saved.restore();
        assert_eq!(current_handler(libc::SIGHUP), original);
    }
}
