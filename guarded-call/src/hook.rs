//! Process-global panic hook state.
//!
//! A single dispatch hook is installed in front of whatever hook was
//! already present, the first time a guard or a [`GlobalHandler`] needs
//! it. It serves two purposes: guards silence report output for raises
//! they are about to intercept (tracked per thread, so other threads and
//! nested guards are unaffected), and the optionally attached
//! [`ExceptionEvent`] observes raises that nothing intercepted.
//!
//! The dispatch hook is never uninstalled. With no quiet guard active on
//! the raising thread and no handler attached it is a pass-through to the
//! previously installed hook, which behaves identically to never having
//! been installed.
//!
//! [`GlobalHandler`]: crate::GlobalHandler
//! [`ExceptionEvent`]: crate::ExceptionEvent

use crate::{Error, ExceptionEvent};
use exception_context::Exception;
use std::{panic::PanicHookInfo, sync::Once};

type PreviousHook = Box<dyn Fn(&PanicHookInfo<'_>) + Send + Sync>;

static HANDLER: parking_lot::Mutex<Option<Box<dyn ExceptionEvent>>> =
    parking_lot::const_mutex(None);

static PREVIOUS: parking_lot::Mutex<Option<PreviousHook>> = parking_lot::const_mutex(None);

static INSTALL: Once = Once::new();

/// Installs the dispatch hook in front of the currently installed hook.
/// Happens at most once per process.
pub(crate) fn install_dispatch_hook() {
    INSTALL.call_once(|| {
        *PREVIOUS.lock() = Some(std::panic::take_hook());
        std::panic::set_hook(Box::new(dispatch));
    });
}

fn dispatch(info: &PanicHookInfo<'_>) {
    // A guard on the raising thread is about to intercept this, so there
    // is nothing to report.
    #[cfg(panic = "unwind")]
    if quiet::is_quiet() {
        return;
    }

    if let Some(handler) = &*HANDLER.lock() {
        let exception = Exception::new(describe(info));
        if handler.on_exception(&exception) {
            return;
        }
    }

    if let Some(previous) = &*PREVIOUS.lock() {
        previous(info);
    }
}

/// Recovers a description from a hook invocation. The hook only borrows
/// the payload, so structured payloads cannot be carried any further than
/// their description.
fn describe(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();

    if let Some(exception) = payload.downcast_ref::<Exception>() {
        exception.description().to_owned()
    } else if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        exception_context::OPAQUE_PAYLOAD_DESCRIPTION.to_owned()
    }
}

pub(crate) fn attach(on_exception: Box<dyn ExceptionEvent>) -> Result<(), Error> {
    let mut lock = HANDLER.lock();

    if lock.is_some() {
        return Err(Error::HandlerAlreadyInstalled);
    }

    install_dispatch_hook();
    *lock = Some(on_exception);
    log::debug!("global exception handler attached");

    Ok(())
}

/// Detaches the attached handler, if any. Idempotent.
pub(crate) fn detach() {
    let mut lock = HANDLER.lock();

    if lock.take().is_some() {
        log::debug!("global exception handler detached");
    }
}

#[cfg(panic = "unwind")]
pub(crate) use quiet::quiet_current_thread;

#[cfg(panic = "unwind")]
mod quiet {
    use std::cell::Cell;

    thread_local! {
        static QUIET_DEPTH: Cell<usize> = const { Cell::new(0) };
    }

    pub(super) fn is_quiet() -> bool {
        QUIET_DEPTH.with(|depth| depth.get() > 0)
    }

    /// Silences panic reporting for the current thread until the returned
    /// guard drops. Nests.
    pub(crate) fn quiet_current_thread() -> QuietGuard {
        super::install_dispatch_hook();
        QUIET_DEPTH.with(|depth| depth.set(depth.get() + 1));
        QuietGuard {
            _not_send: std::marker::PhantomData,
        }
    }

    pub(crate) struct QuietGuard {
        // Pins the guard to the thread whose counter it incremented
        _not_send: std::marker::PhantomData<*const ()>,
    }

    impl Drop for QuietGuard {
        fn drop(&mut self) {
            QUIET_DEPTH.with(|depth| depth.set(depth.get() - 1));
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn quiet_guard_nests_and_unwinds() {
            assert!(!is_quiet());

            let outer = quiet_current_thread();
            assert!(is_quiet());

            {
                let _inner = quiet_current_thread();
                assert!(is_quiet());
            }

            assert!(is_quiet());
            drop(outer);
            assert!(!is_quiet());
        }
    }
}
