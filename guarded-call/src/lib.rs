//! Guarded execution: run a unit of work so that an exceptional condition
//! raised inside it is handed to a caller-supplied handler instead of
//! propagating, with a cleanup unit guaranteed to run exactly once
//! afterward on every path.
//!
//! Rust's native exceptional-control-flow mechanism is the panic, so the
//! guard is a thin adapter over [`std::panic::catch_unwind`] that maps
//! try/catch/finally shaped control flow onto three explicit closures:
//!
//! - [`try_catch`] — guarded body plus handler.
//! - [`try_catch_finally`] — guarded body, handler, and cleanup.
//! - [`try_finally`] — guaranteed cleanup without interception; a raise
//!   continues unwinding to the caller after the cleanup unit has run.
//!
//! The handler receives the captured condition as an
//! [`Exception`]: the string payloads `panic!` produces become its
//! description, anything else is retained opaquely for
//! [`Exception::downcast_ref`], and a payload that is already an
//! `Exception` (raised via [`Exception::raise`]) is passed through
//! unchanged.
//!
//! # Ordering guarantees
//!
//! Per call, exactly one of {body completes normally, handler runs}
//! occurs, and the cleanup unit always runs exactly once afterward. The
//! handler itself is not guarded: if it raises while handling, the
//! cleanup unit still runs, and then the handler's raise — not the
//! original one — continues unwinding to the caller. A raise from the
//! cleanup unit is never intercepted either. The original exception never
//! surfaces past the guard.
//!
//! All three units run synchronously on the calling thread, in program
//! order, mirroring the caller's own stack. The guard never retries,
//! spawns, or suspends anything.
//!
//! # Unwind safety
//!
//! The body runs under [`AssertUnwindSafe`](std::panic::AssertUnwindSafe):
//! the whole point of the guard is to hand control to a handler that
//! knows what the body may have left half-updated, so the usual
//! [`UnwindSafe`](std::panic::UnwindSafe) bound is asserted on the
//! caller's behalf rather than demanded of every captured reference.
//!
//! # Panic reporting
//!
//! An intercepted raise is handled control flow, so the guard keeps the
//! panic hook from splatting `thread '...' panicked at ...` onto stderr
//! for it. Suppression is tracked per thread and only covers the body;
//! a raise escaping the handler or the cleanup unit is reported as
//! usual, since it genuinely propagates.
//!
//! This crate also exposes the hook as a [`GlobalHandler`]: a process-wide
//! last-resort observer for raises that no guard intercepted.
//!
//! # `panic = "abort"`
//!
//! Under `-C panic=abort` there is no unwinding to intercept; a raise
//! terminates the process before any handler could observe it. The guard
//! functions still exist and still run body and cleanup on the normal
//! path, but interception is compiled out. The [`GlobalHandler`] keeps
//! working, as the panic hook still runs before the abort.

mod error;
mod hook;

pub use error::Error;
pub use exception_context::Exception;

cfg_if::cfg_if! {
    if #[cfg(panic = "unwind")] {
        use std::panic::{self, AssertUnwindSafe};

        fn guarded<B, C, F>(body: B, on_exception: C, on_finally: Option<F>)
        where
            B: FnOnce(),
            C: FnOnce(Exception),
            F: FnOnce(),
        {
            let outcome = {
                let _quiet = hook::quiet_current_thread();
                panic::catch_unwind(AssertUnwindSafe(body))
            };

            // If the handler raises while handling, the new payload is
            // held until the cleanup unit has run, then resumed.
            let resume = match outcome {
                Ok(()) => None,
                Err(payload) => {
                    let exception = Exception::from(payload);
                    log::debug!("guard intercepted exception: {exception}");
                    panic::catch_unwind(AssertUnwindSafe(move || on_exception(exception))).err()
                }
            };

            if let Some(on_finally) = on_finally {
                on_finally();
            }

            if let Some(payload) = resume {
                panic::resume_unwind(payload);
            }
        }

        fn guarded_cleanup<B, F>(body: B, on_finally: F)
        where
            B: FnOnce(),
            F: FnOnce(),
        {
            // Not silenced: a raise here propagates past the guard and
            // should be reported at its raise site as usual.
            let outcome = panic::catch_unwind(AssertUnwindSafe(body));

            on_finally();

            if let Err(payload) = outcome {
                panic::resume_unwind(payload);
            }
        }
    } else {
        fn guarded<B, C, F>(body: B, on_exception: C, on_finally: Option<F>)
        where
            B: FnOnce(),
            C: FnOnce(Exception),
            F: FnOnce(),
        {
            // A raise aborts the process before the handler could run
            let _ = on_exception;

            body();

            if let Some(on_finally) = on_finally {
                on_finally();
            }
        }

        fn guarded_cleanup<B, F>(body: B, on_finally: F)
        where
            B: FnOnce(),
            F: FnOnce(),
        {
            body();
            on_finally();
        }
    }
}

/// Runs `body` under a guard, invoking `on_exception` with the captured
/// condition if and only if `body` raises.
///
/// The omitted-cleanup form of [`try_catch_finally`]; see the
/// [crate docs](crate) for the full ordering guarantees.
pub fn try_catch<B, C>(body: B, on_exception: C)
where
    B: FnOnce(),
    C: FnOnce(Exception),
{
    guarded(body, on_exception, None::<fn()>);
}

/// Runs `body` under a guard, invoking `on_exception` with the captured
/// condition if and only if `body` raises, then `on_finally` exactly once
/// on every path.
///
/// See the [crate docs](crate) for the full ordering guarantees.
pub fn try_catch_finally<B, C, F>(body: B, on_exception: C, on_finally: F)
where
    B: FnOnce(),
    C: FnOnce(Exception),
    F: FnOnce(),
{
    guarded(body, on_exception, Some(on_finally));
}

/// Runs `body`, then `on_finally` exactly once whether or not `body`
/// raised.
///
/// Nothing is intercepted: if `body` raised, its payload continues
/// unwinding to the caller, untouched, once `on_finally` has run.
pub fn try_finally<B, F>(body: B, on_finally: F)
where
    B: FnOnce(),
    F: FnOnce(),
{
    guarded_cleanup(body, on_finally);
}

/// A process-wide observer for exceptions that no guard intercepted,
/// invoked from the panic hook on whichever thread raised.
///
/// Implementations must not raise, and must not attach or detach a
/// [`GlobalHandler`] from inside [`Self::on_exception`]; the hook context
/// tolerates neither.
pub trait ExceptionEvent: Send + Sync {
    /// Invoked with the condition that reached the hook. Returning `true`
    /// marks the event handled, and the previously installed hook (which
    /// is what prints the standard panic report) is skipped.
    fn on_exception(&self, exception: &Exception) -> bool;
}

/// Creates an [`ExceptionEvent`] using the supplied closure as the
/// implementation.
pub fn make_exception_event<F>(closure: F) -> Box<dyn ExceptionEvent>
where
    F: Fn(&Exception) -> bool + Send + Sync + 'static,
{
    struct Wrapper<F> {
        inner: F,
    }

    impl<F> ExceptionEvent for Wrapper<F>
    where
        F: Fn(&Exception) -> bool + Send + Sync,
    {
        fn on_exception(&self, exception: &Exception) -> bool {
            (self.inner)(exception)
        }
    }

    Box::new(Wrapper { inner: closure })
}

/// A process-wide last-resort exception handler.
pub struct GlobalHandler;

impl GlobalHandler {
    /// Attaches the handler.
    ///
    /// The provided callback is invoked for any raise that unwinds
    /// without a guard intercepting it, with a description-only
    /// [`Exception`] — the hook observes the raise site's payload, it
    /// does not own it.
    ///
    /// Only one handler can be attached at a time.
    pub fn attach(on_exception: Box<dyn ExceptionEvent>) -> Result<Self, Error> {
        hook::attach(on_exception)?;
        Ok(Self)
    }

    /// Detaches the handler.
    ///
    /// This is done automatically when this [`GlobalHandler`] is dropped.
    #[inline]
    pub fn detach(self) {
        hook::detach();
    }
}

impl Drop for GlobalHandler {
    fn drop(&mut self) {
        hook::detach();
    }
}
