//! Provides [`Exception`], a portable representation of an exceptional
//! condition: the value a guarded unit of work raised, reduced to a
//! human-readable description plus an optional opaque payload.
//!
//! In Rust the native exceptional-control-flow mechanism is the panic. A
//! panic carries an arbitrary `Box<dyn Any + Send>` payload, though in
//! practice that payload is almost always the `&'static str` or `String`
//! produced by [`panic!`]. [`Exception`] normalizes the string payloads
//! into its description and retains anything else opaquely, so a handler
//! can still [`downcast_ref`](Exception::downcast_ref) to the concrete
//! type it expects.
//!
//! There is deliberately no exception-class hierarchy here: an
//! [`Exception`] is a single value handed to a single handler, nothing
//! more.

use std::{any::Any, fmt};

/// Description used for a raise site whose payload is neither a string nor
/// an [`Exception`].
pub const OPAQUE_PAYLOAD_DESCRIPTION: &str = "opaque exception payload";

/// An exceptional condition captured at its raise site.
pub struct Exception {
    description: String,
    payload: Option<Box<dyn Any + Send>>,
}

impl Exception {
    /// Creates an exception carrying only a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            payload: None,
        }
    }

    /// Creates an exception carrying a description as well as a structured
    /// payload that a handler can recover with [`Self::downcast_ref`].
    pub fn with_payload(description: impl Into<String>, payload: impl Any + Send) -> Self {
        Self {
            description: description.into(),
            payload: Some(Box::new(payload)),
        }
    }

    /// The human-readable description of the condition.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The structured payload, if the raise site supplied one beyond a
    /// plain message.
    #[inline]
    pub fn payload(&self) -> Option<&(dyn Any + Send)> {
        self.payload.as_deref()
    }

    /// Attempts to view the payload as a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|payload| payload.downcast_ref())
    }

    /// Raises the exception, re-entering the native unwinding mechanism.
    ///
    /// A guard that captures the resulting panic recovers this exact
    /// value, description and payload intact.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }
}

impl From<Box<dyn Any + Send>> for Exception {
    /// Converts a captured panic payload into an exception.
    ///
    /// A payload that is already an [`Exception`] passes through
    /// unchanged. The string payloads [`panic!`] produces become the
    /// description. Any other payload is kept opaquely under
    /// [`OPAQUE_PAYLOAD_DESCRIPTION`].
    fn from(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Self>() {
            Ok(exception) => return *exception,
            Err(other) => other,
        };

        let payload = match payload.downcast::<&'static str>() {
            Ok(message) => return Self::new(*message),
            Err(other) => other,
        };

        match payload.downcast::<String>() {
            Ok(message) => Self::new(*message),
            Err(other) => Self {
                description: OPAQUE_PAYLOAD_DESCRIPTION.to_owned(),
                payload: Some(other),
            },
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Exception");
        dbg.field("description", &self.description);
        if self.payload.is_some() {
            // `dyn Any` has no Debug obligation
            dbg.field("payload", &"<opaque>");
        }
        dbg.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(payload: impl Any + Send) -> Exception {
        let boxed: Box<dyn Any + Send> = Box::new(payload);
        Exception::from(boxed)
    }

    #[test]
    fn str_payload_becomes_description() {
        let exception = capture("boom");
        assert_eq!(exception.description(), "boom");
        assert!(exception.payload().is_none());
    }

    #[test]
    fn string_payload_becomes_description() {
        let exception = capture(format!("boom {}", 1));
        assert_eq!(exception.description(), "boom 1");
        assert!(exception.payload().is_none());
    }

    #[test]
    fn other_payload_is_retained_opaquely() {
        let exception = capture(41u64);
        assert_eq!(exception.description(), OPAQUE_PAYLOAD_DESCRIPTION);
        assert_eq!(exception.downcast_ref::<u64>(), Some(&41));
        assert!(exception.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn exception_payload_passes_through() {
        let exception = capture(Exception::with_payload("typed", 7i32));
        assert_eq!(exception.description(), "typed");
        assert_eq!(exception.downcast_ref::<i32>(), Some(&7));
    }
}
