//! `grief-generator` raises exceptional conditions on demand, one for
//! every payload shape a guard can encounter. It exists so that
//! exception-capture machinery has something predictable to capture;
//! nothing in here belongs in production code.

use exception_context::Exception;

/// Message carried by [`GriefFlavor::StaticMessage`].
pub const STATIC_MESSAGE: &str = "grief: static message";

/// Message carried by [`GriefFlavor::FormattedMessage`].
pub const FORMATTED_MESSAGE: &str = "grief: formatted message 7";

/// Description carried by [`GriefFlavor::RaisedException`].
pub const RAISED_DESCRIPTION: &str = "grief: raised exception";

/// The code stored in every [`GriefPayload`] this crate raises.
pub const PAYLOAD_CODE: u32 = 7;

/// A structured payload that is neither a string nor an [`Exception`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GriefPayload {
    pub code: u32,
}

/// The payload shapes a raise site can produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GriefFlavor {
    /// A `&'static str` payload, the shape `panic!` produces for a plain
    /// literal message
    StaticMessage,
    /// A `String` payload, the shape `panic!` produces for a message with
    /// format arguments
    FormattedMessage,
    /// A caller-defined payload raised via `panic_any`
    OpaquePayload,
    /// A fully formed [`Exception`] raised via [`Exception::raise`]
    RaisedException,
}

impl GriefFlavor {
    /// It's time to grieve
    pub fn grieve(self) -> ! {
        match self {
            Self::StaticMessage => raise_static_message(),
            Self::FormattedMessage => raise_formatted_message(),
            Self::OpaquePayload => raise_opaque_payload(),
            Self::RaisedException => raise_exception(),
        }
    }

    /// The description a guard is expected to capture for this flavor.
    pub fn expected_description(self) -> &'static str {
        match self {
            Self::StaticMessage => STATIC_MESSAGE,
            Self::FormattedMessage => FORMATTED_MESSAGE,
            Self::OpaquePayload => exception_context::OPAQUE_PAYLOAD_DESCRIPTION,
            Self::RaisedException => RAISED_DESCRIPTION,
        }
    }
}

/// Raises [`STATIC_MESSAGE`] as a `&'static str` payload.
pub fn raise_static_message() -> ! {
    std::panic::panic_any(STATIC_MESSAGE)
}

/// Raises [`FORMATTED_MESSAGE`] as a `String` payload.
pub fn raise_formatted_message() -> ! {
    panic!("grief: formatted message {PAYLOAD_CODE}")
}

/// Raises a [`GriefPayload`], which no string normalization applies to.
pub fn raise_opaque_payload() -> ! {
    std::panic::panic_any(GriefPayload { code: PAYLOAD_CODE })
}

/// Raises an [`Exception`] carrying a [`GriefPayload`].
pub fn raise_exception() -> ! {
    Exception::with_payload(RAISED_DESCRIPTION, GriefPayload { code: PAYLOAD_CODE }).raise()
}
