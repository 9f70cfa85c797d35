//! Outbound status events.
//!
//! The control core and the dispatcher emit these through the
//! [`StatusSink`](super::ports::StatusSink) port, one per observable
//! transition.  `Display` renders the exact protocol wording, so the
//! console adapter and the tests share a single source of truth for the
//! status lines.

use core::fmt;

use crate::error::Error;

/// Status of one nebulizer transition, or a rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// Explicit activation (also on re-activation while already running).
    Started(u8),
    /// Explicit deactivation (also when the channel was already off).
    Stopped(u8),
    /// Timer-driven deactivation.
    AutoStopped(u8),
    /// The command was dropped; carries the reason.
    Rejected(Error),
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started(id) => write!(f, "Nebulizer {id} started"),
            Self::Stopped(id) => write!(f, "Nebulizer {id} stopped"),
            Self::AutoStopped(id) => write!(f, "Nebulizer {id} auto-stopped"),
            Self::Rejected(err) => write!(f, "Error: {err}"),
        }
    }
}
