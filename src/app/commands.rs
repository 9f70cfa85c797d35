//! Inbound commands to the control core.
//!
//! A [`Command`] is the parsed form of one serial line.  It is produced by
//! [`protocol::parser`](crate::protocol::parser), consumed immediately by
//! the dispatcher, and never stored.

/// One actuation request: switch a channel on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    /// Requested channel id, syntactically an integer.  Range validation
    /// against the registry happens in the control core.
    pub id: i32,
    /// `true` = activate (with auto-off), `false` = deactivate.
    pub activate: bool,
}
