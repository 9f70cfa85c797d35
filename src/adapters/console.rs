//! Console status sink adapter.
//!
//! Implements [`StatusSink`] by writing one protocol status line per event
//! to the serial console (UART / USB-CDC in production).  These lines are
//! the firmware's external status interface, not logging — internal
//! diagnostics go through the `log` facade instead.

use crate::app::events::StatusEvent;
use crate::app::ports::StatusSink;

/// Adapter that prints every [`StatusEvent`] as its protocol line.
pub struct ConsoleStatusSink;

impl ConsoleStatusSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleStatusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for ConsoleStatusSink {
    fn emit(&mut self, event: StatusEvent) {
        println!("{event}");
    }
}
