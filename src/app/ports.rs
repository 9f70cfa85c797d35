//! Port traits — the boundary between the control core and the outside
//! world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NebControl (domain)
//! ```
//!
//! Driven adapters (GPIO, hardware timers, the serial console) implement
//! these traits.  [`NebControl`](super::service::NebControl) consumes them
//! via generics, so the control core never touches hardware directly and
//! the whole command path runs unchanged under host-side tests with mock
//! adapters.

use crate::registry::{OutputLine, TimerToken};

use super::events::StatusEvent;

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the control core calls this to drive output lines.
///
/// A hardware-level write fault is absorbed by the implementation; the
/// core treats every write as fire-and-forget.
pub trait OutputPort {
    /// Drive `line` high (`true`) or low (`false`).
    fn set_level(&mut self, line: OutputLine, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Auto-off timer port (driven adapter: domain → deferred work)
// ───────────────────────────────────────────────────────────────

/// One cancellable one-shot timer per nebulizer channel.
///
/// One-shot rather than periodic: each activation fully re-establishes its
/// own deadline, and the core always cancels the previous token before
/// scheduling a new one for the same channel.
pub trait AutoOffTimerPort {
    /// Arrange for a fire carrying the returned token to reach
    /// [`NebControl::on_timer_fired`](super::service::NebControl::on_timer_fired)
    /// after `duration_ms`.  Non-blocking; returns immediately.
    fn schedule(&mut self, neb: u8, duration_ms: u32) -> TimerToken;

    /// Best-effort cancellation.  If the timer already fired (or the fire
    /// is in flight), this is a no-op, never an error; the stale fire is
    /// then discarded at the serialization point by token mismatch.
    fn cancel(&mut self, token: TimerToken);
}

// ───────────────────────────────────────────────────────────────
// Status sink port (driven adapter: domain → serial console)
// ───────────────────────────────────────────────────────────────

/// The core emits one [`StatusEvent`] per observable transition through
/// this port.  The production adapter writes the protocol's status lines
/// to the serial console; tests record them.
pub trait StatusSink {
    fn emit(&mut self, event: StatusEvent);
}
