//! Nebulizer control core.
//!
//! [`NebControl`] owns the channel registry and is the single place where
//! actuator state changes.  It exposes exactly two entry points:
//! [`set_state`](NebControl::set_state) for parsed serial commands and
//! [`on_timer_fired`](NebControl::on_timer_fired) for auto-off expiries
//! drained from the fire queue.  Both run on the main loop, so commands
//! and fires for the same channel are applied strictly in arrival order.
//!
//! ```text
//!  Dispatcher ──▶ ┌────────────────────────┐ ──▶ StatusSink
//!                 │       NebControl        │
//!  Fire queue ──▶ │  Registry · invariants  │ ──▶ OutputPort
//!                 └────────────────────────┘ ──▶ AutoOffTimerPort
//! ```
//!
//! Invariant kept across every entry-point return: a channel is active
//! ⇔ its line is driven high ⇔ it has exactly one pending timer token.

use log::{debug, info};

use crate::config::SystemConfig;
use crate::error::ControlError;
use crate::pins;
use crate::registry::{Registry, TimerToken};

use super::events::StatusEvent;
use super::ports::{AutoOffTimerPort, OutputPort, StatusSink};

/// The control core for all nebulizer channels.
pub struct NebControl {
    registry: Registry,
    /// Fixed on-duration applied to every activation (ms).
    on_duration_ms: u32,
}

impl NebControl {
    /// Construct the core with all channels inactive.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            registry: Registry::new(pins::NEB_LINES),
            on_duration_ms: config.on_duration_ms,
        }
    }

    // ── Command entry point ───────────────────────────────────

    /// Apply one activation/deactivation request.
    ///
    /// Activating an already-active channel is legal and restarts its
    /// deadline; deactivating an inactive channel is legal and a no-op
    /// beyond the status line.
    pub fn set_state(
        &mut self,
        id: i32,
        desired: bool,
        hw: &mut impl OutputPort,
        timers: &mut impl AutoOffTimerPort,
        sink: &mut impl StatusSink,
    ) -> Result<(), ControlError> {
        let on_duration_ms = self.on_duration_ms;
        let neb = self.registry.resolve(id).ok_or(ControlError::InvalidId)?;

        if desired {
            // A pending timer is always superseded before the new one is
            // scheduled, even when the channel is already running.
            if let Some(token) = neb.pending.take() {
                timers.cancel(token);
            }
            hw.set_level(neb.line, true);
            let token = timers.schedule(neb.id, on_duration_ms);
            neb.is_active = true;
            neb.pending = Some(token);

            info!("neb {}: on for {}ms (gen {})", neb.id, on_duration_ms, token.generation);
            sink.emit(StatusEvent::Started(neb.id));
        } else {
            if let Some(token) = neb.pending.take() {
                timers.cancel(token);
            }
            hw.set_level(neb.line, false);
            neb.is_active = false;

            info!("neb {}: off", neb.id);
            sink.emit(StatusEvent::Stopped(neb.id));
        }

        Ok(())
    }

    // ── Timer entry point ─────────────────────────────────────

    /// Apply one auto-off expiry drained from the fire queue.
    ///
    /// A fire whose token no longer matches the channel's stored pending
    /// token belongs to a superseded schedule — a cancel raced the fire —
    /// and is discarded without touching state or emitting a status line.
    pub fn on_timer_fired(
        &mut self,
        token: TimerToken,
        hw: &mut impl OutputPort,
        sink: &mut impl StatusSink,
    ) {
        let Some(neb) = self.registry.resolve(i32::from(token.neb)) else {
            debug!("fire for unknown channel {} dropped", token.neb);
            return;
        };

        if neb.pending != Some(token) {
            debug!(
                "neb {}: stale fire (gen {}) ignored",
                neb.id, token.generation
            );
            return;
        }

        hw.set_level(neb.line, false);
        neb.is_active = false;
        neb.pending = None;

        info!("neb {}: auto-off after {}ms", neb.id, self.on_duration_ms);
        sink.emit(StatusEvent::AutoStopped(neb.id));
    }

    // ── Queries ───────────────────────────────────────────────

    /// Whether the given channel is currently active (`false` for ids the
    /// registry does not know).
    pub fn is_active(&self, id: i32) -> bool {
        self.registry.get(id).is_some_and(|n| n.is_active)
    }

    /// Number of currently active channels.
    pub fn active_count(&self) -> usize {
        self.registry.iter().filter(|n| n.is_active).count()
    }

    /// Read-only view of the registry (tests and diagnostics).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
