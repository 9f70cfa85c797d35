//! Timer-fire event queue.
//!
//! Auto-off timer callbacks run in the esp_timer task, never in the main
//! loop.  To keep every actuator mutation on the single main-loop
//! serialization point, a callback only records *which scheduling fired*
//! here; the main loop drains the queue between serial commands and feeds
//! each token into [`NebControl::on_timer_fired`].
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ esp_timer    │────▶│  Fire Queue  │────▶│  Main Loop   │
//! │ task (cb ×5) │     │  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! [`NebControl::on_timer_fired`]: crate::app::service::NebControl::on_timer_fired

use core::sync::atomic::{AtomicU8, AtomicU16, Ordering};

use crate::registry::TimerToken;

/// Maximum number of pending fires.
/// Power of 2 for efficient ring buffer modulo; far above the worst case
/// of one in-flight fire per channel.
const FIRE_QUEUE_CAP: usize = 16;

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Timer callbacks write (produce), main loop reads (consume).  All
// callbacks run sequentially on the single esp_timer task, so the
// producer side is single-threaded.  Tokens are packed into a u16
// (`neb` low byte, `generation` high byte) so slots can be plain
// atomics with no unsafe buffer access.

static FIRE_HEAD: AtomicU8 = AtomicU8::new(0);
static FIRE_TAIL: AtomicU8 = AtomicU8::new(0);
static FIRE_BUFFER: [AtomicU16; FIRE_QUEUE_CAP] =
    [const { AtomicU16::new(0) }; FIRE_QUEUE_CAP];

fn pack(token: TimerToken) -> u16 {
    u16::from(token.neb) | (u16::from(token.generation) << 8)
}

fn unpack(raw: u16) -> TimerToken {
    TimerToken {
        neb: (raw & 0xff) as u8,
        generation: (raw >> 8) as u8,
    }
}

/// Record a fired timer.  Safe to call from the esp_timer task (lock-free).
/// Returns `false` if the queue is full (fire dropped).
pub fn push_fire(token: TimerToken) -> bool {
    let head = FIRE_HEAD.load(Ordering::Relaxed);
    let tail = FIRE_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % FIRE_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop fire.
    }

    FIRE_BUFFER[head as usize].store(pack(token), Ordering::Relaxed);
    FIRE_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next fired token.  Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_fire() -> Option<TimerToken> {
    let tail = FIRE_TAIL.load(Ordering::Relaxed);
    let head = FIRE_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = FIRE_BUFFER[tail as usize].load(Ordering::Relaxed);
    FIRE_TAIL.store((tail + 1) % FIRE_QUEUE_CAP as u8, Ordering::Release);

    Some(unpack(raw))
}

/// Drain all pending fires into a handler, in FIFO order.
pub fn drain_fires(mut handler: impl FnMut(TimerToken)) {
    while let Some(token) = pop_fire() {
        handler(token);
    }
}
