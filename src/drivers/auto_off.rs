//! Auto-off timer driver using ESP-IDF's esp_timer API.
//!
//! One one-shot timer per nebulizer channel.  A callback executes in the
//! esp_timer task context (not ISR), reads the token armed for its channel
//! and pushes it into the lock-free fire queue; it never touches actuator
//! state itself.  The main loop drains the queue, so stale fires are
//! discarded there by token comparison.
//!
//! Arming protocol: `schedule()` stops the channel's timer, publishes the
//! new generation, then starts the timer — so a callback observes the
//! generation of the scheduling that armed it.  A callback already past
//! the stop when the generation is republished is indistinguishable from
//! the fire having entered the queue first; both resolve at the
//! serialization point.

use crate::app::ports::AutoOffTimerPort;
use crate::registry::{NEB_COUNT, TimerToken};

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU8, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

// ── esp_timer state (espidf only) ─────────────────────────────

#[cfg(target_os = "espidf")]
static mut TIMER_HANDLES: [esp_timer_handle_t; NEB_COUNT] =
    [core::ptr::null_mut(); NEB_COUNT];

/// Generation armed per channel, read by the fire callbacks.
#[cfg(target_os = "espidf")]
static ARMED_GENERATION: [AtomicU8; NEB_COUNT] =
    [const { AtomicU8::new(0) }; NEB_COUNT];

#[cfg(target_os = "espidf")]
fn fired(idx: usize) {
    let token = TimerToken {
        neb: (idx + 1) as u8,
        generation: ARMED_GENERATION[idx].load(Ordering::Acquire),
    };
    if !crate::events::push_fire(token) {
        log::warn!("fire queue full, auto-off for neb {} dropped", token.neb);
    }
}

// One extern callback per channel: the channel identity is baked into the
// function instead of smuggled through the untyped callback argument.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn neb1_fired(_arg: *mut core::ffi::c_void) {
    fired(0);
}
#[cfg(target_os = "espidf")]
unsafe extern "C" fn neb2_fired(_arg: *mut core::ffi::c_void) {
    fired(1);
}
#[cfg(target_os = "espidf")]
unsafe extern "C" fn neb3_fired(_arg: *mut core::ffi::c_void) {
    fired(2);
}
#[cfg(target_os = "espidf")]
unsafe extern "C" fn neb4_fired(_arg: *mut core::ffi::c_void) {
    fired(3);
}
#[cfg(target_os = "espidf")]
unsafe extern "C" fn neb5_fired(_arg: *mut core::ffi::c_void) {
    fired(4);
}

#[cfg(target_os = "espidf")]
const CALLBACKS: [unsafe extern "C" fn(*mut core::ffi::c_void); NEB_COUNT] =
    [neb1_fired, neb2_fired, neb3_fired, neb4_fired, neb5_fired];

#[cfg(target_os = "espidf")]
const TIMER_NAMES: [&core::ffi::CStr; NEB_COUNT] =
    [c"neb1", c"neb2", c"neb3", c"neb4", c"neb5"];

// ── Driver ────────────────────────────────────────────────────

/// Errors during timer driver initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerInitError {
    CreateFailed(i32),
}

impl core::fmt::Display for TimerInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CreateFailed(rc) => write!(f, "esp_timer create failed (rc={})", rc),
        }
    }
}

/// The production [`AutoOffTimerPort`] implementation.
pub struct AutoOffTimers {
    generations: [u8; NEB_COUNT],
}

impl AutoOffTimers {
    /// Create all per-channel timers.  Call once from the main task before
    /// the event loop starts.
    #[cfg(target_os = "espidf")]
    pub fn init() -> Result<Self, TimerInitError> {
        // SAFETY: TIMER_HANDLES is written here once at boot from the
        // single main-task context, before any timer is started.
        unsafe {
            for idx in 0..NEB_COUNT {
                let args = esp_timer_create_args_t {
                    callback: Some(CALLBACKS[idx]),
                    arg: core::ptr::null_mut(),
                    dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                    name: TIMER_NAMES[idx].as_ptr(),
                    skip_unhandled_events: false,
                };
                let ret = esp_timer_create(&args, &raw mut TIMER_HANDLES[idx]);
                if ret != ESP_OK {
                    return Err(TimerInitError::CreateFailed(ret));
                }
            }
        }
        info!("auto_off: {} one-shot timers created", NEB_COUNT);
        Ok(Self {
            generations: [0; NEB_COUNT],
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn init() -> Result<Self, TimerInitError> {
        log::info!("auto_off(sim): timers not armed (fires driven by tests)");
        Ok(Self {
            generations: [0; NEB_COUNT],
        })
    }

    #[cfg(target_os = "espidf")]
    fn handle(idx: usize) -> esp_timer_handle_t {
        // SAFETY: handles are written once in init() before any schedule
        // or cancel call; main-task access only thereafter.
        unsafe { TIMER_HANDLES[idx] }
    }
}

impl AutoOffTimerPort for AutoOffTimers {
    #[cfg(target_os = "espidf")]
    fn schedule(&mut self, neb: u8, duration_ms: u32) -> TimerToken {
        let idx = (neb - 1) as usize;

        // Stop before re-arming; rc is ESP_ERR_INVALID_STATE when the
        // timer was not running, which is fine.
        // SAFETY: handle(idx) contract — created in init(), main task only.
        unsafe {
            esp_timer_stop(Self::handle(idx));
        }

        self.generations[idx] = self.generations[idx].wrapping_add(1);
        let token = TimerToken {
            neb,
            generation: self.generations[idx],
        };
        ARMED_GENERATION[idx].store(token.generation, Ordering::Release);

        // SAFETY: same contract as above; start_once on a stopped timer.
        unsafe {
            esp_timer_start_once(Self::handle(idx), u64::from(duration_ms) * 1000);
        }
        token
    }

    #[cfg(not(target_os = "espidf"))]
    fn schedule(&mut self, neb: u8, _duration_ms: u32) -> TimerToken {
        let idx = (neb - 1) as usize;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        TimerToken {
            neb,
            generation: self.generations[idx],
        }
    }

    #[cfg(target_os = "espidf")]
    fn cancel(&mut self, token: TimerToken) {
        let idx = (token.neb - 1) as usize;
        // Best-effort: a timer that already fired returns
        // ESP_ERR_INVALID_STATE here, and the stale fire is dropped at the
        // serialization point instead.
        // SAFETY: handle(idx) contract — created in init(), main task only.
        unsafe {
            esp_timer_stop(Self::handle(idx));
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn cancel(&mut self, _token: TimerToken) {}
}
