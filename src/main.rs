//! MistBank Firmware — Main Entry Point
//!
//! Event-driven single-loop firmware: the main loop is the serialization
//! point for every actuator mutation.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  SerialConsole      HardwareAdapter     ConsoleStatusSink  │
//! │  (byte source)      (OutputPort)        (StatusSink)       │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ──────────────       │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │  LineAssembler → parser → dispatch → NebControl  │      │
//! │  └──────────────────────────────────────────────────┘      │
//! │                                                            │
//! │  AutoOffTimers (esp_timer) ──▶ fire queue ──▶ main loop    │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
mod config;
mod error;
mod events;
mod pins;
mod registry;

mod adapters;
mod app;
mod drivers;
mod protocol;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::info;

use adapters::console::ConsoleStatusSink;
use adapters::hardware::HardwareAdapter;
use adapters::serial::SerialConsole;
use app::dispatch::dispatch_line;
use app::service::NebControl;
use config::SystemConfig;
use drivers::auto_off::AutoOffTimers;
use protocol::line::LineAssembler;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("MistBank v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = drivers::hw_init::init_outputs() {
        // Without output lines there is nothing to control — halt.
        log::error!("GPIO init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let mut timers = match AutoOffTimers::init() {
        Ok(t) => t,
        Err(e) => {
            log::error!("timer init failed: {} — halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    #[cfg(target_os = "espidf")]
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    #[cfg(target_os = "espidf")]
    let mut serial = SerialConsole::new(
        peripherals.uart0,
        peripherals.pins.gpio43,
        peripherals.pins.gpio44,
    )?;
    #[cfg(not(target_os = "espidf"))]
    let mut serial = SerialConsole::new();

    // ── 3. Application core ───────────────────────────────────
    let config = SystemConfig::default();
    let mut ctl = NebControl::new(&config);
    let mut hw = HardwareAdapter::new();
    let mut sink = ConsoleStatusSink::new();
    let mut assembler = LineAssembler::new();

    // Every channel off before the first command is accepted.
    hw.all_off();

    println!("Nebulizer control ready");
    println!("Command format: <id> <0|1>");
    info!("System ready. Entering command loop.");

    // ── 4. Command loop ───────────────────────────────────────
    loop {
        // Idle wait: block on the console up to the read timeout instead
        // of busy-polling.  Timer fires land in the lock-free queue from
        // the esp_timer task and are drained right after.
        if let Some(byte) = serial.read_byte(config.serial_read_timeout_ms) {
            if let Some(line) = assembler.feed(byte) {
                dispatch_line(&line, &mut ctl, &mut hw, &mut timers, &mut sink);
            }
        }

        events::drain_fires(|token| ctl.on_timer_fired(token, &mut hw, &mut sink));

        // Simulation targets have no console; approximate the UART
        // timeout so the loop does not spin.
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            config.serial_read_timeout_ms,
        )));
    }
}
