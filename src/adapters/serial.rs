//! Serial console byte source.
//!
//! Wraps the command UART behind a bounded-timeout `read_byte`.  The
//! timeout doubles as the main loop's idle wait: while no bytes arrive
//! the loop blocks here instead of busy-spinning, waking in time to
//! drain any queued timer fires.

#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::TickType;
#[cfg(target_os = "espidf")]
use esp_idf_hal::gpio::AnyIOPin;
#[cfg(target_os = "espidf")]
use esp_idf_hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_hal::uart::{UartDriver, config::Config};

/// Byte-level access to the command console.
pub struct SerialConsole<'d> {
    #[cfg(target_os = "espidf")]
    uart: UartDriver<'d>,
    #[cfg(not(target_os = "espidf"))]
    _marker: core::marker::PhantomData<&'d ()>,
}

#[cfg(target_os = "espidf")]
impl<'d> SerialConsole<'d> {
    /// Take ownership of the console UART at the standard 115200/8N1.
    pub fn new(
        uart: impl Peripheral<P = impl esp_idf_hal::uart::Uart> + 'd,
        tx: impl Peripheral<P = impl esp_idf_hal::gpio::OutputPin> + 'd,
        rx: impl Peripheral<P = impl esp_idf_hal::gpio::InputPin> + 'd,
    ) -> anyhow::Result<Self> {
        let config = Config::default().baudrate(esp_idf_hal::units::Hertz(115_200));
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;
        Ok(Self { uart })
    }

    /// Blocking read of one byte, bounded by `timeout_ms`.
    /// Returns `None` when the timeout elapsed with no data.
    pub fn read_byte(&mut self, timeout_ms: u32) -> Option<u8> {
        let mut buf = [0u8; 1];
        let ticks = TickType::from(core::time::Duration::from_millis(u64::from(timeout_ms)));
        match self.uart.read(&mut buf, ticks.ticks()) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl SerialConsole<'_> {
    pub fn new() -> Self {
        Self {
            _marker: core::marker::PhantomData,
        }
    }

    /// Simulation stub: no console attached.
    pub fn read_byte(&mut self, _timeout_ms: u32) -> Option<u8> {
        None
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for SerialConsole<'_> {
    fn default() -> Self {
        Self::new()
    }
}
