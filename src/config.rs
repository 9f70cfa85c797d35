//! System configuration parameters
//!
//! All tunable parameters for the MistBank firmware.  Loaded once at boot;
//! the nebulizer on-duration is deliberately not runtime-adjustable.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Nebulizers ---
    /// How long a channel stays on after each activation (milliseconds).
    /// Every activation restarts this duration from zero.
    pub on_duration_ms: u32,

    // --- Serial console ---
    /// Blocking-read timeout for the UART console (milliseconds).
    /// Bounds the latency between a timer firing and the main loop
    /// noticing it while no bytes arrive.
    pub serial_read_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            on_duration_ms: 3000,
            serial_read_timeout_ms: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert_eq!(c.on_duration_ms, 3000);
        assert!(c.serial_read_timeout_ms > 0);
        assert!(
            c.serial_read_timeout_ms < c.on_duration_ms,
            "console poll must be much faster than the on-duration"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.on_duration_ms, c2.on_duration_ms);
        assert_eq!(c.serial_read_timeout_ms, c2.serial_read_timeout_ms);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = SystemConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: SystemConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.on_duration_ms, c2.on_duration_ms);
    }
}
