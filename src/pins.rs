//! GPIO pin assignments for the MistBank main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

use crate::registry::OutputLine;

// ---------------------------------------------------------------------------
// Nebulizer driver outputs (ULN2003 low-side switch array, active HIGH)
// ---------------------------------------------------------------------------

/// Digital output: nebulizer channel 1.
pub const NEB_1_GPIO: i32 = 16;
/// Digital output: nebulizer channel 2.
pub const NEB_2_GPIO: i32 = 17;
/// Digital output: nebulizer channel 3.
pub const NEB_3_GPIO: i32 = 18;
/// Digital output: nebulizer channel 4.
pub const NEB_4_GPIO: i32 = 19;
/// Digital output: nebulizer channel 5.
pub const NEB_5_GPIO: i32 = 20;

/// Output lines in channel order.  The registry is built from this table;
/// its length fixes the number of nebulizer channels for the deployment.
pub const NEB_LINES: [OutputLine; 5] = [
    OutputLine(NEB_1_GPIO),
    OutputLine(NEB_2_GPIO),
    OutputLine(NEB_3_GPIO),
    OutputLine(NEB_4_GPIO),
    OutputLine(NEB_5_GPIO),
];

// The command console uses the board's default UART0 routing
// (TX=GPIO43, RX=GPIO44); the HAL takes those as typed peripherals in
// `main()` rather than raw numbers.
