//! Byte-to-line assembler for the serial console.
//!
//! Accumulates incoming bytes into a fixed-capacity buffer and yields one
//! line per `\n` or `\r` terminator.  This handles partial reads
//! gracefully — the transport may deliver a byte at a time or several
//! commands back to back.
//!
//! Overflow policy: once the buffer is full, excess bytes before the next
//! terminator are silently dropped; the terminator then emits the
//! truncated accumulation.  The alternative (reset and report) was
//! rejected to keep the framing layer output-free.

use heapless::Vec;

/// Maximum accepted command length, terminator excluded.  Commands are at
/// most a handful of characters; anything longer is garbage input.
pub const MAX_LINE_LEN: usize = 32;

/// One assembled line (possibly empty, possibly truncated).
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Streaming line assembler.
pub struct LineAssembler {
    buf: Line,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed one byte from the transport.
    ///
    /// Returns `Some(line)` when `byte` is a terminator, handing over the
    /// accumulated bytes and resetting the buffer; `None` otherwise
    /// (including when the byte was dropped on overflow).
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\n' | b'\r' => Some(core::mem::take(&mut self.buf)),
            _ => {
                // Full buffer: drop until the next terminator.
                let _ = self.buf.push(byte);
                None
            }
        }
    }

    /// Number of bytes accumulated so far (diagnostics only).
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}
