//! Command parser: one text line → one validated [`Command`].
//!
//! Grammar: exactly two whitespace-separated tokens, `<id> <state>`.
//! The parser validates syntax only; range-checking the id against the
//! registry happens in the control core, which keeps this module reusable
//! independent of the channel count.  Pure and total — no state, no I/O,
//! no panics on any input.

use crate::app::commands::Command;
use crate::error::ParseError;

/// Parse one assembled line.
///
/// * Wrong token count or a non-integer id → [`ParseError::Malformed`].
/// * A state token other than literal `0`/`1` → [`ParseError::InvalidState`].
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let mut tokens = line.split_whitespace();

    let id_tok = tokens.next().ok_or(ParseError::Malformed)?;
    let state_tok = tokens.next().ok_or(ParseError::Malformed)?;
    if tokens.next().is_some() {
        return Err(ParseError::Malformed);
    }

    let id: i32 = id_tok.parse().map_err(|_| ParseError::Malformed)?;

    let activate = match state_tok {
        "0" => false,
        "1" => true,
        _ => return Err(ParseError::InvalidState),
    };

    Ok(Command { id, activate })
}
