//! Command dispatcher: one assembled line in, at most one state change out.
//!
//! Stateless glue between the protocol surface and the control core.  Any
//! failure — bad UTF-8, bad syntax, out-of-range id — becomes a single
//! diagnostic status line and the input is dropped; no error propagates
//! further and no actuator is touched.

use log::debug;

use crate::error::{Error, ParseError};
use crate::protocol::parser;

use super::events::StatusEvent;
use super::ports::{AutoOffTimerPort, OutputPort, StatusSink};
use super::service::NebControl;

/// Parse `raw` and apply it to the control core.
pub fn dispatch_line(
    raw: &[u8],
    ctl: &mut NebControl,
    hw: &mut impl OutputPort,
    timers: &mut impl AutoOffTimerPort,
    sink: &mut impl StatusSink,
) {
    let result = core::str::from_utf8(raw)
        .map_err(|_| Error::from(ParseError::Malformed))
        .and_then(|line| parser::parse(line).map_err(Error::from))
        .and_then(|cmd| {
            ctl.set_state(cmd.id, cmd.activate, hw, timers, sink)
                .map_err(Error::from)
        });

    if let Err(err) = result {
        debug!("command dropped: {err}");
        sink.emit(StatusEvent::Rejected(err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::registry::{OutputLine, TimerToken};

    struct NullOutput;
    impl OutputPort for NullOutput {
        fn set_level(&mut self, _line: OutputLine, _high: bool) {}
    }

    struct CountingTimers {
        generation: u8,
    }
    impl AutoOffTimerPort for CountingTimers {
        fn schedule(&mut self, neb: u8, _duration_ms: u32) -> TimerToken {
            self.generation = self.generation.wrapping_add(1);
            TimerToken {
                neb,
                generation: self.generation,
            }
        }
        fn cancel(&mut self, _token: TimerToken) {}
    }

    struct RecordingSink(Vec<String>);
    impl StatusSink for RecordingSink {
        fn emit(&mut self, event: StatusEvent) {
            self.0.push(event.to_string());
        }
    }

    fn harness() -> (NebControl, NullOutput, CountingTimers, RecordingSink) {
        (
            NebControl::new(&SystemConfig::default()),
            NullOutput,
            CountingTimers { generation: 0 },
            RecordingSink(Vec::new()),
        )
    }

    #[test]
    fn valid_command_reaches_the_core() {
        let (mut ctl, mut hw, mut timers, mut sink) = harness();
        dispatch_line(b"3 1", &mut ctl, &mut hw, &mut timers, &mut sink);
        assert!(ctl.is_active(3));
        assert_eq!(sink.0, ["Nebulizer 3 started"]);
    }

    #[test]
    fn malformed_line_yields_format_diagnostic() {
        let (mut ctl, mut hw, mut timers, mut sink) = harness();
        dispatch_line(b"abc", &mut ctl, &mut hw, &mut timers, &mut sink);
        assert_eq!(ctl.active_count(), 0);
        assert_eq!(sink.0, ["Error: invalid command format"]);
    }

    #[test]
    fn bad_state_token_yields_state_diagnostic() {
        let (mut ctl, mut hw, mut timers, mut sink) = harness();
        dispatch_line(b"3 2", &mut ctl, &mut hw, &mut timers, &mut sink);
        assert_eq!(ctl.active_count(), 0);
        assert_eq!(sink.0, ["Error: state must be 0 or 1"]);
    }

    #[test]
    fn out_of_range_id_yields_range_diagnostic() {
        let (mut ctl, mut hw, mut timers, mut sink) = harness();
        dispatch_line(b"6 1", &mut ctl, &mut hw, &mut timers, &mut sink);
        assert_eq!(ctl.active_count(), 0);
        assert_eq!(sink.0, ["Error: nebulizer id must be between 1 and 5"]);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let (mut ctl, mut hw, mut timers, mut sink) = harness();
        dispatch_line(&[0xff, 0xfe], &mut ctl, &mut hw, &mut timers, &mut sink);
        assert_eq!(sink.0, ["Error: invalid command format"]);
    }

    #[test]
    fn empty_line_is_malformed() {
        // The trailing half of a CRLF pair lands here.
        let (mut ctl, mut hw, mut timers, mut sink) = harness();
        dispatch_line(b"", &mut ctl, &mut hw, &mut timers, &mut sink);
        assert_eq!(sink.0, ["Error: invalid command format"]);
    }
}
