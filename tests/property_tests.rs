//! Property-based tests for the protocol surface and the control core.
//!
//! Host-target only (`proptest` is a `cfg(not(target_os = "espidf"))`
//! dev-dependency).

use mistbank::app::dispatch::dispatch_line;
use mistbank::app::events::StatusEvent;
use mistbank::app::ports::{AutoOffTimerPort, OutputPort, StatusSink};
use mistbank::app::service::NebControl;
use mistbank::config::SystemConfig;
use mistbank::protocol::line::{LineAssembler, MAX_LINE_LEN};
use mistbank::protocol::parser;
use mistbank::registry::{NEB_COUNT, OutputLine, TimerToken};

use proptest::prelude::*;

// ── Minimal mock ports ────────────────────────────────────────

#[derive(Default)]
struct Levels(std::collections::HashMap<i32, bool>);

impl Levels {
    fn level(&self, line: OutputLine) -> bool {
        self.0.get(&line.0).copied().unwrap_or(false)
    }
}

impl OutputPort for Levels {
    fn set_level(&mut self, line: OutputLine, high: bool) {
        self.0.insert(line.0, high);
    }
}

#[derive(Default)]
struct Tokens {
    generations: [u8; NEB_COUNT],
    live: Vec<TimerToken>,
}

impl AutoOffTimerPort for Tokens {
    fn schedule(&mut self, neb: u8, _duration_ms: u32) -> TimerToken {
        let slot = &mut self.generations[(neb - 1) as usize];
        *slot = slot.wrapping_add(1);
        let token = TimerToken {
            neb,
            generation: *slot,
        };
        self.live.push(token);
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        self.live.retain(|&t| t != token);
    }
}

#[derive(Default)]
struct Sink(Vec<String>);

impl StatusSink for Sink {
    fn emit(&mut self, event: StatusEvent) {
        self.0.push(event.to_string());
    }
}

// ── Properties ────────────────────────────────────────────────

proptest! {
    /// The parser is total: no input string panics it.
    #[test]
    fn parser_never_panics(line in ".*") {
        let _ = parser::parse(&line);
    }

    /// Every accepted command is exactly two integer-shaped tokens with a
    /// literal-bit state.
    #[test]
    fn parser_accepts_only_the_grammar(id in -1000i32..1000, state in 0u8..2, pad in " {0,3}") {
        let line = format!("{pad}{id} {state}{pad}");
        let cmd = parser::parse(&line).expect("grammatical line must parse");
        prop_assert_eq!(cmd.id, id);
        prop_assert_eq!(cmd.activate, state == 1);
    }

    /// The assembler never yields a line longer than its capacity, and
    /// never panics, whatever the byte stream.
    #[test]
    fn assembler_lines_stay_bounded(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut asm = LineAssembler::new();
        for byte in bytes {
            if let Some(line) = asm.feed(byte) {
                prop_assert!(line.len() <= MAX_LINE_LEN);
            }
        }
    }

    /// Any sequence of well-formed and garbage commands interleaved with
    /// timer fires keeps state, line level, and pending token in
    /// agreement: active ⇔ line high ⇔ one pending token.
    #[test]
    fn invariant_holds_under_random_sessions(
        steps in proptest::collection::vec((0i32..8, 0u8..3), 1..64),
    ) {
        let mut ctl = NebControl::new(&SystemConfig::default());
        let mut hw = Levels::default();
        let mut timers = Tokens::default();
        let mut sink = Sink::default();

        for (id, action) in steps {
            match action {
                // 0/1 → deactivate/activate command (possibly bad id).
                0 | 1 => {
                    let line = format!("{id} {action}");
                    dispatch_line(line.as_bytes(), &mut ctl, &mut hw, &mut timers, &mut sink);
                }
                // 2 → fire the oldest live timer, as the main loop would.
                _ => {
                    if !timers.live.is_empty() {
                        let token = timers.live.remove(0);
                        ctl.on_timer_fired(token, &mut hw, &mut sink);
                    }
                }
            }

            for neb in ctl.registry().iter() {
                prop_assert_eq!(neb.is_active, hw.level(neb.line));
                prop_assert_eq!(neb.is_active, neb.pending.is_some());
            }
        }
    }

    /// A fire for a cancelled schedule is invisible: no state change, no
    /// status line, no output write.
    #[test]
    fn cancelled_fires_are_invisible(id in 1i32..=NEB_COUNT as i32) {
        let mut ctl = NebControl::new(&SystemConfig::default());
        let mut hw = Levels::default();
        let mut timers = Tokens::default();
        let mut sink = Sink::default();

        dispatch_line(format!("{id} 1").as_bytes(), &mut ctl, &mut hw, &mut timers, &mut sink);
        let stale = *timers.live.last().expect("activation schedules a timer");
        dispatch_line(format!("{id} 0").as_bytes(), &mut ctl, &mut hw, &mut timers, &mut sink);

        let lines_before = sink.0.len();
        ctl.on_timer_fired(stale, &mut hw, &mut sink);

        prop_assert_eq!(sink.0.len(), lines_before, "stale fire must stay silent");
        prop_assert!(!ctl.is_active(id));
    }
}
