//! Invariant properties over arbitrary operation sequences.

use std::sync::Arc;

use chrono::TimeZone;
use chronos_core::{
    EngagementLevel, ManualClock, SessionEngine, Taxonomy, LOG_CAPACITY,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Start,
    Stop,
    ToggleMode(usize),
    RecordAction(usize),
    ToggleTiming(usize),
    SetEngagement(u8),
    AddNote(String),
    Tick,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Stop),
        (0usize..4).prop_map(Op::ToggleMode),
        (0usize..5).prop_map(Op::RecordAction),
        (0usize..5).prop_map(Op::ToggleTiming),
        (0u8..3).prop_map(Op::SetEngagement),
        "[ a-z]{0,8}".prop_map(Op::AddNote),
        Just(Op::Tick),
        Just(Op::Reset),
    ]
}

fn apply(engine: &mut SessionEngine, clock: &ManualClock, op: &Op) {
    let modes: Vec<_> = engine.taxonomy().modes().map(|(id, _)| id).collect();
    let actions: Vec<_> = engine.taxonomy().actions().map(|(id, _)| id).collect();
    match op {
        Op::Start => {
            engine.start();
        }
        Op::Stop => {
            engine.stop();
        }
        Op::ToggleMode(i) => {
            engine.toggle_mode(modes[*i]);
        }
        Op::RecordAction(i) => {
            engine.record_action(actions[*i]);
        }
        Op::ToggleTiming(i) => {
            engine.toggle_action_timing(actions[*i]);
        }
        Op::SetEngagement(i) => {
            let level = match i {
                0 => EngagementLevel::Low,
                1 => EngagementLevel::Mid,
                _ => EngagementLevel::High,
            };
            engine.set_engagement(level);
        }
        Op::AddNote(text) => {
            engine.add_note(text);
        }
        Op::Tick => {
            clock.advance_secs(1);
            engine.tick();
        }
        Op::Reset => {
            engine.reset();
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_for_any_operation_sequence(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let clock = ManualClock::new(chrono::Utc.with_ymd_and_hms(2024, 5, 1, 1, 0, 0).unwrap());
        let mut engine = SessionEngine::new(Taxonomy::classroom_default(), Arc::new(clock.clone()));

        // Ticks counted only while active with a mode / timed action selected.
        let mut mode_ticks: u64 = 0;
        let mut action_ticks: u64 = 0;

        for op in &ops {
            if matches!(op, Op::Tick) && engine.is_active() {
                if engine.session().current_mode.is_some() {
                    mode_ticks += 1;
                }
                if engine.session().current_timed_action.is_some() {
                    action_ticks += 1;
                }
            }
            if matches!(op, Op::Reset) {
                mode_ticks = 0;
                action_ticks = 0;
            }
            apply(&mut engine, &clock, op);

            let s = engine.session();
            // At most one mode and one timed action at any instant, and
            // neither survives outside an active session.
            if !s.active {
                prop_assert!(s.current_mode.is_none());
                prop_assert!(s.current_timed_action.is_none());
            }
            prop_assert!(s.log.len() <= LOG_CAPACITY);
            // Duration sums account 1:1 for the ticks that had a selection.
            prop_assert_eq!(s.mode_durations.iter().sum::<u64>(), mode_ticks);
            prop_assert_eq!(s.action_durations.iter().sum::<u64>(), action_ticks);
        }
    }

    #[test]
    fn reset_always_zeroes(ops in prop::collection::vec(op_strategy(), 0..100)) {
        let clock = ManualClock::new(chrono::Utc.with_ymd_and_hms(2024, 5, 1, 1, 0, 0).unwrap());
        let mut engine = SessionEngine::new(Taxonomy::classroom_default(), Arc::new(clock.clone()));

        for op in &ops {
            apply(&mut engine, &clock, op);
        }
        engine.reset();

        let s = engine.session();
        prop_assert!(!s.active);
        prop_assert!(s.started_at.is_none() && s.ended_at.is_none());
        prop_assert!(s.mode_durations.iter().all(|&d| d == 0));
        prop_assert!(s.action_counts.iter().all(|&c| c == 0));
        prop_assert!(s.action_durations.iter().all(|&d| d == 0));
        prop_assert!(s.log.is_empty());
    }
}
