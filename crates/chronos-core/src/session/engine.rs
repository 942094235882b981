//! Session engine implementation.
//!
//! The engine is a caller-driven state machine. It does not own a timer
//! thread -- whoever hosts it must invoke `tick()` once per second while the
//! session is active, and must not tick while inactive.
//!
//! ## State transitions
//!
//! ```text
//! Idle --start()--> Active --stop()--> Idle(ended)
//! ```
//!
//! `reset()` returns to a fresh Idle from either state. Within Active,
//! `current_mode` and `current_timed_action` are two independent sub-machines,
//! each `{None, variant..}`, collapsing to `None` on re-selecting the same
//! variant.
//!
//! Every operation returns `bool`: `false` means the call violated its
//! precondition and was a documented no-op. Operations never error.

use std::sync::Arc;

use crate::clock::Clock;
use crate::session::state::{EngagementLevel, LogKind, Session, IDLE_AFTER_MS};
use crate::taxonomy::{ActionId, ModeId, Taxonomy};

type Subscriber = Box<dyn FnMut(&Session) + Send>;

/// Owns the session state and the single mutation path into it.
///
/// All mutation is single-threaded: user operations and tick are
/// equally-privileged events serialized by the caller. After every mutation
/// the new snapshot is published to subscribers in registration order.
pub struct SessionEngine {
    taxonomy: Taxonomy,
    clock: Arc<dyn Clock>,
    session: Session,
    subscribers: Vec<Subscriber>,
}

impl SessionEngine {
    pub fn new(taxonomy: Taxonomy, clock: Arc<dyn Clock>) -> Self {
        let session = Session::fresh(&taxonomy, clock.now());
        Self {
            taxonomy,
            clock,
            session,
            subscribers: Vec::new(),
        }
    }

    pub fn with_system_clock(taxonomy: Taxonomy) -> Self {
        Self::new(taxonomy, Arc::new(crate::clock::SystemClock))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    /// Register an observer. It receives every snapshot published after
    /// registration, in order.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the observation. No-op if already active.
    pub fn start(&mut self) -> bool {
        if self.session.active {
            return false;
        }
        let now = self.clock.now();
        self.session.active = true;
        self.session.started_at = Some(now);
        self.session.touch(now);
        self.session
            .push_log(now, LogKind::ModeChange, "觀課開始".to_string(), None);
        self.publish();
        true
    }

    /// End the observation. Clears the running mode and action timers but
    /// preserves every accumulator for reporting. No-op if inactive.
    pub fn stop(&mut self) -> bool {
        if !self.session.active {
            return false;
        }
        let now = self.clock.now();
        self.session.active = false;
        self.session.ended_at = Some(now);
        self.session.current_mode = None;
        self.session.current_timed_action = None;
        self.session.touch(now);
        self.publish();
        true
    }

    /// Select or deselect a teaching mode. Re-selecting the current mode
    /// stops it; selecting another switches in one transition. Ignored while
    /// inactive.
    pub fn toggle_mode(&mut self, mode: ModeId) -> bool {
        if !self.session.active || !self.taxonomy.contains_mode(mode) {
            return false;
        }
        let now = self.clock.now();
        let switching = self.session.current_mode != Some(mode);
        let label = self.taxonomy.mode(mode).label.clone();
        let text = if switching {
            format!("切換模式: {label}")
        } else {
            format!("停止模式: {label}")
        };
        self.session.current_mode = if switching { Some(mode) } else { None };
        self.session.touch(now);
        self.session.push_log(now, LogKind::ModeChange, text, None);
        self.publish();
        true
    }

    /// Count one discrete occurrence of an action (a tap). Never affects the
    /// action timer. Ignored while inactive.
    pub fn record_action(&mut self, action: ActionId) -> bool {
        if !self.session.active || !self.taxonomy.contains_action(action) {
            return false;
        }
        let now = self.clock.now();
        self.session.action_counts[action.index()] += 1;
        let label = self.taxonomy.action(action).label.clone();
        self.session.touch(now);
        self.session
            .push_log(now, LogKind::ActionTap, format!("行為次數: {label}"), None);
        self.publish();
        true
    }

    /// Start or stop timing an action (a hold). Mirror of `toggle_mode` on
    /// the independent action axis. Ignored while inactive.
    pub fn toggle_action_timing(&mut self, action: ActionId) -> bool {
        if !self.session.active || !self.taxonomy.contains_action(action) {
            return false;
        }
        let now = self.clock.now();
        let starting = self.session.current_timed_action != Some(action);
        let label = self.taxonomy.action(action).label.clone();
        let text = if starting {
            format!("開始計時行為: {label}")
        } else {
            format!("停止計時行為: {label}")
        };
        self.session.current_timed_action = if starting { Some(action) } else { None };
        self.session.touch(now);
        self.session
            .push_log(now, LogKind::ActionTimerToggle, text, None);
        self.publish();
        true
    }

    /// Record the observer's running focus assessment. Allowed even while
    /// inactive.
    pub fn set_engagement(&mut self, level: EngagementLevel) -> bool {
        let now = self.clock.now();
        self.session.engagement = level;
        self.session.touch(now);
        self.session.push_log(
            now,
            LogKind::EngagementChange,
            format!("專注度: {}", level.as_str()),
            Some(level.as_str().to_string()),
        );
        self.publish();
        true
    }

    /// Append a qualitative note. Empty or whitespace-only text is silently
    /// dropped; ignored while inactive.
    pub fn add_note(&mut self, text: &str) -> bool {
        if !self.session.active {
            return false;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        let now = self.clock.now();
        self.session.touch(now);
        self.session.push_log(
            now,
            LogKind::Note,
            "質性紀錄".to_string(),
            Some(trimmed.to_string()),
        );
        self.publish();
        true
    }

    /// One-second tick. Accrues the current mode and timed action, and
    /// recomputes the idle flag. The driver must only call this while the
    /// session is active; a stray call while inactive is a no-op.
    pub fn tick(&mut self) -> bool {
        if !self.session.active {
            return false;
        }
        if let Some(mode) = self.session.current_mode {
            self.session.mode_durations[mode.index()] += 1;
        }
        if let Some(action) = self.session.current_timed_action {
            self.session.action_durations[action.index()] += 1;
        }
        let now = self.clock.now();
        let since_activity = now
            .signed_duration_since(self.session.last_activity_at)
            .num_milliseconds();
        self.session.idle = since_activity > IDLE_AFTER_MS;
        self.publish();
        true
    }

    /// Discard the session and begin a fresh zeroed one.
    pub fn reset(&mut self) -> bool {
        self.session = Session::fresh(&self.taxonomy, self.clock.now());
        self.publish();
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn publish(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber(&self.session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn engine() -> (SessionEngine, ManualClock) {
        let clock = ManualClock::new(chrono::Utc.with_ymd_and_hms(2024, 5, 1, 1, 0, 0).unwrap());
        let engine = SessionEngine::new(Taxonomy::classroom_default(), Arc::new(clock.clone()));
        (engine, clock)
    }

    #[test]
    fn start_is_idempotent() {
        let (mut engine, _) = engine();
        assert!(engine.start());
        let started_at = engine.session().started_at;
        assert!(!engine.start());
        assert_eq!(engine.session().started_at, started_at);
        assert_eq!(engine.session().log.len(), 1);
        assert_eq!(engine.session().log[0].label, "觀課開始");
    }

    #[test]
    fn stop_is_idempotent_and_preserves_accumulators() {
        let (mut engine, clock) = engine();
        let lecture = engine.taxonomy().mode_id("lecture").unwrap();
        engine.start();
        engine.toggle_mode(lecture);
        for _ in 0..3 {
            clock.advance_secs(1);
            engine.tick();
        }
        assert!(engine.stop());
        assert!(engine.session().current_mode.is_none());
        assert!(engine.session().ended_at.is_some());
        assert_eq!(engine.session().mode_duration(lecture), 3);

        let ended_at = engine.session().ended_at;
        assert!(!engine.stop());
        assert_eq!(engine.session().ended_at, ended_at);
    }

    #[test]
    fn mode_switch_is_a_single_transition() {
        let (mut engine, _) = engine();
        let lecture = engine.taxonomy().mode_id("lecture").unwrap();
        let discussion = engine.taxonomy().mode_id("discussion").unwrap();
        engine.start();

        engine.toggle_mode(lecture);
        assert_eq!(engine.session().current_mode, Some(lecture));

        engine.toggle_mode(discussion);
        assert_eq!(engine.session().current_mode, Some(discussion));
        assert_eq!(
            engine.session().log.back().unwrap().label,
            "切換模式: 小組討論"
        );

        engine.toggle_mode(discussion);
        assert!(engine.session().current_mode.is_none());
        assert_eq!(
            engine.session().log.back().unwrap().label,
            "停止模式: 小組討論"
        );
    }

    #[test]
    fn operations_are_gated_while_inactive() {
        let (mut engine, _) = engine();
        let lecture = engine.taxonomy().mode_id("lecture").unwrap();
        let patrol = engine.taxonomy().action_id("patrol").unwrap();

        assert!(!engine.toggle_mode(lecture));
        assert!(!engine.record_action(patrol));
        assert!(!engine.toggle_action_timing(patrol));
        assert!(!engine.add_note("before start"));
        assert!(!engine.tick());
        assert!(engine.session().log.is_empty());
    }

    #[test]
    fn engagement_is_allowed_while_inactive() {
        let (mut engine, _) = engine();
        assert!(engine.set_engagement(EngagementLevel::High));
        assert_eq!(engine.session().engagement, EngagementLevel::High);
        let entry = engine.session().log.back().unwrap();
        assert_eq!(entry.label, "專注度: HIGH");
        assert_eq!(entry.value.as_deref(), Some("HIGH"));
    }

    #[test]
    fn blank_notes_are_dropped() {
        let (mut engine, _) = engine();
        engine.start();
        assert!(!engine.add_note("   "));
        assert!(engine.add_note("  ok  "));
        let entry = engine.session().log.back().unwrap();
        assert_eq!(entry.label, "質性紀錄");
        assert_eq!(entry.value.as_deref(), Some("ok"));
    }

    #[test]
    fn tick_flags_idle_after_five_minutes() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(IDLE_AFTER_MS);
        engine.tick();
        assert!(!engine.session().idle);
        clock.advance_ms(1);
        engine.tick();
        assert!(engine.session().idle);

        // Activity clears the flag on the next tick, not immediately.
        let patrol = engine.taxonomy().action_id("patrol").unwrap();
        engine.record_action(patrol);
        assert!(engine.session().idle);
        engine.tick();
        assert!(!engine.session().idle);
    }

    #[test]
    fn reset_discards_everything() {
        let (mut engine, clock) = engine();
        let lecture = engine.taxonomy().mode_id("lecture").unwrap();
        engine.start();
        engine.toggle_mode(lecture);
        clock.advance_secs(1);
        engine.tick();
        engine.set_engagement(EngagementLevel::Low);

        engine.reset();
        let s = engine.session();
        assert!(!s.active);
        assert!(s.started_at.is_none() && s.ended_at.is_none());
        assert_eq!(s.mode_duration(lecture), 0);
        assert_eq!(s.engagement, EngagementLevel::Mid);
        assert!(s.log.is_empty());
    }

    #[test]
    fn subscribers_see_every_snapshot_in_order() {
        use std::sync::{Arc as StdArc, Mutex};

        let (mut engine, clock) = engine();
        let seen: StdArc<Mutex<Vec<bool>>> = StdArc::default();
        let sink = StdArc::clone(&seen);
        engine.subscribe(Box::new(move |s| sink.lock().unwrap().push(s.active)));

        engine.start();
        clock.advance_secs(1);
        engine.tick();
        engine.stop();
        assert_eq!(*seen.lock().unwrap(), vec![true, true, false]);
    }
}
