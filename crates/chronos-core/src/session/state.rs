//! Observation session state.
//!
//! A [`Session`] is a plain data snapshot: the engine mutates it, consumers
//! (CLI renderer, report generator) only read it. All accumulators are
//! indexed by taxonomy id, one slot per configured variant.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::taxonomy::{ActionId, ModeId, Taxonomy};

/// Maximum number of retained log entries. Oldest evicted on overflow.
pub const LOG_CAPACITY: usize = 50;

/// Milliseconds without a mutating user action before the session counts
/// as idle (5 minutes).
pub const IDLE_AFTER_MS: i64 = 300_000;

/// Observer-set rating of student focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EngagementLevel {
    Low,
    #[default]
    Mid,
    High,
}

impl EngagementLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EngagementLevel::Low => "LOW",
            EngagementLevel::Mid => "MID",
            EngagementLevel::High => "HIGH",
        }
    }

    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Some(EngagementLevel::Low),
            "MID" => Some(EngagementLevel::Mid),
            "HIGH" => Some(EngagementLevel::High),
            _ => None,
        }
    }
}

/// What kind of event a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    ModeChange,
    ActionTap,
    ActionTimerToggle,
    EngagementChange,
    Note,
}

/// Immutable record of one observer event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// The whole observation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub active: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// At most one mode accumulating at a time.
    pub current_mode: Option<ModeId>,
    /// At most one action under long-press timing, independent of the mode.
    pub current_timed_action: Option<ActionId>,
    /// Seconds per mode, indexed by `ModeId`.
    pub mode_durations: Vec<u64>,
    /// Tap counts per action, indexed by `ActionId`.
    pub action_counts: Vec<u64>,
    /// Timed seconds per action, indexed by `ActionId`.
    pub action_durations: Vec<u64>,
    pub engagement: EngagementLevel,
    pub log: VecDeque<LogEntry>,
    pub last_activity_at: DateTime<Utc>,
    /// Derived on every tick from `last_activity_at`; never set by user actions.
    pub idle: bool,
}

impl Session {
    /// The single default-session factory: used at engine construction and
    /// on reset, so the zeroed defaults cannot drift apart.
    pub fn fresh(taxonomy: &Taxonomy, now: DateTime<Utc>) -> Self {
        Self {
            active: false,
            started_at: None,
            ended_at: None,
            current_mode: None,
            current_timed_action: None,
            mode_durations: vec![0; taxonomy.mode_count()],
            action_counts: vec![0; taxonomy.action_count()],
            action_durations: vec![0; taxonomy.action_count()],
            engagement: EngagementLevel::default(),
            log: VecDeque::with_capacity(LOG_CAPACITY),
            last_activity_at: now,
            idle: false,
        }
    }

    pub fn mode_duration(&self, id: ModeId) -> u64 {
        self.mode_durations[id.index()]
    }

    pub fn action_count(&self, id: ActionId) -> u64 {
        self.action_counts[id.index()]
    }

    pub fn action_duration(&self, id: ActionId) -> u64 {
        self.action_durations[id.index()]
    }

    /// Append a log entry, evicting the oldest once the cap is reached.
    pub(crate) fn push_log(
        &mut self,
        timestamp: DateTime<Utc>,
        kind: LogKind,
        label: String,
        value: Option<String>,
    ) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            id: Uuid::new_v4(),
            timestamp,
            kind,
            label,
            value,
        });
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity_at = now;
    }
}
