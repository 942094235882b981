//! # Chronos Core Library
//!
//! Core business logic for Chronos, a classroom-observation timing tool.
//! An observer toggles teaching modes and actions during a live lesson; the
//! engine accumulates durations and counts, keeps a bounded event log, and a
//! report generator serializes the finished session to text. Presentation
//! layers (the CLI in this workspace, or a GUI) are thin consumers of the
//! same core.
//!
//! ## Architecture
//!
//! - **Session Engine**: a caller-driven state machine. The host schedules a
//!   1 Hz tick while the session is active and invokes `tick()`; all
//!   mutation goes through one single-threaded path.
//! - **Taxonomy**: the mode/action sets are closed enumerations configured
//!   in TOML rather than hard-coded enums.
//! - **Report**: deterministic plain-text output with a golden-tested
//!   format.
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: session state machine and mutation operations
//! - [`Taxonomy`]: validated mode/action sets
//! - [`Clock`]: injectable time source, fakeable in tests
//! - [`Config`]: TOML configuration management

pub mod clock;
pub mod config;
pub mod error;
pub mod report;
pub mod session;
pub mod taxonomy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ConfigError, CoreError, TaxonomyError};
pub use session::{
    EngagementLevel, Gesture, LogEntry, LogKind, PressTracker, Session, SessionEngine,
    IDLE_AFTER_MS, LOG_CAPACITY, LONG_PRESS_MS,
};
pub use taxonomy::{ActionDef, ActionId, ModeDef, ModeId, Taxonomy};
