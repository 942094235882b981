mod engine;
mod gesture;
mod state;

pub use engine::SessionEngine;
pub use gesture::{Gesture, PressTracker, LONG_PRESS_MS};
pub use state::{
    EngagementLevel, LogEntry, LogKind, Session, IDLE_AFTER_MS, LOG_CAPACITY,
};
