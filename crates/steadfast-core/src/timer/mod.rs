mod engine;

pub use engine::{ExecutionRecord, ExecutionTimer, TimerSetup, TimerStatus};
