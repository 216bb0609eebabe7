use thiserror::Error;

/// Core scheduling errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid start time (expected HH:MM): {0}")]
    InvalidStartTime(String),

    #[error("Interval must be between 1 and 24 hours, got {0}")]
    IntervalOutOfRange(u32),

    #[error("Schedule span out of range: {0}")]
    SpanOutOfRange(String),

    #[error("Month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
