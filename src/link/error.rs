use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("{name} must be between 0 and 1 (got {value})")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("{name} must be a non-negative number of seconds (got {value})")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("on_time and off_time cannot both be zero")]
    DegenerateSchedule,

    #[error("failed to open loss log {}: {source}", path.display())]
    LogOpen {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type LinkResult<T> = Result<T, LinkError>;
