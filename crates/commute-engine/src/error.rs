//! Error types for commute-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Empty window: {0}")]
    EmptyWindow(String),

    #[error("Invalid sample data: {0}")]
    InvalidSamples(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
