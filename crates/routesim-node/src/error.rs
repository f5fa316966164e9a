//! Error types for the node driver.

use crate::input::InputError;

/// Errors that can occur while configuring or running the driver.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("no packet input file configured")]
    NoInputFile,
}
