//! Recoverable errors raised while setting up a run.
//!
//! Kernels never return these: a malformed grid or state reaching a kernel is a
//! precondition failure and panics.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// The configuration file or environment could not be read or deserialised.
    #[error("Failed to load model parameters: {0}")]
    Config(#[from] config::ConfigError),

    /// A parameter is outside the range the boundary kernels accept.
    #[error("Invalid model parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The mesh handed to `Grid::new` violates a connectivity or geometry invariant.
    #[error("Malformed grid: {0}")]
    MalformedGrid(String),
}

impl ModelError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn malformed_grid(reason: impl Into<String>) -> Self {
        Self::MalformedGrid(reason.into())
    }
}
