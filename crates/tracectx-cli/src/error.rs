//! Error types for the tracectx CLI.

use thiserror::Error;
use tracectx_core::ContextError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing required CI context: {0} is not set and no flag was given")]
    MissingContext(&'static str),

    #[error("Invalid traceparent: {0}")]
    Traceparent(#[from] ContextError),

    #[error("Failed to write {destination}: {source}")]
    Output {
        destination: String,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;
