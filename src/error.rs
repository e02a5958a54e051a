//! Error types for network and firewall operations.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    #[error("No non-loopback interfaces found")]
    NoInterfaces,

    #[error("Rules file not found: {}", .0.display())]
    RulesFileNotFound(PathBuf),

    #[error("Input closed before an answer was given")]
    InputClosed,

    #[error("Failed to render netplan config: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AdminError>;
