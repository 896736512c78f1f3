//! Error types for the certificate generator

use thiserror::Error;

use crate::Field;

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing, rendering or exporting a certificate
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required fields are empty
    #[error("Required fields are empty: {}", join_fields(.0))]
    ValidationIncomplete(Vec<Field>),

    /// An export was requested while another one is running
    #[error("An export is already in progress")]
    ExportInProgress,

    /// The print flow could not acquire a new window/context
    #[error("Export environment unavailable: {0}")]
    ExportEnvironmentUnavailable(String),

    /// Capturing the certificate or embedding it into the document failed
    #[error("Rasterization failed: {0}")]
    RasterizationFailure(String),

    /// Failed to render the certificate
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The session event loop is gone
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_wire_names() {
        let err = Error::ValidationIncomplete(vec![Field::ParticipantName, Field::Date]);
        assert_eq!(
            err.to_string(),
            "Required fields are empty: participantName, date"
        );
    }
}
