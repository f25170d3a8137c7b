//! Error types shared by the backend clients and startup code.

use thiserror::Error;

/// Everything that can go wrong outside the interactive field tree.
#[derive(Debug, Error)]
pub enum BacklogError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The tracking service answered with a non-success status.
    #[error("unexpected response status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A required piece of session configuration is absent.
    #[error("missing {0}; set it on the command line or in the environment")]
    MissingCredential(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BacklogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_setting() {
        let err = BacklogError::MissingCredential("AZURE_PAT");
        assert!(err.to_string().contains("AZURE_PAT"));
    }

    #[test]
    fn status_error_carries_body() {
        let err = BacklogError::Status { status: 401, body: "unauthorized".to_string() };
        assert_eq!(err.to_string(), "unexpected response status 401: unauthorized");
    }
}
