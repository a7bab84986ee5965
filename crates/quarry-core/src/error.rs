//! Error types for the Quarry cache client.
//!
//! A read that finds nothing is not an error: `get` returns `Ok(None)` for
//! a miss, and these variants cover everything else. None of them are
//! retried internally; retry policy belongs to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Configuration errors
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    // Read-path errors
    /// The service responded, but with a status that is neither a hit (200)
    /// nor a miss (404).
    #[error("HTTP error: {status}")]
    Protocol { status: u16 },

    /// The service could not be reached, or the connection failed mid-flight.
    /// `code` carries the underlying io fault kind when one is known.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        code: Option<String>,
    },

    /// The exchange succeeded but the body could not be decompressed or
    /// parsed.
    #[error("Decode error: {0}")]
    Decode(String),

    // Write-path errors
    #[error("Encode error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = Error::Protocol { status: 500 };
        assert_eq!(err.to_string(), "HTTP error: 500");
    }

    #[test]
    fn test_transport_error_keeps_code() {
        let err = Error::Transport {
            message: "connection refused".to_string(),
            code: Some("ConnectionRefused".to_string()),
        };
        match err {
            Error::Transport { code, .. } => {
                assert_eq!(code.as_deref(), Some("ConnectionRefused"))
            }
            _ => panic!("wrong variant"),
        }
    }
}
