//! Error types and handling for the `EventRisk` application

use thiserror::Error;

/// Main error type for the `EventRisk` library
#[derive(Error, Debug)]
pub enum EventRiskError {
    /// The geocoder returned no match for the requested place
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    /// Remote call failed (timeout, non-success status, network or decode error)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl EventRiskError {
    /// Create a new location-not-found error
    pub fn location_not_found<S: Into<String>>(query: S) -> Self {
        Self::LocationNotFound {
            query: query.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            EventRiskError::LocationNotFound { query } => {
                format!("Location not found: {query}. Please try again.")
            }
            EventRiskError::Transport { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            EventRiskError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            EventRiskError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            EventRiskError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for EventRiskError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport(format!("request timed out: {err}"))
        } else {
            Self::transport(err.to_string())
        }
    }
}
