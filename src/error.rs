//! Error types and handling for the `pogoda` application

use thiserror::Error;

/// Main error type for the `pogoda` application
#[derive(Error, Debug)]
pub enum PogodaError {
    /// Lookup returned no usable result (empty geocoding result, no address)
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Upstream service answered with a non-success HTTP status
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    /// Transport-level failure talking to an upstream service
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// Upstream payload could not be interpreted
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PogodaError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new upstream error from an HTTP status
    pub fn upstream<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
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

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PogodaError::NotFound { message } => format!("Nie znaleziono: {message}"),
            PogodaError::Upstream { status, .. } => {
                format!("Serwis pogodowy zwrócił błąd (HTTP {status}).")
            }
            PogodaError::Network { .. } => {
                "Brak połączenia z serwisem pogodowym. Sprawdź połączenie z internetem.".to_string()
            }
            PogodaError::Parse { .. } => "Otrzymano niepoprawne dane z serwisu.".to_string(),
            PogodaError::Validation { message } => format!("Niepoprawne dane wejściowe: {message}"),
            PogodaError::Config { .. } => {
                "Błąd konfiguracji. Sprawdź plik konfiguracyjny.".to_string()
            }
            PogodaError::Cache { .. } => "Błąd pamięci podręcznej.".to_string(),
            PogodaError::Io { .. } => "Błąd operacji na pliku.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let not_found = PogodaError::not_found("Atlantis");
        assert!(matches!(not_found, PogodaError::NotFound { .. }));

        let upstream = PogodaError::upstream(503, "unavailable");
        assert!(matches!(upstream, PogodaError::Upstream { status: 503, .. }));

        let validation = PogodaError::validation("invalid coordinates");
        assert!(matches!(validation, PogodaError::Validation { .. }));
    }

    #[test]
    fn test_display_includes_status() {
        let err = PogodaError::upstream(404, "no such endpoint");
        assert_eq!(err.to_string(), "Upstream error (HTTP 404): no such endpoint");
    }

    #[test]
    fn test_user_messages() {
        let not_found = PogodaError::not_found("Atlantis");
        assert!(not_found.user_message().contains("Atlantis"));

        let upstream = PogodaError::upstream(500, "boom");
        assert!(upstream.user_message().contains("HTTP 500"));

        let validation = PogodaError::validation("pusta lokalizacja");
        assert!(validation.user_message().contains("pusta lokalizacja"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PogodaError = io_err.into();
        assert!(matches!(err, PogodaError::Io { .. }));
    }
}
