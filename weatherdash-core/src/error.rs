//! Error types shared by the resolver, providers and configuration.

use thiserror::Error;

/// Errors surfaced by the dashboard core.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A real backend was selected but its credential is missing.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Transport failure, timeout or non-2xx status from a remote service.
    #[error("{operation}: remote service unavailable: {message}")]
    RemoteUnavailable { operation: String, message: String },

    /// A remote service answered with a body we could not interpret.
    #[error("{operation}: malformed response: {message}")]
    MalformedResponse { operation: String, message: String },

    /// Input outside the accepted domain (e.g. coordinates out of range).
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl DashboardError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn remote<O: Into<String>, S: Into<String>>(operation: O, message: S) -> Self {
        Self::RemoteUnavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn malformed<O: Into<String>, S: Into<String>>(operation: O, message: S) -> Self {
        Self::MalformedResponse {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Message suitable for showing to an end user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::Configuration { .. } => {
                "Configuration error. Run `weatherdash configure openweather` \
                 or unset the provider."
            }
            DashboardError::RemoteUnavailable { .. } => {
                "Unable to load weather data. Please check your connection and try again."
            }
            DashboardError::MalformedResponse { .. } => {
                "The weather service returned unexpected data. Please try again later."
            }
            DashboardError::Validation { .. } => "Invalid location coordinates.",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_operation() {
        let err = DashboardError::remote("forecast", "status 502");
        assert_eq!(err.to_string(), "forecast: remote service unavailable: status 502");
    }

    #[test]
    fn user_message_per_variant() {
        assert!(DashboardError::configuration("x").user_message().contains("configure"));
        assert!(DashboardError::remote("a", "b").user_message().contains("Unable to load"));
        assert!(DashboardError::validation("x").user_message().contains("coordinates"));
    }
}
