//! Error types for chart calculation and its collaborators.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the place-name lookup collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Coordinates not found for the place: {place}")]
    NotFound { place: String },
    #[error("Geocoding service failed for {place}: {message}")]
    Unavailable { place: String, message: String },
}

/// Errors raised by the ephemeris collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Invalid ayanamsa: {ayanamsa}. Valid ayanamsas: {valid:?}")]
    InvalidAyanamsa { ayanamsa: String, valid: Vec<String> },
    #[error("Failed to calculate position for {body} at JD {julian_day}: {message}")]
    CalculationFailed {
        body: String,
        julian_day: f64,
        message: String,
    },
}

/// Errors raised by the conversational backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("Chat backend rejected the request: {0}")]
    Rejected(String),
    #[error("Chat backend returned an empty response")]
    EmptyResponse,
    #[error("Chat backend unreachable: {0}")]
    Transport(String),
    #[error("Chat backend sent an unreadable response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum KundaliError {
    #[error("Incorrect date or time format: '{input}'. Expected YYYY-MM-DD for date and HH:MM for time.")]
    InputFormat { input: String },
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("{collaborator} did not respond within {after:?}")]
    Timeout {
        collaborator: &'static str,
        after: Duration,
    },
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Internal invariant violated: {0}")]
    Logic(String),
}

impl KundaliError {
    /// True when the caller can fix the failure by correcting the request.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            KundaliError::InputFormat { .. }
                | KundaliError::Lookup(_)
                | KundaliError::Ephemeris(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_distinguished_from_defects() {
        let input = KundaliError::InputFormat { input: "31-12-1990".to_string() };
        let lookup: KundaliError = LookupError::NotFound { place: "Atlantis".to_string() }.into();
        let logic = KundaliError::Logic("lord missing".to_string());
        assert!(input.is_input_error());
        assert!(lookup.is_input_error());
        assert!(!logic.is_input_error());
        assert!(!KundaliError::Configuration("chat.api_key is not set".to_string()).is_input_error());
    }

    #[test]
    fn test_lookup_message_names_place() {
        let err: KundaliError = LookupError::NotFound { place: "Atlantis".to_string() }.into();
        assert_eq!(err.to_string(), "Coordinates not found for the place: Atlantis");
    }
}
