/*!
 * Error types for the pagevoice application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication or API key configuration
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Check whether this error reflects a persistent service misconfiguration
    /// (bad or missing API key) rather than a transient failure.
    ///
    /// Structured kinds are checked first; the substring scan is a documented
    /// fallback for providers that only surface message strings.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::AuthenticationError(_) => true,
            Self::ApiError { status_code, .. } if *status_code == 401 || *status_code == 403 => true,
            other => {
                let message = other.to_string().to_lowercase();
                message.contains("api key")
                    || message.contains("unauthorized")
                    || message.contains("permission denied")
                    || message.contains("not initialized")
            }
        }
    }
}

/// Errors that can occur during page content extraction
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The page yielded no usable text after filtering and normalization
    #[error("No readable text was found on the page")]
    EmptyContent,

    /// The page source could not be loaded at all
    #[error("Failed to load page: {0}")]
    PageUnavailable(String),
}

/// Speech synthesis error taxonomy surfaced by the speech controller.
///
/// Each variant maps to a distinct user-facing message; `Unknown` carries the
/// raw platform error code for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// Network failure while synthesizing speech
    #[error("A network error interrupted speech synthesis")]
    Network,

    /// The platform failed to synthesize the utterance
    #[error("Speech synthesis failed")]
    SynthesisFailed,

    /// Synthesis is not available on this platform
    #[error("Speech synthesis is not available")]
    SynthesisUnavailable,

    /// No voice supports the requested language
    #[error("The requested language is not available for speech")]
    LanguageUnavailable,

    /// No usable voice could be selected (including an empty catalog)
    #[error("No speech voices are available")]
    VoiceUnavailable,

    /// The utterance text exceeds the platform limit
    #[error("The text is too long to read aloud")]
    TextTooLong,

    /// The utterance request was malformed
    #[error("Invalid speech request")]
    InvalidArgument,

    /// Unclassified platform error, carrying the raw error code
    #[error("Speech synthesis failed with platform error: {0}")]
    Unknown(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from page content extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Persistent misconfiguration of the summarization service; summarize
    /// and translate stay disabled until the condition is resolved
    #[error("The summarization service is misconfigured: {0}")]
    ServiceMisconfigured(String),

    /// A language code outside the supported catalog was selected
    #[error("Invalid language selection: {0}")]
    InvalidSelection(String),

    /// Error from speech synthesis
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    /// Another summarize/translate/extract operation is already in flight
    #[error("Another operation is already in progress")]
    OperationInProgress,

    /// Read-aloud was requested with no translation, summary, or content
    #[error("There is nothing to read aloud yet")]
    NothingToRead,

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Extraction(ExtractionError::PageUnavailable(error.to_string()))
    }
}
