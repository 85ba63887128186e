//! Unified error types for Screen-Automation

use std::fmt;
use thiserror::Error;

use crate::driver::Platform;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Failure category reported by a driver.
///
/// Every driver failure is classified into one of these kinds where it is
/// produced, so retry allow-lists can match on them without inspecting
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The element reference no longer points at a live node
    StaleReference,
    /// The element exists but cannot receive input
    NotInteractable,
    /// Another element would receive the click
    ClickIntercepted,
    /// No element matched the locator
    NotFound,
    /// A driver-side wait ran out of time
    Timeout,
    /// The requested context handle does not exist
    NoSuchContext,
    /// The requested frame does not exist
    NoSuchFrame,
    /// The locator expression is malformed
    InvalidSelector,
    /// The automation server refused to create a session
    SessionNotCreated,
    /// Anything the driver could not classify
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::StaleReference => "stale element reference",
            FailureKind::NotInteractable => "element not interactable",
            FailureKind::ClickIntercepted => "element click intercepted",
            FailureKind::NotFound => "no such element",
            FailureKind::Timeout => "timeout",
            FailureKind::NoSuchContext => "no such context",
            FailureKind::NoSuchFrame => "no such frame",
            FailureKind::InvalidSelector => "invalid selector",
            FailureKind::SessionNotCreated => "session not created",
            FailureKind::Unknown => "unknown error",
        };
        f.write_str(name)
    }
}

/// A classified failure coming out of a [`Driver`](crate::driver::Driver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct DriverError {
    pub kind: FailureKind,
    pub message: String,
}

impl DriverError {
    /// Create a new driver error of the given kind
    pub fn new<S: Into<String>>(kind: FailureKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn stale<S: Into<String>>(message: S) -> Self {
        Self::new(FailureKind::StaleReference, message)
    }

    pub fn not_interactable<S: Into<String>>(message: S) -> Self {
        Self::new(FailureKind::NotInteractable, message)
    }

    pub fn click_intercepted<S: Into<String>>(message: S) -> Self {
        Self::new(FailureKind::ClickIntercepted, message)
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::new(FailureKind::NotFound, message)
    }
}

/// Result type for raw driver calls
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Unified error type for Screen-Automation
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A raw driver failure that has not been through a retry policy
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// The operation failed with a kind outside the retry allow-list
    #[error("Unhandled failure: {source}")]
    UnhandledFailure {
        #[source]
        source: Box<Error>,
    },

    /// A recoverable failure persisted past the retry budget
    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// Element not found
    #[error("Element not found: {0}")]
    NotFound(String),

    /// Timeout
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// No session has been started
    #[error("No active session; start one before using the session manager")]
    NotInitialized,

    /// No WEBVIEW handle among the available contexts
    #[error("No WebView context found among {available:?}")]
    NoWebViewContext { available: Vec<String> },

    /// The driver cannot switch contexts at all
    #[error("Context switching is not supported by the {0} driver")]
    UnsupportedContext(Platform),

    /// The automation server could not be reached or refused the session
    #[error("Failed to start {platform} session: {source}")]
    SessionStart {
        platform: Platform,
        #[source]
        source: DriverError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new element not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Failure kind used for retry and degrade decisions.
    ///
    /// Wrapper and lifecycle errors have no kind and are never recoverable.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Error::Driver(err) => Some(err.kind),
            Error::NotFound(_) => Some(FailureKind::NotFound),
            Error::Timeout(_) => Some(FailureKind::Timeout),
            _ => None,
        }
    }

    /// Whether this error is a timeout or a missing element
    pub fn is_absence(&self) -> bool {
        matches!(
            self.kind(),
            Some(FailureKind::NotFound) | Some(FailureKind::Timeout)
        )
    }
}
