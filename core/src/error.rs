//! Error types for the paste API client.
//!
//! # Design
//! Failures fall into four groups. Configuration errors (`ConfigError`) are
//! local and stop an option from applying. Precondition errors
//! (`MissingCredentials`, `NotLoggedIn`) are raised before any request is
//! built. Transport errors come from the injected `Transport` and are passed
//! through untouched. API errors (`LoginFailed`, `HttpError`) carry the raw
//! status and body, since the remote API has no structured error envelope.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ApiError>;

/// A configuration value was rejected before it reached the client.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{0}' cannot carry an endpoint path")]
    CannotBeBase(String),

    #[error("supplied session key does not look like a valid key")]
    InvalidSessionKey,

    #[error("supplied developer key does not look like a valid key")]
    InvalidDevKey,

    #[error("expiration '{code}' is not valid, valid values are: {valid}")]
    InvalidExpiration { code: String, valid: String },

    #[error("visibility '{0}' is not valid, valid values are: public, unlisted, private")]
    InvalidVisibility(String),
}

/// The transport could not complete the HTTP round trip.
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct TransportError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// Errors returned by `Client` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Login was attempted without both a username and a password.
    #[error("login not possible, username and password not set in client")]
    MissingCredentials,

    /// The operation needs a session key and the client has none.
    #[error("you are not logged in, login first")]
    NotLoggedIn,

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Login got a non-200 status, or a 200 whose body is not a session key.
    #[error("login failed: HTTP {status}: '{body}'")]
    LoginFailed { status: u16, body: String },

    /// The API answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}
