use thiserror::Error;

use crate::capability::{ConfigIndex, StreamIndex};

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a potential configuration graph
#[derive(Error, Debug)]
pub enum Error {
    /// A capability or configuration attribute whose id or body cannot be read
    #[error("Invalid {name} attribute: {reason}")]
    InvalidAttribute {
        /// Attribute name (acap, tcap, acfg, pcfg)
        name: String,
        /// What was wrong with the value
        reason: String,
    },

    /// A configuration clause without a `<kind>=<body>` shape
    #[error("Malformed configuration {config} on stream {stream}: clause '{clause}' has no '=' separator")]
    MalformedConfig {
        /// Stream the configuration was declared on
        stream: StreamIndex,
        /// Configuration number
        config: ConfigIndex,
        /// Offending clause text
        clause: String,
    },

    /// The session description was already processed into this graph
    #[error("Session description already processed into this graph")]
    AlreadyProcessed,

    /// Parser error
    #[error("Parser error: {0}")]
    Parser(String),

    /// Diagnostics dump failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Error::Parser(format!("Parsing failed: {err}"))
    }
}

impl Error {
    pub(crate) fn invalid_attribute(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidAttribute {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
