//! Error types for the devport-core library.

use std::num::ParseIntError;

use thiserror::Error;

/// Result type alias for devport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the selector and port-mapping grammars.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A selector token without exactly one `=`.
    #[error("malformed selector token '{0}', expected key=value")]
    MalformedSelector(String),

    /// A port mapping segment that is neither `port` nor `local:remote`.
    #[error("Error parsing port mapping: {0}")]
    MalformedPortMapping(String),

    /// A port that is not a valid port number.
    #[error("invalid port '{text}': {source}")]
    InvalidPort {
        text: String,
        #[source]
        source: ParseIntError,
    },
}

/// Errors that can occur while editing port forwarding rules.
#[derive(Error, Debug)]
pub enum Error {
    /// Conflicting or missing inputs, detected before anything is changed.
    #[error("{0}")]
    Validation(String),

    /// The label selector argument could not be parsed.
    #[error("Error parsing selectors: {0}")]
    Selectors(#[source] ParseError),

    /// The port mappings argument could not be parsed.
    #[error("Error parsing port mappings: {0}")]
    PortMappings(#[source] ParseError),

    /// No dev selector with the requested name.
    #[error("no service with name {0} exists")]
    ServiceNotFound(String),

    /// Persisting the edited config failed.
    #[error("Couldn't save config file: {0}")]
    Save(#[source] Box<Error>),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::Selectors(ParseError::MalformedSelector("app".to_string()));
        assert_eq!(
            err.to_string(),
            "Error parsing selectors: malformed selector token 'app', expected key=value"
        );

        let err = Error::Save(Box::new(Error::Config("disk full".to_string())));
        assert_eq!(
            err.to_string(),
            "Couldn't save config file: Configuration error: disk full"
        );
    }
}
