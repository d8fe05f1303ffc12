//! Error types for the pokestore service

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the pokestore service
#[derive(Error, Debug)]
pub enum Error {
    /// The upstream provider has no Pokemon with the requested name
    #[error("Pokemon not found upstream: {name}")]
    ProviderNotFound { name: String },

    /// The upstream provider could not be reached or answered badly
    /// (connect failure, timeout, non-2xx status, undecodable body)
    #[error("PokeAPI unavailable: {0}")]
    ProviderUnavailable(String),

    /// The durable store failed a read or write
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify a reqwest failure into the provider taxonomy.
    ///
    /// Anything transient (connect, timeout, body/decode) maps to
    /// `ProviderUnavailable`; a 404 from the upstream is a `ProviderNotFound`
    /// and is handled at the call site where the name is known.
    pub fn provider(err: reqwest::Error) -> Self {
        Error::ProviderUnavailable(err.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_not_found_display() {
        let err = Error::ProviderNotFound {
            name: "missingno".to_string(),
        };
        assert_eq!(err.to_string(), "Pokemon not found upstream: missingno");
    }

    #[test]
    fn test_persistence_display() {
        let err = Error::Persistence("disk full".to_string());
        assert_eq!(err.to_string(), "persistence error: disk full");
    }

    #[test]
    fn test_sqlite_error_maps_to_persistence() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
