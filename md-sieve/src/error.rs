//! Error types for allow-list, parser and cache operations

use crate::cache::Compression;
use crate::parser::ConversionError;
use thiserror::Error;

/// Errors that can occur while registering providers, rendering or reading the cache
#[derive(Debug, Error)]
pub enum SieveError {
    /// A provider with the same identifier is already registered
    #[error("Provider '{0}' is already registered")]
    DuplicateProvider(String),

    /// Provider not found in registry
    #[error("Provider '{0}' not found")]
    ProviderNotFound(String),

    /// A parser with the same identifier is already registered
    #[error("Parser '{0}' is already registered")]
    DuplicateParser(String),

    /// Parser not found in registry
    #[error("Parser '{0}' not found")]
    ParserNotFound(String),

    /// A parser setting has no applier
    #[error("Parser '{parser}' has no setting named '{setting}'")]
    UnknownSetting { parser: String, setting: String },

    /// The Markdown backend failed; the message is not interpreted
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// Re-serializing sanitized HTML failed
    #[error("Sanitization failed: {0}")]
    Sanitize(String),

    /// A cached entry was written with a compression this build cannot decode
    #[error("Cached entry uses {compression} compression, which is not available in this build")]
    DecompressionUnavailable { compression: Compression },

    /// A cached payload could not be decoded
    #[error("Corrupt cache entry: {0}")]
    CorruptCacheEntry(String),
}

/// Result type alias for md-sieve operations.
pub type Result<T> = std::result::Result<T, SieveError>;
