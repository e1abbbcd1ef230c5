use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all obsoleter operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ObsoleterError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed configuration (e.g. obsoleter.toml).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your obsoleter.toml for syntax errors"))]
    Config { message: String },

    /// A release's package index could not be built or loaded.
    #[error("Package index for {release} unavailable: {message}")]
    #[diagnostic(help(
        "Mirror the repository metadata into the cache directory, or delete a stale index under indices/"
    ))]
    Index { release: String, message: String },

    /// Repository metadata could not be parsed.
    #[error("Metadata error: {message}")]
    Metadata { message: String },

    /// An EVR string cannot be normalized or bumped.
    #[error("Cannot process EVR {evr}: {message}")]
    Evr { evr: String, message: String },

    /// The version comparator failed to produce an ordering.
    #[error("Version comparison failed: {message}")]
    #[diagnostic(help("Install rpmdevtools or set `comparator = \"native\"`"))]
    Comparator { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
