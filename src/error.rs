//! Error types for reverse ACL search

use thiserror::Error;

/// The main error type for reverse-search operations
#[derive(Debug, Error)]
pub enum AclError {
    /// Permission name not registered in the permission map
    #[error("There are no masks in the permission map for permission \"{0}\"")]
    UnknownPermission(String),

    /// Subject is neither a usable user nor role identity
    #[error("Unsupported security identity: {0}")]
    UnsupportedIdentity(String),

    #[error("Invalid ACE filter: {0}")]
    InvalidFilter(String),

    /// Known capability gap (descendant object identity search)
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Invalid table name \"{0}\"")]
    InvalidTableName(String),

    /// Store returned a row missing a column or carrying the wrong type
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Failure from a non-SQLite store, passed through unchanged
    #[error(transparent)]
    Store(Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for reverse-search operations
pub type Result<T> = std::result::Result<T, AclError>;
