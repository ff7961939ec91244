// ⚠️ Error types
// Two tiers: user-input mistakes (recovered, one line printed) and
// structural/storage failures (fatal, the session stops).

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// TIER A - USER INPUT
// ============================================================================

/// A recoverable validation failure for one console command.
///
/// `Display` renders the exact line the console prints.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("** class name missing **")]
    ClassNameMissing,

    #[error("** class doesn't exist **")]
    ClassDoesNotExist,

    #[error("** instance id missing **")]
    InstanceIdMissing,

    #[error("** no instance found **")]
    NoInstanceFound,

    #[error("** attribute name missing **")]
    AttributeNameMissing,

    #[error("** value missing **")]
    ValueMissing,

    #[error("** attribute can't be updated **")]
    ReadOnlyAttribute(String),

    #[error("** invalid value for {attribute}: expected {expected} **")]
    InvalidValue { attribute: String, expected: String },

    #[error("** unbalanced quotes **")]
    UnbalancedQuotes,
}

// ============================================================================
// TIER B - STRUCTURAL / STORAGE
// ============================================================================

/// Why a persisted mapping cannot be rebuilt into an entity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    #[error("missing or non-string '{0}'")]
    MissingField(&'static str),

    #[error("'id' must be a non-empty string")]
    EmptyId,

    #[error("unparseable '{field}': {value}")]
    BadTimestamp { field: &'static str, value: String },
}

/// A failure of the persistence file or its contents. Always fatal.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed storage file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unregistered class '{class}' for entry '{key}'")]
    UnknownClass { key: String, class: String },

    #[error("invalid entry '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },

    #[error("invalid entry '{key}': {source}")]
    BadEntity {
        key: String,
        #[source]
        source: EntityError,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// CONSOLE
// ============================================================================

/// Why the console loop stopped early
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
