//! Plugin error types.

use com4d_core::ItemId;
use thiserror::Error;

/// Result type for plugin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Plugin error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] com4d_core::Error),

    /// `commit` called without a result from a successful `execute`.
    #[error("no computed result to commit")]
    NothingToCommit,

    /// A required computation input is not bound.
    #[error("missing computation input: {0}")]
    MissingInput(String),

    /// The host has no output slot with this name.
    #[error("unknown output: {0}")]
    UnknownOutput(String),

    /// A referenced data item does not exist.
    #[error("missing data item: {0}")]
    MissingItem(ItemId),

    /// No computation type is registered under this processing id.
    #[error("unknown computation type: {0}")]
    UnknownComputation(String),

    /// A computation type is already registered under this processing id.
    #[error("computation type already registered: {0}")]
    DuplicateComputation(String),

    /// The process-wide registry has not been initialized.
    #[error("computation registry not initialized")]
    RegistryNotInitialized,
}
