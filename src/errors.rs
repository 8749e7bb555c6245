//! Unified error types for jewel-cost.
//!
//! Remote failures are modelled separately by [`RemoteError`] because the data service
//! always absorbs them into the local fallback. Everything that reaches a caller as an
//! [`Error`] is either a local-store failure or a rejected user input.

use crate::core::remote::RemoteError;
use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what is wrong with the configuration
        message: String,
    },

    /// Local store (`SQLite`) failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A stored collection or outbound payload could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote call failure that was not absorbed by a fallback (advisor calls)
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// A required field was missing or malformed
    #[error("{message}")]
    Validation {
        /// User-facing description of the rejected input
        message: String,
    },

    /// A price, charge or quantity that is negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// No component with the given id
    #[error("Component not found: {id}")]
    ComponentNotFound {
        /// Id that was looked up
        id: String,
    },

    /// No product with the given id
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Id that was looked up
        id: String,
    },

    /// A bulk import file could not be parsed; nothing was written
    #[error("Import failed: {message}")]
    Import {
        /// Description of the first problem found in the file
        message: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
