//! Error types for inventory_manager

use thiserror::Error;

/// Unified error type for inventory_manager operations
///
/// Row-level parse problems are not represented here; they are collected as
/// [`crate::normalizer::RowError`] values so a bad row never aborts a batch.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// CSV file could not be read or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// File or console I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// No product with the given ID
    #[error("No product found with ID {0}")]
    NotFound(i64),
}

/// Result alias for inventory_manager operations
pub type Result<T> = std::result::Result<T, InventoryError>;
