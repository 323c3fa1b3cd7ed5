use thiserror::Error;

/// Errors that can occur when resolving or looking up customers.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// The external identifier is empty or blank.
    #[error("Invalid customer identifier: must not be empty")]
    InvalidIdn,

    /// No customer exists for the identifier.
    #[error("Customer not found for idn '{idn}'")]
    NotFound { idn: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl CustomerError {
    /// Returns true for errors caused by caller input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(self, CustomerError::InvalidIdn)
    }
}

/// Result type for customer operations.
pub type Result<T> = std::result::Result<T, CustomerError>;
