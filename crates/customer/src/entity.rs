//! Customer entity.

use chrono::{DateTime, Utc};
use common::CustomerId;
use serde::{Deserialize, Serialize};

use crate::error::{CustomerError, Result};

/// A customer identity keyed by its external identifier.
///
/// `idn` is unique across all customers and `created_at` never changes after
/// the first insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub idn: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a fresh customer record for an identifier, stamped now.
    pub fn new(idn: impl Into<String>) -> Self {
        Self {
            id: CustomerId::new(),
            idn: idn.into(),
            created_at: Utc::now(),
        }
    }
}

/// Checks that an external identifier is usable.
///
/// Only emptiness is checked; the identifier format is owned by whoever
/// issues it.
pub fn validate_idn(idn: &str) -> Result<()> {
    if idn.trim().is_empty() {
        return Err(CustomerError::InvalidIdn);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_customer_keeps_idn() {
        let customer = Customer::new("IDN123");
        assert_eq!(customer.idn, "IDN123");
        assert!(customer.created_at <= Utc::now());
    }

    #[test]
    fn validate_idn_rejects_blank() {
        assert!(matches!(validate_idn(""), Err(CustomerError::InvalidIdn)));
        assert!(matches!(validate_idn("   "), Err(CustomerError::InvalidIdn)));
        assert!(validate_idn("990101300123").is_ok());
    }

    #[test]
    fn serializes_created_at_as_rfc3339() {
        let customer = Customer::new("A");
        let json = serde_json::to_value(&customer).unwrap();
        let created_at = json["created_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created_at).is_ok());
        assert_eq!(json["idn"], "A");
    }
}
