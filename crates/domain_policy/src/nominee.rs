//! Nominees (beneficiaries) designated on a customer's policy

use core_kernel::NomineeId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// A beneficiary linked to a policy enrollment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nominee {
    pub nominee_id: NomineeId,
    pub nominee_name: String,
    pub relationship_to_customer: String,
    /// Percentage of the benefit payable to this nominee
    pub share_percentage: Decimal,
}

/// Data for registering a new nominee
#[derive(Debug, Clone, PartialEq)]
pub struct NewNominee {
    pub nominee_name: String,
    pub relationship_to_customer: String,
    pub share_percentage: Decimal,
}

impl NewNominee {
    /// Creates a nominee entitled to the full benefit
    pub fn new(name: impl Into<String>, relationship: impl Into<String>) -> Self {
        Self {
            nominee_name: name.into(),
            relationship_to_customer: relationship.into(),
            share_percentage: dec!(100),
        }
    }

    /// Sets the benefit share
    pub fn share(mut self, percentage: Decimal) -> Self {
        self.share_percentage = percentage;
        self
    }

    /// Validates the nominee before it is stored
    ///
    /// # Errors
    ///
    /// Returns an error if the name or relationship is blank, or the share is
    /// not within `(0, 100]`.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.nominee_name.trim().is_empty() {
            return Err(PolicyError::missing("nominee_name"));
        }
        if self.relationship_to_customer.trim().is_empty() {
            return Err(PolicyError::missing("relationship_to_customer"));
        }
        if self.share_percentage <= Decimal::ZERO || self.share_percentage > dec!(100) {
            return Err(PolicyError::InvalidShare(self.share_percentage));
        }
        Ok(())
    }
}
