//! Customer-to-policy enrollments
//!
//! A policy-map row records that a customer holds a policy, together with the
//! terms agreed at enrollment: start date, payment frequency and premium.
//! Nominees are attached to the row through the nominee map.

use chrono::NaiveDate;
use core_kernel::{CustomerId, NomineeId, PolicyId, PolicyMapId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::PolicyError;
use crate::nominee::Nominee;
use crate::policy::Policy;

/// A stored policy-map row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyMap {
    pub id: PolicyMapId,
    pub customer_id: CustomerId,
    pub policy_id: PolicyId,
    /// Primary nominee recorded at enrollment, if any
    pub nominee_id: Option<NomineeId>,
    pub start_date: NaiveDate,
    pub payments_per_year: i32,
    pub premium_amount: Decimal,
}

/// Data for enrolling a customer into a policy
#[derive(Debug, Clone, PartialEq)]
pub struct NewPolicyMap {
    pub customer_id: CustomerId,
    pub policy_id: PolicyId,
    pub nominee_id: Option<NomineeId>,
    pub start_date: NaiveDate,
    pub payments_per_year: i32,
    pub premium_amount: Decimal,
}

impl NewPolicyMap {
    /// Validates the enrollment terms
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Validation` if the payment frequency is not
    /// positive or the premium is negative.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.payments_per_year <= 0 {
            return Err(PolicyError::validation("payments_per_year must be positive"));
        }
        if self.premium_amount < Decimal::ZERO {
            return Err(PolicyError::validation("premium_amount cannot be negative"));
        }
        Ok(())
    }
}

/// One policy-map row together with its resolved nominees
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub map: PolicyMap,
    pub nominees: Vec<Nominee>,
}

impl Enrollment {
    pub fn new(map: PolicyMap, nominees: Vec<Nominee>) -> Self {
        Self { map, nominees }
    }

    /// Merges the enrollment terms onto the base policy record
    pub fn apply_to(self, mut policy: Policy) -> Policy {
        policy.payments_per_year = Some(self.map.payments_per_year);
        policy.premium_amount = Some(self.map.premium_amount);
        policy.start_date = Some(self.map.start_date);
        policy.nominees = self.nominees;
        policy
    }
}

/// Builds a customer's policy list from their enrollments
///
/// Each enrollment is merged with the base policy it references. Enrollments
/// keep their own terms: an enrollment whose policy is missing from
/// `catalogue` is dropped on its own and never shifts the terms of the ones
/// after it. The result follows enrollment order.
pub fn assemble_customer_policies(
    enrollments: Vec<Enrollment>,
    catalogue: &HashMap<PolicyId, Policy>,
) -> Vec<Policy> {
    enrollments
        .into_iter()
        .filter_map(|enrollment| {
            let base = catalogue.get(&enrollment.map.policy_id)?.clone();
            Some(enrollment.apply_to(base))
        })
        .collect()
}
