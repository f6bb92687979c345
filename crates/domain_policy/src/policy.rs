//! Policy product records
//!
//! A `Policy` describes an insurance product: its type, coverage terms and
//! prerequisites. When a policy is read on behalf of a customer, the
//! enrollment-specific terms (start date, payment schedule, premium and
//! nominees) are merged onto it from the customer's policy-map row.

use chrono::NaiveDate;
use core_kernel::PolicyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::nominee::Nominee;

/// Id carried by a policy that has not been stored yet
pub const UNSAVED_POLICY_ID: PolicyId = PolicyId::new(0);

/// An insurance policy product, optionally carrying a customer's enrollment terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: PolicyId,
    /// Accidental, whole life, term, pension, ...
    pub policy_type: String,
    pub policy_name: String,
    pub number_nominees: i32,
    /// Coverage duration in years
    pub tenure: f64,
    pub sum_assured_min: Decimal,
    pub sum_assured_max: Decimal,
    pub pre_reqs: String,

    // Enrollment terms, only present on customer-scoped reads
    pub payments_per_year: Option<i32>,
    pub premium_amount: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub nominees: Vec<Nominee>,
}

impl Policy {
    /// Starts building a new policy
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// Returns the policy with the given id assigned
    pub fn with_id(mut self, policy_id: PolicyId) -> Self {
        self.policy_id = policy_id;
        self
    }

    /// Returns true if the policy has been stored
    pub fn is_saved(&self) -> bool {
        self.policy_id != UNSAVED_POLICY_ID
    }

    /// Formats the catalogue label used by policy pickers, e.g. `Term Life(3)`
    pub fn catalogue_label(name: &str, policy_id: PolicyId) -> String {
        format!("{}({})", name, policy_id.value())
    }

    /// Checks the product terms before they are written
    ///
    /// # Errors
    ///
    /// * `MissingRequiredField` if the type, name or prerequisites are blank
    /// * `Validation` if the nominee count is negative or the minimum sum is negative
    /// * `InvalidTenure` if the tenure is not a positive, finite number
    /// * `InvertedSumAssured` if the minimum sum assured exceeds the maximum
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.policy_type.trim().is_empty() {
            return Err(PolicyError::missing("policy_type"));
        }
        if self.policy_name.trim().is_empty() {
            return Err(PolicyError::missing("policy_name"));
        }
        if self.pre_reqs.trim().is_empty() {
            return Err(PolicyError::missing("pre_reqs"));
        }
        if self.number_nominees < 0 {
            return Err(PolicyError::validation("number_nominees cannot be negative"));
        }
        if !self.tenure.is_finite() || self.tenure <= 0.0 {
            return Err(PolicyError::InvalidTenure(self.tenure));
        }
        if self.sum_assured_min < Decimal::ZERO {
            return Err(PolicyError::validation("sum_assured_min cannot be negative"));
        }
        if self.sum_assured_min > self.sum_assured_max {
            return Err(PolicyError::InvertedSumAssured {
                min: self.sum_assured_min,
                max: self.sum_assured_max,
            });
        }
        Ok(())
    }
}

/// Builder for policy products
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    policy_id: Option<PolicyId>,
    policy_type: Option<String>,
    policy_name: Option<String>,
    number_nominees: i32,
    tenure: Option<f64>,
    sum_assured_min: Decimal,
    sum_assured_max: Decimal,
    pre_reqs: Option<String>,
}

impl PolicyBuilder {
    /// Creates a new policy builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the id of an existing policy
    pub fn policy_id(mut self, policy_id: PolicyId) -> Self {
        self.policy_id = Some(policy_id);
        self
    }

    pub fn policy_type(mut self, policy_type: impl Into<String>) -> Self {
        self.policy_type = Some(policy_type.into());
        self
    }

    pub fn policy_name(mut self, policy_name: impl Into<String>) -> Self {
        self.policy_name = Some(policy_name.into());
        self
    }

    pub fn number_nominees(mut self, count: i32) -> Self {
        self.number_nominees = count;
        self
    }

    /// Sets the tenure in years
    pub fn tenure(mut self, years: f64) -> Self {
        self.tenure = Some(years);
        self
    }

    /// Sets the sum assured range
    pub fn sum_assured(mut self, min: Decimal, max: Decimal) -> Self {
        self.sum_assured_min = min;
        self.sum_assured_max = max;
        self
    }

    pub fn pre_reqs(mut self, pre_reqs: impl Into<String>) -> Self {
        self.pre_reqs = Some(pre_reqs.into());
        self
    }

    /// Builds and validates the policy
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::MissingRequiredField` for unset fields, or any
    /// error raised by [`Policy::validate`].
    pub fn build(self) -> Result<Policy, PolicyError> {
        let policy = Policy {
            policy_id: self.policy_id.unwrap_or(UNSAVED_POLICY_ID),
            policy_type: self.policy_type.ok_or_else(|| PolicyError::missing("policy_type"))?,
            policy_name: self.policy_name.ok_or_else(|| PolicyError::missing("policy_name"))?,
            number_nominees: self.number_nominees,
            tenure: self.tenure.ok_or_else(|| PolicyError::missing("tenure"))?,
            sum_assured_min: self.sum_assured_min,
            sum_assured_max: self.sum_assured_max,
            pre_reqs: self.pre_reqs.ok_or_else(|| PolicyError::missing("pre_reqs"))?,
            payments_per_year: None,
            premium_amount: None,
            start_date: None,
            nominees: Vec::new(),
        };
        policy.validate()?;
        Ok(policy)
    }
}
