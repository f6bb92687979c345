//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{CustomerId, NomineeId, PolicyId};
use domain_policy::NewPolicyMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{IdFixtures, TemporalFixtures};

/// Builder for customer enrollments
pub struct TestEnrollmentBuilder {
    customer_id: CustomerId,
    policy_id: PolicyId,
    nominee_id: Option<NomineeId>,
    start_date: NaiveDate,
    payments_per_year: i32,
    premium_amount: Decimal,
}

impl TestEnrollmentBuilder {
    /// Creates a new builder enrolling the standard customer into `policy_id`
    pub fn new(policy_id: PolicyId) -> Self {
        Self {
            customer_id: IdFixtures::customer_id(),
            policy_id,
            nominee_id: None,
            start_date: TemporalFixtures::enrollment_start(),
            payments_per_year: 12,
            premium_amount: dec!(150.00),
        }
    }

    /// Sets the customer
    pub fn with_customer_id(mut self, id: CustomerId) -> Self {
        self.customer_id = id;
        self
    }

    /// Sets the primary nominee
    pub fn with_nominee_id(mut self, id: NomineeId) -> Self {
        self.nominee_id = Some(id);
        self
    }

    /// Sets the start date
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    /// Sets the number of payments per year
    pub fn with_payments_per_year(mut self, payments: i32) -> Self {
        self.payments_per_year = payments;
        self
    }

    /// Sets the premium amount
    pub fn with_premium(mut self, premium: Decimal) -> Self {
        self.premium_amount = premium;
        self
    }

    /// Builds the enrollment
    pub fn build(self) -> NewPolicyMap {
        NewPolicyMap {
            customer_id: self.customer_id,
            policy_id: self.policy_id,
            nominee_id: self.nominee_id,
            start_date: self.start_date,
            payments_per_year: self.payments_per_year,
            premium_amount: self.premium_amount,
        }
    }
}
