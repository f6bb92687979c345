//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the policy administration records.
//! These fixtures are designed to be consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::CustomerId;
use domain_policy::{NewNominee, Policy};
use rust_decimal_macros::dec;

/// Fixture for policy products
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// A twenty year term life product
    pub fn term_life() -> Policy {
        Policy::builder()
            .policy_type("Term")
            .policy_name("Term Life 20")
            .number_nominees(2)
            .tenure(20.0)
            .sum_assured(dec!(100000.00), dec!(500000.00))
            .pre_reqs("Medical examination")
            .build()
            .unwrap()
    }

    /// A whole life product with a one year certificate tenure
    pub fn whole_life() -> Policy {
        Policy::builder()
            .policy_type("Whole Life")
            .policy_name("Whole Life Classic")
            .number_nominees(1)
            .tenure(1.0)
            .sum_assured(dec!(50000.00), dec!(250000.00))
            .pre_reqs("Age 18-60")
            .build()
            .unwrap()
    }

    /// An accidental cover product
    pub fn accidental() -> Policy {
        Policy::builder()
            .policy_type("Accidental")
            .policy_name("Accident Shield")
            .number_nominees(1)
            .tenure(5.0)
            .sum_assured(dec!(10000.00), dec!(75000.00))
            .pre_reqs("None")
            .build()
            .unwrap()
    }
}

/// Fixture for nominees
pub struct NomineeFixtures;

impl NomineeFixtures {
    pub fn spouse() -> NewNominee {
        NewNominee::new("Asha Rao", "Spouse").share(dec!(60))
    }

    pub fn child() -> NewNominee {
        NewNominee::new("Ravi Rao", "Son").share(dec!(40))
    }

    pub fn parent() -> NewNominee {
        NewNominee::new("Meera Rao", "Mother")
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard enrollment start date (Jan 1, 2018)
    pub fn enrollment_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
    }

    /// One 365-day tenure year after the standard start
    pub fn one_year_expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()
    }

    /// A second enrollment date, for multi-policy customers
    pub fn later_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 8, 15).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// The customer used by most enrollment tests
    pub fn customer_id() -> CustomerId {
        CustomerId::new(1001)
    }

    /// A customer with no enrollments
    pub fn other_customer_id() -> CustomerId {
        CustomerId::new(2002)
    }
}
