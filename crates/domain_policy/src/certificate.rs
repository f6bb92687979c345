//! Policy certificates
//!
//! A certificate summarises a customer's enrollment in a policy for printing:
//! the policy terms, the nominees, the premium and the computed expiry date.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::nominee::Nominee;
use crate::policy::Policy;
use crate::policy_map::PolicyMap;

/// Days counted per year of tenure
pub const DAYS_PER_TENURE_YEAR: f64 = 365.0;

/// Computes the expiry date of a certificate
///
/// The expiry is `start + floor(tenure * 365)` days. Leap days are not
/// compensated for.
///
/// # Errors
///
/// * `InvalidTenure` if the tenure is negative or not finite
/// * `DateOutOfRange` if the expiry does not fit the calendar
pub fn certificate_end_date(start: NaiveDate, tenure: f64) -> Result<NaiveDate, PolicyError> {
    if !tenure.is_finite() || tenure < 0.0 {
        return Err(PolicyError::InvalidTenure(tenure));
    }
    let days = (tenure * DAYS_PER_TENURE_YEAR).floor() as i64;
    let offset = u64::try_from(days).map_err(|_| PolicyError::InvalidTenure(tenure))?;
    start
        .checked_add_days(Days::new(offset))
        .ok_or(PolicyError::DateOutOfRange { start, days })
}

/// Printable certificate for a customer's policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub policy: Policy,
    pub premium_amount: Decimal,
    pub nominees: Vec<Nominee>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Certificate {
    /// Issues a certificate for an enrollment
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry date cannot be computed from the
    /// enrollment start date and the policy tenure.
    pub fn issue(
        policy: Policy,
        map: &PolicyMap,
        nominees: Vec<Nominee>,
    ) -> Result<Self, PolicyError> {
        let end_date = certificate_end_date(map.start_date, policy.tenure)?;
        Ok(Self {
            policy,
            premium_amount: map.premium_amount,
            nominees,
            start_date: map.start_date,
            end_date,
        })
    }
}
