//! Certificate lookup
//!
//! An administrator generates a certificate by choosing a customer and one of
//! their policies. The lookup finds the enrollment, computes its expiry date
//! and publishes the certificate fields into the caller's session for the
//! rendering step.

use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, error, instrument, warn};

use core_kernel::session::keys;
use core_kernel::{CoreError, CustomerId, PolicyId, SessionStore};
use domain_policy::Certificate;

use crate::error::DatabaseError;
use crate::repositories::nominee::NomineeRepository;
use crate::repositories::policy::PolicyRepository;
use crate::repositories::policy_map::PolicyMapRepository;

/// Builds certificates from stored enrollments
#[derive(Debug, Clone)]
pub struct CertificateService {
    pool: PgPool,
}

impl CertificateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the certificate for a customer's enrollment in a policy
    ///
    /// # Returns
    ///
    /// The certificate, or `None` if the customer is not enrolled in the policy
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if the expiry date cannot be
    /// computed, or any error raised by the database.
    #[instrument(skip(self))]
    pub async fn find_certificate(
        &self,
        customer_id: CustomerId,
        policy_id: PolicyId,
    ) -> Result<Option<Certificate>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let Some(map) =
            PolicyMapRepository::fetch_by_customer_and_policy(&mut conn, customer_id, policy_id)
                .await?
        else {
            debug!("Customer is not enrolled in policy");
            return Ok(None);
        };

        let Some(policy) = PolicyRepository::fetch_policy(&mut conn, policy_id).await? else {
            warn!("Enrollment references a missing policy");
            return Ok(None);
        };

        let nominees = NomineeRepository::nominees_for_map(&mut conn, map.id).await?;
        let certificate = Certificate::issue(policy, &map, nominees)?;
        Ok(Some(certificate))
    }

    /// Looks up a certificate for the session's customer and submitted policy
    ///
    /// Reads `customerID` and `policyID` from the session. When the enrollment
    /// exists, publishes `CertPremium`, `CertNominees`, `CertEndDate` and
    /// `CertPolicy` and returns `true`.
    ///
    /// Returns `false` without touching the session if either id is missing or
    /// not an integer, or if the customer is not enrolled in the policy. Any
    /// other failure is logged and also reported as `false`.
    pub async fn search_by_customer_and_policy<S>(&self, session: &mut S) -> bool
    where
        S: SessionStore + Send,
    {
        let (customer_id, policy_id) = match Self::requested_ids(session) {
            Ok(ids) => ids,
            Err(e) => {
                debug!(error = %e, "Certificate request rejected");
                return false;
            }
        };

        let certificate = match self.find_certificate(customer_id, policy_id).await {
            Ok(Some(certificate)) => certificate,
            Ok(None) => return false,
            Err(e) => {
                error!(
                    error = %e,
                    customer_id = %customer_id,
                    policy_id = %policy_id,
                    "Certificate lookup failed"
                );
                return false;
            }
        };

        match Self::publish(session, &certificate) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to publish certificate");
                false
            }
        }
    }

    fn requested_ids<S: SessionStore>(session: &S) -> Result<(CustomerId, PolicyId), CoreError> {
        let customer_id = session.parse_attribute(keys::CUSTOMER_ID)?;
        let policy_id = session.parse_attribute(keys::POLICY_ID)?;
        Ok((customer_id, policy_id))
    }

    /// Serializes every field before writing any, so a failure leaves the session unchanged
    fn publish<S: SessionStore>(
        session: &mut S,
        certificate: &Certificate,
    ) -> Result<(), serde_json::Error> {
        let attributes: [(&str, Value); 4] = [
            (keys::CERT_PREMIUM, serde_json::to_value(certificate.premium_amount)?),
            (keys::CERT_NOMINEES, serde_json::to_value(&certificate.nominees)?),
            (keys::CERT_END_DATE, serde_json::to_value(certificate.end_date)?),
            (keys::CERT_POLICY, serde_json::to_value(&certificate.policy)?),
        ];

        for (key, value) in attributes {
            session.set(key, value);
        }
        Ok(())
    }
}
