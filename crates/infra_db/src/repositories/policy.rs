//! Policy repository implementation
//!
//! This module provides database access for policy products and the
//! customer-scoped views built from the policy map. Every statement binds its
//! arguments; no caller-supplied value is interpolated into SQL text.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use core_kernel::{CustomerId, PolicyId, PolicyMapId, SessionStore};
use domain_policy::{assemble_customer_policies, Enrollment, Policy};

use crate::certificate::CertificateService;
use crate::error::DatabaseError;
use crate::repositories::nominee::NomineeRepository;
use crate::repositories::policy_map::PolicyMapRow;

/// Repository for managing policy products
///
/// Each method acquires its own pooled connection and releases it before
/// returning, so the repository can be cloned and shared freely.
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::PolicyRepository;
///
/// let repo = PolicyRepository::new(pool);
/// let policy = repo.select_policy_by_id(policy_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    /// Creates a new PolicyRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a new policy
    ///
    /// The identifier is generated by the database; the id carried by
    /// `policy` is ignored.
    ///
    /// # Returns
    ///
    /// The identifier assigned to the stored policy
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if the policy terms are invalid
    #[instrument(skip(self, policy), fields(policy_name = %policy.policy_name))]
    pub async fn insert(&self, policy: &Policy) -> Result<PolicyId, DatabaseError> {
        policy.validate()?;

        let mut conn = self.pool.acquire().await?;
        let policy_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO policies (
                policy_type,
                policy_name,
                number_nominees,
                tenure,
                sum_assured_min,
                sum_assured_max,
                pre_reqs
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING policy_id
            "#,
        )
        .bind(&policy.policy_type)
        .bind(&policy.policy_name)
        .bind(policy.number_nominees)
        .bind(policy.tenure)
        .bind(policy.sum_assured_min)
        .bind(policy.sum_assured_max)
        .bind(&policy.pre_reqs)
        .fetch_one(&mut *conn)
        .await?;

        info!(policy_id, "Policy successfully added");
        Ok(PolicyId::new(policy_id))
    }

    /// Updates every mutable column of the policy with the given id
    ///
    /// # Returns
    ///
    /// `true` if a policy was updated, `false` if no policy has that id
    #[instrument(skip(self, policy))]
    pub async fn update(&self, policy: &Policy, policy_id: PolicyId) -> Result<bool, DatabaseError> {
        policy.validate()?;

        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE policies
            SET policy_type = $1,
                policy_name = $2,
                number_nominees = $3,
                tenure = $4,
                sum_assured_min = $5,
                sum_assured_max = $6,
                pre_reqs = $7
            WHERE policy_id = $8
            "#,
        )
        .bind(&policy.policy_type)
        .bind(&policy.policy_name)
        .bind(policy.number_nominees)
        .bind(policy.tenure)
        .bind(policy.sum_assured_min)
        .bind(policy.sum_assured_max)
        .bind(&policy.pre_reqs)
        .bind(policy_id.value())
        .execute(&mut *conn)
        .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Policy successfully updated");
        } else {
            info!("Policy was not updated");
        }
        Ok(updated)
    }

    /// Retrieves a policy by its identifier
    ///
    /// # Returns
    ///
    /// The policy, or `None` if no policy has that id
    #[instrument(skip(self))]
    pub async fn select_policy_by_id(
        &self,
        policy_id: PolicyId,
    ) -> Result<Option<Policy>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let policy = Self::fetch_policy(&mut conn, policy_id).await?;

        if policy.is_some() {
            debug!("Policy found");
        } else {
            debug!("No policies found");
        }
        Ok(policy)
    }

    /// Retrieves every stored policy, ordered by id
    #[instrument(skip(self))]
    pub async fn get_all_policies(&self) -> Result<Vec<Policy>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT
                policy_id,
                policy_type,
                policy_name,
                number_nominees,
                tenure,
                sum_assured_min,
                sum_assured_max,
                pre_reqs
            FROM policies
            ORDER BY policy_id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(Policy::from).collect())
    }

    /// Retrieves the policies of an exact type
    ///
    /// # Arguments
    ///
    /// * `policy_type` - The type to match, e.g. "Term"
    #[instrument(skip(self))]
    pub async fn get_policies_with_type(
        &self,
        policy_type: &str,
    ) -> Result<Vec<Policy>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT
                policy_id,
                policy_type,
                policy_name,
                number_nominees,
                tenure,
                sum_assured_min,
                sum_assured_max,
                pre_reqs
            FROM policies
            WHERE policy_type = $1
            ORDER BY policy_id
            "#,
        )
        .bind(policy_type)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(Policy::from).collect())
    }

    /// Retrieves the policies held by a customer with their payment terms
    ///
    /// Each enrollment yields one policy carrying the enrollment's payments
    /// per year and premium. Start dates and nominees are not resolved here;
    /// use [`Self::get_all_customer_policies`] for the full view.
    #[instrument(skip(self))]
    pub async fn get_policies_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Policy>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, CustomerPolicyRow>(
            r#"
            SELECT
                p.policy_id,
                p.policy_type,
                p.policy_name,
                p.number_nominees,
                p.tenure,
                p.sum_assured_min,
                p.sum_assured_max,
                p.pre_reqs,
                pm.payments_per_year,
                pm.premium_amount
            FROM policy_map pm
            LEFT JOIN policies p ON pm.policy_id = p.policy_id
            WHERE pm.customer_id = $1
            ORDER BY pm.id
            "#,
        )
        .bind(customer_id.value())
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().filter_map(CustomerPolicyRow::into_policy).collect())
    }

    /// Retrieves a customer's policies with their full enrollment terms
    ///
    /// Works in three steps: scan the customer's policy-map rows and resolve
    /// each row's nominees, look up the referenced policies, then merge every
    /// row's terms onto its own policy. An enrollment whose policy is missing
    /// is skipped without affecting the others.
    #[instrument(skip(self))]
    pub async fn get_all_customer_policies(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Policy>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        let map_rows = sqlx::query_as::<_, PolicyMapRow>(
            r#"
            SELECT
                id,
                customer_id,
                policy_id,
                nominee_id,
                start_date,
                payments_per_year,
                premium_amount
            FROM policy_map
            WHERE customer_id = $1
            ORDER BY id
            "#,
        )
        .bind(customer_id.value())
        .fetch_all(&mut *conn)
        .await?;

        let mut enrollments = Vec::with_capacity(map_rows.len());
        for row in map_rows {
            let nominees =
                NomineeRepository::nominees_for_map(&mut conn, PolicyMapId::new(row.id)).await?;
            enrollments.push(Enrollment::new(row.into(), nominees));
        }

        let policy_ids: Vec<i32> = enrollments
            .iter()
            .map(|enrollment| enrollment.map.policy_id.value())
            .collect();
        let catalogue: HashMap<PolicyId, Policy> = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT
                policy_id,
                policy_type,
                policy_name,
                number_nominees,
                tenure,
                sum_assured_min,
                sum_assured_max,
                pre_reqs
            FROM policies
            WHERE policy_id = ANY($1)
            "#,
        )
        .bind(&policy_ids[..])
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|row| {
            let policy = Policy::from(row);
            (policy.policy_id, policy)
        })
        .collect();

        let policies = assemble_customer_policies(enrollments, &catalogue);
        debug!(count = policies.len(), "Assembled customer policies");
        Ok(policies)
    }

    /// Looks up a certificate and publishes it into the session
    ///
    /// See [`CertificateService::search_by_customer_and_policy`].
    pub async fn search_by_customer_and_policy<S>(&self, session: &mut S) -> bool
    where
        S: SessionStore + Send,
    {
        CertificateService::new(self.pool.clone())
            .search_by_customer_and_policy(session)
            .await
    }

    /// Lists every policy as a `name(id)` label
    ///
    /// # Returns
    ///
    /// The labels ordered by id, or `None` if no policies are stored
    #[instrument(skip(self))]
    pub async fn select_all_policy_name_and_policy_id(
        &self,
    ) -> Result<Option<Vec<String>>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<(String, i32)> = sqlx::query_as(
            r#"
            SELECT policy_name, policy_id
            FROM policies
            ORDER BY policy_id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        if rows.is_empty() {
            debug!("No policies retrieved");
            return Ok(None);
        }

        debug!(count = rows.len(), "Policies successfully retrieved");
        Ok(Some(
            rows.into_iter()
                .map(|(name, id)| Policy::catalogue_label(&name, PolicyId::new(id)))
                .collect(),
        ))
    }

    /// Returns the largest stored policy id, or 0 when there are no policies
    ///
    /// Identifiers are generated by the database on insert; this value is for
    /// reporting only and must not be used to assign new ids.
    #[instrument(skip(self))]
    pub async fn get_largest_id(&self) -> Result<i32, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let max_id: i32 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(policy_id), 0)
            FROM policies
            "#,
        )
        .fetch_one(&mut *conn)
        .await?;

        Ok(max_id)
    }

    /// Checks whether any customer is enrolled in the policy
    ///
    /// Used to refuse deleting a policy that is still in use.
    #[instrument(skip(self))]
    pub async fn check_policy_map_with_policy_id(
        &self,
        policy_id: PolicyId,
    ) -> Result<bool, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let mapped: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM policy_map WHERE policy_id = $1
            )
            "#,
        )
        .bind(policy_id.value())
        .fetch_one(&mut *conn)
        .await?;

        Ok(mapped)
    }

    /// Deletes a policy
    ///
    /// # Returns
    ///
    /// `true` if a policy was deleted, `false` if no policy has that id
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ForeignKeyViolation` if customers are still
    /// enrolled in the policy
    #[instrument(skip(self))]
    pub async fn delete_policy_using_id(&self, policy_id: PolicyId) -> Result<bool, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            r#"
            DELETE FROM policies
            WHERE policy_id = $1
            "#,
        )
        .bind(policy_id.value())
        .execute(&mut *conn)
        .await?;

        let deleted = result.rows_affected() > 0;
        info!(deleted, "Policy delete processed");
        Ok(deleted)
    }

    /// Looks up a policy on an already acquired connection
    pub(crate) async fn fetch_policy(
        conn: &mut PgConnection,
        policy_id: PolicyId,
    ) -> Result<Option<Policy>, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT
                policy_id,
                policy_type,
                policy_name,
                number_nominees,
                tenure,
                sum_assured_min,
                sum_assured_max,
                pre_reqs
            FROM policies
            WHERE policy_id = $1
            "#,
        )
        .bind(policy_id.value())
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Policy::from))
    }
}

/// Database row representation of a policy
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PolicyRow {
    pub policy_id: i32,
    pub policy_type: String,
    pub policy_name: String,
    pub number_nominees: i32,
    pub tenure: f64,
    pub sum_assured_min: Decimal,
    pub sum_assured_max: Decimal,
    pub pre_reqs: String,
}

impl From<PolicyRow> for Policy {
    fn from(row: PolicyRow) -> Self {
        Policy {
            policy_id: PolicyId::new(row.policy_id),
            policy_type: row.policy_type,
            policy_name: row.policy_name,
            number_nominees: row.number_nominees,
            tenure: row.tenure,
            sum_assured_min: row.sum_assured_min,
            sum_assured_max: row.sum_assured_max,
            pre_reqs: row.pre_reqs,
            payments_per_year: None,
            premium_amount: None,
            start_date: None,
            nominees: Vec::new(),
        }
    }
}

/// Row of the policy-map to policies left join
///
/// Policy columns are nullable because the join is a left join.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerPolicyRow {
    pub policy_id: Option<i32>,
    pub policy_type: Option<String>,
    pub policy_name: Option<String>,
    pub number_nominees: Option<i32>,
    pub tenure: Option<f64>,
    pub sum_assured_min: Option<Decimal>,
    pub sum_assured_max: Option<Decimal>,
    pub pre_reqs: Option<String>,
    pub payments_per_year: i32,
    pub premium_amount: Decimal,
}

impl CustomerPolicyRow {
    /// Converts the row, or `None` if the joined policy is missing
    pub fn into_policy(self) -> Option<Policy> {
        let base = PolicyRow {
            policy_id: self.policy_id?,
            policy_type: self.policy_type?,
            policy_name: self.policy_name?,
            number_nominees: self.number_nominees?,
            tenure: self.tenure?,
            sum_assured_min: self.sum_assured_min?,
            sum_assured_max: self.sum_assured_max?,
            pre_reqs: self.pre_reqs?,
        };
        let mut policy = Policy::from(base);
        policy.payments_per_year = Some(self.payments_per_year);
        policy.premium_amount = Some(self.premium_amount);
        Some(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn joined_row() -> CustomerPolicyRow {
        CustomerPolicyRow {
            policy_id: Some(4),
            policy_type: Some("Term".to_string()),
            policy_name: Some("Term Life".to_string()),
            number_nominees: Some(1),
            tenure: Some(5.0),
            sum_assured_min: Some(dec!(1000)),
            sum_assured_max: Some(dec!(2000)),
            pre_reqs: Some("None".to_string()),
            payments_per_year: 12,
            premium_amount: dec!(75.25),
        }
    }

    #[test]
    fn test_joined_row_carries_payment_terms() {
        let policy = joined_row().into_policy().unwrap();
        assert_eq!(policy.policy_id, PolicyId::new(4));
        assert_eq!(policy.payments_per_year, Some(12));
        assert_eq!(policy.premium_amount, Some(dec!(75.25)));
        assert!(policy.start_date.is_none());
    }

    #[test]
    fn test_unmatched_join_is_skipped() {
        let mut row = joined_row();
        row.policy_id = None;
        assert!(row.into_policy().is_none());
    }
}
