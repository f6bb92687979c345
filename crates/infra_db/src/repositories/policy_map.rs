//! Policy map repository implementation
//!
//! The policy map records which customer holds which policy, and on which
//! terms. Rows are created when a customer enrolls and read back by the policy
//! and certificate queries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use core_kernel::{CustomerId, NomineeId, PolicyId, PolicyMapId};
use domain_policy::{NewPolicyMap, PolicyMap};

use crate::error::DatabaseError;

/// Repository for customer enrollments
#[derive(Debug, Clone)]
pub struct PolicyMapRepository {
    pool: PgPool,
}

impl PolicyMapRepository {
    /// Creates a new PolicyMapRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enrolls a customer into a policy
    ///
    /// # Returns
    ///
    /// The identifier of the new policy-map row
    ///
    /// # Errors
    ///
    /// * `DatabaseError::Validation` if the enrollment terms are invalid
    /// * `DatabaseError::ForeignKeyViolation` if the policy or nominee does not exist
    #[instrument(skip(self, map), fields(customer_id = %map.customer_id, policy_id = %map.policy_id))]
    pub async fn insert(&self, map: &NewPolicyMap) -> Result<PolicyMapId, DatabaseError> {
        map.validate()?;

        let mut conn = self.pool.acquire().await?;
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO policy_map (
                customer_id,
                policy_id,
                nominee_id,
                start_date,
                payments_per_year,
                premium_amount
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(map.customer_id.value())
        .bind(map.policy_id.value())
        .bind(map.nominee_id.map(NomineeId::value))
        .bind(map.start_date)
        .bind(map.payments_per_year)
        .bind(map.premium_amount)
        .fetch_one(&mut *conn)
        .await?;

        info!(policy_map_id = id, "Customer enrolled in policy");
        Ok(PolicyMapId::new(id))
    }

    /// Retrieves a customer's enrollments, oldest first
    #[instrument(skip(self))]
    pub async fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<PolicyMap>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, PolicyMapRow>(
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

        Ok(rows.into_iter().map(PolicyMap::from).collect())
    }

    /// Retrieves the earliest enrollment of a customer in a policy
    #[instrument(skip(self))]
    pub async fn find_by_customer_and_policy(
        &self,
        customer_id: CustomerId,
        policy_id: PolicyId,
    ) -> Result<Option<PolicyMap>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_by_customer_and_policy(&mut conn, customer_id, policy_id).await
    }

    /// Removes an enrollment together with its nominee links
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted
    #[instrument(skip(self))]
    pub async fn delete(&self, id: PolicyMapId) -> Result<bool, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM policy_map WHERE id = $1")
            .bind(id.value())
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn fetch_by_customer_and_policy(
        conn: &mut PgConnection,
        customer_id: CustomerId,
        policy_id: PolicyId,
    ) -> Result<Option<PolicyMap>, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyMapRow>(
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
            WHERE customer_id = $1 AND policy_id = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(customer_id.value())
        .bind(policy_id.value())
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(PolicyMap::from))
    }
}

/// Database row representation of a policy-map entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PolicyMapRow {
    pub id: i32,
    pub customer_id: i32,
    pub policy_id: i32,
    pub nominee_id: Option<i32>,
    pub start_date: NaiveDate,
    pub payments_per_year: i32,
    pub premium_amount: Decimal,
}

impl From<PolicyMapRow> for PolicyMap {
    fn from(row: PolicyMapRow) -> Self {
        PolicyMap {
            id: PolicyMapId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            policy_id: PolicyId::new(row.policy_id),
            nominee_id: row.nominee_id.map(NomineeId::new),
            start_date: row.start_date,
            payments_per_year: row.payments_per_year,
            premium_amount: row.premium_amount,
        }
    }
}
