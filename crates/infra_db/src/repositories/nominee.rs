//! Nominee repository implementation
//!
//! Nominees are attached to a customer's enrollment (a policy-map row) through
//! the `nominee_map` link table. Resolution happens in two steps: collect the
//! linked nominee ids in link order, then look up each nominee.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use core_kernel::{NomineeId, PolicyMapId};
use domain_policy::{NewNominee, Nominee};

use crate::error::DatabaseError;

/// Repository for nominee records and their enrollment links
#[derive(Debug, Clone)]
pub struct NomineeRepository {
    pool: PgPool,
}

impl NomineeRepository {
    /// Creates a new NomineeRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the nominees linked to a policy-map row
    ///
    /// Nominees come back in the order they were linked. An empty `Vec` means
    /// the enrollment has no nominees.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if a link references a nominee that
    /// no longer exists, or any error raised by the database.
    #[instrument(skip(self))]
    pub async fn get_nominees_by_map_id(
        &self,
        map_id: PolicyMapId,
    ) -> Result<Vec<Nominee>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let nominees = Self::nominees_for_map(&mut conn, map_id).await?;
        debug!(count = nominees.len(), "Resolved nominees for policy map");
        Ok(nominees)
    }

    /// Looks up a single nominee
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, nominee_id: NomineeId) -> Result<Option<Nominee>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let row = Self::fetch_nominee(&mut conn, nominee_id).await?;
        Ok(row.map(Nominee::from))
    }

    /// Registers a new nominee
    ///
    /// # Returns
    ///
    /// The stored nominee with its generated identifier
    #[instrument(skip(self, nominee), fields(nominee_name = %nominee.nominee_name))]
    pub async fn insert(&self, nominee: &NewNominee) -> Result<Nominee, DatabaseError> {
        nominee.validate()?;

        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, NomineeRow>(
            r#"
            INSERT INTO nominees (nominee_name, relationship_to_customer, share_percentage)
            VALUES ($1, $2, $3)
            RETURNING nominee_id, nominee_name, relationship_to_customer, share_percentage
            "#,
        )
        .bind(&nominee.nominee_name)
        .bind(&nominee.relationship_to_customer)
        .bind(nominee.share_percentage)
        .fetch_one(&mut *conn)
        .await?;

        debug!(nominee_id = row.nominee_id, "Nominee successfully added");
        Ok(row.into())
    }

    /// Links a nominee to a policy-map row
    ///
    /// # Returns
    ///
    /// `true` if a new link was created, `false` if the link already existed
    #[instrument(skip(self))]
    pub async fn link_to_policy_map(
        &self,
        map_id: PolicyMapId,
        nominee_id: NomineeId,
    ) -> Result<bool, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO nominee_map (policy_map_id, nominee_id)
            VALUES ($1, $2)
            ON CONFLICT (policy_map_id, nominee_id) DO NOTHING
            "#,
        )
        .bind(map_id.value())
        .bind(nominee_id.value())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves the nominees of a policy-map row on an already acquired connection
    pub(crate) async fn nominees_for_map(
        conn: &mut PgConnection,
        map_id: PolicyMapId,
    ) -> Result<Vec<Nominee>, DatabaseError> {
        let nominee_ids: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT nominee_id
            FROM nominee_map
            WHERE policy_map_id = $1
            ORDER BY id
            "#,
        )
        .bind(map_id.value())
        .fetch_all(&mut *conn)
        .await?;

        let mut nominees = Vec::with_capacity(nominee_ids.len());
        for raw_id in nominee_ids {
            let nominee_id = NomineeId::new(raw_id);
            let row = Self::fetch_nominee(conn, nominee_id)
                .await?
                .ok_or_else(|| DatabaseError::not_found("Nominee", nominee_id))?;
            nominees.push(Nominee::from(row));
        }

        Ok(nominees)
    }

    async fn fetch_nominee(
        conn: &mut PgConnection,
        nominee_id: NomineeId,
    ) -> Result<Option<NomineeRow>, DatabaseError> {
        let row = sqlx::query_as::<_, NomineeRow>(
            r#"
            SELECT nominee_id, nominee_name, relationship_to_customer, share_percentage
            FROM nominees
            WHERE nominee_id = $1
            "#,
        )
        .bind(nominee_id.value())
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }
}

/// Database row representation of a nominee
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NomineeRow {
    pub nominee_id: i32,
    pub nominee_name: String,
    pub relationship_to_customer: String,
    pub share_percentage: Decimal,
}

impl From<NomineeRow> for Nominee {
    fn from(row: NomineeRow) -> Self {
        Nominee {
            nominee_id: NomineeId::new(row.nominee_id),
            nominee_name: row.nominee_name,
            relationship_to_customer: row.relationship_to_customer,
            share_percentage: row.share_percentage,
        }
    }
}
