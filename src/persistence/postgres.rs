//! PostgreSQL implementation of the persistence layer.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::Shift;
use crate::error::MonitorError;

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends an event to the archive.
    ///
    /// # Errors
    ///
    /// Returns a [`MonitorError::PersistenceError`] on database failure.
    pub async fn save_event(
        &self,
        asset_id: Option<Uuid>,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<i64, MonitorError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO archived_events (asset_id, event_type, payload) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(asset_id)
        .bind(event_type)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| MonitorError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Archives a closed shift record.
    ///
    /// # Errors
    ///
    /// Returns a [`MonitorError::PersistenceError`] on database failure,
    /// or if the shift has no end time.
    pub async fn archive_shift(&self, shift: &Shift) -> Result<i64, MonitorError> {
        let end_time = shift.end_time.ok_or_else(|| {
            MonitorError::PersistenceError("cannot archive a shift without an end time".to_owned())
        })?;
        let record_json = serde_json::to_value(shift)
            .map_err(|e| MonitorError::PersistenceError(e.to_string()))?;

        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO archived_shifts (shift_id, shift_number, name, record_json, start_time, end_time) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(*shift.id.as_uuid())
        .bind(i64::try_from(shift.shift_number).unwrap_or(i64::MAX))
        .bind(&shift.name)
        .bind(record_json)
        .bind(shift.start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| MonitorError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Deletes archived events older than the given number of days.
    ///
    /// # Errors
    ///
    /// Returns a [`MonitorError::PersistenceError`] on database failure.
    pub async fn delete_old_events(&self, before_days: u64) -> Result<u64, MonitorError> {
        let cutoff =
            Utc::now() - chrono::Duration::days(i64::try_from(before_days).unwrap_or(i64::MAX));

        let result = sqlx::query("DELETE FROM archived_events WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| MonitorError::PersistenceError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
