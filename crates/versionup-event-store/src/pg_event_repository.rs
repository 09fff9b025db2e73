//! `PostgreSQL` implementation of the `EventRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use versionup_core::error::DomainError;
use versionup_core::repository::{EventRepository, StoredEvent};

/// PostgreSQL-backed event repository.
#[derive(Debug, Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Creates a new `PgEventRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    event_id: Uuid,
    aggregate_id: Uuid,
    event_type: String,
    payload: serde_json::Value,
    sequence_number: i64,
    correlation_id: Uuid,
    causation_id: Uuid,
    occurred_at: DateTime<Utc>,
}

impl From<EventRow> for StoredEvent {
    fn from(row: EventRow) -> Self {
        StoredEvent {
            event_id: row.event_id,
            aggregate_id: row.aggregate_id,
            event_type: row.event_type,
            payload: row.payload,
            sequence_number: row.sequence_number,
            correlation_id: row.correlation_id,
            causation_id: row.causation_id,
            occurred_at: row.occurred_at,
        }
    }
}

fn infra(context: &str, err: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {err}"))
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT event_id, aggregate_id, event_type, payload, sequence_number, \
                    correlation_id, causation_id, occurred_at \
             FROM domain_events \
             WHERE aggregate_id = $1 \
             ORDER BY sequence_number",
        )
        .bind(aggregate_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infra("event load failed", &e))?;

        Ok(rows.into_iter().map(StoredEvent::from).collect())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| infra("transaction begin failed", &e))?;

        // Optimistic concurrency: the stream head must match the version the
        // aggregate was reconstituted at.
        let actual: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sequence_number), 0) FROM domain_events WHERE aggregate_id = $1",
        )
        .bind(aggregate_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| infra("version check failed", &e))?;

        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        for event in events {
            sqlx::query(
                "INSERT INTO domain_events \
                     (event_id, aggregate_id, event_type, payload, sequence_number, \
                      correlation_id, causation_id, occurred_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(event.event_id)
            .bind(event.aggregate_id)
            .bind(&event.event_type)
            .bind(&event.payload)
            .bind(event.sequence_number)
            .bind(event.correlation_id)
            .bind(event.causation_id)
            .bind(event.occurred_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                // A writer that slipped past the version check loses on the
                // (aggregate_id, sequence_number) unique constraint.
                if e.as_database_error()
                    .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
                {
                    DomainError::ConcurrencyConflict {
                        aggregate_id,
                        expected: expected_version,
                        actual: event.sequence_number,
                    }
                } else {
                    infra("event insert failed", &e)
                }
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| infra("transaction commit failed", &e))?;

        tracing::debug!(
            %aggregate_id,
            count = events.len(),
            "appended domain events"
        );

        Ok(())
    }
}
