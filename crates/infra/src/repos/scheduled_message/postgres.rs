use super::IScheduledMessageRepo;
use crate::repos::shared::repo::DeleteResult;
use chrono::NaiveDate;
use rsvp_scheduler_domain::{ScheduledMessage, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresScheduledMessageRepo {
    pool: PgPool,
}

impl PostgresScheduledMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledMessageRaw {
    message_uid: Uuid,
    event_uid: Uuid,
    ordinal: i32,
    days_before: i32,
    due_date: NaiveDate,
    status: String,
    sent_at: Option<i64>,
    sent_count: i32,
    failed_count: i32,
    error_message: Option<String>,
    created: i64,
    updated: i64,
}

impl TryFrom<ScheduledMessageRaw> for ScheduledMessage {
    type Error = anyhow::Error;

    fn try_from(m: ScheduledMessageRaw) -> anyhow::Result<Self> {
        Ok(ScheduledMessage {
            id: m.message_uid.into(),
            event_id: m.event_uid.into(),
            ordinal: u32::try_from(m.ordinal)?,
            days_before: u32::try_from(m.days_before)?,
            due_date: m.due_date,
            status: m.status.parse()?,
            sent_at: m.sent_at,
            sent_count: u32::try_from(m.sent_count)?,
            failed_count: u32::try_from(m.failed_count)?,
            error_message: m.error_message,
            created: m.created,
            updated: m.updated,
        })
    }
}

fn into_messages(rows: Vec<ScheduledMessageRaw>) -> anyhow::Result<Vec<ScheduledMessage>> {
    rows.into_iter().map(ScheduledMessage::try_from).collect()
}

#[async_trait::async_trait]
impl IScheduledMessageRepo for PostgresScheduledMessageRepo {
    async fn insert(&self, m: &ScheduledMessage) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO scheduled_messages(
                message_uid,
                event_uid,
                ordinal,
                days_before,
                due_date,
                status,
                sent_at,
                sent_count,
                failed_count,
                error_message,
                created,
                updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (event_uid, ordinal) DO NOTHING
            "#,
        )
        .bind(m.id.inner_ref())
        .bind(m.event_id.inner_ref())
        .bind(m.ordinal as i32)
        .bind(m.days_before as i32)
        .bind(m.due_date)
        .bind(m.status.as_str())
        .bind(m.sent_at)
        .bind(m.sent_count as i32)
        .bind(m.failed_count as i32)
        .bind(&m.error_message)
        .bind(m.created)
        .bind(m.updated)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn save(&self, m: &ScheduledMessage) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_messages SET
                due_date = $2,
                status = $3,
                sent_at = $4,
                sent_count = $5,
                failed_count = $6,
                error_message = $7,
                updated = $8
            WHERE message_uid = $1
            "#,
        )
        .bind(m.id.inner_ref())
        .bind(m.due_date)
        .bind(m.status.as_str())
        .bind(m.sent_at)
        .bind(m.sent_count as i32)
        .bind(m.failed_count as i32)
        .bind(&m.error_message)
        .bind(m.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, message_id: &ID) -> Option<ScheduledMessage> {
        let message: ScheduledMessageRaw = sqlx::query_as(
            r#"
            SELECT * FROM scheduled_messages AS m
            WHERE m.message_uid = $1
            "#,
        )
        .bind(message_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()??;

        match ScheduledMessage::try_from(message) {
            Ok(message) => Some(message),
            Err(e) => {
                error!(
                    "Stored scheduled message: {} could not be read. Error: {:?}",
                    message_id, e
                );
                None
            }
        }
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<ScheduledMessage>> {
        let messages: Vec<ScheduledMessageRaw> = sqlx::query_as(
            r#"
            SELECT * FROM scheduled_messages AS m
            WHERE m.event_uid = $1
            ORDER BY m.ordinal
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        into_messages(messages)
    }

    async fn find_due(
        &self,
        today: NaiveDate,
        stale_before: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<ScheduledMessage>> {
        let messages: Vec<ScheduledMessageRaw> = sqlx::query_as(
            r#"
            SELECT m.* FROM scheduled_messages AS m
            INNER JOIN events AS e
                ON e.event_uid = m.event_uid
            WHERE (m.status = 'pending' OR (m.status = 'processing' AND m.updated < $2))
                AND m.due_date <= $1
                AND e.status = 'active'
                AND e.date IS NOT NULL
            ORDER BY m.due_date, m.ordinal
            LIMIT $3
            "#,
        )
        .bind(today)
        .bind(stale_before)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        into_messages(messages)
    }

    async fn claim(&self, message_id: &ID, now: i64, stale_before: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE scheduled_messages SET
                status = 'processing',
                updated = $2
            WHERE message_uid = $1
                AND (status = 'pending' OR (status = 'processing' AND updated < $3))
            "#,
        )
        .bind(message_id.inner_ref())
        .bind(now)
        .bind(stale_before)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn release(&self, message_id: &ID, now: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_messages SET
                status = 'pending',
                updated = $2
            WHERE message_uid = $1 AND status = 'processing'
            "#,
        )
        .bind(message_id.inner_ref())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_pending_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM scheduled_messages AS m
            WHERE m.event_uid = $1 AND m.status = 'pending'
            "#,
        )
        .bind(event_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }

    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM scheduled_messages AS m
            WHERE m.event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
