use super::IEventRepo;
use chrono::{NaiveDate, NaiveTime};
use rsvp_scheduler_domain::{Event, MessageSchedulePolicy, ScheduleKind, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_uid: Uuid,
    owner_uid: Uuid,
    title: String,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    location: Option<String>,
    additional_info: Option<String>,
    image_url: Option<String>,
    package: String,
    schedule_kind: String,
    days_before: Vec<i32>,
    status: String,
    created: i64,
    updated: i64,
}

impl TryFrom<EventRaw> for Event {
    type Error = anyhow::Error;

    fn try_from(e: EventRaw) -> anyhow::Result<Self> {
        let kind = match e.schedule_kind.as_str() {
            "custom" => ScheduleKind::Custom,
            _ => ScheduleKind::Default,
        };
        let days_before = e
            .days_before
            .into_iter()
            .map(u32::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Event {
            id: e.event_uid.into(),
            owner_id: e.owner_uid.into(),
            title: e.title,
            date: e.date,
            time: e.time,
            location: e.location,
            additional_info: e.additional_info,
            image_url: e.image_url,
            package: e.package.parse()?,
            message_schedule: MessageSchedulePolicy { kind, days_before },
            status: e.status.parse()?,
            created: e.created,
            updated: e.updated,
        })
    }
}

fn schedule_kind(policy: &MessageSchedulePolicy) -> &'static str {
    match policy.kind {
        ScheduleKind::Default => "default",
        ScheduleKind::Custom => "custom",
    }
}

fn days_before(policy: &MessageSchedulePolicy) -> Vec<i32> {
    policy.days_before.iter().map(|d| *d as i32).collect()
}

fn into_events(rows: Vec<EventRaw>) -> anyhow::Result<Vec<Event>> {
    rows.into_iter().map(Event::try_from).collect()
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events(
                event_uid,
                owner_uid,
                title,
                date,
                time,
                location,
                additional_info,
                image_url,
                package,
                schedule_kind,
                days_before,
                status,
                created,
                updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(e.owner_id.inner_ref())
        .bind(&e.title)
        .bind(e.date)
        .bind(e.time)
        .bind(&e.location)
        .bind(&e.additional_info)
        .bind(&e.image_url)
        .bind(e.package.as_str())
        .bind(schedule_kind(&e.message_schedule))
        .bind(days_before(&e.message_schedule))
        .bind(e.status.as_str())
        .bind(e.created)
        .bind(e.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, e: &Event) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE events SET
                owner_uid = $2,
                title = $3,
                date = $4,
                time = $5,
                location = $6,
                additional_info = $7,
                image_url = $8,
                package = $9,
                schedule_kind = $10,
                days_before = $11,
                status = $12,
                updated = $13
            WHERE event_uid = $1
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(e.owner_id.inner_ref())
        .bind(&e.title)
        .bind(e.date)
        .bind(e.time)
        .bind(&e.location)
        .bind(&e.additional_info)
        .bind(&e.image_url)
        .bind(e.package.as_str())
        .bind(schedule_kind(&e.message_schedule))
        .bind(days_before(&e.message_schedule))
        .bind(e.status.as_str())
        .bind(e.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        let event: EventRaw = sqlx::query_as(
            r#"
            SELECT * FROM events AS e
            WHERE e.event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()??;

        match Event::try_from(event) {
            Ok(event) => Some(event),
            Err(e) => {
                error!("Stored event: {} could not be read. Error: {:?}", event_id, e);
                None
            }
        }
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Event>> {
        let ids = event_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let events: Vec<EventRaw> = sqlx::query_as(
            r#"
            SELECT * FROM events AS e
            WHERE e.event_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        into_events(events)
    }

    async fn delete(&self, event_id: &ID) -> Option<Event> {
        let event: EventRaw = sqlx::query_as(
            r#"
            DELETE FROM events AS e
            WHERE e.event_uid = $1
            RETURNING *
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()??;

        Event::try_from(event).ok()
    }
}
