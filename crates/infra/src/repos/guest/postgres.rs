use super::IGuestRepo;
use crate::repos::shared::repo::DeleteResult;
use rsvp_scheduler_domain::{Guest, PhoneNumber, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresGuestRepo {
    pool: PgPool,
}

impl PostgresGuestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GuestRaw {
    guest_uid: Uuid,
    event_uid: Uuid,
    name: String,
    phone: String,
    email: Option<String>,
    status: String,
    attending_count: i32,
    conversation_state: String,
    version: i64,
    created: i64,
    updated: i64,
}

impl TryFrom<GuestRaw> for Guest {
    type Error = anyhow::Error;

    fn try_from(g: GuestRaw) -> anyhow::Result<Self> {
        Ok(Guest {
            id: g.guest_uid.into(),
            event_id: g.event_uid.into(),
            name: g.name,
            phone: PhoneNumber::parse(&g.phone)?,
            email: g.email,
            status: g.status.parse()?,
            attending_count: u32::try_from(g.attending_count)?,
            conversation_state: g.conversation_state.parse()?,
            version: g.version,
            created: g.created,
            updated: g.updated,
        })
    }
}

fn into_guests(rows: Vec<GuestRaw>) -> anyhow::Result<Vec<Guest>> {
    rows.into_iter().map(Guest::try_from).collect()
}

fn into_guest(guest_id: &ID, row: GuestRaw) -> Option<Guest> {
    match Guest::try_from(row) {
        Ok(guest) => Some(guest),
        Err(e) => {
            error!("Stored guest: {} could not be read. Error: {:?}", guest_id, e);
            None
        }
    }
}

#[async_trait::async_trait]
impl IGuestRepo for PostgresGuestRepo {
    async fn insert(&self, guest: &Guest) -> anyhow::Result<()> {
        self.insert_many(std::slice::from_ref(guest)).await
    }

    async fn insert_many(&self, guests: &[Guest]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        for g in guests {
            sqlx::query(
                r#"
                INSERT INTO guests(
                    guest_uid,
                    event_uid,
                    name,
                    phone,
                    email,
                    status,
                    attending_count,
                    conversation_state,
                    version,
                    created,
                    updated
                )
                VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(g.id.inner_ref())
            .bind(g.event_id.inner_ref())
            .bind(&g.name)
            .bind(g.phone.as_str())
            .bind(&g.email)
            .bind(g.status.as_str())
            .bind(g.attending_count as i32)
            .bind(g.conversation_state.as_str())
            .bind(g.version)
            .bind(g.created)
            .bind(g.updated)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn save(&self, g: &Guest) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE guests SET
                name = $2,
                phone = $3,
                email = $4,
                status = $5,
                attending_count = $6,
                conversation_state = $7,
                version = version + 1,
                updated = $8
            WHERE guest_uid = $1
            "#,
        )
        .bind(g.id.inner_ref())
        .bind(&g.name)
        .bind(g.phone.as_str())
        .bind(&g.email)
        .bind(g.status.as_str())
        .bind(g.attending_count as i32)
        .bind(g.conversation_state.as_str())
        .bind(g.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_versioned(&self, g: &Guest) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE guests SET
                name = $3,
                phone = $4,
                email = $5,
                status = $6,
                attending_count = $7,
                conversation_state = $8,
                version = version + 1,
                updated = $9
            WHERE guest_uid = $1 AND version = $2
            "#,
        )
        .bind(g.id.inner_ref())
        .bind(g.version)
        .bind(&g.name)
        .bind(g.phone.as_str())
        .bind(&g.email)
        .bind(g.status.as_str())
        .bind(g.attending_count as i32)
        .bind(g.conversation_state.as_str())
        .bind(g.updated)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn find(&self, guest_id: &ID) -> Option<Guest> {
        let guest: GuestRaw = sqlx::query_as(
            r#"
            SELECT * FROM guests AS g
            WHERE g.guest_uid = $1
            "#,
        )
        .bind(guest_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()??;

        into_guest(guest_id, guest)
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Guest>> {
        let guests: Vec<GuestRaw> = sqlx::query_as(
            r#"
            SELECT * FROM guests AS g
            WHERE g.event_uid = $1
            ORDER BY g.created, g.name
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        into_guests(guests)
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> anyhow::Result<Vec<Guest>> {
        let guests: Vec<GuestRaw> = sqlx::query_as(
            r#"
            SELECT * FROM guests AS g
            WHERE g.phone = $1
            ORDER BY g.updated DESC
            "#,
        )
        .bind(phone.as_str())
        .fetch_all(&self.pool)
        .await?;

        into_guests(guests)
    }

    async fn find_by_phone_suffix(&self, suffix: &str) -> anyhow::Result<Vec<Guest>> {
        let guests: Vec<GuestRaw> = sqlx::query_as(
            r#"
            SELECT * FROM guests AS g
            WHERE right(g.phone, char_length($1)) = $1
            ORDER BY g.updated DESC
            "#,
        )
        .bind(suffix)
        .fetch_all(&self.pool)
        .await?;

        into_guests(guests)
    }

    async fn delete(&self, guest_id: &ID) -> Option<Guest> {
        let guest: GuestRaw = sqlx::query_as(
            r#"
            DELETE FROM guests AS g
            WHERE g.guest_uid = $1
            RETURNING *
            "#,
        )
        .bind(guest_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()??;

        into_guest(guest_id, guest)
    }

    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM guests AS g
            WHERE g.event_uid = $1
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
