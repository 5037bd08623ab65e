mod event;
mod guest;
mod scheduled_message;
mod shared;

use event::{InMemoryEventRepo, PostgresEventRepo};
use guest::{InMemoryGuestRepo, PostgresGuestRepo};
use scheduled_message::{InMemoryScheduledMessageRepo, PostgresScheduledMessageRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

pub use event::IEventRepo;
pub use guest::IGuestRepo;
pub use scheduled_message::IScheduledMessageRepo;
pub use shared::repo::DeleteResult;

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub guests: Arc<dyn IGuestRepo>,
    pub scheduled_messages: Arc<dyn IScheduledMessageRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            guests: Arc::new(PostgresGuestRepo::new(pool.clone())),
            scheduled_messages: Arc::new(PostgresScheduledMessageRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        let events = Arc::new(InMemoryEventRepo::new());
        Self {
            events: events.clone(),
            guests: Arc::new(InMemoryGuestRepo::new()),
            scheduled_messages: Arc::new(InMemoryScheduledMessageRepo::new(events)),
        }
    }
}
