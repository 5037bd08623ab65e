mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{DeleteResult, IEventRepo, IGuestRepo, IScheduledMessageRepo, Repos};
pub use services::*;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use services::delivery::{DeliveryProviders, InMemoryDeliveryProvider};
use system::RealSys;

#[derive(Clone)]
pub struct RsvpContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub providers: DeliveryProviders,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl RsvpContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .map_err(|e| anyhow::anyhow!("Postgres credentials must be set and valid: {}", e))?;
        let providers = DeliveryProviders::from_env()?;
        Ok(Self {
            repos,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            providers,
        })
    }

    /// Context backed by in-memory repositories and recording delivery providers
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            providers: DeliveryProviders {
                whatsapp: Arc::new(InMemoryDeliveryProvider::new()),
                sms: Arc::new(InMemoryDeliveryProvider::new()),
            },
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<RsvpContext> {
    RsvpContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string()?,
    })
    .await
}

fn get_psql_connection_string() -> anyhow::Result<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .map_err(|_| anyhow::anyhow!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> anyhow::Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string()?)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    Ok(())
}
