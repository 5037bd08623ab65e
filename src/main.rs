mod telemetry;

use rsvp_scheduler_api::Application;
use rsvp_scheduler_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("rsvp_scheduler_server".into(), "info".into());
    init_subscriber(subscriber)?;

    run_migration().await?;
    info!("Database migrations are up to date");

    let context = setup_context().await?;

    let app = Application::new(context).await?;
    app.start().await?;
    Ok(())
}
