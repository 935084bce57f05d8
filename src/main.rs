use anyhow::Context;
use drama_catalog::{
    config::Config,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("drama-catalog".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let config = Config::new().context("Failed to read configuration.")?;

    let application = Application::build(config)
        .await
        .context("Failed creating server.")?;

    tracing::info!(
        "Starting server: http://{}:{}",
        application.host(),
        application.port()
    );

    application.run_until_stopped().await?;

    Ok(())
}
