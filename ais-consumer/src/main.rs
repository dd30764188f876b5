use ais_consumer::{settings::Settings, startup::App};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let settings = Settings::new().unwrap();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("starting ais consumer, environment: {:?}", settings.environment);

    App::build(&settings).run().await;
}
