use std::sync::Arc;
use taskdeck::{api, conf, service, ui};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = conf::Settings::global();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log.level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("taskdeck starting, api at {}", conf::base_url());

    // Wire up the client, session state and task list; the UI borrows them
    let client = Arc::new(api::ApiClient::from_conf());
    let store = service::SessionStore::new(conf::session_file());
    let mut auth = service::AuthContext::new(client.clone(), store);
    let mut tasks = service::TaskController::new(client);

    ui::run(&mut auth, &mut tasks).await
}
