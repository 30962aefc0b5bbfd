use agency_backoffice::{
    config::{get_config, init_config},
    routes,
    services::ai_service::{AIService, ChatCompletionClient},
    utils::id::UuidGenerator,
    AppState,
};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let http_client = Client::builder().timeout(Duration::from_secs(120)).build()?;
    let completion = ChatCompletionClient::new(
        http_client,
        config.ai_api_key.clone(),
        config.ai_base_url.clone(),
        config.ai_model.clone(),
    );
    if config.ai_api_key.is_none() {
        tracing::warn!("AI_API_KEY is not set, AI enhancement and CV polishing are unavailable");
    }

    let app_state = AppState::new(
        AIService::new(Arc::new(completion)),
        Arc::new(UuidGenerator),
        Some(config.connection_file.clone()),
    );

    // A missing, privileged or unreachable store leaves the service running in
    // the blocked state; the connect route can fix it later.
    match config.resolve_credentials().await {
        Some(credentials) => {
            if let Err(e) = app_state.connect(&credentials).await {
                tracing::error!("Initial store connection failed: {}", e);
            }
        }
        None => info!("No store credentials configured, waiting for /api/connection"),
    }

    let app = routes::app(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
