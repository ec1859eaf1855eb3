use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use colloquium::agents::{
    ConversationCoordinator, LlmSelectionPolicy, Orchestrator,
};
use colloquium::config::Config;
use colloquium::llm::Llm;
use colloquium::routes::create_router;
use colloquium::search::PubMedClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colloquium=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Connect to database
    let pool = colloquium::db::create_pool(&config.database).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed");

    // Build the application-scoped orchestrator: shared model connection,
    // role set, selection policy, coordinator, and literature client.
    let llm = Arc::new(Llm::from_config(&config.llm)?);
    let selector = Box::new(LlmSelectionPolicy::new(llm.clone(), config.llm.model.clone()));
    let coordinator = ConversationCoordinator::new(
        colloquium::agents::default_roles(),
        llm,
        selector,
        config.llm.model.clone(),
        config.llm.temperature,
        config.orchestrator.max_turns,
    );
    let literature = PubMedClient::from_config(&config.search);
    let orchestrator = Arc::new(Orchestrator::new(Arc::new(coordinator), literature));

    // Create shared state
    let state = colloquium::AppState {
        pool,
        config: config.clone(),
        orchestrator,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
