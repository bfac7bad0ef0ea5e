use fitplan::api::routes::create_routes;
use fitplan::config::{run_migrations, AgentConfig, AppConfig, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Resolve configuration once; the services receive value objects
    let app_config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let agent_config = AgentConfig::from_env()?;

    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;

    let app = create_routes(pool, &app_config.jwt_secret, agent_config)?;

    let address = app_config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("fitplan server starting on http://{address}");
    info!("Health check available at http://{address}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
