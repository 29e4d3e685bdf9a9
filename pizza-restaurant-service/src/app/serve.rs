use pizza_restaurant_service::{AppState, PgStore, app, config::Config};
use tracing::info;

pub async fn main(bind: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let store = PgStore::new(config.database_url);
    store.run_pending_migrations()?;

    let app = app(AppState::new(store));

    let address = bind.unwrap_or(config.bind_address);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Pizza restaurant service listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
