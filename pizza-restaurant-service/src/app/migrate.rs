use pizza_restaurant_service::{PgStore, config::Config};

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    PgStore::new(config.database_url).run_pending_migrations()?;
    Ok(())
}
