use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use warbler::config::AppConfig;
use warbler::context::AppState;
use warbler::db::WarblerDb;
use warbler::routes::configure_routes;
use warbler::session::SessionKey;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // RUST_LOG wins, otherwise info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = AppConfig::from_env()?;

    let db = WarblerDb::new(config.database.clone()).await?;
    db.create_all().await?;

    let state = AppState::new(db, SessionKey::new(&config.secret_key));
    let routes = configure_routes(state, config.static_dir.clone());

    tracing::info!("Starting server on http://{}", config.addr);
    warp::serve(routes).run(config.addr).await;

    Ok(())
}
