// src/main.rs

use norde_maison::cart::store::PgCartStore;
use norde_maison::config::AppConfig;
use norde_maison::state::AppState;
use norde_maison::web;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting Norde Maison backend...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
    tracing::error!(error = %e, "Failed to run database migrations.");
    panic!("Migration error: {}", e);
  }

  let app_state = AppState {
    db_pool: db_pool.clone(),
    cart_store: Arc::new(PgCartStore::new(db_pool.clone())),
    config: app_config.clone(),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::routes::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
