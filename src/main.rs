use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use freightbill::app::{AppServices, Repositories};
use freightbill::config::{Config, LogFormat};
use freightbill::middleware::RequestId;
use freightbill::modules::carriers::HttpCarrierClient;
use freightbill::modules::pricing::{BracketRateTable, RateTable};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("freightbill={},actix_web=info", config.app.log_level)));
    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(env = %config.app.env, bind = %config.server.bind_address(), "Starting freightbill");

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!(connections = config.database.pool_size, "Database pool initialized");

    let rate_table: Arc<dyn RateTable> = match &config.pricing.rate_table_path {
        Some(path) => Arc::new(BracketRateTable::from_file(path).context("Failed to load rate table")?),
        None => {
            tracing::warn!("RATE_TABLE_PATH not set; only verified special rates can be priced");
            Arc::new(BracketRateTable::default())
        }
    };
    let carrier = Arc::new(HttpCarrierClient::new(&config.carrier)?);

    let services = AppServices::build(
        &config.pricing,
        rate_table,
        carrier,
        Repositories::mysql(db_pool.clone()),
    );

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .configure(move |cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);
    server.await?;

    Ok(())
}
