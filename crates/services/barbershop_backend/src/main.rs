// File: services/barbershop_backend/src/main.rs
use barbershop_common::{config_error, logging, BarbershopError, Context};
use barbershop_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

mod app;
mod service_factory;

use service_factory::BarbershopServiceFactory;

#[tokio::main]
async fn main() -> Result<(), BarbershopError> {
    let config = Arc::new(load_config().map_err(config_error)?);
    logging::init_from_name(config.log_level.as_deref());

    let service_factory = BarbershopServiceFactory::new(config.clone()).await;
    let app = app::build_router(service_factory.gcal_state());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("server stopped with an error")?;
    Ok(())
}
