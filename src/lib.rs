use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use log::info;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
#[cfg(test)]
mod test_util;
pub mod views;

pub async fn run() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("orgpress=debug,actix_web=info"),
    )
    .init();
    let config = config::Config::from_env()?;
    let pool = db::create_connection_pool(&config.database_url)?;
    let bind_address = config.bind_address.clone();
    info!("listening on {}", bind_address);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(middleware::MethodOverride)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await?;
    Ok(())
}
