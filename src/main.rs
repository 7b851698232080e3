mod availability;
mod catalog;
mod config;
mod db;
mod draft;
mod models;
mod pricing;
mod relay;
mod routes;
mod state;
mod templates;

use actix_files::Files;
use actix_web::{middleware, web, App, HttpServer};

use crate::{
    config::AppConfig,
    db::BookingStore,
    relay::RelayClient,
    state::AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let config = AppConfig::from_env()?;
    config.log_disabled_features();

    // A database that cannot be opened disables booking instead of the whole site.
    let store = match config.database_url.as_deref() {
        Some(db_url) => match db::connect(db_url).await {
            Ok(pool) => Some(BookingStore::new(pool)),
            Err(err) => {
                log::error!("Could not open {db_url}: {err}. Booking storage is disabled.");
                None
            }
        },
        None => None,
    };

    let state = AppState {
        store,
        relay: RelayClient::new(config.relay.clone())?,
        business_name: config.business_name.clone(),
    };

    let address = format!("0.0.0.0:{}", config.port);
    log::info!("Starting {} on http://{address}", config.business_name);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "./static").prefer_utf8(true))
            .configure(routes::public::configure)
            .configure(routes::api::configure)
            .configure(routes::admin::configure)
            .default_service(web::to(routes::not_found))
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
