use actix_web::{web, App, HttpServer, middleware::Logger};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use log::{error, info};
use reqwest::Client;

mod config;
mod logging;
mod preferences;
mod query;
mod records;
mod routes;
mod screens;
mod search;
mod session;
mod utils;

use config::Config;
use records::RecordStore;
use routes::AppState;
use screens::Controller;
use search::SearchClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    if let Err(e) = logging::setup_logging() {
        eprintln!("Failed to set up logging: {}", e);
        return Ok(());
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Ok(());
        }
    };
    config.log_summary();

    let controller = Controller::new(
        SearchClient::new(Client::new(), &config),
        RecordStore::new(config.record_file.clone()),
    );
    let state = web::Data::new(AppState::new(controller));

    let governor_config = GovernorConfigBuilder::default()
        .per_second(5)
        .burst_size(10)
        .finish()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid rate limit"))?;

    info!("Starting TasteBuddy server on {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Governor::new(&governor_config))
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await
}
