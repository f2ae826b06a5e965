// src/main.rs
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use governor::RateLimiter;
use log::{error, info};

use server_pulse::aggregator::Aggregator;
use server_pulse::config::Config;
use server_pulse::handlers;
use server_pulse::probe::HttpProber;
use server_pulse::storage::memory::RosterStore;
use server_pulse::utils::ClientRateLimiter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();

    let roster = RosterStore::load(&config.roster_path).map_err(|e| {
        error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let prober = HttpProber::new(config.ping_timeout()).map_err(|e| {
        error!("Failed to build HTTP client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let bind = config.bind();
    info!(
        "Probing {} servers with a {}ms timeout",
        roster.server_count(),
        config.ping_timeout_ms
    );

    let rate_limiter: web::Data<ClientRateLimiter> =
        web::Data::new(RateLimiter::keyed(config.server_list_quota()));
    let roster = web::Data::new(roster);
    let aggregator = web::Data::new(Aggregator::new(prober));
    let config = web::Data::new(config);

    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(roster.clone())
            .app_data(aggregator.clone())
            .app_data(config.clone())
            .app_data(rate_limiter.clone())
            .configure(handlers::routes::<HttpProber>)
    })
        .bind(&bind)?
        .run().await
}
