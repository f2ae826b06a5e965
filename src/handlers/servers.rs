// src/handlers/servers.rs
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use log::error;

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::probe::Probe;
use crate::storage::memory::RosterStore;
use crate::utils::{extract_client_ip, ClientRateLimiter, RequestError};

/// Runs a fresh probe round and returns the snapshot. Every call probes, so
/// the response must never be cached.
pub async fn get_servers<P: Probe>(
    req: HttpRequest,
    roster: web::Data<RosterStore>,
    aggregator: web::Data<Aggregator<P>>,
    config: web::Data<Config>,
    rate_limiter: web::Data<ClientRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    let client_ip = extract_client_ip(&req, config.trust_forwarded_for)?;

    if rate_limiter.check_key(&client_ip).is_err() {
        error!("Rate limit exceeded for server list for ip: {}", client_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let snapshot = aggregator.build_snapshot(roster.roster()).await;

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"))
        .insert_header((header::PRAGMA, "no-cache"))
        .insert_header((header::EXPIRES, "0"))
        .json(&snapshot))
}
