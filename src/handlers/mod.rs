pub mod index;
pub mod servers;

use actix_web::web;

use crate::probe::Probe;

/// Routes shared by the binary and the HTTP tests.
pub fn routes<P: Probe>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(index::health))
        .route("/api/servers", web::get().to(servers::get_servers::<P>));
}
