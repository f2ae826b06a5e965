// src/handlers/index.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::storage::memory::RosterStore;

pub async fn health(roster: web::Data<RosterStore>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok", "servers": roster.server_count() }))
}
