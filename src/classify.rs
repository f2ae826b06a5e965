// src/classify.rs
use crate::models::server::{Ping, PingQuality, ServerDescriptor, Status, StatusState};
use crate::normalize::extract_player_count;
use crate::probe::ProbeOutcome;

pub const GOOD_PING_MAX_MS: u64 = 80;
pub const MEDIUM_PING_MAX_MS: u64 = 160;

pub fn ping_quality(latency_ms: u64) -> PingQuality {
    if latency_ms <= GOOD_PING_MAX_MS {
        PingQuality::Good
    } else if latency_ms <= MEDIUM_PING_MAX_MS {
        PingQuality::Medium
    } else {
        PingQuality::High
    }
}

pub fn online_status() -> Status {
    Status {
        label: "Online".to_string(),
        state: StatusState::Online,
    }
}

pub fn offline_status() -> Status {
    Status {
        label: "Offline".to_string(),
        state: StatusState::Offline,
    }
}

pub fn unavailable_ping() -> Ping {
    Ping {
        value: "N/A".to_string(),
        quality: PingQuality::Unknown,
    }
}

/// Writes a probe result into the descriptor's per-snapshot fields.
pub fn apply_outcome(server: &mut ServerDescriptor, outcome: ProbeOutcome) {
    match outcome {
        ProbeOutcome::Success { latency_ms, payload } => {
            server.status = online_status();
            server.ping = Ping {
                value: format!("{}ms", latency_ms),
                quality: ping_quality(latency_ms),
            };
            if let Some(players) = extract_player_count(payload.as_ref()) {
                server.players = players;
            }
            server.ping_data = payload;
        }
        ProbeOutcome::Failure(_) => mark_offline(server),
    }
}

/// Players and pingData are left as they were.
pub fn mark_offline(server: &mut ServerDescriptor) {
    server.status = offline_status();
    server.ping = unavailable_ping();
}
