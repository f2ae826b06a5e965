// src/normalize.rs
//! Player-count extraction from `/ping` payloads.
//!
//! Upstream servers report player counts in several shapes. Each known shape
//! is an [`ExtractorRule`]; rules are tried in table order and the first one
//! that finds a numeric connected count wins.

use log::trace;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerCount<'a> {
    pub connected: f64,
    pub capacity: Option<&'a Value>,
}

pub struct ExtractorRule {
    pub name: &'static str,
    pub extract: for<'a> fn(&'a Value) -> Option<PlayerCount<'a>>,
}

pub const RULES: &[ExtractorRule] = &[
    ExtractorRule { name: "players number", extract: players_number },
    ExtractorRule { name: "players.totalConnected", extract: nested_total_connected },
    ExtractorRule { name: "players.activeCount", extract: nested_active_count },
    ExtractorRule { name: "players.total", extract: nested_total },
    ExtractorRule { name: "players.count", extract: nested_count },
    ExtractorRule { name: "playerCount", extract: player_count },
    ExtractorRule { name: "totalPlayers", extract: total_players },
];

/// Returns the formatted player text for a payload, or `None` when no rule
/// matches. `None` means the caller keeps whatever it already had.
pub fn extract_player_count(payload: Option<&Value>) -> Option<String> {
    let payload = payload?;
    RULES.iter().find_map(|rule| {
        let count = (rule.extract)(payload)?;
        trace!("player count matched rule '{}'", rule.name);
        Some(format_player_count(count))
    })
}

pub fn format_player_count(count: PlayerCount<'_>) -> String {
    match count.capacity.and_then(Value::as_f64).filter(|c| c.is_finite() && *c > 0.0) {
        Some(capacity) => format!("{}/{}", format_number(count.connected), format_number(capacity)),
        None => format_number(count.connected),
    }
}

/// Integral values print without a fractional part ("42", not "42.0").
/// Magnitudes from 1e21 up switch to exponent form with an explicit sign,
/// the way the page script renders them ("1e+21").
fn format_number(n: f64) -> String {
    if n.abs() >= 1e21 {
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn finite(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|n| n.is_finite())
}

/// `a ?? b`: the first field that is present and not null.
fn coalesce<'a>(obj: &'a Value, first: &str, second: &str) -> Option<&'a Value> {
    obj.get(first)
        .filter(|v| !v.is_null())
        .or_else(|| obj.get(second))
}

fn top_level<'a>(payload: &'a Value, field: &str) -> Option<PlayerCount<'a>> {
    Some(PlayerCount {
        connected: finite(payload.get(field))?,
        capacity: payload.get("maxPlayers"),
    })
}

fn nested<'a>(
    payload: &'a Value,
    connected: &str,
    capacity: impl FnOnce(&'a Value) -> Option<&'a Value>,
) -> Option<PlayerCount<'a>> {
    let players = payload.get("players").filter(|p| p.is_object())?;
    Some(PlayerCount {
        connected: finite(players.get(connected))?,
        capacity: capacity(players),
    })
}

fn players_number(payload: &Value) -> Option<PlayerCount<'_>> {
    top_level(payload, "players")
}

fn nested_total_connected(payload: &Value) -> Option<PlayerCount<'_>> {
    nested(payload, "totalConnected", |p| p.get("totalCapacity"))
}

fn nested_active_count(payload: &Value) -> Option<PlayerCount<'_>> {
    nested(payload, "activeCount", |p| p.get("totalCapacity"))
}

fn nested_total(payload: &Value) -> Option<PlayerCount<'_>> {
    nested(payload, "total", |p| coalesce(p, "maxPlayers", "totalCapacity"))
}

fn nested_count(payload: &Value) -> Option<PlayerCount<'_>> {
    nested(payload, "count", |p| coalesce(p, "maxPlayers", "totalCapacity"))
}

fn player_count(payload: &Value) -> Option<PlayerCount<'_>> {
    top_level(payload, "playerCount")
}

fn total_players(payload: &Value) -> Option<PlayerCount<'_>> {
    top_level(payload, "totalPlayers")
}
