//! Live status aggregation for a static game-server roster.
//!
//! [`aggregator::Aggregator`] probes every server in a
//! [`storage::memory::RosterStore`] concurrently and produces a
//! [`models::server::Snapshot`] with ping, player and status fields filled in.

pub mod aggregator;
pub mod classify;
pub mod config;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod probe;
pub mod storage;
pub mod utils;
