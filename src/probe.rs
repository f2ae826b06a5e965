// src/probe.rs
use log::debug;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::models::server::ServerDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    NoEndpoint,
    Timeout,
    HttpError(u16),
    NetworkError(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEndpoint => write!(f, "No probe endpoint configured"),
            Self::Timeout => write!(f, "Probe timed out"),
            Self::HttpError(status) => write!(f, "Probe returned HTTP {}", status),
            Self::NetworkError(e) => write!(f, "Network error: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Success { latency_ms: u64, payload: Option<Value> },
    Failure(ProbeFailure),
}

/// Something that can check one server. Implementations must not share
/// mutable state between calls; the aggregator runs many at once.
pub trait Probe: Send + Sync + 'static {
    fn probe(&self, server: &ServerDescriptor) -> impl Future<Output = ProbeOutcome> + Send;
}

pub fn ping_url(link: &str) -> String {
    format!("{}/ping", link.trim().trim_end_matches('/'))
}

/// Invalid or empty bodies are not a probe failure, just no payload.
pub fn parse_payload(body: &str) -> Option<Value> {
    serde_json::from_str(body).ok()
}

/// Probes `GET <link>/ping` over HTTP with a per-call deadline.
#[derive(Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn fetch(&self, url: &str) -> Result<(u64, Option<Value>), ProbeFailure> {
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeFailure::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeFailure::HttpError(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProbeFailure::NetworkError(e.to_string()))?;

        let latency_ms = (started.elapsed().as_millis() as u64).max(1);
        Ok((latency_ms, parse_payload(&body)))
    }
}

impl Probe for HttpProber {
    async fn probe(&self, server: &ServerDescriptor) -> ProbeOutcome {
        let Some(link) = server.probe_link() else {
            return ProbeOutcome::Failure(ProbeFailure::NoEndpoint);
        };
        let url = ping_url(link);

        // Dropping the fetch future on expiry cancels the in-flight request.
        let result = match tokio::time::timeout(self.timeout, self.fetch(&url)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeFailure::Timeout),
        };

        match result {
            Ok((latency_ms, payload)) => {
                debug!("Probe {} ok in {}ms", server.id, latency_ms);
                ProbeOutcome::Success { latency_ms, payload }
            }
            Err(reason) => {
                debug!("Probe {} ({}) failed: {}", server.id, url, reason);
                ProbeOutcome::Failure(reason)
            }
        }
    }
}
