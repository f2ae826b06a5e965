use std::env;
use std::time::Duration;
use std::num::NonZeroU32;
use governor::Quota;

#[derive(Clone, Debug)]
pub struct Config {
    // Probing
    pub ping_timeout_ms: u64,
    pub roster_path: String,

    // HTTP
    pub bind_address: String,
    pub port: u16,
    pub trust_forwarded_for: bool,

    // Rate limiting configs
    pub server_list_period_secs: u64,
    pub server_list_burst_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ping_timeout_ms: 4000,
            roster_path: "roster.json".to_string(),
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            trust_forwarded_for: false,
            server_list_period_secs: 1,
            server_list_burst_limit: 30,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ping_timeout_ms: env_or("PING_TIMEOUT_MS", defaults.ping_timeout_ms),
            roster_path: env_or("ROSTER_PATH", defaults.roster_path),
            bind_address: env_or("BIND_ADDRESS", defaults.bind_address),
            port: env_or("PORT", defaults.port),
            trust_forwarded_for: env_or("TRUST_FORWARDED_FOR", defaults.trust_forwarded_for),
            server_list_period_secs: env_or("SERVER_LIST_PERIOD_SECS", defaults.server_list_period_secs),
            server_list_burst_limit: env_or("SERVER_LIST_BURST_LIMIT", defaults.server_list_burst_limit),
        }
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn server_list_quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.server_list_burst_limit).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(Duration::from_secs(self.server_list_period_secs.max(1)))
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }
}
