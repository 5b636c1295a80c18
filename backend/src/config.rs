use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use party_core::constants::{DEFAULT_EXEMPT_PLAYER, DEFAULT_REWARD_POOL_SIZE};
use party_core::validation::validate_pool_size;
use tracing::warn;

const DEFAULT_SESSION_EXPIRY_SECONDS: u64 = 43200; // 12 hours

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub session_expiry: Duration,
    pub exempt_player: String,
    pub reward_pool_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            session_expiry: Duration::from_secs(DEFAULT_SESSION_EXPIRY_SECONDS),
            exempt_player: DEFAULT_EXEMPT_PLAYER.to_string(),
            reward_pool_size: DEFAULT_REWARD_POOL_SIZE,
        }
    }
}

impl Config {
    /// Reads `PARTY_*` variables, keeping the default for anything missing or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut reward_pool_size = env_or("PARTY_REWARD_POOL", defaults.reward_pool_size);
        if validate_pool_size(reward_pool_size).is_err() {
            warn!("PARTY_REWARD_POOL={} is out of range, using {}", reward_pool_size, defaults.reward_pool_size);
            reward_pool_size = defaults.reward_pool_size;
        }

        Self {
            bind_addr: env_or("PARTY_BIND_ADDR", defaults.bind_addr),
            session_expiry: Duration::from_secs(env_or(
                "PARTY_SESSION_EXPIRY",
                defaults.session_expiry.as_secs(),
            )),
            exempt_player: env::var("PARTY_EXEMPT_PLAYER").unwrap_or(defaults.exempt_player),
            reward_pool_size,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Ignoring {}={:?} ({}), using {}", key, raw, e, default);
            default
        }),
        Err(_) => default,
    }
}
