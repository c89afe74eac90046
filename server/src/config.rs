//! Runtime settings read from the environment.
//!
//! New sessions start with the demo lists unless `TODOS_SEED` is turned
//! off, the same first-run experience as the bundled seed data.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use crate::session::SessionLimits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Start every new session with the demo lists.
    pub seed: bool,
    pub log_json: bool,
    /// Most sessions kept before the least recently seen are evicted.
    pub max_sessions: usize,
    /// How long a session survives without requests.
    pub session_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let limits = SessionLimits::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            seed: true,
            log_json: false,
            max_sessions: limits.max_sessions,
            session_ttl: limits.idle_ttl,
        }
    }
}

impl Config {
    /// Reads `TODOS_HOST`, `PORT`, `TODOS_SEED`, `TODOS_LOG_JSON`,
    /// `TODOS_MAX_SESSIONS` and `TODOS_SESSION_TTL_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let ttl_secs = number(
            lookup("TODOS_SESSION_TTL_SECS"),
            "TODOS_SESSION_TTL_SECS",
            defaults.session_ttl.as_secs(),
        );
        Self {
            host: lookup("TODOS_HOST").unwrap_or(defaults.host),
            port: number(lookup("PORT"), "PORT", defaults.port),
            seed: flag(lookup("TODOS_SEED"), "TODOS_SEED", defaults.seed),
            log_json: flag(lookup("TODOS_LOG_JSON"), "TODOS_LOG_JSON", defaults.log_json),
            max_sessions: number(
                lookup("TODOS_MAX_SESSIONS"),
                "TODOS_MAX_SESSIONS",
                defaults.max_sessions,
            ),
            session_ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_sessions: self.max_sessions,
            idle_ttl: self.session_ttl,
        }
    }
}

/// Parse a positive number, falling back to `default` on anything else.
fn number<T>(raw: Option<String>, name: &str, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => value,
        _ => {
            tracing::warn!(value = %raw, "invalid {name}, using {default}");
            default
        }
    }
}

fn flag(raw: Option<String>, name: &str, default: bool) -> bool {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!(value = %raw, "invalid {name}, using {default}");
            default
        }
    }
}
