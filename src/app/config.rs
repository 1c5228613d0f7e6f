use crate::app::rbac::store::DEFAULT_MAX_TREE_DEPTH;

/// Centralized environment configuration.
/// All env vars and defaults are defined here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL. Required.
    pub database_url: String,

    /// Address the HTTP server listens on.
    /// Default: 0.0.0.0:3000
    pub bind_addr: String,

    /// Lifetime of a login session in days.
    /// Default: 7
    pub session_ttl_days: i64,

    /// Mark the session cookie `Secure`. Enable behind TLS.
    /// Default: false
    pub cookie_secure: bool,

    /// Longest parent chain followed before the org tree is reported malformed.
    /// Default: 64
    pub org_tree_max_depth: usize,

    /// Identity the agent CLI acts as. Optional for the server.
    pub agent_user_id: Option<String>,
}

impl Config {
    /// Build config from environment variables.
    /// Returns an error if required vars are missing.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in .env")?;

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let session_ttl_days = std::env::var("SESSION_TTL_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse::<i64>()
            .ok()
            .filter(|d| *d > 0)
            .ok_or("SESSION_TTL_DAYS must be a positive number of days")?;

        let cookie_secure = match std::env::var("COOKIE_SECURE") {
            Ok(v) => parse_flag(&v).ok_or("COOKIE_SECURE must be true or false")?,
            Err(_) => false,
        };

        let org_tree_max_depth = match std::env::var("ORG_TREE_MAX_DEPTH") {
            Ok(v) => v
                .parse::<usize>()
                .ok()
                .filter(|d| *d > 0)
                .ok_or("ORG_TREE_MAX_DEPTH must be a positive integer")?,
            Err(_) => DEFAULT_MAX_TREE_DEPTH,
        };

        let agent_user_id = std::env::var("NORTHSTAR_USER_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            database_url,
            bind_addr,
            session_ttl_days,
            cookie_secure,
            org_tree_max_depth,
            agent_user_id,
        })
    }

    /// Config for tests. Uses in-memory database URL.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            session_ttl_days: 7,
            cookie_secure: false,
            org_tree_max_depth: DEFAULT_MAX_TREE_DEPTH,
            agent_user_id: None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
