use chrono::FixedOffset;
use pulsewatch_core::dashboard::{civil_offset, DEFAULT_UTC_OFFSET_HOURS};

/// Which pulse store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Postgres via sqlx (production). Requires `DATABASE_URL`.
    Postgres,
    /// Process-local memory (dev / tests).
    Memory,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Pulse store backend (default: postgres).
    pub store_backend: StoreBackend,
    /// Maximum pulses returned by `GET /api/pulse` (default: `100`).
    pub recent_limit: usize,
    /// Retention cap for stored pulses; `0` disables trimming (default: `10000`).
    pub retention_max: usize,
    /// Civil timezone used for the dashboard day, alert timestamps, and
    /// report rendering (default: UTC-3, Brasilia).
    pub dashboard_offset: FixedOffset,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default     |
    /// |-----------------------------|-------------|
    /// | `HOST`                      | `0.0.0.0`   |
    /// | `PORT`                      | `3000`      |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`        |
    /// | `PULSE_STORE_BACKEND`       | `postgres`  |
    /// | `RECENT_PULSES_LIMIT`       | `100`       |
    /// | `PULSE_RETENTION_MAX`       | `10000`     |
    /// | `DASHBOARD_UTC_OFFSET_HOURS`| `-3`        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store_backend = match std::env::var("PULSE_STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => panic!("PULSE_STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        let recent_limit: usize = std::env::var("RECENT_PULSES_LIMIT")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("RECENT_PULSES_LIMIT must be a valid usize");

        let retention_max: usize = std::env::var("PULSE_RETENTION_MAX")
            .unwrap_or_else(|_| "10000".into())
            .parse()
            .expect("PULSE_RETENTION_MAX must be a valid usize");

        let offset_hours: i32 = std::env::var("DASHBOARD_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| DEFAULT_UTC_OFFSET_HOURS.to_string())
            .parse()
            .expect("DASHBOARD_UTC_OFFSET_HOURS must be a valid i32");
        let dashboard_offset = civil_offset(offset_hours)
            .expect("DASHBOARD_UTC_OFFSET_HOURS must be between -23 and 23");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_backend,
            recent_limit,
            retention_max,
            dashboard_offset,
        }
    }
}
