use std::sync::Arc;

use pulsewatch_alert::AlertNotifier;
use pulsewatch_db::PulseStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The configured pulse store backend.
    pub store: Arc<dyn PulseStore>,
    /// Flood alert notifier; `None` when SMTP is not configured.
    pub alerter: Option<Arc<dyn AlertNotifier>>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
