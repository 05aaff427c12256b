//! Structured logging setup for the core and its host server.
//!
//! Initialization is idempotent so embedding binaries and test runs can all
//! call it without coordinating. `RUST_LOG` wins over the configured filter.

use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Base filter directive, e.g. `"info"` or `"skirmish_core=debug"`.
    pub filter: String,
    pub show_targets: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            show_targets: true,
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing with default settings (safe to call multiple times).
pub fn init_tracing_default() {
    init_tracing(&LogConfig::default());
}

/// Initialize tracing with a custom config (first call wins).
pub fn init_tracing(config: &LogConfig) {
    let fallback = config.filter.clone();
    let show_targets = config.show_targets;
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(show_targets)
            .compact();

        // A host binary may have installed its own subscriber already.
        let _ = subscriber.try_init();
    });
}
