//! Clinic EHR dashboard core library
//!
//! Typed records for the clinic tables, a client for the REST table store,
//! an in-memory mirror of every table, the aggregation helpers behind the
//! dashboard, and the HTML fragment renderers.

#[cfg(feature = "http")]
pub mod api;
pub mod cache;
pub mod core;
pub mod error;
pub mod models;
pub mod render;
pub mod store;

pub use crate::cache::DataCache;
pub use crate::core::controller::{Dashboard, Notice, NoticeKind};
pub use crate::error::{ClinicError, Result};
pub use crate::store::{MemoryTableStore, Resource, TableStore};

/// Application configuration
pub mod config {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Config {
        pub server: ServerConfig,
        pub store: StoreConfig,
        pub logging: LoggingConfig,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct StoreConfig {
        /// Root the `tables/<name>` paths are resolved against.
        pub base_url: String,
        pub timeout_secs: u64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct LoggingConfig {
        pub json: bool,
        pub filter: String,
    }

    /// Load configuration from file
    ///
    /// `path` replaces the default `config/default` location. Every file is
    /// optional; built-in defaults cover a local run.
    pub fn load_config(path: Option<&str>) -> Result<Config, config::ConfigError> {
        let env = std::env::var("CLINIC_ENV").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("store.base_url", "http://127.0.0.1:3000/")?
            .set_default("store.timeout_secs", 10)?
            .set_default("logging.json", false)?
            .set_default("logging.filter", "info")?
            // Start with default settings
            .add_source(config::File::with_name(path.unwrap_or("config/default")).required(false))
            // Override with environment-specific settings
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("CLINIC").separator("__"))
            .build()?
            .try_deserialize()
    }

}
