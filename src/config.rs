use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use crate::service::DEFAULT_MAX_QUANTITY;

/// Server settings, read from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "server", about = "Pack calculator HTTP API")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Maximum log level: trace, debug, info, warn or error
    #[arg(long, env = "APP_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,

    /// File the server appends its log to
    #[arg(long, env = "LOG_FILE", default_value = "development.log")]
    pub log_file: PathBuf,

    /// Sentry DSN; error reporting is off when unset
    #[arg(long, env = "SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Largest order quantity accepted
    #[arg(long, env = "MAX_ORDER_QUANTITY", default_value_t = DEFAULT_MAX_QUANTITY)]
    pub max_quantity: u32,

    /// Pack sizes available at startup, comma separated
    #[arg(
        long,
        env = "PACK_SIZES",
        value_delimiter = ',',
        default_values_t = [250, 500, 1000, 2000, 5000],
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub pack_sizes: Vec<u32>,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
