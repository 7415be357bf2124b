//! Runtime configuration, read from command-line flags or the environment.

use clap::Parser;
use std::net::SocketAddr;

#[derive(Debug, Clone, Parser)]
#[command(name = "contracts-backend")]
#[command(about = "Parent/child contracts API server")]
pub struct Config {
    /// SQLite database URL
    #[arg(long, env = "CONTRACTS_DATABASE_URL", default_value = "sqlite:contracts.db")]
    pub database_url: String,

    /// Address the HTTP server binds to
    #[arg(long, env = "CONTRACTS_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Origin allowed to call the API from a browser
    #[arg(long, env = "CONTRACTS_CORS_ORIGIN", default_value = "http://localhost:8080")]
    pub cors_origin: String,

    /// Lifetime of issued bearer tokens, 1 hour to 1 year
    #[arg(
        long,
        env = "CONTRACTS_SESSION_TTL_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..=8760)
    )]
    pub session_ttl_hours: i64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "CONTRACTS_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}
