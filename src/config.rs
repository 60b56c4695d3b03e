//! Configuration for Wicket
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Wicket - HTTP gateway for the files-manager stores
#[derive(Parser, Debug, Clone)]
#[command(name = "wicket")]
#[command(about = "Registration, token auth and store stats over MongoDB + Redis")]
pub struct Args {
    /// MongoDB host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// MongoDB port
    #[arg(long, env = "DB_PORT", default_value = "27017")]
    pub db_port: u16,

    /// MongoDB database name
    #[arg(long, env = "DB_DATABASE", default_value = "files_manager")]
    pub db_database: String,

    /// Redis connection URL for the session store
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Startup readiness gate: how many times to poll the persistent store
    /// before giving up
    #[arg(long, env = "DB_WAIT_ATTEMPTS", default_value = "10")]
    pub db_wait_attempts: u32,

    /// Startup readiness gate: interval between polls, in milliseconds
    #[arg(long, env = "DB_WAIT_INTERVAL_MS", default_value = "1000")]
    pub db_wait_interval_ms: u64,
}

impl Args {
    /// Assemble the MongoDB connection URI from host and port
    pub fn mongodb_uri(&self) -> String {
        format!("mongodb://{}:{}", self.db_host, self.db_port)
    }

    /// Address the HTTP server binds to
    pub fn listen(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Interval between readiness-gate polls
    pub fn db_wait_interval(&self) -> Duration {
        Duration::from_millis(self.db_wait_interval_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.db_wait_attempts == 0 {
            return Err("DB_WAIT_ATTEMPTS must be at least 1".to_string());
        }
        if self.db_wait_interval_ms == 0 {
            return Err("DB_WAIT_INTERVAL_MS must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("args should parse")
    }

    #[test]
    fn defaults_match_store_conventions() {
        let args = parse(&["wicket"]);
        assert_eq!(args.db_host, "localhost");
        assert_eq!(args.db_port, 27017);
        assert_eq!(args.db_database, "files_manager");
        assert_eq!(args.port, 5000);
        assert_eq!(args.db_wait_attempts, 10);
        assert_eq!(args.db_wait_interval_ms, 1000);
    }

    #[test]
    fn mongodb_uri_is_assembled_from_host_and_port() {
        let args = parse(&["wicket", "--db-host", "mongo.internal", "--db-port", "27018"]);
        assert_eq!(args.mongodb_uri(), "mongodb://mongo.internal:27018");
    }

    #[test]
    fn listen_uses_configured_port() {
        let args = parse(&["wicket", "--port", "8081"]);
        assert_eq!(args.listen().port(), 8081);
    }

    #[test]
    fn zero_wait_budget_is_rejected() {
        let args = parse(&["wicket", "--db-wait-attempts", "0"]);
        assert!(args.validate().is_err());
    }
}
