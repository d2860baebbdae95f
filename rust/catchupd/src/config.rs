use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "catchups.sqlite3";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// catchupd - catch-up lesson tracker
#[derive(Parser, Debug, Clone)]
#[command(name = "catchupd")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the SQLite database file (created if missing)
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Log filter (trace, debug, info, warn, error, or an `EnvFilter` directive)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
