use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "FLACON_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "FLACON_STORAGE";
pub const POSTGRES_DSN_ENV: &str = "FLACON_POSTGRES_DSN";
pub const AUTH_KEY_ENV: &str = "FLACON_AUTH_KEY";
pub const SHORTENER_BASE_URL_ENV: &str = "FLACON_SHORTENER_BASE_URL";
pub const SHORTENER_API_KEY_ENV: &str = "FLACON_SHORTENER_API_KEY";
pub const SHORT_ENDPOINT_URL_ENV: &str = "FLACON_SHORT_ENDPOINT_URL";
pub const WEBHOOK_URL_ENV: &str = "FLACON_WEBHOOK_URL";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "flacon-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = POSTGRES_DSN_ENV, required_if_eq("storage", "postgres"))]
    pub postgres_dsn: Option<String>,

    #[arg(long, env = AUTH_KEY_ENV)]
    pub auth_key: String,

    #[arg(long, env = SHORTENER_BASE_URL_ENV)]
    pub shortener_base_url: String,

    #[arg(long, env = SHORTENER_API_KEY_ENV)]
    pub shortener_api_key: String,

    #[arg(long, env = SHORT_ENDPOINT_URL_ENV)]
    pub short_endpoint_url: String,

    #[arg(long, env = WEBHOOK_URL_ENV)]
    pub webhook_url: String,
}
