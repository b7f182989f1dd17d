use clap::builder::TypedValueParser;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "SNIP_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "SNIP_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "SNIP_REDIS_URL";
pub const REDIS_NAMESPACE_ENV: &str = "SNIP_REDIS_NAMESPACE";
pub const DASHBOARD_ACCESS_CODE_ENV: &str = "DASHBOARD_ACCESS_CODE";
pub const PUBLIC_BASE_URL_ENV: &str = "SNIP_PUBLIC_BASE_URL";
pub const ID_LENGTH_ENV: &str = "SNIP_ID_LENGTH";
pub const PROXY_TIMEOUT_ENV: &str = "SNIP_PROXY_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "SNIP_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_REDIS_NAMESPACE: &str = "snip";
pub const DEFAULT_ID_LENGTH: usize = 6;
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "snip", about = "Short link service")]
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

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = REDIS_NAMESPACE_ENV, default_value = DEFAULT_REDIS_NAMESPACE)]
    pub redis_namespace: String,

    #[arg(long, env = DASHBOARD_ACCESS_CODE_ENV, hide_env_values = true)]
    pub dashboard_access_code: Option<String>,

    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<String>,

    #[arg(
        long,
        env = ID_LENGTH_ENV,
        default_value_t = DEFAULT_ID_LENGTH,
        value_parser = clap::value_parser!(u8).range(6..=8).map(usize::from)
    )]
    pub id_length: usize,

    #[arg(long, env = PROXY_TIMEOUT_ENV, default_value_t = DEFAULT_PROXY_TIMEOUT_SECS)]
    pub proxy_timeout_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}
