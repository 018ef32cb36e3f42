use crate::constants::SUBSCRIPTIONS_ENDPOINT;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level service configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub bundles: BundlesConfig,
    pub subscriptions: SubscriptionsConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    /// Seconds granted to in-flight requests on shutdown.
    pub shutdown_grace_seconds: u64,
    /// Serve HTTPS when present.
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths for the listener.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Where the bundle catalog document lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundlesConfig {
    pub path: PathBuf,
}

/// Subscriptions Service client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubscriptionsConfig {
    pub host: String,
    /// PEM client certificate for mutual TLS.
    pub cert: Option<PathBuf>,
    /// PEM private key matching `cert`.
    pub key: Option<PathBuf>,
    pub timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub cache_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    /// Directory for rolling log files; console only when absent.
    pub path: Option<PathBuf>,
    /// Explicit filter directives, e.g. `ent_server=debug,tower_http=info`.
    pub filter: Option<String>,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            shutdown_grace_seconds: 30,
            ssl: None,
        }
    }
}

impl Default for BundlesConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("bundles/bundles.yml") }
    }
}

impl Default for SubscriptionsConfig {
    fn default() -> Self {
        Self {
            host: SUBSCRIPTIONS_ENDPOINT.to_owned(),
            cert: None,
            key: None,
            timeout_seconds: 10,
            cache_ttl_seconds: 1800,
            cache_capacity: 10_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), json: false, path: None, filter: None }
    }
}
