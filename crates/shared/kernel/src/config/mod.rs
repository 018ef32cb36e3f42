use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// File stem looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_STEM: &str = "entitlements";

/// Environment prefix for overrides (`ENT__SERVER__PORT=8080`).
pub const ENV_PREFIX: &str = "ENT";

#[ent_derive::ent_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Where [`load_config`] reads from, for log lines.
#[must_use]
pub fn config_source(path: Option<&Path>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => format!("optional '{DEFAULT_CONFIG_STEM}.*' in working directory"),
    }
}

/// Loads layered configuration: a file, then `ENT__`-prefixed environment overrides.
///
/// * With `Some(path)` the file is required and its format is inferred from the extension
///   (`.toml`, `.yaml`, `.json`, ...).
/// * With `None` an `entitlements.*` file in the working directory is used when present;
///   otherwise only defaults and the environment apply.
///
/// Nested keys use a double underscore: `ENT__SUBSCRIPTIONS__CACHE_TTL_SECONDS=60` maps to
/// `subscriptions.cache_ttl_seconds`.
///
/// # Errors
/// Returns [`ConfigError::Config`] when a required file is missing, a source is malformed, or
/// the merged values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use ent_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path: Option<&Path> = path.as_ref().map(AsRef::as_ref);
    info!("Loading config from {}", config_source(path));

    let file = match path {
        Some(p) => File::from(p).required(true),
        None => File::with_name(DEFAULT_CONFIG_STEM).required(false),
    };

    Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
