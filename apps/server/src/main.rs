use anyhow::Context;
use ent_kernel::config::{config_source, load_config};
use ent_kernel::domain::config::ApiConfig;
use ent_logger::{LogFormat, Logger};
use ent_server::Server;
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let cfg: ApiConfig =
        load_config(config_path.as_deref()).context("Critical: Configuration is malformed")?;

    let mut logger = Logger::builder(env!("CARGO_PKG_NAME"))
        .level_name(&cfg.logging.level)?
        .format(if cfg.logging.json { LogFormat::Json } else { LogFormat::Compact });
    if let Some(filter) = &cfg.logging.filter {
        logger = logger.env_filter(filter.as_str());
    }
    if let Some(dir) = &cfg.logging.path {
        logger = logger.file(dir);
    }
    let _log = logger.init()?;
    info!(source = %config_source(config_path.as_deref()), "Configuration loaded");

    Server::builder().config(cfg).build()?.run().await
}
