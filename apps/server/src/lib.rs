//! # Entitlements Server
//!
//! Answers `GET /api/entitlements/v1/services` with the bundles the calling organization is
//! entitled to, backed by the Subscriptions Service and a YAML bundle catalog.
//!
//! ## Example
//! ```no_run
//! use ent_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(3000)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod handlers;
mod router;
mod state;

pub use state::ApiState;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use ent_entitlements::CatalogStore;
use ent_kernel::domain::config::ApiConfig;
use ent_subscriptions::{SubscriptionLookup, SubscriptionsClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
    catalog: Option<CatalogStore>,
    subscriptions: Option<Arc<dyn SubscriptionLookup>>,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Use this catalog instead of loading `bundles.path`.
    pub fn catalog(mut self, catalog: CatalogStore) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use this lookup instead of an HTTP client built from the `subscriptions` section.
    pub fn subscriptions(mut self, lookup: Arc<dyn SubscriptionLookup>) -> Self {
        self.subscriptions = Some(lookup);
        self
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let metadata = ssl.key.metadata()?;
                if metadata.permissions().mode() & 0o077 != 0 {
                    warn!(
                        "SECURITY: SSL Private Key {} has insecure permissions (should be 600)",
                        ssl.key.display()
                    );
                }
            }
        }
        Ok(())
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Validates the listener TLS files, when configured
    /// 2. Loads the bundle catalog from `bundles.path` (unless one was supplied)
    /// 3. Builds the Subscriptions Service client (unless a lookup was supplied)
    ///
    /// # Errors
    /// Returns an error if:
    /// * SSL certificate/key files are missing
    /// * The bundle catalog cannot be read or is malformed
    /// * The Subscriptions client certificate cannot be loaded
    pub fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => CatalogStore::from_path(&self.cfg.bundles.path)
                .context("Failed to load bundle catalog")?,
        };

        let subscriptions = match self.subscriptions {
            Some(lookup) => lookup,
            None => Arc::new(
                SubscriptionsClient::from_config(&self.cfg.subscriptions)
                    .context("Failed to build Subscriptions Service client")?,
            ),
        };

        info!(
            bundles = catalog.snapshot().len(),
            generation = catalog.generation(),
            "Initializing server"
        );

        Ok(Server {
            state: ApiState { config: self.cfg, catalog: Arc::new(catalog), subscriptions },
        })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The fully layered application router, without a listener.
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// On unix, `SIGHUP` reloads the bundle catalog while the server keeps serving.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address
    /// or if SSL/TLS setup fails.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);

        info!(
            address = %address,
            ssl = cfg.server.ssl.is_some(),
            "Starting server"
        );

        let app = self.router();

        #[cfg(unix)]
        spawn_reload_listener(Arc::clone(&self.state.catalog))?;

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();
        let grace = Duration::from_secs(cfg.server.shutdown_grace_seconds);

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        if let Some(ssl_config) = &cfg.server.ssl {
            info!("Starting HTTPS server on https://{address}");

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &ssl_config.cert,
                &ssl_config.key,
            )
            .await
            .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Starting HTTP server on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

/// Reloads the bundle catalog on every `SIGHUP`; a failed reload keeps the previous catalog.
#[cfg(unix)]
fn spawn_reload_listener(catalog: Arc<CatalogStore>) -> Result<()> {
    let mut hangup = signal::unix::signal(signal::unix::SignalKind::hangup())
        .context("Failed to install SIGHUP handler")?;

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading bundle catalog");
            let store = Arc::clone(&catalog);
            match tokio::task::spawn_blocking(move || store.reload()).await {
                Ok(Ok(generation)) => info!(generation, "Bundle catalog reloaded"),
                Ok(Err(e)) => error!("Bundle catalog reload failed: {e}"),
                Err(e) => error!("Bundle catalog reload task failed: {e}"),
            }
        }
    });
    Ok(())
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
