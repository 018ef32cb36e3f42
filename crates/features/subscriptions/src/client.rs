use crate::error::{SubscriptionsError, SubscriptionsErrorExt};
use crate::lookup::SubscriptionLookup;
use crate::wire::{parse_skus, search_url};
use async_trait::async_trait;
use ent_domain::config::SubscriptionsConfig;
use ent_domain::constants::SUBSCRIPTIONS_ENDPOINT;
use ent_domain::subscriptions::{NO_RESPONSE_STATUS, SubscriptionLookupResult};
use moka::future::Cache;
use reqwest::header::ACCEPT;
use reqwest::{Client, Identity, StatusCode};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// `(org_id, sku_filter)`: the filter changes the upstream answer, so it is part of the key.
type CacheKey = (String, Option<String>);

/// HTTP client for the Subscriptions Service search endpoint.
///
/// Clean `200` answers are cached per organization and filter; errors are never cached so the
/// next request retries upstream.
#[derive(Debug, Clone)]
pub struct SubscriptionsClient {
    http: Client,
    host: Arc<str>,
    cache: Option<Cache<CacheKey, Arc<[String]>>>,
}

impl SubscriptionsClient {
    pub fn builder() -> SubscriptionsClientBuilder {
        SubscriptionsClientBuilder::default()
    }

    /// Builds a client from the `subscriptions` configuration section.
    ///
    /// # Errors
    /// See [`SubscriptionsClientBuilder::build`].
    pub fn from_config(cfg: &SubscriptionsConfig) -> Result<Self, SubscriptionsError> {
        let mut builder = Self::builder()
            .host(&cfg.host)
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .cache(Duration::from_secs(cfg.cache_ttl_seconds), cfg.cache_capacity);

        if let Some(cert) = &cfg.cert {
            builder = builder.client_certificate(cert);
        }
        if let Some(key) = &cfg.key {
            builder = builder.client_key(key);
        }
        builder.build()
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, org_id: &str, sku_filter: Option<&str>) -> SubscriptionLookupResult {
        let url = search_url(&self.host, org_id, sku_filter);

        let response = match self.http.get(&url).header(ACCEPT, "application/json").send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Subscriptions Service request failed");
                let status = e.status().map_or(NO_RESPONSE_STATUS, |s| s.as_u16());
                return SubscriptionLookupResult::transport(status, e.to_string());
            },
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Subscriptions Service answered with an error status");
            return SubscriptionLookupResult::status(status.as_u16());
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Subscriptions Service body could not be read");
                return SubscriptionLookupResult::transport(status.as_u16(), e.to_string());
            },
        };

        match parse_skus(&body) {
            Ok(skus) => {
                debug!(skus = skus.len(), "Subscriptions Service lookup succeeded");
                SubscriptionLookupResult::ok(skus)
            },
            Err(e) => {
                warn!(error = %e, "Subscriptions Service body is not a subscription list");
                SubscriptionLookupResult::transport(
                    status.as_u16(),
                    format!("undecodable response body: {e}"),
                )
            },
        }
    }
}

#[async_trait]
impl SubscriptionLookup for SubscriptionsClient {
    async fn lookup(&self, org_id: &str, sku_filter: Option<&str>) -> SubscriptionLookupResult {
        let key: CacheKey = (org_id.to_owned(), sku_filter.map(str::to_owned));

        if let Some(cache) = &self.cache
            && let Some(skus) = cache.get(&key).await
        {
            debug!(org_id, "Subscriptions served from cache");
            return SubscriptionLookupResult { cache_hit: true, ..SubscriptionLookupResult::ok(skus.iter()) };
        }

        let result = self.fetch(org_id, sku_filter).await;

        if result.is_success()
            && let Some(cache) = &self.cache
        {
            cache.insert(key, Arc::from(result.skus.as_slice())).await;
        }
        result
    }
}

/// A fluent builder for [`SubscriptionsClient`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct SubscriptionsClientBuilder {
    host: String,
    timeout: Duration,
    cache_ttl: Duration,
    cache_capacity: u64,
    cert: Option<PathBuf>,
    key: Option<PathBuf>,
}

impl Default for SubscriptionsClientBuilder {
    fn default() -> Self {
        Self {
            host: SUBSCRIPTIONS_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(1800),
            cache_capacity: 10_000,
            cert: None,
            key: None,
        }
    }
}

impl SubscriptionsClientBuilder {
    /// Base URL, e.g. `https://subscription.api.redhat.com`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Whole-request timeout; an elapsed timeout is reported as a transport error.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Caching is disabled when either value is zero.
    pub const fn cache(mut self, ttl: Duration, capacity: u64) -> Self {
        self.cache_ttl = ttl;
        self.cache_capacity = capacity;
        self
    }

    /// PEM certificate presented for mutual TLS. Requires [`Self::client_key`].
    pub fn client_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.cert = Some(path.into());
        self
    }

    /// PEM private key matching [`Self::client_certificate`].
    pub fn client_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.key = Some(path.into());
        self
    }

    /// # Errors
    /// * [`SubscriptionsError::InvalidConfiguration`] for an empty host or a certificate without
    ///   its key (or the reverse).
    /// * [`SubscriptionsError::Certificate`] when a PEM file cannot be read.
    /// * [`SubscriptionsError::Client`] when the PEM content is rejected or the TLS backend fails.
    pub fn build(self) -> Result<SubscriptionsClient, SubscriptionsError> {
        if self.host.trim().is_empty() {
            return Err(SubscriptionsError::InvalidConfiguration {
                message: "subscriptions host must not be empty".into(),
                context: None,
            });
        }

        let mut http = Client::builder().use_rustls_tls().timeout(self.timeout);

        match (&self.cert, &self.key) {
            (Some(cert), Some(key)) => {
                http = http.identity(load_identity(cert, key)?);
                info!(cert = %cert.display(), "Subscriptions client uses mutual TLS");
            },
            (None, None) => {},
            _ => {
                return Err(SubscriptionsError::InvalidConfiguration {
                    message: "client certificate and key must be configured together".into(),
                    context: None,
                });
            },
        }

        let http = http.build().context("Failed to build HTTP client")?;

        let cache = (!self.cache_ttl.is_zero() && self.cache_capacity > 0).then(|| {
            Cache::builder().max_capacity(self.cache_capacity).time_to_live(self.cache_ttl).build()
        });

        Ok(SubscriptionsClient { http, host: Arc::from(self.host.as_str()), cache })
    }
}

fn load_identity(cert: &Path, key: &Path) -> Result<Identity, SubscriptionsError> {
    let mut pem =
        fs::read(cert).context(format!("Reading client certificate {}", cert.display()))?;
    pem.push(b'\n');
    pem.extend(fs::read(key).context(format!("Reading client key {}", key.display()))?);

    Identity::from_pem(&pem).context("Parsing client certificate and key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_half_configured_tls() {
        let err = SubscriptionsClient::builder()
            .client_certificate("/certs/tls.crt")
            .build()
            .expect_err("key missing");
        assert!(matches!(err, SubscriptionsError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_empty_host() {
        let err = SubscriptionsClient::builder().host(" ").build().expect_err("empty host");
        assert!(err.to_string().contains("host must not be empty"));
    }

    #[test]
    fn missing_certificate_is_reported_with_path() {
        let err = SubscriptionsClient::builder()
            .client_certificate("/definitely/missing/tls.crt")
            .client_key("/definitely/missing/tls.key")
            .build()
            .expect_err("missing files");

        assert!(matches!(err, SubscriptionsError::Certificate { .. }));
        assert!(err.to_string().contains("/definitely/missing/tls.crt"));
    }

    #[test]
    fn zero_ttl_disables_cache() {
        let client = SubscriptionsClient::builder()
            .cache(Duration::ZERO, 100)
            .build()
            .expect("client builds");
        assert!(client.cache.is_none());
        assert_eq!(client.host(), SUBSCRIPTIONS_ENDPOINT);
    }
}
