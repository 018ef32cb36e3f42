use ent_domain::config::{ApiConfig, BundlesConfig, ServerConfig, SubscriptionsConfig};
use ent_domain::constants::SUBSCRIPTIONS_ENDPOINT;
use serde_json::json;
use std::path::PathBuf;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 3000);
    assert_eq!(server.shutdown_grace_seconds, 30);
    assert!(server.ssl.is_none());

    assert_eq!(BundlesConfig::default().path, PathBuf::from("bundles/bundles.yml"));

    let subs = SubscriptionsConfig::default();
    assert_eq!(subs.host, SUBSCRIPTIONS_ENDPOINT);
    assert!(subs.cert.is_none() && subs.key.is_none());
    assert_eq!(subs.cache_ttl_seconds, 1800);
}

#[test]
fn api_config_deserializes_partial_documents() {
    let raw = json!({
        "server": { "port": 8080 },
        "bundles": { "path": "/etc/entitlements/bundles.yml" },
        "subscriptions": { "host": "https://subs.stage.example", "cert": "/certs/tls.crt", "key": "/certs/tls.key" },
        "logging": { "level": "debug", "json": true }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.bundles.path, PathBuf::from("/etc/entitlements/bundles.yml"));
    assert_eq!(cfg.subscriptions.host, "https://subs.stage.example");
    assert_eq!(cfg.subscriptions.timeout_seconds, 10);
    assert!(cfg.logging.json);
    assert_eq!(cfg.logging.level, "debug");
}

#[test]
fn config_clones_share_until_mutated() {
    let cfg = ApiConfig::default();
    let mut changed = cfg.clone();
    changed.server.port = 9000;

    assert_eq!(cfg.server.port, 3000);
    assert_eq!(changed.server.port, 9000);
}
