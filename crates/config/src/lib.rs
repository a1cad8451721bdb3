use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

/// Listen address for the HTTP API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(rename = "http_port")]
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of `pretty`, `json`, `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

/// Where the index membership list comes from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MembershipConfig {
    #[serde(default = "default_enabled")]
    pub scrape_enabled: bool,
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_membership_timeout")]
    pub timeout_seconds: u64,
    /// Size the static fallback list is padded up to
    #[serde(default = "default_target_count")]
    pub target_count: usize,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            scrape_enabled: default_enabled(),
            source_url: default_source_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_membership_timeout(),
            target_count: default_target_count(),
        }
    }
}

/// Knobs for the cap/price synthesis pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthesisConfig {
    #[serde(default = "default_target_aggregate_cap")]
    pub target_aggregate_cap: u64,
    #[serde(default = "default_min_synthetic_cap")]
    pub min_synthetic_cap: u64,
    #[serde(default = "default_max_synthetic_cap")]
    pub max_synthetic_cap: u64,
    #[serde(default = "default_min_synthetic_price")]
    pub min_synthetic_price: f64,
    #[serde(default = "default_max_synthetic_price")]
    pub max_synthetic_price: f64,
    /// Fixed RNG seed; random per build when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Emit `price_origin` on every record
    #[serde(default)]
    pub tag_provenance: bool,
    /// Merged over the built-in price table
    #[serde(default)]
    pub price_overrides: HashMap<String, f64>,
    /// Merged over the built-in market-cap table
    #[serde(default)]
    pub cap_overrides: HashMap<String, u64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            target_aggregate_cap: default_target_aggregate_cap(),
            min_synthetic_cap: default_min_synthetic_cap(),
            max_synthetic_cap: default_max_synthetic_cap(),
            min_synthetic_price: default_min_synthetic_price(),
            max_synthetic_price: default_max_synthetic_price(),
            seed: None,
            tag_provenance: false,
            price_overrides: HashMap::new(),
            cap_overrides: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    /// JSON file the snapshot is persisted to; persistence is off when unset
    #[serde(default = "default_cache_file")]
    pub cache_file: Option<String>,
    /// Persisted snapshots smaller than this are discarded on restore
    #[serde(default = "default_min_records")]
    pub min_records: usize,
    #[serde(default = "default_enabled")]
    pub warm_on_startup: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            cache_file: default_cache_file(),
            min_records: default_min_records(),
            warm_on_startup: default_enabled(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteProviderKind {
    #[default]
    Yahoo,
    None,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuotesConfig {
    #[serde(default)]
    pub provider: QuoteProviderKind,
    #[serde(default = "default_quote_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_quote_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            provider: QuoteProviderKind::default(),
            endpoint: default_quote_endpoint(),
            timeout_seconds: default_quote_timeout(),
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MasterConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub membership: MembershipConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub quotes: QuotesConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_config() {
        let yaml = include_str!("../../../master_config/constellation.yaml");

        let config: MasterConfig = match serde_yaml::from_str(yaml) {
            Ok(cfg) => cfg,
            Err(e) => panic!("Failed to parse constellation.yaml: {}", e),
        };

        assert_eq!(config.service.name, "constellation");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.membership.target_count, 500);
        assert_eq!(config.synthesis.target_aggregate_cap, 62_000_000_000_000);
        assert_eq!(config.snapshot.min_records, 400);
        assert_eq!(config.quotes.provider, QuoteProviderKind::Yahoo);
        assert_eq!(config.quotes.ttl_seconds, 60);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: MasterConfig = serde_yaml::from_str("{}").expect("Failed to parse YAML");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(config.membership.scrape_enabled);
        assert_eq!(config.membership.timeout_seconds, 10);
        assert_eq!(config.synthesis.min_synthetic_cap, 5_000_000_000);
        assert_eq!(config.synthesis.max_synthetic_price, 800.0);
        assert_eq!(config.snapshot.cache_file.as_deref(), Some("sp500_full_cache.json"));
        assert_eq!(config.quotes.max_entries, 10_000);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_partial_sections_and_overrides() {
        let yaml = r#"
server:
  http_port: 9100
synthesis:
  seed: 42
  tag_provenance: true
  price_overrides:
    ABC: 12.5
  cap_overrides:
    ABC: 7000000000
snapshot:
  cache_file: null
quotes:
  provider: none
"#;

        let config: MasterConfig = serde_yaml::from_str(yaml).expect("Failed to parse YAML");

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.synthesis.seed, Some(42));
        assert!(config.synthesis.tag_provenance);
        assert_eq!(config.synthesis.price_overrides.get("ABC"), Some(&12.5));
        assert_eq!(config.synthesis.cap_overrides.get("ABC"), Some(&7_000_000_000));
        assert!(config.snapshot.cache_file.is_none());
        assert_eq!(config.quotes.provider, QuoteProviderKind::None);
    }
}
