use crate::*;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("{field} must be a positive float")]
    InvalidPositiveFloat { field: String },

    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: String, value: String },

    #[error("{field}: min ({min}) must not exceed max ({max})")]
    InvalidRange { field: String, min: String, max: String },

    #[error("Override for '{ticker}' in {field} must be positive")]
    InvalidOverride { field: String, ticker: String },

    #[error("{field} must not be empty")]
    EmptyValue { field: String },

    #[error("Environment variable placeholder left unresolved in {field}")]
    UnresolvedEnvVar { field: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    if config.service.name.trim().is_empty() {
        report.add_error(ValidationError::MissingServiceName);
    }

    validate_server(config, &mut report);
    validate_membership(&config.membership, &mut report);
    validate_synthesis(&config.synthesis, &mut report);
    validate_snapshot(&config.snapshot, &config.membership, &mut report);
    validate_quotes(&config.quotes, &mut report);

    report
}

fn validate_server(config: &MasterConfig, report: &mut ValidationReport) {
    if config.server.port == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "server.http_port".to_string(),
        });
    }

    if has_unresolved_env_vars(&config.server.host) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: "server.host".to_string(),
        });
    }

    let valid_formats = ["pretty", "json", "compact"];
    if !valid_formats.contains(&config.logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(config.logging.format.clone()));
    }

    if config.metrics.enabled {
        if config.metrics.port == 0 {
            report.add_error(ValidationError::InvalidPositiveInteger {
                field: "metrics.port".to_string(),
            });
        } else if config.metrics.port == config.server.port {
            report.add_warning(
                "metrics.port",
                "Metrics exporter shares the HTTP API port; one of them will fail to bind",
            );
        }
    }
}

fn validate_membership(membership: &MembershipConfig, report: &mut ValidationReport) {
    if membership.scrape_enabled {
        validate_url("membership.source_url", &membership.source_url, report);
    } else {
        report.add_warning(
            "membership.scrape_enabled",
            "Scrape disabled; the static fallback list will always be served",
        );
    }

    if membership.timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "membership.timeout_seconds".to_string(),
        });
    }

    if membership.target_count == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "membership.target_count".to_string(),
        });
    }

    if membership.user_agent.trim().is_empty() {
        report.add_warning(
            "membership.user_agent",
            "Empty user agent; the membership source may reject the request",
        );
    }
}

fn validate_synthesis(synthesis: &SynthesisConfig, report: &mut ValidationReport) {
    if synthesis.target_aggregate_cap == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "synthesis.target_aggregate_cap".to_string(),
        });
    }

    if synthesis.min_synthetic_cap == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "synthesis.min_synthetic_cap".to_string(),
        });
    }

    if synthesis.min_synthetic_cap > synthesis.max_synthetic_cap {
        report.add_error(ValidationError::InvalidRange {
            field: "synthesis.synthetic_cap".to_string(),
            min: synthesis.min_synthetic_cap.to_string(),
            max: synthesis.max_synthetic_cap.to_string(),
        });
    }

    if synthesis.min_synthetic_price <= 0.0 {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: "synthesis.min_synthetic_price".to_string(),
        });
    }

    if synthesis.min_synthetic_price > synthesis.max_synthetic_price {
        report.add_error(ValidationError::InvalidRange {
            field: "synthesis.synthetic_price".to_string(),
            min: synthesis.min_synthetic_price.to_string(),
            max: synthesis.max_synthetic_price.to_string(),
        });
    }

    for (ticker, price) in &synthesis.price_overrides {
        if *price <= 0.0 || !price.is_finite() {
            report.add_error(ValidationError::InvalidOverride {
                field: "synthesis.price_overrides".to_string(),
                ticker: ticker.clone(),
            });
        }
    }

    for (ticker, cap) in &synthesis.cap_overrides {
        if *cap == 0 {
            report.add_error(ValidationError::InvalidOverride {
                field: "synthesis.cap_overrides".to_string(),
                ticker: ticker.clone(),
            });
        }
    }

    match synthesis.seed {
        Some(seed) => report.add_warning(
            "synthesis.seed",
            &format!("Fixed seed {} makes every rebuild produce the same numbers", seed),
        ),
        None => report.add_default("synthesis.seed", "random per build"),
    }
}

fn validate_snapshot(
    snapshot: &SnapshotConfig,
    membership: &MembershipConfig,
    report: &mut ValidationReport,
) {
    match &snapshot.cache_file {
        Some(path) if path.trim().is_empty() => {
            report.add_error(ValidationError::EmptyValue {
                field: "snapshot.cache_file".to_string(),
            });
        }
        Some(path) if has_unresolved_env_vars(path) => {
            report.add_error(ValidationError::UnresolvedEnvVar {
                field: "snapshot.cache_file".to_string(),
            });
        }
        Some(_) => {}
        None => report.add_default("snapshot.cache_file", "persistence disabled"),
    }

    if snapshot.min_records > membership.target_count {
        report.add_warning(
            "snapshot.min_records",
            &format!(
                "min_records ({}) exceeds membership.target_count ({}); fallback snapshots will never be restored",
                snapshot.min_records, membership.target_count
            ),
        );
    }
}

fn validate_quotes(quotes: &QuotesConfig, report: &mut ValidationReport) {
    if quotes.provider == QuoteProviderKind::None {
        report.add_warning(
            "quotes.provider",
            "No live quote provider; single-ticker lookups always use the snapshot",
        );
        return;
    }

    validate_url("quotes.endpoint", &quotes.endpoint, report);

    if quotes.timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "quotes.timeout_seconds".to_string(),
        });
    }

    if quotes.ttl_seconds == 0 {
        report.add_warning("quotes.ttl_seconds", "TTL of 0 disables the quote cache");
    }

    if quotes.max_entries == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "quotes.max_entries".to_string(),
        });
    }
}

fn validate_url(field: &str, value: &str, report: &mut ValidationReport) {
    if has_unresolved_env_vars(value) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: field.to_string(),
        });
        return;
    }

    if Url::parse(value).is_err() {
        report.add_error(ValidationError::InvalidUrl {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}
