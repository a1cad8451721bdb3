pub fn default_enabled() -> bool {
    true
}

pub fn default_service_name() -> String {
    "constellation".to_string()
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    8000
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}

pub fn default_source_url() -> String {
    "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies".to_string()
}

pub fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string()
}

pub fn default_membership_timeout() -> u64 {
    10
}

pub fn default_target_count() -> usize {
    500
}

/// Intended sum of all constituent market caps (~$62T).
pub fn default_target_aggregate_cap() -> u64 {
    62_000_000_000_000
}

pub fn default_min_synthetic_cap() -> u64 {
    5_000_000_000
}

pub fn default_max_synthetic_cap() -> u64 {
    150_000_000_000
}

pub fn default_min_synthetic_price() -> f64 {
    15.0
}

pub fn default_max_synthetic_price() -> f64 {
    800.0
}

pub fn default_cache_file() -> Option<String> {
    Some("sp500_full_cache.json".to_string())
}

pub fn default_min_records() -> usize {
    400
}

pub fn default_quote_endpoint() -> String {
    "https://query1.finance.yahoo.com/v8/finance/chart".to_string()
}

pub fn default_quote_timeout() -> u64 {
    8
}

pub fn default_ttl_seconds() -> u64 {
    60
}

pub fn default_max_entries() -> usize {
    10_000
}
