pub const DEFAULT_LOG_FILTER: &str = "info,scriptcast=debug,tower_http=debug";

/// Subscriber options. `RUST_LOG` still overrides `filter` when set.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub filter: String,
}

impl TracingConfig {
    pub fn new(environment: impl Into<String>, log_format: &str) -> Self {
        Self {
            environment: environment.into(),
            json_format: log_format.eq_ignore_ascii_case("json"),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var("LOG_FORMAT").unwrap_or_default();
        Self::new(
            std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
            &format,
        )
    }
}
