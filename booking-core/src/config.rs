/// Engine configuration
///
/// Built once at process start and handed by reference into the components
/// that need it. No ambient global state.
///
/// # Environment variables
///
/// Every field can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SLOT_DURATION_MINUTES | 30 | Slot size for SLOT_BASED resources |
/// | DEFAULT_CURRENCY | EUR | Currency assumed by the mock gateway |
/// | LOCK_TIMEOUT_MS | 5000 | Store lock acquisition timeout |
/// | ENVIRONMENT | development | Runtime environment tag |
#[derive(Debug, Clone)]
pub struct Config {
    /// Slot size used when partitioning availability windows
    pub slot_duration_minutes: u32,
    /// ISO 4217 code used when the caller supplies none
    pub default_currency: String,
    /// How long a booking/resource lock acquisition may wait
    pub lock_timeout_ms: u64,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        Self {
            slot_duration_minutes: std::env::var("SLOT_DURATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&v| v > 0)
                .unwrap_or(30),
            default_currency: std::env::var("DEFAULT_CURRENCY").unwrap_or_else(|_| "EUR".into()),
            lock_timeout_ms: std::env::var("LOCK_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
