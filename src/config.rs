use crate::policy::PricingPolicy;
use serde::Deserialize;

/// Default public instance of the vehicle decode service (NHTSA vPIC).
const DEFAULT_DECODE_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api";

/// Default timeout for a single decode attempt, in seconds.
/// The decode call is never retried; on timeout the resolver falls back
/// to the internal pattern table.
const DEFAULT_DECODE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub decode_base_url: String,
    pub decode_timeout_secs: u64,
    pub pricing: PricingPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut pricing = PricingPolicy::default();
        if let Ok(year) = std::env::var("REFERENCE_YEAR") {
            pricing.reference_year = year
                .parse()
                .map_err(|_| anyhow::anyhow!("REFERENCE_YEAR must be a valid year"))?;
        }

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            decode_base_url: std::env::var("DECODE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DECODE_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            decode_timeout_secs: std::env::var("DECODE_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_DECODE_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DECODE_TIMEOUT_SECS must be a valid number"))?,
            pricing,
        };

        if !config.decode_base_url.starts_with("http://")
            && !config.decode_base_url.starts_with("https://")
        {
            anyhow::bail!("DECODE_BASE_URL must start with http:// or https://");
        }
        if config.decode_timeout_secs == 0 {
            anyhow::bail!("DECODE_TIMEOUT_SECS must be at least 1");
        }

        // Log successful configuration load
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Decode Base URL: {}", config.decode_base_url);
        tracing::debug!("Decode Timeout: {}s", config.decode_timeout_secs);
        tracing::debug!("Reference Year: {}", config.pricing.reference_year);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
