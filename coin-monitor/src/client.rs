//! Exchange-rate HTTP client.
//!
//! One GET per coin against `{api_base}{coin}`, reading a single number out of
//! `data.rates[currency]`. Every failure is absorbed here and surfaces as `None`.

use crate::config::DEFAULT_API;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of a single exchange rate per coin.
#[async_trait]
pub trait RateClient: Send + Sync {
    /// Fetch the rate of `coin` quoted in `currency`, or `None` if it is unavailable.
    async fn fetch(&self, coin: &str, currency: &str) -> Option<f64>;
}

/// HTTP rate client configuration
#[derive(Debug, Clone)]
pub struct RateClientConfig {
    /// Endpoint prefix, the coin symbol is appended verbatim
    pub api_base: String,
    /// Total timeout of one request
    pub timeout: Duration,
}

impl Default for RateClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl RateClientConfig {
    /// Create a new configuration with custom API base
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Default::default()
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`RateClient`] backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct HttpRateClient {
    config: RateClientConfig,
    http: reqwest::Client,
}

impl HttpRateClient {
    pub fn new(config: RateClientConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &RateClientConfig {
        &self.config
    }

    /// Request URL for `coin`.
    pub fn url_for(&self, coin: &str) -> String {
        format!("{}{}", self.config.api_base, coin)
    }
}

impl Default for HttpRateClient {
    fn default() -> Self {
        Self::new(RateClientConfig::default())
    }
}

#[async_trait]
impl RateClient for HttpRateClient {
    async fn fetch(&self, coin: &str, currency: &str) -> Option<f64> {
        let url = self.url_for(coin);

        let response = match self
            .http
            .get(&url)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) if error.is_timeout() || error.is_connect() || error.is_request() => {
                debug!(%coin, %error, "Rate request failed");
                return None;
            }
            Err(error) => {
                warn!(%coin, %error, "Unexpected error requesting rate");
                return None;
            }
        };

        if let Err(status_err) = response.error_for_status_ref() {
            debug!(%coin, error = %status_err, "Rate request rejected");
            return None;
        }

        match response.json::<Value>().await {
            Ok(body) => {
                let rate = extract_rate(&body, currency);
                if rate.is_none() {
                    debug!(%coin, %currency, "Currency missing from rates response");
                }
                rate
            }
            Err(error) if error.is_timeout() => {
                debug!(%coin, %error, "Rate response timed out");
                None
            }
            Err(error) => {
                warn!(%coin, %error, "Unexpected error decoding rate response");
                None
            }
        }
    }
}

/// Look up `data.rates[currency]` in an exchange-rates response.
///
/// Coinbase encodes rates as strings, other sources as numbers; both are accepted.
pub fn extract_rate(body: &Value, currency: &str) -> Option<f64> {
    let rate = body.get("data")?.get("rates")?.get(currency)?;
    let value = match rate {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}
