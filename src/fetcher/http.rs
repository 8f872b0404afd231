//! HTTP client for the daily-rates lookup endpoint
//!
//! One GET per date: `{base_url}/v1/{date}?access_key=..&symbols=BASE,QUOTE`.
//! The response carries a `rates` map relative to a fixed anchor currency,
//! so the pair's cross rate is derived by division rather than read
//! directly. Classification of the payload is a pure function so it can be
//! tested without network I/O.

use crate::credentials::Credential;
use crate::fetcher::{FetchOutcome, RateFetcher};
use crate::pair::CurrencyPair;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Default rate-lookup API endpoint
pub const DEFAULT_API_URL: &str = "https://api.exchangeratesapi.io";

/// Wire model of one daily-rates response
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    info: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Rate fetcher backed by the exchangeratesapi-style HTTP endpoint
pub struct HttpRateFetcher {
    client: Client,
    base_url: String,
}

impl HttpRateFetcher {
    /// Create a fetcher against the default endpoint
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Create a fetcher against a custom endpoint (used for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Get the base URL for this fetcher
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpRateFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateFetcher for HttpRateFetcher {
    async fn fetch(
        &self,
        date: NaiveDate,
        pair: &CurrencyPair,
        credential: &Credential,
    ) -> FetchOutcome {
        let url = format!("{}/v1/{}", self.base_url, date.format("%Y-%m-%d"));
        debug!(%date, %pair, "requesting daily rates");

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("access_key", credential.secret()),
                ("symbols", pair.symbols_param().as_str()),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::Transient {
                    date,
                    cause: format!("request failed: {e}"),
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::Transient {
                date,
                cause: format!("unexpected status {status}"),
            };
        }

        match response.json::<RatesResponse>().await {
            Ok(payload) => classify_payload(date, pair, payload),
            Err(e) => FetchOutcome::Transient {
                date,
                cause: format!("malformed payload: {e}"),
            },
        }
    }
}

/// Derive the cross rate from an anchor-relative payload
///
/// Both symbols must be present and usable: the anchor may be neither
/// component of the pair, so the rate is quote divided by base. A payload
/// with non-positive rates is treated as a transient fault rather than a
/// data-availability fact.
fn classify_payload(date: NaiveDate, pair: &CurrencyPair, payload: RatesResponse) -> FetchOutcome {
    if !payload.success {
        let cause = match payload.error {
            Some(body) => format!(
                "API reported failure: {} ({})",
                body.kind.unwrap_or_else(|| "unknown".to_string()),
                body.info.unwrap_or_default()
            ),
            None => "API reported failure".to_string(),
        };
        return FetchOutcome::Transient { date, cause };
    }

    let base_rate = payload.rates.get(pair.base()).copied();
    let quote_rate = payload.rates.get(pair.quote()).copied();

    match (base_rate, quote_rate) {
        (Some(base), Some(quote)) if base > 0.0 && quote > 0.0 => FetchOutcome::Success {
            date,
            rate: quote / base,
        },
        (Some(base), Some(quote)) => FetchOutcome::Transient {
            date,
            cause: format!("non-positive rates in payload: base={base}, quote={quote}"),
        },
        _ => FetchOutcome::RateMissing { date },
    }
}
