use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::{ExchangeRate, ExchangeRateProvider};
use crate::providers::util::{RetryPolicy, with_retry};

const RETRY_POLICY: RetryPolicy = RetryPolicy::new(2, Duration::from_millis(250));

/// Fetches the USD to INR rate from exchangerate-api.com (v6 `latest` endpoint).
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    time_last_update_unix: Option<i64>,
    conversion_rates: Option<HashMap<String, f64>>,
}

fn parse_rate(data: LatestRatesResponse) -> Result<ExchangeRate> {
    if data.result != "success" {
        return Err(anyhow!(
            "Exchange rate API error: {}",
            data.error_type.as_deref().unwrap_or("unknown error")
        ));
    }

    let rate = data
        .conversion_rates
        .as_ref()
        .and_then(|rates| rates.get("INR"))
        .copied()
        .ok_or_else(|| anyhow!("No INR rate found in exchange rate response"))?;
    if !(rate.is_finite() && rate > 0.0) {
        return Err(anyhow!("Invalid INR rate in exchange rate response: {rate}"));
    }

    let last_updated = data
        .time_last_update_unix
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .ok_or_else(|| anyhow!("Missing last update time in exchange rate response"))?;

    Ok(ExchangeRate { rate, last_updated })
}

// Both the send and the body read go through here so every reqwest error can be
// stripped of the URL, which carries the API key.
async fn read_response(
    client: &reqwest::Client,
    url: &str,
) -> Result<(StatusCode, String), reqwest::Error> {
    let response = client.get(url).send().await?;
    let status = response.status();
    let text = response.text().await?;
    Ok((status, text))
}

#[async_trait]
impl ExchangeRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_rate(&self) -> Result<ExchangeRate> {
        // Keep the key out of the logs.
        let url = format!("{}/v6/{}/latest/USD", self.base_url, self.api_key);
        debug!("Requesting USD rates from {}", self.base_url);

        let client = reqwest::Client::builder().user_agent("stash/1.0").build()?;
        let (status, text) = with_retry(
            || async {
                read_response(&client, &url)
                    .await
                    .map_err(reqwest::Error::without_url)
            },
            RETRY_POLICY,
        )
        .await
        .map_err(|e| anyhow!("Failed to fetch exchange rate: {}", e))?;

        if !status.is_success() {
            return Err(anyhow!("HTTP error: {} while fetching exchange rate", status));
        }

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse exchange rate response: {}", e))?;

        let rate = parse_rate(data)?;
        debug!(rate = rate.rate, "Received exchange rate");
        Ok(rate)
    }
}
