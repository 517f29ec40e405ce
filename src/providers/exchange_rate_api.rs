use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::core::conversion::{
    Conversion, ConversionRequest, PairConversionProvider, TransportError,
};
use crate::core::currency::{CurrencyDirectoryProvider, CurrencyEntry};

const USER_AGENT: &str = concat!("cambio/", env!("CARGO_PKG_VERSION"));

/// Client for the v6 exchangerate-api.com REST endpoints. Both operations
/// share the same base URL and credential; the credential is embedded in the
/// request path, so request URLs are kept out of error messages and logs.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.api_key, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<T, TransportError> {
        let url = self.endpoint(path);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Request {
                context: context.to_string(),
                source: e,
            })?;

        let response =
            client
                .get(&url)
                .send()
                .await
                .map_err(|e| TransportError::Request {
                    context: context.to_string(),
                    source: e,
                })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                status: response.status(),
                context: context.to_string(),
            });
        }

        let text = response.text().await.map_err(|e| TransportError::Request {
            context: context.to_string(),
            source: e,
        })?;

        serde_json::from_str(&text).map_err(|e| TransportError::Decode {
            context: context.to_string(),
            source: e,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CodesResponse {
    supported_codes: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    conversion_result: f64,
    #[serde(default)]
    conversion_rate: Option<f64>,
    #[serde(default)]
    time_last_update_unix: Option<i64>,
}

#[async_trait]
impl CurrencyDirectoryProvider for ExchangeRateApiProvider {
    #[instrument(name = "DirectoryFetch", skip(self))]
    async fn fetch_currencies(&self) -> Vec<CurrencyEntry> {
        debug!("Requesting supported currency codes");

        match self.get_json::<CodesResponse>("codes", "supported codes").await {
            Ok(data) => data
                .supported_codes
                .into_iter()
                .map(|(code, name)| CurrencyEntry { code, name })
                .collect(),
            Err(e) => {
                // Absorbed on purpose: the caller always gets a directory,
                // possibly empty. This is the only diagnostic emitted.
                error!(error = %e, "Failed to fetch supported currencies");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl PairConversionProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "PairConversion",
        skip(self, request),
        fields(from = %request.from, to = %request.to, amount = %request.amount)
    )]
    async fn convert(&self, request: &ConversionRequest) -> Result<Conversion, TransportError> {
        let context = format!(
            "pair {}/{}/{}",
            request.from, request.to, request.amount
        );
        let path = format!("pair/{}/{}/{}", request.from, request.to, request.amount);
        debug!("Requesting pair conversion");

        let data: PairResponse = self.get_json(&path, &context).await?;

        Ok(Conversion {
            converted_amount: data.conversion_result,
            rate: data.conversion_rate,
            last_updated: data
                .time_last_update_unix
                .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        })
    }
}
