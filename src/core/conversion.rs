//! Pair conversion abstractions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A single conversion action: convert `amount` units of `from` into `to`.
/// Built fresh per action, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl ConversionRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        ConversionRequest {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// The provider's answer to a conversion request. `rate` and `last_updated`
/// are provider metadata; only `converted_amount` is consumed downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub converted_amount: f64,
    pub rate: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Any failure in performing or parsing a network request. There is no
/// finer taxonomy: a network outage, a rejected credential, and an unknown
/// currency code all surface through these variants.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed for {context}: {source}")]
    Request {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider returned HTTP {status} for {context}")]
    Status {
        status: reqwest::StatusCode,
        context: String,
    },

    #[error("failed to parse provider response for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Converts an amount between two currency codes with a single provider
/// round trip. Failures propagate to the caller; there are no retries and
/// no validation of the codes or the amount beyond path construction.
#[async_trait]
pub trait PairConversionProvider: Send + Sync {
    async fn convert(&self, request: &ConversionRequest) -> Result<Conversion, TransportError>;
}
