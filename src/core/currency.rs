//! Supported-currency directory abstractions

use async_trait::async_trait;

/// One supported currency as reported by the provider: an ISO 4217-like
/// code plus a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyEntry {
    pub code: String,
    pub name: String,
}

impl CurrencyEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        CurrencyEntry {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Fetches the full set of currencies the provider can convert between.
///
/// The contract is deliberately infallible: any transport or parse failure
/// is absorbed by the implementation, which returns an empty directory and
/// emits a single diagnostic instead. Callers cannot distinguish "provider
/// supports nothing" from "fetch failed".
#[async_trait]
pub trait CurrencyDirectoryProvider: Send + Sync {
    async fn fetch_currencies(&self) -> Vec<CurrencyEntry>;
}
