use super::ui;
use crate::core::session::SessionState;
use crate::core::{ConversionPhase, CurrencyDirectoryProvider, PairConversionProvider};
use anyhow::Result;
use tracing::{debug, warn};

const GENERIC_FAILURE: &str = "Failed to fetch conversion rate!";

/// Runs one conversion action through the session: directory fetch at
/// startup, membership warnings, the positive-amount precondition, then a
/// single ticketed provider request.
pub async fn run(
    directory: &(dyn CurrencyDirectoryProvider + Send + Sync),
    converter: &(dyn PairConversionProvider + Send + Sync),
    state: SessionState,
) -> Result<()> {
    let state = state.with_directory(directory.fetch_currencies().await);
    debug!(
        "Directory loaded with {} currencies",
        state.currencies().len()
    );

    // Membership is advisory: the provider is still asked, matching the
    // caller-side contract for code validity.
    if !state.currencies().is_empty() {
        for code in [state.from(), state.to()] {
            if !state.knows_code(code) {
                warn!("Currency code {code} is not in the provider's directory");
                println!(
                    "{}",
                    ui::style_text(
                        &format!("Warning: {code} is not a known currency code"),
                        ui::StyleType::Subtle
                    )
                );
            }
        }
    }

    let Some((state, ticket, request)) = state.begin_conversion() else {
        anyhow::bail!("Amount must be a positive number");
    };

    let spinner = ui::new_spinner("Converting...");
    let state = match converter.convert(&request).await {
        Ok(conversion) => state.complete(ticket, conversion),
        Err(e) => {
            warn!(error = %e, "Conversion request failed");
            state.fail(ticket, GENERIC_FAILURE)
        }
    };
    spinner.finish_and_clear();

    match state.phase() {
        ConversionPhase::Done { conversion, .. } => {
            println!(
                "{} {} = {}",
                request.amount,
                request.from,
                ui::style_text(
                    &format!("{} {}", conversion.converted_amount, request.to),
                    ui::StyleType::ResultValue
                )
            );
            if let Some(rate) = conversion.rate {
                let updated = conversion
                    .last_updated
                    .map(|dt| format!(", updated {}", dt.format("%Y-%m-%d %H:%M UTC")))
                    .unwrap_or_default();
                println!(
                    "{}",
                    ui::style_text(
                        &format!("1 {} = {} {}{}", request.from, rate, request.to, updated),
                        ui::StyleType::Subtle
                    )
                );
            }
        }
        ConversionPhase::Failed { message, .. } => {
            println!("{}", ui::style_text(message, ui::StyleType::Error));
        }
        // begin_conversion guarantees a settled phase by this point.
        other => debug!("Unexpected terminal phase: {other:?}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversion::{Conversion, ConversionRequest, TransportError};
    use crate::core::currency::CurrencyEntry;
    use async_trait::async_trait;

    struct StubDirectory {
        entries: Vec<CurrencyEntry>,
    }

    #[async_trait]
    impl CurrencyDirectoryProvider for StubDirectory {
        async fn fetch_currencies(&self) -> Vec<CurrencyEntry> {
            self.entries.clone()
        }
    }

    struct StubConverter {
        fail: bool,
    }

    #[async_trait]
    impl PairConversionProvider for StubConverter {
        async fn convert(
            &self,
            request: &ConversionRequest,
        ) -> Result<Conversion, TransportError> {
            if self.fail {
                return Err(TransportError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    context: format!("pair {}/{}/{}", request.from, request.to, request.amount),
                });
            }
            Ok(Conversion {
                converted_amount: request.amount * 83.0,
                rate: Some(83.0),
                last_updated: None,
            })
        }
    }

    fn directory() -> StubDirectory {
        StubDirectory {
            entries: vec![
                CurrencyEntry::new("USD", "United States Dollar"),
                CurrencyEntry::new("INR", "Indian Rupee"),
            ],
        }
    }

    #[tokio::test]
    async fn test_successful_conversion_flow() {
        let state = SessionState::new().set_amount(100.0);
        let result = run(&directory(), &StubConverter { fail: false }, state).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_converter_failure_is_surfaced_not_returned() {
        let state = SessionState::new().set_amount(100.0);
        let result = run(&directory(), &StubConverter { fail: true }, state).await;
        // The host catches transport failures and surfaces a message.
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_non_positive_amount_never_converts() {
        let state = SessionState::new().set_amount(0.0);
        let result = run(&directory(), &StubConverter { fail: false }, state).await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Amount must be a positive number")
        );
    }

    #[tokio::test]
    async fn test_unknown_code_still_converts() {
        let state = SessionState::new().select_from("XXX").set_amount(10.0);
        let result = run(&directory(), &StubConverter { fail: false }, state).await;
        assert!(result.is_ok());
    }
}
