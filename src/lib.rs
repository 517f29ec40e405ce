pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::core::session::SessionState;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Convert {
        amount: f64,
        from: Option<String>,
        to: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    // Single transport configuration shared by both operations.
    let provider = providers::ExchangeRateApiProvider::new(
        &config.provider.base_url,
        &config.provider.api_key,
    );

    match command {
        AppCommand::Currencies => cli::currencies::run(&provider).await,
        AppCommand::Convert { amount, from, to } => {
            let state = SessionState::new()
                .select_from(from.unwrap_or(config.defaults.from))
                .select_to(to.unwrap_or(config.defaults.to))
                .set_amount(amount);
            cli::convert::run(&provider, &provider, state).await
        }
    }
}
