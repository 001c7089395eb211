pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::{API_KEY_ENV, AppConfig};
use crate::core::currency::{ExchangeRateProvider, RateStatus};
use crate::core::goal::Currency;
use crate::core::store::{GoalStore, KeyValueBackend};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    AddGoal {
        name: String,
        target: f64,
        currency: Currency,
    },
    Contribute {
        goal: String,
        amount: f64,
        date: Option<NaiveDate>,
    },
    ListGoals,
    Summary {
        refresh: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Savings tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        currency = %config.currency,
        fallback_rate = config.fallback_rate,
        "Loaded config"
    );

    let backend = store::open_backend(&config)?;
    let mut goals = GoalStore::open(Box::new(backend.clone()))?;

    match command {
        AppCommand::AddGoal {
            name,
            target,
            currency,
        } => cli::goals::add_goal(&mut goals, &name, target, currency).map(|_| ()),
        AppCommand::Contribute { goal, amount, date } => {
            let today = Local::now().date_naive();
            cli::goals::contribute(&mut goals, &goal, amount, date.unwrap_or(today), today)
                .map(|_| ())
        }
        AppCommand::ListGoals => cli::goals::list(&goals),
        AppCommand::Summary { refresh } => {
            let status = fetch_rate_status(&config, Box::new(backend), refresh).await;
            cli::summary::run(
                goals.list_goals(),
                &status,
                config.fallback_rate,
                config.currency,
            )
        }
    }
}

/// Fetches the live rate through the cache. Failures end up in the returned status so
/// the dashboard can fall back to the configured rate.
pub async fn fetch_rate_status(
    config: &AppConfig,
    cache_backend: Box<dyn KeyValueBackend>,
    refresh: bool,
) -> RateStatus {
    let Some(api_key) = config.api_key() else {
        return RateStatus::Failed(format!(
            "No exchange rate API key configured (set {API_KEY_ENV} or providers.exchange_rate.api_key)"
        ));
    };

    let provider_config = &config.providers.exchange_rate;
    let provider = providers::CachingRateProvider::new(
        providers::ExchangeRateApiProvider::new(&provider_config.base_url, &api_key),
        Duration::from_secs(provider_config.cache_ttl_secs),
        cache_backend,
    );

    let spinner = cli::ui::new_spinner("Fetching exchange rate...");
    let result = if refresh {
        provider.refresh().await
    } else {
        provider.fetch_rate().await
    };
    spinner.finish_and_clear();

    if let Err(e) = &result {
        debug!("Exchange rate unavailable: {e:#}");
    }
    RateStatus::from_result(result)
}
