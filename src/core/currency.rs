//! Currency conversion, goal progress and exchange rate abstractions

use crate::core::goal::{Currency, Goal};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Converts `amount` between the two supported currencies.
///
/// `rate` is the number of INR per USD and must be positive and finite.
/// Same-currency conversion returns `amount` untouched.
pub fn convert(amount: f64, from: Currency, to: Currency, rate: f64) -> f64 {
    match (from, to) {
        (Currency::Usd, Currency::Inr) => amount * rate,
        (Currency::Inr, Currency::Usd) => amount / rate,
        _ => amount,
    }
}

/// Sum of all contributions, in the goal's own currency.
pub fn saved_amount(goal: &Goal) -> f64 {
    goal.contributions.iter().map(|c| c.amount).sum()
}

/// Saved amount as a percentage of the target. Not clamped; over-saved goals exceed 100.
pub fn progress(goal: &Goal) -> f64 {
    if goal.total_amount > 0.0 {
        saved_amount(goal) / goal.total_amount * 100.0
    } else {
        0.0
    }
}

/// Clamps a progress percentage into [0, 100] for bar widths.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 100.0)
}

/// Formats an amount with the currency symbol, Indian digit grouping and at most two
/// fractional digits, e.g. `₹12,34,567.5`.
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let sign = if amount < 0.0 && rounded > 0.0 { "-" } else { "" };

    let fixed = format!("{rounded:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = format!("{sign}{}{}", currency.symbol(), group_indian(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

// Last three digits form one group, the rest are grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// A USD to INR rate as delivered by an exchange rate supplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate: f64,
    pub last_updated: DateTime<Utc>,
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn fetch_rate(&self) -> Result<ExchangeRate>;
}

/// Latest known state of the exchange rate supplier.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RateStatus {
    #[default]
    Pending,
    Ready(ExchangeRate),
    Failed(String),
}

impl RateStatus {
    pub fn from_result(result: Result<ExchangeRate>) -> Self {
        match result {
            Ok(rate) => RateStatus::Ready(rate),
            Err(e) => RateStatus::Failed(format!("{e:#}")),
        }
    }

    /// The fetched rate, or `fallback` while pending or after a failure.
    pub fn effective_rate(&self, fallback: f64) -> f64 {
        match self {
            RateStatus::Ready(r) => r.rate,
            RateStatus::Pending | RateStatus::Failed(_) => fallback,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RateStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn last_updated_label(&self) -> String {
        match self {
            RateStatus::Ready(r) => r
                .last_updated
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            _ => "Never".to_string(),
        }
    }
}
