//! Input validation for goal and contribution forms.

use anyhow::{Result, bail};
use chrono::NaiveDate;

pub fn validate_goal_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Goal name is required");
    }
    Ok(name.to_string())
}

pub fn validate_amount(amount: f64) -> Result<f64> {
    if !(amount.is_finite() && amount > 0.0) {
        bail!("Please enter a valid amount greater than 0");
    }
    Ok(amount)
}

pub fn validate_contribution_date(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
    if date > today {
        bail!("Contribution date {date} is in the future");
    }
    Ok(date)
}
