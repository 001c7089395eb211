//! Goal and contribution domain types

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// The two currencies a goal can be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
        }
    }

    /// The counterpart currency used for cross-currency display.
    pub fn other(&self) -> Currency {
        match self {
            Currency::Inr => Currency::Usd,
            Currency::Usd => Currency::Inr,
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INR" => Ok(Currency::Inr),
            "USD" => Ok(Currency::Usd),
            _ => Err(anyhow::anyhow!("Unsupported currency: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: String,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub total_amount: f64,
    pub currency: Currency,
    pub contributions: Vec<Contribution>,
}

/// Input for creating a goal. Ids and contributions are always assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub name: String,
    pub total_amount: f64,
    pub currency: Currency,
}

impl GoalDraft {
    pub fn new(name: impl Into<String>, total_amount: f64, currency: Currency) -> Self {
        Self {
            name: name.into(),
            total_amount,
            currency,
        }
    }
}

/// Input for logging money toward a goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContributionDraft {
    pub amount: f64,
    pub date: NaiveDate,
}

impl ContributionDraft {
    pub fn new(amount: f64, date: NaiveDate) -> Self {
        Self { amount, date }
    }
}
