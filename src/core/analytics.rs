//! Derived values for goals and the dashboard, recomputed from the current goals and rate.
use crate::core::currency::{convert, progress, saved_amount};
use crate::core::goal::{Currency, Goal};
use tracing::debug;

/// Display values for a single goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalView {
    pub id: String,
    pub name: String,
    pub currency: Currency,
    pub target: f64,
    pub saved: f64,
    pub progress: f64,
    pub other_currency: Currency,
    pub converted_target: f64,
    pub contribution_count: usize,
}

impl GoalView {
    pub fn new(goal: &Goal, rate: f64) -> Self {
        let other_currency = goal.currency.other();
        Self {
            id: goal.id.clone(),
            name: goal.name.clone(),
            currency: goal.currency,
            target: goal.total_amount,
            saved: saved_amount(goal),
            progress: progress(goal),
            other_currency,
            converted_target: convert(goal.total_amount, goal.currency, other_currency, rate),
            contribution_count: goal.contributions.len(),
        }
    }
}

/// Target and saved sums over the goals denominated in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurrencyTotals {
    pub target: f64,
    pub saved: f64,
}

/// Dashboard aggregate across all goals.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardTotals {
    pub inr: CurrencyTotals,
    pub usd: CurrencyTotals,
    pub base_currency: Currency,
    pub combined_target: f64,
    pub combined_saved: f64,
    pub overall_progress: f64,
    pub goal_count: usize,
    pub contribution_count: usize,
}

impl DashboardTotals {
    pub fn for_currency(&self, currency: Currency) -> CurrencyTotals {
        match currency {
            Currency::Inr => self.inr,
            Currency::Usd => self.usd,
        }
    }
}

/// Aggregates all goals. Per-currency sums never mix currencies; the combined figures
/// convert everything into `base` at `rate` first.
pub fn summarize(goals: &[Goal], rate: f64, base: Currency) -> DashboardTotals {
    let mut inr = CurrencyTotals::default();
    let mut usd = CurrencyTotals::default();
    let mut contribution_count = 0;

    for goal in goals {
        let totals = match goal.currency {
            Currency::Inr => &mut inr,
            Currency::Usd => &mut usd,
        };
        totals.target += goal.total_amount;
        totals.saved += saved_amount(goal);
        contribution_count += goal.contributions.len();
    }

    let combined_target =
        convert(inr.target, Currency::Inr, base, rate) + convert(usd.target, Currency::Usd, base, rate);
    let combined_saved =
        convert(inr.saved, Currency::Inr, base, rate) + convert(usd.saved, Currency::Usd, base, rate);
    let overall_progress = if combined_target > 0.0 {
        combined_saved / combined_target * 100.0
    } else {
        0.0
    };
    debug!(
        "Summarized {} goals at rate {rate}: {combined_saved} of {combined_target} {base}",
        goals.len()
    );

    DashboardTotals {
        inr,
        usd,
        base_currency: base,
        combined_target,
        combined_saved,
        overall_progress,
        goal_count: goals.len(),
        contribution_count,
    }
}
