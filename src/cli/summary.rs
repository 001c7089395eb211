use super::ui;
use crate::core::analytics::{DashboardTotals, GoalView, summarize};
use crate::core::currency::{RateStatus, format_amount};
use crate::core::goal::{Currency, Goal};
use anyhow::Result;
use comfy_table::Cell;

impl DashboardTotals {
    pub fn display_as_text(&self) -> String {
        let mut output = String::new();

        let targets = self.per_currency_lines(|c| self.for_currency(c).target);
        let saved = self.per_currency_lines(|c| self.for_currency(c).saved);
        output.push_str(&format!("{} {targets}\n", ui::label("Total Target:")));
        output.push_str(&format!("{} {saved}\n", ui::label("Total Saved:")));
        output.push_str(&format!(
            "{} {} of {} ({})\n",
            ui::label("Combined:"),
            format_amount(self.combined_saved, self.base_currency),
            format_amount(self.combined_target, self.base_currency),
            self.base_currency
        ));
        output.push_str(&format!(
            "{} {} {}",
            ui::label("Overall Progress:"),
            ui::percent(self.overall_progress),
            ui::progress_bar(self.overall_progress)
        ));
        output
    }

    // Currencies with nothing in them are left out; all-empty renders as "-".
    fn per_currency_lines(&self, value: impl Fn(Currency) -> f64) -> String {
        let parts: Vec<String> = [Currency::Inr, Currency::Usd]
            .into_iter()
            .filter(|c| value(*c) > 0.0)
            .map(|c| format_amount(value(c), c))
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(" + ")
        }
    }
}

pub fn render_rate_line(status: &RateStatus, fallback_rate: f64) -> String {
    let rate = status.effective_rate(fallback_rate);
    match status.error() {
        Some(err) => ui::notice(&format!(
            "USD→INR {rate:.2} (fallback rate, live rate unavailable: {err})"
        )),
        None => format!(
            "USD→INR {rate:.2} {}",
            ui::detail(&format!("(last updated: {})", status.last_updated_label()))
        ),
    }
}

pub fn render_goal_table(goals: &[Goal], rate: f64) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Goal"),
        ui::header_cell("Target"),
        ui::header_cell("Converted"),
        ui::header_cell("Saved"),
        ui::header_cell("Progress"),
        ui::header_cell("Contributions"),
    ]);

    for goal in goals {
        let view = GoalView::new(goal, rate);
        table.add_row(vec![
            Cell::new(&view.name),
            ui::amount_cell(format_amount(view.target, view.currency)),
            ui::amount_cell(format_amount(view.converted_target, view.other_currency)),
            ui::amount_cell(format_amount(view.saved, view.currency)),
            ui::progress_cell(view.progress),
            ui::amount_cell(view.contribution_count.to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_dashboard(
    goals: &[Goal],
    status: &RateStatus,
    fallback_rate: f64,
    base_currency: Currency,
) -> String {
    let rate = status.effective_rate(fallback_rate);
    let totals = summarize(goals, rate, base_currency);

    let mut output = format!(
        "{}\n{}\n\n{}",
        ui::heading("Savings Planner"),
        render_rate_line(status, fallback_rate),
        totals.display_as_text()
    );

    if goals.is_empty() {
        output.push_str("\n\nNo goals yet. Add your first goal with `stash goal add`.");
    } else {
        output.push_str("\n\n");
        output.push_str(&render_goal_table(goals, rate));
    }
    output
}

pub fn run(
    goals: &[Goal],
    status: &RateStatus,
    fallback_rate: f64,
    base_currency: Currency,
) -> Result<()> {
    println!(
        "{}",
        render_dashboard(goals, status, fallback_rate, base_currency)
    );
    ui::print_separator();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::ExchangeRate;
    use crate::core::goal::Contribution;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn trip() -> Goal {
        Goal {
            id: "trip".to_string(),
            name: "Trip".to_string(),
            total_amount: 1000.0,
            currency: Currency::Usd,
            contributions: vec![
                Contribution {
                    id: "c1".to_string(),
                    amount: 200.0,
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                },
                Contribution {
                    id: "c2".to_string(),
                    amount: 300.0,
                    date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                },
            ],
        }
    }

    fn ready(rate: f64) -> RateStatus {
        RateStatus::Ready(ExchangeRate {
            rate,
            last_updated: Utc.timestamp_opt(1_704_067_200, 0).unwrap(),
        })
    }

    #[test]
    fn test_dashboard_with_live_rate() {
        let output = render_dashboard(&[trip()], &ready(80.0), 83.0, Currency::Inr);

        assert!(output.contains("USD→INR 80.00"));
        assert!(output.contains("Trip"));
        assert!(output.contains("$1,000"));
        assert!(output.contains("₹80,000"));
        assert!(output.contains("$500"));
        assert!(output.contains("50.0%"));
        assert!(output.contains("₹40,000 of ₹80,000"));
    }

    #[test]
    fn test_dashboard_with_failed_rate_uses_fallback() {
        let status = RateStatus::Failed("HTTP error: 500 Internal Server Error".to_string());
        let output = render_dashboard(&[trip()], &status, 83.0, Currency::Inr);

        assert!(output.contains("USD→INR 83.00"));
        assert!(output.contains("live rate unavailable: HTTP error: 500"));
        assert!(output.contains("₹83,000"));
    }

    #[test]
    fn test_dashboard_empty() {
        console::set_colors_enabled(false);
        let output = render_dashboard(&[], &RateStatus::Pending, 83.0, Currency::Usd);

        assert!(output.contains("Total Target: -"));
        assert!(output.contains("Total Saved: -"));
        assert!(output.contains("last updated: Never"));
        assert!(output.contains("No goals yet"));
        assert!(output.contains("0.0%"));
    }

    #[test]
    fn test_per_currency_lines() {
        let mut house = trip();
        house.id = "house".to_string();
        house.currency = Currency::Inr;
        house.total_amount = 100000.0;
        house.contributions.clear();

        let totals = summarize(&[trip(), house], 80.0, Currency::Inr);
        let output = totals.display_as_text();
        assert!(output.contains("₹1,00,000 + $1,000"));
        assert!(output.contains("$500"));
    }
}
