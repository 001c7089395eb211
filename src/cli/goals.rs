use super::{forms, ui};
use crate::core::currency::{format_amount, progress, saved_amount};
use crate::core::goal::{Contribution, ContributionDraft, Currency, Goal, GoalDraft};
use crate::core::store::GoalStore;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use comfy_table::Cell;
use tracing::{info, warn};

const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Resolves a full goal id from an exact id or an unambiguous id prefix. Unknown ids, and
/// blank queries which would prefix-match everything, are passed through so the store
/// reports them.
pub fn resolve_goal_id(store: &GoalStore, query: &str) -> Result<String> {
    if query.trim().is_empty() || store.goal(query).is_some() {
        return Ok(query.to_string());
    }

    let matches: Vec<&Goal> = store
        .list_goals()
        .iter()
        .filter(|g| g.id.starts_with(query))
        .collect();
    match matches.as_slice() {
        [goal] => Ok(goal.id.clone()),
        [] => Ok(query.to_string()),
        _ => bail!(
            "Goal id prefix '{}' is ambiguous ({} goals match)",
            query,
            matches.len()
        ),
    }
}

pub fn add_goal(store: &mut GoalStore, name: &str, target: f64, currency: Currency) -> Result<Goal> {
    let name = forms::validate_goal_name(name)?;
    let target = forms::validate_amount(target)?;

    let goal = store.create_goal(GoalDraft::new(name, target, currency));
    info!(goal_id = %goal.id, "Goal created");
    report_persist_error(store);

    println!(
        "Created goal {} ({}) with target {}",
        ui::label(&goal.name),
        ui::detail(short_id(&goal.id)),
        format_amount(goal.total_amount, goal.currency)
    );
    Ok(goal)
}

pub fn contribute(
    store: &mut GoalStore,
    goal_query: &str,
    amount: f64,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<Contribution> {
    let amount = forms::validate_amount(amount)?;
    let date = forms::validate_contribution_date(date, today)?;
    let goal_id = resolve_goal_id(store, goal_query)?;

    let contribution = store.add_contribution(&goal_id, ContributionDraft::new(amount, date))?;
    info!(goal_id = %goal_id, contribution_id = %contribution.id, "Contribution added");
    report_persist_error(store);

    if let Some(goal) = store.goal(&goal_id) {
        println!(
            "Added {} to {} on {}. Saved {} of {} ({:.1}%)",
            format_amount(contribution.amount, goal.currency),
            ui::label(&goal.name),
            contribution.date,
            format_amount(saved_amount(goal), goal.currency),
            format_amount(goal.total_amount, goal.currency),
            progress(goal)
        );
    }
    Ok(contribution)
}

pub fn render_goal_list(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return "No goals yet. Create one with `stash goal add`.".to_string();
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Goal"),
        ui::header_cell("Target"),
        ui::header_cell("Saved"),
        ui::header_cell("Progress"),
        ui::header_cell("Contributions"),
    ]);

    for goal in goals {
        table.add_row(vec![
            Cell::new(short_id(&goal.id)),
            Cell::new(&goal.name),
            ui::amount_cell(format_amount(goal.total_amount, goal.currency)),
            ui::amount_cell(format_amount(saved_amount(goal), goal.currency)),
            ui::progress_cell(progress(goal)),
            ui::amount_cell(goal.contributions.len().to_string()),
        ]);
    }
    table.to_string()
}

pub fn list(store: &GoalStore) -> Result<()> {
    println!("{}", render_goal_list(store.list_goals()));
    Ok(())
}

fn report_persist_error(store: &GoalStore) {
    if let Some(err) = store.last_persist_error() {
        warn!("Changes are kept for this session only: {err}");
        eprintln!(
            "{}",
            ui::notice(&format!("Warning: could not save goals to disk: {err}"))
        );
    }
}
