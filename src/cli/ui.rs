use crate::core::currency::clamp_progress;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_WIDTH: usize = 20;

/// How far along a goal is, used to colour percentages consistently in tables and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    Starting,
    Halfway,
    Reached,
}

impl ProgressBand {
    pub fn of(progress: f64) -> Self {
        if progress >= 100.0 {
            ProgressBand::Reached
        } else if progress >= 50.0 {
            ProgressBand::Halfway
        } else {
            ProgressBand::Starting
        }
    }

    fn color(self) -> Option<Color> {
        match self {
            ProgressBand::Starting => None,
            ProgressBand::Halfway => Some(Color::Cyan),
            ProgressBand::Reached => Some(Color::Green),
        }
    }
}

pub fn heading(text: &str) -> String {
    style(text).bold().underlined().to_string()
}

pub fn label(text: &str) -> String {
    style(text).bold().to_string()
}

/// Ids, timestamps and other secondary details.
pub fn detail(text: &str) -> String {
    style(text).dim().to_string()
}

/// Degraded-mode notices: fallback rate in use, unsaved changes.
pub fn notice(text: &str) -> String {
    style(text).yellow().to_string()
}

/// Percentage text coloured by its progress band.
pub fn percent(progress: f64) -> String {
    let text = style(format!("{progress:.1}%")).bold();
    match ProgressBand::of(progress) {
        ProgressBand::Starting => text,
        ProgressBand::Halfway => text.cyan(),
        ProgressBand::Reached => text.green(),
    }
    .to_string()
}

/// Rounded UTF-8 table that wraps to the terminal width.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for a formatted amount.
pub fn amount_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Percentage cell coloured by its progress band, bold once the goal is reached.
pub fn progress_cell(progress: f64) -> Cell {
    let band = ProgressBand::of(progress);
    let mut cell = Cell::new(format!("{progress:.1}%")).set_alignment(CellAlignment::Right);
    if let Some(color) = band.color() {
        cell = cell.fg(color);
    }
    if band == ProgressBand::Reached {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

/// Text progress bar; the percentage is clamped for the bar width only.
pub fn progress_bar(progress: f64) -> String {
    let filled = (clamp_progress(progress) / 100.0 * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Creates a spinner shown while waiting on the network.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
