use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use stash::core::goal::Currency;
use stash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Manage savings goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Display the savings dashboard
    Summary {
        /// Ignore the cached exchange rate and fetch a fresh one
        #[arg(short, long)]
        refresh: bool,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Create a new goal
    Add {
        /// Goal name
        #[arg(short, long)]
        name: String,
        /// Target amount
        #[arg(short, long)]
        target: f64,
        /// Currency of the target (INR or USD)
        #[arg(short = 'C', long, default_value = "INR")]
        currency: Currency,
    },
    /// Log a contribution toward a goal
    Contribute {
        /// Goal id or a unique id prefix
        goal: String,
        /// Amount, in the goal's currency
        #[arg(short, long)]
        amount: f64,
        /// Contribution date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List all goals
    List,
}

impl From<GoalCommands> for stash::AppCommand {
    fn from(cmd: GoalCommands) -> stash::AppCommand {
        match cmd {
            GoalCommands::Add {
                name,
                target,
                currency,
            } => stash::AppCommand::AddGoal {
                name,
                target,
                currency,
            },
            GoalCommands::Contribute { goal, amount, date } => {
                stash::AppCommand::Contribute { goal, amount, date }
            }
            GoalCommands::List => stash::AppCommand::ListGoals,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => stash::cli::setup::setup(),
        Some(Commands::Goal { command }) => {
            stash::run_command(command.into(), cli.config_path.as_deref()).await
        }
        Some(Commands::Summary { refresh }) => {
            stash::run_command(
                stash::AppCommand::Summary { refresh },
                cli.config_path.as_deref(),
            )
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
