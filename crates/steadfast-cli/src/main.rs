use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "steadfast", version, about = "Steadfast discipline tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Routine management
    Routine {
        #[command(subcommand)]
        action: commands::routine::RoutineAction,
    },
    /// Daily check-offs and day mode
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Current and longest streak
    Streak,
    /// Evolution ladder
    Evolution {
        #[command(subcommand)]
        action: commands::evolution::EvolutionAction,
    },
    /// Execution timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Logged executions
    History,
    /// Goal tracking
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("STEADFAST_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Routine { action } => commands::routine::run(action),
        Commands::Day { action } => commands::day::run(action),
        Commands::Streak => commands::day::streak(),
        Commands::Evolution { action } => commands::evolution::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::History => commands::timer::history(),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
