use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use steadfast_core::DayMode;

use super::{open_session, print_event, print_json, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Normal,
    Heavy,
    Critical,
}

impl From<ModeArg> for DayMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Normal => DayMode::Normal,
            ModeArg::Heavy => DayMode::Heavy,
            ModeArg::Critical => DayMode::Critical,
        }
    }
}

#[derive(Subcommand)]
pub enum DayAction {
    /// Check or uncheck a routine
    Check {
        /// Routine ID
        routine_id: String,
        /// Day to edit (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Set how demanding the day is
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
        /// Day to edit (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print a day's log as JSON
    Show {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print every day log as JSON
    List,
}

pub fn run(action: DayAction) -> CliResult {
    let mut session = open_session()?;

    match action {
        DayAction::Check { routine_id, date } => {
            let event = session.toggle_routine(&routine_id, date)?;
            print_json(&event)?;
        }
        DayAction::Mode { mode, date } => {
            let event = session.set_day_mode(mode.into(), date)?;
            print_event(event, "day already has that mode")?;
        }
        DayAction::Show { date } => match session.day_log(date) {
            Some(log) => print_json(log)?,
            None => print_json(&serde_json::Value::Null)?,
        },
        DayAction::List => {
            let logs: Vec<_> = session.state().day_logs.iter().collect();
            print_json(&logs)?;
        }
    }
    Ok(())
}

pub fn streak() -> CliResult {
    let session = open_session()?;
    print_json(&session.day_stats())
}
