use clap::{Subcommand, ValueEnum};
use steadfast_core::{ChecklistItem, Level};

use super::{open_session, print_event, print_json, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum ItemArg {
    /// Execution proven today
    Execution,
    /// Reflection written today
    Reflection,
}

impl From<ItemArg> for ChecklistItem {
    fn from(arg: ItemArg) -> Self {
        match arg {
            ItemArg::Execution => ChecklistItem::Execution,
            ItemArg::Reflection => ChecklistItem::Reflection,
        }
    }
}

#[derive(Subcommand)]
pub enum EvolutionAction {
    /// Print a level's ladder view as JSON
    Status {
        /// Level (1-3), defaults to the highest entered level
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        level: Option<u8>,
    },
    /// Start a level's 40-day clock
    Start {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        level: u8,
    },
    /// Mark a day complete
    Complete {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        level: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=40))]
        day: u8,
    },
    /// Undo the latest completed day (levels 1 and 2 only)
    Undo {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        level: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=40))]
        day: u8,
    },
    /// Tick a level 3 checklist item for the next day
    Check {
        #[arg(value_enum)]
        item: ItemArg,
        /// Clear the item instead
        #[arg(long)]
        uncheck: bool,
    },
}

fn level_arg(n: u8) -> Result<Level, Box<dyn std::error::Error>> {
    Level::from_number(n).ok_or_else(|| format!("invalid level: {n}").into())
}

pub fn run(action: EvolutionAction) -> CliResult {
    let mut session = open_session()?;

    match action {
        EvolutionAction::Status { level } => {
            let level = match level {
                Some(n) => level_arg(n)?,
                None => Level::ALL
                    .into_iter()
                    .rev()
                    .find(|l| session.state().evolution.can_enter(*l))
                    .unwrap_or(Level::One),
            };
            print_json(&session.ladder(level))?;
        }
        EvolutionAction::Start { level } => {
            let event = session.start_level(level_arg(level)?)?;
            print_event(event, "level already started or previous level incomplete")?;
        }
        EvolutionAction::Complete { level, day } => {
            let event = session.complete_day(level_arg(level)?, day)?;
            print_event(event, "day is locked, already completed, or checklist incomplete")?;
        }
        EvolutionAction::Undo { level, day } => {
            let event = session.undo_day(level_arg(level)?, day)?;
            print_event(event, "only the latest day of an unsealed level 1 or 2 can be undone")?;
        }
        EvolutionAction::Check { item, uncheck } => {
            let event = session.set_checklist_item(item.into(), !uncheck)?;
            print_event(event, "no level 3 day is available or the item is unchanged")?;
        }
    }
    Ok(())
}
