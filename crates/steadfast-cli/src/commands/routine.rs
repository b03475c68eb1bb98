use clap::Subcommand;

use super::{open_session, print_json, CliResult};

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Add a daily routine
    Add {
        /// Routine title
        title: String,
    },
    /// List routines
    List,
    /// Remove a routine
    Remove {
        /// Routine ID
        id: String,
    },
}

pub fn run(action: RoutineAction) -> CliResult {
    let mut session = open_session()?;

    match action {
        RoutineAction::Add { title } => {
            let routine = session.add_routine(&title)?;
            print_json(&routine)?;
        }
        RoutineAction::List => {
            let routines: Vec<_> = session.state().routines.iter().collect();
            print_json(&routines)?;
        }
        RoutineAction::Remove { id } => {
            let routine = session.remove_routine(&id)?;
            print_json(&routine)?;
        }
    }
    Ok(())
}
