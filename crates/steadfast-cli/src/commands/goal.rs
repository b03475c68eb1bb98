use clap::Subcommand;

use super::{open_session, print_json, CliResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Add a goal
    Add {
        /// Goal title
        title: String,
    },
    /// List goals
    List {
        /// Only goals not yet done
        #[arg(long)]
        open: bool,
    },
    /// Mark a goal done, or reopen it
    Toggle {
        /// Goal ID
        id: String,
    },
    /// Remove a goal
    Remove {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: GoalAction) -> CliResult {
    let mut session = open_session()?;

    match action {
        GoalAction::Add { title } => {
            let goal = session.add_goal(&title)?;
            print_json(&goal)?;
        }
        GoalAction::List { open } => {
            let goals: Vec<_> = session
                .state()
                .goals
                .iter()
                .filter(|g| !open || !g.done)
                .collect();
            print_json(&goals)?;
        }
        GoalAction::Toggle { id } => {
            let goal = session.toggle_goal(&id)?;
            print_json(&goal)?;
        }
        GoalAction::Remove { id } => {
            let goal = session.remove_goal(&id)?;
            print_json(&goal)?;
        }
    }
    Ok(())
}
