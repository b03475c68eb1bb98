use std::io::Write;
use std::time::Duration as StdDuration;

use clap::Subcommand;
use steadfast_core::{Clock, Event, TimerSetup, TimerStatus};

use super::{open_session, print_event, print_json, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the execution timer
    Start {
        #[arg(long, default_value_t = 0)]
        hours: u64,
        #[arg(long, default_value_t = 0)]
        minutes: u64,
        #[arg(long, default_value_t = 0)]
        seconds: u64,
        /// What will exist when the timer ends
        #[arg(long)]
        deliverable: String,
    },
    /// Print the timer state as JSON
    Status,
    /// Follow the countdown until it finishes
    Watch,
    /// Abandon the running timer
    GiveUp,
    /// Close a finished timer and log the execution
    Dismiss,
}

pub fn run(action: TimerAction) -> CliResult {
    let mut session = open_session()?;

    match action {
        TimerAction::Start {
            hours,
            minutes,
            seconds,
            deliverable,
        } => {
            let setup = TimerSetup {
                hours,
                minutes,
                seconds,
                deliverable,
            };
            let event = session.start_timer(&setup)?;
            print_event(event, "timer is already running or finished")?;
        }
        TimerAction::Status => {
            announce_finish(session.tick_timer()?)?;
            print_json(&session.timer_snapshot())?;
        }
        TimerAction::Watch => {
            if session.state().timer.status() == TimerStatus::Idle {
                return print_event(None, "timer is idle");
            }
            let refresh = StdDuration::from_secs(session.config().timer.refresh_secs);
            while session.state().timer.status() == TimerStatus::Running {
                if announce_finish(session.tick_timer()?)? {
                    break;
                }
                let remaining = session.state().timer.remaining_secs(session.clock().now());
                eprint!(
                    "\r{:02}:{:02}:{:02} remaining",
                    remaining / 3600,
                    remaining / 60 % 60,
                    remaining % 60
                );
                std::thread::sleep(refresh);
            }
            eprintln!();
            print_json(&session.timer_snapshot())?;
        }
        TimerAction::GiveUp => {
            let event = session.give_up_timer()?;
            print_event(event, "timer is idle")?;
        }
        TimerAction::Dismiss => {
            let event = session.dismiss_timer()?;
            print_event(event, "timer has not finished")?;
        }
    }
    Ok(())
}

/// Ring the terminal bell once per configured beep and print the finish
/// event. Returns whether the tick finished the timer.
fn announce_finish(event: Option<Event>) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(event @ Event::TimerFinished { beeps, .. }) = event else {
        return Ok(false);
    };
    let mut stderr = std::io::stderr();
    for _ in 0..beeps {
        write!(stderr, "\x07")?;
    }
    stderr.flush()?;
    print_json(&event)?;
    Ok(true)
}

/// Print the execution log, newest first.
pub fn history() -> CliResult {
    let session = open_session()?;
    let records: Vec<_> = session.state().executions.iter().rev().collect();
    print_json(&records)
}
