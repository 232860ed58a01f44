use clap::Args;
use serde::Serialize;
use tripquote_core::domain::lead::LeadStatus;
use tripquote_core::lifecycle::{allowed_next_for, allowed_next_statuses};

use crate::commands::CommandResult;

const COMMAND: &str = "statuses";

#[derive(Debug, Clone, Default, Args)]
pub struct StatusesArgs {
    #[arg(long, help = "Only list the statuses reachable from this one")]
    pub from: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusEntry {
    status: LeadStatus,
    terminal: bool,
    allowed_next: &'static [LeadStatus],
}

#[derive(Debug, Serialize)]
struct AllowedNext<'a> {
    from: &'a str,
    allowed_next: &'static [LeadStatus],
}

pub fn run(args: &StatusesArgs) -> CommandResult {
    match args.from.as_deref() {
        Some(from) => {
            let from = from.trim();
            let allowed_next = allowed_next_for(from);
            CommandResult::success(
                COMMAND,
                format!("{} status(es) reachable from '{from}'", allowed_next.len()),
                AllowedNext { from, allowed_next },
            )
        }
        None => {
            let entries: Vec<StatusEntry> = LeadStatus::ALL
                .into_iter()
                .map(|status| StatusEntry {
                    status,
                    terminal: status.is_terminal(),
                    allowed_next: allowed_next_statuses(status),
                })
                .collect();
            CommandResult::success(COMMAND, "lead lifecycle", entries)
        }
    }
}
