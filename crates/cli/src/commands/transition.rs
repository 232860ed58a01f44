use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tripquote_core::config::AppConfig;
use tripquote_core::domain::lead::{LeadId, LeadStatus};
use tripquote_core::lifecycle::{
    allowed_next_for, is_valid_status_change, LeadStateMachine, INITIAL_STATUS,
};

use crate::commands::{CommandResult, EXIT_INVALID_INPUT};

const COMMAND: &str = "transition";

#[derive(Debug, Clone, Default, Args)]
pub struct TransitionArgs {
    #[arg(long, help = "Current status (omit for a newly created lead)")]
    pub from: Option<String>,
    #[arg(long, help = "Requested status")]
    pub to: String,
    #[arg(long, help = "Free-text note recorded with the change")]
    pub notes: Option<String>,
    #[arg(long, help = "Identifier of the lead (generated when omitted)")]
    pub lead_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct Rejection {
    valid_transitions: Vec<LeadStatus>,
}

pub fn run(config: &AppConfig, args: &TransitionArgs) -> CommandResult {
    let from_name = args.from.as_deref().map(str::trim).filter(|name| !name.is_empty());
    let to_name = args.to.trim();
    if !is_valid_status_change(from_name, to_name) {
        let valid_transitions = match from_name {
            Some(name) => allowed_next_for(name).to_vec(),
            None => vec![INITIAL_STATUS],
        };
        return rejected(
            format!(
                "Invalid status transition from '{}' to '{}'",
                from_name.unwrap_or("<none>"),
                to_name
            ),
            valid_transitions,
        );
    }

    if let Err(error) = config.quotes.check_notes(args.notes.as_deref()) {
        return invalid_input(error);
    }

    let (Ok(from), Ok(to)) =
        (from_name.map(str::parse::<LeadStatus>).transpose(), to_name.parse::<LeadStatus>())
    else {
        return invalid_input("status names could not be parsed");
    };

    let lead_id = args.lead_id.clone().map(LeadId).unwrap_or_else(LeadId::generate);
    match LeadStateMachine.transition(&lead_id, from, to, args.notes.clone(), Utc::now()) {
        Ok(transition) => CommandResult::success(
            COMMAND,
            format!(
                "Lead status updated from '{}' to '{}'",
                from.map(LeadStatus::as_str).unwrap_or("<none>"),
                to
            ),
            transition,
        ),
        Err(error) => rejected(error.to_string(), error.valid_transitions().to_vec()),
    }
}

fn invalid_input(error: impl std::fmt::Display) -> CommandResult {
    CommandResult::failure(COMMAND, "invalid_input", error.to_string(), EXIT_INVALID_INPUT)
}

fn rejected(message: String, valid_transitions: Vec<LeadStatus>) -> CommandResult {
    CommandResult::failure_with(
        COMMAND,
        "invalid_transition",
        message,
        EXIT_INVALID_INPUT,
        Some(Rejection { valid_transitions }),
    )
}
