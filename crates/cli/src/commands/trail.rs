use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tripquote_core::domain::lead::{LeadId, LeadStatus, StatusTransition};
use tripquote_core::lifecycle::machine::CREATION_NOTE;
use tripquote_core::lifecycle::LeadStateMachine;
use tripquote_core::InMemoryAuditTrail;

use crate::commands::{CommandResult, EXIT_INVALID_INPUT};

const COMMAND: &str = "trail";

#[derive(Debug, Clone, Default, Args)]
pub struct TrailArgs {
    #[arg(
        long = "status",
        required = true,
        help = "Status to move to, in order; repeat for each step after creation"
    )]
    pub statuses: Vec<String>,
    #[arg(long, help = "Identifier of the lead (generated when omitted)")]
    pub lead_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct TrailReport {
    lead_id: LeadId,
    current_status: Option<LeadStatus>,
    transitions: Vec<StatusTransition>,
}

#[derive(Debug, Serialize)]
struct TrailFailure {
    step: usize,
    valid_transitions: Vec<LeadStatus>,
    transitions: Vec<StatusTransition>,
}

/// Replays a lead's status history from creation, stopping at the first
/// step the lifecycle rejects.
pub fn run(args: &TrailArgs) -> CommandResult {
    let lead_id = args.lead_id.clone().map(LeadId).unwrap_or_else(LeadId::generate);
    let machine = LeadStateMachine::new();
    let trail = InMemoryAuditTrail::default();
    let mut current = None;

    for (index, name) in args.statuses.iter().enumerate() {
        let step = index + 1;
        let to = match name.trim().parse::<LeadStatus>() {
            Ok(to) => to,
            Err(error) => {
                return CommandResult::failure_with(
                    COMMAND,
                    "invalid_input",
                    format!("step {step}: {error}"),
                    EXIT_INVALID_INPUT,
                    Some(TrailFailure {
                        step,
                        valid_transitions: Vec::new(),
                        transitions: trail.entries(),
                    }),
                );
            }
        };

        let notes = current.is_none().then(|| CREATION_NOTE.to_string());
        match machine.apply_with_audit(&lead_id, current, to, notes, Utc::now(), &trail) {
            Ok(_) => current = Some(to),
            Err(error) => {
                return CommandResult::failure_with(
                    COMMAND,
                    "invalid_transition",
                    format!("step {step}: {error}"),
                    EXIT_INVALID_INPUT,
                    Some(TrailFailure {
                        step,
                        valid_transitions: error.valid_transitions().to_vec(),
                        transitions: trail.entries(),
                    }),
                );
            }
        }
    }

    let report = TrailReport {
        current_status: trail.current_status(&lead_id),
        transitions: trail.for_lead(&lead_id),
        lead_id,
    };
    CommandResult::success(
        COMMAND,
        format!("{} transition(s) recorded", report.transitions.len()),
        report,
    )
}
