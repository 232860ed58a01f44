use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::audit::AuditTrail;
use crate::domain::lead::{LeadId, LeadStatus, StatusTransition};
use crate::errors::DomainError;

pub const INITIAL_STATUS: LeadStatus = LeadStatus::New;
pub const CREATION_NOTE: &str = "Lead created";

/// Single source of truth for user-initiated status changes.
const TRANSITIONS: [(LeadStatus, &[LeadStatus]); 6] = [
    (LeadStatus::New, &[LeadStatus::Contacted]),
    (LeadStatus::Contacted, &[LeadStatus::QuoteSent, LeadStatus::ClosedLost]),
    (LeadStatus::QuoteSent, &[LeadStatus::Interested, LeadStatus::ClosedLost]),
    (LeadStatus::Interested, &[LeadStatus::ClosedWon, LeadStatus::ClosedLost]),
    (LeadStatus::ClosedWon, &[]),
    (LeadStatus::ClosedLost, &[]),
];

const CREATION_TARGETS: &[LeadStatus] = &[INITIAL_STATUS];

pub fn allowed_next_statuses(from: LeadStatus) -> &'static [LeadStatus] {
    TRANSITIONS
        .iter()
        .find(|(status, _)| *status == from)
        .map(|(_, allowed)| *allowed)
        .unwrap_or(&[])
}

/// `from == None` is the creation event, which may only land on `New`.
pub fn is_valid_transition(from: Option<LeadStatus>, to: LeadStatus) -> bool {
    allowed_targets(from).contains(&to)
}

/// Name-based variant for callers holding raw status strings. Unknown names
/// are never valid; a blank `from` counts as the creation event.
pub fn is_valid_status_change(from: Option<&str>, to: &str) -> bool {
    let Ok(to) = to.parse::<LeadStatus>() else {
        return false;
    };

    match from.filter(|name| !name.trim().is_empty()) {
        None => is_valid_transition(None, to),
        Some(name) => match name.parse::<LeadStatus>() {
            Ok(from) => is_valid_transition(Some(from), to),
            Err(_) => false,
        },
    }
}

pub fn allowed_next_for(from: &str) -> &'static [LeadStatus] {
    from.parse::<LeadStatus>().map(allowed_next_statuses).unwrap_or(&[])
}

fn allowed_targets(from: Option<LeadStatus>) -> &'static [LeadStatus] {
    match from {
        Some(status) => allowed_next_statuses(status),
        None => CREATION_TARGETS,
    }
}

/// Validates user-initiated status changes and builds the audit facts for
/// them. Holds no state; the caller supplies the current status.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeadStateMachine;

impl LeadStateMachine {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, lead_id: &LeadId, at: DateTime<Utc>) -> StatusTransition {
        StatusTransition {
            lead_id: lead_id.clone(),
            from_status: None,
            to_status: INITIAL_STATUS,
            notes: Some(CREATION_NOTE.to_string()),
            changed_at: at,
        }
    }

    pub fn transition(
        &self,
        lead_id: &LeadId,
        from: Option<LeadStatus>,
        to: LeadStatus,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<StatusTransition, DomainError> {
        if !is_valid_transition(from, to) {
            return Err(DomainError::InvalidLeadTransition {
                from,
                to,
                allowed: allowed_targets(from).to_vec(),
            });
        }

        Ok(StatusTransition {
            lead_id: lead_id.clone(),
            from_status: from,
            to_status: to,
            notes: normalize_notes(notes),
            changed_at: at,
        })
    }

    pub fn apply_with_audit<S>(
        &self,
        lead_id: &LeadId,
        from: Option<LeadStatus>,
        to: LeadStatus,
        notes: Option<String>,
        at: DateTime<Utc>,
        sink: &S,
    ) -> Result<StatusTransition, DomainError>
    where
        S: AuditTrail,
    {
        let result = self.transition(lead_id, from, to, notes, at);
        match &result {
            Ok(transition) => {
                info!(
                    event_name = "lead.transition_applied",
                    lead_id = %lead_id,
                    from = from.map(LeadStatus::as_str).unwrap_or("<none>"),
                    to = to.as_str(),
                    "lead status changed"
                );
                sink.append(transition.clone());
            }
            Err(error) => {
                warn!(
                    event_name = "lead.transition_rejected",
                    lead_id = %lead_id,
                    error = %error,
                    "lead status change rejected"
                );
            }
        }
        result
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|text| !text.trim().is_empty())
}
