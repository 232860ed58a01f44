//! Status changes the system makes on its own, outside the user-initiated
//! transition table.

use chrono::{DateTime, Utc};

use crate::domain::lead::{LeadId, LeadStatus, StatusTransition};

pub const AUTO_QUOTE_NOTE: &str = "Quote generated automatically";

/// Status a lead moves to once a quote has been generated for it, if any.
///
/// Leads already at or past `Quote Sent` in the sales funnel keep their
/// status. Every other lead, including one at `Closed Lost`, is moved to
/// `Quote Sent`. `New -> Quote Sent` is not in the transition table, so this
/// deliberately does not go through `is_valid_transition`.
pub fn status_after_quote(current: LeadStatus) -> Option<LeadStatus> {
    match current {
        LeadStatus::QuoteSent | LeadStatus::Interested | LeadStatus::ClosedWon => None,
        LeadStatus::New | LeadStatus::Contacted | LeadStatus::ClosedLost => {
            Some(LeadStatus::QuoteSent)
        }
    }
}

pub fn quote_generated_transition(
    lead_id: &LeadId,
    current: LeadStatus,
    at: DateTime<Utc>,
) -> Option<StatusTransition> {
    status_after_quote(current).map(|to_status| StatusTransition {
        lead_id: lead_id.clone(),
        from_status: Some(current),
        to_status,
        notes: Some(AUTO_QUOTE_NOTE.to_string()),
        changed_at: at,
    })
}
