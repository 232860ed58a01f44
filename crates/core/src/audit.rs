use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::lead::{LeadId, LeadStatus, StatusTransition};

/// Append-only destination for lead status transitions.
///
/// Implementations must never rewrite or drop an entry once appended.
pub trait AuditTrail: Send + Sync {
    fn append(&self, transition: StatusTransition);
}

#[derive(Clone, Default)]
pub struct InMemoryAuditTrail {
    entries: Arc<Mutex<Vec<StatusTransition>>>,
}

impl InMemoryAuditTrail {
    pub fn entries(&self) -> Vec<StatusTransition> {
        self.lock().clone()
    }

    pub fn for_lead(&self, lead_id: &LeadId) -> Vec<StatusTransition> {
        self.lock().iter().filter(|entry| &entry.lead_id == lead_id).cloned().collect()
    }

    /// Status a lead ends up in after replaying its trail.
    pub fn current_status(&self, lead_id: &LeadId) -> Option<LeadStatus> {
        self.lock()
            .iter()
            .rev()
            .find(|entry| &entry.lead_id == lead_id)
            .map(|entry| entry.to_status)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StatusTransition>> {
        match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl AuditTrail for InMemoryAuditTrail {
    fn append(&self, transition: StatusTransition) {
        self.lock().push(transition);
    }
}
