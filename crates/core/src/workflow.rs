use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audit::AuditTrail;
use crate::domain::lead::{LeadId, LeadStatus, StatusTransition};
use crate::domain::quote::{QuoteBreakdown, QuoteInput};
use crate::errors::QuoteInputError;
use crate::lifecycle::policy::quote_generated_transition;
use crate::pricing::{DeterministicPricingEngine, PricingEngine};

/// The lead a quote is generated for, as currently stored by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSnapshot {
    pub id: LeadId,
    pub status: LeadStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteOutcome {
    pub breakdown: QuoteBreakdown,
    pub lead_status: Option<LeadStatus>,
    pub transition: Option<StatusTransition>,
}

pub struct QuoteWorkflow<E> {
    engine: E,
}

impl<E> QuoteWorkflow<E>
where
    E: PricingEngine,
{
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Prices the quote, then applies the quote-generated status policy to
    /// the lead. Nothing is produced for the lead when pricing fails.
    pub fn generate(
        &self,
        input: &QuoteInput,
        lead: Option<&LeadSnapshot>,
        at: DateTime<Utc>,
    ) -> Result<QuoteOutcome, QuoteInputError> {
        let breakdown = self.engine.calculate(input)?;

        let transition =
            lead.and_then(|lead| quote_generated_transition(&lead.id, lead.status, at));
        let lead_status = transition
            .as_ref()
            .map(|transition| transition.to_status)
            .or_else(|| lead.map(|lead| lead.status));

        Ok(QuoteOutcome { breakdown, lead_status, transition })
    }

    pub fn generate_with_audit<S>(
        &self,
        input: &QuoteInput,
        lead: Option<&LeadSnapshot>,
        at: DateTime<Utc>,
        sink: &S,
    ) -> Result<QuoteOutcome, QuoteInputError>
    where
        S: AuditTrail,
    {
        let outcome = self.generate(input, lead, at)?;
        if let Some(transition) = &outcome.transition {
            info!(
                event_name = "lead.quote_auto_transition",
                lead_id = %transition.lead_id,
                from = transition.from_status.map(LeadStatus::as_str).unwrap_or("<none>"),
                to = transition.to_status.as_str(),
                final_price = %outcome.breakdown.final_price,
                "lead advanced by quote generation"
            );
            sink.append(transition.clone());
        }
        Ok(outcome)
    }
}

impl Default for QuoteWorkflow<DeterministicPricingEngine> {
    fn default() -> Self {
        Self::new(DeterministicPricingEngine)
    }
}
