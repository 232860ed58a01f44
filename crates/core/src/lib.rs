pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod lifecycle;
pub mod pricing;
pub mod workflow;

pub use audit::{AuditTrail, InMemoryAuditTrail};
pub use domain::lead::{LeadId, LeadStatus, StatusTransition};
pub use domain::quote::{
    AdjustmentKind, AdjustmentRule, Multipliers, QuoteBreakdown, QuoteInput, QuoteRequest,
};
pub use errors::{ApplicationError, DomainError, InterfaceError, QuoteInputError};
pub use lifecycle::{
    allowed_next_statuses, is_valid_transition, quote_generated_transition, status_after_quote,
    LeadStateMachine,
};
pub use pricing::{calculate, DeterministicPricingEngine, PricingEngine};
pub use workflow::{LeadSnapshot, QuoteOutcome, QuoteWorkflow};
