pub mod machine;
pub mod policy;

pub use machine::{
    allowed_next_for, allowed_next_statuses, is_valid_status_change, is_valid_transition,
    LeadStateMachine, INITIAL_STATUS,
};
pub use policy::{quote_generated_transition, status_after_quote, AUTO_QUOTE_NOTE};
