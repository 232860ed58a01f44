use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tracing::info;
use tripquote_core::config::AppConfig;
use tripquote_core::domain::lead::{LeadId, LeadStatus, StatusTransition};
use tripquote_core::domain::quote::{QuoteBreakdown, QuoteRequest};
use tripquote_core::workflow::{LeadSnapshot, QuoteWorkflow};

use crate::commands::{CommandResult, EXIT_INVALID_INPUT};

const COMMAND: &str = "quote";

#[derive(Debug, Clone, Default, Args)]
pub struct QuoteArgs {
    #[arg(long, help = "Package base price, e.g. 89999.00")]
    pub base_price: Option<String>,
    #[arg(long, help = "Event date (YYYY-MM-DD or RFC 3339)")]
    pub event_date: Option<String>,
    #[arg(long, help = "Booking/travel date the quote is evaluated against")]
    pub travel_date: Option<String>,
    #[arg(long, allow_negative_numbers = true, help = "Number of travelers")]
    pub travelers: i64,
    #[arg(long, help = "Current status of the lead the quote is for")]
    pub lead_status: Option<String>,
    #[arg(long, help = "Identifier of the lead (generated when omitted)")]
    pub lead_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct QuoteReport {
    quote: QuoteBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    lead: Option<LeadSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transition: Option<StatusTransition>,
}

pub fn run(config: &AppConfig, args: &QuoteArgs) -> CommandResult {
    let request = QuoteRequest {
        base_price: args.base_price.clone(),
        event_date: args.event_date.clone(),
        travel_date: args.travel_date.clone(),
        travelers: args.travelers,
    };

    let input = match request.parse() {
        Ok(input) => input,
        Err(error) => return invalid_input(error),
    };
    if let Err(error) = config.quotes.check_travelers(&input) {
        return invalid_input(error);
    }

    let lead = match args.lead_status.as_deref().map(|name| name.trim().parse::<LeadStatus>()).transpose() {
        Ok(status) => status.map(|status| LeadSnapshot {
            id: args.lead_id.clone().map(LeadId).unwrap_or_else(LeadId::generate),
            status,
        }),
        Err(error) => return invalid_input(error),
    };

    let outcome = match QuoteWorkflow::default().generate(&input, lead.as_ref(), Utc::now()) {
        Ok(outcome) => outcome,
        Err(error) => return invalid_input(error),
    };

    info!(
        event_name = "cli.quote.generated",
        final_price = %outcome.breakdown.final_price,
        adjustments = outcome.breakdown.adjustments.len(),
        auto_transition = outcome.transition.is_some(),
        "quote generated"
    );

    let message = format!("final price {}", outcome.breakdown.final_price);
    let lead = lead.map(|lead| LeadSnapshot {
        status: outcome.lead_status.unwrap_or(lead.status),
        ..lead
    });

    CommandResult::success(
        COMMAND,
        message,
        QuoteReport { quote: outcome.breakdown, lead, transition: outcome.transition },
    )
}

fn invalid_input(error: impl std::fmt::Display) -> CommandResult {
    CommandResult::failure(COMMAND, "invalid_input", error.to_string(), EXIT_INVALID_INPUT)
}
