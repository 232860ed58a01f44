pub mod rules;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::domain::quote::{AdjustmentRule, Multipliers, QuoteBreakdown, QuoteInput};
use crate::errors::QuoteInputError;

use self::rules::RULES;

pub trait PricingEngine: Send + Sync {
    fn calculate(&self, input: &QuoteInput) -> Result<QuoteBreakdown, QuoteInputError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn calculate(&self, input: &QuoteInput) -> Result<QuoteBreakdown, QuoteInputError> {
        calculate(input)
    }
}

/// Prices one quote: five independent adjustments on the base price, then a
/// single rounding of the total to cents.
pub fn calculate(input: &QuoteInput) -> Result<QuoteBreakdown, QuoteInputError> {
    validate(input)?;

    let base_price = input.base_price;
    let mut adjustments = Vec::with_capacity(RULES.len());
    let mut multipliers = Multipliers::default();

    for rule in RULES {
        let Some(effect) = (rule.evaluate)(input) else {
            continue;
        };

        let amount = percentage_of(base_price, effect.percentage)
            .ok_or(QuoteInputError::BasePriceOutOfRange { base_price })?;
        *multipliers.slot_mut(rule.kind) = Decimal::new(i64::from(effect.percentage), 2);
        adjustments.push(AdjustmentRule {
            kind: rule.kind,
            description: effect.description,
            percentage: effect.percentage,
            amount,
        });
    }

    let unrounded = adjustments
        .iter()
        .try_fold(base_price, |total, adjustment| total.checked_add(adjustment.amount))
        .ok_or(QuoteInputError::BasePriceOutOfRange { base_price })?;
    let final_price = round_price(unrounded);

    debug!(
        event_name = "pricing.quote_calculated",
        base_price = %base_price,
        final_price = %final_price,
        adjustments = adjustments.len(),
        days_until_event = input.days_until_event(),
        travelers = input.travelers,
        "quote priced"
    );

    Ok(QuoteBreakdown { base_price, adjustments, final_price, multipliers })
}

/// Cent rounding, ties away from zero.
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn percentage_of(base_price: Decimal, percentage: i32) -> Option<Decimal> {
    base_price.checked_mul(Decimal::from(percentage))?.checked_div(Decimal::ONE_HUNDRED)
}

fn validate(input: &QuoteInput) -> Result<(), QuoteInputError> {
    if input.base_price.is_sign_negative() && !input.base_price.is_zero() {
        return Err(QuoteInputError::NegativeBasePrice { base_price: input.base_price });
    }
    if input.travelers == 0 {
        return Err(QuoteInputError::NoTravelers { travelers: i64::from(input.travelers) });
    }
    Ok(())
}
