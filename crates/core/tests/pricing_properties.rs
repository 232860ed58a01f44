use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tripquote_core::domain::quote::{AdjustmentKind, Multipliers, QuoteInput};
use tripquote_core::pricing::{calculate, round_price, rules::RULES};

fn quote_input() -> impl Strategy<Value = QuoteInput> {
    (0i64..1_000_000_000, 0u64..3_650, -60i64..400, 1u32..60).prop_map(
        |(cents, event_offset, lead_days, travelers)| {
            let epoch = NaiveDate::from_ymd_opt(2020, 1, 1).expect("epoch");
            let event_date = epoch + Days::new(event_offset);
            let travel_date = event_date - chrono::Duration::days(lead_days);
            QuoteInput::new(Decimal::new(cents, 2), event_date, travel_date, travelers)
        },
    )
}

fn multiplier(multipliers: &Multipliers, kind: AdjustmentKind) -> Decimal {
    match kind {
        AdjustmentKind::SeasonalMultiplier => multipliers.seasonal_multiplier,
        AdjustmentKind::EarlyBirdDiscount => multipliers.early_bird_discount,
        AdjustmentKind::LastMinuteSurcharge => multipliers.last_minute_surcharge,
        AdjustmentKind::GroupDiscount => multipliers.group_discount,
        AdjustmentKind::WeekendSurcharge => multipliers.weekend_surcharge,
    }
}

proptest! {
    #[test]
    fn final_price_is_rounded_sum_of_adjustments(input in quote_input()) {
        let breakdown = calculate(&input).expect("generated input is valid");
        let sum: Decimal = breakdown.adjustments.iter().map(|a| a.amount).sum();
        prop_assert_eq!(breakdown.final_price, round_price(input.base_price + sum));
        prop_assert_eq!(breakdown.base_price, input.base_price);
    }

    #[test]
    fn amounts_are_percentages_of_base_price(input in quote_input()) {
        let breakdown = calculate(&input).expect("generated input is valid");
        for adjustment in &breakdown.adjustments {
            let expected = input.base_price * Decimal::from(adjustment.percentage) / Decimal::ONE_HUNDRED;
            prop_assert_eq!(adjustment.amount, expected);
            prop_assert_ne!(adjustment.percentage, 0);
        }
    }

    #[test]
    fn adjustments_follow_rule_order_and_multipliers_mirror_them(input in quote_input()) {
        let breakdown = calculate(&input).expect("generated input is valid");

        let positions: Vec<usize> = breakdown
            .adjustments
            .iter()
            .map(|a| RULES.iter().position(|rule| rule.kind == a.kind).expect("known rule"))
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        for rule in RULES {
            let fired = breakdown.adjustment(rule.kind);
            let stored = multiplier(&breakdown.multipliers, rule.kind);
            match fired {
                Some(adjustment) => {
                    prop_assert_eq!(stored, Decimal::new(i64::from(adjustment.percentage), 2));
                }
                None => prop_assert!(stored.is_zero()),
            }
        }
    }

    #[test]
    fn early_bird_and_last_minute_never_both_fire(input in quote_input()) {
        let breakdown = calculate(&input).expect("generated input is valid");
        let early = breakdown.adjustment(AdjustmentKind::EarlyBirdDiscount).is_some();
        let late = breakdown.adjustment(AdjustmentKind::LastMinuteSurcharge).is_some();
        prop_assert!(!(early && late));
    }

    #[test]
    fn calculation_is_idempotent(input in quote_input()) {
        prop_assert_eq!(calculate(&input), calculate(&input));
    }

    #[test]
    fn negative_base_price_is_always_rejected(cents in 1i64..1_000_000_000) {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).expect("date");
        let input = QuoteInput::new(Decimal::new(-cents, 2), date, date, 1);
        prop_assert!(calculate(&input).is_err());
    }
}
