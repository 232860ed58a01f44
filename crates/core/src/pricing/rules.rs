use chrono::{Datelike, Weekday};

use crate::domain::quote::{AdjustmentKind, QuoteInput};

pub const EARLY_BIRD_MIN_DAYS: i64 = 120;
pub const LAST_MINUTE_MAX_DAYS: i64 = 15;
pub const GROUP_MIN_TRAVELERS: u32 = 4;

/// What a rule contributes when its predicate holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleEffect {
    pub percentage: i32,
    pub description: String,
}

impl RuleEffect {
    fn new(percentage: i32, description: impl Into<String>) -> Self {
        Self { percentage, description: description.into() }
    }
}

#[derive(Clone, Copy)]
pub struct PricingRule {
    pub kind: AdjustmentKind,
    pub evaluate: fn(&QuoteInput) -> Option<RuleEffect>,
}

/// Evaluation order is part of the output contract.
///
/// Every rule is checked on its own against the original base price;
/// early-bird and last-minute are two separate entries, not branches of one.
pub const RULES: [PricingRule; 5] = [
    PricingRule { kind: AdjustmentKind::SeasonalMultiplier, evaluate: seasonal },
    PricingRule { kind: AdjustmentKind::EarlyBirdDiscount, evaluate: early_bird },
    PricingRule { kind: AdjustmentKind::LastMinuteSurcharge, evaluate: last_minute },
    PricingRule { kind: AdjustmentKind::GroupDiscount, evaluate: group },
    PricingRule { kind: AdjustmentKind::WeekendSurcharge, evaluate: weekend },
];

pub fn seasonal(input: &QuoteInput) -> Option<RuleEffect> {
    match input.event_date.month() {
        6 | 7 | 12 => Some(RuleEffect::new(20, "Peak season (June/July/December)")),
        4 | 5 | 9 => Some(RuleEffect::new(10, "High season (April/May/September)")),
        _ => None,
    }
}

pub fn early_bird(input: &QuoteInput) -> Option<RuleEffect> {
    (input.days_until_event() >= EARLY_BIRD_MIN_DAYS)
        .then(|| RuleEffect::new(-10, "Booked 120+ days in advance"))
}

pub fn last_minute(input: &QuoteInput) -> Option<RuleEffect> {
    (input.days_until_event() < LAST_MINUTE_MAX_DAYS)
        .then(|| RuleEffect::new(25, "Booked less than 15 days before event"))
}

pub fn group(input: &QuoteInput) -> Option<RuleEffect> {
    (input.travelers >= GROUP_MIN_TRAVELERS).then(|| {
        RuleEffect::new(-8, format!("{} travelers ({GROUP_MIN_TRAVELERS}+ people)", input.travelers))
    })
}

pub fn weekend(input: &QuoteInput) -> Option<RuleEffect> {
    matches!(input.event_date.weekday(), Weekday::Sat | Weekday::Sun)
        .then(|| RuleEffect::new(8, "Event on weekend"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{early_bird, group, last_minute, seasonal, weekend, RuleEffect, RULES};
    use crate::domain::quote::{AdjustmentKind, QuoteInput};

    fn input(event: (i32, u32, u32), travel: (i32, u32, u32), travelers: u32) -> QuoteInput {
        let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).expect("date");
        QuoteInput::new(Decimal::new(100_000, 2), date(event), date(travel), travelers)
    }

    #[test]
    fn rules_are_listed_in_evaluation_order() {
        let kinds: Vec<_> = RULES.iter().map(|rule| rule.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AdjustmentKind::SeasonalMultiplier,
                AdjustmentKind::EarlyBirdDiscount,
                AdjustmentKind::LastMinuteSurcharge,
                AdjustmentKind::GroupDiscount,
                AdjustmentKind::WeekendSurcharge,
            ]
        );
    }

    #[test]
    fn seasonal_bands_by_event_month() {
        let percentage_for = |month| {
            seasonal(&input((2025, month, 10), (2025, 1, 1), 1)).map(|effect| effect.percentage)
        };

        for month in [6, 7, 12] {
            assert_eq!(percentage_for(month), Some(20), "month {month}");
        }
        for month in [4, 5, 9] {
            assert_eq!(percentage_for(month), Some(10), "month {month}");
        }
        for month in [1, 2, 3, 8, 10, 11] {
            assert_eq!(percentage_for(month), None, "month {month}");
        }
    }

    #[test]
    fn early_bird_threshold_is_inclusive_at_120_days() {
        // 2025-01-01 + 120 days = 2025-05-01
        assert!(early_bird(&input((2025, 5, 1), (2025, 1, 1), 1)).is_some());
        assert!(early_bird(&input((2025, 4, 30), (2025, 1, 1), 1)).is_none());
    }

    #[test]
    fn last_minute_threshold_is_exclusive_at_15_days() {
        assert!(last_minute(&input((2025, 3, 15), (2025, 3, 1), 1)).is_some());
        assert!(last_minute(&input((2025, 3, 16), (2025, 3, 1), 1)).is_none());
    }

    #[test]
    fn last_minute_applies_when_travel_date_is_after_event() {
        assert!(last_minute(&input((2025, 3, 1), (2025, 3, 20), 1)).is_some());
        assert!(early_bird(&input((2025, 3, 1), (2025, 3, 20), 1)).is_none());
    }

    #[test]
    fn group_description_interpolates_party_size() {
        assert_eq!(group(&input((2025, 3, 1), (2025, 1, 1), 3)), None);
        assert_eq!(
            group(&input((2025, 3, 1), (2025, 1, 1), 7)),
            Some(RuleEffect { percentage: -8, description: "7 travelers (4+ people)".to_string() })
        );
    }

    #[test]
    fn weekend_covers_saturday_and_sunday_only() {
        // 2025-10-17 Fri, 18 Sat, 19 Sun, 20 Mon
        assert!(weekend(&input((2025, 10, 17), (2025, 1, 1), 1)).is_none());
        assert!(weekend(&input((2025, 10, 18), (2025, 1, 1), 1)).is_some());
        assert!(weekend(&input((2025, 10, 19), (2025, 1, 1), 1)).is_some());
        assert!(weekend(&input((2025, 10, 20), (2025, 1, 1), 1)).is_none());
    }
}
