use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::QuoteInputError;

/// Validated pricing input for one quote request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteInput {
    pub base_price: Decimal,
    pub event_date: NaiveDate,
    pub travel_date: NaiveDate,
    pub travelers: u32,
}

impl QuoteInput {
    pub fn new(
        base_price: Decimal,
        event_date: NaiveDate,
        travel_date: NaiveDate,
        travelers: u32,
    ) -> Self {
        Self { base_price, event_date, travel_date, travelers }
    }

    /// Signed whole days from the travel (booking) date to the event date.
    pub fn days_until_event(&self) -> i64 {
        (self.event_date - self.travel_date).num_days()
    }
}

/// Quote input as received from a caller, before any parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub base_price: Option<String>,
    pub event_date: Option<String>,
    pub travel_date: Option<String>,
    pub travelers: i64,
}

impl QuoteRequest {
    pub fn parse(&self) -> Result<QuoteInput, QuoteInputError> {
        let raw_price = required("base_price", self.base_price.as_deref())?;
        let base_price = Decimal::from_str(raw_price)
            .map_err(|_| QuoteInputError::InvalidBasePrice { value: raw_price.to_string() })?;
        if base_price.is_sign_negative() && !base_price.is_zero() {
            return Err(QuoteInputError::NegativeBasePrice { base_price });
        }

        let event_date = parse_date("event_date", self.event_date.as_deref())?;
        let travel_date = parse_date("travel_date", self.travel_date.as_deref())?;

        let travelers = u32::try_from(self.travelers)
            .ok()
            .filter(|count| *count >= 1)
            .ok_or(QuoteInputError::NoTravelers { travelers: self.travelers })?;

        Ok(QuoteInput { base_price, event_date, travel_date, travelers })
    }
}

impl TryFrom<QuoteRequest> for QuoteInput {
    type Error = QuoteInputError;

    fn try_from(request: QuoteRequest) -> Result<Self, Self::Error> {
        request.parse()
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, QuoteInputError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(QuoteInputError::MissingField { field })
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<NaiveDate, QuoteInputError> {
    let raw = required(field, value)?;
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
        .map_err(|_| QuoteInputError::InvalidDate { field, value: raw.to_string() })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustmentKind {
    #[serde(rename = "Seasonal Multiplier")]
    SeasonalMultiplier,
    #[serde(rename = "Early-Bird Discount")]
    EarlyBirdDiscount,
    #[serde(rename = "Last-Minute Surcharge")]
    LastMinuteSurcharge,
    #[serde(rename = "Group Discount")]
    GroupDiscount,
    #[serde(rename = "Weekend Surcharge")]
    WeekendSurcharge,
}

impl AdjustmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SeasonalMultiplier => "Seasonal Multiplier",
            Self::EarlyBirdDiscount => "Early-Bird Discount",
            Self::LastMinuteSurcharge => "Last-Minute Surcharge",
            Self::GroupDiscount => "Group Discount",
            Self::WeekendSurcharge => "Weekend Surcharge",
        }
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single fired pricing rule. `amount` keeps full precision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRule {
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub description: String,
    pub percentage: i32,
    pub amount: Decimal,
}

/// Raw signed fractions applied by each rule, `0` when the rule did not fire.
///
/// Field names and signs map one-to-one onto persisted quote columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multipliers {
    pub seasonal_multiplier: Decimal,
    pub early_bird_discount: Decimal,
    pub last_minute_surcharge: Decimal,
    pub group_discount: Decimal,
    pub weekend_surcharge: Decimal,
}

impl Multipliers {
    pub(crate) fn slot_mut(&mut self, kind: AdjustmentKind) -> &mut Decimal {
        match kind {
            AdjustmentKind::SeasonalMultiplier => &mut self.seasonal_multiplier,
            AdjustmentKind::EarlyBirdDiscount => &mut self.early_bird_discount,
            AdjustmentKind::LastMinuteSurcharge => &mut self.last_minute_surcharge,
            AdjustmentKind::GroupDiscount => &mut self.group_discount,
            AdjustmentKind::WeekendSurcharge => &mut self.weekend_surcharge,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub base_price: Decimal,
    pub adjustments: Vec<AdjustmentRule>,
    pub final_price: Decimal,
    pub multipliers: Multipliers,
}

impl QuoteBreakdown {
    pub fn adjustment(&self, kind: AdjustmentKind) -> Option<&AdjustmentRule> {
        self.adjustments.iter().find(|adjustment| adjustment.kind == kind)
    }

    pub fn adjustment_total(&self) -> Decimal {
        self.adjustments.iter().map(|adjustment| adjustment.amount).sum()
    }
}
