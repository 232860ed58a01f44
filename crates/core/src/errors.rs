use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::lead::LeadStatus;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuoteInputError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("`{field}` is not a valid date: `{value}`")]
    InvalidDate { field: &'static str, value: String },
    #[error("base_price is not a valid amount: `{value}`")]
    InvalidBasePrice { value: String },
    #[error("base_price must be >= 0, got {base_price}")]
    NegativeBasePrice { base_price: Decimal },
    #[error("travelers must be >= 1, got {travelers}")]
    NoTravelers { travelers: i64 },
    #[error("base_price {base_price} is too large to price")]
    BasePriceOutOfRange { base_price: Decimal },
    #[error("travelers must be <= {max}, got {travelers}")]
    TooManyTravelers { travelers: u32, max: u32 },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    InvalidQuoteInput(#[from] QuoteInputError),
    #[error("invalid status transition from '{}' to '{to}'", display_from(.from))]
    InvalidLeadTransition { from: Option<LeadStatus>, to: LeadStatus, allowed: Vec<LeadStatus> },
    #[error("unknown lead status `{0}`")]
    UnknownLeadStatus(String),
    #[error("notes exceed {max} characters")]
    NotesTooLong { max: usize },
}

fn display_from(from: &Option<LeadStatus>) -> &'static str {
    from.map(LeadStatus::as_str).unwrap_or("<none>")
}

impl DomainError {
    /// Statuses the caller may move to instead, for rejected transitions.
    pub fn valid_transitions(&self) -> &[LeadStatus] {
        match self {
            Self::InvalidLeadTransition { allowed, .. } => allowed.as_slice(),
            _ => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        match self {
            Self::Domain(error) => {
                InterfaceError::BadRequest { message: error.to_string(), correlation_id }
            }
            Self::Configuration(error) => {
                InterfaceError::Internal { message: error.to_string(), correlation_id }
            }
        }
    }
}
