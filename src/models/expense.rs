use std::fmt;

use chrono::NaiveDate;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ValidationError;

/// A non-negative money amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Amount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);
    /// One quadrillion. Keeps cent arithmetic on many records far from
    /// `Decimal::MAX`.
    pub const MAX: Amount = Amount(Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0));

    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::NegativeAmount);
        }
        if value > Self::MAX.0 {
            return Err(ValidationError::AmountTooLarge { max: Self::MAX.0 });
        }
        // -0 is normalised so it never prints with a sign
        Ok(Amount(value.abs()))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: Amount,
}

impl ExpenseRecord {
    pub fn to_list_item(&self) -> ListItem {
        ListItem::new(Line::from(vec![
            Span::raw(format!("{:<10} ", self.date.format("%Y-%m-%d"))),
            Span::styled(format!("{:>10} ", self.amount), Style::default().fg(Color::Red)),
            Span::raw(format!("{:<16} ", self.category)),
            Span::raw(self.description.as_str()),
        ]))
    }
}
