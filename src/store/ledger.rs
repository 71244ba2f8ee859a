use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::expense::{Amount, ExpenseRecord};

/// Append-only table of expenses for the session.
#[derive(Debug, Clone, Default)]
pub struct ExpenseLedger {
    records: Vec<ExpenseRecord>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new expense. The category is taken literally and not checked
    /// against the registry.
    pub fn add(
        &mut self,
        date: NaiveDate,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
    ) -> &ExpenseRecord {
        let record = ExpenseRecord {
            date,
            category: category.into(),
            description: description.into(),
            amount,
        };
        debug!(date = %record.date, category = %record.category, amount = %record.amount, "expense recorded");
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Records in insertion order. The iterator is `Clone`, so it can be
    /// restarted from any point.
    pub fn all(&self) -> std::slice::Iter<'_, ExpenseRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[ExpenseRecord] {
        &self.records
    }

    /// Newest first. Records sharing a date keep their insertion order.
    pub fn sorted_by_date_descending(&self) -> Vec<&ExpenseRecord> {
        let mut sorted: Vec<&ExpenseRecord> = self.records.iter().collect();
        // sort_by is stable
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// Sum of amounts per category string, including categories that no longer
    /// exist in the registry. Sums saturate at `Decimal::MAX`.
    pub fn totals_by_category(&self) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for record in &self.records {
            let total = totals.entry(record.category.clone()).or_insert(Decimal::ZERO);
            *total = saturating_add(*total, record.amount.value());
        }
        totals
    }

    pub fn total(&self) -> Decimal {
        self.records
            .iter()
            .fold(Decimal::ZERO, |sum, record| saturating_add(sum, record.amount.value()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// Amounts are never negative, so overflow only happens upwards.
fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}
