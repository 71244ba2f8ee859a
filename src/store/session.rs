use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use crate::models::expense::Amount;
use crate::store::{category::CategoryRegistry, ledger::ExpenseLedger, reminders::ReminderList};

/// A form submission that changes session state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddExpense {
        date: NaiveDate,
        category: String,
        description: String,
        amount: Amount,
    },
    AddCategory(String),
    RemoveCategory(String),
    AddReminder {
        title: String,
        date: NaiveDate,
        time: NaiveTime,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Nothing changed: duplicate or blank category, or removal of an absent one.
    Ignored,
}

impl From<bool> for Outcome {
    fn from(changed: bool) -> Self {
        if changed { Outcome::Applied } else { Outcome::Ignored }
    }
}

/// Everything a session knows. Created fresh on start-up, never persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub categories: CategoryRegistry,
    pub ledger: ExpenseLedger,
    pub reminders: ReminderList,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::AddExpense { date, category, description, amount } => {
                self.ledger.add(date, category, description, amount);
                info!(records = self.ledger.len(), "expense added");
                Outcome::Applied
            }
            Action::AddCategory(name) => self.categories.add(&name).into(),
            Action::RemoveCategory(name) => self.categories.remove(&name).into(),
            Action::AddReminder { title, date, time } => {
                self.reminders.add(title, date, time);
                info!(reminders = self.reminders.len(), "reminder added");
                Outcome::Applied
            }
        }
    }
}
