//! Form state for the input views, and the coercion of raw text into
//! session actions. Anything that fails here never reaches the session.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::{booking::ConsultationRequest, expense::Amount};
use crate::store::{category::CategoryRegistry, session::Action};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Value is chosen from a list with Left/Right.
    Select,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl Field {
    fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            kind: FieldKind::Text,
        }
    }

    fn select(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            kind: FieldKind::Select,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl FormState {
    fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn focused(&self) -> &Field {
        &self.fields[self.focus]
    }

    pub fn focused_is_text(&self) -> bool {
        self.focused().kind == FieldKind::Text
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push_char(&mut self, c: char) {
        if self.focused_is_text() {
            self.fields[self.focus].value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.focused_is_text() {
            self.fields[self.focus].value.pop();
        }
    }

    pub fn value(&self, index: usize) -> &str {
        &self.fields[index].value
    }

    fn set(&mut self, index: usize, value: impl Into<String>) {
        self.fields[index].value = value.into();
    }

    /// Moves the focused select field to the next (or previous) option.
    pub fn cycle_select(&mut self, options: &[String], forward: bool) {
        let field = &mut self.fields[self.focus];
        if field.kind != FieldKind::Select || options.is_empty() {
            return;
        }
        let next = match options.iter().position(|o| *o == field.value) {
            Some(i) if forward => (i + 1) % options.len(),
            Some(i) => (i + options.len() - 1) % options.len(),
            None => 0,
        };
        field.value = options[next].clone();
    }

    /// Keeps a select field pointing at an existing option, falling back to the
    /// first one (or nothing when there are no options).
    fn sync_select(&mut self, index: usize, registry: &CategoryRegistry) {
        if !registry.contains(self.value(index)) {
            let fallback = registry.first().unwrap_or_default().to_string();
            self.set(index, fallback);
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let raw_trimmed = raw.trim();
    NaiveTime::parse_from_str(raw_trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw_trimmed, "%H:%M"))
        .map_err(|_| ValidationError::InvalidTime(raw.to_string()))
}

/// Blank input means zero. Values are rounded to cents; negatives are refused.
pub fn parse_amount(raw: &str) -> Result<Amount, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Amount::ZERO);
    }
    let value = Decimal::from_str(&trimmed.replace(',', "."))
        .map_err(|_| ValidationError::NonNumericAmount(raw.to_string()))?;
    Amount::new(value.round_dp(2))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub state: FormState,
}

impl ExpenseForm {
    pub const DATE: usize = 0;
    pub const CATEGORY: usize = 1;
    pub const DESCRIPTION: usize = 2;
    pub const AMOUNT: usize = 3;

    pub fn new(today: NaiveDate, categories: &CategoryRegistry) -> Self {
        Self {
            state: FormState::new(vec![
                Field::text("Date", today.format("%Y-%m-%d").to_string()),
                Field::select("Category", categories.first().unwrap_or_default()),
                Field::text("Description", ""),
                Field::text("Amount", "0.00"),
            ]),
        }
    }

    pub fn sync_categories(&mut self, categories: &CategoryRegistry) {
        self.state.sync_select(Self::CATEGORY, categories);
    }

    pub fn to_action(&self) -> Result<Action, ValidationError> {
        Ok(Action::AddExpense {
            date: parse_date(self.state.value(Self::DATE))?,
            category: self.state.value(Self::CATEGORY).to_string(),
            description: self.state.value(Self::DESCRIPTION).to_string(),
            amount: parse_amount(self.state.value(Self::AMOUNT))?,
        })
    }

    /// Clears the per-expense fields after a successful submit.
    pub fn clear_entry(&mut self) {
        self.state.set(Self::DESCRIPTION, "");
        self.state.set(Self::AMOUNT, "0.00");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    pub state: FormState,
}

impl CategoryForm {
    pub const NEW_CATEGORY: usize = 0;
    pub const DELETE: usize = 1;

    pub fn new(categories: &CategoryRegistry) -> Self {
        Self {
            state: FormState::new(vec![
                Field::text("Add New Category", ""),
                Field::select("Delete Category", categories.first().unwrap_or_default()),
            ]),
        }
    }

    pub fn sync_categories(&mut self, categories: &CategoryRegistry) {
        self.state.sync_select(Self::DELETE, categories);
    }

    pub fn add_action(&self) -> Action {
        Action::AddCategory(self.state.value(Self::NEW_CATEGORY).to_string())
    }

    /// `None` when there is nothing left to delete.
    pub fn remove_action(&self) -> Option<Action> {
        let selected = self.state.value(Self::DELETE);
        if selected.is_empty() {
            None
        } else {
            Some(Action::RemoveCategory(selected.to_string()))
        }
    }

    pub fn clear_new_category(&mut self) {
        self.state.set(Self::NEW_CATEGORY, "");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderForm {
    pub state: FormState,
}

impl ReminderForm {
    pub const TITLE: usize = 0;
    pub const DATE: usize = 1;
    pub const TIME: usize = 2;

    pub fn new(today: NaiveDate, now: NaiveTime) -> Self {
        Self {
            state: FormState::new(vec![
                Field::text("Reminder Title", ""),
                Field::text("Reminder Date", today.format("%Y-%m-%d").to_string()),
                Field::text("Reminder Time", now.format("%H:%M").to_string()),
            ]),
        }
    }

    /// The date may not lie before `today`.
    pub fn to_action(&self, today: NaiveDate) -> Result<Action, ValidationError> {
        let date = parse_date(self.state.value(Self::DATE))?;
        if date < today {
            return Err(ValidationError::DateInPast(date));
        }
        Ok(Action::AddReminder {
            title: self.state.value(Self::TITLE).to_string(),
            date,
            time: parse_time(self.state.value(Self::TIME))?,
        })
    }

    pub fn clear_title(&mut self) {
        self.state.set(Self::TITLE, "");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub state: FormState,
    default_date: NaiveDate,
    default_time: NaiveTime,
}

impl BookingForm {
    pub const NAME: usize = 0;
    pub const EMAIL: usize = 1;
    pub const DATE: usize = 2;
    pub const TIME: usize = 3;
    pub const NOTES: usize = 4;

    pub fn new(today: NaiveDate, now: NaiveTime) -> Self {
        Self {
            state: FormState::new(vec![
                Field::text("Your Name", ""),
                Field::text("Email", ""),
                Field::text("Preferred Date", today.format("%Y-%m-%d").to_string()),
                Field::text("Preferred Time", now.format("%H:%M").to_string()),
                Field::text("Additional Notes", ""),
            ]),
            default_date: today,
            default_time: now,
        }
    }

    /// Back to the form as first shown, including the default date and time.
    pub fn reset(&mut self) {
        *self = Self::new(self.default_date, self.default_time);
    }

    pub fn to_request(&self) -> Result<ConsultationRequest, ValidationError> {
        Ok(ConsultationRequest {
            name: self.state.value(Self::NAME).to_string(),
            email: self.state.value(Self::EMAIL).to_string(),
            date: parse_date(self.state.value(Self::DATE))?,
            time: parse_time(self.state.value(Self::TIME))?,
            notes: self.state.value(Self::NOTES).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    fn type_into(state: &mut FormState, index: usize, text: &str) {
        state.focus = index;
        state.fields[index].value.clear();
        for c in text.chars() {
            state.push_char(c);
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap().value(), Decimal::new(1250, 2));
        assert_eq!(parse_amount("  ").unwrap(), Amount::ZERO);
        assert_eq!(parse_amount("3,5").unwrap().value(), Decimal::new(35, 1));
        assert_eq!(parse_amount("1.005").unwrap().to_string(), "1.00");
        assert_eq!(parse_amount("-5"), Err(ValidationError::NegativeAmount));
        assert_eq!(parse_amount("1000000000000000").unwrap(), Amount::MAX);
        assert_eq!(
            parse_amount("ten"),
            Err(ValidationError::NonNumericAmount("ten".to_string()))
        );
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(parse_date("2025-01-01").unwrap(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(matches!(parse_date("01/01/2025"), Err(ValidationError::InvalidDate(_))));
        assert_eq!(parse_time("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse_time("09:30:15").unwrap(), NaiveTime::from_hms_opt(9, 30, 15).unwrap());
        assert!(matches!(parse_time("25:00"), Err(ValidationError::InvalidTime(_))));
    }

    #[test]
    fn test_negative_expense_never_becomes_an_action() {
        let mut form = ExpenseForm::new(today(), &CategoryRegistry::new());
        type_into(&mut form.state, ExpenseForm::AMOUNT, "-5");
        assert_eq!(form.to_action(), Err(ValidationError::NegativeAmount));
    }

    #[test]
    fn test_oversized_expense_never_becomes_an_action() {
        let mut form = ExpenseForm::new(today(), &CategoryRegistry::new());
        type_into(&mut form.state, ExpenseForm::AMOUNT, "1000000000000000000000000000");
        assert_eq!(
            form.to_action(),
            Err(ValidationError::AmountTooLarge { max: Amount::MAX.value() })
        );

        type_into(&mut form.state, ExpenseForm::AMOUNT, "79228162514264337593543950335");
        assert!(matches!(form.to_action(), Err(ValidationError::AmountTooLarge { .. })));
    }

    #[test]
    fn test_expense_form_builds_action() {
        let mut form = ExpenseForm::new(today(), &CategoryRegistry::new());
        type_into(&mut form.state, ExpenseForm::DESCRIPTION, "Lunch");
        type_into(&mut form.state, ExpenseForm::AMOUNT, "12.5");

        let action = form.to_action().unwrap();
        assert_eq!(
            action,
            Action::AddExpense {
                date: today(),
                category: "Food".into(),
                description: "Lunch".into(),
                amount: Amount::new(Decimal::new(125, 1)).unwrap(),
            }
        );
    }

    #[test]
    fn test_select_cycles_through_categories() {
        let registry = CategoryRegistry::new();
        let mut form = ExpenseForm::new(today(), &registry);
        form.state.focus = ExpenseForm::CATEGORY;

        form.state.cycle_select(registry.list(), true);
        assert_eq!(form.state.value(ExpenseForm::CATEGORY), "Transport");
        form.state.cycle_select(registry.list(), false);
        form.state.cycle_select(registry.list(), false);
        assert_eq!(form.state.value(ExpenseForm::CATEGORY), "Subscriptions");
    }

    #[test]
    fn test_typing_into_select_is_ignored() {
        let mut form = ExpenseForm::new(today(), &CategoryRegistry::new());
        form.state.focus = ExpenseForm::CATEGORY;
        form.state.push_char('x');
        form.state.pop_char();
        assert_eq!(form.state.value(ExpenseForm::CATEGORY), "Food");
    }

    #[test]
    fn test_removed_selection_falls_back_to_first() {
        let mut registry = CategoryRegistry::new();
        let mut form = ExpenseForm::new(today(), &registry);
        form.state.focus = ExpenseForm::CATEGORY;
        form.state.cycle_select(registry.list(), true);

        registry.remove("Transport");
        form.sync_categories(&registry);
        assert_eq!(form.state.value(ExpenseForm::CATEGORY), "Food");

        let mut empty = CategoryRegistry::empty();
        form.sync_categories(&empty);
        assert_eq!(form.state.value(ExpenseForm::CATEGORY), "");
        empty.add("Rent");
        form.sync_categories(&empty);
        assert_eq!(form.state.value(ExpenseForm::CATEGORY), "Rent");
    }

    #[test]
    fn test_category_form_actions() {
        let mut form = CategoryForm::new(&CategoryRegistry::new());
        type_into(&mut form.state, CategoryForm::NEW_CATEGORY, "Travel");
        assert_eq!(form.add_action(), Action::AddCategory("Travel".into()));
        assert_eq!(form.remove_action(), Some(Action::RemoveCategory("Food".into())));

        let form = CategoryForm::new(&CategoryRegistry::empty());
        assert_eq!(form.remove_action(), None);
    }

    #[test]
    fn test_reminder_in_past_is_rejected() {
        let mut form = ReminderForm::new(today(), noon());
        type_into(&mut form.state, ReminderForm::DATE, "2025-01-31");
        assert!(matches!(form.to_action(today()), Err(ValidationError::DateInPast(_))));

        type_into(&mut form.state, ReminderForm::DATE, "2025-02-01");
        assert!(form.to_action(today()).is_ok());
    }

    #[test]
    fn test_booking_form_coerces_date_and_time() {
        let mut form = BookingForm::new(today(), noon());
        type_into(&mut form.state, BookingForm::NAME, "Sam");
        type_into(&mut form.state, BookingForm::TIME, "14:15");
        let request = form.to_request().unwrap();
        assert_eq!(request.name, "Sam");
        assert_eq!(request.time, NaiveTime::from_hms_opt(14, 15, 0).unwrap());

        type_into(&mut form.state, BookingForm::DATE, "soon");
        assert!(form.to_request().is_err());
    }

    #[test]
    fn test_booking_reset_restores_default_time() {
        let mut form = BookingForm::new(today(), noon());
        type_into(&mut form.state, BookingForm::NAME, "Sam");
        type_into(&mut form.state, BookingForm::TIME, "14:15");

        form.reset();
        assert_eq!(form, BookingForm::new(today(), noon()));
        assert_eq!(form.state.value(BookingForm::TIME), "12:00");
        assert_eq!(form.state.value(BookingForm::NAME), "");
    }

    #[test]
    fn test_field_focus_wraps() {
        let mut form = BookingForm::new(today(), noon());
        form.state.previous_field();
        assert_eq!(form.state.focus, BookingForm::NOTES);
        form.state.next_field();
        assert_eq!(form.state.focus, BookingForm::NAME);
    }
}
