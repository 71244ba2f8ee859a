use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;
use tracing::{info, warn};

use crate::advisor::Advisor;
use crate::error::AdvisorError;
use crate::models::booking::ConsultationRequest;
use crate::store::session::{Action, Outcome, Session};
use crate::ui::calendar::{CalendarOptions, CalendarState};
use crate::ui::forms::{BookingForm, CategoryForm, ExpenseForm, FormState, ReminderForm};
use crate::ui::router::{View, ViewRouter};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum StatusKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, PartialEq, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Result of the last AI request, shown only while the AI view stays open.
#[derive(Debug, PartialEq, Clone)]
pub enum Suggestion {
    Pending,
    Ready(String),
    Failed(String),
}

pub struct App {
    pub session: Session,
    pub router: ViewRouter,
    pub input_mode: InputMode,
    pub expense_form: ExpenseForm,
    pub category_form: CategoryForm,
    pub reminder_form: ReminderForm,
    pub booking_form: BookingForm,
    pub calendar: CalendarState,
    pub suggestion: Option<Suggestion>,
    pub status: Option<StatusMessage>,
    pub list_state: ListState,
    pub today: NaiveDate,
    pub quit: bool,
    advisor: Box<dyn Advisor>,
    advisor_timeout: Duration,
}

impl App {
    pub fn new(
        advisor: Box<dyn Advisor>,
        advisor_timeout: Duration,
        calendar: CalendarOptions,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Self {
        let session = Session::new();
        let mut app = App {
            expense_form: ExpenseForm::new(today, &session.categories),
            category_form: CategoryForm::new(&session.categories),
            reminder_form: ReminderForm::new(today, now),
            booking_form: BookingForm::new(today, now),
            calendar: CalendarState::new(calendar, today),
            session,
            router: ViewRouter::default(),
            input_mode: InputMode::Normal,
            suggestion: None,
            status: None,
            list_state: ListState::default(),
            today,
            quit: false,
            advisor,
            advisor_timeout,
        };
        app.show_view_notice();
        app
    }

    /// Runs an action through the session and keeps every category selector
    /// pointing at a category that still exists.
    pub fn apply(&mut self, action: Action) -> Outcome {
        let outcome = self.session.apply(action);
        self.expense_form.sync_categories(&self.session.categories);
        self.category_form.sync_categories(&self.session.categories);
        outcome
    }

    pub fn has_pending_request(&self) -> bool {
        matches!(self.suggestion, Some(Suggestion::Pending))
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key.code),
            InputMode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_editing_key(&mut self, code: KeyCode) {
        let Some(form) = self.active_form_mut() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        match code {
            KeyCode::Char(c) => form.push_char(c),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Enter => {
                form.next_field();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => {
                self.quit = true;
                return;
            }
            KeyCode::Tab => {
                self.navigate(|router| router.next());
                return;
            }
            KeyCode::BackTab => {
                self.navigate(|router| router.previous());
                return;
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(view) = View::from_shortcut(c) {
                    self.navigate(|router| router.select(view));
                }
                return;
            }
            _ => {}
        }

        match self.router.current() {
            View::Dashboard => match code {
                KeyCode::Down => self.next(),
                KeyCode::Up => self.previous(),
                _ => {}
            },
            View::AiSuggestions => {
                if code == KeyCode::Char('g') {
                    self.request_suggestions();
                }
            }
            view => self.handle_form_key(view, code),
        }
    }

    fn handle_form_key(&mut self, view: View, code: KeyCode) {
        match (view, code) {
            (_, KeyCode::Up) => self.with_active_form(FormState::previous_field),
            (_, KeyCode::Down) => self.with_active_form(FormState::next_field),
            (_, KeyCode::Left | KeyCode::Right) => {
                let forward = code == KeyCode::Right;
                let options = self.session.categories.list().to_vec();
                self.with_active_form(|form| form.cycle_select(&options, forward));
            }
            (_, KeyCode::Enter) => {
                if self.active_form_mut().is_some_and(|form| form.focused_is_text()) {
                    self.input_mode = InputMode::Editing;
                }
            }
            (View::AddExpense, KeyCode::Char('s')) => self.submit_expense(),
            (View::BudgetSettings, KeyCode::Char('a')) => self.add_category(),
            (View::BudgetSettings, KeyCode::Char('x')) => self.remove_category(),
            (View::RemindersCalendar, KeyCode::Char('s')) => self.submit_reminder(),
            (View::RemindersCalendar, KeyCode::Char('v')) => self.calendar.toggle_view(),
            (View::RemindersCalendar, KeyCode::Char(']')) => self.calendar.next_period(),
            (View::RemindersCalendar, KeyCode::Char('[')) => self.calendar.previous_period(),
            (View::ConsultationBooking, KeyCode::Char('s')) => self.submit_booking(),
            _ => {}
        }
    }

    fn navigate(&mut self, change: impl FnOnce(&mut ViewRouter) -> bool) {
        if change(&mut self.router) {
            self.status = None;
            self.suggestion = None;
            self.input_mode = InputMode::Normal;
            info!(view = self.router.current().title(), "view selected");
            self.show_view_notice();
        }
    }

    fn show_view_notice(&mut self) {
        if self.router.current() == View::Dashboard && self.session.ledger.is_empty() {
            self.set_status(StatusKind::Info, "No expenses recorded yet.");
        }
    }

    pub fn active_form_mut(&mut self) -> Option<&mut FormState> {
        match self.router.current() {
            View::AddExpense => Some(&mut self.expense_form.state),
            View::BudgetSettings => Some(&mut self.category_form.state),
            View::RemindersCalendar => Some(&mut self.reminder_form.state),
            View::ConsultationBooking => Some(&mut self.booking_form.state),
            View::Dashboard | View::AiSuggestions => None,
        }
    }

    fn with_active_form(&mut self, f: impl FnOnce(&mut FormState)) {
        if let Some(form) = self.active_form_mut() {
            f(form);
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    pub fn submit_expense(&mut self) {
        match self.expense_form.to_action() {
            Ok(action) => {
                self.apply(action);
                self.expense_form.clear_entry();
                self.set_status(StatusKind::Success, "Expense added!");
            }
            Err(e) => self.set_status(StatusKind::Error, e.to_string()),
        }
    }

    pub fn add_category(&mut self) {
        let action = self.category_form.add_action();
        if self.apply(action) == Outcome::Applied {
            self.category_form.clear_new_category();
        }
    }

    pub fn remove_category(&mut self) {
        if let Some(action) = self.category_form.remove_action() {
            self.apply(action);
        }
    }

    pub fn submit_reminder(&mut self) {
        match self.reminder_form.to_action(self.today) {
            Ok(action) => {
                self.apply(action);
                self.reminder_form.clear_title();
                self.set_status(StatusKind::Success, "Reminder added!");
            }
            Err(e) => self.set_status(StatusKind::Error, e.to_string()),
        }
    }

    pub fn submit_booking(&mut self) {
        match self.booking_form.to_request() {
            Ok(request) => {
                info!(
                    name = %request.name,
                    email = %request.email,
                    date = %request.date,
                    time = %request.time,
                    "consultation requested"
                );
                self.booking_form.reset();
                self.set_status(StatusKind::Success, ConsultationRequest::CONFIRMATION);
            }
            Err(e) => self.set_status(StatusKind::Error, e.to_string()),
        }
    }

    /// Marks a request as pending; the caller draws a frame and then awaits
    /// [`App::resolve_suggestion`].
    pub fn request_suggestions(&mut self) {
        if self.session.ledger.is_empty() {
            self.set_status(StatusKind::Warning, "Add some expenses first to get insights.");
            return;
        }
        self.status = None;
        self.suggestion = Some(Suggestion::Pending);
    }

    pub async fn resolve_suggestion(&mut self) {
        if !self.has_pending_request() {
            return;
        }

        let records = self.session.ledger.as_slice();
        let result = match tokio::time::timeout(self.advisor_timeout, self.advisor.suggest(records)).await {
            Ok(result) => result,
            Err(_) => Err(AdvisorError::Timeout(self.advisor_timeout)),
        };

        self.suggestion = Some(match result {
            Ok(text) => {
                info!(chars = text.len(), "AI suggestions received");
                Suggestion::Ready(text)
            }
            Err(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "AI suggestions failed");
                Suggestion::Failed(format!("Error: {e}"))
            }
        });
    }

    pub fn next(&mut self) {
        let len = self.session.ledger.len();
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.session.ledger.len();
        let i = match self.list_state.selected() {
            Some(0) | None => len.saturating_sub(1),
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::ExpenseRecord;
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingAdvisor;

    #[async_trait]
    impl Advisor for FailingAdvisor {
        async fn suggest(&self, _records: &[ExpenseRecord]) -> Result<String, AdvisorError> {
            Err(AdvisorError::Transport("connection refused".into()))
        }
    }

    struct SlowAdvisor;

    #[async_trait]
    impl Advisor for SlowAdvisor {
        async fn suggest(&self, _records: &[ExpenseRecord]) -> Result<String, AdvisorError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".into())
        }
    }

    struct CountingAdvisor {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Advisor for CountingAdvisor {
        async fn suggest(&self, records: &[ExpenseRecord]) -> Result<String, AdvisorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("You logged {} expenses.", records.len()))
        }
    }

    fn app_with(advisor: Box<dyn Advisor>, timeout: Duration) -> App {
        App::new(
            advisor,
            timeout,
            CalendarOptions::default(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        press(app, KeyCode::Enter);
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    fn add_expense_via_keys(app: &mut App, description: &str, amount: &str) {
        press(app, KeyCode::Char('2'));
        app.expense_form.state.focus = ExpenseForm::DESCRIPTION;
        type_text(app, description);
        // focus moved to Amount; clear the default before typing
        app.expense_form.state.fields[ExpenseForm::AMOUNT].value.clear();
        type_text(app, amount);
        press(app, KeyCode::Char('s'));
    }

    #[test]
    fn test_digits_switch_views_and_q_quits() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.router.current(), View::BudgetSettings);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.router.current(), View::AiSuggestions);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }

    #[test]
    fn test_add_expense_through_keys() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        add_expense_via_keys(&mut app, "Lunch", "12.50");

        assert_eq!(app.session.ledger.len(), 1);
        let record = app.session.ledger.all().next().unwrap();
        assert_eq!(record.category, "Food");
        assert_eq!(record.description, "Lunch");
        assert_eq!(record.amount.to_string(), "12.50");
        assert_eq!(app.status.as_ref().map(|s| s.text.as_str()), Some("Expense added!"));
    }

    #[test]
    fn test_negative_amount_is_reported_not_recorded() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        add_expense_via_keys(&mut app, "Refund", "-5");

        assert!(app.session.ledger.is_empty());
        let status = app.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Amount cannot be negative");
    }

    #[test]
    fn test_q_while_editing_is_text() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        press(&mut app, KeyCode::Char('3'));
        type_text(&mut app, "quiz");
        assert!(!app.quit);
        assert_eq!(app.category_form.state.value(CategoryForm::NEW_CATEGORY), "quiz");
    }

    #[test]
    fn test_removing_selected_category_reselects_first() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        press(&mut app, KeyCode::Char('2'));
        app.expense_form.state.focus = ExpenseForm::CATEGORY;
        press(&mut app, KeyCode::Right);
        assert_eq!(app.expense_form.state.value(ExpenseForm::CATEGORY), "Transport");

        press(&mut app, KeyCode::Char('3'));
        app.category_form.state.focus = CategoryForm::DELETE;
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('x'));

        assert_eq!(app.session.categories.list(), ["Food", "Utilities", "Subscriptions"]);
        assert_eq!(app.expense_form.state.value(ExpenseForm::CATEGORY), "Food");
        assert_eq!(app.category_form.state.value(CategoryForm::DELETE), "Food");
    }

    #[test]
    fn test_add_category_through_keys() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        press(&mut app, KeyCode::Char('3'));
        type_text(&mut app, "Travel");
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.session.categories.list().last().map(String::as_str), Some("Travel"));
        assert_eq!(app.category_form.state.value(CategoryForm::NEW_CATEGORY), "");

        app.category_form.state.focus = CategoryForm::NEW_CATEGORY;
        type_text(&mut app, "Food");
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.session.categories.len(), 5);
    }

    #[test]
    fn test_ai_requires_expenses() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = app_with(Box::new(CountingAdvisor { calls: calls.clone() }), Duration::from_secs(1));
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('g'));
        assert!(!app.has_pending_request());
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Warning));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ai_success_is_shown_and_discarded_on_leave() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = app_with(Box::new(CountingAdvisor { calls: calls.clone() }), Duration::from_secs(1));
        add_expense_via_keys(&mut app, "Lunch", "12.50");

        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('g'));
        assert!(app.has_pending_request());
        app.resolve_suggestion().await;

        assert_eq!(app.suggestion, Some(Suggestion::Ready("You logged 1 expenses.".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.suggestion, None);
    }

    #[tokio::test]
    async fn test_ai_transport_error_leaves_state_unchanged() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        add_expense_via_keys(&mut app, "Lunch", "12.50");
        let categories_before = app.session.categories.clone();

        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('g'));
        app.resolve_suggestion().await;

        match &app.suggestion {
            Some(Suggestion::Failed(message)) => assert!(message.starts_with("Error: transport error")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(app.session.ledger.len(), 1);
        assert_eq!(app.session.categories, categories_before);
        assert!(app.session.reminders.is_empty());
    }

    #[tokio::test]
    async fn test_ai_timeout_is_distinct() {
        let mut app = app_with(Box::new(SlowAdvisor), Duration::from_millis(20));
        add_expense_via_keys(&mut app, "Lunch", "1");

        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('g'));
        app.resolve_suggestion().await;

        match &app.suggestion {
            Some(Suggestion::Failed(message)) => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_reminder_and_calendar_keys() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        press(&mut app, KeyCode::Char('5'));
        type_text(&mut app, "Pay card");
        press(&mut app, KeyCode::Char('s'));

        assert_eq!(app.session.reminders.len(), 1);
        assert_eq!(app.status.as_ref().map(|s| s.text.as_str()), Some("Reminder added!"));

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.calendar.anchor, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.calendar.view, crate::ui::calendar::CalendarView::ListWeek);
    }

    #[test]
    fn test_booking_confirms_without_touching_session() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        press(&mut app, KeyCode::Char('6'));
        type_text(&mut app, "Sam");
        app.booking_form.state.fields[BookingForm::TIME].value = "14:15".into();
        press(&mut app, KeyCode::Char('s'));

        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some(ConsultationRequest::CONFIRMATION)
        );
        assert!(app.session.ledger.is_empty());
        assert!(app.session.reminders.is_empty());
        assert_eq!(app.booking_form.state.value(BookingForm::NAME), "");
        assert_eq!(app.booking_form.state.value(BookingForm::TIME), "12:00");
    }

    #[test]
    fn test_empty_dashboard_shows_info_notice() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        let status = app.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        assert_eq!(status.text, "No expenses recorded yet.");

        press(&mut app, KeyCode::Char('3'));
        assert!(app.status.is_none());

        add_expense_via_keys(&mut app, "Lunch", "12.50");
        press(&mut app, KeyCode::Char('1'));
        assert!(app.status.is_none());
    }

    #[test]
    fn test_dashboard_navigation_wraps() {
        let mut app = app_with(Box::new(FailingAdvisor), Duration::from_secs(1));
        add_expense_via_keys(&mut app, "a", "1");
        add_expense_via_keys(&mut app, "b", "2");
        press(&mut app, KeyCode::Char('1'));

        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(0));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(1));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(0));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.list_state.selected(), Some(1));
    }
}
