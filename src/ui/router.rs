#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    AddExpense,
    BudgetSettings,
    AiSuggestions,
    RemindersCalendar,
    ConsultationBooking,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::AddExpense,
        View::BudgetSettings,
        View::AiSuggestions,
        View::RemindersCalendar,
        View::ConsultationBooking,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::AddExpense => "Add Expense",
            View::BudgetSettings => "Budget Settings",
            View::AiSuggestions => "AI Suggestions",
            View::RemindersCalendar => "Reminders & Calendar",
            View::ConsultationBooking => "Consultation Booking",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Dashboard => 0,
            View::AddExpense => 1,
            View::BudgetSettings => 2,
            View::AiSuggestions => 3,
            View::RemindersCalendar => 4,
            View::ConsultationBooking => 5,
        }
    }

    /// `'1'` to `'6'` in sidebar order.
    pub fn from_shortcut(c: char) -> Option<View> {
        let digit = c.to_digit(10)? as usize;
        digit.checked_sub(1).and_then(|i| View::ALL.get(i).copied())
    }
}

/// The single navigation selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRouter {
    current: View,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self {
            current: View::Dashboard,
        }
    }
}

impl ViewRouter {
    pub fn current(&self) -> View {
        self.current
    }

    /// Returns whether the view changed.
    pub fn select(&mut self, view: View) -> bool {
        let changed = self.current != view;
        self.current = view;
        changed
    }

    pub fn next(&mut self) -> bool {
        let i = (self.current.index() + 1) % View::ALL.len();
        self.select(View::ALL[i])
    }

    pub fn previous(&mut self) -> bool {
        let i = (self.current.index() + View::ALL.len() - 1) % View::ALL.len();
        self.select(View::ALL[i])
    }
}
