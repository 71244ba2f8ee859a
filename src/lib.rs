pub mod advisor;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

// Re-export commonly used items
pub use advisor::{Advisor, openai::OpenAiAdvisor};
pub use config::{AdvisorConfig, Config};
pub use error::{AdvisorError, ValidationError};
pub use models::{
    booking::ConsultationRequest,
    expense::{Amount, ExpenseRecord},
    reminder::{CalendarEvent, ReminderEntry},
};
pub use store::{
    category::CategoryRegistry,
    ledger::ExpenseLedger,
    reminders::ReminderList,
    session::{Action, Outcome, Session},
};
pub use ui::app::App;
pub use ui::router::{View, ViewRouter};
