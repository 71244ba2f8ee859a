pub mod category;
pub mod ledger;
pub mod reminders;
pub mod session;
