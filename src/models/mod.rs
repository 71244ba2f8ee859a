pub mod booking;
pub mod expense;
pub mod reminder;
