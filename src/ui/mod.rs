pub mod app;
pub mod calendar;
pub mod forms;
pub mod render;
pub mod router;
