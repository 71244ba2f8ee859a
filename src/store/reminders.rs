use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::models::reminder::{CalendarEvent, ReminderEntry};

#[derive(Debug, Clone, Default)]
pub struct ReminderList {
    entries: Vec<ReminderEntry>,
}

impl ReminderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends unconditionally; empty titles and repeats are kept.
    pub fn add(&mut self, title: impl Into<String>, date: NaiveDate, time: NaiveTime) -> &ReminderEntry {
        let entry = ReminderEntry {
            title: title.into(),
            date,
            time,
        };
        debug!(title = %entry.title, at = %entry.timestamp(), "reminder added");
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn all(&self) -> std::slice::Iter<'_, ReminderEntry> {
        self.entries.iter()
    }

    pub fn to_calendar_events(&self) -> Vec<CalendarEvent> {
        self.entries.iter().map(ReminderEntry::to_calendar_event).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
