use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEntry {
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// What the calendar widget consumes. `start == end`, reminders have no duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    #[serde(serialize_with = "serialize_instant")]
    pub start: NaiveDateTime,
    #[serde(serialize_with = "serialize_instant")]
    pub end: NaiveDateTime,
}

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn serialize_instant<S>(instant: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&instant.format(INSTANT_FORMAT))
}

impl ReminderEntry {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn to_calendar_event(&self) -> CalendarEvent {
        let instant = self.timestamp();
        CalendarEvent {
            title: self.title.clone(),
            start: instant,
            end: instant,
        }
    }

    pub fn to_list_item(&self) -> ListItem {
        ListItem::new(Line::from(vec![
            Span::styled(self.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                " - {} at {}",
                self.date.format("%Y-%m-%d"),
                self.time.format("%H:%M:%S")
            )),
        ]))
    }
}

impl CalendarEvent {
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}
