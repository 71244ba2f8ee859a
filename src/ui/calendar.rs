use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use thiserror::Error;

use crate::models::reminder::CalendarEvent;

/// Display granularity, named after the calendar widget views they mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarView {
    #[default]
    DayGridMonth,
    ListWeek,
}

#[derive(Debug, Error)]
#[error("unknown calendar view {0:?} (expected dayGridMonth or listWeek)")]
pub struct UnknownCalendarView(String);

impl FromStr for CalendarView {
    type Err = UnknownCalendarView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dayGridMonth" => Ok(CalendarView::DayGridMonth),
            "listWeek" => Ok(CalendarView::ListWeek),
            other => Err(UnknownCalendarView(other.to_string())),
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarView::DayGridMonth => write!(f, "dayGridMonth"),
            CalendarView::ListWeek => write!(f, "listWeek"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarOptions {
    pub initial_view: CalendarView,
}

/// What the calendar is currently showing. `anchor` is any day inside the
/// visible month or week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    pub view: CalendarView,
    pub anchor: NaiveDate,
}

impl CalendarState {
    pub fn new(options: CalendarOptions, today: NaiveDate) -> Self {
        Self {
            view: options.initial_view,
            anchor: today,
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            CalendarView::DayGridMonth => CalendarView::ListWeek,
            CalendarView::ListWeek => CalendarView::DayGridMonth,
        };
    }

    pub fn next_period(&mut self) {
        let next = match self.view {
            CalendarView::DayGridMonth => first_of_month(self.anchor).checked_add_months(Months::new(1)),
            CalendarView::ListWeek => self.anchor.checked_add_days(Days::new(7)),
        };
        if let Some(date) = next {
            self.anchor = date;
        }
    }

    pub fn previous_period(&mut self) {
        let previous = match self.view {
            CalendarView::DayGridMonth => first_of_month(self.anchor).checked_sub_months(Months::new(1)),
            CalendarView::ListWeek => self.anchor.checked_sub_days(Days::new(7)),
        };
        if let Some(date) = previous {
            self.anchor = date;
        }
    }

    pub fn title(&self) -> String {
        match self.view {
            CalendarView::DayGridMonth => self.anchor.format("%B %Y").to_string(),
            CalendarView::ListWeek => {
                let days = week_of(self.anchor);
                format!("{} - {}", days[0].format("%b %d"), days[6].format("%b %d, %Y"))
            }
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Weeks (Sunday first) covering the month of `anchor`. Cells outside the
/// month are `None`.
pub fn month_grid(anchor: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let first = first_of_month(anchor);
    let offset = first.weekday().num_days_from_sunday() as usize;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = offset;
    let mut day = first;
    while day.month() == first.month() {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    if slot != 0 {
        weeks.push(week);
    }
    weeks
}

/// The Sunday-to-Saturday week containing `anchor`.
pub fn week_of(anchor: NaiveDate) -> [NaiveDate; 7] {
    let sunday = anchor - Days::new(u64::from(anchor.weekday().num_days_from_sunday()));
    let mut days = [sunday; 7];
    for (i, slot) in days.iter_mut().enumerate() {
        *slot = sunday + Days::new(i as u64);
    }
    days
}

/// Events that start on `day`, ordered by start time.
pub fn events_on(events: &[CalendarEvent], day: NaiveDate) -> Vec<&CalendarEvent> {
    let mut found: Vec<&CalendarEvent> = events.iter().filter(|event| event.day() == day).collect();
    found.sort_by_key(|event| event.start);
    found
}
