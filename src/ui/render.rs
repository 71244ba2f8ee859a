use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use super::app::{App, InputMode, StatusKind, Suggestion};
use super::calendar::{self, CalendarView};
use super::forms::{FieldKind, FormState};
use super::router::View;
use crate::models::reminder::CalendarEvent;

const TITLE: &str = "💸 Smart Finance Manager + AI Budget Chatbot";
const FOOTER: &str = "© 2025 Smart Finance Manager";

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(size);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)))),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(40)])
        .split(rows[1]);

    render_sidebar(f, app, columns[0]);

    match app.router.current() {
        View::Dashboard => render_dashboard(f, app, columns[1]),
        View::AddExpense => render_add_expense(f, app, columns[1]),
        View::BudgetSettings => render_budget_settings(f, app, columns[1]),
        View::AiSuggestions => render_ai_suggestions(f, app, columns[1]),
        View::RemindersCalendar => render_reminders(f, app, columns[1]),
        View::ConsultationBooking => render_booking(f, app, columns[1]),
    }

    render_status(f, app, rows[2]);
    render_help_panel(f, app, rows[3]);
    f.render_widget(
        Paragraph::new(FOOTER)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        rows[4],
    );

    if app.input_mode == InputMode::Editing {
        render_input_prompt(f, app, size);
    }
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let current = app.router.current();
    let items: Vec<ListItem> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let marker = if *view == current { "(•)" } else { "( )" };
            let style = if *view == current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("{} {} {}", i + 1, marker, view.title()),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(Block::default().title("Navigation").borders(Borders::ALL));
    f.render_widget(list, area);
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let ledger = &app.session.ledger;
    let block = Block::default().title("Expense Overview").borders(Borders::ALL);

    // The empty-ledger notice is shown in the status banner.
    if ledger.is_empty() {
        f.render_widget(block, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let items: Vec<ListItem> = ledger
        .sorted_by_date_descending()
        .into_iter()
        .map(|record| record.to_list_item())
        .collect();

    let header = format!(
        "Expense Overview ({} recorded) Total: {:.2}",
        ledger.len(),
        ledger.total()
    );

    let list = List::new(items)
        .block(Block::default().title(header).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED).add_modifier(Modifier::BOLD))
        .highlight_symbol("➤ ");

    f.render_stateful_widget(list, chunks[0], &mut app.list_state.clone());

    render_category_chart(f, app, chunks[1]);
}

fn render_category_chart(f: &mut Frame, app: &App, area: Rect) {
    let totals = app.session.ledger.totals_by_category();
    let bars: Vec<Bar> = totals
        .iter()
        .map(|(category, total)| {
            let cents = bar_value(*total);
            Bar::default()
                .label(Line::from(category.clone()))
                .value(cents)
                .text_value(format!("{:.2}", total))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title("Spending by Category").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));

    f.render_widget(chart, area);
}

/// Bar height in cents, pinned to `u64::MAX` for totals that do not fit.
fn bar_value(total: Decimal) -> u64 {
    total
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.trunc().to_u64())
        .unwrap_or(u64::MAX)
}

fn form_lines<'a>(form: &'a FormState, editing: bool) -> Vec<Line<'a>> {
    form.fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let value = match field.kind {
                FieldKind::Select => format!("◀ {} ▶", field.value),
                FieldKind::Text if focused && editing => format!("{}_", field.value),
                FieldKind::Text => field.value.clone(),
            };
            Line::from(vec![
                Span::styled(if focused { "➤ " } else { "  " }, label_style),
                Span::styled(format!("{:<18}", field.label), label_style),
                Span::raw(value),
            ])
        })
        .collect()
}

fn render_form(f: &mut Frame, title: &str, form: &FormState, editing: bool, area: Rect) {
    let paragraph = Paragraph::new(form_lines(form, editing))
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_add_expense(f: &mut Frame, app: &App, area: Rect) {
    render_form(
        f,
        "Add a New Expense",
        &app.expense_form.state,
        app.input_mode == InputMode::Editing,
        area,
    );
}

fn render_budget_settings(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    render_form(
        f,
        "Customize Budget Categories",
        &app.category_form.state,
        app.input_mode == InputMode::Editing,
        chunks[0],
    );

    let current = Paragraph::new(format!(
        "Current Categories: {}",
        app.session.categories.list().join(", ")
    ))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(current, chunks[1]);
}

fn render_ai_suggestions(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("AI Financial Insights").borders(Borders::ALL);

    if app.session.ledger.is_empty() {
        let warning = Paragraph::new(Line::from(Span::styled(
            "Add some expenses first to get insights.",
            Style::default().fg(Color::Yellow),
        )))
        .block(block);
        f.render_widget(warning, area);
        return;
    }

    let body = match &app.suggestion {
        None => Paragraph::new(Line::from(vec![
            Span::raw("Press "),
            Span::styled("g", Style::default().fg(Color::Yellow)),
            Span::raw(format!(" to analyze {} expenses with AI.", app.session.ledger.len())),
        ])),
        Some(Suggestion::Pending) => Paragraph::new("Analyzing with AI...").style(Style::default().fg(Color::Cyan)),
        Some(Suggestion::Ready(text)) => Paragraph::new(text.as_str()),
        Some(Suggestion::Failed(message)) => {
            Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red))
        }
    };

    f.render_widget(body.wrap(Wrap { trim: false }).block(block), area);
}

fn render_reminders(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(columns[0]);

    render_form(
        f,
        "Set Financial Reminders",
        &app.reminder_form.state,
        app.input_mode == InputMode::Editing,
        left[0],
    );

    let items: Vec<ListItem> = app.session.reminders.all().map(|r| r.to_list_item()).collect();
    let list = List::new(items).block(Block::default().title("Upcoming Reminders").borders(Borders::ALL));
    f.render_widget(list, left[1]);

    let events = app.session.reminders.to_calendar_events();
    render_calendar(f, app, &events, columns[1]);
}

fn render_calendar(f: &mut Frame, app: &App, events: &[CalendarEvent], area: Rect) {
    let state = &app.calendar;
    let mut lines: Vec<Line> = Vec::new();

    match state.view {
        CalendarView::DayGridMonth => {
            lines.push(Line::from(Span::styled(
                " Su  Mo  Tu  We  Th  Fr  Sa",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for week in calendar::month_grid(state.anchor) {
                let spans: Vec<Span> = week
                    .iter()
                    .map(|cell| match cell {
                        Some(day) if !calendar::events_on(events, *day).is_empty() => Span::styled(
                            format!("{:>3}*", day.day()),
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                        ),
                        Some(day) if *day == app.today => Span::styled(
                            format!("{:>3} ", day.day()),
                            Style::default().add_modifier(Modifier::REVERSED),
                        ),
                        Some(day) => Span::raw(format!("{:>3} ", day.day())),
                        None => Span::raw("    "),
                    })
                    .collect();
                lines.push(Line::from(spans));
            }
            lines.push(Line::from(""));
            for event in events
                .iter()
                .filter(|e| e.start.year() == state.anchor.year() && e.start.month() == state.anchor.month())
            {
                lines.push(Line::from(format!("{} {}", event.start.format("%d %H:%M"), event.title)));
            }
        }
        CalendarView::ListWeek => {
            for day in calendar::week_of(state.anchor) {
                lines.push(Line::from(Span::styled(
                    day.format("%a %b %d").to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for event in calendar::events_on(events, day) {
                    lines.push(Line::from(format!("  {} {}", event.start.format("%H:%M"), event.title)));
                }
            }
        }
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(format!("{} ({})", state.title(), state.view))
            .borders(Borders::ALL),
    );
    f.render_widget(paragraph, area);
}

fn render_booking(f: &mut Frame, app: &App, area: Rect) {
    render_form(
        f,
        "Book a Financial Consultation",
        &app.booking_form.state,
        app.input_mode == InputMode::Editing,
        area,
    );
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.status else {
        f.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    };

    let color = match status.kind {
        StatusKind::Success => Color::Green,
        StatusKind::Info => Color::Cyan,
        StatusKind::Warning => Color::Yellow,
        StatusKind::Error => Color::Red,
    };

    let paragraph = Paragraph::new(status.text.as_str())
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
    f.render_widget(paragraph, area);
}

fn key(label: &str) -> Span<'_> {
    Span::styled(label, Style::default().fg(Color::Yellow))
}

pub fn render_help_panel(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![key("1-6/Tab"), Span::raw(" View • ")];

    match app.router.current() {
        View::Dashboard => spans.extend([key("↑/↓"), Span::raw(" Move • ")]),
        View::AiSuggestions => spans.extend([key("g"), Span::raw(" Get AI Suggestions • ")]),
        view => {
            spans.extend([
                key("↑/↓"),
                Span::raw(" Field • "),
                key("Enter"),
                Span::raw(" Edit • "),
                key("←/→"),
                Span::raw(" Choose • "),
            ]);
            match view {
                View::BudgetSettings => spans.extend([
                    key("a"),
                    Span::raw(" Add Category • "),
                    key("x"),
                    Span::raw(" Delete Selected • "),
                ]),
                View::RemindersCalendar => spans.extend([
                    key("s"),
                    Span::raw(" Add Reminder • "),
                    key("v"),
                    Span::raw(" Calendar View • "),
                    key("[/]"),
                    Span::raw(" Page • "),
                ]),
                View::ConsultationBooking => spans.extend([key("s"), Span::raw(" Book Appointment • ")]),
                _ => spans.extend([key("s"), Span::raw(" Add • ")]),
            }
        }
    }
    spans.extend([key("q"), Span::raw(" Quit")]);

    let help = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Help "),
        )
        .alignment(Alignment::Center);

    f.render_widget(help, area);
}

pub fn render_input_prompt(f: &mut Frame, app: &App, area: Rect) {
    let form = match app.router.current() {
        View::AddExpense => &app.expense_form.state,
        View::BudgetSettings => &app.category_form.state,
        View::RemindersCalendar => &app.reminder_form.state,
        View::ConsultationBooking => &app.booking_form.state,
        View::Dashboard | View::AiSuggestions => return,
    };
    let field = form.focused();

    let input = Paragraph::new(if field.value.is_empty() {
        Line::from(format!("Enter {}...", field.label.to_lowercase())).style(Style::default().fg(Color::DarkGray))
    } else {
        Line::from(field.value.as_str())
    })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} (Enter to apply, Esc to close)", field.label))
            .border_style(Style::default().fg(Color::Yellow)),
    );

    let popup_area = centered_rect(60, 10, area);
    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::Advisor;
    use crate::error::AdvisorError;
    use crate::models::expense::{Amount, ExpenseRecord};
    use crate::store::session::Action;
    use crate::ui::calendar::CalendarOptions;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    struct SilentAdvisor;

    #[async_trait]
    impl Advisor for SilentAdvisor {
        async fn suggest(&self, _records: &[ExpenseRecord]) -> Result<String, AdvisorError> {
            Ok(String::new())
        }
    }

    fn app() -> App {
        App::new(
            Box::new(SilentAdvisor),
            Duration::from_secs(1),
            CalendarOptions::default(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_bar_value_in_cents() {
        assert_eq!(bar_value(Decimal::new(1250, 2)), 1250);
        assert_eq!(bar_value(Decimal::ZERO), 0);
    }

    #[test]
    fn test_bar_value_pins_oversized_totals() {
        assert_eq!(bar_value(Decimal::MAX), u64::MAX);
        assert_eq!(bar_value(Decimal::from(u64::MAX)), u64::MAX);
    }

    #[test]
    fn test_dashboard_draws_largest_amounts() {
        let mut app = app();
        let today = app.today;
        for category in ["Food", "Food", "Rent"] {
            app.apply(Action::AddExpense {
                date: today,
                category: category.to_string(),
                description: "big".to_string(),
                amount: Amount::MAX,
            });
        }

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
    }
}
