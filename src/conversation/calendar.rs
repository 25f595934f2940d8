use crate::conversation::keyboards::{Button, InlineKeyboard};
use chrono::{Datelike, Months, NaiveDate};

const IGNORE: &str = "cal_ignore";
const DAY_PREFIX: &str = "cal_day_";
const MONTH_PREFIX: &str = "cal_month_";

const MONTHS: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь", "Октябрь",
    "Ноябрь", "Декабрь",
];
const WEEKDAYS: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarAction {
    Day(NaiveDate),
    /// Show the month starting at this date.
    Month(NaiveDate),
    Ignore,
}

impl CalendarAction {
    pub fn parse(data: &str) -> Option<Self> {
        if data == IGNORE {
            return Some(CalendarAction::Ignore);
        }
        if let Some(day) = data.strip_prefix(DAY_PREFIX) {
            return NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .ok()
                .map(CalendarAction::Day);
        }
        if let Some(month) = data.strip_prefix(MONTH_PREFIX) {
            return NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
                .ok()
                .map(CalendarAction::Month);
        }
        None
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_token(first: NaiveDate) -> String {
    format!("{}{}", MONTH_PREFIX, first.format("%Y-%m"))
}

fn filler() -> Button {
    Button::new(" ", IGNORE)
}

/// Month grid, Monday first, with month navigation and a back row.
pub fn month_keyboard(month: NaiveDate) -> InlineKeyboard {
    let first = first_of_month(month);
    let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
    let previous = first.checked_sub_months(Months::new(1)).unwrap_or(first);
    let title = format!("{} {}", MONTHS[first.month0() as usize], first.year());

    let mut keyboard = InlineKeyboard::new()
        .row(vec![Button::new(title, IGNORE)])
        .row(WEEKDAYS.iter().map(|d| Button::new(*d, IGNORE)).collect());

    let mut cells: Vec<Button> = (0..first.weekday().num_days_from_monday())
        .map(|_| filler())
        .collect();
    let mut day = first;
    loop {
        cells.push(Button::new(
            day.day().to_string(),
            format!("{}{}", DAY_PREFIX, day.format("%Y-%m-%d")),
        ));
        match day.succ_opt() {
            Some(following) if following.month() == first.month() => day = following,
            _ => break,
        }
    }
    while cells.len() % 7 != 0 {
        cells.push(filler());
    }

    keyboard = keyboard.rows_of(cells, 7);
    keyboard
        .row(vec![
            Button::new("«", month_token(previous)),
            Button::new("»", month_token(next)),
        ])
        .with_back()
}
