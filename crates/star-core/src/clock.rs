//! Local wall-clock helpers for the `fecha` / `hora` fields

use chrono::{Local, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current local time as `HH:MM`
pub fn current_time() -> String {
    Local::now().format("%H:%M").to_string()
}
