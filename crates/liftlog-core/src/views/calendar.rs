// ABOUTME: Builds a month of calendar days, each with the workouts and photos dated that day.

use chrono::{Datelike, NaiveDate};

use crate::model::{Photo, Workout};
use crate::views::Dataset;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub workouts: Vec<Workout>,
    pub photos: Vec<Photo>,
}

impl CalendarDay {
    pub fn is_active(&self) -> bool {
        !self.workouts.is_empty() || !self.photos.is_empty()
    }
}

/// Every day of `month` (1-12) in `year`, or None for an invalid month.
pub fn calendar_month(dataset: &Dataset, year: i32, month: u32) -> Option<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| CalendarDay {
            date,
            workouts: dataset
                .workouts
                .iter()
                .filter(|w| w.date == date)
                .cloned()
                .collect(),
            photos: dataset
                .photos
                .iter()
                .filter(|p| p.date == date)
                .cloned()
                .collect(),
        })
        .collect();

    Some(days)
}
