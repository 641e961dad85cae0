use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::document::History;
use crate::heatmap::ViewMode;

/// Distinct years with at least one history entry, newest first.
pub fn available_years(history: &History) -> Vec<i32> {
    let years: BTreeSet<i32> = history.keys().map(|date| date.year()).collect();
    years.into_iter().rev().collect()
}

/// Which year the heatmap shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearNavigator {
    active_year: i32,
}

impl YearNavigator {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            active_year: today.year(),
        }
    }

    pub fn active_year(&self) -> i32 {
        self.active_year
    }

    /// Years for the selector: those in history plus the current one, which a
    /// file created on January 1st would not contain yet.
    pub fn year_choices(&self, history: &History, today: NaiveDate) -> Vec<i32> {
        let mut years = available_years(history);
        if !years.contains(&today.year()) {
            years.push(today.year());
            years.sort_unstable_by(|a, b| b.cmp(a));
        }
        years
    }

    pub fn select_year(&mut self, year: i32, today: NaiveDate) -> ViewMode {
        self.active_year = year;
        let mode = self.view_mode(today);
        debug!(year, ?mode, "year selected");
        mode
    }

    pub fn view_mode(&self, today: NaiveDate) -> ViewMode {
        ViewMode::for_year(self.active_year, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DayRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history(dates: &[NaiveDate]) -> History {
        dates
            .iter()
            .map(|date| (*date, DayRecord::default()))
            .collect()
    }

    #[test]
    fn years_are_distinct_and_descending() {
        let history = history(&[
            date(2022, 5, 1),
            date(2024, 1, 1),
            date(2022, 12, 31),
            date(2023, 7, 4),
        ]);
        assert_eq!(available_years(&history), vec![2024, 2023, 2022]);
        assert!(available_years(&History::new()).is_empty());
    }

    #[test]
    fn choices_always_offer_the_current_year() {
        let today = date(2025, 1, 1);
        let navigator = YearNavigator::new(today);
        let history = history(&[date(2024, 12, 31), date(2023, 3, 3)]);
        assert_eq!(navigator.year_choices(&history, today), vec![2025, 2024, 2023]);
    }

    #[test]
    fn selecting_switches_view_mode() {
        let today = date(2025, 8, 9);
        let mut navigator = YearNavigator::new(today);
        assert_eq!(navigator.view_mode(today), ViewMode::Trailing);
        assert_eq!(navigator.select_year(2023, today), ViewMode::FullYear(2023));
        assert_eq!(navigator.active_year(), 2023);
        assert_eq!(navigator.select_year(2025, today), ViewMode::Trailing);
    }
}
