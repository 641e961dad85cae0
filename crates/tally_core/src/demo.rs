use chrono::{Datelike, NaiveDate};

use crate::document::{DayRecord, DaySummary, Document};

pub const SAMPLE_TASK: &str = "Sample task";
const SAMPLE_TOTAL: u32 = 5;

/// Document with one task and a committed day for every date from January
/// 1st of `first_year` through `today`, cycling 0..=4 out of 5 completed
/// within each year.
pub fn sample_document(first_year: i32, today: NaiveDate) -> Document {
    let mut document = Document {
        tasks: vec![SAMPLE_TASK.to_string()],
        ..Document::default()
    };
    let Some(start) = NaiveDate::from_ymd_opt(first_year, 1, 1) else {
        return document;
    };

    for date in start.iter_days().take_while(|date| *date <= today) {
        let completed = date.ordinal0() % SAMPLE_TOTAL;
        document.history.insert(
            date,
            DayRecord::Summary(DaySummary {
                completed,
                total: SAMPLE_TOTAL,
            }),
        );
    }
    document
}
