use std::cell::Cell;
use std::rc::Rc;

use chrono::{Local, NaiveDate};

/// Source of "today". Queried on every operation that depends on the date so
/// that a running session notices midnight.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock. Clones share the same date, so a test can hand one clone
/// to the service and keep another to move time forward.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Rc<Cell<NaiveDate>>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Rc::new(Cell::new(date)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        self.date.set(date);
    }

    pub fn advance_days(&self, days: i64) {
        let next = self.date.get() + chrono::Duration::days(days);
        self.date.set(next);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date.get()
    }
}
