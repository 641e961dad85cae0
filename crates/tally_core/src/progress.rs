use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::info;

use crate::document::{DayRecord, DaySummary, Document};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskState {
    pub name: String,
    pub done: bool,
}

/// Checkbox state for the tracked day. Toggles live in memory until
/// [`DailyProgress::commit`] folds them into a summary.
#[derive(Debug, Clone)]
pub struct DailyProgress {
    today: NaiveDate,
    flags: BTreeMap<String, bool>,
}

impl DailyProgress {
    /// Starts tracking `today`, picking up any flags already recorded for it.
    pub fn start(today: NaiveDate, document: &Document) -> Self {
        let flags = document
            .record(today)
            .and_then(DayRecord::flags)
            .map(|recorded| {
                recorded
                    .iter()
                    .filter(|(task, _)| document.tasks.contains(*task))
                    .map(|(task, flag)| (task.clone(), *flag == 1))
                    .collect()
            })
            .unwrap_or_default();
        Self { today, flags }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_done(&self, task: &str) -> bool {
        self.flags.get(task).copied().unwrap_or(false)
    }

    /// Flags for every task in list order; unrecorded tasks are not done.
    pub fn today_state(&self, tasks: &[String]) -> Vec<TaskState> {
        tasks
            .iter()
            .map(|task| TaskState {
                name: task.clone(),
                done: self.is_done(task),
            })
            .collect()
    }

    pub fn toggle(&mut self, task: &str) -> bool {
        let done = !self.is_done(task);
        self.flags.insert(task.to_string(), done);
        done
    }

    pub fn set_done(&mut self, task: &str, done: bool) {
        self.flags.insert(task.to_string(), done);
    }

    pub fn forget(&mut self, task: &str) {
        self.flags.remove(task);
    }

    pub fn summary(&self, tasks: &[String]) -> DaySummary {
        let completed = tasks.iter().filter(|task| self.is_done(task)).count();
        DaySummary {
            completed: completed as u32,
            total: tasks.len() as u32,
        }
    }

    /// Replaces the tracked day's record with its summary. The per-task
    /// detail is not kept.
    pub fn commit(&self, document: &mut Document) -> DaySummary {
        let summary = self.summary(&document.tasks);
        document
            .history
            .insert(self.today, DayRecord::Summary(summary));
        info!(
            date = %self.today,
            completed = summary.completed,
            total = summary.total,
            "day committed"
        );
        summary
    }

    /// Moves to `system_date` if it differs from the tracked day. The new day
    /// starts with every task unchecked; a summary already stored for it is
    /// kept. Returns whether anything changed.
    pub fn rollover(&mut self, system_date: NaiveDate, document: &mut Document) -> bool {
        if system_date == self.today {
            return false;
        }
        let previous = self.today;
        self.today = system_date;
        self.flags.clear();

        let record = document.history.entry(system_date).or_default();
        if let DayRecord::Flags(flags) = record {
            flags.clear();
            for task in &document.tasks {
                flags.insert(task.clone(), 0);
            }
        }
        info!(from = %previous, to = %system_date, "date rolled over");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::add_task;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn doc_with(tasks: &[&str]) -> Document {
        let mut doc = Document::default();
        for task in tasks {
            add_task(&mut doc, task);
        }
        doc
    }

    #[test]
    fn starts_from_recorded_flags() {
        let mut doc = doc_with(&["Read", "Run"]);
        doc.history.insert(
            date(3),
            DayRecord::Flags(BTreeMap::from([("Read".into(), 1), ("Gone".into(), 1)])),
        );
        let progress = DailyProgress::start(date(3), &doc);
        let state = progress.today_state(&doc.tasks);
        assert_eq!(
            state,
            vec![
                TaskState {
                    name: "Read".into(),
                    done: true
                },
                TaskState {
                    name: "Run".into(),
                    done: false
                },
            ]
        );
    }

    #[test]
    fn toggle_flips_in_memory_only() {
        let doc = doc_with(&["Read"]);
        let mut progress = DailyProgress::start(date(3), &doc);
        assert!(progress.toggle("Read"));
        assert!(progress.is_done("Read"));
        assert!(doc.record(date(3)).is_none());
        assert!(!progress.toggle("Read"));
    }

    #[test]
    fn commit_is_stable_without_toggles() {
        let mut doc = doc_with(&["Read", "Run", "Cook", "Sleep"]);
        let mut progress = DailyProgress::start(date(3), &doc);
        progress.set_done("Read", true);
        progress.set_done("Cook", true);

        let first = progress.commit(&mut doc);
        let second = progress.commit(&mut doc);
        assert_eq!(
            first,
            DaySummary {
                completed: 2,
                total: 4
            }
        );
        assert_eq!(first, second);
        assert_eq!(doc.summary_counts(date(3)), (2, 4));
    }

    #[test]
    fn commit_with_no_tasks_is_zero_over_zero() {
        let mut doc = Document::default();
        let progress = DailyProgress::start(date(3), &doc);
        assert_eq!(
            progress.commit(&mut doc),
            DaySummary {
                completed: 0,
                total: 0
            }
        );
    }

    #[test]
    fn rollover_creates_empty_day_and_keeps_previous_summary() {
        let mut doc = doc_with(&["Read", "Run"]);
        let mut progress = DailyProgress::start(date(3), &doc);
        progress.set_done("Read", true);
        progress.commit(&mut doc);

        assert!(progress.rollover(date(4), &mut doc));
        assert_eq!(progress.today(), date(4));
        assert!(!progress.is_done("Read"));
        assert_eq!(doc.summary_counts(date(3)), (1, 2));
        let flags = doc.record(date(4)).and_then(DayRecord::flags).unwrap();
        assert_eq!(flags.get("Read"), Some(&0));
        assert_eq!(flags.get("Run"), Some(&0));

        assert!(!progress.rollover(date(4), &mut doc));
    }

    #[test]
    fn rollover_keeps_an_existing_summary_for_the_new_day() {
        let mut doc = doc_with(&["Read"]);
        doc.history.insert(
            date(2),
            DayRecord::Summary(DaySummary {
                completed: 1,
                total: 1,
            }),
        );
        let mut progress = DailyProgress::start(date(3), &doc);
        assert!(progress.rollover(date(2), &mut doc));
        assert_eq!(doc.summary_counts(date(2)), (1, 1));
    }
}
