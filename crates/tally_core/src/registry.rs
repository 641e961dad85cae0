use tracing::debug;

use crate::document::{DayRecord, Document, COMPLETED_KEY, TOTAL_KEY};

/// Menu entry shown when there is nothing to select.
pub const NO_TASKS_PLACEHOLDER: &str = "No tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Empty,
    Duplicate,
    /// The name would collide with the keys of a committed day.
    Reserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Appends `name` (trimmed) to the task list unless it is empty, reserved or
/// already present.
pub fn add_task(document: &mut Document, name: &str) -> AddOutcome {
    let name = name.trim();
    if name.is_empty() {
        return AddOutcome::Empty;
    }
    if name == COMPLETED_KEY || name == TOTAL_KEY {
        return AddOutcome::Reserved;
    }
    if document.tasks.iter().any(|task| task == name) {
        return AddOutcome::Duplicate;
    }
    document.tasks.push(name.to_string());
    AddOutcome::Added
}

/// Drops `name` from the task list and from every in-progress day. Committed
/// summaries are left alone. Callers confirm with the user first.
pub fn remove_task(document: &mut Document, name: &str) -> RemoveOutcome {
    let Some(position) = document.tasks.iter().position(|task| task == name) else {
        return RemoveOutcome::NotFound;
    };
    document.tasks.remove(position);

    let mut touched = 0usize;
    for record in document.history.values_mut() {
        if let DayRecord::Flags(flags) = record {
            if flags.remove(name).is_some() {
                touched += 1;
            }
        }
    }
    debug!(task = %name, days = touched, "task removed from history");
    RemoveOutcome::Removed
}

pub fn list_tasks(document: &Document) -> &[String] {
    &document.tasks
}

/// Task names for a selection menu, or the placeholder when there are none.
pub fn menu_entries(document: &Document) -> Vec<String> {
    if document.tasks.is_empty() {
        vec![NO_TASKS_PLACEHOLDER.to_string()]
    } else {
        document.tasks.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DaySummary;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[test]
    fn add_appends_in_order() {
        let mut doc = Document::default();
        assert_eq!(add_task(&mut doc, "Read"), AddOutcome::Added);
        assert_eq!(add_task(&mut doc, "  Run "), AddOutcome::Added);
        assert_eq!(list_tasks(&doc), ["Read", "Run"]);
    }

    #[test]
    fn add_rejects_empty_duplicate_and_reserved() {
        let mut doc = Document::default();
        add_task(&mut doc, "Read");
        assert_eq!(add_task(&mut doc, ""), AddOutcome::Empty);
        assert_eq!(add_task(&mut doc, "   "), AddOutcome::Empty);
        assert_eq!(add_task(&mut doc, "Read"), AddOutcome::Duplicate);
        assert_eq!(add_task(&mut doc, "total"), AddOutcome::Reserved);
        assert_eq!(doc.tasks.len(), 1);
    }

    #[test]
    fn remove_cascades_into_flag_records_only() {
        let mut doc = Document::default();
        add_task(&mut doc, "Read");
        add_task(&mut doc, "Run");
        doc.history.insert(
            date(1),
            DayRecord::Flags(BTreeMap::from([("Read".into(), 1), ("Run".into(), 0)])),
        );
        doc.history.insert(
            date(2),
            DayRecord::Summary(DaySummary {
                completed: 2,
                total: 2,
            }),
        );

        assert_eq!(remove_task(&mut doc, "Read"), RemoveOutcome::Removed);
        assert_eq!(doc.tasks, vec!["Run"]);
        for record in doc.history.values() {
            if let Some(flags) = record.flags() {
                assert!(!flags.contains_key("Read"));
            }
        }
        assert_eq!(doc.summary_counts(date(2)), (2, 2));
        assert_eq!(remove_task(&mut doc, "Read"), RemoveOutcome::NotFound);
    }

    #[test]
    fn menu_falls_back_to_placeholder() {
        let mut doc = Document::default();
        assert_eq!(menu_entries(&doc), vec![NO_TASKS_PLACEHOLDER]);
        add_task(&mut doc, "Read");
        assert_eq!(menu_entries(&doc), vec!["Read"]);
    }
}
