use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Keys a committed day is stored under. Task names may not collide with them.
pub const COMPLETED_KEY: &str = "completed";
pub const TOTAL_KEY: &str = "total";

/// Number of empty days written behind "today" when a data file is created.
pub const SEEDED_HISTORY_DAYS: i64 = 368;

pub type History = BTreeMap<NaiveDate, DayRecord>;

/// Everything the application persists: the ordered task list and the
/// per-date history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub tasks: Vec<String>,
    pub history: History,
}

impl Document {
    /// Fresh document with an empty record for each of the
    /// [`SEEDED_HISTORY_DAYS`] days before `today`.
    pub fn seeded(today: NaiveDate) -> Self {
        let history = (1..=SEEDED_HISTORY_DAYS)
            .map(|days_back| (today - Duration::days(days_back), DayRecord::default()))
            .collect();
        Self {
            tasks: Vec::new(),
            history,
        }
    }

    pub fn record(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.history.get(&date)
    }

    /// `(completed, total)` for a date, `(0, 0)` when nothing was committed.
    pub fn summary_counts(&self, date: NaiveDate) -> (u32, u32) {
        self.record(date)
            .and_then(DayRecord::summary)
            .map(|summary| (summary.completed, summary.total))
            .unwrap_or((0, 0))
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.history.keys().map(|date| date.year())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub completed: u32,
    pub total: u32,
}

/// State stored for one date.
///
/// On disk both shapes are a flat JSON object of integers: task flags look
/// like `{"Read": 1, "Run": 0}`, a committed day like
/// `{"completed": 1, "total": 2}`. A record carrying both is read as the
/// summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub enum DayRecord {
    Flags(BTreeMap<String, u8>),
    Summary(DaySummary),
}

impl Default for DayRecord {
    fn default() -> Self {
        DayRecord::Flags(BTreeMap::new())
    }
}

impl DayRecord {
    pub fn summary(&self) -> Option<DaySummary> {
        match self {
            DayRecord::Summary(summary) => Some(*summary),
            DayRecord::Flags(_) => None,
        }
    }

    pub fn flags(&self) -> Option<&BTreeMap<String, u8>> {
        match self {
            DayRecord::Flags(flags) => Some(flags),
            DayRecord::Summary(_) => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, DayRecord::Summary(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    CompletedExceedsTotal { completed: u32, total: u32 },
    FlagOutOfRange { task: String, value: u32 },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::CompletedExceedsTotal { completed, total } => {
                write!(f, "completed count {completed} exceeds total {total}")
            }
            RecordError::FlagOutOfRange { task, value } => {
                write!(f, "flag for task {task:?} must be 0 or 1, found {value}")
            }
        }
    }
}

impl TryFrom<BTreeMap<String, u32>> for DayRecord {
    type Error = RecordError;

    fn try_from(mut raw: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        let completed = raw.remove(COMPLETED_KEY);
        let total = raw.remove(TOTAL_KEY);
        if completed.is_some() || total.is_some() {
            let completed = completed.unwrap_or(0);
            let total = total.unwrap_or(0);
            if completed > total {
                return Err(RecordError::CompletedExceedsTotal { completed, total });
            }
            return Ok(DayRecord::Summary(DaySummary { completed, total }));
        }

        let mut flags = BTreeMap::new();
        for (task, value) in raw {
            let flag = match value {
                0 => 0,
                1 => 1,
                _ => return Err(RecordError::FlagOutOfRange { task, value }),
            };
            flags.insert(task, flag);
        }
        Ok(DayRecord::Flags(flags))
    }
}

impl From<DayRecord> for BTreeMap<String, u32> {
    fn from(record: DayRecord) -> Self {
        match record {
            DayRecord::Flags(flags) => flags
                .into_iter()
                .map(|(task, flag)| (task, u32::from(flag)))
                .collect(),
            DayRecord::Summary(summary) => BTreeMap::from([
                (COMPLETED_KEY.to_string(), summary.completed),
                (TOTAL_KEY.to_string(), summary.total),
            ]),
        }
    }
}
