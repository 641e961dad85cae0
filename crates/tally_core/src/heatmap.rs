//! Contribution-graph geometry.
//!
//! Everything here is a pure function of the history, the view mode and the
//! date; the app only paints what [`render`] returns. Coordinates are canvas
//! pixels with the origin at the top-left of the scrollable area. Weeks are
//! columns starting on Sunday; rows are weekdays, Sunday at row 0.

use chrono::{Datelike, Duration, NaiveDate};

use crate::document::{DayRecord, History};
use crate::hover::{HoverIndex, HoverInfo};

pub const CELL_SIZE: f32 = 15.0;
pub const CELL_SPACING: f32 = 4.0;
pub const CELL_PITCH: f32 = CELL_SIZE + CELL_SPACING;
pub const CELL_RADIUS: f32 = 3.0;
pub const BORDER_WIDTH: f32 = 2.0;
pub const ORIGIN_X: f32 = 10.0 + 1.8 * CELL_PITCH;
pub const ORIGIN_Y: f32 = 20.0;
pub const CANVAS_HEIGHT: f32 = 150.0;

pub const DAYS_PER_WEEK: u32 = 7;
pub const TRAILING_WEEKS: u32 = 52;
pub const TRAILING_COLUMNS: u32 = TRAILING_WEEKS + 1;

const MONTH_LABEL_Y: f32 = 10.0;
// Shifts every month label but the first clear of the weekday labels.
const MONTH_LABEL_NUDGE: f32 = CELL_SIZE / 2.0;
const WEEKDAY_LABEL_X: f32 = 8.0;
const WEEKDAY_LABEL_Y: f32 = 45.0;
const WEEKDAY_LABELS: [&str; 3] = ["Mon", "Wed", "Fri"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Cell fill per bucket, empty to fully complete.
pub const PALETTE: [Rgb; 6] = [
    Rgb(0xeb, 0xed, 0xf0),
    Rgb(0xc6, 0xe4, 0x8b),
    Rgb(0x7b, 0xc9, 0x6f),
    Rgb(0x40, 0xc4, 0x63),
    Rgb(0x30, 0xa1, 0x4e),
    Rgb(0x21, 0x6e, 0x39),
];
pub const BORDER_COLOR: Rgb = Rgb(0xd3, 0xd3, 0xd3);
pub const MAX_BUCKET: usize = PALETTE.len() - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// The 53 weeks ending today.
    Trailing,
    /// January 1st to December 31st of a year other than the current one.
    FullYear(i32),
}

impl ViewMode {
    pub fn for_year(year: i32, today: NaiveDate) -> Self {
        if year == today.year() {
            ViewMode::Trailing
        } else {
            ViewMode::FullYear(year)
        }
    }
}

/// Inclusive span of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn len(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len())
    }
}

/// Days since the most recent Sunday.
pub fn weekday_offset(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Rows filled in the final trailing column.
pub fn last_column_rows(today: NaiveDate) -> u32 {
    (today.weekday().num_days_from_monday() + 1) % DAYS_PER_WEEK + 1
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// Dates covered by a view. A year chrono cannot represent falls back to the
/// trailing range.
pub fn date_range(mode: ViewMode, today: NaiveDate) -> DateRange {
    if let ViewMode::FullYear(year) = mode {
        if let Some((start, end)) = year_bounds(year) {
            return DateRange { start, end };
        }
    }
    let back = i64::from(DAYS_PER_WEEK * TRAILING_WEEKS + weekday_offset(today));
    DateRange {
        start: today - Duration::days(back),
        end: today,
    }
}

/// Columns reserved for a view; drives the scroll extent.
pub fn column_count(mode: ViewMode, range: &DateRange) -> u32 {
    match mode {
        ViewMode::Trailing => TRAILING_COLUMNS,
        ViewMode::FullYear(_) => {
            let slots = range.len() as u32 + weekday_offset(range.start);
            slots.div_ceil(DAYS_PER_WEEK) + 1
        }
    }
}

pub fn completion_ratio(completed: u32, total: u32) -> f64 {
    if completed == 0 {
        return 0.0;
    }
    if total == 0 {
        return 1.0;
    }
    (f64::from(completed) / f64::from(total)).min(1.0)
}

/// Linear bucket: `min(floor(ratio * 5), 5)`.
pub fn color_bucket(completed: u32, total: u32) -> usize {
    let scaled = completion_ratio(completed, total) * MAX_BUCKET as f64;
    (scaled.floor() as usize).min(MAX_BUCKET)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CellRect {
    pub fn at(column: u32, row: u32) -> Self {
        let x1 = ORIGIN_X + column as f32 * CELL_PITCH;
        let y1 = ORIGIN_Y + row as f32 * CELL_PITCH;
        Self {
            x1,
            y1,
            x2: x1 + CELL_SIZE,
            y2: y1 + CELL_SIZE,
        }
    }

    /// Edges count as inside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub date: NaiveDate,
    pub column: u32,
    pub row: u32,
    pub rect: CellRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub cells: Vec<CellGeometry>,
    pub columns: u32,
}

/// Places every date of `range` on the week grid. The first date lands on
/// the row of its weekday, so a range starting mid-week leaves the top of
/// the first column empty.
pub fn layout(range: &DateRange, mode: ViewMode) -> Layout {
    let lead = weekday_offset(range.start);
    let cells = range
        .days()
        .enumerate()
        .map(|(index, date)| {
            let slot = index as u32 + lead;
            let column = slot / DAYS_PER_WEEK;
            let row = slot % DAYS_PER_WEEK;
            CellGeometry {
                date,
                column,
                row,
                rect: CellRect::at(column, row),
            }
        })
        .collect();
    Layout {
        cells,
        columns: column_count(mode, range),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    pub geometry: CellGeometry,
    pub completed: u32,
    pub total: u32,
    pub bucket: usize,
}

impl HeatCell {
    pub fn fill(&self) -> Rgb {
        PALETTE[self.bucket]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

/// Everything needed to paint one view of the heatmap.
#[derive(Debug, Clone)]
pub struct HeatmapFrame {
    pub mode: ViewMode,
    pub range: DateRange,
    pub cells: Vec<HeatCell>,
    /// Centred horizontally on `x`.
    pub month_labels: Vec<Label>,
    /// Left-aligned at `x`, vertically centred on `y`.
    pub weekday_labels: Vec<Label>,
    pub extent: Extent,
    pub hover: HoverIndex,
}

pub fn render(history: &History, mode: ViewMode, today: NaiveDate) -> HeatmapFrame {
    let range = date_range(mode, today);
    let Layout { cells, columns } = layout(&range, mode);

    let month_labels = month_labels(&cells);
    let mut hover = HoverIndex::default();
    let cells: Vec<HeatCell> = cells
        .into_iter()
        .map(|geometry| {
            let (completed, total) = history
                .get(&geometry.date)
                .and_then(DayRecord::summary)
                .map(|summary| (summary.completed, summary.total))
                .unwrap_or((0, 0));
            hover.insert(
                &geometry,
                HoverInfo {
                    date: geometry.date,
                    completed,
                    total,
                },
            );
            HeatCell {
                geometry,
                completed,
                total,
                bucket: color_bucket(completed, total),
            }
        })
        .collect();

    HeatmapFrame {
        mode,
        range,
        cells,
        month_labels,
        weekday_labels: weekday_labels(),
        extent: Extent {
            width: ORIGIN_X + columns as f32 * CELL_PITCH,
            height: CANVAS_HEIGHT,
        },
        hover,
    }
}

/// One label per run of consecutive dates sharing a (year, month), centred
/// over the columns the run occupies.
pub fn month_labels(cells: &[CellGeometry]) -> Vec<Label> {
    struct Run {
        date: NaiveDate,
        first_column: u32,
        last_column: u32,
    }

    let mut runs: Vec<Run> = Vec::new();
    for cell in cells {
        let same_month = runs.last().is_some_and(|run| {
            run.date.year() == cell.date.year() && run.date.month() == cell.date.month()
        });
        match runs.last_mut() {
            Some(run) if same_month => run.last_column = cell.column,
            _ => runs.push(Run {
                date: cell.date,
                first_column: cell.column,
                last_column: cell.column,
            }),
        }
    }

    runs.iter()
        .enumerate()
        .map(|(index, run)| {
            let left = CellRect::at(run.first_column, 0).x1;
            let right = CellRect::at(run.last_column, 0).x2;
            let nudge = if index == 0 { 0.0 } else { MONTH_LABEL_NUDGE };
            Label {
                text: run.date.format("%b").to_string(),
                x: (left + right) / 2.0 + nudge,
                y: MONTH_LABEL_Y,
            }
        })
        .collect()
}

pub fn weekday_labels() -> Vec<Label> {
    WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(index, text)| Label {
            text: (*text).to_string(),
            x: WEEKDAY_LABEL_X,
            y: WEEKDAY_LABEL_Y + (index as f32) * 2.0 * CELL_PITCH,
        })
        .collect()
}
