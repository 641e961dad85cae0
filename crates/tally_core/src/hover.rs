use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use crate::heatmap::{
    CellGeometry, CellRect, CELL_PITCH, CELL_SPACING, DAYS_PER_WEEK, ORIGIN_X, ORIGIN_Y,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverInfo {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
}

impl fmt::Display for HoverInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} tasks done",
            self.date.format("%Y-%m-%d"),
            self.completed,
            self.total
        )
    }
}

/// Maps canvas points back to the cell under them. The grid position is
/// derived from the point, so a lookup costs one hash probe.
#[derive(Debug, Clone, Default)]
pub struct HoverIndex {
    slots: HashMap<(u32, u32), (CellRect, HoverInfo)>,
}

impl HoverIndex {
    pub fn insert(&mut self, cell: &CellGeometry, info: HoverInfo) {
        self.slots.insert((cell.column, cell.row), (cell.rect, info));
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn query(&self, x: f32, y: f32) -> Option<HoverInfo> {
        // Snap halfway into the gap so points on a cell edge pick that cell.
        let dx = x - ORIGIN_X + CELL_SPACING / 2.0;
        let dy = y - ORIGIN_Y + CELL_SPACING / 2.0;
        if !(dx >= 0.0 && dy >= 0.0) {
            return None;
        }
        let column = (dx / CELL_PITCH).floor() as u32;
        let row = (dy / CELL_PITCH).floor() as u32;
        if row >= DAYS_PER_WEEK {
            return None;
        }
        let (rect, info) = self.slots.get(&(column, row))?;
        rect.contains(x, y).then_some(*info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DayRecord, DaySummary, History};
    use crate::heatmap::{render, ViewMode, CELL_SIZE};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn frame() -> crate::heatmap::HeatmapFrame {
        let mut history = History::new();
        history.insert(
            date(2023, 3, 14),
            DayRecord::Summary(DaySummary {
                completed: 3,
                total: 4,
            }),
        );
        render(&history, ViewMode::FullYear(2023), date(2025, 1, 10))
    }

    #[test]
    fn point_inside_a_cell_returns_its_record() {
        let frame = frame();
        assert_eq!(frame.hover.len(), 365);
        let cell = frame
            .cells
            .iter()
            .find(|cell| cell.geometry.date == date(2023, 3, 14))
            .unwrap();
        let (x, y) = cell.geometry.rect.center();
        let info = frame.hover.query(x, y).expect("hit");
        assert_eq!(
            info,
            HoverInfo {
                date: date(2023, 3, 14),
                completed: 3,
                total: 4
            }
        );
        assert_eq!(info.to_string(), "2023-03-14: 3/4 tasks done");

        let corner = frame.hover.query(cell.geometry.rect.x1, cell.geometry.rect.y1);
        assert_eq!(corner.map(|info| info.date), Some(date(2023, 3, 14)));
    }

    #[test]
    fn every_cell_centre_maps_back_to_its_date() {
        let frame = frame();
        for cell in &frame.cells {
            let (x, y) = cell.geometry.rect.center();
            assert_eq!(
                frame.hover.query(x, y).map(|info| info.date),
                Some(cell.geometry.date)
            );
        }
    }

    #[test]
    fn points_outside_cells_have_no_data() {
        let frame = frame();
        let first = frame.cells.first().unwrap().geometry.rect;
        let last = frame.cells.last().unwrap().geometry.rect;

        // Gap between two columns.
        assert_eq!(frame.hover.query(first.x2 + 2.0, first.y1 + 1.0), None);
        // Left of the grid, above it, below it, past the last day.
        assert_eq!(frame.hover.query(ORIGIN_X - 1.0, first.y1), None);
        assert_eq!(frame.hover.query(first.x1, 5.0), None);
        assert_eq!(
            frame.hover.query(first.x1 + 1.0, ORIGIN_Y + 7.5 * CELL_PITCH),
            None
        );
        assert_eq!(frame.hover.query(last.x1 + CELL_PITCH * 3.0, last.y1), None);
        assert_eq!(frame.hover.query(f32::NAN, 30.0), None);
        assert_eq!(
            frame
                .hover
                .query(last.x1, last.y1 + CELL_SIZE / 2.0)
                .map(|info| info.date),
            Some(date(2023, 12, 31))
        );
    }
}
