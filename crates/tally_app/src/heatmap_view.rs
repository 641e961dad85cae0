use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, ScrollArea, Sense,
};
use tally_core::{
    heatmap::{HeatCell, HeatmapFrame, Rgb, BORDER_COLOR, BORDER_WIDTH, CELL_RADIUS},
    hover::HoverInfo,
};

const LABEL_FONT_SIZE: f32 = 10.0;

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Paints a frame inside a horizontal scroll area pinned to its right edge
/// and returns the record under the pointer, if any.
pub fn show(ui: &mut egui::Ui, frame: &HeatmapFrame) -> Option<HoverInfo> {
    ScrollArea::horizontal()
        .id_salt("heatmap")
        .stick_to_right(true)
        .show(ui, |ui| {
            let size = egui::vec2(frame.extent.width, frame.extent.height);
            let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
            let painter = ui.painter_at(rect);
            let origin = rect.min;

            painter.rect_filled(rect, CornerRadius::ZERO, Color32::WHITE);
            for cell in &frame.cells {
                paint_cell(&painter, origin, cell);
            }

            let text_color = Color32::from_gray(40);
            for label in &frame.month_labels {
                painter.text(
                    origin + egui::vec2(label.x, label.y),
                    Align2::CENTER_CENTER,
                    &label.text,
                    FontId::proportional(LABEL_FONT_SIZE),
                    text_color,
                );
            }
            for label in &frame.weekday_labels {
                painter.text(
                    origin + egui::vec2(label.x, label.y),
                    Align2::LEFT_CENTER,
                    &label.text,
                    FontId::proportional(LABEL_FONT_SIZE),
                    text_color,
                );
            }

            response.hover_pos().and_then(|pos| {
                let local = pos - origin;
                frame.hover.query(local.x, local.y)
            })
        })
        .inner
}

fn paint_cell(painter: &Painter, origin: Pos2, cell: &HeatCell) {
    let bounds = cell.geometry.rect;
    let rect = Rect::from_min_max(
        origin + egui::vec2(bounds.x1, bounds.y1),
        origin + egui::vec2(bounds.x2, bounds.y2),
    );
    let radius = CornerRadius::same(CELL_RADIUS as u8);
    painter.rect_filled(rect.expand(BORDER_WIDTH / 2.0), radius, color(BORDER_COLOR));
    painter.rect_filled(rect, radius, color(cell.fill()));
}
