//! Paints a [`GridController`]'s current page into an [`egui::Painter`].
//!
//! The renderer keeps no state; every frame is painted from the controller and the
//! [`GridLayout`] computed for that frame.

use egui::{Align, Align2, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2, pos2, vec2};

use crate::{
    cell::CellValue,
    controller::GridController,
    layout::GridLayout,
    style::{GridColor, GridMetrics, GridStyle},
};

const COPY_ACK_TEXT: &str = "Copied!";
const COPY_ACK_PADDING: Vec2 = vec2(8.0, 4.0);

/// Shorten `text` with a trailing `...` so it fits `max_width`.
///
/// Text width is estimated from the character count, which is good enough for
/// proportional fonts at table sizes and needs no font access.
pub fn truncate_text(text: &str, max_width: f32, metrics: &GridMetrics) -> String {
    let usable = max_width - metrics.truncation_margin;
    let len = text.chars().count();
    if len as f32 * metrics.avg_glyph_width <= usable {
        return text.to_owned();
    }
    let max_chars = (usable / metrics.avg_glyph_width).max(0.0) as usize;
    if len <= max_chars {
        return text.to_owned();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

/// Height of the scrollable content: never less than the viewport, so the scroll
/// position doesn't snap when a short page replaces a long one.
pub fn content_height(layout: &GridLayout, viewport_height: f32) -> f32 {
    layout.rows_bottom().max(viewport_height)
}

/// Paint header, rows and the copy indicator with the grid's top-left corner at `origin`.
pub fn paint_grid(
    painter: &Painter,
    origin: Pos2,
    layout: &GridLayout,
    grid: &GridController,
    style: &GridStyle,
) {
    profiling::function_scope!();
    let offset = origin.to_vec2();
    paint_header(painter, offset, layout, grid, style);
    for row in 0..layout.row_count() {
        paint_row(painter, offset, layout, grid, style, row);
    }
    if let Some(ack) = grid.copy_ack() {
        paint_copy_ack(painter, ack.anchor + offset + layout.metrics().copy_ack_offset, style);
    }
}

fn paint_header(
    painter: &Painter,
    offset: Vec2,
    layout: &GridLayout,
    grid: &GridController,
    style: &GridStyle,
) {
    let columns = grid.columns();
    for column in 0..layout.column_count() {
        let rect = layout.header_rect(column).translate(offset);
        painter.rect(
            rect,
            0.0,
            style.color(GridColor::HeaderFill),
            Stroke::new(1.0, style.color(GridColor::HeaderBorder)),
            StrokeKind::Inside,
        );
        painter.with_clip_rect(rect).text(
            rect.center(),
            Align2::CENTER_CENTER,
            columns.label(column).unwrap_or_default(),
            style.header_font.clone(),
            style.color(GridColor::HeaderText),
        );
    }

    // Only the thin line is visible; the grab region around it is not painted.
    let metrics = layout.metrics();
    for column in layout.internal_boundaries() {
        let x = layout.boundary_x(column) + offset.x;
        let color = if grid.drag() == Some(column) {
            style.color(GridColor::ButtonBorderHovered)
        } else {
            style.color(GridColor::Separator)
        };
        let inset = metrics.separator_width;
        painter.line_segment(
            [
                pos2(x, offset.y + inset),
                pos2(x, offset.y + metrics.header_height - inset),
            ],
            Stroke::new(metrics.separator_width, color),
        );
    }
}

fn paint_row(
    painter: &Painter,
    offset: Vec2,
    layout: &GridLayout,
    grid: &GridController,
    style: &GridStyle,
    row: usize,
) {
    let Some(record) = grid.page_record(row) else {
        return;
    };
    let metrics = layout.metrics();
    let hover = grid.hover().filter(|h| h.row == row);
    let row_fill = if hover.is_some() {
        style.color(GridColor::RowHovered)
    } else if row % 2 == 0 {
        style.color(GridColor::RowEven)
    } else {
        style.color(GridColor::RowOdd)
    };
    let border = Stroke::new(1.0, style.color(GridColor::CellBorder));

    for column in 0..layout.column_count() {
        let rect = layout.cell_rect(row, column).translate(offset);
        if Some(column) == layout.action_column() {
            painter.rect(
                rect,
                0.0,
                style.color(GridColor::ActionCellFill),
                border,
                StrokeKind::Inside,
            );
            continue;
        }
        painter.rect(rect, 0.0, row_fill, border, StrokeKind::Inside);
        if let Some(value) = grid.cell_value(row, column) {
            paint_cell_text(&painter.with_clip_rect(rect), rect, &value, metrics, style);
        }
    }

    let buttons = grid.action_buttons(record);
    for (index, (button, rect)) in buttons.iter().zip(layout.button_rects(row)).enumerate() {
        let rect = rect.translate(offset);
        let hovered = hover.is_some_and(|h| h.button == Some(index));
        let stroke = if hovered {
            Stroke::new(2.0, style.color(GridColor::ButtonBorderHovered))
        } else {
            Stroke::new(1.0, style.color(GridColor::ButtonBorder))
        };
        painter.rect(rect, 2.0, button.fill, stroke, StrokeKind::Inside);
        painter.with_clip_rect(rect).text(
            rect.center(),
            Align2::CENTER_CENTER,
            &button.label,
            style.button_font.clone(),
            button.text_color,
        );
    }
}

fn paint_cell_text(
    painter: &Painter,
    rect: Rect,
    value: &CellValue,
    metrics: &GridMetrics,
    style: &GridStyle,
) {
    let text = truncate_text(value.text(), rect.width(), metrics);
    if text.is_empty() {
        return;
    }
    let (color, font, align) = match value {
        CellValue::PlainText(_) => (
            style.color(GridColor::CellText),
            style.cell_font.clone(),
            Align::Min,
        ),
        CellValue::Styled(styled) => (styled.color, styled.font.clone(), styled.align),
    };
    let y = rect.center().y;
    let (pos, anchor) = match align {
        Align::Min => (pos2(rect.left() + metrics.cell_padding, y), Align2::LEFT_CENTER),
        Align::Center => (rect.center(), Align2::CENTER_CENTER),
        Align::Max => (pos2(rect.right() - metrics.cell_padding, y), Align2::RIGHT_CENTER),
    };
    painter.text(pos, anchor, text, font, color);
}

fn paint_copy_ack(painter: &Painter, top_left: Pos2, style: &GridStyle) {
    let galley = painter.layout_no_wrap(
        COPY_ACK_TEXT.to_owned(),
        style.copy_ack_font.clone(),
        style.color(GridColor::CopyAckText),
    );
    let rect = Rect::from_min_size(top_left, galley.size() + 2.0 * COPY_ACK_PADDING);
    painter.rect_filled(rect, 3.0, style.color(GridColor::CopyAckFill));
    painter.galley(
        top_left + COPY_ACK_PADDING,
        galley,
        style.color(GridColor::CopyAckText),
    );
}
