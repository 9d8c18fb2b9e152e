//! Geometry of one frame of the grid.
//!
//! Painting and hit-testing both go through [`GridLayout`], so what the pointer
//! hits is always what was drawn. Coordinates are relative to the top-left corner
//! of the grid surface (the header band starts at `y = 0`).

use egui::{Pos2, Rect, pos2};

use crate::{column::ColumnModel, style::GridMetrics};

/// What lies under a point of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// The grab region of the boundary right of this column, in the header band.
    ColumnBoundary(usize),

    /// A header cell away from any boundary.
    Header(usize),

    /// An action button.
    Button { row: usize, button: usize },

    /// Any other cell of a page row, action cells included.
    Cell { row: usize, column: usize },

    /// Below the last row, or right of the last column.
    Nothing,
}

/// Column and row geometry of the current page.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    metrics: GridMetrics,

    /// Left edge of every column, plus the right edge of the last one.
    edges: Vec<f32>,

    /// Action buttons per page row.
    button_counts: Vec<usize>,

    /// Column holding the action buttons, if any.
    action_column: Option<usize>,
}

impl GridLayout {
    /// `button_counts` has one entry per row of the current page.
    pub fn new(
        columns: &ColumnModel,
        metrics: GridMetrics,
        button_counts: Vec<usize>,
        action_column: Option<usize>,
    ) -> Self {
        let mut edges = Vec::with_capacity(columns.len() + 1);
        let mut x = 0.0;
        edges.push(x);
        for width in columns.widths() {
            x += width;
            edges.push(x);
        }
        Self {
            metrics,
            edges,
            button_counts,
            action_column,
        }
    }

    #[inline]
    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    pub fn column_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn row_count(&self) -> usize {
        self.button_counts.len()
    }

    pub fn action_column(&self) -> Option<usize> {
        self.action_column
    }

    pub fn total_width(&self) -> f32 {
        self.edges.last().copied().unwrap_or(0.0)
    }

    /// Header band plus the page's rows.
    pub fn rows_bottom(&self) -> f32 {
        self.metrics.header_height + self.row_count() as f32 * self.metrics.row_height
    }

    pub fn header_rect(&self, column: usize) -> Rect {
        Rect::from_min_max(
            pos2(self.edges[column], 0.0),
            pos2(self.edges[column + 1], self.metrics.header_height),
        )
    }

    /// X of the boundary right of `column`.
    pub fn boundary_x(&self, column: usize) -> f32 {
        self.edges[column + 1]
    }

    /// Columns whose right boundary can be dragged: all but the last.
    pub fn internal_boundaries(&self) -> std::ops::Range<usize> {
        0..self.column_count().saturating_sub(1)
    }

    /// The invisible region that grabs the boundary right of `column`.
    pub fn boundary_hit_rect(&self, column: usize) -> Rect {
        let x = self.boundary_x(column);
        let r = self.metrics.boundary_grab_radius;
        Rect::from_min_max(pos2(x - r, 0.0), pos2(x + r, self.metrics.header_height))
    }

    pub fn row_rect(&self, row: usize) -> Rect {
        let top = self.metrics.header_height + row as f32 * self.metrics.row_height;
        Rect::from_min_max(
            pos2(0.0, top),
            pos2(self.total_width(), top + self.metrics.row_height),
        )
    }

    pub fn cell_rect(&self, row: usize, column: usize) -> Rect {
        let row_rect = self.row_rect(row);
        Rect::from_x_y_ranges(self.edges[column]..=self.edges[column + 1], row_rect.y_range())
    }

    /// Action buttons of a row, left to right, centered in the action cell.
    pub fn button_rects(&self, row: usize) -> Vec<Rect> {
        let (Some(column), Some(&count)) = (self.action_column, self.button_counts.get(row)) else {
            return Vec::new();
        };
        if count == 0 {
            return Vec::new();
        }
        let m = &self.metrics;
        let width = if count > 1 {
            m.button_width
        } else {
            m.single_button_width
        };
        let total = width * count as f32 + m.button_gutter * (count - 1) as f32;
        let cell = self.cell_rect(row, column);
        let left = cell.left() + (cell.width() - total) / 2.0;
        let top = cell.top() + m.button_inset;
        let height = m.row_height - 2.0 * m.button_inset;
        (0..count)
            .map(|i| {
                let x = left + i as f32 * (width + m.button_gutter);
                Rect::from_min_max(pos2(x, top), pos2(x + width, top + height))
            })
            .collect()
    }

    fn column_at(&self, x: f32) -> Option<usize> {
        (0..self.column_count()).find(|&c| self.edges[c] <= x && x < self.edges[c + 1])
    }

    /// The page row at `y`, if any.
    pub fn row_at(&self, y: f32) -> Option<usize> {
        let below_header = y - self.metrics.header_height;
        if below_header < 0.0 {
            return None;
        }
        let row = (below_header / self.metrics.row_height) as usize;
        (row < self.row_count()).then_some(row)
    }

    /// The closest internal boundary whose grab region contains `pos`.
    pub fn boundary_at(&self, pos: Pos2) -> Option<usize> {
        if pos.y < 0.0 || pos.y >= self.metrics.header_height {
            return None;
        }
        self.internal_boundaries()
            .filter(|&c| self.boundary_hit_rect(c).contains(pos))
            .min_by(|&a, &b| {
                let da = (pos.x - self.boundary_x(a)).abs();
                let db = (pos.x - self.boundary_x(b)).abs();
                da.total_cmp(&db)
            })
    }

    /// Resolve a point, boundaries first, then buttons, then cells.
    pub fn hit_test(&self, pos: Pos2) -> HitTarget {
        if let Some(column) = self.boundary_at(pos) {
            return HitTarget::ColumnBoundary(column);
        }
        if (0.0..self.metrics.header_height).contains(&pos.y) {
            return self
                .column_at(pos.x)
                .map_or(HitTarget::Nothing, HitTarget::Header);
        }
        let (Some(row), Some(column)) = (self.row_at(pos.y), self.column_at(pos.x)) else {
            return HitTarget::Nothing;
        };
        if Some(column) == self.action_column
            && let Some(button) = self.button_rects(row).iter().position(|r| r.contains(pos))
        {
            return HitTarget::Button { row, button };
        }
        HitTarget::Cell { row, column }
    }
}
