//! Column widths, minimums and the trailing stretch column.

/// Added to the measured header label width to get a column's minimum width.
pub const MIN_WIDTH_PADDING: f32 = 40.0;

/// The stretch column never gets narrower than this.
pub const STRETCH_MIN_WIDTH: f32 = 150.0;

/// Per-character label width used until real font measurements are available.
const FALLBACK_GLYPH_WIDTH: f32 = 9.0;

/// Host-side description of one column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ColumnSpec {
    pub label: String,
    pub initial_width: f32,
}

impl ColumnSpec {
    pub fn new(label: impl Into<String>, initial_width: f32) -> Self {
        Self {
            label: label.into(),
            initial_width,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ColumnState {
    label: String,
    width: f32,
    min_width: f32,
}

/// Current widths of all columns.
///
/// The last column is the stretch column: it absorbs whatever the surface has left
/// after the other columns, so the widths always cover the whole surface.
/// No column is ever narrower than its minimum.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnModel {
    columns: Vec<ColumnState>,
    surface_width: f32,
}

impl ColumnModel {
    /// `measure_label` returns the drawn width of a header label.
    pub fn new(specs: &[ColumnSpec], measure_label: impl Fn(&str) -> f32) -> Self {
        let columns = specs
            .iter()
            .map(|spec| {
                let min_width = measure_label(&spec.label) + MIN_WIDTH_PADDING;
                ColumnState {
                    label: spec.label.clone(),
                    width: spec.initial_width.max(min_width),
                    min_width,
                }
            })
            .collect();
        let mut model = Self {
            columns,
            surface_width: 0.0,
        };
        model.stretch();
        model
    }

    /// Uses a character-count estimate for the label widths.
    pub fn estimated(specs: &[ColumnSpec]) -> Self {
        Self::new(specs, estimate_label_width)
    }

    /// Re-derive minimums from real label measurements, widening columns that fall short.
    pub fn remeasure(&mut self, measure_label: impl Fn(&str) -> f32) {
        for column in &mut self.columns {
            column.min_width = measure_label(&column.label) + MIN_WIDTH_PADDING;
            column.width = column.width.max(column.min_width);
        }
        self.stretch();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|c| c.label.as_str())
    }

    pub fn width(&self, index: usize) -> f32 {
        self.columns.get(index).map_or(0.0, |c| c.width)
    }

    pub fn min_width(&self, index: usize) -> f32 {
        self.columns.get(index).map_or(0.0, |c| c.min_width)
    }

    pub fn widths(&self) -> Vec<f32> {
        self.columns.iter().map(|c| c.width).collect()
    }

    /// Is this the trailing column that absorbs the leftover space?
    #[inline]
    pub fn is_stretch(&self, index: usize) -> bool {
        index + 1 == self.columns.len()
    }

    /// Left edge of a column: the sum of the widths before it.
    pub fn offset(&self, index: usize) -> f32 {
        self.columns.iter().take(index).map(|c| c.width).sum()
    }

    pub fn total_width(&self) -> f32 {
        self.offset(self.columns.len())
    }

    pub fn surface_width(&self) -> f32 {
        self.surface_width
    }

    /// The surface changed size; returns `true` if any width changed.
    pub fn set_surface_width(&mut self, surface_width: f32) -> bool {
        if self.surface_width == surface_width {
            return false;
        }
        let before = self.columns.last().map(|c| c.width);
        self.surface_width = surface_width;
        self.stretch();
        before != self.columns.last().map(|c| c.width)
    }

    /// Set a column's width from the pointer position dragging its right boundary.
    ///
    /// Returns the new width.
    pub fn resize(&mut self, index: usize, pointer_x: f32) -> f32 {
        if index >= self.columns.len() {
            crate::log_or_panic!(
                "Resized column {index}, but the grid has only {} columns",
                self.columns.len()
            );
            return 0.0;
        }
        let preceding = self.offset(index);
        let column = &mut self.columns[index];
        column.width = column.min_width.max(pointer_x - preceding);
        let width = column.width;
        self.stretch();
        width
    }

    /// Recompute the stretch column from the space the others leave.
    fn stretch(&mut self) {
        let Some((last, fixed)) = self.columns.split_last_mut() else {
            return;
        };
        let fixed_width: f32 = fixed.iter().map(|c| c.width).sum();
        let floor = last.min_width.max(STRETCH_MIN_WIDTH);
        last.width = floor.max(self.surface_width - fixed_width);
    }

    /// The column under `x`, if any.
    pub fn column_at(&self, x: f32) -> Option<usize> {
        if x < 0.0 {
            return None;
        }
        let mut right = 0.0;
        for (i, column) in self.columns.iter().enumerate() {
            right += column.width;
            if x < right {
                return Some(i);
            }
        }
        None
    }

    /// The internal boundary within `grab_radius` of `x`, named by the column to its left.
    ///
    /// The boundary after the stretch column is not grabbable.
    pub fn boundary_at(&self, x: f32, grab_radius: f32) -> Option<usize> {
        let mut boundary = 0.0;
        let mut best: Option<(usize, f32)> = None;
        let internal = self.columns.len().saturating_sub(1);
        for (i, column) in self.columns.iter().enumerate().take(internal) {
            boundary += column.width;
            let distance = (x - boundary).abs();
            if distance <= grab_radius && best.is_none_or(|(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Rough label width from the number of characters.
pub(crate) fn estimate_label_width(label: &str) -> f32 {
    label.chars().count() as f32 * FALLBACK_GLYPH_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Drawing ID", 180.0),
            ColumnSpec::new("Revision", 90.0),
            ColumnSpec::new("Actions", 200.0),
        ]
    }

    #[test]
    fn stretch_column_absorbs_the_remainder() {
        let mut model = ColumnModel::new(&specs(), |_| 50.0);
        model.set_surface_width(1000.0);
        assert_eq!(model.width(2), 1000.0 - 180.0 - 90.0);
        assert!(model.total_width() >= model.surface_width());

        // Too narrow a surface: the stretch column falls back to its floor.
        model.set_surface_width(200.0);
        assert_eq!(model.width(2), STRETCH_MIN_WIDTH);
        assert!(model.total_width() >= model.surface_width());
    }

    #[test]
    fn resize_is_clamped_to_label_minimum() {
        let mut model = ColumnModel::new(&specs(), |_| 80.0);
        model.set_surface_width(800.0);

        assert_eq!(model.resize(1, 180.0 + 10.0), 120.0);
        assert_eq!(model.resize(1, 180.0 + 300.0), 300.0);
        assert_eq!(model.width(2), 800.0 - 180.0 - 300.0);
    }

    #[test]
    fn width_floor_holds_over_arbitrary_drags() {
        let mut model = ColumnModel::new(&specs(), |label| label.len() as f32 * 7.0);
        model.set_surface_width(640.0);
        let xs = [-500.0, 0.0, 3.0, 90.0, 1200.0, 41.0, -1.0, 260.0];
        for (step, x) in xs.into_iter().enumerate() {
            model.resize(step % 2, x);
            for i in 0..model.len() {
                assert!(model.width(i) >= model.min_width(i), "column {i} after x={x}");
            }
            assert!(model.total_width() >= model.surface_width());
        }
    }

    #[test]
    fn initial_width_below_minimum_is_raised() {
        let specs = [
            ColumnSpec::new("Requested By", 10.0),
            ColumnSpec::new("Action", 100.0),
        ];
        let model = ColumnModel::new(&specs, |_| 90.0);
        assert_eq!(model.width(0), 130.0);
    }

    #[test]
    fn boundary_hit_region_is_centered_on_the_boundary() {
        let mut model = ColumnModel::new(&specs(), |_| 10.0);
        model.set_surface_width(900.0);
        assert_eq!(model.boundary_at(180.0, 18.0), Some(0));
        assert_eq!(model.boundary_at(163.0, 18.0), Some(0));
        assert_eq!(model.boundary_at(197.5, 18.0), Some(0));
        assert_eq!(model.boundary_at(220.0, 18.0), None);
        assert_eq!(model.boundary_at(270.0, 18.0), Some(1));
        // No handle after the stretch column.
        assert_eq!(model.boundary_at(900.0, 18.0), None);
    }

    #[test]
    fn column_at_walks_the_widths() {
        let mut model = ColumnModel::new(&specs(), |_| 10.0);
        model.set_surface_width(900.0);
        assert_eq!(model.column_at(-1.0), None);
        assert_eq!(model.column_at(0.0), Some(0));
        assert_eq!(model.column_at(180.0), Some(1));
        assert_eq!(model.column_at(899.0), Some(2));
        assert_eq!(model.column_at(900.0), None);
    }
}
