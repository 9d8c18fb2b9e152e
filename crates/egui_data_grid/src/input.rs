//! Turns pointer events into grid state changes.
//!
//! Targets are always resolved against a [`crate::GridLayout`] freshly built from the
//! controller, never against what was painted last frame, so a hit right after a
//! resize lands on the new geometry.

use egui::{CursorIcon, Pos2};

use crate::{
    controller::{GridController, HoverState},
    layout::HitTarget,
};

/// A pointer event in grid coordinates (origin at the top-left of the header band).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer moved without a drag in progress.
    Move(Pos2),

    /// The primary button went down.
    Down(Pos2),

    /// The pointer moved while the primary button is held.
    Drag(Pos2),

    /// The primary button was released.
    Up,

    /// The pointer left the grid surface.
    Leave,
}

/// What the host has to do after an event, beyond the state already changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Put this on the clipboard.
    pub copy: Option<String>,

    /// An action button callback ran.
    pub invoked: bool,

    /// The grid asked for a repaint.
    pub repaint: bool,
}

/// Routes [`PointerEvent`]s to a [`GridController`] and tracks the pointer cursor.
#[derive(Clone, Debug, Default)]
pub struct InputDispatcher {
    cursor: CursorIcon,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cursor to show over the grid.
    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    /// Apply one event. `now` is the UI clock in seconds, used for the copy indicator.
    pub fn dispatch(
        &mut self,
        grid: &mut GridController,
        event: PointerEvent,
        now: f64,
    ) -> DispatchOutcome {
        let repaints_before = grid.repaint_requests();
        let mut outcome = match event {
            PointerEvent::Move(pos) => {
                self.pointer_moved(grid, pos);
                DispatchOutcome::default()
            }
            PointerEvent::Down(pos) => self.pointer_down(grid, pos, now),
            PointerEvent::Drag(pos) => {
                if let Some(column) = grid.drag() {
                    grid.resize_column(column, pos.x);
                } else {
                    self.pointer_moved(grid, pos);
                }
                DispatchOutcome::default()
            }
            PointerEvent::Up => {
                grid.end_drag();
                self.cursor = CursorIcon::Default;
                DispatchOutcome::default()
            }
            PointerEvent::Leave => {
                // A fast drag may leave the surface for a moment; keep it alive.
                if grid.drag().is_none() {
                    grid.set_hover(None);
                    self.cursor = CursorIcon::Default;
                }
                DispatchOutcome::default()
            }
        };
        outcome.repaint = grid.repaint_requests() != repaints_before;
        outcome
    }

    fn pointer_moved(&mut self, grid: &mut GridController, pos: Pos2) {
        if grid.drag().is_some() {
            self.cursor = CursorIcon::ResizeColumn;
            return;
        }
        let layout = grid.layout();
        let target = layout.hit_test(pos);
        let hover = match target {
            HitTarget::Button { row, button } => Some(HoverState {
                row,
                button: Some(button),
            }),
            HitTarget::Cell { row, .. } => Some(HoverState { row, button: None }),
            HitTarget::ColumnBoundary(_) | HitTarget::Header(_) | HitTarget::Nothing => None,
        };
        grid.set_hover(hover);

        self.cursor = match target {
            HitTarget::Button { .. } => CursorIcon::PointingHand,
            HitTarget::ColumnBoundary(_) => CursorIcon::ResizeColumn,
            HitTarget::Header(_) | HitTarget::Cell { .. } | HitTarget::Nothing => {
                CursorIcon::Default
            }
        };
    }

    fn pointer_down(&mut self, grid: &mut GridController, pos: Pos2, now: f64) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        match grid.layout().hit_test(pos) {
            HitTarget::ColumnBoundary(column) => {
                grid.start_drag(column);
                self.cursor = CursorIcon::ResizeColumn;
            }
            HitTarget::Button { row, button } => {
                outcome.invoked = grid.invoke_action(row, button);
            }
            HitTarget::Cell { row, column } => {
                if let Some(value) = grid.cell_value(row, column)
                    && value.is_copyable()
                {
                    let text = value.text().to_owned();
                    grid.show_copy_ack(pos, text.clone(), now);
                    outcome.copy = Some(text);
                }
            }
            // No sorting: header clicks do nothing.
            HitTarget::Header(_) | HitTarget::Nothing => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use egui::pos2;

    use super::*;
    use crate::{
        cell::{ActionButton, CellValue, Formatter, PLACEHOLDER_DASH},
        column::ColumnSpec,
        controller::GridConfig,
        record::{Record, Value},
    };

    const HEADER: f32 = 38.0;
    const ROW: f32 = 42.0;

    fn row_y(row: usize) -> f32 {
        HEADER + row as f32 * ROW + ROW / 2.0
    }

    fn grid_with(clicks: Rc<Cell<usize>>) -> GridController {
        let mut formatters: ahash::HashMap<usize, Formatter> = Default::default();
        formatters.insert(
            1,
            Box::new(|raw: &Value, _: &Record| {
                if raw.is_empty() {
                    CellValue::plain(PLACEHOLDER_DASH)
                } else {
                    CellValue::plain(raw.to_string())
                }
            }),
        );
        let mut grid = GridController::new(GridConfig {
            columns: vec![
                ColumnSpec::new("No", 200.0),
                ColumnSpec::new("Rev", 100.0),
                ColumnSpec::new("Actions", 300.0),
            ],
            field_keys: vec!["no".into(), "rev".into()],
            formatters,
            actions: Some(Box::new(move |_: &Record| {
                let clicks = clicks.clone();
                vec![
                    ActionButton::new("Issue").on_invoke(move |_| clicks.set(clicks.get() + 1)),
                    ActionButton::new("Reject"),
                ]
            })),
            ..Default::default()
        });
        grid.set_surface_width(600.0);
        grid.on_data_loaded(vec![
            Record::new().with("no", "MDI-DRW-101").with("rev", "A.0"),
            Record::new().with("no", "MDI-DRW-105"),
        ]);
        grid
    }

    #[test]
    fn move_repaints_only_when_hover_changes() {
        let mut grid = grid_with(Rc::default());
        let mut input = InputDispatcher::new();

        let first = input.dispatch(&mut grid, PointerEvent::Move(pos2(50.0, row_y(0))), 0.0);
        assert!(first.repaint);
        assert_eq!(grid.hover(), Some(HoverState { row: 0, button: None }));

        let same = input.dispatch(&mut grid, PointerEvent::Move(pos2(120.0, row_y(0) + 5.0)), 0.0);
        assert!(!same.repaint);

        let next = input.dispatch(&mut grid, PointerEvent::Move(pos2(120.0, row_y(1))), 0.0);
        assert!(next.repaint);
        assert_eq!(grid.hover(), Some(HoverState { row: 1, button: None }));
    }

    #[test]
    fn hovering_a_button_records_it() {
        let mut grid = grid_with(Rc::default());
        let mut input = InputDispatcher::new();
        // Buttons: 2 * 85 + 10 = 180 wide, centered in [300, 600] -> [360, 540].
        input.dispatch(&mut grid, PointerEvent::Move(pos2(400.0, row_y(1))), 0.0);
        assert_eq!(grid.hover(), Some(HoverState { row: 1, button: Some(0) }));
        assert_eq!(input.cursor(), CursorIcon::PointingHand);

        input.dispatch(&mut grid, PointerEvent::Move(pos2(500.0, row_y(1))), 0.0);
        assert_eq!(grid.hover(), Some(HoverState { row: 1, button: Some(1) }));
    }

    #[test]
    fn boundary_shows_resize_cursor() {
        let mut grid = grid_with(Rc::default());
        let mut input = InputDispatcher::new();
        input.dispatch(&mut grid, PointerEvent::Move(pos2(210.0, 20.0)), 0.0);
        assert_eq!(input.cursor(), CursorIcon::ResizeColumn);
        assert_eq!(grid.hover(), None);
    }

    #[test]
    fn down_on_boundary_starts_a_drag_and_nothing_else() {
        let mut grid = grid_with(Rc::default());
        let mut input = InputDispatcher::new();
        let outcome = input.dispatch(&mut grid, PointerEvent::Down(pos2(195.0, 10.0)), 0.0);
        assert_eq!(grid.drag(), Some(0));
        assert_eq!(outcome.copy, None);
        assert!(!outcome.invoked);

        input.dispatch(&mut grid, PointerEvent::Drag(pos2(320.0, 10.0)), 0.0);
        assert_eq!(grid.columns().width(0), 320.0);
        // The stretch column gives up what column 0 took.
        assert_eq!(grid.columns().width(2), 600.0 - 320.0 - 100.0);

        input.dispatch(&mut grid, PointerEvent::Drag(pos2(-80.0, 10.0)), 0.0);
        assert_eq!(grid.columns().width(0), grid.columns().min_width(0));

        input.dispatch(&mut grid, PointerEvent::Up, 0.0);
        assert_eq!(grid.drag(), None);
        assert_eq!(input.cursor(), CursorIcon::Default);
    }

    #[test]
    fn hit_testing_follows_a_resize_immediately() {
        let mut grid = grid_with(Rc::default());
        let mut input = InputDispatcher::new();
        input.dispatch(&mut grid, PointerEvent::Down(pos2(200.0, 10.0)), 0.0);
        input.dispatch(&mut grid, PointerEvent::Drag(pos2(400.0, 10.0)), 0.0);
        input.dispatch(&mut grid, PointerEvent::Up, 0.0);

        // x = 350 used to be the action column; now it is column 0.
        let outcome = input.dispatch(&mut grid, PointerEvent::Down(pos2(350.0, row_y(0))), 1.0);
        assert_eq!(outcome.copy.as_deref(), Some("MDI-DRW-101"));
    }

    #[test]
    fn down_on_button_invokes_its_callback_only() {
        let clicks = Rc::new(Cell::new(0));
        let mut grid = grid_with(clicks.clone());
        let mut input = InputDispatcher::new();

        let outcome = input.dispatch(&mut grid, PointerEvent::Down(pos2(400.0, row_y(0))), 0.0);
        assert!(outcome.invoked);
        assert_eq!(outcome.copy, None);
        assert_eq!(clicks.get(), 1);

        // "Reject" has no callback.
        let outcome = input.dispatch(&mut grid, PointerEvent::Down(pos2(500.0, row_y(0))), 0.0);
        assert!(!outcome.invoked);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn down_on_cell_copies_the_formatted_value() {
        let mut grid = grid_with(Rc::default());
        let mut input = InputDispatcher::new();

        let outcome = input.dispatch(&mut grid, PointerEvent::Down(pos2(250.0, row_y(0))), 3.0);
        assert_eq!(outcome.copy.as_deref(), Some("A.0"));
        let ack = grid.copy_ack().cloned();
        assert_eq!(ack.map(|a| (a.copied, a.dismiss_at)), Some(("A.0".to_owned(), 4.5)));

        // Row 1 has no revision; its formatter shows a dash, which is not copied.
        let outcome = input.dispatch(&mut grid, PointerEvent::Down(pos2(250.0, row_y(1))), 3.0);
        assert_eq!(outcome.copy, None);

        // Below the last row.
        let outcome = input.dispatch(&mut grid, PointerEvent::Down(pos2(50.0, row_y(5))), 3.0);
        assert_eq!(outcome.copy, None);

        // Headers are not clickable.
        let outcome = input.dispatch(&mut grid, PointerEvent::Down(pos2(50.0, 10.0)), 3.0);
        assert_eq!(outcome, DispatchOutcome::default());
    }

    #[test]
    fn leave_clears_hover_unless_dragging() {
        let mut grid = grid_with(Rc::default());
        let mut input = InputDispatcher::new();
        input.dispatch(&mut grid, PointerEvent::Move(pos2(50.0, row_y(0))), 0.0);
        let outcome = input.dispatch(&mut grid, PointerEvent::Leave, 0.0);
        assert!(outcome.repaint);
        assert_eq!(grid.hover(), None);

        input.dispatch(&mut grid, PointerEvent::Down(pos2(200.0, 10.0)), 0.0);
        input.dispatch(&mut grid, PointerEvent::Leave, 0.0);
        assert_eq!(grid.drag(), Some(0));
        input.dispatch(&mut grid, PointerEvent::Drag(pos2(260.0, 10.0)), 0.0);
        assert_eq!(grid.columns().width(0), 260.0);
    }

    #[test]
    fn hover_is_frozen_during_a_drag() {
        let mut grid = grid_with(Rc::default());
        let mut input = InputDispatcher::new();
        input.dispatch(&mut grid, PointerEvent::Down(pos2(200.0, 10.0)), 0.0);
        input.dispatch(&mut grid, PointerEvent::Move(pos2(50.0, row_y(1))), 0.0);
        assert_eq!(grid.hover(), None);
        assert_eq!(input.cursor(), CursorIcon::ResizeColumn);
    }
}
