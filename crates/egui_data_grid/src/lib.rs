//! A self-drawn, paged and searchable data grid for [`egui`].
//!
//! The grid owns its own painting, geometric hit-testing, column resizing, paging,
//! searching and background data loading. A listing screen only supplies functions:
//! how to fetch records, which action buttons a row has, how to format a cell.
//!
//! ### Example
//! ```
//! # egui::__run_test_ui(|ui| {
//! use egui_data_grid::{ActionButton, ColumnSpec, DataGridBuilder, Record};
//!
//! let mut grid = DataGridBuilder::new("Drawing Requests")
//!     .column(ColumnSpec::new("Drawing ID", 180.0))
//!     .column(ColumnSpec::new("Status", 130.0))
//!     .column(ColumnSpec::new("Actions", 200.0))
//!     .field_keys(["no", "status"])
//!     .search_keys(["no", "status"])
//!     .fetch(|| vec![Record::new().with("no", "MDI-DRW-101").with("status", "Requested")])
//!     .actions(|_record| vec![ActionButton::new("Issue")])
//!     .build();
//!
//! grid.show(ui);
//! # });
//! ```

mod cell;
mod column;
mod controller;
mod grid;
mod input;
mod layout;
mod loader;
mod record;
mod render;
mod search;
mod style;

pub use crate::{
    cell::{ActionButton, ActionsFn, CellValue, Formatter, PLACEHOLDER_DASH, StyledText},
    column::{ColumnModel, ColumnSpec, MIN_WIDTH_PADDING, STRETCH_MIN_WIDTH},
    controller::{CopyAck, GridConfig, GridController, HoverState},
    grid::{DataGrid, DataGridBuilder},
    input::{DispatchOutcome, InputDispatcher, PointerEvent},
    layout::{GridLayout, HitTarget},
    loader::{FetchFn, LoadPoll, PendingLoad},
    record::{Record, Value},
    render::{content_height, truncate_text},
    search::SearchFilter,
    style::{GridColor, GridMetrics, GridStyle},
};

/// Panic in debug builds, log otherwise.
macro_rules! log_or_panic {
    ($fmt: literal) => {$crate::log_or_panic!($fmt,)};
    ($fmt: literal, $($arg: tt)*) => {{
        if cfg!(debug_assertions) {
            panic!($fmt, $($arg)*);
        } else {
            log::error!($fmt, $($arg)*);
        }
    }};
}
pub(crate) use log_or_panic;
