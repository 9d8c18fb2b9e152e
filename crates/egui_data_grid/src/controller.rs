//! The grid's state: dataset, filtered view, page cursor and transient pointer state.
//!
//! Everything here is mutated from the UI loop only. The one piece of concurrency,
//! the background fetch, communicates through [`PendingLoad`].

use std::sync::Arc;

use egui::Pos2;

use crate::{
    cell::{ActionButton, ActionsFn, CellValue, Formatter},
    column::{ColumnModel, ColumnSpec},
    layout::GridLayout,
    loader::{FetchFn, LoadPoll, PendingLoad},
    record::{Record, Value},
    search::SearchFilter,
    style::GridMetrics,
};

/// Everything a host supplies to build a grid.
pub struct GridConfig {
    /// Ordered columns. The last one stretches, and holds the action buttons if
    /// [`Self::actions`] is set.
    pub columns: Vec<ColumnSpec>,

    /// Rows per page.
    pub page_size: usize,

    /// Loads the full dataset. Runs on a worker thread.
    pub fetch: FetchFn,

    /// Action buttons for a row.
    pub actions: Option<ActionsFn>,

    /// Fields the search box looks at. Empty means all fields.
    pub search_keys: Vec<String>,

    /// Prompt shown in an empty search box. Also treated as an empty query.
    pub search_placeholder: String,

    /// Optional formatter per column index.
    pub formatters: ahash::HashMap<usize, Formatter>,

    /// Record field shown in each column, by column index.
    pub field_keys: Vec<String>,

    pub metrics: GridMetrics,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            page_size: 12,
            fetch: Arc::new(Vec::<Record>::new),
            actions: None,
            search_keys: Vec::new(),
            search_placeholder: "Search records...".to_owned(),
            formatters: Default::default(),
            field_keys: Vec::new(),
            metrics: GridMetrics::default(),
        }
    }
}

/// The pointer is over this row of the current page, and maybe over one of its buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoverState {
    /// Index within the current page.
    pub row: usize,
    pub button: Option<usize>,
}

/// The transient "Copied!" indicator.
#[derive(Clone, Debug, PartialEq)]
pub struct CopyAck {
    /// Where the pointer was when the cell was copied, in grid coordinates.
    pub anchor: Pos2,

    /// What went to the clipboard.
    pub copied: String,

    /// [`egui::InputState::time`] at which the indicator goes away.
    pub dismiss_at: f64,
}

// ----------------------------------------------------------------------------

/// State and operations of one data grid.
pub struct GridController {
    columns: ColumnModel,
    page_size: usize,
    fetch: FetchFn,
    actions: Option<ActionsFn>,
    formatters: ahash::HashMap<usize, Formatter>,
    field_keys: Vec<String>,
    search: SearchFilter,
    metrics: GridMetrics,

    /// Records of the last completed fetch.
    dataset: Vec<Record>,

    /// Indices into `dataset` matching `query`.
    filtered: Vec<usize>,
    query: String,

    /// Zero-based page number.
    cursor: usize,

    /// The fetch in flight. Holds the single refresh slot until its result is polled.
    pending: Option<PendingLoad>,

    hover: Option<HoverState>,

    /// Column whose right boundary is being dragged.
    drag: Option<usize>,

    copy_ack: Option<CopyAck>,

    /// The body should scroll back to the top on the next frame.
    scroll_reset: bool,

    repaint_requests: u64,
    ctx: Option<egui::Context>,
}

impl GridController {
    pub fn new(config: GridConfig) -> Self {
        let GridConfig {
            columns,
            page_size,
            fetch,
            actions,
            search_keys,
            search_placeholder,
            formatters,
            field_keys,
            metrics,
        } = config;

        if let Some(column) = formatters.keys().find(|&&c| c >= columns.len()) {
            crate::log_or_panic!(
                "Formatter given for column {column}, but the grid has only {} columns",
                columns.len()
            );
        }
        if page_size == 0 {
            crate::log_or_panic!("A grid page must hold at least one row");
        }

        Self {
            columns: ColumnModel::estimated(&columns),
            page_size: page_size.max(1),
            fetch,
            actions,
            formatters,
            field_keys,
            search: SearchFilter::new(search_keys, search_placeholder),
            metrics,
            dataset: Vec::new(),
            filtered: Vec::new(),
            query: String::new(),
            cursor: 0,
            pending: None,
            hover: None,
            drag: None,
            copy_ack: None,
            scroll_reset: false,
            repaint_requests: 0,
            ctx: None,
        }
    }

    /// Forward repaint requests (including fetch completion) to this context.
    pub fn attach_context(&mut self, ctx: &egui::Context) {
        self.ctx = Some(ctx.clone());
    }

    fn request_repaint(&mut self) {
        self.repaint_requests += 1;
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }

    /// How many repaints this grid has asked for so far.
    pub fn repaint_requests(&self) -> u64 {
        self.repaint_requests
    }

    // ------------------------------------------------------------------------
    // Loading

    /// Start fetching in the background, unless a fetch is already running.
    ///
    /// Returns `false` if the call was ignored. Never blocks.
    pub fn refresh(&mut self) -> bool {
        if self.pending.is_some() {
            log::debug!("Refresh ignored: a fetch is already in flight");
            return false;
        }
        log::debug!("Refreshing grid data");
        self.pending = Some(PendingLoad::spawn(self.fetch.clone(), self.ctx.clone()));
        self.request_repaint();
        true
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Pick up a finished fetch, if there is one. Call once per frame.
    ///
    /// Returns `true` if new data was applied.
    pub fn poll_loader(&mut self) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        match pending.poll() {
            LoadPoll::Pending => false,
            LoadPoll::Ready(records) => {
                self.pending = None;
                self.on_data_loaded(records);
                true
            }
        }
    }

    /// Replace the dataset wholesale.
    ///
    /// A fetch still in flight keeps running and keeps [`Self::refresh`] locked out;
    /// its result replaces these records once polled.
    pub fn on_data_loaded(&mut self, records: Vec<Record>) {
        log::debug!("Loaded {} records", records.len());
        self.dataset = records;
        self.apply_search();
    }

    /// Drop records locally, e.g. after an action consumed them, and re-apply the search.
    pub fn retain_records(&mut self, keep: impl FnMut(&Record) -> bool) {
        self.dataset.retain(keep);
        self.apply_search();
    }

    // ------------------------------------------------------------------------
    // Searching and paging

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search(&self) -> &SearchFilter {
        &self.search
    }

    /// Change the search query. Goes back to the first page.
    pub fn set_query(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        self.apply_search();
    }

    fn apply_search(&mut self) {
        self.filtered = self.search.filter(&self.dataset, &self.query);
        self.cursor = 0;
        self.hover = None;
        self.scroll_reset = true;
        self.request_repaint();
    }

    pub fn dataset(&self) -> &[Record] {
        &self.dataset
    }

    /// Indices into [`Self::dataset`] of the records matching the query.
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of pages, at least one even when nothing matches.
    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size).max(1)
    }

    /// Returns `false` (and changes nothing) on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.cursor + 1 >= self.page_count() {
            return false;
        }
        self.cursor += 1;
        self.page_changed();
        true
    }

    /// Returns `false` (and changes nothing) on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.page_changed();
        true
    }

    fn page_changed(&mut self) {
        self.hover = None;
        self.scroll_reset = true;
        self.request_repaint();
    }

    /// Dataset indices of the rows on the current page.
    pub fn page(&self) -> &[usize] {
        let start = (self.cursor * self.page_size).min(self.filtered.len());
        let end = (start + self.page_size).min(self.filtered.len());
        &self.filtered[start..end]
    }

    /// A record on the current page, by its row within the page.
    pub fn page_record(&self, row: usize) -> Option<&Record> {
        self.page().get(row).and_then(|&i| self.dataset.get(i))
    }

    /// "Page 1 of 3".
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.cursor + 1, self.page_count())
    }

    /// "Showing 13–24 of 30 records".
    pub fn records_label(&self) -> String {
        let total = self.filtered.len();
        let start = self.cursor * self.page_size;
        let end = (start + self.page_size).min(total);
        let first = if total > 0 { start + 1 } else { 0 };
        format!("Showing {first}–{end} of {total} records")
    }

    /// Should the body jump back to the top? Resets the flag.
    pub fn take_scroll_reset(&mut self) -> bool {
        std::mem::take(&mut self.scroll_reset)
    }

    // ------------------------------------------------------------------------
    // Columns

    pub fn columns(&self) -> &ColumnModel {
        &self.columns
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    /// Replace the estimated label widths with real measurements.
    pub fn measure_labels(&mut self, measure_label: impl Fn(&str) -> f32) {
        self.columns.remeasure(measure_label);
        self.request_repaint();
    }

    /// The drawing surface changed width. Repaints only if the stretch column changed.
    pub fn set_surface_width(&mut self, surface_width: f32) {
        if self.columns.set_surface_width(surface_width) {
            self.request_repaint();
        }
    }

    /// Drag column `index`'s right boundary to `pointer_x`.
    pub fn resize_column(&mut self, index: usize, pointer_x: f32) {
        let width = self.columns.resize(index, pointer_x);
        log::trace!("Column {index} resized to {width}");
        self.request_repaint();
    }

    /// Geometry of the current page, shared by painting and hit-testing.
    pub fn layout(&self) -> GridLayout {
        let action_column = self
            .actions
            .as_ref()
            .and_then(|_| self.columns.len().checked_sub(1));
        GridLayout::new(
            &self.columns,
            self.metrics,
            self.page_button_counts(),
            action_column,
        )
    }

    /// Is this the trailing column holding the action buttons?
    pub fn is_action_column(&self, column: usize) -> bool {
        self.actions.is_some() && self.columns.is_stretch(column)
    }

    // ------------------------------------------------------------------------
    // Cells and actions

    /// What a cell shows: the field value passed through the column's formatter.
    ///
    /// `None` for action cells and cells outside the page or the field keys.
    pub fn cell_value(&self, row: usize, column: usize) -> Option<CellValue> {
        if self.is_action_column(column) {
            return None;
        }
        let record = self.page_record(row)?;
        let key = self.field_keys.get(column)?;
        let raw = record.get(key).cloned().unwrap_or(Value::Null);
        Some(match self.formatters.get(&column) {
            Some(format) => format(&raw, record),
            None => CellValue::PlainText(raw.to_string()),
        })
    }

    /// The action buttons of a record, empty if the grid has no action column.
    pub fn action_buttons(&self, record: &Record) -> Vec<ActionButton> {
        self.actions.as_ref().map_or_else(Vec::new, |actions| actions(record))
    }

    /// Number of action buttons on each row of the current page.
    pub fn page_button_counts(&self) -> Vec<usize> {
        (0..self.page().len())
            .map(|row| {
                self.page_record(row)
                    .map_or(0, |record| self.action_buttons(record).len())
            })
            .collect()
    }

    /// Click a row's action button. Returns `true` if a callback ran.
    pub fn invoke_action(&self, row: usize, button: usize) -> bool {
        let Some(record) = self.page_record(row) else {
            return false;
        };
        let buttons = self.action_buttons(record);
        match buttons.get(button) {
            Some(action) => {
                log::debug!("Invoking action {:?} on row {row}", action.label);
                action.invoke(record)
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Pointer state

    pub fn hover(&self) -> Option<HoverState> {
        self.hover
    }

    /// Update the hover. Repaints only if it changed; ignored while dragging.
    ///
    /// A hover on a row outside the current page is treated as no hover.
    pub fn set_hover(&mut self, hover: Option<HoverState>) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let hover = hover.filter(|h| h.row < self.page().len());
        if hover == self.hover {
            return false;
        }
        log::trace!("Hover {:?} -> {hover:?}", self.hover);
        self.hover = hover;
        self.request_repaint();
        true
    }

    /// Column currently being resized.
    pub fn drag(&self) -> Option<usize> {
        self.drag
    }

    pub fn start_drag(&mut self, column: usize) {
        log::debug!("Started resizing column {column}");
        self.drag = Some(column);
        self.hover = None;
        self.request_repaint();
    }

    /// Returns `true` if a drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        if self.drag.take().is_some() {
            self.request_repaint();
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------------
    // Copy acknowledgment

    pub fn copy_ack(&self) -> Option<&CopyAck> {
        self.copy_ack.as_ref()
    }

    /// Show the "Copied!" indicator, replacing (and cancelling the dismissal of) any
    /// indicator still showing.
    pub fn show_copy_ack(&mut self, anchor: Pos2, copied: String, now: f64) {
        if let Some(previous) = &self.copy_ack {
            log::trace!("Cancelled pending dismissal at {}", previous.dismiss_at);
        }
        self.copy_ack = Some(CopyAck {
            anchor,
            copied,
            dismiss_at: now + self.metrics.copy_ack_seconds,
        });
        self.request_repaint();
    }

    /// Dismiss the indicator if its time has come. Returns `true` if it went away.
    pub fn expire_copy_ack(&mut self, now: f64) -> bool {
        if self.copy_ack.as_ref().is_some_and(|ack| ack.dismiss_at <= now) {
            self.copy_ack = None;
            self.request_repaint();
            true
        } else {
            false
        }
    }
}

impl std::fmt::Debug for GridController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridController")
            .field("columns", &self.columns)
            .field("records", &self.dataset.len())
            .field("filtered", &self.filtered.len())
            .field("query", &self.query)
            .field("cursor", &self.cursor)
            .field("loading", &self.is_loading())
            .field("hover", &self.hover)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}
