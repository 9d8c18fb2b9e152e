//! The egui widget: toolbar, grid surface and pager around a [`GridController`].

use std::{sync::Arc, time::Duration};

use egui::{
    Align, Align2, Button, Color32, FontId, Id, Layout, Pos2, Rect, Response, RichText,
    ScrollArea, Sense, TextEdit, Ui, scroll_area::ScrollSource, vec2,
};

use crate::{
    cell::{ActionButton, CellValue},
    column::ColumnSpec,
    controller::{GridConfig, GridController},
    input::{InputDispatcher, PointerEvent},
    record::{Record, Value},
    render,
    style::{GridColor, GridMetrics, GridStyle},
};

/// Height reserved below the grid surface for the pager.
const PAGER_HEIGHT: f32 = 48.0;

/// Builder for a [`DataGrid`].
///
/// The last column stretches to fill the surface. If [`Self::actions`] is set it
/// also holds the per-row action buttons, and [`Self::field_keys`] names the
/// fields of the other columns.
///
/// ### Example
/// ```
/// use egui_data_grid::{CellValue, ColumnSpec, DataGridBuilder, Record};
///
/// let grid = DataGridBuilder::new("Users")
///     .columns([ColumnSpec::new("Username", 200.0), ColumnSpec::new("Department", 300.0)])
///     .field_keys(["username", "department"])
///     .formatter(1, |value, _record| {
///         if value.is_empty() { CellValue::plain("—") } else { CellValue::plain(value.to_string()) }
///     })
///     .page_size(12)
///     .load_on_show(false)
///     .build();
/// assert_eq!(grid.controller().page_label(), "Page 1 of 1");
/// ```
pub struct DataGridBuilder {
    title: String,
    id_salt: Id,
    config: GridConfig,
    style: GridStyle,
    load_on_show: bool,
}

impl DataGridBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id_salt: Id::new(&title),
            title,
            config: GridConfig::default(),
            style: GridStyle::default(),
            load_on_show: true,
        }
    }

    /// Give this grid a unique id within the parent [`Ui`].
    ///
    /// Needed only if two grids share a title in the same [`Ui`].
    #[inline]
    pub fn id_salt(mut self, id_salt: impl std::hash::Hash) -> Self {
        self.id_salt = Id::new(id_salt);
        self
    }

    /// Add one column.
    #[inline]
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.config.columns.push(column);
        self
    }

    /// Add several columns at once.
    #[inline]
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnSpec>) -> Self {
        self.config.columns.extend(columns);
        self
    }

    /// Rows per page. Default: 12.
    #[inline]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// How to load the records. Runs on a worker thread, so it may block.
    ///
    /// It should close over the handle it reads from, and return an empty list if
    /// loading fails.
    #[inline]
    pub fn fetch(mut self, fetch: impl Fn() -> Vec<Record> + Send + Sync + 'static) -> Self {
        self.config.fetch = Arc::new(fetch);
        self
    }

    /// The action buttons of a row.
    #[inline]
    pub fn actions(mut self, actions: impl Fn(&Record) -> Vec<ActionButton> + 'static) -> Self {
        self.config.actions = Some(Box::new(actions));
        self
    }

    /// Fields the search box looks at. Default: all fields.
    #[inline]
    pub fn search_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config.search_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.search_placeholder = placeholder.into();
        self
    }

    /// Custom text and style for the cells of one column.
    #[inline]
    pub fn formatter(
        mut self,
        column: usize,
        format: impl Fn(&Value, &Record) -> CellValue + 'static,
    ) -> Self {
        self.config.formatters.insert(column, Box::new(format));
        self
    }

    /// The record field shown in each column, by column index.
    #[inline]
    pub fn field_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config.field_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn metrics(mut self, metrics: GridMetrics) -> Self {
        self.config.metrics = metrics;
        self
    }

    #[inline]
    pub fn style(mut self, style: GridStyle) -> Self {
        self.style = style;
        self
    }

    /// Start loading the first time the grid is shown. Default: `true`.
    #[inline]
    pub fn load_on_show(mut self, load_on_show: bool) -> Self {
        self.load_on_show = load_on_show;
        self
    }

    pub fn build(self) -> DataGrid {
        let Self {
            title,
            id_salt,
            config,
            style,
            load_on_show,
        } = self;
        DataGrid {
            title,
            id_salt,
            controller: GridController::new(config),
            dispatcher: InputDispatcher::new(),
            style,
            search_text: String::new(),
            load_on_show,
            started: false,
            pointer_inside: false,
            body_rect: Rect::NOTHING,
        }
    }
}

// ----------------------------------------------------------------------------

/// Primary-button state for one frame, in grid coordinates.
#[derive(Clone, Copy, Debug, Default)]
struct PointerSnapshot {
    pos: Option<Pos2>,

    /// The pointer is over the visible part of the grid surface.
    inside: bool,
    pressed: bool,
    down: bool,
    released: bool,
}

/// A paged, searchable, self-drawn data grid. Create with [`DataGridBuilder`].
///
/// ### Removing records after an action
/// Action callbacks cannot reach the grid. Hand the record back through shared state
/// and drop it once [`Self::show`] reports a change:
/// ```
/// # egui::__run_test_ui(|ui| {
/// use std::{cell::RefCell, rc::Rc};
/// use egui_data_grid::{ActionButton, ColumnSpec, DataGridBuilder, Record};
///
/// let issued = Rc::new(RefCell::new(Vec::<String>::new()));
/// let mut grid = DataGridBuilder::new("Drawing Issuance")
///     .columns([ColumnSpec::new("Drawing ID", 180.0), ColumnSpec::new("Actions", 200.0)])
///     .field_keys(["no"])
///     .actions({
///         let issued = issued.clone();
///         move |_record: &Record| {
///             let issued = issued.clone();
///             vec![ActionButton::new("Issue").on_invoke(move |record: &Record| {
///                 issued.borrow_mut().push(record.text("no"));
///             })]
///         }
///     })
///     .load_on_show(false)
///     .build();
///
/// if grid.show(ui).changed() {
///     let issued = issued.take();
///     grid.controller_mut()
///         .retain_records(|record: &Record| !issued.contains(&record.text("no")));
/// }
/// # });
/// ```
pub struct DataGrid {
    title: String,
    id_salt: Id,
    controller: GridController,
    dispatcher: InputDispatcher,
    style: GridStyle,

    /// Contents of the search box.
    search_text: String,
    load_on_show: bool,

    /// Set after the first [`Self::show`].
    started: bool,
    pointer_inside: bool,

    /// Visible part of the scrolling body, scroll bars excluded, as of the last frame.
    body_rect: Rect,
}

impl DataGrid {
    pub fn controller(&self) -> &GridController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GridController {
        &mut self.controller
    }

    /// Reload the records in the background. Ignored while a load is running.
    pub fn refresh(&mut self) -> bool {
        self.controller.refresh()
    }

    pub fn next_page(&mut self) -> bool {
        self.controller.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.controller.prev_page()
    }

    /// Set the search query as if typed into the search box.
    pub fn set_query(&mut self, query: &str) {
        query.clone_into(&mut self.search_text);
        self.controller.set_query(query);
    }

    /// Show toolbar, grid and pager.
    ///
    /// Returns the response of the grid surface, marked as changed if an action
    /// button ran this frame.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        if !self.started {
            self.start(ui);
        }
        self.controller.poll_loader();

        let now = ui.input(|i| i.time);
        self.controller.expire_copy_ack(now);
        if let Some(ack) = self.controller.copy_ack() {
            ui.ctx()
                .request_repaint_after(Duration::from_secs_f64((ack.dismiss_at - now).max(0.0)));
        }

        self.toolbar(ui);
        ui.add_space(8.0);
        let response = self.surface(ui, now);
        self.pager(ui);
        response
    }

    fn start(&mut self, ui: &Ui) {
        self.started = true;
        self.controller.attach_context(ui.ctx());

        let painter = ui.painter();
        let font = self.style.header_font.clone();
        self.controller.measure_labels(|label| {
            painter
                .layout_no_wrap(label.to_owned(), font.clone(), Color32::PLACEHOLDER)
                .size()
                .x
        });

        if self.load_on_show {
            self.controller.refresh();
        }
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        let Self {
            title,
            controller,
            search_text,
            ..
        } = self;
        ui.horizontal(|ui| {
            ui.heading(title.as_str());
            ui.add_space(20.0);
            if ui
                .add_enabled(!controller.is_loading(), Button::new("Refresh"))
                .clicked()
            {
                controller.refresh();
            }
            if controller.is_loading() {
                ui.spinner();
            }
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let placeholder = controller.search().placeholder().to_owned();
                let edit = ui.add(
                    TextEdit::singleline(search_text)
                        .hint_text(placeholder)
                        .desired_width(220.0),
                );
                if edit.changed() {
                    controller.set_query(search_text);
                }
            });
        });
    }

    fn surface(&mut self, ui: &mut Ui, now: f64) -> Response {
        let metrics = *self.controller.metrics();
        let max_height = (ui.available_height() - PAGER_HEIGHT)
            .max(metrics.header_height + metrics.row_height);
        let surface_width = ui.available_width() - ui.spacing().scroll.allocated_width();
        self.controller.set_surface_width(surface_width);

        let mut scroll_area = ScrollArea::both()
            .id_salt(ui.id().with(self.id_salt).with("__grid_body"))
            .auto_shrink([false, false])
            .max_height(max_height)
            .scroll_source(ScrollSource {
                drag: false,
                ..Default::default()
            });
        if self.controller.take_scroll_reset() {
            scroll_area = scroll_area.vertical_scroll_offset(0.0);
        }

        let output = scroll_area.show_viewport(ui, |ui, viewport| {
            // `viewport` excludes the space taken by scroll bars.
            let layout = self.controller.layout();
            let size = vec2(
                layout.total_width(),
                render::content_height(&layout, viewport.height()),
            );
            let (rect, mut response) = ui.allocate_exact_size(size, Sense::click_and_drag());

            let inside = response.contains_pointer();
            let pointer = ui.input(|i| PointerSnapshot {
                pos: i.pointer.latest_pos().map(|p| (p - rect.min).to_pos2()),
                inside,
                pressed: i.pointer.primary_pressed(),
                down: i.pointer.primary_down(),
                released: i.pointer.primary_released(),
            });
            if self.handle_pointer(ui, pointer, now) {
                response.mark_changed();
            }

            // Input may have resized a column or changed the hover: lay out again.
            let layout = self.controller.layout();
            let painter = ui.painter_at(ui.clip_rect());
            painter.rect_filled(rect, 0.0, self.style.color(GridColor::Background));
            render::paint_grid(&painter, rect.min, &layout, &self.controller, &self.style);
            response
        });
        self.body_rect = output.inner_rect;

        if self.controller.is_loading() {
            ui.painter().text(
                self.body_rect.center(),
                Align2::CENTER_CENTER,
                "Loading data...",
                FontId::proportional(16.0),
                self.style.color(GridColor::HeaderText),
            );
        }
        output.inner
    }

    /// Returns `true` if an action button ran.
    fn handle_pointer(&mut self, ui: &Ui, pointer: PointerSnapshot, now: f64) -> bool {
        let mut invoked = false;
        for event in self.pointer_events(pointer) {
            let outcome = self.dispatcher.dispatch(&mut self.controller, event, now);
            invoked |= outcome.invoked;
            if let Some(text) = outcome.copy {
                log::trace!("Copying {text:?} to the clipboard");
                ui.ctx().copy_text(text);
            }
        }
        if pointer.inside || self.controller.drag().is_some() {
            ui.ctx().set_cursor_icon(self.dispatcher.cursor());
        }
        invoked
    }

    /// Derive this frame's [`PointerEvent`]s from the button state.
    fn pointer_events(&mut self, pointer: PointerSnapshot) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        if let Some(pos) = pointer.pos {
            if self.controller.drag().is_some() && pointer.down {
                events.push(PointerEvent::Drag(pos));
            } else if pointer.inside {
                events.push(PointerEvent::Move(pos));
            }
            if pointer.pressed && pointer.inside {
                events.push(PointerEvent::Down(pos));
            }
        }
        if pointer.released {
            events.push(PointerEvent::Up);
        }
        if self.pointer_inside && !pointer.inside {
            events.push(PointerEvent::Leave);
        }
        self.pointer_inside = pointer.inside;
        events
    }

    fn pager(&mut self, ui: &mut Ui) {
        let controller = &mut self.controller;
        ui.allocate_ui_with_layout(
            vec2(ui.available_width(), PAGER_HEIGHT),
            Layout::left_to_right(Align::Center),
            |ui| {
                if ui.button("◀ Previous").clicked() {
                    controller.prev_page();
                }
                ui.add_space(24.0);
                ui.label(RichText::new(controller.page_label()).strong());
                ui.add_space(24.0);
                if ui.button("Next ▶").clicked() {
                    controller.next_page();
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.add_space(16.0);
                    ui.label(RichText::new(controller.records_label()).small());
                });
            },
        );
    }
}

impl std::fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("title", &self.title)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}
