//! End-to-end behavior of a grid through its public API, without a UI.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    time::{Duration, Instant},
};

use egui::pos2;
use egui_data_grid::{
    ActionButton, CellValue, ColumnModel, ColumnSpec, GridConfig, GridController, HoverState,
    InputDispatcher, PointerEvent, Record,
};

fn drawings(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|i| {
            let status = if i % 6 == 0 { "Approved" } else { "Requested" };
            Record::new()
                .with("no", format!("MDI-DRW-{i:03}"))
                .with("rev", "A.0")
                .with("status", status)
        })
        .collect()
}

fn config() -> GridConfig {
    GridConfig {
        columns: vec![
            ColumnSpec::new("Drawing ID", 180.0),
            ColumnSpec::new("Revision", 90.0),
            ColumnSpec::new("Status", 130.0),
            ColumnSpec::new("Actions", 200.0),
        ],
        field_keys: vec!["no".into(), "rev".into(), "status".into()],
        search_keys: vec!["no".into(), "status".into()],
        actions: Some(Box::new(|_: &Record| vec![ActionButton::new("Issue")])),
        ..Default::default()
    }
}

fn loaded(n: usize) -> GridController {
    let mut grid = GridController::new(config());
    grid.set_surface_width(800.0);
    grid.on_data_loaded(drawings(n));
    grid
}

fn wait_for_load(grid: &mut GridController) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !grid.poll_loader() {
        assert!(Instant::now() < deadline, "fetch never completed");
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn paging_stops_at_the_last_page() {
    let mut grid = loaded(30);
    assert_eq!(grid.page_label(), "Page 1 of 3");
    assert_eq!(grid.page().len(), 12);

    assert!(grid.next_page());
    assert!(grid.next_page());
    assert!(!grid.next_page());
    assert_eq!(grid.page_label(), "Page 3 of 3");
    assert_eq!(grid.page().len(), 6);
    assert_eq!(grid.records_label(), "Showing 25–30 of 30 records");

    assert!(grid.prev_page());
    assert!(grid.prev_page());
    assert!(!grid.prev_page());
    assert_eq!(grid.cursor(), 0);
}

#[test]
fn search_is_case_insensitive_and_resets_paging() {
    let mut grid = loaded(30);
    grid.next_page();
    grid.set_query("approved");
    assert_eq!(grid.filtered().len(), 5);
    assert_eq!(grid.page_label(), "Page 1 of 1");
    assert!(grid.take_scroll_reset());
    assert!(!grid.take_scroll_reset());

    grid.set_query("  APPROVED ");
    assert_eq!(grid.filtered().len(), 5);

    grid.set_query("");
    assert_eq!(grid.filtered().len(), 30);

    // The placeholder itself never filters.
    let placeholder = grid.search().placeholder().to_owned();
    grid.set_query(&placeholder);
    assert_eq!(grid.filtered().len(), 30);
}

#[test]
fn dragging_a_boundary_sets_the_width_and_respects_the_floor() {
    let specs = [
        ColumnSpec::new("Drawing ID", 180.0),
        ColumnSpec::new("Actions", 200.0),
    ];
    let mut columns = ColumnModel::new(&specs, |_| 80.0);
    columns.set_surface_width(1000.0);
    assert_eq!(columns.min_width(0), 120.0);

    assert_eq!(columns.resize(0, 500.0), 500.0);
    assert_eq!(columns.width(0), 500.0);
    assert_eq!(columns.width(1), 500.0);

    assert_eq!(columns.resize(0, 20.0), 120.0);
    assert!(columns.width(1) >= 150.0);
}

#[test]
fn copy_indicator_shows_one_at_a_time() {
    let mut grid = loaded(30);
    let mut input = InputDispatcher::new();
    let layout = grid.layout();
    let first = layout.cell_rect(0, 0).center();
    let second = layout.cell_rect(1, 0).center();

    let outcome = input.dispatch(&mut grid, PointerEvent::Down(first), 0.0);
    assert_eq!(outcome.copy.as_deref(), Some("MDI-DRW-001"));
    let outcome = input.dispatch(&mut grid, PointerEvent::Down(second), 0.3);
    assert_eq!(outcome.copy.as_deref(), Some("MDI-DRW-002"));

    // The first indicator's dismissal was cancelled by the second.
    assert!(!grid.expire_copy_ack(1.5));
    let ack = grid.copy_ack().map(|ack| (ack.anchor, ack.copied.clone()));
    assert_eq!(ack, Some((second, "MDI-DRW-002".to_owned())));

    assert!(grid.expire_copy_ack(1.81));
    assert!(grid.copy_ack().is_none());
}

#[test]
fn refresh_is_single_flight() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let release_rx = Mutex::new(release_rx);
    let mut grid = GridController::new(GridConfig {
        fetch: Arc::new({
            let calls = calls.clone();
            move || -> Vec<Record> {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Ok(rx) = release_rx.lock() {
                    rx.recv().ok();
                }
                drawings(7)
            }
        }),
        ..config()
    });

    assert!(grid.refresh());
    assert!(grid.is_loading());
    assert!(!grid.refresh());

    release_tx.send(()).ok();
    wait_for_load(&mut grid);
    assert!(!grid.is_loading());
    assert_eq!(grid.dataset().len(), 7);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Once idle, a refresh runs again.
    assert!(grid.refresh());
    release_tx.send(()).ok();
    wait_for_load(&mut grid);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn seeding_records_mid_fetch_keeps_the_refresh_slot() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let release_rx = Mutex::new(release_rx);
    let mut grid = GridController::new(GridConfig {
        fetch: Arc::new({
            let calls = calls.clone();
            move || -> Vec<Record> {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Ok(rx) = release_rx.lock() {
                    rx.recv().ok();
                }
                drawings(9)
            }
        }),
        ..config()
    });

    assert!(grid.refresh());
    grid.on_data_loaded(drawings(2));
    assert_eq!(grid.dataset().len(), 2);
    assert!(grid.is_loading());
    assert!(!grid.refresh());

    release_tx.send(()).ok();
    wait_for_load(&mut grid);
    assert!(!grid.is_loading());
    assert_eq!(grid.dataset().len(), 9);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_fetch_shows_an_empty_grid() {
    let mut grid = GridController::new(GridConfig {
        fetch: Arc::new(|| -> Vec<Record> { panic!("connection refused") }),
        ..config()
    });
    grid.refresh();
    wait_for_load(&mut grid);
    assert!(grid.dataset().is_empty());
    assert_eq!(grid.page_label(), "Page 1 of 1");
    assert_eq!(grid.records_label(), "Showing 0–0 of 0 records");
}

#[test]
fn hover_never_points_past_the_page() {
    let mut grid = loaded(14);
    grid.next_page();
    assert_eq!(grid.page().len(), 2);
    assert!(!grid.set_hover(Some(HoverState { row: 5, button: None })));
    assert_eq!(grid.hover(), None);

    let mut input = InputDispatcher::new();
    let below = pos2(10.0, grid.layout().rows_bottom() + 5.0);
    input.dispatch(&mut grid, PointerEvent::Move(below), 0.0);
    assert_eq!(grid.hover(), None);
}

#[test]
fn action_buttons_see_their_record() {
    let issued = Arc::new(Mutex::new(Vec::new()));
    let mut grid = GridController::new(GridConfig {
        actions: Some(Box::new({
            let issued = issued.clone();
            move |_: &Record| {
                let issued = issued.clone();
                vec![ActionButton::new("Issue").on_invoke(move |record: &Record| {
                    if let Ok(mut issued) = issued.lock() {
                        issued.push(record.text("no"));
                    }
                })]
            }
        })),
        ..config()
    });
    grid.set_surface_width(800.0);
    grid.on_data_loaded(drawings(3));

    let mut input = InputDispatcher::new();
    let button = grid.layout().button_rects(2)[0].center();
    let outcome = input.dispatch(&mut grid, PointerEvent::Down(button), 0.0);
    assert!(outcome.invoked);
    assert_eq!(outcome.copy, None);
    let issued = issued.lock().map(|v| v.clone()).unwrap_or_default();
    assert_eq!(issued, vec!["MDI-DRW-003".to_owned()]);
}

#[test]
fn formatter_placeholder_is_not_copied() {
    let mut config = config();
    config.formatters.insert(
        1,
        Box::new(|value: &egui_data_grid::Value, _: &Record| {
            if value.is_empty() {
                CellValue::plain(egui_data_grid::PLACEHOLDER_DASH)
            } else {
                CellValue::plain(value.to_string())
            }
        }),
    );
    let mut grid = GridController::new(config);
    grid.set_surface_width(800.0);
    grid.on_data_loaded(vec![Record::new().with("no", "MDI-DRW-101")]);

    assert_eq!(
        grid.cell_value(0, 1).map(|v| v.text().to_owned()).as_deref(),
        Some("—")
    );
    let mut input = InputDispatcher::new();
    let cell = grid.layout().cell_rect(0, 1).center();
    let outcome = input.dispatch(&mut grid, PointerEvent::Down(cell), 0.0);
    assert_eq!(outcome.copy, None);
    assert!(grid.copy_ack().is_none());
}
