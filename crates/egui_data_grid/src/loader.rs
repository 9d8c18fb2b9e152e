//! Runs the host's blocking fetch on a worker thread and hands the result back
//! to the UI loop through a channel.

use std::sync::{
    Arc,
    mpsc::{self, Receiver, TryRecvError},
};

use crate::record::Record;

/// The host's fetch function.
///
/// It may block on I/O, so it always runs off the UI thread. It is expected to handle
/// its own failures and return an empty list instead.
pub type FetchFn = Arc<dyn Fn() -> Vec<Record> + Send + Sync>;

/// What [`PendingLoad::poll`] found.
#[derive(Debug, PartialEq)]
pub enum LoadPoll {
    /// The worker is still fetching.
    Pending,

    /// The fetch finished.
    Ready(Vec<Record>),
}

/// A fetch running on a worker thread.
///
/// The worker only computes and sends; all state changes happen on whoever polls.
#[derive(Debug)]
pub struct PendingLoad {
    rx: Receiver<Vec<Record>>,
}

impl PendingLoad {
    /// Start `fetch` on a new worker thread.
    ///
    /// `waker` gets a repaint request once the result is ready, so an idle UI
    /// notices the completion without polling on a timer.
    pub fn spawn(fetch: FetchFn, waker: Option<egui::Context>) -> Self {
        let (tx, rx) = mpsc::channel();
        let spawned = std::thread::Builder::new()
            .name("data_grid_fetch".to_owned())
            .spawn(move || {
                let records = fetch();
                log::debug!("Fetched {} records", records.len());
                if tx.send(records).is_err() {
                    log::debug!("Grid dropped before its fetch finished");
                }
                if let Some(ctx) = waker {
                    ctx.request_repaint();
                }
            });
        if let Err(err) = spawned {
            // The sender was dropped along with the closure, so the next poll
            // resolves to an empty dataset.
            log::error!("Failed to spawn fetch thread: {err}");
        }
        Self { rx }
    }

    /// Check for a result without blocking.
    ///
    /// A worker that died without sending (a panicking fetch) counts as an empty result.
    pub fn poll(&self) -> LoadPoll {
        match self.rx.try_recv() {
            Ok(records) => LoadPoll::Ready(records),
            Err(TryRecvError::Empty) => LoadPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Fetch worker exited without a result; showing an empty table");
                LoadPoll::Ready(Vec::new())
            }
        }
    }
}
