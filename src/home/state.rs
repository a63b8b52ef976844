//! Observable home screen state

use crate::core::{DataOrigin, Expense, FinancialSnapshot, TimeRange};
use crate::home::chart::filter_for_range;
use crate::reactive::SharedCombine;
use crate::repository::Repository;
use chrono::{Local, NaiveDate};
use futures::StreamExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const UNKNOWN_ERROR: &str = "Unknown error";

pub type TodayFn = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub is_loading: bool,
    pub snapshot: Option<FinancialSnapshot>,
    /// Expenses of `snapshot` inside `selected_range`, oldest first.
    pub chart_expenses: Vec<Expense>,
    pub selected_range: TimeRange,
    pub error: Option<String>,
    /// `None` until a snapshot has been received, and again after a failure.
    pub data_origin: Option<DataOrigin>,
}

#[derive(Clone)]
pub struct HomeOptions {
    pub initial_range: TimeRange,
    /// How long the chart derivation outlives its last subscriber.
    pub grace_period: Duration,
    pub today: TodayFn,
}

impl Default for HomeOptions {
    fn default() -> Self {
        HomeOptions {
            initial_range: TimeRange::default(),
            grace_period: Duration::from_secs(5),
            today: Arc::new(|| Local::now().date_naive()),
        }
    }
}

fn derive(
    raw: &Option<FinancialSnapshot>,
    range: TimeRange,
    current: &UiState,
    today: NaiveDate,
) -> UiState {
    UiState {
        snapshot: raw.clone(),
        chart_expenses: raw
            .as_ref()
            .map(|s| filter_for_range(&s.expenses, range, today))
            .unwrap_or_default(),
        selected_range: range,
        ..current.clone()
    }
}

/// Owns the home screen state and turns repository results into it.
///
/// Creating the holder starts a local-only load; `reload` refreshes from the
/// network. Must be created inside a Tokio runtime. Dropping the holder
/// cancels in-flight loads and stops the chart derivation.
pub struct HomeStateHolder {
    repository: Repository,
    raw: Arc<watch::Sender<Option<FinancialSnapshot>>>,
    range: watch::Sender<TimeRange>,
    state: SharedCombine<Option<FinancialSnapshot>, TimeRange, UiState>,
    today: TodayFn,
    loads: Mutex<Vec<JoinHandle<()>>>,
    in_flight: Arc<AtomicUsize>,
}

impl HomeStateHolder {
    pub fn new(repository: Repository, options: HomeOptions) -> Self {
        let (raw, raw_rx) = watch::channel(None);
        let (range, range_rx) = watch::channel(options.initial_range);

        let today = Arc::clone(&options.today);
        let initial = UiState {
            is_loading: true,
            selected_range: options.initial_range,
            ..UiState::default()
        };
        let state = SharedCombine::new(
            raw_rx,
            range_rx,
            initial,
            options.grace_period,
            move |raw, range, current| derive(raw, *range, current, today()),
        );

        let holder = Self {
            repository,
            raw: Arc::new(raw),
            range,
            state,
            today: options.today,
            loads: Mutex::new(Vec::new()),
            in_flight: Arc::new(AtomicUsize::new(0)),
        };
        // The first load shows whatever is cached without waiting on the network
        holder.load(true);
        holder
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// The latest state, with the chart derived from the latest inputs even
    /// when nobody is subscribed.
    pub fn current(&self) -> UiState {
        let current = self.state.current().clone();
        let range = *self.range.borrow();
        let raw = self.raw.borrow();
        derive(&raw, range, &current, (self.today)())
    }

    pub fn reload(&self) {
        self.load(false);
    }

    pub fn select_time_range(&self, range: TimeRange) {
        debug!("Selected time range {}", range);
        self.range.send_replace(range);
    }

    /// Waits for every load started so far to finish.
    pub async fn settled(&self) {
        let handles: Vec<JoinHandle<()>> = match self.loads.lock() {
            Ok(mut loads) => loads.drain(..).collect(),
            Err(_) => return,
        };
        for handle in handles {
            if let Err(e) = handle.await {
                debug!("Load task ended abnormally: {}", e);
            }
        }
    }

    fn load(&self, force_local_only: bool) {
        info!(force_local_only, "Loading home data");
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let mut results = self.repository.fetch_snapshot(force_local_only);
        let raw = Arc::clone(&self.raw);
        let ui = self.state.sender();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        let handle = tokio::spawn(async move {
            while let Some(result) = results.next().await {
                match result {
                    Ok(fetched) => {
                        debug!("Received snapshot from {}", fetched.origin);
                        raw.send_replace(Some(fetched.snapshot.cleaned()));
                        ui.send_modify(|s| {
                            s.is_loading = false;
                            s.error = None;
                            s.data_origin = Some(fetched.origin);
                        });
                    }
                    Err(e) => {
                        debug!("Load failed: {}", e);
                        let message = e.to_string();
                        raw.send_replace(None);
                        ui.send_modify(|s| {
                            s.is_loading = false;
                            s.data_origin = None;
                            s.error = Some(if message.is_empty() {
                                UNKNOWN_ERROR.to_string()
                            } else {
                                message
                            });
                        });
                    }
                }
            }
            // Only the last load to finish may end the loading state
            if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                ui.send_if_modified(|s| std::mem::replace(&mut s.is_loading, false));
            }
        });

        if let Ok(mut loads) = self.loads.lock() {
            loads.retain(|h| !h.is_finished());
            loads.push(handle);
        }
    }
}

impl Drop for HomeStateHolder {
    fn drop(&mut self) {
        if let Ok(mut loads) = self.loads.lock() {
            for handle in loads.drain(..) {
                handle.abort();
            }
        }
    }
}
