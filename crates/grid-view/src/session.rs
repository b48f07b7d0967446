//! One grid's records, view state and load lifecycle.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use grid_model::{
    FieldDescriptor, FilterValue, GridConfig, GridSchema, NormalizedRecord, PreferenceStore,
    RawRecord, ResourceStore, SortState, ViewState,
};
use grid_normalize::{NormalizeReport, Normalizer};

use crate::columns::ColumnVisibility;
use crate::fetch::{FetchHandle, FetchUpdate, spawn_fetch};
use crate::filter::{apply_filters, filter_options};
use crate::pagination::{page_strip, paginate};
use crate::sort::sort_records;

// =============================================================================
// LOAD STATE
// =============================================================================

/// Where a grid is in its load lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed; previously loaded records are kept.
    Failed { message: String },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

// =============================================================================
// VIEW
// =============================================================================

/// Computed, render-ready view of a grid.
#[derive(Debug, Clone)]
pub struct GridView<'s> {
    /// Rows of the current page.
    pub rows: Vec<&'s NormalizedRecord>,
    /// Visible columns in catalog order.
    pub columns: Vec<&'s FieldDescriptor>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Rows after filtering.
    pub matching_rows: usize,
    /// Rows loaded before filtering.
    pub loaded_rows: usize,
    pub page_strip: Vec<usize>,
    pub load_state: &'s LoadState,
}

impl GridView<'_> {
    /// Rendered cells of the current page, row by row.
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|record| self.columns.iter().map(|field| field.render(record)).collect())
            .collect()
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// A live resource grid.
///
/// Records are replaced wholesale when a fetch completes. Filter, sort and
/// pagination changes only touch the [`ViewState`]; the view is recomputed
/// from scratch by [`GridSession::view`].
pub struct GridSession {
    schema: Arc<GridSchema>,
    store: Arc<dyn ResourceStore>,
    config: GridConfig,
    records: Vec<NormalizedRecord>,
    report: NormalizeReport,
    state: ViewState,
    columns: ColumnVisibility,
    load_state: LoadState,
    generation: u64,
    pending: Option<FetchHandle>,
    sender: Sender<FetchUpdate>,
    receiver: Receiver<FetchUpdate>,
}

impl GridSession {
    pub fn new(
        schema: Arc<GridSchema>,
        store: Arc<dyn ResourceStore>,
        prefs: &dyn PreferenceStore,
        config: GridConfig,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let columns = ColumnVisibility::load(&schema, prefs);
        Self {
            state: ViewState::with_page_size(config.page_size),
            schema,
            store,
            config,
            records: Vec::new(),
            report: NormalizeReport::default(),
            columns,
            load_state: LoadState::Idle,
            generation: 0,
            pending: None,
            sender,
            receiver,
        }
    }

    pub fn schema(&self) -> &GridSchema {
        &self.schema
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Diagnostics from the most recent load.
    pub fn normalize_report(&self) -> NormalizeReport {
        self.report
    }

    pub fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnVisibility {
        &mut self.columns
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Start a background fetch, superseding any fetch in flight.
    pub fn load(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        self.load_state = LoadState::Loading;
        tracing::debug!(
            resource_type = %self.schema.resource_type,
            generation = self.generation,
            "loading"
        );
        self.pending = Some(spawn_fetch(
            Arc::clone(&self.store),
            self.schema.resource_type.clone(),
            self.generation,
            self.sender.clone(),
        ));
    }

    /// Drop cached data and fetch again.
    pub fn refresh(&mut self) {
        self.store.invalidate(&self.schema.resource_type);
        self.load();
    }

    /// Apply any completed fetch without blocking. Returns whether the session
    /// changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(update) = self.receiver.try_recv() {
            changed |= self.apply_update(update);
        }
        changed
    }

    /// Block until the pending fetch reports or `timeout` elapses. Returns
    /// whether the fetch completed.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(update) => {
                    self.apply_update(update);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.pending.is_none()
    }

    /// Cancel any fetch in flight. Results that arrive afterwards are
    /// discarded.
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        if self.load_state.is_loading() {
            self.load_state = LoadState::Idle;
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    fn apply_update(&mut self, update: FetchUpdate) -> bool {
        if update.generation() != self.generation {
            tracing::debug!(
                resource_type = %self.schema.resource_type,
                stale = update.generation(),
                current = self.generation,
                "discarding superseded fetch"
            );
            return false;
        }
        self.pending = None;
        match update {
            FetchUpdate::Loaded { records, .. } => self.replace_records(&records),
            FetchUpdate::Failed { message, .. } => {
                tracing::warn!(
                    resource_type = %self.schema.resource_type,
                    %message,
                    "fetch failed, keeping previous records"
                );
                self.load_state = LoadState::Failed { message };
            }
        }
        true
    }

    /// Normalize and replace every record.
    pub fn replace_records(&mut self, raws: &[RawRecord]) {
        let (records, report) = Normalizer::new(&self.schema).normalize_all(raws);
        tracing::info!(
            resource_type = %self.schema.resource_type,
            records = report.records,
            diagnostics = report.diagnostics(),
            "records loaded"
        );
        self.records = records;
        self.report = report;
        self.load_state = LoadState::Loaded;
        self.clamp_page();
    }

    // -------------------------------------------------------------------------
    // Interactions
    // -------------------------------------------------------------------------

    pub fn set_search(&mut self, term: &str) {
        self.state.filters.set_term(term);
        self.state.pagination.reset();
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: FilterValue) {
        self.state.filters.set(key, value);
        self.state.pagination.reset();
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear_all();
        self.state.pagination.reset();
    }

    /// Header click on a column.
    pub fn click_sort(&mut self, column: &str) {
        self.state.sort.click(column);
        if self.config.reset_page_on_sort {
            self.state.pagination.reset();
        }
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.state.sort = sort;
        if self.config.reset_page_on_sort {
            self.state.pagination.reset();
        }
    }

    /// Move to `page`, clamped into the pages the current matches span.
    pub fn go_to_page(&mut self, page: i64) {
        self.state.pagination.go_to(page);
        self.clamp_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.pagination.set_page_size(page_size);
    }

    /// Store the page the view would show, so state never names a page
    /// past the end.
    fn clamp_page(&mut self) {
        let count = self.matching_records(Utc::now()).len();
        self.state.pagination.current_page = self.state.pagination.clamped_page(count);
    }

    // -------------------------------------------------------------------------
    // Derived data
    // -------------------------------------------------------------------------

    /// Every matching record in sort order, unpaginated.
    pub fn matching_records(&self, now: DateTime<Utc>) -> Vec<&NormalizedRecord> {
        let filtered = apply_filters(&self.records, &self.schema, &self.state.filters, now);
        sort_records(filtered, &self.schema, &self.state.sort)
    }

    /// Distinct values offered by an exact filter on `field`.
    pub fn filter_options(&self, field: &str) -> Vec<String> {
        filter_options(&self.records, field)
    }

    pub fn visible_fields(&self) -> Vec<&FieldDescriptor> {
        self.columns.visible_fields(&self.schema)
    }

    pub fn view(&self, now: DateTime<Utc>) -> GridView<'_> {
        let matching = self.matching_records(now);
        let page = paginate(&matching, &self.state.pagination);
        GridView {
            rows: page.rows.to_vec(),
            columns: self.visible_fields(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            matching_rows: page.total_rows,
            loaded_rows: self.records.len(),
            page_strip: page_strip(page.current_page, page.total_pages, self.config.page_strip_cap),
            load_state: &self.load_state,
        }
    }
}

impl Drop for GridSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
