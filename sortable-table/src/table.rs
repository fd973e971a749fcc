//! The sortable, infinitely scrolling table.

use std::fmt;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockWriteGuard;

use log::debug;
use log::trace;
use log::warn;

use crate::config::SortMode;
use crate::config::TableConfig;
use crate::error::Error;
use crate::error::Result;
use crate::model::ColumnSpec;
use crate::model::Row;
use crate::model::find_column;
use crate::model::validate_columns;
use crate::pagination::LoadOutcome;
use crate::pagination::LoadState;
use crate::pagination::Pagination;
use crate::pagination::Window;
use crate::render::NullSink;
use crate::render::RenderSink;
use crate::scroll::ScrollGeometry;
use crate::scroll::ScrollOutcome;
use crate::scroll::ScrollTrigger;
use crate::sort::SortState;
use crate::sort::sort_rows;
use crate::source::Filters;
use crate::source::PageRequest;
use crate::source::RowSource;

/// Result of a header activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// The column is not sortable; nothing changed.
    Ignored,
    /// Loaded rows were re-sorted in memory.
    Sorted(SortState),
    /// A page is in flight; the activation was dropped.
    Busy,
    /// The first page was re-queried under the new sort.
    Loaded(SortState, LoadOutcome),
    /// The table has been torn down.
    Discarded,
}

/// Result of a filter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A page is in flight; the change was dropped.
    Busy,
    /// The table has been torn down.
    Discarded,
    /// The first page was re-queried.
    Loaded(LoadOutcome),
}

/// Mutable view state, guarded by one lock.
struct TableInner {
    pagination: Pagination,
    sort: SortState,
    filters: Filters,
    sink: Box<dyn RenderSink>,
    destroyed: bool,
}

impl TableInner {
    fn begin_load(&mut self) -> LoadState {
        let previous = self.pagination.begin();
        self.sink.set_loading(true);
        previous
    }

    fn request(&self, sort: SortState, window: Window) -> PageRequest {
        PageRequest::new(sort, window).with_filters(self.filters.clone())
    }
}

/// A sortable table backed by a remote row source.
///
/// `SortableTable` owns the loaded rows, the active sort and the pagination
/// window, and reacts to three kinds of input:
/// - header activations ([`on_header_activated`](Self::on_header_activated)),
///   which sort in memory or re-query the source depending on [`SortMode`],
/// - scroll events ([`on_scroll`](Self::on_scroll)), which append the next
///   page when the table bottom nears the viewport bottom,
/// - filter changes ([`set_filters`](Self::set_filters)), which reload the
///   first page.
///
/// At most one page is in flight at a time: the loading flag is checked and
/// set under the same write lock, and the lock is released while the source
/// is awaited. Every view update (rows, sort marker, loading flag) reaches
/// the [`RenderSink`] from inside that lock.
///
/// The handle is cheap to clone; clones share state.
///
/// # Example
///
/// ```ignore
/// let source = Arc::new(HttpRowSource::builder("api/rest/products").build()?);
/// let table = SortableTable::new(columns, TableConfig::default(), source)?
///     .with_sink(HtmlRenderer::new(columns.clone()));
///
/// table.load_first_page().await?;
/// table.on_header_activated("price").await?;
/// table.on_scroll(ScrollGeometry::new(table_bottom, viewport_height)).await?;
/// ```
#[derive(Clone)]
pub struct SortableTable {
    columns: Arc<[ColumnSpec]>,
    source: Arc<dyn RowSource>,
    sort_mode: SortMode,
    trigger: ScrollTrigger,
    inner: Arc<RwLock<TableInner>>,
}

impl SortableTable {
    /// Create a table with no rows loaded yet.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateColumn`] if two columns share an id.
    /// - [`Error::InvalidPageSize`] if the page size is zero.
    /// - [`Error::UnknownColumn`] if the initial sort names an unknown column.
    /// - [`Error::ColumnNotSortable`] if the initial sort names a column that
    ///   is not sortable.
    /// - [`Error::NoSortableColumn`] if no initial sort is configured and no
    ///   column is sortable.
    pub fn new(
        columns: Vec<ColumnSpec>,
        config: TableConfig,
        source: Arc<dyn RowSource>,
    ) -> Result<Self> {
        validate_columns(&columns)?;

        if config.page_size == 0 {
            return Err(Error::InvalidPageSize(config.page_size));
        }

        let sort = match config.initial_sort {
            Some(sort) => {
                if !find_column(&columns, &sort.column_id)?.sortable {
                    return Err(Error::ColumnNotSortable(sort.column_id));
                }
                sort
            }
            None => columns
                .iter()
                .find(|column| column.sortable)
                .map(|column| SortState::asc(column.id.clone()))
                .ok_or(Error::NoSortableColumn)?,
        };

        let inner = TableInner {
            pagination: Pagination::new(Window::new(config.start, config.page_size)),
            sort,
            filters: config.filters,
            sink: Box::new(NullSink),
            destroyed: false,
        };

        Ok(Self {
            columns: columns.into(),
            source,
            sort_mode: config.sort_mode,
            trigger: ScrollTrigger::new(config.scroll_threshold),
            inner: Arc::new(RwLock::new(inner)),
        })
    }

    /// Set the render sink.
    pub fn with_sink(self, sink: impl RenderSink + 'static) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.sink = Box::new(sink);
        }
        self
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Column definitions.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// The sorting strategy.
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Loaded rows in display order.
    pub fn rows(&self) -> Vec<Row> {
        self.inner
            .read()
            .map(|g| g.pagination.rows().to_vec())
            .unwrap_or_default()
    }

    /// Number of loaded rows.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .map(|g| g.pagination.rows().len())
            .unwrap_or(0)
    }

    /// Returns `true` if no rows are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The active sort.
    pub fn sort_state(&self) -> Option<SortState> {
        self.inner.read().ok().map(|g| g.sort.clone())
    }

    /// The current load state.
    pub fn load_state(&self) -> LoadState {
        self.inner
            .read()
            .map(|g| g.pagination.load_state())
            .unwrap_or_default()
    }

    /// The next window the scroll trigger will request.
    pub fn window(&self) -> Option<Window> {
        self.inner.read().ok().map(|g| g.pagination.window())
    }

    /// Filters sent with every request.
    pub fn filters(&self) -> Filters {
        self.inner
            .read()
            .map(|g| g.filters.clone())
            .unwrap_or_default()
    }

    /// Returns `true` once [`destroy`](Self::destroy) was called.
    pub fn is_destroyed(&self) -> bool {
        self.inner.read().map(|g| g.destroyed).unwrap_or(true)
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Fetch one page and merge it into the data set.
    ///
    /// `append` concatenates a non-empty page to the loaded rows and keeps
    /// the active sort. Otherwise the page replaces the rows, and the
    /// request's sort and filters become the active ones. An empty page marks
    /// the table exhausted and leaves everything else alone.
    ///
    /// This does not check whether another page is in flight; use
    /// [`on_scroll`](Self::on_scroll) for admission-controlled loading.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownColumn`] if the request sorts on an unknown column.
    /// - Any error from the source. Rows, window and load state are left as
    ///   they were before the call.
    pub async fn load(&self, request: PageRequest, append: bool) -> Result<LoadOutcome> {
        find_column(&self.columns, &request.sort.column_id)?;

        let previous = {
            let Some(mut guard) = self.live() else {
                return Ok(LoadOutcome::Discarded);
            };
            if guard.pagination.is_loading() {
                warn!("Loading {} while another page is in flight", request.window);
            }
            guard.begin_load()
        };

        self.fetch_and_merge(request, previous, append).await
    }

    /// Load the configured first window, replacing any loaded rows.
    pub async fn load_first_page(&self) -> Result<LoadOutcome> {
        let request = {
            let Some(guard) = self.live() else {
                return Ok(LoadOutcome::Discarded);
            };
            guard.request(guard.sort.clone(), guard.pagination.window())
        };
        self.load(request, false).await
    }

    /// Handle a viewport scroll event.
    ///
    /// When the table bottom is within the scroll threshold of the viewport
    /// bottom, no page is in flight and the source is not exhausted, the next
    /// window is requested under the active sort and appended.
    ///
    /// Repeated events while a page is in flight return
    /// [`ScrollOutcome::Busy`] without touching the source.
    pub async fn on_scroll(&self, geometry: ScrollGeometry) -> Result<ScrollOutcome> {
        let (request, previous) = {
            let Some(mut guard) = self.live() else {
                return Ok(ScrollOutcome::Discarded);
            };
            if let Some(outcome) = self.trigger.check(guard.pagination.load_state(), geometry) {
                trace!("Scroll ignored: {:?}", outcome);
                return Ok(outcome);
            }
            let request = guard.request(guard.sort.clone(), guard.pagination.window());
            (request, guard.begin_load())
        };

        let outcome = self.fetch_and_merge(request, previous, true).await?;
        Ok(ScrollOutcome::Loaded(outcome))
    }

    /// Replace the filters and reload the first page under them.
    ///
    /// Clears exhaustion. The new filters are kept only once a non-empty
    /// page arrives for them.
    pub async fn set_filters(&self, filters: Filters) -> Result<ReloadOutcome> {
        let (request, previous) = {
            let Some(mut guard) = self.live() else {
                return Ok(ReloadOutcome::Discarded);
            };
            if guard.pagination.is_loading() {
                debug!("Filter change dropped, page in flight");
                return Ok(ReloadOutcome::Busy);
            }
            let request = PageRequest::new(guard.sort.clone(), guard.pagination.first_window())
                .with_filters(filters);
            (request, guard.begin_load())
        };

        let outcome = self.fetch_and_merge(request, previous, false).await?;
        Ok(ReloadOutcome::Loaded(outcome))
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Handle activation of the header of `column_id`.
    ///
    /// Non-sortable columns are ignored. Otherwise the direction flips if the
    /// column is already the sorted one and starts ascending if not, then:
    /// - [`SortMode::Client`] re-sorts the loaded rows in memory; window and
    ///   load state are untouched.
    /// - [`SortMode::Server`] re-queries the first page under the new order
    ///   and replaces the loaded rows, clearing exhaustion.
    ///
    /// The sort state, rows and header marker change together.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownColumn`] if no column has that id.
    /// - [`Error::UnsupportedSortType`] if a sortable column has no sort type
    ///   (client mode).
    /// - Any error from the source (server mode); the previous view stays.
    pub async fn on_header_activated(&self, column_id: &str) -> Result<SortOutcome> {
        let column = find_column(&self.columns, column_id)?;
        if !column.sortable {
            trace!("Header {} is not sortable", column_id);
            return Ok(SortOutcome::Ignored);
        }

        match self.sort_mode {
            SortMode::Client => self.sort_on_client(column_id),
            SortMode::Server => self.sort_on_server(column_id).await,
        }
    }

    fn sort_on_client(&self, column_id: &str) -> Result<SortOutcome> {
        let Some(mut guard) = self.live() else {
            return Ok(SortOutcome::Discarded);
        };
        let inner = &mut *guard;

        let next = SortState::activate(Some(&inner.sort), column_id);
        let sorted = sort_rows(
            inner.pagination.rows(),
            column_id,
            next.direction,
            &self.columns,
        )?;
        debug!("Sorted {} rows on client by {} {}", sorted.len(), column_id, next.direction);

        inner.pagination.reorder(sorted);
        inner.sort = next.clone();
        inner.sink.replace_rows(inner.pagination.rows());
        inner.sink.mark_sorted(&inner.sort);

        Ok(SortOutcome::Sorted(next))
    }

    async fn sort_on_server(&self, column_id: &str) -> Result<SortOutcome> {
        let (request, previous) = {
            let Some(mut guard) = self.live() else {
                return Ok(SortOutcome::Discarded);
            };
            if guard.pagination.is_loading() {
                debug!("Sort on {} dropped, page in flight", column_id);
                return Ok(SortOutcome::Busy);
            }
            let next = SortState::activate(Some(&guard.sort), column_id);
            let request = guard.request(next, guard.pagination.first_window());
            (request, guard.begin_load())
        };

        let sort = request.sort.clone();
        debug!("Sorting on server by {} {}", sort.column_id, sort.direction);
        let outcome = self.fetch_and_merge(request, previous, false).await?;
        Ok(SortOutcome::Loaded(sort, outcome))
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Tear the table down.
    ///
    /// Loaded rows are dropped. Pages still in flight complete, but their
    /// results are discarded.
    pub fn destroy(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.destroyed = true;
            guard.pagination.clear();
            debug!("Table destroyed");
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Write access to state that has not been torn down.
    fn live(&self) -> Option<RwLockWriteGuard<'_, TableInner>> {
        self.inner.write().ok().filter(|guard| !guard.destroyed)
    }

    async fn fetch_and_merge(
        &self,
        request: PageRequest,
        previous: LoadState,
        append: bool,
    ) -> Result<LoadOutcome> {
        debug!(
            "Fetching {} sorted by {} {}",
            request.window, request.sort.column_id, request.sort.direction
        );
        let result = self.source.fetch(&request).await;

        let Some(mut guard) = self.live() else {
            debug!("Dropping page {} for a destroyed table", request.window);
            return Ok(LoadOutcome::Discarded);
        };
        let inner = &mut *guard;
        inner.sink.set_loading(false);

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!("Fetching {} failed: {}", request.window, err);
                inner.pagination.abort(previous);
                return Err(err);
            }
        };

        let outcome = inner.pagination.finish(request.window, page, append);
        match outcome {
            // The active sort may have moved on while the page was in flight.
            LoadOutcome::Appended(count) => {
                let rows = inner.pagination.rows();
                inner.sink.append_rows(&rows[rows.len() - count..]);
            }
            LoadOutcome::Replaced(_) => {
                inner.sort = request.sort;
                inner.filters = request.filters;
                inner.sink.replace_rows(inner.pagination.rows());
                inner.sink.mark_sorted(&inner.sort);
            }
            LoadOutcome::Exhausted | LoadOutcome::Discarded => return Ok(outcome),
        }
        debug!("{:?}, {} rows loaded", outcome, inner.pagination.rows().len());

        Ok(outcome)
    }
}

impl fmt::Debug for SortableTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortableTable")
            .field("columns", &self.columns)
            .field("sort_mode", &self.sort_mode)
            .field("sort", &self.sort_state())
            .field("load_state", &self.load_state())
            .field("rows", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortType;
    use crate::source::MemoryRowSource;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("images", "Image"),
            ColumnSpec::new("title", "Name").sortable(SortType::String),
            ColumnSpec::new("price", "Price").sortable(SortType::Number),
        ]
    }

    fn source() -> Arc<MemoryRowSource> {
        Arc::new(MemoryRowSource::new(columns(), Vec::new()))
    }

    #[test]
    fn test_default_sort_is_first_sortable_column() {
        let table = SortableTable::new(columns(), TableConfig::default(), source()).unwrap();
        assert_eq!(table.sort_state(), Some(SortState::asc("title")));
        assert_eq!(table.window(), Some(Window::first(30)));
        assert_eq!(table.load_state(), LoadState::Idle);
        assert!(table.is_empty());
    }

    #[test]
    fn test_configured_sort_and_window() {
        let config = TableConfig::default()
            .with_start(10)
            .with_page_size(5)
            .with_initial_sort(SortState::desc("price"));
        let table = SortableTable::new(columns(), config, source()).unwrap();
        assert_eq!(table.sort_state(), Some(SortState::desc("price")));
        assert_eq!(table.window(), Some(Window::new(10, 5)));
    }

    #[test]
    fn test_construction_errors() {
        let config = TableConfig::default().with_page_size(0);
        assert!(matches!(
            SortableTable::new(columns(), config, source()),
            Err(Error::InvalidPageSize(0))
        ));

        let config = TableConfig::default().with_initial_sort(SortState::asc("rating"));
        assert!(matches!(
            SortableTable::new(columns(), config, source()),
            Err(Error::UnknownColumn(id)) if id == "rating"
        ));

        let config = TableConfig::default().with_initial_sort(SortState::asc("images"));
        assert!(matches!(
            SortableTable::new(columns(), config, source()),
            Err(Error::ColumnNotSortable(id)) if id == "images"
        ));

        let unsortable = vec![ColumnSpec::new("images", "Image")];
        assert!(matches!(
            SortableTable::new(unsortable, TableConfig::default(), source()),
            Err(Error::NoSortableColumn)
        ));

        let duplicated = vec![
            ColumnSpec::new("title", "Name").sortable(SortType::String),
            ColumnSpec::new("title", "Title"),
        ];
        assert!(matches!(
            SortableTable::new(duplicated, TableConfig::default(), source()),
            Err(Error::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_destroy_drops_rows() {
        let table = SortableTable::new(columns(), TableConfig::default(), source()).unwrap();
        assert!(!table.is_destroyed());
        table.destroy();
        assert!(table.is_destroyed());
        assert!(table.is_empty());
    }
}
