use std::{
    error::Error,
    sync::{Arc, Weak},
    time::Duration,
};

use anyhow::{Context, Result};
use derive_more::Debug;
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tokio_stream::wrappers::WatchStream;
use tracing::{Instrument, debug, info_span, instrument, trace, warn};

use crate::{
    config::ReviewsConfig,
    error::{FetchError, TransportError},
    layout::RowHeight,
    models::{ExpandCommand, ListItem, ReviewId, ReviewItem, ReviewRecord, ReviewsPage},
    provider::ReviewsProvider,
    state::PaginationState,
};

/// Default distance from the end of content, in screens, at which the next
/// page is requested.
pub const DEFAULT_PREFETCH_SCREENS: f64 = 2.5;

/// Whether a scroll ending at `target_scroll_offset` is close enough to the
/// end of content to request the next page.
pub fn should_request_next_page(
    viewport_height: f64,
    content_height: f64,
    target_scroll_offset: f64,
    threshold_screens: f64,
) -> bool {
    let trigger_distance = viewport_height * threshold_screens;
    let remaining_distance = content_height - viewport_height - target_scroll_offset;
    remaining_distance <= trigger_distance
}

/// Drives the paginated reviews list of one screen.
///
/// The controller is the only writer of its [`PaginationState`]. Every
/// completed fetch and every expansion publishes a new snapshot through a
/// watch channel; starting a fetch does not.
#[derive(Debug)]
pub struct ReviewsController {
    #[debug(skip)]
    this: Weak<Self>,
    #[debug(skip)]
    provider: Arc<dyn ReviewsProvider>,
    config: ReviewsConfig,
    #[debug(skip)]
    watch_tx: watch::Sender<PaginationState>,
    #[debug(skip)]
    runtime: Handle,
}

impl ReviewsController {
    /// Must be called within a tokio runtime; page fetches run on that
    /// runtime whichever thread later requests them.
    pub fn new(provider: Arc<dyn ReviewsProvider>, config: ReviewsConfig) -> Result<Arc<Self>> {
        config.validate()?;
        let runtime =
            Handle::try_current().context("Reviews controller requires a tokio runtime")?;
        let watch_tx = watch::Sender::new(PaginationState::new(config.page_size));
        Ok(Arc::new_cyclic(|this| Self {
            this: this.clone(),
            provider,
            config,
            watch_tx,
            runtime,
        }))
    }

    pub fn config(&self) -> &ReviewsConfig {
        &self.config
    }

    /// Create a receiver for state changes
    pub fn subscribe(&self) -> watch::Receiver<PaginationState> {
        self.watch_tx.subscribe()
    }

    pub fn updates(&self) -> WatchStream<PaginationState> {
        WatchStream::new(self.watch_tx.subscribe())
    }

    pub fn snapshot(&self) -> PaginationState {
        self.watch_tx.borrow().clone()
    }

    pub fn row_count(&self) -> usize {
        self.watch_tx.borrow().row_count()
    }

    pub fn row_at(&self, index: usize) -> Option<ListItem> {
        self.watch_tx.borrow().row_at(index)
    }

    pub fn row_height(&self, index: usize, available_width: f64) -> Option<RowHeight> {
        self.watch_tx.borrow().row_height(index, available_width, &self.config.row_layout)
    }

    pub fn summary_label(&self) -> Option<String> {
        self.watch_tx.borrow().summary_label(&self.config.plural_forms)
    }

    /// Requests the next page in the background if one may be requested.
    ///
    /// Returns `false` without side effects while a fetch is in flight or
    /// once every page has been loaded. Safe to call from any thread.
    pub fn request_next_page(&self) -> bool {
        let Some((offset, limit)) = self.begin_page_request() else {
            return false;
        };
        self.spawn_page_fetch(offset, limit);
        true
    }

    /// Same as [`request_next_page`](Self::request_next_page), but waits until
    /// the page has been applied. Returns whether a fetch was made.
    ///
    /// The fetch runs on its own task, so dropping this future does not cancel
    /// it: the page is still applied (or re-armed on failure) in the background.
    pub async fn load_next_page(&self) -> bool {
        let Some((offset, limit)) = self.begin_page_request() else {
            return false;
        };
        if let Err(e) = self.spawn_page_fetch(offset, limit).await {
            warn!(error = &e as &dyn Error, "Reviews page task failed");
        }
        true
    }

    /// Runs the fetch for an already started request and routes its outcome to
    /// [`on_page_fetched`](Self::on_page_fetched).
    ///
    /// The provider call gets a task of its own so a panicking provider
    /// surfaces as a failed fetch instead of leaving the request outstanding.
    fn spawn_page_fetch(&self, offset: u32, limit: u32) -> JoinHandle<()> {
        let provider = self.provider.clone();
        let timeout = self.config.fetch_timeout();
        let this = self.this.clone();
        let runtime = self.runtime.clone();
        self.runtime.spawn(
            async move {
                let fetch = runtime.spawn(
                    async move {
                        fetch_with_timeout(provider.as_ref(), offset, limit, timeout).await
                    }
                    .in_current_span(),
                );
                let result = fetch.await.unwrap_or_else(|e| {
                    Err(TransportError::new(format!("Reviews provider task failed: {e}")))
                });
                match this.upgrade() {
                    Some(controller) => controller.on_page_fetched(result),
                    None => debug!("Controller dropped before page arrived"),
                }
            }
            .instrument(info_span!("task_fetch_reviews_page", offset, limit)),
        )
    }

    /// Requests the next page when a scroll settling at `target_scroll_offset`
    /// leaves less than the configured number of screens of content.
    pub fn on_scroll_will_end(
        &self,
        viewport_height: f64,
        content_height: f64,
        target_scroll_offset: f64,
    ) -> bool {
        should_request_next_page(
            viewport_height,
            content_height,
            target_scroll_offset,
            self.config.prefetch_screens,
        ) && self.request_next_page()
    }

    /// Clears the eligibility flag and hands out the page to fetch, or `None`
    /// if no request may be made right now.
    fn begin_page_request(&self) -> Option<(u32, u32)> {
        let mut request = None;
        self.watch_tx.send_if_modified(|state| {
            if !state.should_load {
                trace!(is_loading = state.is_loading, "Page request ignored");
                return false;
            }
            state.should_load = false;
            state.is_loading = true;
            request = Some((state.offset, state.limit));
            false
        });
        if let Some((offset, limit)) = request {
            debug!(offset, limit, "Requesting reviews page");
        }
        request
    }

    /// Applies the outcome of the outstanding fetch and publishes the result.
    ///
    /// Failures commit nothing and re-arm the eligibility flag so the same page
    /// is retried on the next request.
    #[instrument(level = "debug", skip(self, result))]
    pub(crate) fn on_page_fetched(&self, result: Result<Vec<u8>, TransportError>) {
        let decoded: Result<ReviewsPage, FetchError> =
            result.map_err(FetchError::from).and_then(|bytes| Ok(ReviewsPage::decode(&bytes)?));

        self.watch_tx.send_if_modified(|state| {
            if !state.is_loading {
                warn!("Ignoring page completion with no fetch outstanding");
                return false;
            }
            state.is_loading = false;

            match decoded {
                Ok(page) => {
                    let received = page.items.len();
                    for record in page.items {
                        state.push(self.make_review_item(record));
                    }
                    state.offset = state.offset.saturating_add(state.limit);
                    state.total_count = Some(page.count);
                    state.should_load = state.offset < page.count;
                    debug!(
                        received,
                        total = page.count,
                        offset = state.offset,
                        has_more = state.should_load,
                        "Reviews page loaded"
                    );
                }
                Err(e) => {
                    warn!(
                        error = &e as &dyn Error,
                        offset = state.offset,
                        "Failed to load reviews page, will retry on next request"
                    );
                    state.should_load = true;
                }
            }
            state.is_first_load = false;
            true
        });
    }

    /// Removes the line cap of a review. Unknown ids are ignored.
    pub fn expand(&self, id: ReviewId) {
        self.watch_tx.send_if_modified(|state| match state.item_mut(id) {
            Some(item) => {
                item.max_lines = 0;
                debug!(%id, "Review expanded");
                true
            }
            None => {
                debug!(%id, "Expand requested for unknown review");
                false
            }
        });
    }

    fn make_review_item(&self, record: ReviewRecord) -> ReviewItem {
        let id = ReviewId::new();
        ReviewItem {
            id,
            full_name: format!("{} {}", record.first_name, record.last_name),
            rating: record.rating,
            text: record.text,
            created: record.created,
            max_lines: self.config.collapsed_max_lines,
            on_expand: ExpandCommand::new(id, self.this.clone()),
        }
    }
}

async fn fetch_with_timeout(
    provider: &dyn ReviewsProvider,
    offset: u32,
    limit: u32,
    timeout: Option<Duration>,
) -> Result<Vec<u8>, TransportError> {
    let fetch = provider.fetch_page(offset, limit);
    match timeout {
        Some(after) => tokio::time::timeout(after, fetch)
            .await
            .unwrap_or_else(|_| Err(TransportError::timeout(after))),
        None => fetch.await,
    }
}
