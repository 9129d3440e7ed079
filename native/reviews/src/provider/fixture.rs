use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::ReviewsProvider;
use crate::{error::TransportError, models::ReviewsPage};

/// Serves pages out of a local JSON file holding the whole review set.
///
/// The file has the wire shape (`{ "items": [...], "count": N }`); each call
/// slices `[offset, offset + limit)` and re-encodes it with the file's
/// `count`. Useful for demos and UI work without a backend.
#[derive(Debug, Clone)]
pub struct FixtureReviewsProvider {
    path: PathBuf,
    delay: Option<Duration>,
}

impl FixtureReviewsProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), delay: None }
    }

    /// Simulate network latency before every response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ReviewsProvider for FixtureReviewsProvider {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()), err)]
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<u8>, TransportError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let content = tokio::fs::read(&self.path).await?;
        let all = ReviewsPage::decode(&content)
            .map_err(|e| TransportError::new(format!("Invalid fixture file: {e}")))?;

        let items: Vec<_> =
            all.items.into_iter().skip(offset as usize).take(limit as usize).collect();
        debug!(returned = items.len(), total = all.count, "Serving fixture page");

        serde_json::to_vec(&ReviewsPage { items, count: all.count })
            .map_err(|e| TransportError::new(format!("Failed to encode fixture page: {e}")))
    }
}
