use async_trait::async_trait;

use crate::error::TransportError;

mod fixture;
pub use fixture::FixtureReviewsProvider;
mod http;
pub use http::HttpReviewsProvider;

/// Source of review pages.
///
/// Implementations return the raw page payload; decoding is the controller's
/// job. Each call resolves exactly once.
#[async_trait]
pub trait ReviewsProvider: Send + Sync {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<u8>, TransportError>;
}
