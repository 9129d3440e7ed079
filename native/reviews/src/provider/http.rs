use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, instrument};

use super::ReviewsProvider;
use crate::error::TransportError;

/// Fetches pages with `GET {url}?offset=..&limit=..`.
#[derive(Debug, Clone)]
pub struct HttpReviewsProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpReviewsProvider {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl ReviewsProvider for HttpReviewsProvider {
    #[instrument(level = "debug", skip(self), fields(url = %self.url), err)]
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<u8>, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .get(&self.url)
            .headers(headers)
            .query(&[("offset", offset.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        response.error_for_status_ref()?;
        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Fetched reviews page");
        Ok(body.to_vec())
    }
}
