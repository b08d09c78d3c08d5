use feedwindow::{FetchError, Post};
use tracing::debug;

use crate::{FeedConfig, PostSource};

/// Reads posts from a JSON placeholder style REST endpoint.
///
/// Pages are requested as `GET {base_url}/posts?_limit={limit}&_start={start}`; the response body
/// must be a JSON array of posts. Any non-2xx status is reported as [`FetchError::Status`].
#[derive(Clone, Debug)]
pub struct HttpPostSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPostSource {
    /// Creates a source with a default client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Builds the client from the timeout and user agent in `config`.
    pub fn from_config(config: &FeedConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FetchError::transport(format!("failed to build client: {e}")))?;
        Ok(Self::with_client(client, config.base_url.as_str()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_url(&self, start: usize, limit: usize) -> String {
        format!("{}/posts?_limit={limit}&_start={start}", self.base_url)
    }
}

impl PostSource for HttpPostSource {
    async fn fetch_page(&self, start: usize, limit: usize) -> Result<Vec<Post>, FetchError> {
        let url = self.page_url(start, limit);
        debug!(%url, "requesting page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Vec<Post>>()
            .await
            .map_err(|e| FetchError::decode(e.to_string()))
    }
}
