use std::time::Duration;

use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::advisory::{Advisory, AdvisoryFilter};
use crate::config::ClientConfig;
use crate::error::FetchError;

const ADVISORIES_PATH: &str = "/advisories";

/// Client for the global security advisories endpoint.
pub struct GitHubClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()
            .map_err(FetchError::BuildClient)?;
        Ok(Self { http, config })
    }

    pub fn has_token(&self) -> bool {
        self.config.token.is_some()
    }

    /// Fetch one page of advisories.
    ///
    /// Non-object elements in the response array are discarded; the endpoint
    /// contract is a JSON array of objects and anything else at the top
    /// level is a protocol error.
    #[instrument(skip(self, filter))]
    pub async fn list_advisories(
        &self,
        filter: &AdvisoryFilter,
        page: u32,
    ) -> Result<Vec<Advisory>, FetchError> {
        let query = query_pairs(filter, page);
        let (url, json) = self.get_json(ADVISORIES_PATH, &query).await?;

        let Some(Value::Array(items)) = json else {
            return Err(FetchError::Protocol {
                url,
                detail: "expected a JSON array".to_string(),
            });
        };

        let total = items.len();
        let advisories: Vec<Advisory> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        if advisories.len() < total {
            debug!(dropped = total - advisories.len(), "discarded non-object entries");
        }

        Ok(advisories)
    }

    /// Stream advisories page by page until the API returns an empty page or
    /// `max_pages` is exhausted. Single-pass; the first error ends the stream.
    pub fn stream_advisories(
        &self,
        filter: AdvisoryFilter,
        max_pages: Option<u32>,
        delay: Duration,
    ) -> impl Stream<Item = Result<Advisory, FetchError>> + '_ {
        stream::try_unfold((filter, 1u32), move |(filter, page)| async move {
            if max_pages.is_some_and(|max| page > max) {
                return Ok(None);
            }
            if page > 1 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let items = self.list_advisories(&filter, page).await?;
            debug!(page, count = items.len(), "fetched advisory page");
            if items.is_empty() {
                return Ok(None);
            }
            Ok(Some((items, (filter, page + 1))))
        })
        .map_ok(|items| stream::iter(items.into_iter().map(Ok::<Advisory, FetchError>)))
        .try_flatten()
    }

    /// GET a path under the configured base URL and decode the body.
    /// An empty body decodes to `None` rather than an error.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<(String, Option<Value>), FetchError> {
        let url = join_url(&self.config.api_base_url, path);

        let mut request = self
            .http
            .get(&url)
            .query(query)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", self.config.api_version.as_str());
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        // The final URL carries the query string; prefer it in diagnostics.
        let url = response.url().to_string();
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("HTTP error").to_string()
            } else {
                body
            };
            return Err(FetchError::Remote {
                status,
                url,
                message,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        if text.is_empty() {
            return Ok((url, None));
        }

        let json = serde_json::from_str(&text).map_err(|e| FetchError::Protocol {
            url: url.clone(),
            detail: format!("invalid JSON: {e}"),
        })?;
        Ok((url, Some(json)))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Query pairs for one page. Only set filter fields appear; `per_page` and
/// `page` are always present.
fn query_pairs(filter: &AdvisoryFilter, page: u32) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(ecosystem) = &filter.ecosystem {
        query.push(("ecosystem", ecosystem.clone()));
    }
    if let Some(severity) = &filter.severity {
        query.push(("severity", severity.clone()));
    }
    if let Some(advisory_type) = &filter.advisory_type {
        query.push(("type", advisory_type.clone()));
    }
    query.push(("per_page", filter.per_page.to_string()));
    query.push(("page", page.to_string()));
    query
}
