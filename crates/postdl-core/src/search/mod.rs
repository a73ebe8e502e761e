//! Record source: paginated post search.
//!
//! Pages through the search API, parses each page and turns posts into
//! download tasks in API order. Fetching goes through the same [`Transport`]
//! the workers use, so proxy settings apply to both.

mod parse;

pub use parse::parse_posts;

use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use crate::task::{Post, Task};
use crate::transport::{FetchError, Transport};

/// Posts requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid API URL {url:?}: {source}")]
    InvalidApiUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("fetching page {page} failed: {source}")]
    Fetch { page: usize, source: FetchError },
    #[error("page {page} is not a valid post list: {source}")]
    Parse {
        page: usize,
        source: serde_json::Error,
    },
}

/// What to search for and how much of it.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Space separated tag expression, passed through verbatim.
    pub tags: String,
    /// Maximum number of posts to collect; `None` pages until exhausted.
    pub limit: Option<usize>,
    pub page_size: usize,
    /// First page index (`pid`). The API counts pages from zero.
    pub start_page: usize,
}

impl SearchQuery {
    pub fn new(tags: impl Into<String>) -> Self {
        Self {
            tags: tags.into(),
            limit: None,
            page_size: DEFAULT_PAGE_SIZE,
            start_page: 0,
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Builds the URL of one search page.
pub fn build_page_url(
    api_url: &str,
    tags: &str,
    limit: usize,
    page: usize,
) -> Result<url::Url, url::ParseError> {
    let mut url = url::Url::parse(api_url)?;
    url.query_pairs_mut()
        .append_pair("page", "dapi")
        .append_pair("s", "post")
        .append_pair("q", "index")
        .append_pair("json", "1")
        .append_pair("tags", tags)
        .append_pair("limit", &limit.to_string())
        .append_pair("pid", &page.to_string());
    Ok(url)
}

/// Search API client.
pub struct SearchClient {
    api_url: String,
    transport: Arc<dyn Transport>,
}

impl SearchClient {
    pub fn new(api_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_url: api_url.into(),
            transport,
        }
    }

    /// Fetches and parses one page of at most `limit` posts.
    pub fn fetch_page(&self, tags: &str, page: usize, limit: usize) -> Result<Vec<Post>, SearchError> {
        let url = build_page_url(&self.api_url, tags, limit, page).map_err(|source| {
            SearchError::InvalidApiUrl {
                url: self.api_url.clone(),
                source,
            }
        })?;
        tracing::debug!(%url, page, "fetching search page");
        let body = self
            .transport
            .fetch(url.as_str())
            .map_err(|source| SearchError::Fetch { page, source })?;
        parse_posts(&body).map_err(|source| SearchError::Parse { page, source })
    }

    /// Pages through the query and returns the tasks in API order.
    ///
    /// Each page asks for `min(page_size, remaining)` posts; paging stops on an
    /// empty page or once `limit` posts were received. `on_page(page, count)`
    /// is called after every fetched page. Posts without a payload address are
    /// skipped, and a post id seen on an earlier page (results shifting while
    /// paging) is only kept once.
    pub fn collect_tasks<F>(&self, query: &SearchQuery, mut on_page: F) -> Result<Vec<Task>, SearchError>
    where
        F: FnMut(usize, usize),
    {
        let page_size = query.page_size.max(1);
        let mut remaining = query.limit;
        let mut page = query.start_page;
        let mut seen = HashSet::new();
        let mut tasks = Vec::new();

        loop {
            let request = match remaining {
                Some(0) => break,
                Some(r) => r.min(page_size),
                None => page_size,
            };
            let posts = self.fetch_page(&query.tags, page, request)?;
            on_page(page, posts.len());
            if posts.is_empty() {
                break;
            }

            for post in posts.iter().take(request) {
                let Some(task) = Task::from_post(post) else {
                    tracing::debug!(id = post.id, "post has no file_url, skipping");
                    continue;
                };
                if seen.insert(task.id) {
                    tasks.push(task);
                } else {
                    tracing::debug!(id = task.id, "duplicate post across pages, skipping");
                }
            }

            if let Some(r) = remaining.as_mut() {
                *r = r.saturating_sub(posts.len());
            }
            page += 1;
        }

        tracing::info!(tags = %query.tags, found = tasks.len(), "search complete");
        Ok(tasks)
    }
}
