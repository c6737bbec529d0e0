//! HTTP implementation of [`BookmarkService`] using `reqwest`.
//!
//! Wire format (camelCase JSON):
//! - `GET    {base}/bookmarks?page&limit&search&categoryId&tagIds=a,b` → `{"bookmarks":[..],"hasMore":bool}`
//! - `POST   {base}/bookmarks` → created record
//! - `PUT    {base}/bookmarks/{id}` → stored record (fields it omits keep the sent value)
//! - `DELETE {base}/bookmarks/{id}`

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use super::remote::{BookmarkService, ListPage, ListQuery};
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::StoreError;

/// Maps a non-success HTTP status onto the store's error taxonomy.
pub fn status_to_error(status: StatusCode, target: &str, body: &str) -> StoreError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body.trim())
    };
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(target.to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::ValidationFailure(detail)
        }
        _ => StoreError::NetworkFailure(detail),
    }
}

/// Overlays the fields present in `response` onto `sent` and decodes the result.
fn merge_response<T: Serialize>(sent: &T, response: &str) -> Result<Bookmark, StoreError> {
    let mut merged = serde_json::to_value(sent)
        .map_err(|e| StoreError::ValidationFailure(e.to_string()))?;
    if !response.trim().is_empty() {
        let confirmed: Value = serde_json::from_str(response)
            .map_err(|e| StoreError::NetworkFailure(format!("malformed response: {}", e)))?;
        if let (Value::Object(base), Value::Object(fields)) = (&mut merged, confirmed) {
            base.extend(fields);
        }
    }
    serde_json::from_value(merged)
        .map_err(|e| StoreError::NetworkFailure(format!("malformed response: {}", e)))
}

pub struct HttpBookmarkService {
    client: Client,
    base_url: String,
}

impl HttpBookmarkService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| StoreError::ValidationFailure(format!("invalid base url '{}': {}", base_url, e)))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> Result<Url, StoreError> {
        Url::parse(&format!("{}/bookmarks", self.base_url))
            .map_err(|e| StoreError::ValidationFailure(e.to_string()))
    }

    /// `{base}/bookmarks/{id}` with the id percent-encoded as one segment.
    pub fn item_url(&self, id: &str) -> Result<Url, StoreError> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|_| StoreError::ValidationFailure(format!("base url cannot hold paths: {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    /// Builds the list URL; empty filter parts are omitted.
    pub fn list_url(&self, query: &ListQuery) -> Result<Url, StoreError> {
        let mut url = self.collection_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("limit", &query.limit.to_string());
            if !query.filter.search_query.is_empty() {
                pairs.append_pair("search", &query.filter.search_query);
            }
            if let Some(category) = &query.filter.selected_category {
                pairs.append_pair("categoryId", category);
            }
            if !query.filter.selected_tags.is_empty() {
                let tags: Vec<&str> = query.filter.selected_tags.iter().map(String::as_str).collect();
                pairs.append_pair("tagIds", &tags.join(","));
            }
        }
        Ok(url)
    }

    /// Reads the body, turning non-success statuses into errors.
    async fn read_body(response: reqwest::Response, target: &str) -> Result<String, StoreError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(status_to_error(status, target, &body))
        }
    }
}

impl BookmarkService for HttpBookmarkService {
    async fn list(&self, query: &ListQuery) -> Result<ListPage, StoreError> {
        let url = self.list_url(query)?;
        let response = self.client.get(url).send().await?;
        let body = Self::read_body(response, "bookmarks").await?;
        serde_json::from_str(&body)
            .map_err(|e| StoreError::NetworkFailure(format!("malformed page: {}", e)))
    }

    async fn create(&self, record: &NewBookmark) -> Result<Bookmark, StoreError> {
        let url = self.collection_url()?;
        let response = self.client.post(url).json(record).send().await?;
        let body = Self::read_body(response, "bookmarks").await?;
        merge_response(record, &body)
    }

    async fn update(&self, id: &str, record: &Bookmark) -> Result<Bookmark, StoreError> {
        let url = self.item_url(id)?;
        let response = self.client.put(url).json(record).send().await?;
        let body = Self::read_body(response, id).await?;
        merge_response(record, &body)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.item_url(id)?;
        let response = self.client.delete(url).send().await?;
        match Self::read_body(response, id).await {
            Ok(_) | Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
