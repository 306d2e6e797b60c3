//! API client module for the photo catalog.

mod models;

pub use models::{
    ActionType, Album, AlbumPatch, ComputedHash, DateBucket, DirKind, Directory, DirectorySummary,
    Hash, Location, NewAlbum, NewPlannedAction, Page, PathFilter, PhotoPath, Photograph,
    PhotographFilter, PlannedAction, Resource, SiblingPath, TimeLoc, UNKNOWN,
};

use reqwest::header::ACCEPT;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;
use thiserror::Error;

/// Used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Non-success response; displays the status text only.
    #[error("{status_text}")]
    StatusError { status: u16, status_text: String },
    #[error("Decode Error: {0}")]
    DecodeError(String),
    #[error("Pagination cursor repeats: {0}")]
    CursorLoop(String),
}

impl ApiClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiClientError::StatusError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

type Query<'a> = &'a [(&'a str, String)];

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        ApiClient::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn detail<T: Resource>(&self, id: u64) -> String {
        self.endpoint(&format!("{}{}/", T::PATH, id))
    }

    async fn check(response: Response) -> Result<Response, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        tracing::warn!(status = status.as_u16(), url = %response.url(), "Request failed");
        Err(ApiClientError::StatusError {
            status: status.as_u16(),
            status_text,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiClientError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiClientError::DecodeError(e.to_string()))
    }

    /// Like `decode`, but a success without a body (e.g. 204) yields `None`.
    async fn decode_optional<T: DeserializeOwned>(
        response: Response,
    ) -> Result<Option<T>, ApiClientError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ApiClientError::DecodeError(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: Query<'_>,
    ) -> Result<T, ApiClientError> {
        tracing::debug!(%url, ?query, "GET");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        let response = Self::check(response).await?;
        Self::decode(response).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiClientError> {
        tracing::debug!(%method, %url, "Sending mutation");
        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        Self::check(response).await
    }

    /// Fetch the first page of a collection.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn list_page<T: Resource>(
        &self,
        query: Query<'_>,
    ) -> Result<Page<T>, ApiClientError> {
        self.get_json(&self.endpoint(T::PATH), query).await
    }

    /// Fetch the page a `next` cursor points to.
    pub async fn fetch_page<T: Resource>(&self, cursor: &str) -> Result<Page<T>, ApiClientError> {
        let url = if cursor.starts_with("http://") || cursor.starts_with("https://") {
            cursor.to_string()
        } else {
            self.endpoint(cursor)
        };
        self.get_json(&url, &[]).await
    }

    /// Follow `next` cursors until exhausted, concatenating results in page order.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn fetch_all<T: Resource>(
        &self,
        query: Query<'_>,
    ) -> Result<Vec<T>, ApiClientError> {
        let mut page = self.list_page::<T>(query).await?;
        let mut items = std::mem::take(&mut page.results);
        let mut visited = HashSet::new();
        let mut pages = 1;
        while let Some(next) = page.next.take() {
            if !visited.insert(next.clone()) {
                return Err(ApiClientError::CursorLoop(next));
            }
            page = self.fetch_page::<T>(&next).await?;
            items.append(&mut page.results);
            pages += 1;
        }
        tracing::debug!(resource = T::PATH, pages, items = items.len(), "Fetched all pages");
        Ok(items)
    }

    pub async fn get<T: Resource>(&self, id: u64) -> Result<T, ApiClientError> {
        self.get_json(&self.detail::<T>(id), &[]).await
    }

    pub async fn list_photographs(
        &self,
        filter: &PhotographFilter,
    ) -> Result<Vec<Photograph>, ApiClientError> {
        self.fetch_all(&filter.to_query()).await
    }

    pub async fn list_photo_paths(
        &self,
        filter: &PathFilter,
    ) -> Result<Vec<PhotoPath>, ApiClientError> {
        self.fetch_all(&filter.to_query()).await
    }

    pub async fn list_albums(&self) -> Result<Vec<Album>, ApiClientError> {
        self.fetch_all(&[]).await
    }

    /// Photograph counts per capture year, including the `Unknown` bucket.
    pub async fn photograph_years(&self) -> Result<Vec<DateBucket>, ApiClientError> {
        self.get_json(&self.endpoint("photographs/years/"), &[]).await
    }

    pub async fn photograph_months(&self, year: &str) -> Result<Vec<DateBucket>, ApiClientError> {
        self.get_json(
            &self.endpoint("photographs/months/"),
            &[("year", year.to_string())],
        )
        .await
    }

    pub async fn photograph_days(
        &self,
        year: &str,
        month: &str,
    ) -> Result<Vec<DateBucket>, ApiClientError> {
        self.get_json(
            &self.endpoint("photographs/days/"),
            &[("year", year.to_string()), ("month", month.to_string())],
        )
        .await
    }

    /// Direct sub-directories of `prefix` with their path counts.
    pub async fn directory_summary(
        &self,
        prefix: &str,
    ) -> Result<Vec<DirectorySummary>, ApiClientError> {
        self.get_json(
            &self.endpoint("photo-paths/directories/"),
            &PathFilter::under(prefix).to_query(),
        )
        .await
    }

    /// Record the intent to delete a photograph as a planned `DELETE` action.
    /// The server owns the actual removal.
    ///
    /// Returns the created action, or `None` when the server answers without a body.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn mark_for_deletion(
        &self,
        id: u64,
    ) -> Result<Option<PlannedAction>, ApiClientError> {
        let intent = NewPlannedAction {
            action_type: ActionType::Delete,
            photograph: id,
        };
        let response = self
            .send(Method::POST, &self.endpoint(PlannedAction::PATH), Some(&intent))
            .await?;
        Self::decode_optional(response).await
    }

    /// Ask the server to hash the photograph's image file.
    pub async fn compute_hash(&self, id: u64) -> Result<ComputedHash, ApiClientError> {
        let url = self.endpoint(&format!("{}{}/compute_hash/", Photograph::PATH, id));
        let response = self.send::<()>(Method::POST, &url, None).await?;
        Self::decode(response).await
    }

    pub async fn create_album(&self, album: &NewAlbum) -> Result<Option<Album>, ApiClientError> {
        let response = self
            .send(Method::POST, &self.endpoint(Album::PATH), Some(album))
            .await?;
        Self::decode_optional(response).await
    }

    pub async fn update_album(
        &self,
        id: u64,
        patch: &AlbumPatch,
    ) -> Result<Option<Album>, ApiClientError> {
        let response = self
            .send(Method::PATCH, &self.detail::<Album>(id), Some(patch))
            .await?;
        Self::decode_optional(response).await
    }

    pub async fn delete_album(&self, id: u64) -> Result<(), ApiClientError> {
        self.send::<()>(Method::DELETE, &self.detail::<Album>(id), None)
            .await?;
        Ok(())
    }

    /// Add photographs to an album in a single request.
    pub async fn add_photos_to_album(
        &self,
        album_id: u64,
        photo_ids: &[u64],
    ) -> Result<(), ApiClientError> {
        let url = self.endpoint(&format!("{}{}/add_photos/", Album::PATH, album_id));
        self.send(Method::POST, &url, Some(&json!({ "photo_ids": photo_ids })))
            .await?;
        Ok(())
    }

    /// Remove photographs from an album in a single request.
    pub async fn remove_photos_from_album(
        &self,
        album_id: u64,
        photo_ids: &[u64],
    ) -> Result<(), ApiClientError> {
        let url = self.endpoint(&format!("{}{}/remove_photos/", Album::PATH, album_id));
        self.send(Method::POST, &url, Some(&json!({ "photo_ids": photo_ids })))
            .await?;
        Ok(())
    }
}
