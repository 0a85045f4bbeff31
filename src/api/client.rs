// src/api/client.rs
//! Pure HTTP client wrapper for Notion API.
//!
//! This module provides a thin wrapper around reqwest for making
//! HTTP requests to the Notion API. It handles authentication, the protocol
//! version header and status mapping, and returns raw JSON.

use super::types::PaginatedResponse;
use crate::constants::{NOTION_API_BASE_URL, NOTION_API_VERSION, REQUEST_TIMEOUT};
use crate::error::AppError;
use crate::types::{ApiKey, NotionId, ValidatedUrl};
use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::Value;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Creates a client talking to another host, e.g. a local mock server.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let base_url = ValidatedUrl::parse(base_url)?;
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn list_children(
        &self,
        parent: &NotionId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Value>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        let mut query = vec![("page_size", page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor));
        }
        let response = self.get(&endpoint, &query).await?;
        let body = json_body(response).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn retrieve_page(&self, id: &NotionId) -> Result<Value, AppError> {
        let endpoint = format!("pages/{}", id.to_hyphenated());
        let response = self.get(&endpoint, &[]).await?;
        json_body(response).await
    }

    async fn query_database(
        &self,
        id: &NotionId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Value>, AppError> {
        let endpoint = format!("databases/{}/query", id.to_hyphenated());
        let mut query = serde_json::json!({ "page_size": page_size });
        if let Some(cursor) = cursor {
            query["start_cursor"] = serde_json::json!(cursor);
        }
        let response = self.post(&endpoint, &query).await?;
        let body = json_body(response).await?;
        Ok(serde_json::from_value(body)?)
    }
}

/// Reads a response as JSON, mapping non-success statuses to Notion errors.
async fn json_body(response: Response) -> Result<Value, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    if !status.is_success() {
        let error = AppError::from_error_body(status.as_u16(), &text);
        log::debug!("{} from {}: {}", status, url, error);
        return Err(error);
    }

    serde_json::from_str(&text).map_err(|e| {
        let preview: String = text
            .chars()
            .take(crate::constants::ERROR_BODY_PREVIEW_LENGTH)
            .collect();
        AppError::MalformedResponse(format!("{} from {}: {}", e, url, preview))
    })
}
