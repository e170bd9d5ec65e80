//! Response envelope and pagination helpers
//!
//! Every endpoint answers with `{message, data}`; list endpoints wrap their
//! rows in a `{count, next, previous, results}` page inside `data`.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// The `{message, data}` envelope carried by every response
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub message: String,
    pub data: Option<Value>,
}

impl ApiResponse {
    /// Envelope with a message and no data
    pub fn message(message: impl Into<String>) -> Json<ApiResponse> {
        Json(ApiResponse {
            message: message.into(),
            data: None,
        })
    }

    /// Envelope with a message and a serialized data payload
    pub fn with_data<T: Serialize>(
        message: impl Into<String>,
        data: &T,
    ) -> Result<Json<ApiResponse>, ApiError> {
        let data = serde_json::to_value(data).map_err(anyhow::Error::new)?;
        Ok(Json(ApiResponse {
            message: message.into(),
            data: Some(data),
        }))
    }
}

/// `?page=` query parameter for list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    /// Requested page, 1-based, defaulting to the first
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// One page of results with total count and page-url markers
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(path: &str, page: u32, per_page: u32, count: i64, results: Vec<T>) -> Self {
        let has_next = i64::from(page) * i64::from(per_page) < count;
        let next = has_next.then(|| format!("{path}?page={}", page + 1));
        let previous = (page > 1).then(|| format!("{path}?page={}", page - 1));

        Page {
            count,
            next,
            previous,
            results,
        }
    }
}
