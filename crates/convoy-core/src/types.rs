//! Domain types shared across the workspace.
//!
//! Mirrors the JSON shapes the Convoy REST API returns. Payload fields the
//! client never interprets stay as raw `serde_json::Value`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope the API wraps every response body in.
///
/// `status: false` means the request was understood but rejected; the
/// gateway surfaces those as API errors rather than returning the envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerResponse<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Lifecycle status of an event delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Success,
    Failure,
    Retry,
    Scheduled,
    Processing,
    Discarded,
}

impl DeliveryStatus {
    /// All statuses, in display order (for pickers and `--status` help).
    pub fn all() -> &'static [DeliveryStatus] {
        &[
            DeliveryStatus::Success,
            DeliveryStatus::Failure,
            DeliveryStatus::Retry,
            DeliveryStatus::Scheduled,
            DeliveryStatus::Processing,
            DeliveryStatus::Discarded,
        ]
    }

    /// The exact string the API expects in `status` query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Success => "Success",
            DeliveryStatus::Failure => "Failure",
            DeliveryStatus::Retry => "Retry",
            DeliveryStatus::Scheduled => "Scheduled",
            DeliveryStatus::Processing => "Processing",
            DeliveryStatus::Discarded => "Discarded",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "success" => Ok(DeliveryStatus::Success),
            "failure" => Ok(DeliveryStatus::Failure),
            "retry" => Ok(DeliveryStatus::Retry),
            "scheduled" => Ok(DeliveryStatus::Scheduled),
            "processing" => Ok(DeliveryStatus::Processing),
            "discarded" => Ok(DeliveryStatus::Discarded),
            _ => Err(format!("Unknown delivery status: {value}")),
        }
    }
}

/// An ingested webhook event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    #[serde(default)]
    pub event_type: String,
    /// Raw webhook payload; opaque to the client.
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub app_metadata: Value,
    pub created_at: DateTime<Utc>,
}

/// One delivery of an event to an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDelivery {
    pub uid: String,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub event_metadata: Value,
    #[serde(default)]
    pub endpoint_metadata: Value,
    /// Retry bookkeeping (`num_trials`, `retry_limit`, ...); opaque here.
    #[serde(default)]
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single recorded try at delivering an event to an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub uid: String,
    #[serde(default)]
    pub http_status: String,
    #[serde(default)]
    pub response_data: String,
    #[serde(default)]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Pagination metadata reported by the server alongside each page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
    /// Next page number, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<u32>,
    #[serde(rename = "totalPage")]
    pub total_page: u32,
    #[serde(default)]
    pub total: u64,
}

/// One fetched batch of items plus its pagination metadata.
///
/// `content` ordering reflects the server sort order for the request that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pagination: Pagination,
}

/// Sort direction accepted by the list endpoints.
///
/// The API spells ascending `AESC` (sic); we keep the wire spelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "AESC")]
    Ascending,
    #[default]
    #[serde(rename = "DESC")]
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "AESC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "aesc" | "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("Unknown sort order: {value}")),
        }
    }
}

/// List filters. Every field is optional; absence means "no filter applied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Free-text search over event payloads.
    pub query: Option<String>,
    /// Delivery statuses to include; empty means all.
    pub statuses: Vec<DeliveryStatus>,
    /// Restrict to a single app (source).
    pub app_id: Option<String>,
    pub sort: SortOrder,
    pub per_page: Option<u32>,
}
