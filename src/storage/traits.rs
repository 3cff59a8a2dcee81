//! Storage trait and error type for the Page Store.

use crate::storage::PageRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("mongo error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("bson serialization error: {0}")]
    BsonSerialize(#[from] bson::ser::Error),

    #[error("bson deserialization error: {0}")]
    BsonDeserialize(#[from] bson::de::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Per-domain page count, used by `domain-stats` and the metrics summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

/// The crawled-page document store: idempotent upsert by URL plus the
/// aggregate queries the supervisor and CLI need.
#[async_trait]
pub trait Storage {
    /// Ensures the indexes the store relies on exist: unique on `url`,
    /// non-unique on `domain` and `timestamp`.
    async fn init(&self) -> StorageResult<()>;

    /// Upserts a page record by URL, fully replacing its mutable fields.
    #[allow(clippy::too_many_arguments)]
    async fn save_page(
        &self,
        url: &str,
        title: &str,
        html: &str,
        links: &[String],
        domain: &str,
        timestamp: f64,
        status: u16,
        content_type: Option<&str>,
    ) -> StorageResult<()>;

    async fn get_page(&self, url: &str) -> StorageResult<Option<PageRecord>>;

    async fn count_pages(&self) -> StorageResult<u64>;

    /// Top `limit` domains by stored page count, descending.
    async fn aggregate_by_domain(&self, limit: i64) -> StorageResult<Vec<DomainCount>>;

    /// Count of pages per HTTP status (as a string; `"0"` for transport
    /// failures) stored at or after `since_ts`.
    async fn aggregate_status_since(&self, since_ts: f64) -> StorageResult<std::collections::HashMap<String, u64>>;
}
