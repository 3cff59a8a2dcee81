//! The Page Store: idempotent upsert of crawled-page records keyed by URL,
//! plus the aggregate queries the supervisor and CLI need.

mod mongo;
mod traits;

pub use mongo::MongoStorage;
pub use traits::{DomainCount, Storage, StorageError, StorageResult};

use mongodb::bson::Document;

/// A crawled page as stored in the `pages` collection.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub html: String,
    pub links: Vec<String>,
    pub domain: String,
    pub timestamp: f64,
    pub status: u16,
    pub content_type: Option<String>,
}

impl PageRecord {
    pub(crate) fn from_document(doc: Document) -> Self {
        let links = doc
            .get_array("links")
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            url: doc.get_str("url").unwrap_or_default().to_string(),
            title: doc.get_str("title").unwrap_or_default().to_string(),
            html: doc.get_str("html").unwrap_or_default().to_string(),
            links,
            domain: doc.get_str("domain").unwrap_or_default().to_string(),
            timestamp: doc.get_f64("timestamp").unwrap_or(0.0),
            status: doc.get_i32("status").unwrap_or(0) as u16,
            content_type: doc.get_str("content_type").ok().map(str::to_string),
        }
    }
}
