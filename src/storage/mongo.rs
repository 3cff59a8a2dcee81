//! MongoDB-backed Page Store.

use crate::storage::traits::{DomainCount, Storage, StorageResult};
use crate::storage::PageRecord;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use std::collections::HashMap;

/// Page Store backed by a single MongoDB collection, `pages`, upserted by
/// `url`.
#[derive(Clone)]
pub struct MongoStorage {
    pages: Collection<Document>,
}

impl MongoStorage {
    pub async fn connect(mongo_url: &str, db_name: &str) -> StorageResult<Self> {
        let client = Client::with_uri_str(mongo_url).await?;
        let db = client.database(db_name);
        Ok(Self {
            pages: db.collection("pages"),
        })
    }
}

#[async_trait]
impl Storage for MongoStorage {
    async fn init(&self) -> StorageResult<()> {
        let unique_url = IndexModel::builder()
            .keys(doc! { "url": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let by_domain = IndexModel::builder().keys(doc! { "domain": 1 }).build();
        let by_timestamp = IndexModel::builder().keys(doc! { "timestamp": 1 }).build();
        self.pages.create_index(unique_url, None).await?;
        self.pages.create_index(by_domain, None).await?;
        self.pages.create_index(by_timestamp, None).await?;
        Ok(())
    }

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
    ) -> StorageResult<()> {
        let update = doc! {
            "$set": {
                "url": url,
                "title": title,
                "html": html,
                "links": links,
                "domain": domain,
                "timestamp": timestamp,
                "status": status as i32,
                "content_type": content_type,
            }
        };
        self.pages
            .update_one(
                doc! { "url": url },
                update,
                mongodb::options::UpdateOptions::builder().upsert(true).build(),
            )
            .await?;
        Ok(())
    }

    async fn get_page(&self, url: &str) -> StorageResult<Option<PageRecord>> {
        let found = self.pages.find_one(doc! { "url": url }, None).await?;
        Ok(found.map(PageRecord::from_document))
    }

    async fn count_pages(&self) -> StorageResult<u64> {
        Ok(self.pages.estimated_document_count(None).await?)
    }

    async fn aggregate_by_domain(&self, limit: i64) -> StorageResult<Vec<DomainCount>> {
        let pipeline = vec![
            doc! { "$group": { "_id": "$domain", "count": { "$sum": 1 } } },
            doc! { "$sort": { "count": -1 } },
            doc! { "$limit": limit },
        ];
        let mut cursor = self.pages.aggregate(pipeline, None).await?;
        let mut out = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            let domain = doc.get_str("_id").unwrap_or_default().to_string();
            let count = doc.get_i32("count").unwrap_or(0) as u64;
            out.push(DomainCount { domain, count });
        }
        Ok(out)
    }

    async fn aggregate_status_since(&self, since_ts: f64) -> StorageResult<HashMap<String, u64>> {
        let pipeline = vec![
            doc! { "$match": { "timestamp": { "$gte": since_ts } } },
            doc! { "$group": { "_id": "$status", "count": { "$sum": 1 } } },
        ];
        let mut cursor = self.pages.aggregate(pipeline, None).await?;
        let mut out = HashMap::new();
        while let Some(doc) = cursor.try_next().await? {
            let status = doc
                .get_i32("_id")
                .map(|s| s.to_string())
                .unwrap_or_else(|_| "0".to_string());
            let count = doc.get_i32("count").unwrap_or(0) as u64;
            out.insert(status, count);
        }
        Ok(out)
    }
}
