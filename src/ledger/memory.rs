//! In-process topic storage for development and tests

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::{LedgerError, Result};
use super::model::{
    AuditRecord, NewTopic, PointsAward, TopicField, TopicRecord, TopicView, validate_topic_name,
};
use super::store::TopicStore;

struct StoredTopic {
    record: TopicRecord,
    details: Vec<AuditRecord>,
}

/// Topic store kept entirely in memory
///
/// Every mutation runs under one write guard, which gives the same
/// all-or-nothing guarantees as the Fjall transactions. Contents are lost
/// when the process exits.
#[derive(Default)]
pub struct MemoryTopicStore {
    topics: RwLock<HashMap<String, StoredTopic>>,
}

impl MemoryTopicStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TopicStore for MemoryTopicStore {
    async fn create_topic(&self, topic: NewTopic) -> Result<()> {
        validate_topic_name(&topic.name)?;
        let mut topics = self.topics.write().await;

        if topics.contains_key(&topic.name) {
            return Err(LedgerError::TopicAlreadyExists(topic.name));
        }

        let record = TopicRecord::new(topic, Utc::now());
        debug!(topic = %record.name, "Created topic");
        topics.insert(
            record.name.clone(),
            StoredTopic {
                record,
                details: Vec::new(),
            },
        );
        Ok(())
    }

    async fn get_topic(&self, name: &str, fields: &[TopicField]) -> Result<Option<TopicView>> {
        let topics = self.topics.read().await;

        Ok(topics.get(name).map(|stored| {
            let details = fields
                .contains(&TopicField::Details)
                .then(|| stored.details.clone());
            stored.record.project(fields, details)
        }))
    }

    async fn list_visible_topics(&self) -> Result<Vec<String>> {
        let topics = self.topics.read().await;

        Ok(topics
            .values()
            .filter(|stored| !stored.record.list_hidden)
            .map(|stored| stored.record.name.clone())
            .collect())
    }

    async fn award_points(&self, topic: &str, award: PointsAward) -> Result<AuditRecord> {
        let mut topics = self.topics.write().await;

        let stored = topics
            .get_mut(topic)
            .ok_or_else(|| LedgerError::TopicNotFound(topic.to_string()))?;

        let seq = stored.record.apply(&award)?;
        let audit = AuditRecord::stamp(&award, Utc::now());
        stored.details.push(audit.clone());

        debug!(topic, to = %audit.to, points = audit.points, seq, "Recorded award");
        Ok(audit)
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_through_trait_object() {
        let store: Box<dyn TopicStore> = Box::new(MemoryTopicStore::new());

        store
            .create_topic(NewTopic::builder().name("lunch").build())
            .await
            .unwrap();
        store
            .award_points("lunch", PointsAward::new("@a", "@b", "#c", 5))
            .await
            .unwrap();

        let view = store
            .get_topic("lunch", &[TopicField::Totals, TopicField::Details])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.totals.unwrap()["@a"], 5);
        assert_eq!(view.details.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_overflow_writes_nothing() {
        let store = MemoryTopicStore::new();
        store
            .create_topic(NewTopic::builder().name("lunch").build())
            .await
            .unwrap();
        store
            .award_points("lunch", PointsAward::new("@a", "@b", "#c", i64::MIN))
            .await
            .unwrap();

        let err = store
            .award_points("lunch", PointsAward::new("@a", "@b", "#c", -1))
            .await
            .unwrap_err();
        assert!(err.is_store_error());

        let view = store
            .get_topic("lunch", &[TopicField::Totals, TopicField::Details])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.totals.unwrap()["@a"], i64::MIN);
        assert_eq!(view.details.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_names_are_rejected() {
        let store = MemoryTopicStore::new();

        for name in ["", "two words", "a\0b"] {
            let err = store
                .create_topic(NewTopic::builder().name(name).build())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), crate::ledger::ErrorKind::InvalidInput, "{name:?}");
        }
        assert!(store.list_visible_topics().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_topic() {
        let store = MemoryTopicStore::new();

        assert!(store.get_topic("x", &TopicField::ALL).await.unwrap().is_none());
        let err = store
            .award_points("x", PointsAward::new("@a", "@b", "#c", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::TopicNotFound(_)));
    }
}
