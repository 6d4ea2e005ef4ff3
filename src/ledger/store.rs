use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use fjall::{Config, PartitionCreateOptions, PersistMode, TxKeyspace, TxPartitionHandle};
use tracing::{debug, info};

use super::error::{LedgerError, Result};
use super::model::{
    AuditRecord, NewTopic, PointsAward, TopicField, TopicRecord, TopicView, validate_topic_name,
};
use super::partitions::{
    DETAILS_PARTITION, TOPICS_PARTITION, decode_topic_key, encode_detail_key,
    encode_detail_prefix, encode_topic_key,
};

/// Durable storage for topics
///
/// Implementations own all cross-field consistency: `create_topic` is a
/// conditional insert and `award_points` appends the audit record and bumps
/// the total in one atomic write. Neither re-checks caller-side policy
/// (channel allow-lists, removal permission, zero points).
#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Insert the topic unless one with the same name already exists
    ///
    /// Names that fail [`validate_topic_name`] are rejected before any write.
    async fn create_topic(&self, topic: NewTopic) -> Result<()>;

    /// Read a projection of the topic, `None` if it does not exist
    async fn get_topic(&self, name: &str, fields: &[TopicField]) -> Result<Option<TopicView>>;

    /// Names of every topic not flagged `list_hidden`, in no particular order
    async fn list_visible_topics(&self) -> Result<Vec<String>>;

    /// Append an audit record and apply it to the recipient's total
    async fn award_points(&self, topic: &str, award: PointsAward) -> Result<AuditRecord>;

    /// Make every committed write durable
    async fn flush(&self) -> Result<()>;
}

/// Fjall-backed topic storage
///
/// Writes go through single-writer transactions, so the read-check-write
/// sequences in `create_topic` and `award_points` cannot interleave.
#[derive(Clone)]
pub struct FjallTopicStore {
    keyspace: TxKeyspace,
    topics: TxPartitionHandle,
    details: TxPartitionHandle,
}

impl FjallTopicStore {
    /// Open or create a Fjall store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening Fjall topic store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open_transactional()?;
        let topics = keyspace.open_partition(TOPICS_PARTITION, PartitionCreateOptions::default())?;
        let details =
            keyspace.open_partition(DETAILS_PARTITION, PartitionCreateOptions::default())?;

        info!("Fjall topic store opened successfully");
        Ok(Self {
            keyspace,
            topics,
            details,
        })
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    /// Count stored topics and audit records
    #[cfg(test)]
    fn stats(&self) -> Result<StoreStats> {
        let snapshot = self.keyspace.read_tx();
        let mut topic_count = 0;
        let mut detail_count = 0;

        for item in snapshot.iter(&self.topics) {
            item?;
            topic_count += 1;
        }

        for item in snapshot.iter(&self.details) {
            item?;
            detail_count += 1;
        }

        Ok(StoreStats {
            topic_count,
            detail_count,
        })
    }

    fn insert_if_absent(&self, topic: NewTopic) -> Result<()> {
        validate_topic_name(&topic.name)?;
        let key = encode_topic_key(&topic.name);
        let mut tx = self.keyspace.write_tx();

        if tx.get(&self.topics, &key)?.is_some() {
            // Dropping the transaction discards it
            return Err(LedgerError::TopicAlreadyExists(topic.name));
        }

        let record = TopicRecord::new(topic, Utc::now());
        tx.insert(&self.topics, key, serde_json::to_vec(&record)?);
        tx.commit()?;

        debug!(topic = %record.name, "Created topic");
        Ok(())
    }

    fn read_projection(&self, name: &str, fields: &[TopicField]) -> Result<Option<TopicView>> {
        let snapshot = self.keyspace.read_tx();

        let Some(value) = snapshot.get(&self.topics, encode_topic_key(name))? else {
            return Ok(None);
        };
        let record: TopicRecord = serde_json::from_slice(&value)?;

        let details = if fields.contains(&TopicField::Details) {
            let mut details = Vec::with_capacity(record.next_detail_seq as usize);
            for item in snapshot.prefix(&self.details, encode_detail_prefix(name)) {
                let (_, value) = item?;
                details.push(serde_json::from_slice(&value)?);
            }
            Some(details)
        } else {
            None
        };

        Ok(Some(record.project(fields, details)))
    }

    fn scan_visible(&self) -> Result<Vec<String>> {
        let snapshot = self.keyspace.read_tx();
        let mut names = Vec::new();

        for item in snapshot.iter(&self.topics) {
            let (key, value) = item?;
            let record: TopicRecord = serde_json::from_slice(&value)?;
            if record.list_hidden {
                continue;
            }
            if let Some(name) = decode_topic_key(&key) {
                names.push(name);
            }
        }

        Ok(names)
    }

    fn apply_award(&self, topic: &str, award: PointsAward) -> Result<AuditRecord> {
        let key = encode_topic_key(topic);
        let mut tx = self.keyspace.write_tx();

        let Some(value) = tx.get(&self.topics, &key)? else {
            return Err(LedgerError::TopicNotFound(topic.to_string()));
        };
        let mut record: TopicRecord = serde_json::from_slice(&value)?;

        let seq = record.apply(&award)?;
        let audit = AuditRecord::stamp(&award, Utc::now());

        tx.insert(
            &self.details,
            encode_detail_key(topic, seq),
            serde_json::to_vec(&audit)?,
        );
        tx.insert(&self.topics, key, serde_json::to_vec(&record)?);
        tx.commit()?;

        debug!(topic, to = %audit.to, points = audit.points, seq, "Recorded award");
        Ok(audit)
    }
}

#[async_trait]
impl TopicStore for FjallTopicStore {
    async fn create_topic(&self, topic: NewTopic) -> Result<()> {
        self.insert_if_absent(topic)
    }

    async fn get_topic(&self, name: &str, fields: &[TopicField]) -> Result<Option<TopicView>> {
        self.read_projection(name, fields)
    }

    async fn list_visible_topics(&self) -> Result<Vec<String>> {
        self.scan_visible()
    }

    async fn award_points(&self, topic: &str, award: PointsAward) -> Result<AuditRecord> {
        self.apply_award(topic, award)
    }

    async fn flush(&self) -> Result<()> {
        self.persist()
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
struct StoreStats {
    topic_count: usize,
    detail_count: usize,
}
