use std::sync::Arc;

use rand::Rng;
use rand::rngs::OsRng;
use tracing::{debug, info, warn};

use super::error::{LedgerError, Result};
use super::model::{
    AuditRecord, ChooseBy, NewTopic, PointsAward, Standing, TopicField, TopicView,
    validate_topic_name,
};
use super::memory::MemoryTopicStore;
use super::ranking::{RankOrder, pick_winner, rank_totals};
use super::store::{FjallTopicStore, TopicStore};
use crate::config::{StorageBackend, StorageConfig};

/// Query surface over an injected [`TopicStore`]
///
/// The ledger holds no state of its own; cloning it shares the store.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn TopicStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn TopicStore>) -> Self {
        Self { store }
    }

    /// Build a ledger on the backend selected by configuration
    pub fn open(storage: &StorageConfig) -> Result<Self> {
        let store: Arc<dyn TopicStore> = match storage.backend {
            StorageBackend::Fjall => Arc::new(FjallTopicStore::open(&storage.data_path)?),
            StorageBackend::Memory => {
                warn!("Using in-memory topic store, data is lost on exit");
                Arc::new(MemoryTopicStore::new())
            }
        };
        Ok(Self::new(store))
    }

    pub async fn create_topic(&self, topic: NewTopic) -> Result<()> {
        validate_topic_name(&topic.name)?;
        let name = topic.name.clone();

        match self.store.create_topic(topic).await {
            Ok(()) => {
                info!(topic = %name, "Topic created");
                Ok(())
            }
            Err(err) => {
                if err.is_store_error() {
                    warn!(topic = %name, error = %err, "Topic creation failed");
                }
                Err(err)
            }
        }
    }

    pub async fn get_topic(&self, name: &str, fields: &[TopicField]) -> Result<Option<TopicView>> {
        debug!(topic = name, ?fields, "Looking up topic");
        self.store.get_topic(name, fields).await
    }

    pub async fn list_visible_topics(&self) -> Result<Vec<String>> {
        self.store.list_visible_topics().await
    }

    /// Record an award; caller-side policy must already have been checked
    pub async fn award_points(&self, topic: &str, award: PointsAward) -> Result<AuditRecord> {
        let audit = self.store.award_points(topic, award).await?;
        info!(topic, to = %audit.to, from = %audit.from, points = audit.points, "Points awarded");
        Ok(audit)
    }

    /// Flush committed writes to durable storage
    pub async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }

    /// Up to `limit` users ordered by total
    pub async fn rank(&self, topic: &str, order: RankOrder, limit: usize) -> Result<Vec<Standing>> {
        let view = self.require(topic, &[TopicField::Totals]).await?;
        let totals = view.totals.unwrap_or_default();
        Ok(rank_totals(&totals, order, limit))
    }

    /// Pick a winner with the operating system's CSPRNG
    pub async fn choose_winner(&self, topic: &str) -> Result<Standing> {
        self.choose_winner_with(topic, &mut OsRng).await
    }

    /// Pick a winner with a caller-supplied random source
    pub async fn choose_winner_with<R: Rng + Send + ?Sized>(
        &self,
        topic: &str,
        rng: &mut R,
    ) -> Result<Standing> {
        let view = self
            .require(topic, &[TopicField::Totals, TopicField::ChooseBy])
            .await?;
        let totals = view.totals.unwrap_or_default();
        let choose_by = view.choose_by.unwrap_or(ChooseBy::Min);

        pick_winner(&totals, choose_by, rng).ok_or_else(|| LedgerError::EmptyTotals(topic.to_string()))
    }

    async fn require(&self, topic: &str, fields: &[TopicField]) -> Result<TopicView> {
        self.get_topic(topic, fields)
            .await?
            .ok_or_else(|| LedgerError::TopicNotFound(topic.to_string()))
    }
}
