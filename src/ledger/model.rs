//! Topic data model shared by every store backend.
//!
//! A topic is persisted as a [`TopicRecord`] (configuration plus running
//! totals) and a separate, append-only sequence of [`AuditRecord`]s. Keeping
//! the audit log out of the record means reading totals never costs a scan of
//! the log.

use std::collections::{BTreeMap, BTreeSet};

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{LedgerError, Result};

/// Which extremum the winner query targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChooseBy {
    #[default]
    Min,
    Max,
}

impl std::str::FromStr for ChooseBy {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "min" => Ok(ChooseBy::Min),
            "max" => Ok(ChooseBy::Max),
            other => Err(format!("expected 'min' or 'max', got '{other}'")),
        }
    }
}

/// Parameters for creating a topic
///
/// ```rust,ignore
/// let topic = NewTopic::builder().name("coffee").list_hidden(true).build();
/// ```
#[derive(Debug, Clone, Builder)]
pub struct NewTopic {
    #[builder(into)]
    pub name: String,
    #[builder(default)]
    pub list_hidden: bool,
    /// Empty means the topic is usable from any channel
    #[builder(default)]
    pub allowed_channels: BTreeSet<String>,
    #[builder(default = true)]
    pub allow_points_remove: bool,
    #[builder(default)]
    pub choose_by: ChooseBy,
}

/// One points adjustment as requested by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsAward {
    pub to: String,
    pub from: String,
    pub channel: String,
    pub points: i64,
}

impl PointsAward {
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        channel: impl Into<String>,
        points: i64,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            channel: channel.into(),
            points,
        }
    }
}

/// Entry of a topic's append-only activity log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub channel: String,
    pub points: i64,
}

impl AuditRecord {
    pub fn stamp(award: &PointsAward, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            from: award.from.clone(),
            to: award.to.clone(),
            channel: award.channel.clone(),
            points: award.points,
        }
    }
}

/// Persisted form of a topic, minus its audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRecord {
    pub name: String,
    #[serde(default)]
    pub allowed_channels: BTreeSet<String>,
    pub allow_points_remove: bool,
    pub list_hidden: bool,
    pub choose_by: ChooseBy,
    #[serde(default)]
    pub totals: BTreeMap<String, i64>,
    /// Sequence number the next audit record will be stored under
    #[serde(default)]
    pub next_detail_seq: u64,
    pub created_at: DateTime<Utc>,
}

impl TopicRecord {
    pub fn new(topic: NewTopic, created_at: DateTime<Utc>) -> Self {
        Self {
            name: topic.name,
            allowed_channels: topic.allowed_channels,
            allow_points_remove: topic.allow_points_remove,
            list_hidden: topic.list_hidden,
            choose_by: topic.choose_by,
            totals: BTreeMap::new(),
            next_detail_seq: 0,
            created_at,
        }
    }

    /// Add the award to the recipient's total and claim the next audit sequence
    ///
    /// Leaves the record untouched on overflow.
    pub fn apply(&mut self, award: &PointsAward) -> Result<u64> {
        let current = self.totals.get(&award.to).copied().unwrap_or(0);
        let updated = current
            .checked_add(award.points)
            .ok_or_else(|| LedgerError::PointsOverflow {
                topic: self.name.clone(),
                user: award.to.clone(),
            })?;

        self.totals.insert(award.to.clone(), updated);
        let seq = self.next_detail_seq;
        self.next_detail_seq += 1;
        Ok(seq)
    }

    /// Build a projection holding only the requested fields
    ///
    /// `details` is only consulted when [`TopicField::Details`] is requested.
    pub fn project(&self, fields: &[TopicField], details: Option<Vec<AuditRecord>>) -> TopicView {
        let wants = |field: TopicField| fields.contains(&field);

        TopicView {
            name: self.name.clone(),
            allowed_channels: wants(TopicField::AllowedChannels)
                .then(|| self.allowed_channels.clone()),
            allow_points_remove: wants(TopicField::AllowPointsRemove)
                .then_some(self.allow_points_remove),
            list_hidden: wants(TopicField::ListHidden).then_some(self.list_hidden),
            choose_by: wants(TopicField::ChooseBy).then_some(self.choose_by),
            totals: wants(TopicField::Totals).then(|| self.totals.clone()),
            details: if wants(TopicField::Details) {
                Some(details.unwrap_or_default())
            } else {
                None
            },
            created_at: wants(TopicField::CreatedAt).then_some(self.created_at),
        }
    }
}

/// Topic attributes that can be projected by a read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicField {
    AllowedChannels,
    AllowPointsRemove,
    ListHidden,
    ChooseBy,
    Totals,
    Details,
    CreatedAt,
}

impl TopicField {
    pub const ALL: [TopicField; 7] = [
        TopicField::AllowedChannels,
        TopicField::AllowPointsRemove,
        TopicField::ListHidden,
        TopicField::ChooseBy,
        TopicField::Totals,
        TopicField::Details,
        TopicField::CreatedAt,
    ];
}

/// Partial view of a topic; fields that were not requested are `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_channels: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_points_remove: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choose_by: Option<ChooseBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<BTreeMap<String, i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<AuditRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A user and their total within one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub user: String,
    pub points: i64,
}

impl Standing {
    pub fn new(user: impl Into<String>, points: i64) -> Self {
        Self {
            user: user.into(),
            points,
        }
    }
}

/// Topic names are non-empty and free of whitespace and control characters
pub fn validate_topic_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control());

    if valid {
        Ok(())
    } else {
        Err(LedgerError::InvalidTopicName(name.to_string()))
    }
}
