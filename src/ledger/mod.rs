//! Topic ledger: per-topic point totals with an append-only activity log
//!
//! The ledger keeps one record per topic (configuration and running totals)
//! plus the audit records of every award. Two invariants are owned by the
//! store backends rather than by callers:
//!
//! - A topic is created at most once. Creation is a conditional insert, so of
//!   several concurrent creators exactly one succeeds and the rest get
//!   [`LedgerError::TopicAlreadyExists`].
//! - For every user, `totals[user]` equals the sum of the audit records sent
//!   to that user. An award appends its record and updates the total in one
//!   atomic write, and only against an existing topic.
//!
//! Caller-side policy (channel allow-lists, removal permission, rejecting
//! zero points) lives in the command layer, not here.
//!
//! ## Backends
//!
//! - [`FjallTopicStore`]: durable, one Fjall keyspace with `topics` and
//!   `details` partitions written through transactions
//! - [`MemoryTopicStore`]: in-process, for development and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pointsboard::ledger::{FjallTopicStore, Ledger, NewTopic, PointsAward, RankOrder};
//!
//! let store = FjallTopicStore::open("data/ledger")?;
//! let ledger = Ledger::new(Arc::new(store));
//!
//! ledger.create_topic(NewTopic::builder().name("coffee").build()).await?;
//! ledger.award_points("coffee", PointsAward::new("@ana", "@bob", "#general", 1)).await?;
//! let top = ledger.rank("coffee", RankOrder::Top, 3).await?;
//! ```

pub mod error;
pub mod memory;
pub mod model;
pub mod partitions;
pub mod ranking;
pub mod service;
pub mod store;

pub use error::{ErrorKind, LedgerError, Result};
pub use memory::MemoryTopicStore;
pub use model::{
    AuditRecord, ChooseBy, NewTopic, PointsAward, Standing, TopicField, TopicView,
    validate_topic_name,
};
pub use ranking::RankOrder;
pub use service::Ledger;
pub use store::{FjallTopicStore, TopicStore};
