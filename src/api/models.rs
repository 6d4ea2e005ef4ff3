//! Wire types for the HTTP endpoints
//!
//! The slash-command endpoint accepts the chat platform's
//! `application/x-www-form-urlencoded` payload:
//!
//! ```text
//! token=xyz&text=give+%40ana+1+in+coffee&user_id=U1&user_name=bob&channel_id=C1&channel_name=general
//! ```
//!
//! Replies are [`CommandReply`](crate::commands::CommandReply) JSON bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::commands::CommandContext;
use crate::observability::MetricsSnapshot;

/// Form fields sent with every slash command; absent fields are empty
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlashCommandForm {
    pub token: String,
    pub command: String,
    pub text: String,
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub channel_name: String,
}

impl SlashCommandForm {
    pub fn context(&self) -> CommandContext {
        CommandContext {
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            channel_id: self.channel_id.clone(),
            channel_name: self.channel_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: BTreeMap<String, String>,
    pub version: String,
    pub metrics: MetricsSnapshot,
}
