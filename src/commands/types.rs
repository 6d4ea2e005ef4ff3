use serde::{Deserialize, Serialize};

/// Slash command users type to reach the bot, used in help and hint texts
pub const SLASH_COMMAND: &str = "/points";

/// Who invoked a command and from where
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub channel_name: String,
}

impl CommandContext {
    /// Mention markup for the invoking user, recorded as the giver of points
    pub fn giver_handle(&self) -> String {
        format!("<@{}|{}>", self.user_id, self.user_name)
    }

    /// Channel markup recorded alongside each award
    pub fn channel_handle(&self) -> String {
        format!("<#{}|{}>", self.channel_id, self.channel_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Visible to everyone in the channel
    InChannel,
    /// Visible only to the invoking user
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub text: String,
}

/// Reply body returned to the chat platform
///
/// A reply without `response_type` is shown only to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl CommandReply {
    /// Private reply, only the caller sees it
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response_type: None,
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    /// Reply posted to the whole channel
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: Some(ResponseType::InChannel),
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, text: impl Into<String>) -> Self {
        self.attachments.push(Attachment { text: text.into() });
        self
    }

    pub fn is_public(&self) -> bool {
        self.response_type == Some(ResponseType::InChannel)
    }
}
