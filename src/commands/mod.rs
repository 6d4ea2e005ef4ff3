//! Chat command layer
//!
//! Turns the free-text part of a slash command into ledger calls and formats
//! the result as a chat reply. This is where caller-side policy lives: topic
//! channel allow-lists, the removal permission and rejecting zero points.
//!
//! ## Key Components
//!
//! - [`CommandHandler`] - Trait implemented by each action
//! - [`CommandRegistry`] - Maps action names to handlers and dispatches text
//! - [`CommandContext`] - Invoking user and channel
//! - [`CommandReply`] - Reply body sent back to the chat platform
//!
//! ## Example
//!
//! ```rust,ignore
//! use pointsboard::commands::{CommandContext, CommandRegistry};
//!
//! let registry = CommandRegistry::with_defaults();
//! let reply = registry.dispatch(&ledger, "rank top 3 in coffee", &ctx).await?;
//! ```

mod builtin;
mod registry;
mod traits;
mod types;

pub use builtin::{
    AddTopicCommand, ChooseNextCommand, HelpCommand, ListCommand, PointsCommand, RankCommand,
};
pub use registry::{CommandRegistry, RegistryError};
pub use traits::{CommandError, CommandHandler};
pub use types::{Attachment, CommandContext, CommandReply, ResponseType, SLASH_COMMAND};
