use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::builtin::{
    AddTopicCommand, ChooseNextCommand, HelpCommand, ListCommand, PointsCommand, RankCommand,
};
use super::traits::{CommandError, CommandHandler};
use super::types::{CommandContext, CommandReply, SLASH_COMMAND};
use crate::ledger::Ledger;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("command not found: {0}")]
    NotFound(String),
}

/// Registry mapping action names to command handlers
#[derive(Clone)]
pub struct CommandRegistry {
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, action: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(action.into(), handler);
    }

    pub fn get(&self, action: &str) -> Result<Arc<dyn CommandHandler>, RegistryError> {
        self.handlers
            .get(action)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(action.to_string()))
    }

    pub fn has_command(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Usage lines of every registered command, ordered by action name
    pub fn usages(&self) -> Vec<&'static str> {
        self.handlers.values().map(|handler| handler.usage()).collect()
    }

    /// Split the command text into action and arguments and run the handler
    ///
    /// Empty text and unknown actions produce hint replies rather than errors.
    pub async fn dispatch(
        &self,
        ledger: &Ledger,
        text: &str,
        ctx: &CommandContext,
    ) -> Result<CommandReply, CommandError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(CommandReply::text(format!(
                "Tell me what to do! Try `{SLASH_COMMAND} help` for some examples"
            )));
        }

        let (action, args) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        let Ok(handler) = self.get(action) else {
            debug!(action, "Unknown action");
            return Ok(CommandReply::text(format!(
                "I don't know how to `{action}`. Try `{SLASH_COMMAND} help` for some examples"
            )));
        };

        debug!(action, args, "Dispatching command");
        handler.execute(ledger, args.trim(), ctx).await
    }

    /// Registry with every built-in command
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("addTopic", Arc::new(AddTopicCommand));
        registry.register("give", Arc::new(PointsCommand::give()));
        registry.register("remove", Arc::new(PointsCommand::remove()));
        registry.register("rank", Arc::new(RankCommand));
        registry.register("list", Arc::new(ListCommand));
        registry.register("chooseNext", Arc::new(ChooseNextCommand));

        let help = HelpCommand::new(registry.usages());
        registry.register("help", Arc::new(help));

        registry
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
