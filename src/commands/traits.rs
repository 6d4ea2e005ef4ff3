use async_trait::async_trait;
use thiserror::Error;

use super::types::{CommandContext, CommandReply};
use crate::ledger::{Ledger, LedgerError};

/// Failures a command cannot turn into a reply
///
/// Usage mistakes, missing topics and policy refusals are ordinary replies;
/// only faults of the underlying store end up here.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("ledger failure: {0}")]
    Ledger(#[from] LedgerError),
}

/// One chat action, e.g. `give` or `rank`
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Usage line shown by `help`
    fn usage(&self) -> &'static str;

    /// Run the action with its argument text (everything after the action name)
    async fn execute(
        &self,
        ledger: &Ledger,
        args: &str,
        ctx: &CommandContext,
    ) -> Result<CommandReply, CommandError>;
}
