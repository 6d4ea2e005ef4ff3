use std::sync::Arc;

use crate::commands::CommandRegistry;
use crate::config::Config;
use crate::ledger::Ledger;
use crate::observability::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<CommandRegistry>,
    pub ledger: Ledger,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, registry: CommandRegistry, ledger: Ledger) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            ledger,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
