pub mod api;
pub mod commands;
pub mod config;
pub mod ledger;
pub mod observability;
