//! HTTP surface: the slash-command endpoint plus operator and health routes

mod auth;
mod error;
pub mod models;
mod server;
pub mod services;
pub mod state;

pub use error::ApiError;
pub use server::{router, run};
pub use state::AppState;
