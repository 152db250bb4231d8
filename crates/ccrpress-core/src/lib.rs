//! ccrpress core: publication models and configuration shared by every crate.

pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, FirstPagePolicy};
pub use error::{CoreError, Result};
pub use models::*;
