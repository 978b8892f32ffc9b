//! Core module - project discovery, configuration and run history

pub mod config;
pub mod project;
pub mod store;

pub use config::{Config, ConfigError};
pub use project::{Project, ProjectError};
pub use store::{HistoryStore, RunRecord, StoreError};
