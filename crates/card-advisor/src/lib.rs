pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod preferences;
pub mod recommendation;
pub mod telemetry;
