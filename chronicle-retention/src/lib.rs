//! Retention engine: policy resolution, strategy selection, and bounded
//! batch cleanup over audit storage.

pub mod redaction;
pub mod service;
pub mod strategy;

pub use service::RetentionService;
pub use strategy::{AnonymizeStrategy, ArchiveStrategy, DeleteStrategy};
