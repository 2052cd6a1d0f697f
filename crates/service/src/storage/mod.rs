//! Storage abstractions for mock sets
//!
//! `MockStore` is the capability contract shared by both backends:
//! - `ephemeral::EphemeralStore`: multi-tenant, records expire after a retention window
//! - `static_store::StaticStore`: one mutable snapshot mirrored to a JSON file

use std::sync::Arc;

use async_trait::async_trait;
use models::{Endpoint, Mock};

use crate::errors::ServiceError;

pub mod ephemeral;
pub mod persist;
pub mod static_store;

/// How an update request changes the addressed mock set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Replace,
    Merge,
    Clear,
}

impl UpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateKind::Replace => "replace",
            UpdateKind::Merge => "merge",
            UpdateKind::Clear => "clear",
        }
    }
}

/// An update with its payload attached.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateMode {
    /// Discard the current mock set and use this one.
    Replace(Mock),
    /// Overlay these paths; unmentioned paths survive.
    Merge(Mock),
    /// Reset to the empty mock.
    Clear,
}

impl UpdateMode {
    pub fn kind(&self) -> UpdateKind {
        match self {
            UpdateMode::Replace(_) => UpdateKind::Replace,
            UpdateMode::Merge(_) => UpdateKind::Merge,
            UpdateMode::Clear => UpdateKind::Clear,
        }
    }
}

/// Trait abstraction for mock storage.
/// Implementations are process-wide and shared between request tasks.
#[async_trait]
pub trait MockStore: Send + Sync {
    /// Short backend name for logs.
    fn kind(&self) -> &'static str;

    /// Register a new mock set and return its identifier.
    async fn create(&self, mock: Mock) -> Result<String, ServiceError>;

    /// Resolve `path` inside the mock set addressed by `id`.
    async fn fetch(&self, id: &str, path: &str) -> Result<Endpoint, ServiceError>;

    /// The whole mock set addressed by `id`.
    async fn fetch_mock(&self, id: &str) -> Result<Arc<Mock>, ServiceError>;

    /// Replace, merge into or clear the addressed mock set.
    async fn update(&self, id: &str, mode: UpdateMode) -> Result<(), ServiceError>;

    /// Release backend resources. Safe to call more than once.
    async fn close(&self);
}
