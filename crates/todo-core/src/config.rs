//! Client Configuration
//!
//! Where the remote task service lives and how settled mutations are
//! reconciled with it.

use serde::{Deserialize, Serialize};

/// Public demo endpoint the app talks to by default
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Fixed page size for the list request
pub const DEFAULT_PAGE_LIMIT: u32 = 15;

/// Remote service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    /// Value sent as `_limit` on the list request
    pub page_limit: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ServiceConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Join a path (with leading slash) onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// How a successful mutation becomes authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStrategy {
    /// Trust the record the service sent back
    #[default]
    AcceptResponse,
    /// Re-fetch the whole list after every successful mutation
    Refetch,
}

/// View-model settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewModelConfig {
    pub reconcile: ReconcileStrategy,
}

impl ViewModelConfig {
    pub fn with_reconcile(mut self, reconcile: ReconcileStrategy) -> Self {
        self.reconcile = reconcile;
        self
    }
}
