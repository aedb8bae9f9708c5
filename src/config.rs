//! Workflow tuning loaded at construction time.

use crate::task::domain::{DEFAULT_COUNT_BASED_GROUPS, GroupId, GroupPayPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default number of tasks in a working set.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default number of tasks shown in a history listing.
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// Default bound on a single store call, in milliseconds.
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

/// Errors raised while loading a [`WorkflowConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid configuration JSON.
    #[error("invalid workflow configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A size or timeout field was zero.
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Tunables shared by the workflow services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Maximum tasks returned or claimed per allocation.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Maximum tasks in a history listing.
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    /// Groups paid per reviewed item instead of per syllable.
    #[serde(default = "default_count_based_groups")]
    pub count_based_groups: Vec<GroupId>,
    /// Bound on a single store call, in milliseconds.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

const fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

fn default_count_based_groups() -> Vec<GroupId> {
    DEFAULT_COUNT_BASED_GROUPS.map(GroupId::new).to_vec()
}

const fn default_store_timeout_ms() -> u64 {
    DEFAULT_STORE_TIMEOUT_MS
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            history_size: DEFAULT_HISTORY_SIZE,
            count_based_groups: default_count_based_groups(),
            store_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
        }
    }
}

impl WorkflowConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the JSON is malformed or a value is out
    /// of range.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that sizes and the store timeout are non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroValue`] naming the offending field.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroValue("page_size"));
        }
        if self.history_size == 0 {
            return Err(ConfigError::ZeroValue("history_size"));
        }
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::ZeroValue("store_timeout_ms"));
        }
        Ok(())
    }

    /// Returns the store call bound.
    #[must_use]
    pub const fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Builds the pay policy for the configured count-based groups.
    #[must_use]
    pub fn pay_policy(&self) -> GroupPayPolicy {
        GroupPayPolicy::new(self.count_based_groups.iter().copied())
    }
}
