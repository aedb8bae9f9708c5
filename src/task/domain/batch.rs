//! Batch identifiers and their claim ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Separator between a batch prefix and its numbered segment.
const SEGMENT_SEPARATOR: char = '-';

/// Named group of tasks claimed together.
///
/// Batches order by the text before the first `-`, then by the number formed
/// from the digits of the second `-`-separated segment (zero when it has
/// none), then by the raw identifier. `Batch-2` therefore sorts before
/// `Batch-10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Wraps a batch identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first separator, or the whole identifier.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0
            .split(SEGMENT_SEPARATOR)
            .next()
            .unwrap_or_default()
    }

    /// Number formed by the digits of the second segment.
    ///
    /// Returns zero when the segment is missing or holds no digits and
    /// saturates at `u64::MAX` for oversized values.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        let Some(segment) = self.0.split(SEGMENT_SEPARATOR).nth(1) else {
            return 0;
        };
        segment
            .chars()
            .filter_map(|ch| ch.to_digit(10))
            .fold(0_u64, |acc, digit| {
                acc.saturating_mul(10).saturating_add(u64::from(digit))
            })
    }
}

impl Ord for BatchId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix()
            .cmp(other.prefix())
            .then_with(|| self.sequence().cmp(&other.sequence()))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for BatchId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl AsRef<str> for BatchId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the batch that should be claimed first, if any.
#[must_use]
pub fn earliest_batch<'a>(batches: impl IntoIterator<Item = &'a BatchId>) -> Option<&'a BatchId> {
    batches.into_iter().min()
}
