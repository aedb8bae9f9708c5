//! Annotator pay calculation.
//!
//! Two schemes coexist: a group-sensitive rate mixing reviewed time with
//! either reviewed items or syllables, and a flat per-task rate by role.

use super::{GroupId, Role};
use std::collections::BTreeSet;

/// Cents paid per reviewed minute, expressed per reviewed second times three.
///
/// Five units per minute is `500 / 60 = 25 / 3` cents per second, so amounts
/// are accumulated in thirds of a cent to stay exact.
const THIRD_CENTS_PER_SECOND: u64 = 25;
/// Two units per reviewed item, in thirds of a cent.
const THIRD_CENTS_PER_ITEM: u64 = 600;
/// Forty hundredths per syllable, in thirds of a cent.
const THIRD_CENTS_PER_SYLLABLE: u64 = 120;

/// Group ids paid per reviewed item rather than per syllable by default.
pub const DEFAULT_COUNT_BASED_GROUPS: [i64; 3] = [1, 2, 7];

/// Work measured for a group-sensitive pay calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewedWork {
    /// Total reviewed audio time in seconds.
    pub reviewed_seconds: u64,
    /// Syllables covered by the reviewed items.
    pub syllable_count: u64,
    /// Number of reviewed items.
    pub reviewed_count: u64,
}

/// Pay policy distinguishing item-counted groups from syllable-counted ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPayPolicy {
    count_based_groups: BTreeSet<GroupId>,
}

impl GroupPayPolicy {
    /// Creates a policy with the given item-counted groups.
    #[must_use]
    pub fn new(count_based_groups: impl IntoIterator<Item = GroupId>) -> Self {
        Self {
            count_based_groups: count_based_groups.into_iter().collect(),
        }
    }

    /// Returns `true` when the group is paid per reviewed item.
    #[must_use]
    pub fn is_count_based(&self, group_id: GroupId) -> bool {
        self.count_based_groups.contains(&group_id)
    }

    /// Computes pay rounded half-up to two decimals, e.g. `"12.50"`.
    #[must_use]
    pub fn pay(&self, group_id: GroupId, work: ReviewedWork) -> String {
        let time_component = work.reviewed_seconds.saturating_mul(THIRD_CENTS_PER_SECOND);
        let volume_component = if self.is_count_based(group_id) {
            work.reviewed_count.saturating_mul(THIRD_CENTS_PER_ITEM)
        } else {
            work.syllable_count.saturating_mul(THIRD_CENTS_PER_SYLLABLE)
        };
        let third_cents = time_component.saturating_add(volume_component);
        // Thirds never land on a half, so +1 then floor is half-up rounding.
        let cents = third_cents.saturating_add(1).div_euclid(3);
        format!("{}.{:02}", cents.div_euclid(100), cents.rem_euclid(100))
    }
}

impl Default for GroupPayPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_COUNT_BASED_GROUPS.map(GroupId::new))
    }
}

/// Flat amount paid per completed task for a role.
#[must_use]
pub const fn flat_rate(role: Role) -> u64 {
    match role {
        Role::Transcriber => 5,
        Role::Reviewer => 4,
        Role::FinalReviewer => 6,
    }
}

/// Computes flat role-based pay for a completed-task count.
///
/// Fractional counts are floored. Unknown roles, non-positive and
/// non-finite counts all pay zero.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "count is finite and positive; `as` saturates oversized values"
)]
pub fn flat_pay(task_count: f64, role: &str) -> u64 {
    let Ok(parsed_role) = Role::try_from(role) else {
        return 0;
    };
    if !task_count.is_finite() || task_count <= 0.0 {
        return 0;
    }
    let whole_tasks = task_count.floor() as u64;
    whole_tasks.saturating_mul(flat_rate(parsed_role))
}
