//! Cache port for rendered task listings.

use super::StageQuery;
use crate::task::domain::{GroupId, Task};

/// Cache of per-user task listings.
///
/// Entries are scoped by group; any successful task update invalidates every
/// listing of the task's group. Each invalidation advances the group's
/// generation, and a listing read under an older generation is never stored.
pub trait TaskViewCache: Send + Sync {
    /// Returns a cached history listing.
    fn history(&self, key: StageQuery) -> Option<Vec<Task>>;

    /// Returns the group's current generation.
    ///
    /// Take it before reading the store and pass it to
    /// [`TaskViewCache::store_history`].
    fn generation(&self, group_id: GroupId) -> u64;

    /// Caches a history listing read at `generation`.
    ///
    /// The write is dropped when the group was invalidated since.
    fn store_history(&self, key: StageQuery, generation: u64, tasks: Vec<Task>);

    /// Drops every listing cached for the group and advances its generation.
    fn invalidate_group(&self, group_id: GroupId);
}
