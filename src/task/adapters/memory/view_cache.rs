//! In-memory task listing caches.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{GroupId, Task},
    ports::{StageQuery, TaskViewCache},
};

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<StageQuery, Vec<Task>>,
    generations: HashMap<GroupId, u64>,
}

impl CacheState {
    fn generation(&self, group_id: GroupId) -> u64 {
        self.generations.get(&group_id).copied().unwrap_or_default()
    }
}

/// Process-local cache of history listings.
///
/// Lock poisoning degrades to a cache miss.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskViewCache {
    state: Arc<RwLock<CacheState>>,
}

impl InMemoryTaskViewCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().map_or(0, |state| state.entries.len())
    }

    /// Returns `true` when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TaskViewCache for InMemoryTaskViewCache {
    fn history(&self, key: StageQuery) -> Option<Vec<Task>> {
        self.state.read().ok()?.entries.get(&key).cloned()
    }

    fn generation(&self, group_id: GroupId) -> u64 {
        self.state
            .read()
            .map_or(u64::MAX, |state| state.generation(group_id))
    }

    fn store_history(&self, key: StageQuery, generation: u64, tasks: Vec<Task>) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        if state.generation(key.group_id) != generation {
            tracing::debug!(group_id = %key.group_id, "dropping stale history listing");
            return;
        }
        state.entries.insert(key, tasks);
    }

    fn invalidate_group(&self, group_id: GroupId) {
        if let Ok(mut state) = self.state.write() {
            state.entries.retain(|key, _| key.group_id != group_id);
            let generation = state.generations.entry(group_id).or_default();
            *generation = generation.wrapping_add(1);
        }
    }
}

/// Cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTaskViewCache;

impl TaskViewCache for DisabledTaskViewCache {
    fn history(&self, _key: StageQuery) -> Option<Vec<Task>> {
        None
    }

    fn generation(&self, _group_id: GroupId) -> u64 {
        0
    }

    fn store_history(&self, _key: StageQuery, _generation: u64, _tasks: Vec<Task>) {}

    fn invalidate_group(&self, _group_id: GroupId) {}
}
