// Copyright 2026 cs-policy Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use cs_policy_common::{
    code::EntryHandle,
    list::{SlabList, Token},
    strict_assert_eq,
};
use serde::{Deserialize, Serialize};

use crate::{
    metadata::MetadataStore,
    policy::{Host, Policy},
};

/// Lru eviction algorithm config.
///
/// Lru has no tunables. The config exists so that every policy can be selected and described the same
/// way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LruConfig {}

/// Position of an entry in the recency queue.
#[derive(Debug)]
struct LruMeta {
    token: Token,
}

/// Least-recently-used replacement.
///
/// A single queue ordered by the last reference, most recent at the tail. Victims are taken from the
/// head.
#[derive(Debug)]
pub struct Lru<H>
where
    H: EntryHandle,
{
    queue: SlabList<H>,
    meta: MetadataStore<H, LruMeta>,
}

impl<H> Default for Lru<H>
where
    H: EntryHandle,
{
    fn default() -> Self {
        Self::new(&LruConfig::default())
    }
}

impl<H> Lru<H>
where
    H: EntryHandle,
{
    /// Stable policy name.
    pub const NAME: &'static str = "lru";

    /// Create an empty lru policy.
    pub fn new(_config: &LruConfig) -> Self {
        Self {
            queue: SlabList::new(),
            meta: MetadataStore::default(),
        }
    }

    /// Handles from the least to the most recently used.
    pub fn dump(&self) -> Vec<H> {
        self.queue.iter().cloned().collect()
    }

    /// Move a tracked handle to the tail.
    fn touch(&mut self, handle: &H, hook: &'static str) {
        let meta = self.meta.get_tracked_mut(handle, hook);
        let h = self.queue.remove(meta.token);
        strict_assert_eq!(h.as_ref(), Some(handle));
        meta.token = self.queue.push_back(handle.clone());
        tracing::trace!(?handle, hook, "[lru]: relocate to tail");
    }
}

impl<H> Policy<H> for Lru<H>
where
    H: EntryHandle,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn after_insert(&mut self, handle: H, host: &mut dyn Host<H>) {
        tracing::trace!(?handle, "[lru]: insert");
        let token = self.queue.push_back(handle.clone());
        self.meta.attach(handle, LruMeta { token }, "after_insert");
        self.evict_entries(host);
    }

    fn after_refresh(&mut self, handle: &H) {
        self.touch(handle, "after_refresh");
    }

    fn before_use(&mut self, handle: &H) {
        self.touch(handle, "before_use");
    }

    fn before_erase(&mut self, handle: &H) {
        let meta = self.meta.detach_tracked(handle, "before_erase");
        let h = self.queue.remove(meta.token);
        strict_assert_eq!(h.as_ref(), Some(handle));
        tracing::trace!(?handle, "[lru]: erase");
    }

    fn evict_entries(&mut self, host: &mut dyn Host<H>) {
        let mut evicted = 0;
        while host.current_size() > host.capacity_limit() {
            let handle = match self.queue.pop_front() {
                Some(handle) => handle,
                None => panic!(
                    "[lru]: host size {} exceeds limit {} but no entry is tracked",
                    host.current_size(),
                    host.capacity_limit()
                ),
            };
            self.meta.detach_tracked(&handle, "evict_entries");
            tracing::trace!(?handle, "[lru]: evict");
            host.notify_before_evict(handle);
            evicted += 1;
        }
        if evicted > 0 {
            tracing::debug!(evicted, size = host.current_size(), "[lru]: eviction finished");
        }
    }

    fn len(&self) -> usize {
        strict_assert_eq!(self.queue.len(), self.meta.len());
        self.queue.len()
    }

    fn contains(&self, handle: &H) -> bool {
        self.meta.contains(handle)
    }
}
