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

use cs_policy_common::code::EntryHandle;
use hashbrown::{hash_map::Entry, HashMap};

/// Per-entry eviction metadata owned by a policy, keyed by entry handle.
///
/// Every handle present here sits in exactly one of the owning policy's queues, and every queued
/// handle is present here. Looking up a handle that is expected to be tracked but is not means the
/// host broke the hook protocol, so the `*_tracked` accessors panic with the name of the hook.
#[derive(Debug)]
pub struct MetadataStore<H, M>
where
    H: EntryHandle,
{
    map: HashMap<H, M>,
}

impl<H, M> Default for MetadataStore<H, M>
where
    H: EntryHandle,
{
    fn default() -> Self {
        Self { map: HashMap::new() }
    }
}

impl<H, M> MetadataStore<H, M>
where
    H: EntryHandle,
{
    /// Attach metadata to a handle that is not tracked yet.
    ///
    /// # Panics
    ///
    /// Panics if the handle is already tracked.
    pub fn attach(&mut self, handle: H, meta: M, hook: &'static str) {
        match self.map.entry(handle) {
            Entry::Occupied(o) => panic!("{hook}: handle {:?} is already tracked", o.key()),
            Entry::Vacant(v) => {
                v.insert(meta);
            }
        }
    }

    /// Detach and return the metadata of a tracked handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not tracked.
    pub fn detach_tracked(&mut self, handle: &H, hook: &'static str) -> M {
        match self.map.remove(handle) {
            Some(meta) => meta,
            None => panic!("{hook}: handle {handle:?} is not tracked"),
        }
    }

    /// Mutable access to the metadata of a tracked handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not tracked.
    pub fn get_tracked_mut(&mut self, handle: &H, hook: &'static str) -> &mut M {
        match self.map.get_mut(handle) {
            Some(meta) => meta,
            None => panic!("{hook}: handle {handle:?} is not tracked"),
        }
    }

    /// Metadata of a handle, if tracked.
    pub fn get(&self, handle: &H) -> Option<&M> {
        self.map.get(handle)
    }

    /// Returns `true` if the handle is tracked.
    pub fn contains(&self, handle: &H) -> bool {
        self.map.contains_key(handle)
    }

    /// Count of tracked handles.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no handle is tracked.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over all tracked handles and their metadata, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&H, &M)> {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_store() {
        let mut store = MetadataStore::<u64, &str>::default();
        assert!(store.is_empty());

        store.attach(1, "one", "after_insert");
        store.attach(2, "two", "after_insert");
        assert_eq!(store.len(), 2);
        assert!(store.contains(&1));
        assert_eq!(store.get(&2), Some(&"two"));

        *store.get_tracked_mut(&2, "before_use") = "deux";
        assert_eq!(store.detach_tracked(&2, "before_erase"), "deux");
        assert!(!store.contains(&2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    #[should_panic(expected = "after_insert: handle 1 is already tracked")]
    fn test_attach_twice() {
        let mut store = MetadataStore::<u64, ()>::default();
        store.attach(1, (), "after_insert");
        store.attach(1, (), "after_insert");
    }

    #[test]
    #[should_panic(expected = "before_use: handle 7 is not tracked")]
    fn test_untracked() {
        let mut store = MetadataStore::<u64, ()>::default();
        store.get_tracked_mut(&7, "before_use");
    }
}
