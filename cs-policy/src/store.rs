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

//! A bounded content store that delegates replacement decisions to a [`Policy`].

use std::{fmt::Debug, sync::Arc};

use cs_policy_common::{
    code::{EntryHandle, StoreValue},
    strict_assert,
};
use hashbrown::HashMap;

use crate::policy::{Host, Policy};

/// Receives the records a [`ContentStore`] evicts.
pub trait StoreEventListener<H, V>: Send + Sync + 'static
where
    H: EntryHandle,
    V: StoreValue,
{
    /// The record has been evicted by the policy. Explicit erases are not reported.
    fn on_evict(&self, handle: H, value: V);
}

struct Table<H, V>
where
    H: EntryHandle,
    V: StoreValue,
{
    entries: HashMap<H, V>,
    limit: usize,
    listener: Option<Arc<dyn StoreEventListener<H, V>>>,
}

impl<H, V> Host<H> for Table<H, V>
where
    H: EntryHandle,
    V: StoreValue,
{
    fn capacity_limit(&self) -> usize {
        self.limit
    }

    fn current_size(&self) -> usize {
        self.entries.len()
    }

    fn notify_before_evict(&mut self, handle: H) {
        let Some(value) = self.entries.remove(&handle) else {
            panic!("policy evicted {handle:?}, which is not stored");
        };
        tracing::trace!(?handle, "[store]: evict");
        if let Some(listener) = self.listener.as_ref() {
            listener.on_evict(handle, value);
        }
    }
}

/// Keeps at most `limit` records and drives a [`Policy`] through its lifecycle hooks.
///
/// Inserting a new handle runs [`Policy::after_insert`], which may evict. Inserting an existing handle
/// replaces its value and runs [`Policy::after_refresh`]. A hit through [`ContentStore::get`] runs
/// [`Policy::before_use`].
pub struct ContentStore<H, V>
where
    H: EntryHandle,
    V: StoreValue,
{
    table: Table<H, V>,
    policy: Box<dyn Policy<H>>,
}

impl<H, V> Debug for ContentStore<H, V>
where
    H: EntryHandle,
    V: StoreValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("policy", &self.policy.name())
            .field("len", &self.table.entries.len())
            .field("limit", &self.table.limit)
            .finish()
    }
}

impl<H, V> ContentStore<H, V>
where
    H: EntryHandle,
    V: StoreValue,
{
    /// Create an empty store holding at most `limit` records.
    pub fn new(limit: usize, policy: Box<dyn Policy<H>>) -> Self {
        strict_assert!(policy.is_empty(), "{} policy already tracks entries", policy.name());
        Self {
            table: Table {
                entries: HashMap::new(),
                limit,
                listener: None,
            },
            policy,
        }
    }

    /// Report evicted records to `listener`.
    pub fn with_listener(mut self, listener: Arc<dyn StoreEventListener<H, V>>) -> Self {
        self.table.listener = Some(listener);
        self
    }

    /// Store `value` under `handle`.
    ///
    /// Returns `true` if the handle was not stored before.
    pub fn insert(&mut self, handle: H, value: V) -> bool {
        match self.table.entries.get_mut(&handle) {
            Some(v) => {
                *v = value;
                self.policy.after_refresh(&handle);
                false
            }
            None => {
                self.table.entries.insert(handle.clone(), value);
                self.policy.after_insert(handle, &mut self.table);
                true
            }
        }
    }

    /// Look up a record, counting a hit as a use.
    pub fn get(&mut self, handle: &H) -> Option<&V> {
        if !self.table.entries.contains_key(handle) {
            return None;
        }
        self.policy.before_use(handle);
        self.table.entries.get(handle)
    }

    /// Look up a record without informing the policy.
    pub fn peek(&self, handle: &H) -> Option<&V> {
        self.table.entries.get(handle)
    }

    /// Remove a record.
    pub fn erase(&mut self, handle: &H) -> Option<V> {
        if !self.table.entries.contains_key(handle) {
            return None;
        }
        self.policy.before_erase(handle);
        self.table.entries.remove(handle)
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        let handles: Vec<_> = self.table.entries.keys().cloned().collect();
        for handle in handles {
            self.policy.before_erase(&handle);
            self.table.entries.remove(&handle);
        }
    }

    /// Change the capacity limit, evicting records if the store no longer fits.
    pub fn set_limit(&mut self, limit: usize) {
        tracing::debug!(from = self.table.limit, to = limit, "[store]: set limit");
        self.table.limit = limit;
        self.policy.evict_entries(&mut self.table);
    }

    /// Capacity limit.
    pub fn limit(&self) -> usize {
        self.table.limit
    }

    /// Count of stored records.
    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }

    /// Returns `true` if a record is stored under `handle`.
    pub fn contains(&self, handle: &H) -> bool {
        self.table.entries.contains_key(handle)
    }

    /// Name of the active policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// The active policy.
    pub fn policy(&self) -> &dyn Policy<H> {
        self.policy.as_ref()
    }
}
