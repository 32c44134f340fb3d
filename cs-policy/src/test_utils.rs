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

//! Utilities for testing.

use std::collections::BTreeSet;

use cs_policy_common::code::EntryHandle;

use crate::policy::{Host, Policy};

/// A host that keeps bare handles and records every eviction notification in order.
#[derive(Debug)]
pub struct TestHost<H>
where
    H: EntryHandle,
{
    entries: BTreeSet<H>,
    limit: usize,
    evicted: Vec<H>,
}

impl<H> TestHost<H>
where
    H: EntryHandle,
{
    /// Create an empty host with the given capacity limit.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: BTreeSet::new(),
            limit,
            evicted: vec![],
        }
    }

    /// Add a record and run the insert hook, the way a content store does.
    pub fn insert<P>(&mut self, policy: &mut P, handle: H)
    where
        P: Policy<H> + ?Sized,
    {
        assert!(self.entries.insert(handle.clone()), "{handle:?} is already stored");
        policy.after_insert(handle, self);
    }

    /// Run the erase hook and drop the record.
    pub fn erase<P>(&mut self, policy: &mut P, handle: &H)
    where
        P: Policy<H> + ?Sized,
    {
        policy.before_erase(handle);
        assert!(self.entries.remove(handle), "{handle:?} is not stored");
    }

    /// Change the capacity limit and let the policy shrink the host.
    pub fn set_limit<P>(&mut self, policy: &mut P, limit: usize)
    where
        P: Policy<H> + ?Sized,
    {
        self.limit = limit;
        policy.evict_entries(self);
    }

    /// Returns `true` if the record is stored.
    pub fn contains(&self, handle: &H) -> bool {
        self.entries.contains(handle)
    }

    /// Handles evicted so far, in eviction order.
    pub fn evicted(&self) -> &[H] {
        &self.evicted
    }

    /// Take the handles evicted so far, in eviction order.
    pub fn take_evicted(&mut self) -> Vec<H> {
        std::mem::take(&mut self.evicted)
    }
}

impl<H> Host<H> for TestHost<H>
where
    H: EntryHandle,
{
    fn capacity_limit(&self) -> usize {
        self.limit
    }

    fn current_size(&self) -> usize {
        self.entries.len()
    }

    fn notify_before_evict(&mut self, handle: H) {
        assert!(self.entries.remove(&handle), "evicted {handle:?} is not stored");
        self.evicted.push(handle);
    }
}
