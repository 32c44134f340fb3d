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

use std::fmt::Debug;

use cs_policy_common::code::EntryHandle;

/// Queries and notifications a policy sends to the content store that owns the entries.
///
/// The host owns every record. A policy only learns about records through the handles passed to its
/// hooks and only asks the host to give a record up through [`Host::notify_before_evict`].
pub trait Host<H>
where
    H: EntryHandle,
{
    /// Maximum number of entries the host is willing to keep.
    fn capacity_limit(&self) -> usize;

    /// Number of entries the host currently keeps.
    fn current_size(&self) -> usize;

    /// The entry identified by `handle` is about to be evicted.
    ///
    /// The host must remove the record before returning, so that [`Host::current_size`] shrinks by one.
    /// The policy has already forgotten the handle.
    fn notify_before_evict(&mut self, handle: H);
}

/// The capability contract every replacement policy implements.
///
/// The host serializes all calls. Hooks run synchronously to completion and only mutate the policy's
/// own state, except for the eviction notifications sent during [`Policy::after_insert`] and
/// [`Policy::evict_entries`].
///
/// Calling a hook for a handle that is not tracked where tracking is required, or inserting a handle
/// twice, is a protocol violation and panics.
pub trait Policy<H>: Send + Debug + 'static
where
    H: EntryHandle,
{
    /// Stable name under which the policy is registered.
    fn name(&self) -> &'static str;

    /// A new record has been added to the host. Starts tracking it, then enforces the capacity limit.
    fn after_insert(&mut self, handle: H, host: &mut dyn Host<H>);

    /// The content of a tracked record has been refreshed.
    fn after_refresh(&mut self, handle: &H);

    /// A tracked record is about to be served from the store.
    fn before_use(&mut self, handle: &H);

    /// A tracked record is about to be removed by the host itself. Stops tracking it.
    fn before_erase(&mut self, handle: &H);

    /// Evicts entries until the host size is within its capacity limit.
    fn evict_entries(&mut self, host: &mut dyn Host<H>);

    /// Count of tracked entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entry is tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `handle` is tracked.
    fn contains(&self, handle: &H) -> bool;
}

impl<H, P> Policy<H> for Box<P>
where
    H: EntryHandle,
    P: Policy<H> + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn after_insert(&mut self, handle: H, host: &mut dyn Host<H>) {
        (**self).after_insert(handle, host)
    }

    fn after_refresh(&mut self, handle: &H) {
        (**self).after_refresh(handle)
    }

    fn before_use(&mut self, handle: &H) {
        (**self).before_use(handle)
    }

    fn before_erase(&mut self, handle: &H) {
        (**self).before_erase(handle)
    }

    fn evict_entries(&mut self, host: &mut dyn Host<H>) {
        (**self).evict_entries(host)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn contains(&self, handle: &H) -> bool {
        (**self).contains(handle)
    }
}
