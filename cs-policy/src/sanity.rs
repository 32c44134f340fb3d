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

use crate::policy::{Host, Policy};

/// Wraps a policy and checks the host/policy protocol around every hook when feature "sanity" is
/// enabled. Without the feature every call passes straight through.
#[derive(Debug)]
pub struct SanityPolicy<P> {
    policy: P,
}

impl<P> SanityPolicy<P> {
    /// Wrap `policy`.
    pub fn new(policy: P) -> Self {
        Self { policy }
    }
}

#[cfg(feature = "sanity")]
impl<H, P> Policy<H> for SanityPolicy<P>
where
    H: EntryHandle,
    P: Policy<H>,
{
    fn name(&self) -> &'static str {
        self.policy.name()
    }

    fn after_insert(&mut self, handle: H, host: &mut dyn Host<H>) {
        assert!(!self.policy.contains(&handle), "{handle:?} is inserted twice");
        self.policy.after_insert(handle, host);
        assert!(
            host.current_size() <= host.capacity_limit(),
            "{}: host is over its limit after insert",
            self.policy.name()
        );
    }

    fn after_refresh(&mut self, handle: &H) {
        self.policy.after_refresh(handle);
        assert!(self.policy.contains(handle));
    }

    fn before_use(&mut self, handle: &H) {
        self.policy.before_use(handle);
        assert!(self.policy.contains(handle));
    }

    fn before_erase(&mut self, handle: &H) {
        assert!(self.policy.contains(handle), "{handle:?} is erased but not tracked");
        let len = self.policy.len();
        self.policy.before_erase(handle);
        assert!(!self.policy.contains(handle));
        assert_eq!(self.policy.len() + 1, len);
    }

    fn evict_entries(&mut self, host: &mut dyn Host<H>) {
        self.policy.evict_entries(host);
        assert!(
            host.current_size() <= host.capacity_limit(),
            "{}: host is over its limit after eviction",
            self.policy.name()
        );
    }

    fn len(&self) -> usize {
        self.policy.len()
    }

    fn contains(&self, handle: &H) -> bool {
        self.policy.contains(handle)
    }
}

#[cfg(not(feature = "sanity"))]
impl<H, P> Policy<H> for SanityPolicy<P>
where
    H: EntryHandle,
    P: Policy<H>,
{
    fn name(&self) -> &'static str {
        self.policy.name()
    }

    fn after_insert(&mut self, handle: H, host: &mut dyn Host<H>) {
        self.policy.after_insert(handle, host)
    }

    fn after_refresh(&mut self, handle: &H) {
        self.policy.after_refresh(handle)
    }

    fn before_use(&mut self, handle: &H) {
        self.policy.before_use(handle)
    }

    fn before_erase(&mut self, handle: &H) {
        self.policy.before_erase(handle)
    }

    fn evict_entries(&mut self, host: &mut dyn Host<H>) {
        self.policy.evict_entries(host)
    }

    fn len(&self) -> usize {
        self.policy.len()
    }

    fn contains(&self, handle: &H) -> bool {
        self.policy.contains(handle)
    }
}
