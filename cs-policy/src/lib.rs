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

//! Pluggable replacement policies for a bounded content store of named data.
//!
//! A host store owns its records and drives a [`policy::Policy`] through lifecycle hooks. The policy
//! keeps its own bookkeeping and, whenever the store exceeds its capacity limit, picks victims and
//! hands them back through [`policy::Host::notify_before_evict`].
//!
//! Two policies are built in:
//!
//! - [`lru::Lru`]: least-recently-used.
//! - [`lrfu::Lrfu`]: combined recency and frequency, with a score-ordered window and an aging queue.
//!
//! Policies are selected by name through [`registry::PolicyRegistry`].

pub mod lrfu;
/// Least-recently-used replacement.
pub mod lru;
/// Per-entry bookkeeping owned by a policy.
pub mod metadata;
/// The host/policy contract.
pub mod policy;
pub mod registry;
/// Protocol checks around any policy.
pub mod sanity;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

/// Re-exports of the commonly used types.
pub mod prelude;
