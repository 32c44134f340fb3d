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

//! Shared components for content store eviction policies.

/// Bookkeeping assertions that can be kept in release builds.
pub mod assert;
/// Monotonic time sources for decaying scores.
pub mod clock;
/// Trait bound of the opaque entry handles a host hands to a policy.
pub mod code;
/// The error type shared by all cs-policy crates.
pub mod error;
/// A slab-backed linked list with O(1) removal by token.
pub mod list;
