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

use std::{fmt::Debug, hash::Hash};

/// An opaque identifier of a content store record, owned by the host.
///
/// A policy never looks behind a handle. It only uses it as a map key and passes it back to the host
/// when the record is about to be evicted.
pub trait EntryHandle: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

impl<T> EntryHandle for T where T: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

/// Payload a content store keeps for a record. Policies never see it.
pub trait StoreValue: Send + Sync + 'static {}

impl<T> StoreValue for T where T: Send + Sync + 'static {}
