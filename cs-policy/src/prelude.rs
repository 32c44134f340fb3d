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

pub use cs_policy_common::{
    clock::{Clock, ManualClock, MonotonicClock},
    code::{EntryHandle, StoreValue},
    error::{Error, ErrorKind, Result},
};

#[cfg(any(test, feature = "test_utils"))]
pub use crate::test_utils::TestHost;
pub use crate::{
    lrfu::{Location, Lrfu, LrfuConfig},
    lru::{Lru, LruConfig},
    policy::{Host, Policy},
    registry::{PolicyConfig, PolicyFactory, PolicyRegistry},
    sanity::SanityPolicy,
    store::{ContentStore, StoreEventListener},
};
