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

//! Protocol checks of [`SanityPolicy`]. Run with `--features sanity`.

use std::{sync::Arc, time::Duration};

use cs_policy::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Host double that only counts entries.
#[derive(Debug)]
struct CountingHost {
    limit: usize,
    size: usize,
    evicted: Vec<u64>,
}

impl CountingHost {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            size: 0,
            evicted: vec![],
        }
    }
}

impl Host<u64> for CountingHost {
    fn capacity_limit(&self) -> usize {
        self.limit
    }

    fn current_size(&self) -> usize {
        self.size
    }

    fn notify_before_evict(&mut self, handle: u64) {
        self.size -= 1;
        self.evicted.push(handle);
    }
}

/// Tracks entries but never evicts.
#[derive(Debug, Default)]
struct Hoarder(Vec<u64>);

impl Policy<u64> for Hoarder {
    fn name(&self) -> &'static str {
        "hoarder"
    }

    fn after_insert(&mut self, handle: u64, _: &mut dyn Host<u64>) {
        self.0.push(handle);
    }

    fn after_refresh(&mut self, _: &u64) {}

    fn before_use(&mut self, _: &u64) {}

    fn before_erase(&mut self, handle: &u64) {
        self.0.retain(|h| h != handle);
    }

    fn evict_entries(&mut self, _: &mut dyn Host<u64>) {}

    fn len(&self) -> usize {
        self.0.len()
    }

    fn contains(&self, handle: &u64) -> bool {
        self.0.contains(handle)
    }
}

fn random_ops(name: &str) {
    const KEYS: u64 = 200;
    const LIMIT: usize = 32;

    let clock = ManualClock::default();
    let registry = PolicyRegistry::with_defaults(Arc::new(clock.clone()));
    let mut store = ContentStore::<u64, u64>::new(LIMIT, registry.build(name).unwrap());
    let mut rng = SmallRng::seed_from_u64(114514);

    for i in 0..20_000u64 {
        let key = rng.random_range(0..KEYS);
        match rng.random_range(0..10) {
            0 => {
                store.erase(&key);
            }
            1 if i % 1000 == 0 => store.set_limit(rng.random_range(1..=LIMIT)),
            2..=5 => {
                if store.get(&key).is_none() {
                    store.insert(key, i);
                }
            }
            _ => {
                store.insert(key, i);
            }
        }
        clock.advance(Duration::from_millis(rng.random_range(0..50)));
        assert!(store.len() <= store.limit());
        assert_eq!(store.policy().len(), store.len());
    }
}

#[test_log::test]
fn test_lru_under_sanity_checks() {
    random_ops(Lru::<u64>::NAME);
}

#[test_log::test]
fn test_lrfu_under_sanity_checks() {
    random_ops(Lrfu::<u64>::NAME);
}

#[test]
#[should_panic(expected = "1 is inserted twice")]
fn test_insert_twice() {
    let mut host = CountingHost::new(4);
    let mut policy = SanityPolicy::new(Lru::<u64>::default());
    host.size += 1;
    policy.after_insert(1, &mut host);
    policy.after_insert(1, &mut host);
}

#[test]
#[should_panic(expected = "1 is erased but not tracked")]
fn test_erase_untracked() {
    let mut policy = SanityPolicy::new(Lru::<u64>::default());
    policy.before_erase(&1);
}

#[test]
#[should_panic(expected = "hoarder: host is over its limit after insert")]
fn test_policy_that_never_evicts() {
    let mut host = CountingHost::new(2);
    let mut policy = SanityPolicy::new(Hoarder::default());
    for h in 0..3 {
        host.size += 1;
        policy.after_insert(h, &mut host);
    }
}

#[test]
fn test_lrfu_evicts_within_limit() {
    let mut host = CountingHost::new(3);
    let mut policy = SanityPolicy::new(Lrfu::<u64>::default());
    for h in 0..10 {
        host.size += 1;
        policy.after_insert(h, &mut host);
    }
    assert_eq!(host.size, 3);
    assert_eq!(policy.len(), 3);
    assert_eq!(host.evicted.len(), 7);
}
