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

use std::{collections::VecDeque, sync::Arc, time::Duration};

use cs_policy::prelude::*;
use parking_lot::Mutex;
use rand::{rngs::SmallRng, Rng, SeedableRng};

#[derive(Debug, Default)]
struct Evictions(Mutex<Vec<char>>);

impl StoreEventListener<char, ()> for Evictions {
    fn on_evict(&self, handle: char, _: ()) {
        self.0.lock().push(handle);
    }
}

impl Evictions {
    fn take(&self) -> Vec<char> {
        std::mem::take(&mut *self.0.lock())
    }
}

fn store(config: &str, limit: usize) -> (ContentStore<char, ()>, Arc<Evictions>, ManualClock) {
    let clock = ManualClock::default();
    let registry = PolicyRegistry::with_defaults(Arc::new(clock.clone()));
    let config: PolicyConfig = serde_json::from_str(config).unwrap();
    let evictions = Arc::new(Evictions::default());
    let store = ContentStore::new(limit, registry.build_with_config(&config).unwrap()).with_listener(evictions.clone());
    (store, evictions, clock)
}

#[test_log::test]
fn test_lru_scenario() {
    let (mut store, evictions, _) = store(r#"{ "policy": "lru" }"#, 3);

    for h in ['A', 'B', 'C', 'D'] {
        store.insert(h, ());
    }
    assert_eq!(evictions.take(), vec!['A']);

    assert!(store.get(&'B').is_some());
    store.insert('E', ());
    store.insert('F', ());
    assert_eq!(evictions.take(), vec!['C', 'D']);
    store.insert('G', ());
    assert_eq!(evictions.take(), vec!['B']);
}

#[test_log::test]
fn test_lrfu_scenario() {
    let (mut store, evictions, clock) = store(r#"{ "policy": "lrfu", "window_capacity": 7 }"#, 10);

    // A to G fill the window, H to J overflow into aging.
    for h in 'A'..='J' {
        store.insert(h, ());
        clock.advance(Duration::from_millis(100));
    }
    assert!(evictions.take().is_empty());
    assert_eq!(store.len(), 10);

    // K pushes the store over its limit: A is demoted and H, the aging head, is evicted.
    store.insert('K', ());
    assert_eq!(evictions.take(), vec!['H']);
    assert_eq!(store.len(), 10);

    // I is promoted and B, the lowest scored window member, takes its place in aging.
    assert!(store.get(&'I').is_some());

    // Erasing from aging never evicts.
    assert!(store.erase(&'J').is_some());
    assert!(evictions.take().is_empty());

    // The aging queue is now A, B. L fills the free slot, M overflows again.
    store.insert('L', ());
    assert!(evictions.take().is_empty());
    store.insert('M', ());
    assert_eq!(evictions.take(), vec!['A']);
    store.insert('N', ());
    assert_eq!(evictions.take(), vec!['B']);
    assert!(store.contains(&'I'));
}

#[test]
fn test_unknown_policy() {
    let registry = PolicyRegistry::<char>::default();
    let e = registry.build("arc").unwrap_err();
    assert_eq!(e.kind(), ErrorKind::NotFound);

    let e = serde_json::from_str::<PolicyConfig>(r#"{ "policy": "lrfu", "decay": 1.5 }"#)
        .map(|config| registry.build_with_config(&config))
        .unwrap()
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Config);
    assert!(e.to_string().contains("decay"));
}

/// A straightforward lru used as a reference model.
#[derive(Debug)]
struct ModelLru {
    queue: VecDeque<u32>,
    limit: usize,
}

impl ModelLru {
    fn access(&mut self, key: u32) -> (bool, Option<u32>) {
        if let Some(pos) = self.queue.iter().position(|k| *k == key) {
            self.queue.remove(pos);
            self.queue.push_back(key);
            return (true, None);
        }
        self.queue.push_back(key);
        let evicted = if self.queue.len() > self.limit {
            self.queue.pop_front()
        } else {
            None
        };
        (false, evicted)
    }
}

#[test]
fn test_lru_matches_model() {
    const LIMIT: usize = 50;

    #[derive(Debug, Default)]
    struct Last(Mutex<Vec<u32>>);
    impl StoreEventListener<u32, u32> for Last {
        fn on_evict(&self, handle: u32, value: u32) {
            assert_eq!(handle, value);
            self.0.lock().push(handle);
        }
    }

    let last = Arc::new(Last::default());
    let mut store = ContentStore::new(LIMIT, PolicyRegistry::default().build("lru").unwrap()).with_listener(last.clone());
    let mut model = ModelLru {
        queue: VecDeque::new(),
        limit: LIMIT,
    };
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..20_000 {
        let key = rng.random_range(0..200);
        let hit = store.get(&key).is_some();
        if !hit {
            store.insert(key, key);
        }
        let (model_hit, model_evicted) = model.access(key);
        assert_eq!(hit, model_hit);
        assert_eq!(std::mem::take(&mut *last.0.lock()), model_evicted.into_iter().collect::<Vec<_>>());
    }
}

#[test]
fn test_lrfu_under_churn() {
    let clock = ManualClock::default();
    let registry = PolicyRegistry::<u32>::with_defaults(Arc::new(clock.clone()));
    let mut store: ContentStore<u32, ()> = ContentStore::new(10, registry.build("lrfu").unwrap());

    // A handful of popular entries are referenced between one-off inserts.
    for one_off in 100..400 {
        clock.advance(Duration::from_millis(50));
        for h in 0..5 {
            if store.get(&h).is_none() {
                store.insert(h, ());
            }
        }
        store.insert(one_off, ());
        assert!(store.len() <= 10);
        assert_eq!(store.policy().len(), store.len());
    }
    assert!(!store.contains(&100));
}
