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

//! Combined recency and frequency (LRFU) replacement.

mod crf;
mod window;

use std::sync::Arc;

use cs_policy_common::{
    clock::{Clock, MonotonicClock},
    code::EntryHandle,
    error::{Error, Result},
    list::{SlabList, Token},
    strict_assert, strict_assert_eq,
};
use serde::{Deserialize, Serialize};

pub use self::{
    crf::Crf,
    window::{Rank, WindowHeap},
};
use crate::{
    metadata::MetadataStore,
    policy::{Host, Policy},
};

/// Lrfu eviction algorithm config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LrfuConfig {
    /// While the host holds no more than this many entries, new entries are placed in the window.
    ///
    /// Must be at least 1.
    pub window_capacity: usize,
    /// Base of the exponential discount applied to a score between two references.
    ///
    /// Must be in (0, 1].
    pub decay: f64,
    /// Discount exponent per second elapsed since the previous reference.
    ///
    /// Must be finite and non-negative.
    pub rate: f64,
}

impl Default for LrfuConfig {
    fn default() -> Self {
        Self {
            window_capacity: 7,
            decay: 0.5,
            rate: 0.1,
        }
    }
}

impl LrfuConfig {
    /// Check the config, returning a config error naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.window_capacity == 0 {
            return Err(Error::config("window_capacity", self.window_capacity, "at least 1"));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(Error::config("decay", self.decay, "in (0, 1]"));
        }
        if !(self.rate.is_finite() && self.rate >= 0.0) {
            return Err(Error::config("rate", self.rate, "finite and non-negative"));
        }
        Ok(())
    }
}

/// Queue holding an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Recently scored entries, ordered by score.
    Window,
    /// Entries that overflowed the window, in FIFO order. Victims are taken from here first.
    Aging,
}

#[derive(Debug, Clone, Copy)]
enum Position {
    Window { seq: u64 },
    Aging(Token),
}

#[derive(Debug)]
struct LrfuMeta {
    crf: Crf,
    position: Position,
}

/// Combined recency and frequency replacement with a window and an aging queue.
///
/// Every entry carries a [`Crf`] score that grows with each reference and decays with the time since
/// the previous one.
///
/// The window holds the most recently scored entries and is indexed by score. The aging queue is a
/// FIFO of the entries pushed out of the window.
///
/// On insert:
///
/// - If the insert pushed the host exactly one entry over its limit, the lowest scored window member
///   is demoted to the aging queue and the new entry takes its place in the window.
/// - Otherwise, if the host holds more than `window_capacity` entries, the new entry goes straight to
///   the aging queue.
/// - Otherwise the new entry goes to the window.
///
/// On a reference, the score is updated and the lowest scored window member (other than the
/// referenced entry) is demoted. A referenced entry from the aging queue is promoted to the window.
///
/// Victims come from the head of the aging queue. When the aging queue is empty, the lowest scored
/// window member is evicted instead.
pub struct Lrfu<H>
where
    H: EntryHandle,
{
    window: WindowHeap<H>,
    aging: SlabList<H>,
    meta: MetadataStore<H, LrfuMeta>,

    /// Source of window sequence numbers.
    seq: u64,

    clock: Arc<dyn Clock>,
    config: LrfuConfig,
}

impl<H> std::fmt::Debug for Lrfu<H>
where
    H: EntryHandle,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lrfu")
            .field("window", &self.window.len())
            .field("aging", &self.aging.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<H> Default for Lrfu<H>
where
    H: EntryHandle,
{
    fn default() -> Self {
        Self::new(&LrfuConfig::default())
    }
}

impl<H> Lrfu<H>
where
    H: EntryHandle,
{
    /// Stable policy name.
    pub const NAME: &'static str = "lrfu";

    /// Create an lrfu policy scored against a [`MonotonicClock`].
    ///
    /// # Panics
    ///
    /// Panics if the config is invalid.
    pub fn new(config: &LrfuConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    /// Create an lrfu policy scored against the given clock.
    ///
    /// # Panics
    ///
    /// Panics if the config is invalid.
    pub fn with_clock(config: &LrfuConfig, clock: Arc<dyn Clock>) -> Self {
        match Self::try_new(config, clock) {
            Ok(lrfu) => lrfu,
            Err(e) => panic!("invalid lrfu config: {e}"),
        }
    }

    /// Create an lrfu policy scored against the given clock, rejecting an invalid config.
    pub fn try_new(config: &LrfuConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            window: WindowHeap::default(),
            aging: SlabList::new(),
            meta: MetadataStore::default(),
            seq: 0,
            clock,
            config: config.clone(),
        })
    }

    /// Replace the config. Applies to subsequent hooks only.
    ///
    /// The current config is kept if the new one is invalid.
    pub fn update(&mut self, config: &LrfuConfig) -> Result<()> {
        config.validate()?;
        tracing::debug!(?config, "[lrfu]: update config");
        self.config = config.clone();
        Ok(())
    }

    /// Current config.
    pub fn config(&self) -> &LrfuConfig {
        &self.config
    }

    /// Score of a tracked entry.
    pub fn score(&self, handle: &H) -> Option<f64> {
        self.meta.get(handle).map(|meta| meta.crf.score())
    }

    /// Queue holding a tracked entry.
    pub fn location(&self, handle: &H) -> Option<Location> {
        self.meta.get(handle).map(|meta| match meta.position {
            Position::Window { .. } => Location::Window,
            Position::Aging(_) => Location::Aging,
        })
    }

    /// Window member count.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Aging queue length.
    pub fn aging_len(&self) -> usize {
        self.aging.len()
    }

    /// Window members from the lowest to the highest rank, and the aging queue from head to tail.
    pub fn dump(&self) -> (Vec<H>, Vec<H>) {
        let window = self.window.sorted().into_iter().map(|(handle, _)| handle).collect();
        let aging = self.aging.iter().cloned().collect();
        (window, aging)
    }

    /// Check that every tracked entry sits in exactly the queue its metadata names, with a score of at
    /// least 1.
    ///
    /// # Panics
    ///
    /// Panics on the first violation.
    pub fn assert_invariants(&self) {
        assert_eq!(self.window.len() + self.aging.len(), self.meta.len());
        for (handle, meta) in self.meta.iter() {
            assert!(meta.crf.score() >= 1.0, "{handle:?} scored {} below 1", meta.crf.score());
            match meta.position {
                Position::Window { seq } => {
                    let rank = self.window.rank(handle);
                    assert_eq!(rank.map(|r| (r.score, r.seq)), Some((meta.crf.score(), seq)));
                }
                Position::Aging(token) => {
                    assert!(!self.window.contains(handle), "{handle:?} is in both queues");
                    assert_eq!(self.aging.get(token), Some(handle));
                }
            }
        }
    }

    fn enter_window(&mut self, handle: H, score: f64) -> Position {
        let seq = self.seq;
        self.seq += 1;
        self.window.push(handle, Rank { score, seq });
        Position::Window { seq }
    }

    /// Move the lowest ranked window member to the tail of the aging queue.
    ///
    /// `keep` is never demoted, even if it ranks lowest.
    fn demote_window_min(&mut self, keep: Option<&H>) {
        let kept = match keep {
            Some(handle) if self.window.peek().is_some_and(|(min, _)| min == handle) => {
                self.window.remove(handle).map(|rank| (handle.clone(), rank))
            }
            _ => None,
        };
        let demoted = self.window.pop();
        if let Some((handle, rank)) = kept {
            self.window.push(handle, rank);
        }

        let Some((handle, rank)) = demoted else {
            tracing::warn!(keep = ?keep, "[lrfu]: no window member to demote");
            return;
        };
        tracing::trace!(?handle, score = rank.score, "[lrfu]: demote to aging");
        let token = self.aging.push_back(handle.clone());
        self.meta.get_tracked_mut(&handle, "demote").position = Position::Aging(token);
    }

    fn reference(&mut self, handle: &H, hook: &'static str) {
        let now = self.clock.now();
        let (decay, rate) = (self.config.decay, self.config.rate);

        let meta = self.meta.get_tracked_mut(handle, hook);
        meta.crf.reference(now, decay, rate);
        let score = meta.crf.score();
        let position = meta.position;
        strict_assert!(score >= 1.0);

        match position {
            Position::Aging(token) => {
                self.demote_window_min(None);
                let h = self.aging.remove(token);
                strict_assert_eq!(h.as_ref(), Some(handle));
                let position = self.enter_window(handle.clone(), score);
                self.meta.get_tracked_mut(handle, hook).position = position;
                tracing::trace!(?handle, score, hook, "[lrfu]: promote to window");
            }
            Position::Window { seq } => {
                let updated = self.window.update(handle, Rank { score, seq });
                strict_assert!(updated);
                self.demote_window_min(Some(handle));
                tracing::trace!(?handle, score, hook, "[lrfu]: rescore in window");
            }
        }
    }

    fn evict_one(&mut self) -> H {
        let handle = match self.aging.pop_front() {
            Some(handle) => handle,
            None => match self.window.pop() {
                Some((handle, rank)) => {
                    tracing::debug!(?handle, score = rank.score, "[lrfu]: aging queue empty, evict window minimum");
                    handle
                }
                None => panic!("[lrfu]: host exceeds its limit but no entry is tracked"),
            },
        };
        self.meta.detach_tracked(&handle, "evict_entries");
        handle
    }
}

impl<H> Policy<H> for Lrfu<H>
where
    H: EntryHandle,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn after_insert(&mut self, handle: H, host: &mut dyn Host<H>) {
        assert!(
            !self.meta.contains(&handle),
            "after_insert: handle {handle:?} is already tracked"
        );

        let crf = Crf::new(self.clock.now());
        let size = host.current_size();
        let limit = host.capacity_limit();

        let position = if limit.checked_add(1) == Some(size) {
            self.demote_window_min(None);
            tracing::trace!(?handle, size, limit, "[lrfu]: insert over limit, place in window");
            self.enter_window(handle.clone(), crf.score())
        } else if size > self.config.window_capacity {
            tracing::trace!(?handle, size, "[lrfu]: insert, place in aging");
            Position::Aging(self.aging.push_back(handle.clone()))
        } else {
            tracing::trace!(?handle, size, "[lrfu]: insert, place in window");
            self.enter_window(handle.clone(), crf.score())
        };
        self.meta.attach(handle, LrfuMeta { crf, position }, "after_insert");

        self.evict_entries(host);
    }

    fn after_refresh(&mut self, handle: &H) {
        self.reference(handle, "after_refresh");
    }

    fn before_use(&mut self, handle: &H) {
        self.reference(handle, "before_use");
    }

    fn before_erase(&mut self, handle: &H) {
        let meta = self.meta.detach_tracked(handle, "before_erase");
        match meta.position {
            Position::Window { .. } => {
                let rank = self.window.remove(handle);
                strict_assert!(rank.is_some());
            }
            Position::Aging(token) => {
                let h = self.aging.remove(token);
                strict_assert_eq!(h.as_ref(), Some(handle));
            }
        }
        tracing::trace!(?handle, "[lrfu]: erase");
    }

    fn evict_entries(&mut self, host: &mut dyn Host<H>) {
        let mut evicted = 0;
        while host.current_size() > host.capacity_limit() {
            let handle = self.evict_one();
            tracing::trace!(?handle, "[lrfu]: evict");
            host.notify_before_evict(handle);
            evicted += 1;
        }
        if evicted > 0 {
            tracing::debug!(
                evicted,
                size = host.current_size(),
                window = self.window.len(),
                aging = self.aging.len(),
                "[lrfu]: eviction finished"
            );
        }
    }

    fn len(&self) -> usize {
        strict_assert_eq!(self.window.len() + self.aging.len(), self.meta.len());
        self.meta.len()
    }

    fn contains(&self, handle: &H) -> bool {
        self.meta.contains(handle)
    }
}
