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

use std::cmp::Ordering;

use cs_policy_common::{code::EntryHandle, strict_assert};
use hashbrown::HashMap;

/// Order of an entry inside the window.
///
/// Lower score first. Equal scores fall back to the order in which the entries entered the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rank {
    /// Combined recency and frequency value.
    pub score: f64,
    /// Sequence number taken when the entry entered the window.
    pub seq: u64,
}

impl Rank {
    fn compare(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score).then(self.seq.cmp(&other.seq))
    }
}

/// Indexed binary min-heap over the window members.
///
/// The heap tracks the slot of every member, so the minimum can be extracted and any member can be
/// removed or re-ranked in O(log n).
#[derive(Debug)]
pub struct WindowHeap<H>
where
    H: EntryHandle,
{
    heap: Vec<(H, Rank)>,
    slots: HashMap<H, usize>,
}

impl<H> Default for WindowHeap<H>
where
    H: EntryHandle,
{
    fn default() -> Self {
        Self {
            heap: vec![],
            slots: HashMap::new(),
        }
    }
}

impl<H> WindowHeap<H>
where
    H: EntryHandle,
{
    /// Add a member.
    ///
    /// # Panics
    ///
    /// Panics if the handle is already a member.
    pub fn push(&mut self, handle: H, rank: Rank) {
        let pos = self.heap.len();
        let prev = self.slots.insert(handle.clone(), pos);
        assert!(prev.is_none(), "{handle:?} is already in the window");
        self.heap.push((handle, rank));
        self.sift_up(pos);
    }

    /// The member with the lowest rank.
    pub fn peek(&self) -> Option<(&H, Rank)> {
        self.heap.first().map(|(handle, rank)| (handle, *rank))
    }

    /// Remove and return the member with the lowest rank.
    pub fn pop(&mut self) -> Option<(H, Rank)> {
        if self.heap.is_empty() {
            return None;
        }
        Some(self.remove_at(0))
    }

    /// Remove a member, returning its rank.
    pub fn remove(&mut self, handle: &H) -> Option<Rank> {
        let pos = *self.slots.get(handle)?;
        let (_, rank) = self.remove_at(pos);
        Some(rank)
    }

    /// Change the rank of a member.
    ///
    /// Returns `false` if the handle is not a member.
    pub fn update(&mut self, handle: &H, rank: Rank) -> bool {
        let Some(&pos) = self.slots.get(handle) else {
            return false;
        };
        self.heap[pos].1 = rank;
        let pos = self.sift_up(pos);
        self.sift_down(pos);
        true
    }

    /// Rank of a member.
    pub fn rank(&self, handle: &H) -> Option<Rank> {
        self.slots.get(handle).map(|&pos| self.heap[pos].1)
    }

    /// Returns `true` if the handle is a member.
    pub fn contains(&self, handle: &H) -> bool {
        self.slots.contains_key(handle)
    }

    /// Member count.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the window has no member.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Members from the lowest to the highest rank.
    pub fn sorted(&self) -> Vec<(H, Rank)> {
        let mut members = self.heap.clone();
        members.sort_by(|(_, a), (_, b)| a.compare(b));
        members
    }

    fn remove_at(&mut self, pos: usize) -> (H, Rank) {
        let last = self.heap.len() - 1;
        self.swap(pos, last);
        let (handle, rank) = match self.heap.pop() {
            Some(member) => member,
            None => unreachable!(),
        };
        self.slots.remove(&handle);
        if pos < self.heap.len() {
            let pos = self.sift_up(pos);
            self.sift_down(pos);
        }
        (handle, rank)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.heap[a].1.compare(&self.heap[b].1) == Ordering::Less
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) -> usize {
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut min = pos;
            if left < self.heap.len() && self.less(left, min) {
                min = left;
            }
            if right < self.heap.len() && self.less(right, min) {
                min = right;
            }
            if min == pos {
                return pos;
            }
            self.swap(pos, min);
            pos = min;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        for pos in [a, b] {
            let slot = self.slots.get_mut(&self.heap[pos].0);
            strict_assert!(slot.is_some());
            if let Some(slot) = slot {
                *slot = pos;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;

    fn rank(score: f64, seq: u64) -> Rank {
        Rank { score, seq }
    }

    #[test]
    fn test_window_heap() {
        let mut heap = WindowHeap::default();
        heap.push('a', rank(2.0, 0));
        heap.push('b', rank(1.0, 1));
        heap.push('c', rank(3.0, 2));
        heap.push('d', rank(1.0, 3));
        assert_eq!(heap.len(), 4);

        // Equal scores: the earlier window member wins.
        assert_eq!(heap.peek(), Some((&'b', rank(1.0, 1))));

        assert!(heap.update(&'b', rank(5.0, 1)));
        assert_eq!(heap.peek().map(|(h, _)| *h), Some('d'));

        assert_eq!(heap.remove(&'a'), Some(rank(2.0, 0)));
        assert_eq!(heap.remove(&'a'), None);
        assert!(!heap.update(&'a', rank(0.0, 0)));

        assert_eq!(heap.sorted().into_iter().map(|(h, _)| h).collect_vec(), vec!['d', 'c', 'b']);
        assert_eq!(heap.pop(), Some(('d', rank(1.0, 3))));
        assert_eq!(heap.pop(), Some(('c', rank(3.0, 2))));
        assert_eq!(heap.pop(), Some(('b', rank(5.0, 1))));
        assert_eq!(heap.pop(), None);
        assert!(heap.is_empty());
    }

    #[test]
    #[should_panic(expected = "is already in the window")]
    fn test_window_heap_push_twice() {
        let mut heap = WindowHeap::default();
        heap.push(1u64, rank(1.0, 0));
        heap.push(1u64, rank(1.0, 1));
    }

    #[test]
    fn test_window_heap_matches_linear_scan() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut heap = WindowHeap::default();
        let mut members: Vec<(u64, Rank)> = vec![];

        for seq in 0..2000u64 {
            match rng.random_range(0..4) {
                0 | 1 => {
                    let r = rank(rng.random_range(1..8) as f64, seq);
                    heap.push(seq, r);
                    members.push((seq, r));
                }
                2 if !members.is_empty() => {
                    let i = rng.random_range(0..members.len());
                    let r = rank(rng.random_range(1..8) as f64, members[i].1.seq);
                    assert!(heap.update(&members[i].0, r));
                    members[i].1 = r;
                }
                3 if !members.is_empty() => {
                    let i = rng.random_range(0..members.len());
                    let (h, r) = members.swap_remove(i);
                    assert_eq!(heap.remove(&h), Some(r));
                }
                _ => {}
            }

            let expected = members
                .iter()
                .min_by(|(_, a), (_, b)| a.compare(b))
                .map(|(h, _)| *h);
            assert_eq!(heap.peek().map(|(h, _)| *h), expected);
            assert_eq!(heap.len(), members.len());
        }
    }
}
