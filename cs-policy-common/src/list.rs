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

/// Position of an element in a [`SlabList`].
///
/// A token stays valid until its element is removed. After that the slot may be reused, so holding
/// on to a stale token is a logic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(usize);

#[derive(Debug)]
struct Node<T> {
    val: T,

    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
enum Slot<T> {
    Vacant(Option<usize>),
    Occupied(Node<T>),
}

/// A doubly linked list whose nodes live in a slab.
///
/// Pushing returns a [`Token`] that removes the element in O(1), wherever it sits in the list.
pub struct SlabList<T> {
    slots: Vec<Slot<T>>,
    /// Head of the vacant slot chain.
    vacant: Option<usize>,

    head: Option<usize>,
    tail: Option<usize>,

    len: usize,
}

impl<T> Default for SlabList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for SlabList<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> SlabList<T> {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: None,
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Create an empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Append an element to the tail.
    pub fn push_back(&mut self, val: T) -> Token {
        let index = self.alloc(Node {
            val,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        Token(index)
    }

    /// Remove and return the element at the head.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.remove(Token(head))
    }

    /// Remove the element identified by `token`.
    ///
    /// Returns `None` if the slot is vacant.
    pub fn remove(&mut self, token: Token) -> Option<T> {
        let index = token.0;
        if !matches!(self.slots.get(index), Some(Slot::Occupied(_))) {
            return None;
        }

        let slot = std::mem::replace(&mut self.slots[index], Slot::Vacant(self.vacant));
        let node = match slot {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!(),
        };
        self.vacant = Some(index);

        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        self.len -= 1;

        Some(node.val)
    }

    /// Get the element identified by `token`.
    pub fn get(&self, token: Token) -> Option<&T> {
        match self.slots.get(token.0) {
            Some(Slot::Occupied(node)) => Some(&node.val),
            _ => None,
        }
    }

    /// The element at the head.
    pub fn front(&self) -> Option<&T> {
        self.head.map(|index| &self.node(index).val)
    }

    /// The element at the tail.
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|index| &self.node(index).val)
    }

    /// Iterate from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Remove all elements, returning them from head to tail.
    pub fn clear(&mut self) -> Vec<T> {
        let mut res = Vec::with_capacity(self.len);
        while let Some(val) = self.pop_front() {
            res.push(val);
        }
        self.slots.clear();
        self.vacant = None;
        res
    }

    /// Element count.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no element.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.vacant {
            Some(index) => {
                self.vacant = match self.slots[index] {
                    Slot::Vacant(next) => next,
                    Slot::Occupied(_) => unreachable!("vacant chain points to an occupied slot"),
                };
                self.slots[index] = Slot::Occupied(node);
                index
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        }
    }

    fn node(&self, index: usize) -> &Node<T> {
        match &self.slots[index] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("linked slot {index} is vacant"),
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        match &mut self.slots[index] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("linked slot {index} is vacant"),
        }
    }
}

/// Iterator over a [`SlabList`] from head to tail.
pub struct Iter<'a, T> {
    list: &'a SlabList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?);
        self.cursor = node.next;
        Some(&node.val)
    }
}

impl<'a, T> IntoIterator for &'a SlabList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_slab_list() {
        let mut list = SlabList::with_capacity(4);
        assert!(list.is_empty());

        let tokens = (0..6).map(|i| list.push_back(i)).collect_vec();
        assert_eq!(list.len(), 6);
        assert_eq!(list.iter().copied().collect_vec(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(list.front(), Some(&0));
        assert_eq!(list.back(), Some(&5));

        // middle, head, tail
        assert_eq!(list.remove(tokens[3]), Some(3));
        assert_eq!(list.remove(tokens[0]), Some(0));
        assert_eq!(list.remove(tokens[5]), Some(5));
        assert_eq!(list.iter().copied().collect_vec(), vec![1, 2, 4]);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&4));

        // removing twice is a no-op
        assert_eq!(list.remove(tokens[3]), None);
        assert_eq!(list.len(), 3);

        // vacant slots are reused
        let t6 = list.push_back(6);
        assert!(tokens.contains(&t6));
        assert_eq!(list.get(t6), Some(&6));
        assert_eq!(list.iter().copied().collect_vec(), vec![1, 2, 4, 6]);

        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.clear(), vec![2, 4, 6]);
        assert!(list.is_empty());
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.front(), None);
    }

    #[test]
    fn test_slab_list_move_to_back() {
        let mut list = SlabList::new();
        let a = list.push_back("a");
        list.push_back("b");
        list.push_back("c");

        let val = list.remove(a).unwrap();
        let a = list.push_back(val);
        assert_eq!(list.iter().copied().collect_vec(), vec!["b", "c", "a"]);
        assert_eq!(list.get(a), Some(&"a"));
        assert_eq!(format!("{list:?}"), r#"["b", "c", "a"]"#);
    }
}
