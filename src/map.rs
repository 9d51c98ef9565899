//! An ordered map implemented with an AVL tree.
//!
//! Nodes are stored in an arena (a vector of slots) and link to each other by
//! slot index. Removed nodes leave a vacant slot behind which is chained into a
//! free list and reused by later insertions.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::fmt;
use std::iter::FromIterator;
use std::mem;

use log::{debug, trace};

use crate::error::{Error, Result};

/// An ordered map implemented with an AVL tree.
///
/// ```
/// use avl_arena::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.add(0, "zero");
/// map.add(1, "one");
/// map.add(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Link,
    root: Link,
    num_nodes: usize,
}

type NodeIdx = usize;
type Link = Option<NodeIdx>;

#[derive(Clone)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    // Next vacant slot in the free list
    Vacant(Link),
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Link,
    right: Link,
    height: usize,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, 0 for an empty map and 1 for a single element.
    pub fn height(&self) -> usize {
        self.link_height(self.root)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        debug!("clearing map with {} elements", self.num_nodes);
        self.slots = Vec::new();
        self.free = None;
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns the keys of the map in ascending order.
    pub fn in_order_keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse_in_order(|node| keys.push(&node.key));
        keys
    }

    /// Returns true if every node's subtree heights differ by at most one.
    pub fn is_balanced(&self) -> bool {
        self.slots.iter().all(|slot| match slot {
            Slot::Occupied(node) => self.balance_factor(node).abs() <= 1,
            Slot::Vacant(_) => true,
        })
    }

    fn node(&self, idx: NodeIdx) -> &Node<K, V> {
        match &self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("link to vacant slot {}", idx),
        }
    }

    fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<K, V> {
        match &mut self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("link to vacant slot {}", idx),
        }
    }

    fn allocate(&mut self, key: K, value: V) -> NodeIdx {
        let node = Node {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        };
        match self.free {
            Some(idx) => {
                match mem::replace(&mut self.slots[idx], Slot::Occupied(node)) {
                    Slot::Vacant(next) => self.free = next,
                    Slot::Occupied(_) => unreachable!("free list points to occupied slot {}", idx),
                }
                trace!("reusing vacant slot {}", idx);
                idx
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: NodeIdx) -> Node<K, V> {
        match mem::replace(&mut self.slots[idx], Slot::Vacant(self.free)) {
            Slot::Occupied(node) => {
                self.free = Some(idx);
                node
            }
            Slot::Vacant(_) => unreachable!("releasing vacant slot {}", idx),
        }
    }

    fn link_height(&self, link: Link) -> usize {
        match link {
            None => 0,
            Some(idx) => self.node(idx).height,
        }
    }

    /// Height of the left subtree minus height of the right subtree.
    fn balance_factor(&self, node: &Node<K, V>) -> isize {
        self.link_height(node.left) as isize - self.link_height(node.right) as isize
    }

    fn adjust_height(&mut self, idx: NodeIdx) {
        let node = self.node(idx);
        let height = 1 + cmp::max(self.link_height(node.left), self.link_height(node.right));
        self.node_mut(idx).height = height;
    }

    //     node          pivot
    //     /  \          /   \
    //    a   pivot -> node   c
    //        /  \     /  \
    //       b    c   a    b
    fn rotate_left(&mut self, idx: NodeIdx) -> NodeIdx {
        let pivot = match self.node(idx).right {
            None => unreachable!("rotating left at slot {} without right child", idx),
            Some(pivot) => pivot,
        };
        let inner = self.node(pivot).left;
        self.node_mut(idx).right = inner;
        self.node_mut(pivot).left = Some(idx);

        self.adjust_height(idx);
        self.adjust_height(pivot);
        trace!("rotated left at slot {}, slot {} is new subtree root", idx, pivot);
        pivot
    }

    fn rotate_right(&mut self, idx: NodeIdx) -> NodeIdx {
        let pivot = match self.node(idx).left {
            None => unreachable!("rotating right at slot {} without left child", idx),
            Some(pivot) => pivot,
        };
        let inner = self.node(pivot).right;
        self.node_mut(idx).left = inner;
        self.node_mut(pivot).right = Some(idx);

        self.adjust_height(idx);
        self.adjust_height(pivot);
        trace!("rotated right at slot {}, slot {} is new subtree root", idx, pivot);
        pivot
    }

    /// Restores AVL condition (balance) at given node if necessary and adjusts height.
    /// Both subtrees must already be balanced and their heights must not differ by more
    /// than 2, which always holds after a single insert or remove below this node.
    /// Returns the root of the rebalanced subtree.
    fn rebalance(&mut self, idx: NodeIdx) -> NodeIdx {
        self.adjust_height(idx);
        let node = self.node(idx);
        let balance = self.balance_factor(node);
        debug_assert!((-2..=2).contains(&balance));
        if balance > 1 {
            // Left-right case: straighten the left subtree first
            if let Some(left) = node.left {
                if self.balance_factor(self.node(left)) < 0 {
                    let left = self.rotate_left(left);
                    self.node_mut(idx).left = Some(left);
                }
            }
            self.rotate_right(idx)
        } else if balance < -1 {
            // Right-left case: straighten the right subtree first
            if let Some(right) = node.right {
                if self.balance_factor(self.node(right)) > 0 {
                    let right = self.rotate_right(right);
                    self.node_mut(idx).right = Some(right);
                }
            }
            self.rotate_left(idx)
        } else {
            idx
        }
    }

    /// Unlinks the node with the smallest key from the subtree rooted at `idx`.
    /// Returns the remaining (rebalanced) subtree and the detached node.
    fn detach_min(&mut self, idx: NodeIdx) -> (Link, NodeIdx) {
        let node = self.node(idx);
        match node.left {
            None => (node.right, idx),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.node_mut(idx).left = rest;
                (Some(self.rebalance(idx)), min)
            }
        }
    }

    fn traverse_in_order<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a Node<K, V>),
    {
        let mut stack = Vec::with_capacity(self.height());
        let mut current = self.root;
        loop {
            while let Some(idx) = current {
                stack.push(idx);
                current = self.node(idx).left;
            }
            match stack.pop() {
                None => break,
                Some(idx) => {
                    let node = self.node(idx);
                    f(node);
                    current = node.right;
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn root_key(&self) -> Option<&K> {
        self.root.map(|idx| &self.node(idx).key)
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub(crate) fn rotate_root(&mut self, left: bool) {
        if let Some(idx) = self.root {
            let root = if left { self.rotate_left(idx) } else { self.rotate_right(idx) };
            self.root = Some(root);
        }
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Returns true if the map contains a value for the specified key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|idx| &self.node(idx).value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.find(key) {
            Some(idx) => Some(&mut self.node_mut(idx).value),
            None => None,
        }
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|idx| {
            let node = self.node(idx);
            (&node.key, &node.value)
        })
    }

    /// Replaces the value of an existing key and returns the old value.
    ///
    /// Unlike [`add`](Self::add) this never inserts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the map does not contain the key.
    pub fn set<Q>(&mut self, key: &Q, value: V) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = self.get_mut(key).ok_or(Error::KeyNotFound)?;
        Ok(mem::replace(slot, value))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained the key, the value is replaced in place and the
    /// old value is returned. The key itself is not updated.
    pub fn add(&mut self, key: K, value: V) -> Option<V> {
        let (root, previous) = self.insert_at(self.root, key, value);
        self.root = Some(root);
        previous
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root?;
        let (root, removed) = self.remove_at(root, key);
        if removed.is_some() {
            self.root = root;
            if self.num_nodes == 0 {
                // Every slot is vacant, give the arena back
                self.slots = Vec::new();
                self.free = None;
            }
        }
        removed
    }

    /// Returns true if an in-order traversal yields strictly ascending keys.
    pub fn is_bst(&self) -> bool {
        let mut sorted = true;
        let mut prev: Option<&K> = None;
        self.traverse_in_order(|node| {
            if let Some(prev) = prev {
                sorted &= *prev < node.key;
            }
            prev = Some(&node.key);
        });
        sorted
    }

    /// Asserts all tree invariants: search order, stored heights, AVL balance,
    /// element count and arena bookkeeping.
    ///
    /// # Panics
    ///
    /// Panics if any invariant is violated.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        // Check tree nodes
        let mut num_nodes = 0;
        let mut stack: Vec<NodeIdx> = self.root.into_iter().collect();
        while let Some(idx) = stack.pop() {
            let node = self.node(idx);
            let mut left_height = 0;
            let mut right_height = 0;

            if let Some(left) = node.left {
                let left_node = self.node(left);
                assert!(left_node.key < node.key);
                left_height = left_node.height;
                stack.push(left);
            }

            if let Some(right) = node.right {
                let right_node = self.node(right);
                assert!(right_node.key > node.key);
                right_height = right_node.height;
                stack.push(right);
            }

            // Check height
            assert_eq!(node.height, 1 + cmp::max(left_height, right_height));

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            num_nodes += 1;
            assert!(num_nodes <= self.slots.len(), "cycle in tree links");
        }

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);

        // Local child checks do not cover grandchildren, check global order too
        assert!(self.is_bst());

        // Check arena: every slot is either reachable or on the free list
        let occupied = self
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .count();
        assert_eq!(occupied, self.num_nodes);

        let mut num_free = 0;
        let mut current = self.free;
        while let Some(idx) = current {
            match &self.slots[idx] {
                Slot::Vacant(next) => current = *next,
                Slot::Occupied(_) => panic!("free list points to occupied slot {}", idx),
            }
            num_free += 1;
            assert!(num_free <= self.slots.len(), "cycle in free list");
        }
        assert_eq!(occupied + num_free, self.slots.len());
    }

    #[cfg(test)]
    pub(crate) fn children_of(&self, key: &K) -> Option<(Option<&K>, Option<&K>)> {
        let node = self.node(self.find(key)?);
        let left = node.left.map(|idx| &self.node(idx).key);
        let right = node.right.map(|idx| &self.node(idx).key);
        Some((left, right))
    }

    fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = self.node(idx);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        current
    }

    /// Inserts into the subtree at `link` and returns the new subtree root
    /// together with the replaced value, if any.
    fn insert_at(&mut self, link: Link, key: K, value: V) -> (NodeIdx, Option<V>) {
        let idx = match link {
            None => {
                self.num_nodes += 1;
                return (self.allocate(key, value), None);
            }
            Some(idx) => idx,
        };

        let node = self.node(idx);
        let (left, right) = (node.left, node.right);
        match key.cmp(&node.key) {
            Ordering::Equal => {
                let previous = mem::replace(&mut self.node_mut(idx).value, value);
                return (idx, Some(previous));
            }
            Ordering::Less => {
                let (left, previous) = self.insert_at(left, key, value);
                self.node_mut(idx).left = Some(left);
                if previous.is_some() {
                    return (idx, previous);
                }
            }
            Ordering::Greater => {
                let (right, previous) = self.insert_at(right, key, value);
                self.node_mut(idx).right = Some(right);
                if previous.is_some() {
                    return (idx, previous);
                }
            }
        }
        (self.rebalance(idx), None)
    }

    /// Removes the key from the subtree rooted at `idx` and returns the new
    /// subtree root together with the removed entry, if any.
    fn remove_at<Q>(&mut self, idx: NodeIdx, key: &Q) -> (Link, Option<(K, V)>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.node(idx);
        let (left, right) = (node.left, node.right);
        match key.cmp(node.key.borrow()) {
            Ordering::Less => {
                let left = match left {
                    None => return (Some(idx), None),
                    Some(left) => left,
                };
                let (left, removed) = self.remove_at(left, key);
                if removed.is_none() {
                    return (Some(idx), None);
                }
                self.node_mut(idx).left = left;
                (Some(self.rebalance(idx)), removed)
            }
            Ordering::Greater => {
                let right = match right {
                    None => return (Some(idx), None),
                    Some(right) => right,
                };
                let (right, removed) = self.remove_at(right, key);
                if removed.is_none() {
                    return (Some(idx), None);
                }
                self.node_mut(idx).right = right;
                (Some(self.rebalance(idx)), removed)
            }
            Ordering::Equal => {
                let replacement = match (left, right) {
                    (None, child) | (child, None) => child,
                    (Some(_), Some(right)) => {
                        // Replace by smallest node of right subtree
                        let (rest, successor) = self.detach_min(right);
                        let successor_node = self.node_mut(successor);
                        successor_node.left = left;
                        successor_node.right = rest;
                        trace!("slot {} takes the place of removed slot {}", successor, idx);
                        Some(self.rebalance(successor))
                    }
                };
                let node = self.release(idx);
                self.num_nodes -= 1;
                (replacement, Some((node.key, node.value)))
            }
        }
    }
}

impl<K: Ord, V> Default for AvlTreeMap<K, V> {
    /// Creates an empty map.
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut lhs = Vec::with_capacity(self.len());
        self.traverse_in_order(|node| lhs.push((&node.key, &node.value)));
        let mut rhs = Vec::with_capacity(other.len());
        other.traverse_in_order(|node| rhs.push((&node.key, &node.value)));
        lhs == rhs
    }
}

impl<K: Eq, V: Eq> Eq for AvlTreeMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut map = f.debug_map();
        self.traverse_in_order(|node| {
            map.entry(&node.key, &node.value);
        });
        map.finish()
    }
}
