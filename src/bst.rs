//! An ordered map implemented with a plain, unbalanced binary search tree.
//!
//! This is the tree the AVL map builds upon. Its height depends on insertion
//! order: sorted input degenerates it into a list.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::error::{Error, Result};

/// An ordered map implemented with an unbalanced binary search tree.
///
/// ```
/// use avl_arena::BstMap;
/// let mut map = BstMap::new();
/// for key in 0..4 {
///     map.add(key, key * 10);
/// }
/// assert_eq!(map.get(&2), Some(&20));
/// // Sorted input is not rebalanced
/// assert_eq!(map.height(), 4);
/// ```
pub struct BstMap<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

// Pending work of the iterative clone
enum CloneStep<'a, K, V> {
    Visit(Option<&'a Node<K, V>>),
    Assemble(&'a Node<K, V>),
}

impl<K, V> BstMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, 0 for an empty map.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node<K, V>, usize)> =
            self.root.as_deref().map(|node| (node, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        // Unlink iteratively, dropping a list-shaped tree recursively overflows the stack
        let mut stack: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.num_nodes = 0;
    }

    /// Returns the keys of the map in ascending order.
    pub fn in_order_keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse_in_order(|node| keys.push(&node.key));
        keys
    }

    fn traverse_in_order<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a Node<K, V>),
    {
        let mut stack = Vec::new();
        let mut current = self.root.as_deref();
        loop {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            match stack.pop() {
                None => break,
                Some(node) => {
                    f(node);
                    current = node.right.as_deref();
                }
            }
        }
    }
}

impl<K: Ord, V> BstMap<K, V> {
    /// Returns true if the map contains a value for the specified key.
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
        self.find(key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
            }
        }
        None
    }

    /// Replaces the value of an existing key and returns the old value.
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
    /// Returns the old value if the key was already present.
    pub fn add(&mut self, key: K, value: V) -> Option<V> {
        let mut link = &mut self.root;
        while let Some(node) = link {
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
                Ordering::Less => link = &mut node.left,
                Ordering::Greater => link = &mut node.right,
            }
        }
        *link = Some(Box::new(Node {
            key,
            value,
            left: None,
            right: None,
        }));
        self.num_nodes += 1;
        None
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
        let link = Self::find_link(&mut self.root, key)?;
        let mut node = link.take()?;
        *link = match (node.left.take(), node.right.take()) {
            (None, child) | (child, None) => child,
            (left, mut right) => {
                // Replace by smallest node of right subtree
                let mut successor = Self::take_min(&mut right)?;
                successor.left = left;
                successor.right = right;
                Some(successor)
            }
        };
        self.num_nodes -= 1;
        Some((node.key, node.value))
    }

    /// Returns true if an in-order traversal yields strictly ascending keys.
    pub fn is_bst(&self) -> bool {
        let keys = self.in_order_keys();
        keys.windows(2).all(|pair| pair[0] < pair[1])
    }

    fn find<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Walks down to the link holding the key.
    /// Returns `None` if the key is not in the subtree.
    fn find_link<'a, Q>(mut link: &'a mut Link<K, V>, key: &Q) -> Option<&'a mut Link<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        loop {
            // Compare through a shared borrow so the matching link stays usable
            let ordering = key.cmp(link.as_deref()?.key.borrow());
            match (ordering, link) {
                (Ordering::Equal, found) => return Some(found),
                (Ordering::Less, Some(node)) => link = &mut node.left,
                (Ordering::Greater, Some(node)) => link = &mut node.right,
                (_, None) => return None,
            }
        }
    }

    /// Unlinks the node with the smallest key from the subtree at `link`.
    fn take_min(mut link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
        while link.as_ref()?.left.is_some() {
            link = &mut link.as_mut()?.left;
        }
        let mut min = link.take()?;
        *link = min.right.take();
        Some(min)
    }
}

impl<K, V> Drop for BstMap<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Clone, V: Clone> Clone for BstMap<K, V> {
    fn clone(&self) -> Self {
        // Build bottom-up in post-order, a derived (recursive) clone overflows on deep trees
        let mut built: Vec<Link<K, V>> = Vec::new();
        let mut steps = vec![CloneStep::Visit(self.root.as_deref())];
        while let Some(step) = steps.pop() {
            match step {
                CloneStep::Visit(None) => built.push(None),
                CloneStep::Visit(Some(node)) => {
                    steps.push(CloneStep::Assemble(node));
                    steps.push(CloneStep::Visit(node.right.as_deref()));
                    steps.push(CloneStep::Visit(node.left.as_deref()));
                }
                CloneStep::Assemble(node) => {
                    let right = built.pop().flatten();
                    let left = built.pop().flatten();
                    built.push(Some(Box::new(Node {
                        key: node.key.clone(),
                        value: node.value.clone(),
                        left,
                        right,
                    })));
                }
            }
        }
        Self {
            root: built.pop().flatten(),
            num_nodes: self.num_nodes,
        }
    }
}

impl<K: Ord, V> Default for BstMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BstMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut map = f.debug_map();
        self.traverse_in_order(|node| {
            map.entry(&node.key, &node.value);
        });
        map.finish()
    }
}
