use crate::bst::BstMap;
use crate::error::Result;
use crate::map::AvlTreeMap;

/// Operations shared by the ordered maps of this crate.
///
/// ```
/// use avl_arena::{AvlTreeMap, BstMap, OrderedMap};
///
/// fn fill<M: OrderedMap<u32, &'static str>>(map: &mut M) {
///     map.add(1, "one");
///     map.add(2, "two");
/// }
///
/// let mut avl = AvlTreeMap::new();
/// let mut bst = BstMap::new();
/// fill(&mut avl);
/// fill(&mut bst);
/// assert_eq!(OrderedMap::get(&avl, &2), OrderedMap::get(&bst, &2));
/// ```
pub trait OrderedMap<K, V> {
    /// Returns the number of elements in the map.
    fn len(&self) -> usize;

    /// Returns true if the map contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the map contains a value for the specified key.
    fn contains_key(&self, key: &K) -> bool;

    /// Returns a reference to the value corresponding to the key.
    fn get(&self, key: &K) -> Option<&V>;

    /// Replaces the value of an existing key, failing with
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound) if it is absent.
    fn set(&mut self, key: &K, value: V) -> Result<V>;

    /// Inserts or overwrites, returning the overwritten value.
    fn add(&mut self, key: K, value: V) -> Option<V>;

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    fn remove(&mut self, key: &K) -> Option<V>;
}

impl<K: Ord, V> OrderedMap<K, V> for AvlTreeMap<K, V> {
    fn len(&self) -> usize {
        AvlTreeMap::len(self)
    }

    fn contains_key(&self, key: &K) -> bool {
        AvlTreeMap::contains_key(self, key)
    }

    fn get(&self, key: &K) -> Option<&V> {
        AvlTreeMap::get(self, key)
    }

    fn set(&mut self, key: &K, value: V) -> Result<V> {
        AvlTreeMap::set(self, key, value)
    }

    fn add(&mut self, key: K, value: V) -> Option<V> {
        AvlTreeMap::add(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        AvlTreeMap::remove(self, key)
    }
}

impl<K: Ord, V> OrderedMap<K, V> for BstMap<K, V> {
    fn len(&self) -> usize {
        BstMap::len(self)
    }

    fn contains_key(&self, key: &K) -> bool {
        BstMap::contains_key(self, key)
    }

    fn get(&self, key: &K) -> Option<&V> {
        BstMap::get(self, key)
    }

    fn set(&mut self, key: &K, value: V) -> Result<V> {
        BstMap::set(self, key, value)
    }

    fn add(&mut self, key: K, value: V) -> Option<V> {
        BstMap::add(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        BstMap::remove(self, key)
    }
}
