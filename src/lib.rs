//! An ordered map and set implemented with an AVL tree.
//!
//! Tree nodes live in an arena and refer to their children by index, so
//! rotations only rewrite integer links. The tree is rebalanced on every insert
//! and remove, keeping its height logarithmic in the number of elements.
//!
//! ```
//! use avl_arena::{AvlTreeMap, Error};
//!
//! let mut map = AvlTreeMap::new();
//! for key in [10, 20, 30] {
//!     map.add(key, key.to_string());
//! }
//! // Sorted input is rotated into a balanced tree
//! assert_eq!(map.height(), 2);
//! assert_eq!(map.set(&20, "twenty".into()), Ok("20".to_string()));
//! assert_eq!(map.set(&40, "forty".into()), Err(Error::KeyNotFound));
//! assert_eq!(map.in_order_keys(), [&10, &20, &30]);
//! ```
//!
//! Enable the `consistency_check` feature to expose `check_consistency`, which
//! asserts all tree invariants.

mod bst;
mod error;
mod map;
mod ordered_map;
mod set;

pub use bst::BstMap;
pub use error::{Error, Result};
pub use map::AvlTreeMap;
pub use ordered_map::OrderedMap;
pub use set::AvlTreeSet;
