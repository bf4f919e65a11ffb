//! Persistent (immutable) red-black tree.
//!
//! This module provides [`PersistentRedBlackTree`], an ordered set that uses
//! structural sharing: every `add` and `delete` returns a new version, and
//! all previously returned versions remain valid and unchanged.
//!
//! # Structural Sharing
//!
//! A modification copies only the nodes on the path from the root to the
//! touched position (plus the handful of nodes a rebalancing rotation
//! reshapes). Every other subtree is shared by reference between the old
//! and the new version.
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbtree::persistent::{Order, PersistentRedBlackTree, TreeError};
//!
//! let tree: PersistentRedBlackTree<i32> = [12, 5, 15, 3, 10, 13, 17, 4, 7, 11, 14, 6, 8]
//!     .into_iter()
//!     .collect();
//! let deleted = tree.delete(&5)?;
//!
//! let pre_order: Vec<i32> = deleted.iter_order(Order::PreOrder).copied().collect();
//! assert_eq!(pre_order, vec![12, 6, 3, 4, 10, 7, 8, 11, 15, 13, 14, 17]);
//!
//! // Structural sharing: the original tree is preserved
//! assert!(tree.contains(&5));
//! assert_eq!(deleted.delete(&5), Err(TreeError::KeyNotFound));
//! # Ok::<(), TreeError>(())
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled (default), this is `std::sync::Arc`,
/// which lets tree versions be shared across threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod error;
mod node;
mod order_iterator;
mod rebalance;
mod red_black_tree;

pub use error::InvariantViolation;
pub use error::TreeError;
pub use order_iterator::Order;
pub use order_iterator::OrderIterator;
pub use order_iterator::PersistentRedBlackTreeIntoIterator;
pub use red_black_tree::PersistentRedBlackTree;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
