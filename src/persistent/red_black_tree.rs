//! Persistent (immutable) ordered set based on a red-black tree.
//!
//! This module provides [`PersistentRedBlackTree`], an immutable ordered set
//! in which every `add` and `delete` returns a new version while all earlier
//! versions stay valid and unchanged.
//!
//! # Overview
//!
//! - O(log N) `contains`
//! - O(log N) `add`, rejecting duplicates with [`TreeError::DuplicateKey`]
//! - O(log N) `delete`, rejecting absent elements with [`TreeError::KeyNotFound`]
//! - O(1) `len` and `is_empty`
//! - in-order, pre-order and post-order traversal
//!
//! Only the O(log N) nodes on the path from the root to the touched position
//! are recreated; every other subtree is shared between versions.
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbtree::persistent::{Order, PersistentRedBlackTree};
//!
//! let tree = PersistentRedBlackTree::new().add(10)?.add(15)?.add(5)?;
//! let grown = tree.add(2)?;
//!
//! let pre_order: Vec<&i32> = grown.iter_order(Order::PreOrder).collect();
//! assert_eq!(pre_order, vec![&10, &5, &2, &15]);
//!
//! // The earlier version is untouched
//! assert!(!tree.contains(&2));
//! assert_eq!(tree.len(), 3);
//! # Ok::<(), persistent_rbtree::persistent::TreeError>(())
//! ```
//!
//! # Internal Structure
//!
//! The tree maintains the following invariants after every operation:
//! 1. A red node never has a red child
//! 2. Every root-to-leaf path has the same number of black nodes
//! 3. The root is black
//! 4. In-order traversal is strictly increasing
//!
//! Absent children count as black leaves.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::ReferenceCounter;
use super::error::{InvariantViolation, TreeError};
use super::node::{Color, Link, Node};
use super::order_iterator::{Order, OrderIterator, PersistentRedBlackTreeIntoIterator};
use super::rebalance::{self, Descent};

// =============================================================================
// PersistentRedBlackTree Definition
// =============================================================================

/// A persistent (immutable) ordered set backed by a red-black tree.
///
/// Elements are ordered by their [`Ord`] implementation, which is the
/// caller's comparator: any total order works, including descending ones.
/// Two elements comparing [`Equal`](std::cmp::Ordering::Equal) are the same
/// element as far as the set is concerned.
///
/// Cloning a tree is O(1) and shares every node.
///
/// # Time Complexity
///
/// | Operation    | Complexity |
/// |--------------|------------|
/// | `new`        | O(1)       |
/// | `contains`   | O(log N)   |
/// | `add`        | O(log N)   |
/// | `delete`     | O(log N)   |
/// | `min`/`max`  | O(log N)   |
/// | `len`        | O(1)       |
/// | `iter_order` | O(N) total |
///
/// # Examples
///
/// ```rust
/// use persistent_rbtree::persistent::{PersistentRedBlackTree, TreeError};
///
/// let empty = PersistentRedBlackTree::new();
/// let one = empty.add(1).unwrap();
///
/// assert!(one.contains(&1));
/// assert!(!empty.contains(&1));
/// assert_eq!(one.add(1), Err(TreeError::DuplicateKey));
/// assert_eq!(empty.delete(&1), Err(TreeError::KeyNotFound));
/// ```
#[derive(Clone)]
pub struct PersistentRedBlackTree<E> {
    /// Root node of the tree
    root: Link<E>,
    /// Number of elements
    length: usize,
}

impl<E> PersistentRedBlackTree<E> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree: PersistentRedBlackTree<i32> = PersistentRedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of elements in the tree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns a lazy traversal of this version in the given order.
    ///
    /// The iterator only borrows this version; later `add`/`delete` calls
    /// on it produce new versions and leave the traversal unaffected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::{Order, PersistentRedBlackTree};
    ///
    /// let tree: PersistentRedBlackTree<i32> = (1..=7).collect();
    ///
    /// let post_order: Vec<i32> = tree.iter_order(Order::PostOrder).copied().collect();
    /// assert_eq!(post_order, vec![1, 3, 5, 7, 6, 4, 2]);
    /// ```
    #[must_use]
    pub fn iter_order(&self, order: Order) -> OrderIterator<'_, E> {
        OrderIterator::new(self.root.as_ref(), self.length, order)
    }

    /// Returns an iterator over the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree: PersistentRedBlackTree<i32> = [3, 1, 2].into_iter().collect();
    /// let elements: Vec<&i32> = tree.iter().collect();
    /// assert_eq!(elements, vec![&1, &2, &3]);
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> OrderIterator<'_, E> {
        self.iter_order(Order::InOrder)
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn min(&self) -> Option<&E> {
        let mut current = self.root.as_ref()?;
        while let Some(left) = current.left() {
            current = left;
        }
        Some(current.value())
    }

    /// Returns the largest element.
    #[must_use]
    pub fn max(&self) -> Option<&E> {
        let mut current = self.root.as_ref()?;
        while let Some(right) = current.right() {
            current = right;
        }
        Some(current.value())
    }

    /// Returns `true` if both trees are the same version (share a root).
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<E: Ord> PersistentRedBlackTree<E> {
    /// Returns `true` if the tree contains an element equal to `element`.
    ///
    /// The argument may be any borrowed form of the element type, but the
    /// ordering on the borrowed form must match the ordering on `E`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::new().add("key".to_string()).unwrap();
    /// assert!(tree.contains("key"));
    /// assert!(!tree.contains("other"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(element).is_some()
    }

    /// Returns the stored element equal to `element`.
    #[must_use]
    pub fn get<Q>(&self, element: &Q) -> Option<&E>
    where
        E: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        rebalance::locate(self.root.as_ref(), element).map(Node::value)
    }

    /// Checks every red-black invariant and returns the black height.
    ///
    /// The black height counts the black nodes on any root-to-leaf path,
    /// excluding the implicit leaves.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        if self.root.as_ref().is_some_and(|root| root.is_red()) {
            return Err(InvariantViolation::RedRoot);
        }
        let black_height = Self::validate_subtree(self.root.as_ref())?;

        let mut previous: Option<&E> = None;
        for element in self {
            if previous.is_some_and(|previous| previous >= element) {
                return Err(InvariantViolation::OrderViolation);
            }
            previous = Some(element);
        }
        Ok(black_height)
    }

    /// Returns `true` if [`validate`](Self::validate) finds no violation.
    #[must_use]
    pub fn is_valid_red_black_tree(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate_subtree(
        node: Option<&ReferenceCounter<Node<E>>>,
    ) -> Result<usize, InvariantViolation> {
        let Some(node) = node else {
            return Ok(0);
        };
        if node.is_red()
            && (node.left().is_some_and(|left| left.is_red())
                || node.right().is_some_and(|right| right.is_red()))
        {
            return Err(InvariantViolation::RedRedViolation);
        }
        let left = Self::validate_subtree(node.left())?;
        let right = Self::validate_subtree(node.right())?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { left, right });
        }
        Ok(left + usize::from(!node.is_red()))
    }
}

impl<E: Clone + Ord> PersistentRedBlackTree<E> {
    /// Creates a tree containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: E) -> Self {
        Self {
            root: Node::new_red(element).with_color(Color::Black).into_link(),
            length: 1,
        }
    }

    /// Returns a new version with `element` added.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if an equal element is already
    /// present. Nothing is built in that case.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let one = PersistentRedBlackTree::new().add(1).unwrap();
    /// let two = one.add(2).unwrap();
    ///
    /// assert_eq!(one.len(), 1); // Original unchanged
    /// assert_eq!(two.len(), 2); // New version
    /// ```
    pub fn add(&self, element: E) -> Result<Self, TreeError> {
        let path = match rebalance::descend(self.root.as_ref(), &element) {
            Descent::Found { .. } => {
                tracing::debug!(length = self.length, "add rejected: duplicate element");
                return Err(TreeError::DuplicateKey);
            }
            Descent::Vacant(path) => path,
        };
        let root = rebalance::insert(path, element);
        tracing::trace!(length = self.length + 1, "element added");
        Ok(Self {
            root,
            length: self.length + 1,
        })
    }

    /// Returns a new version with the element equal to `element` removed.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if no equal element is present.
    /// Nothing is built in that case.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree: PersistentRedBlackTree<i32> = [1, 2].into_iter().collect();
    /// let removed = tree.delete(&1).unwrap();
    ///
    /// assert!(tree.contains(&1));     // Original unchanged
    /// assert!(!removed.contains(&1)); // New version
    /// ```
    pub fn delete<Q>(&self, element: &Q) -> Result<Self, TreeError>
    where
        E: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Descent::Found { path, node } = rebalance::descend(self.root.as_ref(), element) else {
            tracing::debug!(length = self.length, "delete rejected: element not found");
            return Err(TreeError::KeyNotFound);
        };
        let root = rebalance::remove(path, node);
        let length = self.length - 1;
        tracing::trace!(length, "element deleted");
        Ok(Self { root, length })
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<E> Default for PersistentRedBlackTree<E> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Collects elements into a tree. Elements equal to one already collected
/// are skipped.
impl<E: Clone + Ord> FromIterator<E> for PersistentRedBlackTree<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |tree, element| {
            tree.add(element).unwrap_or(tree)
        })
    }
}

impl<'a, E> IntoIterator for &'a PersistentRedBlackTree<E> {
    type Item = &'a E;
    type IntoIter = OrderIterator<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: Clone> IntoIterator for PersistentRedBlackTree<E> {
    type Item = E;
    type IntoIter = PersistentRedBlackTreeIntoIterator<E>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentRedBlackTreeIntoIterator::new(self.iter().cloned().collect())
    }
}

impl<E: Ord> PartialEq for PersistentRedBlackTree<E> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self
                .iter()
                .zip(other.iter())
                .all(|(left, right)| left.cmp(right).is_eq())
    }
}

impl<E: Ord> Eq for PersistentRedBlackTree<E> {}

/// Hashes the length followed by every element in ascending order, so equal
/// sets hash equally regardless of how they were built.
impl<E: Hash> Hash for PersistentRedBlackTree<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for PersistentRedBlackTree<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<E: fmt::Display> fmt::Display for PersistentRedBlackTree<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Thread Safety
// =============================================================================

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentRedBlackTree<i32>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentRedBlackTree<i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
