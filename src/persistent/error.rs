//! Error types for persistent red-black tree operations.
//!
//! Rejected operations are ordinary outcomes, not failures of the structure:
//! a rejected `add` or `delete` builds nothing and every existing version
//! stays exactly as it was.

use std::fmt;

/// Represents the expected, recoverable outcomes of tree operations.
///
/// # Examples
///
/// ```rust
/// use persistent_rbtree::persistent::{PersistentRedBlackTree, TreeError};
///
/// let tree = PersistentRedBlackTree::new().add(1).unwrap();
/// assert_eq!(tree.add(1), Err(TreeError::DuplicateKey));
/// assert_eq!(tree.delete(&2), Err(TreeError::KeyNotFound));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeError {
    /// `add` was called with an element that compares equal to one already
    /// present.
    DuplicateKey,
    /// `delete` was called with an element that is not present.
    KeyNotFound,
    /// An order iterator was advanced past its last element.
    SequenceExhausted,
}

impl fmt::Display for TreeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey => write!(formatter, "element is already present in the tree"),
            Self::KeyNotFound => write!(formatter, "element is not present in the tree"),
            Self::SequenceExhausted => {
                write!(formatter, "traversal has no elements left")
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// A broken red-black tree invariant, as reported by
/// [`PersistentRedBlackTree::validate`](super::PersistentRedBlackTree::validate).
///
/// A tree built only through `add` and `delete` never reports one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantViolation {
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    RedRedViolation,
    /// Two root-to-leaf paths pass through different numbers of black nodes.
    BlackHeightMismatch {
        /// Black height of the left subtree at the offending node.
        left: usize,
        /// Black height of the right subtree at the offending node.
        right: usize,
    },
    /// In-order traversal is not strictly increasing.
    OrderViolation,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(formatter, "root node is red"),
            Self::RedRedViolation => write!(formatter, "red node has a red child"),
            Self::BlackHeightMismatch { left, right } => write!(
                formatter,
                "black height mismatch: left subtree has {left}, right subtree has {right}"
            ),
            Self::OrderViolation => {
                write!(formatter, "in-order traversal is not strictly increasing")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
