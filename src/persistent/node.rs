//! Immutable red-black tree nodes.
//!
//! A [`Node`] is never mutated once it is reachable from a published tree.
//! New versions are built by deriving fresh copies of existing nodes with a
//! single field overridden (color, child, or value); untouched subtrees are
//! shared by reference.

use super::ReferenceCounter;

// =============================================================================
// Color and Direction
// =============================================================================

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child of a node a descent (or a rotation) refers to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Returns the other side.
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// A possibly absent subtree. `None` is an implicit black leaf.
pub(crate) type Link<E> = Option<ReferenceCounter<Node<E>>>;

/// Internal node structure for the red-black tree.
pub(crate) struct Node<E> {
    value: E,
    color: Color,
    left: Link<E>,
    right: Link<E>,
}

impl<E> Node<E> {
    /// Creates a new red node with no children.
    pub(crate) const fn new_red(value: E) -> Self {
        Self {
            value,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn value(&self) -> &E {
        &self.value
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) const fn child(&self, direction: Direction) -> Option<&ReferenceCounter<Self>> {
        match direction {
            Direction::Left => self.left.as_ref(),
            Direction::Right => self.right.as_ref(),
        }
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<&ReferenceCounter<Self>> {
        self.left.as_ref()
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<&ReferenceCounter<Self>> {
        self.right.as_ref()
    }

    /// Returns this node with `color` overridden.
    #[must_use]
    pub(crate) fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Returns this node with the child on `direction` replaced.
    #[must_use]
    pub(crate) fn with_child(mut self, direction: Direction, child: Link<E>) -> Self {
        match direction {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
        self
    }

    /// Returns this node with its value replaced.
    #[must_use]
    pub(crate) fn with_value(mut self, value: E) -> Self {
        self.value = value;
        self
    }

    /// Detaches the child on `direction`, leaving an empty slot.
    pub(crate) fn take_child(&mut self, direction: Direction) -> Link<E> {
        match direction {
            Direction::Left => self.left.take(),
            Direction::Right => self.right.take(),
        }
    }

    /// Wraps this node for attachment into a tree.
    #[inline]
    pub(crate) fn into_link(self) -> Link<E> {
        Some(ReferenceCounter::new(self))
    }
}

impl<E: Clone> Node<E> {
    /// Produces a fresh copy of this node. Children are shared, not copied.
    ///
    /// Combined with the `with_*` overrides this is the only way new node
    /// versions come into existence.
    pub(crate) fn derive(&self) -> Self {
        Self {
            value: self.value.clone(),
            color: self.color,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    /// Takes ownership of a linked node, copying it only if another
    /// version still references it.
    pub(crate) fn unshare(node: ReferenceCounter<Self>) -> Self {
        ReferenceCounter::try_unwrap(node).unwrap_or_else(|shared| shared.derive())
    }
}

/// Returns `true` if the link holds a red node. Absent nodes are black.
#[inline]
pub(crate) fn is_red<E>(node: Option<&ReferenceCounter<Node<E>>>) -> bool {
    node.is_some_and(|node| node.is_red())
}

// =============================================================================
// Tests
// =============================================================================
