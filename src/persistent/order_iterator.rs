//! Stack-based traversal over a single tree version.
//!
//! An [`OrderIterator`] borrows one immutable snapshot. Adding to or deleting
//! from that snapshot produces new versions and never touches the nodes the
//! iterator still holds, so an iterator stays valid for as long as the
//! borrow does.

use smallvec::SmallVec;

use super::error::TreeError;
use super::node::Node;
use super::rebalance::INLINE_DEPTH;
use super::ReferenceCounter;

/// Traversal order for [`OrderIterator`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Order {
    /// Left subtree, node, right subtree. Yields elements in ascending order.
    #[default]
    InOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

/// A lazy, single-pass traversal of a [`PersistentRedBlackTree`](super::PersistentRedBlackTree).
///
/// Created by [`PersistentRedBlackTree::iter_order`](super::PersistentRedBlackTree::iter_order)
/// and [`PersistentRedBlackTree::iter`](super::PersistentRedBlackTree::iter).
///
/// # Examples
///
/// ```rust
/// use persistent_rbtree::persistent::{Order, PersistentRedBlackTree, TreeError};
///
/// let tree: PersistentRedBlackTree<i32> = [10, 15, 5].into_iter().collect();
///
/// let pre_order: Vec<&i32> = tree.iter_order(Order::PreOrder).collect();
/// assert_eq!(pre_order, vec![&10, &5, &15]);
///
/// let mut iterator = tree.iter_order(Order::PostOrder);
/// assert_eq!(iterator.try_next(), Ok(&5));
/// assert_eq!(iterator.try_next(), Ok(&15));
/// assert_eq!(iterator.try_next(), Ok(&10));
/// assert_eq!(iterator.try_next(), Err(TreeError::SequenceExhausted));
/// ```
pub struct OrderIterator<'a, E> {
    order: Order,
    stack: SmallVec<[&'a Node<E>; INLINE_DEPTH]>,
    /// Post-order only: parallel to `stack`, whether the node's right
    /// subtree has already been entered.
    visited_right: SmallVec<[bool; INLINE_DEPTH]>,
    remaining: usize,
}

impl<'a, E> OrderIterator<'a, E> {
    pub(crate) fn new(
        root: Option<&'a ReferenceCounter<Node<E>>>,
        length: usize,
        order: Order,
    ) -> Self {
        let mut iterator = Self {
            order,
            stack: SmallVec::new(),
            visited_right: SmallVec::new(),
            remaining: length,
        };
        match order {
            Order::PreOrder => iterator.stack.extend(root.map(|node| &**node)),
            Order::InOrder | Order::PostOrder => iterator.push_left_spine(root),
        }
        iterator
    }

    /// The traversal order this iterator follows.
    #[inline]
    pub const fn order(&self) -> Order {
        self.order
    }

    /// Advances the traversal, signalling exhaustion as an error value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::SequenceExhausted`] once every element has been
    /// yielded.
    pub fn try_next(&mut self) -> Result<&'a E, TreeError> {
        self.next().ok_or(TreeError::SequenceExhausted)
    }

    fn push_left_spine(&mut self, mut current: Option<&'a ReferenceCounter<Node<E>>>) {
        while let Some(node) = current {
            self.stack.push(node);
            self.visited_right.push(false);
            current = node.left();
        }
    }

    fn next_pre_order(&mut self) -> Option<&'a Node<E>> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right().map(|right| &**right));
        self.stack.extend(node.left().map(|left| &**left));
        Some(node)
    }

    fn next_in_order(&mut self) -> Option<&'a Node<E>> {
        let node = self.stack.pop()?;
        self.visited_right.pop();
        self.push_left_spine(node.right());
        Some(node)
    }

    fn next_post_order(&mut self) -> Option<&'a Node<E>> {
        loop {
            let node = *self.stack.last()?;
            let entered = self.visited_right.last_mut()?;
            match node.right() {
                Some(right) if !*entered => {
                    *entered = true;
                    self.push_left_spine(Some(right));
                }
                _ => break,
            }
        }
        self.visited_right.pop();
        self.stack.pop()
    }
}

impl<'a, E> Iterator for OrderIterator<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let node = match self.order {
            Order::PreOrder => self.next_pre_order(),
            Order::InOrder => self.next_in_order(),
            Order::PostOrder => self.next_post_order(),
        }?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E> ExactSizeIterator for OrderIterator<'_, E> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<E> std::iter::FusedIterator for OrderIterator<'_, E> {}

/// An owning iterator over the elements of a
/// [`PersistentRedBlackTree`](super::PersistentRedBlackTree), in order.
pub struct PersistentRedBlackTreeIntoIterator<E> {
    elements: std::vec::IntoIter<E>,
}

impl<E> PersistentRedBlackTreeIntoIterator<E> {
    pub(crate) fn new(elements: Vec<E>) -> Self {
        Self {
            elements: elements.into_iter(),
        }
    }
}

impl<E> Iterator for PersistentRedBlackTreeIntoIterator<E> {
    type Item = E;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<E> ExactSizeIterator for PersistentRedBlackTreeIntoIterator<E> {
    fn len(&self) -> usize {
        self.elements.len()
    }
}
