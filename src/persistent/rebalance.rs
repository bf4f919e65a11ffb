//! Path-copying red-black rebalancing.
//!
//! Every function here reads an immutable tree snapshot and returns a new
//! root. A descent records the ancestor chain as `(node, direction taken)`
//! pairs; once the modified subtree at the bottom is known, the chain is
//! walked in reverse and each ancestor is re-derived with only the relevant
//! child replaced. Nodes that belong to an earlier version are never
//! touched, only copied.
//!
//! Fix-up cases work on *owned* nodes that are not yet reachable from any
//! published tree, so they can be reshaped freely before being linked in.

use std::borrow::Borrow;
use std::cmp::Ordering;

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::node::{Color, Direction, Link, Node, is_red};

/// Inline capacity of an ancestor path. A red-black tree of height 48
/// holds at least 2^24 - 1 elements.
pub(crate) const INLINE_DEPTH: usize = 48;

// =============================================================================
// Ancestor Path
// =============================================================================

/// The chain of ancestors visited by a descent, root first.
pub(crate) struct AncestorPath<'a, E> {
    ancestors: SmallVec<[(&'a Node<E>, Direction); INLINE_DEPTH]>,
    /// Index of an ancestor whose value must be replaced when it is
    /// re-derived (the matched node of a two-children deletion).
    substitution: Option<(usize, E)>,
}

impl<'a, E> AncestorPath<'a, E> {
    fn new() -> Self {
        Self {
            ancestors: SmallVec::new(),
            substitution: None,
        }
    }

    fn push(&mut self, node: &'a Node<E>, direction: Direction) {
        self.ancestors.push((node, direction));
    }

    /// Number of recorded ancestors.
    pub(crate) fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

impl<E: Clone> AncestorPath<'_, E> {
    /// Removes the nearest ancestor and returns a fresh copy of it.
    fn pop(&mut self) -> Option<(Node<E>, Direction)> {
        let (ancestor, direction) = self.ancestors.pop()?;
        let copy = ancestor.derive();
        let copy = match self.substitution.take() {
            Some((index, value)) if index == self.ancestors.len() => copy.with_value(value),
            other => {
                self.substitution = other;
                copy
            }
        };
        Some((copy, direction))
    }

    /// Copies every remaining ancestor bottom-up, attaching `subtree` where
    /// the descent left off. Returns the new root.
    fn rebuild(mut self, subtree: Link<E>) -> Link<E> {
        let mut subtree = subtree;
        while let Some((ancestor, direction)) = self.pop() {
            subtree = ancestor.with_child(direction, subtree).into_link();
        }
        subtree
    }
}

// =============================================================================
// Descent / Lookup
// =============================================================================

/// Outcome of a recording descent.
pub(crate) enum Descent<'a, E> {
    /// `node` compares equal to the key; `path` ends at its parent.
    Found {
        path: AncestorPath<'a, E>,
        node: &'a Node<E>,
    },
    /// No match; the last ancestor's recorded direction is the empty slot
    /// where the key belongs.
    Vacant(AncestorPath<'a, E>),
}

/// Walks from `root` towards `key`, recording every ancestor passed.
pub(crate) fn descend<'a, E, Q>(
    root: Option<&'a ReferenceCounter<Node<E>>>,
    key: &Q,
) -> Descent<'a, E>
where
    E: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut path = AncestorPath::new();
    let mut current: Option<&'a Node<E>> = root.map(|node| &**node);
    while let Some(node) = current {
        let direction = match key.cmp(node.value().borrow()) {
            Ordering::Less => Direction::Left,
            Ordering::Greater => Direction::Right,
            Ordering::Equal => return Descent::Found { path, node },
        };
        path.push(node, direction);
        current = node.child(direction).map(|child| &**child);
    }
    Descent::Vacant(path)
}

/// Finds the node equal to `key` without recording anything.
pub(crate) fn locate<'a, E, Q>(
    root: Option<&'a ReferenceCounter<Node<E>>>,
    key: &Q,
) -> Option<&'a Node<E>>
where
    E: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = root;
    while let Some(node) = current {
        match key.cmp(node.value().borrow()) {
            Ordering::Less => current = node.left(),
            Ordering::Greater => current = node.right(),
            Ordering::Equal => return Some(node),
        }
    }
    None
}

// =============================================================================
// Rotation
// =============================================================================

/// Rotates `node` towards `direction`.
///
/// The child on the opposite side is promoted into `node`'s place and its
/// inner subtree (on `direction`) becomes `node`'s new opposite child.
/// Both returned nodes are fresh; grandchildren are shared.
pub(crate) fn rotate<E: Clone>(mut node: Node<E>, direction: Direction) -> Node<E> {
    let opposite = direction.opposite();
    let Some(promoted) = node.take_child(opposite) else {
        return node;
    };
    let mut promoted = Node::unshare(promoted);
    let inner = promoted.take_child(direction);
    promoted.with_child(direction, node.with_child(opposite, inner).into_link())
}

// =============================================================================
// Insertion
// =============================================================================

/// Attaches `value` as a red leaf at the vacant slot the path ends at and
/// restores the red-black invariants. Returns the new root.
pub(crate) fn insert<E: Clone>(mut path: AncestorPath<'_, E>, value: E) -> Link<E> {
    // Invariant: `current` is red and belongs below the nearest ancestor.
    let mut current = Node::new_red(value);

    loop {
        let Some((parent, parent_direction)) = path.pop() else {
            return current.with_color(Color::Black).into_link();
        };
        let parent_red = parent.is_red();
        let parent = parent.with_child(parent_direction, current.into_link());
        if !parent_red {
            return path.rebuild(parent.into_link());
        }
        let Some((grandparent, grandparent_direction)) = path.pop() else {
            // A red root never survives a published version.
            return parent.with_color(Color::Black).into_link();
        };

        let uncle_direction = grandparent_direction.opposite();
        if is_red(grandparent.child(uncle_direction)) {
            let uncle = grandparent
                .child(uncle_direction)
                .and_then(|uncle| uncle.derive().with_color(Color::Black).into_link());
            current = grandparent
                .with_color(Color::Red)
                .with_child(grandparent_direction, parent.with_color(Color::Black).into_link())
                .with_child(uncle_direction, uncle);
            continue;
        }

        // Inner grandchild: straighten it into an outer one first.
        let parent = if parent_direction == grandparent_direction {
            parent
        } else {
            rotate(parent, grandparent_direction)
        };
        let grandparent = grandparent
            .with_color(Color::Red)
            .with_child(grandparent_direction, parent.with_color(Color::Black).into_link());
        let subtree = rotate(grandparent, uncle_direction);
        return path.rebuild(subtree.into_link());
    }
}

// =============================================================================
// Deletion
// =============================================================================

/// Result of resolving a double-black deficiency at one level.
enum Resolution<E> {
    /// The subtree is balanced again; only plain copying remains.
    Balanced(Node<E>),
    /// The subtree is one black short and the deficiency moves up.
    Deficient(Node<E>),
}

impl<E> Resolution<E> {
    fn into_node(self) -> Node<E> {
        match self {
            Self::Balanced(node) | Self::Deficient(node) => node,
        }
    }
}

/// Removes `target` (found at the end of `path`) and restores the
/// red-black invariants. Returns the new root.
pub(crate) fn remove<'a, E: Clone>(mut path: AncestorPath<'a, E>, target: &'a Node<E>) -> Link<E> {
    let victim = match (target.left(), target.right()) {
        (Some(_), Some(right)) => {
            // Replace the value with the in-order successor and delete the
            // successor's node instead.
            let index = path.depth();
            path.push(target, Direction::Right);
            let mut successor: &'a Node<E> = right;
            while let Some(left) = successor.left() {
                path.push(successor, Direction::Left);
                successor = &**left;
            }
            path.substitution = Some((index, successor.value().clone()));
            successor
        }
        _ => target,
    };

    let replacement = victim.left().or_else(|| victim.right()).cloned();
    if victim.is_red() {
        return path.rebuild(replacement);
    }
    if is_red(replacement.as_ref()) {
        let recolored = replacement.map(|child| child.derive().with_color(Color::Black));
        return path.rebuild(recolored.and_then(Node::into_link));
    }
    fix_double_black(path, replacement)
}

/// Walks up from a subtree that is one black short until the deficiency is
/// absorbed or reaches the root.
fn fix_double_black<E: Clone>(mut path: AncestorPath<'_, E>, deficient: Link<E>) -> Link<E> {
    let mut deficient = deficient;
    while let Some((parent, direction)) = path.pop() {
        let parent = parent.with_child(direction, deficient);
        match resolve_deficiency(parent, direction) {
            Resolution::Balanced(subtree) => return path.rebuild(subtree.into_link()),
            Resolution::Deficient(subtree) => deficient = subtree.into_link(),
        }
    }
    deficient
}

/// Handles a deficient child of `parent` on `direction`.
fn resolve_deficiency<E: Clone>(parent: Node<E>, direction: Direction) -> Resolution<E> {
    let opposite = direction.opposite();
    let Some(sibling) = parent.child(opposite) else {
        return Resolution::Balanced(parent);
    };
    if !sibling.is_red() {
        return resolve_black_sibling(parent, direction);
    }

    // Red sibling: rotate it above the parent so the deficient side gets a
    // black sibling, then settle below a red parent (always terminates).
    let sibling = sibling.derive().with_color(Color::Black);
    let mut top = rotate(
        parent
            .with_color(Color::Red)
            .with_child(opposite, sibling.into_link()),
        direction,
    );
    let Some(lowered) = top.take_child(direction) else {
        return Resolution::Balanced(top);
    };
    let settled = resolve_black_sibling(Node::unshare(lowered), direction).into_node();
    Resolution::Balanced(top.with_child(direction, settled.into_link()))
}

fn resolve_black_sibling<E: Clone>(parent: Node<E>, direction: Direction) -> Resolution<E> {
    let opposite = direction.opposite();
    let Some(sibling) = parent.child(opposite) else {
        return Resolution::Balanced(parent);
    };
    let near_red = is_red(sibling.child(direction));
    let far_red = is_red(sibling.child(opposite));

    if !near_red && !far_red {
        let was_red = parent.is_red();
        let sibling = sibling.derive().with_color(Color::Red);
        let parent = parent
            .with_color(Color::Black)
            .with_child(opposite, sibling.into_link());
        return if was_red {
            Resolution::Balanced(parent)
        } else {
            Resolution::Deficient(parent)
        };
    }

    let mut sibling = sibling.derive();
    if !far_red {
        // Near child red: rotate it up so the red child ends up far.
        let near = sibling
            .take_child(direction)
            .and_then(|near| Node::unshare(near).with_color(Color::Black).into_link());
        sibling = rotate(
            sibling
                .with_color(Color::Red)
                .with_child(direction, near),
            opposite,
        );
    }

    let far = sibling
        .take_child(opposite)
        .and_then(|far| Node::unshare(far).with_color(Color::Black).into_link());
    let sibling = sibling
        .with_color(parent.color())
        .with_child(opposite, far);
    let parent = parent
        .with_color(Color::Black)
        .with_child(opposite, sibling.into_link());
    Resolution::Balanced(rotate(parent, direction))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn leaf(value: i32, color: Color) -> Link<i32> {
        Node::new_red(value).with_color(color).into_link()
    }

    fn branch(value: i32, color: Color, left: Link<i32>, right: Link<i32>) -> Link<i32> {
        Node::new_red(value)
            .with_color(color)
            .with_child(Direction::Left, left)
            .with_child(Direction::Right, right)
            .into_link()
    }

    fn pre_order(link: Option<&ReferenceCounter<Node<i32>>>, output: &mut Vec<i32>) {
        if let Some(node) = link {
            output.push(*node.value());
            pre_order(node.left(), output);
            pre_order(node.right(), output);
        }
    }

    fn collect_pre_order(link: &Link<i32>) -> Vec<i32> {
        let mut output = Vec::new();
        pre_order(link.as_ref(), &mut output);
        output
    }

    #[rstest]
    fn test_locate_finds_and_misses() {
        let root = branch(2, Color::Black, leaf(1, Color::Red), leaf(3, Color::Red));
        assert_eq!(locate(root.as_ref(), &3).map(Node::value), Some(&3));
        assert!(locate(root.as_ref(), &4).is_none());
        assert!(locate::<i32, i32>(None, &1).is_none());
    }

    #[rstest]
    fn test_descend_records_ancestors() {
        let root = branch(2, Color::Black, leaf(1, Color::Red), leaf(3, Color::Red));
        match descend(root.as_ref(), &3) {
            Descent::Found { path, node } => {
                assert_eq!(*node.value(), 3);
                assert_eq!(path.depth(), 1);
                assert_eq!(path.ancestors.last().map(|(_, direction)| *direction), Some(Direction::Right));
            }
            Descent::Vacant(_) => panic!("expected a match"),
        }
        match descend(root.as_ref(), &0) {
            Descent::Vacant(path) => assert_eq!(path.depth(), 2),
            Descent::Found { .. } => panic!("expected a vacant slot"),
        }
    }

    #[rstest]
    fn test_rotate_left_promotes_right_child() {
        //     2            4
        //   1   4   ->   2   5
        //      3 5      1 3
        let root = branch(
            2,
            Color::Black,
            leaf(1, Color::Black),
            branch(4, Color::Red, leaf(3, Color::Black), leaf(5, Color::Black)),
        );
        let source = root.as_ref().unwrap();
        let rotated = rotate(source.derive(), Direction::Left).into_link();
        assert_eq!(collect_pre_order(&rotated), vec![4, 2, 1, 3, 5]);
        assert_eq!(collect_pre_order(&root), vec![2, 1, 4, 3, 5]);

        let rotated = rotated.unwrap();
        let original_three = source.right().unwrap().left().unwrap();
        let moved_three = rotated.left().unwrap().right().unwrap();
        assert!(ReferenceCounter::ptr_eq(original_three, moved_three));
    }

    #[rstest]
    fn test_rotate_without_promotable_child_is_identity() {
        let node = Node::new_red(1);
        let rotated = rotate(node, Direction::Right);
        assert_eq!(*rotated.value(), 1);
        assert!(rotated.left().is_none());
    }

    #[rstest]
    fn test_insert_into_empty_path_is_black_root() {
        let root = insert(AncestorPath::new(), 7).unwrap();
        assert_eq!(root.color(), Color::Black);
        assert_eq!(*root.value(), 7);
    }

    #[rstest]
    fn test_remove_leaf_keeps_source_intact() {
        let root = branch(2, Color::Black, leaf(1, Color::Red), leaf(3, Color::Red));
        let Descent::Found { path, node } = descend(root.as_ref(), &1) else {
            panic!("expected a match");
        };
        let removed = remove(path, node);
        assert_eq!(collect_pre_order(&removed), vec![2, 3]);
        assert_eq!(collect_pre_order(&root), vec![2, 1, 3]);
    }

    #[rstest]
    fn test_remove_two_children_substitutes_successor() {
        let root = branch(2, Color::Black, leaf(1, Color::Red), leaf(3, Color::Red));
        let Descent::Found { path, node } = descend(root.as_ref(), &2) else {
            panic!("expected a match");
        };
        let removed = remove(path, node);
        assert_eq!(collect_pre_order(&removed), vec![3, 1]);
        assert_eq!(removed.unwrap().color(), Color::Black);
    }
}
