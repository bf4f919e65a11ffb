//! # persistent-rbtree
//!
//! A persistent (immutable, versioned) ordered set backed by a red-black
//! tree.
//!
//! ## Overview
//!
//! Every mutating operation returns a *new* version of the set; all earlier
//! versions stay valid, queryable and unchanged. Unaffected subtrees are
//! shared between versions and only the O(log N) nodes on the path to the
//! touched position are recreated.
//!
//! - **`PersistentRedBlackTree`**: `add`, `delete`, `contains`, `get`,
//!   `min`/`max` and `len`
//! - **Traversal**: lazy in-order, pre-order and post-order iteration
//! - **Explicit outcomes**: duplicate and missing elements are reported as
//!   [`TreeError`](persistent::TreeError) values, never as silent no-ops
//!
//! ## Feature Flags
//!
//! - `arc` (default): share nodes through `Arc`, making tree versions
//!   `Send + Sync`. Without it nodes are shared through `Rc`.
//!
//! ## Example
//!
//! ```rust
//! use persistent_rbtree::prelude::*;
//!
//! let tree = PersistentRedBlackTree::new().add(2)?.add(1)?.add(3)?;
//! let smaller = tree.delete(&2)?;
//!
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert_eq!(smaller.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
//! # Ok::<(), TreeError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use persistent_rbtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
