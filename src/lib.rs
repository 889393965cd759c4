//! AVL-G trees for Rust.
//!
//! This crate provides [`AvlgTree`], a self-balancing binary search tree whose balance
//! tolerance `G` is chosen at construction time. A classic AVL tree rebalances as soon as the
//! two subtrees of a node differ in height by more than 1; an AVL-G tree waits until they
//! differ by more than `G`:
//!
//! - **`G = 1`** behaves exactly like an AVL tree.
//! - **Larger `G`** performs fewer rotations, so insertions and deletions get cheaper, while
//!   searches may walk a somewhat deeper path.
//!
//! # Example
//!
//! ```
//! use avlg_tree::AvlgTree;
//!
//! let mut tree = AvlgTree::new(1)?;
//! tree.insert(10);
//! tree.insert(20);
//! tree.insert(30);
//!
//! // The third insertion tipped the root over and rotated 20 into its place.
//! assert_eq!(tree.root()?, &20);
//! assert_eq!(tree.height(), 1);
//!
//! // Structural checks, handy in tests.
//! assert!(tree.is_bst());
//! assert!(tree.is_avlg_balanced());
//! # Ok::<(), avlg_tree::Error>(())
//! ```
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to their children by handle; there are no parent links.
//! Insertion and deletion record the path they walk down, then retrace it bottom-up,
//! refreshing cached heights and rotating any node whose balance exceeds `G`.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod avlg_tree;

pub use avlg_tree::AvlgTree;
pub use error::Error;
