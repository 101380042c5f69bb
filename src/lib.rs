//! Self-balancing binary search trees exposed as ordered maps.
//!
//! Three engines share the same map interface: `AvlMap` keeps subtree heights within one of each
//! other, `LlrbMap` is a left-leaning red black tree that mirrors a 2-3 tree, and `RedBlackMap` is
//! a classic red black tree whose nodes link back to their parents. Every map can check its own
//! structural invariants through `validate`.

mod arena;
mod entry;
pub mod avl_tree;
pub mod error;
pub mod llrb_tree;
pub mod red_black_tree;

pub use crate::error::{Error, Result};
