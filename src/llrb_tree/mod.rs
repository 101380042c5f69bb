//! Left-leaning red black tree: a self-balancing binary search tree that is an isometry of a 2-3
//! tree, where red links may only lean left.

mod map;
mod node;
mod tree;

pub use self::map::LlrbMap;
