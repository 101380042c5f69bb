use crate::arena::NodeId;
use crate::entry::Entry;

/// An enum representing the color of a node in a red black tree. Absent children count as black.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// A struct representing an internal node of a red black tree. Child and parent links are handles
/// into the arena that owns every node of the tree; the parent link never owns anything.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub color: Color,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U, parent: Option<NodeId>) -> Self {
        Node {
            entry: Entry::new(key, value),
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }
}
