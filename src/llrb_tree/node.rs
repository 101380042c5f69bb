use crate::entry::Entry;
use crate::llrb_tree::tree;
use log::trace;
use std::mem;

/// An enum representing the color of a node in a left-leaning red black tree. The color of a
/// node is the color of the link from its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn flip(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// A struct representing an internal node of a left-leaning red black tree.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub color: Color,
    pub left: tree::Tree<T, U>,
    pub right: tree::Tree<T, U>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U) -> Self {
        Node {
            entry: Entry::new(key, value),
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub fn flip_colors(&mut self) {
        self.color = self.color.flip();
        if let Some(ref mut child) = self.left {
            child.color = child.color.flip();
        }
        if let Some(ref mut child) = self.right {
            child.color = child.color.flip();
        }
    }

    // The rotated subtree keeps the color of the link from its parent, and the demoted node
    // becomes a red child.
    pub fn rotate_left(&mut self) {
        let mut child = self
            .right
            .take()
            .expect("Expected right child node to be `Some`.");
        self.right = child.left.take();
        mem::swap(&mut *child, self);
        self.color = child.color;
        child.color = Color::Red;
        self.left = Some(child);
    }

    pub fn rotate_right(&mut self) {
        let mut child = self
            .left
            .take()
            .expect("Expected left child node to be `Some`.");
        self.left = child.right.take();
        mem::swap(&mut *child, self);
        self.color = child.color;
        child.color = Color::Red;
        self.right = Some(child);
    }

    /// Restores the left-leaning shape of the subtree rooted at this node. Shared by insertion,
    /// removal and minimum removal.
    pub fn fixup(&mut self) {
        if tree::is_red(&self.right) && !tree::is_red(&self.left) {
            trace!("llrb: leaning red link to the left");
            self.rotate_left();
        }

        if tree::is_red(&self.left) && tree::is_red_left(&self.left) {
            trace!("llrb: splitting consecutive left red links");
            self.rotate_right();
        }

        if tree::is_red(&self.left) && tree::is_red(&self.right) {
            trace!("llrb: pushing red link up");
            self.flip_colors();
        }
    }

    /// Makes the left child, or one of its children, red before descending into it by borrowing
    /// from the right sibling.
    pub fn borrow_from_right(&mut self) {
        self.flip_colors();
        let should_rotate = match self.right {
            Some(ref child) => tree::is_red(&child.left),
            None => false,
        };
        if should_rotate {
            trace!("llrb: borrowing node from right sibling");
            if let Some(ref mut child) = self.right {
                child.rotate_right();
            }
            self.rotate_left();
            self.flip_colors();
        }
    }

    /// Makes the right child, or one of its children, red before descending into it by borrowing
    /// from the left sibling.
    pub fn borrow_from_left(&mut self) {
        self.flip_colors();
        if tree::is_red_left(&self.left) {
            trace!("llrb: borrowing node from left sibling");
            self.rotate_right();
            self.flip_colors();
        }
    }
}
