use crate::arena::{Arena, NodeId};
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::red_black_tree::node::{Color, Node};
use log::trace;
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

/// A red black tree whose nodes live in an arena and link to their parents, so that fix-ups can
/// walk upwards iteratively.
pub struct Tree<T, U> {
    arena: Arena<Node<T, U>>,
    root: Option<NodeId>,
}

impl<T, U> Tree<T, U> {
    pub fn new() -> Self {
        Tree {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        match id {
            None => false,
            Some(id) => self.arena[id].color == Color::Red,
        }
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.arena[id].color = color;
    }

    fn paint_root_black(&mut self) {
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    // Points the slot of `parent` that referenced `old` at `new`, or the root if there is no
    // parent. Does not touch the parent link of `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = &mut self.arena[parent];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            },
        }
    }

    // Returns the node that takes the place of `id`.
    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        trace!("red black: rotating left");
        let new_root = self.arena[id]
            .right
            .expect("Expected right child node to be `Some`.");
        let inner = self.arena[new_root].left;
        self.arena[id].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(id);
        }

        let parent = self.arena[id].parent;
        self.replace_child(parent, id, Some(new_root));
        self.arena[new_root].parent = parent;
        self.arena[new_root].left = Some(id);
        self.arena[id].parent = Some(new_root);
        new_root
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        trace!("red black: rotating right");
        let new_root = self.arena[id]
            .left
            .expect("Expected left child node to be `Some`.");
        let inner = self.arena[new_root].right;
        self.arena[id].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(id);
        }

        let parent = self.arena[id].parent;
        self.replace_child(parent, id, Some(new_root));
        self.arena[new_root].parent = parent;
        self.arena[new_root].right = Some(id);
        self.arena[id].parent = Some(new_root);
        new_root
    }

    fn min_node(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.arena[id].left {
            id = left;
        }
        id
    }

    fn max_node(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.arena[id].right {
            id = right;
        }
        id
    }

    fn find<V>(&self, key: &V) -> Option<NodeId>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    pub fn insert(&mut self, key: T, value: U) -> Option<U>
    where
        T: Ord,
    {
        let mut parent = None;
        let mut curr = self.root;
        let mut ordering = Ordering::Equal;
        while let Some(id) = curr {
            parent = curr;
            ordering = key.cmp(&self.arena[id].entry.key);
            curr = match ordering {
                Ordering::Less => self.arena[id].left,
                Ordering::Greater => self.arena[id].right,
                Ordering::Equal => {
                    return Some(mem::replace(&mut self.arena[id].entry.value, value));
                },
            };
        }

        let id = self.arena.allocate(Node::new(key, value, parent));
        match parent {
            None => self.root = Some(id),
            Some(parent) => {
                if ordering == Ordering::Less {
                    self.arena[parent].left = Some(id);
                } else {
                    self.arena[parent].right = Some(id);
                }
                self.fix_insertion(id);
            },
        }
        self.paint_root_black();
        None
    }

    fn red_parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id]
            .parent
            .filter(|parent| self.arena[*parent].color == Color::Red)
    }

    fn fix_insertion(&mut self, mut id: NodeId) {
        while let Some(parent) = self.red_parent(id) {
            // a red parent is never the root
            let grandparent = self.arena[parent]
                .parent
                .expect("Expected red node to have a parent.");
            self.set_color(grandparent, Color::Red);

            if self.arena[grandparent].left == Some(parent) {
                let uncle = self.arena[grandparent].right;
                match uncle {
                    Some(uncle) if self.is_red(Some(uncle)) => {
                        trace!("red black: recoloring red uncle");
                        self.set_color(parent, Color::Black);
                        self.set_color(uncle, Color::Black);
                        id = grandparent;
                    },
                    _ => {
                        if self.arena[parent].right == Some(id) {
                            self.rotate_left(parent);
                            id = parent;
                        }
                        let subtree = self.rotate_right(grandparent);
                        self.set_color(subtree, Color::Black);
                    },
                }
            } else {
                let uncle = self.arena[grandparent].left;
                match uncle {
                    Some(uncle) if self.is_red(Some(uncle)) => {
                        trace!("red black: recoloring red uncle");
                        self.set_color(parent, Color::Black);
                        self.set_color(uncle, Color::Black);
                        id = grandparent;
                    },
                    _ => {
                        if self.arena[parent].left == Some(id) {
                            self.rotate_right(parent);
                            id = parent;
                        }
                        let subtree = self.rotate_left(grandparent);
                        self.set_color(subtree, Color::Black);
                    },
                }
            }
        }
    }

    pub fn remove<V>(&mut self, key: &V) -> Option<Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut target = self.find(key)?;

        // Two children: the successor's entry moves into the target, and the successor, which
        // has no left child, is removed instead.
        if let (Some(_), Some(right)) = (self.arena[target].left, self.arena[target].right) {
            let successor = self.min_node(right);
            let (target_node, successor_node) = self.arena.pair_mut(target, successor);
            mem::swap(&mut target_node.entry, &mut successor_node.entry);
            target = successor;
        }

        let child = self.arena[target].left.or(self.arena[target].right);
        let parent = self.arena[target].parent;
        match child {
            Some(child) => {
                self.arena[child].parent = parent;
                self.replace_child(parent, target, Some(child));
                self.set_color(child, Color::Black);
            },
            None => {
                if parent.is_some() && self.arena[target].color == Color::Black {
                    self.fix_deletion(target);
                }
                let parent = self.arena[target].parent;
                self.replace_child(parent, target, None);
            },
        }

        let Node { entry, .. } = self.arena.free(target);
        Some(entry)
    }

    // `id` is a black node that is about to lose one black from every path through it.
    fn fix_deletion(&mut self, mut id: NodeId) {
        while let Some(parent) = self.arena[id].parent {
            if self.is_red(Some(id)) {
                break;
            }

            if self.arena[parent].left == Some(id) {
                let mut sibling = self.sibling(parent, self.arena[parent].right);
                if self.is_red(Some(sibling)) {
                    trace!("red black: rotating red sibling");
                    self.set_color(parent, Color::Red);
                    self.set_color(sibling, Color::Black);
                    self.rotate_left(parent);
                    sibling = self.sibling(parent, self.arena[parent].right);
                }

                if !self.is_red(self.arena[sibling].right) {
                    self.set_color(sibling, Color::Red);
                    if !self.is_red(self.arena[sibling].left) {
                        trace!("red black: pushing deficiency up");
                        id = parent;
                        continue;
                    }
                    let nephew = self.arena[sibling]
                        .left
                        .expect("Expected red nephew to be `Some`.");
                    self.set_color(nephew, Color::Black);
                    sibling = self.rotate_right(sibling);
                }

                let color = self.arena[parent].color;
                self.set_color(sibling, color);
                self.set_color(parent, Color::Black);
                let nephew = self.arena[sibling]
                    .right
                    .expect("Expected red nephew to be `Some`.");
                self.set_color(nephew, Color::Black);
                self.rotate_left(parent);
            } else {
                let mut sibling = self.sibling(parent, self.arena[parent].left);
                if self.is_red(Some(sibling)) {
                    trace!("red black: rotating red sibling");
                    self.set_color(parent, Color::Red);
                    self.set_color(sibling, Color::Black);
                    self.rotate_right(parent);
                    sibling = self.sibling(parent, self.arena[parent].left);
                }

                if !self.is_red(self.arena[sibling].left) {
                    self.set_color(sibling, Color::Red);
                    if !self.is_red(self.arena[sibling].right) {
                        trace!("red black: pushing deficiency up");
                        id = parent;
                        continue;
                    }
                    let nephew = self.arena[sibling]
                        .right
                        .expect("Expected red nephew to be `Some`.");
                    self.set_color(nephew, Color::Black);
                    sibling = self.rotate_left(sibling);
                }

                let color = self.arena[parent].color;
                self.set_color(sibling, color);
                self.set_color(parent, Color::Black);
                let nephew = self.arena[sibling]
                    .left
                    .expect("Expected red nephew to be `Some`.");
                self.set_color(nephew, Color::Black);
                self.rotate_right(parent);
            }
            // the rotation absorbed the missing black
            self.paint_root_black();
            return;
        }
        self.set_color(id, Color::Black);
    }

    // A black non-root node always has a sibling, since both sides of its parent carry at least
    // one black node.
    fn sibling(&self, parent: NodeId, sibling: Option<NodeId>) -> NodeId {
        match sibling {
            Some(sibling) => sibling,
            None => unreachable!("node {:?} is missing a child on the sibling side", parent),
        }
    }

    pub fn get<V>(&self, key: &V) -> Option<&Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.arena[id].entry)
    }

    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self.find(key) {
            Some(id) => Some(&mut self.arena[id].entry),
            None => None,
        }
    }

    pub fn min(&self) -> Option<&Entry<T, U>> {
        self.root.map(|root| &self.arena[self.min_node(root)].entry)
    }

    pub fn max(&self) -> Option<&Entry<T, U>> {
        self.root.map(|root| &self.arena[self.max_node(root)].entry)
    }

    fn subtree_height(&self, id: Option<NodeId>) -> isize {
        match id {
            None => -1,
            Some(id) => {
                let node = &self.arena[id];
                cmp::max(self.subtree_height(node.left), self.subtree_height(node.right)) + 1
            },
        }
    }

    pub fn height(&self) -> isize {
        self.subtree_height(self.root)
    }

    // Returns the number of black nodes on every path from `id` down to a leaf.
    fn check<'a>(
        &'a self,
        id: Option<NodeId>,
        parent: Option<NodeId>,
        lower: Option<&'a T>,
        upper: Option<&'a T>,
        count: &mut usize,
    ) -> Result<usize>
    where
        T: Ord,
    {
        let id = match id {
            Some(id) => id,
            None => return Ok(0),
        };
        let node = &self.arena[id];

        if node.parent != parent {
            return Err(Error::BrokenParentLink);
        }
        let key = &node.entry.key;
        if lower.map_or(false, |lower| lower >= key) || upper.map_or(false, |upper| upper <= key) {
            return Err(Error::OutOfOrder);
        }
        if node.color == Color::Red && (self.is_red(node.left) || self.is_red(node.right)) {
            return Err(Error::DoubleRed);
        }

        let left_black_height = self.check(node.left, Some(id), lower, Some(key), count)?;
        let right_black_height = self.check(node.right, Some(id), Some(key), upper, count)?;
        if left_black_height != right_black_height {
            return Err(Error::BlackHeightMismatch);
        }
        *count += 1;

        match node.color {
            Color::Red => Ok(left_black_height),
            Color::Black => Ok(left_black_height + 1),
        }
    }

    /// Checks ordering, parent links, the absence of consecutive red nodes and the black height.
    /// Returns the number of reachable nodes, which must match the number of nodes in the arena.
    pub fn validate(&self) -> Result<usize>
    where
        T: Ord,
    {
        if self.is_red(self.root) {
            return Err(Error::RedRoot);
        }
        let mut count = 0;
        self.check(self.root, None, None, None, &mut count)?;
        if count != self.arena.len() {
            return Err(Error::LengthMismatch {
                expected: self.arena.len(),
                actual: count,
            });
        }
        Ok(count)
    }
}
