use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::llrb_tree::node::{Color, Node};
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

pub type Tree<T, U> = Option<Box<Node<T, U>>>;

pub fn is_red<T, U>(tree: &Tree<T, U>) -> bool {
    match tree {
        None => false,
        Some(ref node) => node.is_red(),
    }
}

/// Returns `true` if the root of the tree has a red left child.
pub fn is_red_left<T, U>(tree: &Tree<T, U>) -> bool {
    match tree {
        None => false,
        Some(ref node) => is_red(&node.left),
    }
}

fn paint_root_black<T, U>(tree: &mut Tree<T, U>) {
    if let Some(ref mut node) = tree {
        node.color = Color::Black;
    }
}

// A black root with two black children is painted red so that the first borrow on the way down
// has a red link to work with.
fn fix_root<T, U>(tree: &mut Tree<T, U>) {
    if let Some(ref mut node) = tree {
        if !is_red(&node.left) && !is_red(&node.right) {
            node.color = Color::Red;
        }
    }
}

fn insert_node<T, U>(tree: &mut Tree<T, U>, new_node: Node<T, U>) -> Option<U>
where
    T: Ord,
{
    let ret = match tree {
        Some(ref mut node) => match new_node.entry.key.cmp(&node.entry.key) {
            Ordering::Less => insert_node(&mut node.left, new_node),
            Ordering::Greater => insert_node(&mut node.right, new_node),
            Ordering::Equal => {
                return Some(mem::replace(&mut node.entry.value, new_node.entry.value));
            },
        },
        None => {
            *tree = Some(Box::new(new_node));
            return None;
        },
    };

    if let Some(ref mut node) = tree {
        node.fixup();
    }
    ret
}

pub fn insert<T, U>(tree: &mut Tree<T, U>, new_node: Node<T, U>) -> Option<U>
where
    T: Ord,
{
    let ret = insert_node(tree, new_node);
    paint_root_black(tree);
    ret
}

// precondition: the tree is non-empty
fn remove_min_node<T, U>(tree: &mut Tree<T, U>) -> Box<Node<T, U>> {
    let mut node = tree.take().expect("Expected a non-empty tree.");
    if node.left.is_none() {
        *tree = node.right.take();
        return node;
    }

    if !is_red(&node.left) && !is_red_left(&node.left) {
        node.borrow_from_right();
    }

    let ret = remove_min_node(&mut node.left);
    node.fixup();
    *tree = Some(node);
    ret
}

pub fn remove_min<T, U>(tree: &mut Tree<T, U>) -> Option<Entry<T, U>> {
    if tree.is_none() {
        return None;
    }
    fix_root(tree);
    let node = remove_min_node(tree);
    paint_root_black(tree);
    let Node { entry, .. } = *node;
    Some(entry)
}

fn remove_node<T, U, V>(tree: &mut Tree<T, U>, key: &V) -> Option<Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let mut node = match tree.take() {
        Some(node) => node,
        None => return None,
    };

    let ret = if key.cmp(node.entry.key.borrow()) == Ordering::Less {
        if node.left.is_none() {
            *tree = Some(node);
            return None;
        }
        if !is_red(&node.left) && !is_red_left(&node.left) {
            node.borrow_from_right();
        }
        remove_node(&mut node.left, key)
    } else {
        if is_red(&node.left) {
            node.rotate_right();
        }

        if node.right.is_none() {
            if key.cmp(node.entry.key.borrow()) == Ordering::Equal {
                let Node { entry, left, .. } = *node;
                *tree = left;
                return Some(entry);
            }
            *tree = Some(node);
            return None;
        }

        if !is_red(&node.right) && !is_red_left(&node.right) {
            node.borrow_from_left();
        }

        if key.cmp(node.entry.key.borrow()) == Ordering::Equal {
            let successor = remove_min_node(&mut node.right);
            let Node { entry, .. } = *successor;
            Some(mem::replace(&mut node.entry, entry))
        } else {
            remove_node(&mut node.right, key)
        }
    };

    node.fixup();
    *tree = Some(node);
    ret
}

pub fn remove<T, U, V>(tree: &mut Tree<T, U>, key: &V) -> Option<Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    if tree.is_none() {
        return None;
    }
    fix_root(tree);
    let ret = remove_node(tree, key);
    paint_root_black(tree);
    ret
}

pub fn get<'a, T, U, V>(tree: &'a Tree<T, U>, key: &V) -> Option<&'a Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let mut curr = tree;
    while let Some(ref node) = curr {
        match key.cmp(node.entry.key.borrow()) {
            Ordering::Less => curr = &node.left,
            Ordering::Greater => curr = &node.right,
            Ordering::Equal => return Some(&node.entry),
        }
    }
    None
}

pub fn get_mut<'a, T, U, V>(tree: &'a mut Tree<T, U>, key: &V) -> Option<&'a mut Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    tree.as_mut().and_then(|node| match key.cmp(node.entry.key.borrow()) {
        Ordering::Less => get_mut(&mut node.left, key),
        Ordering::Greater => get_mut(&mut node.right, key),
        Ordering::Equal => Some(&mut node.entry),
    })
}

pub fn min<T, U>(tree: &Tree<T, U>) -> Option<&Entry<T, U>> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref left_node) = curr.left {
            curr = left_node;
        }
        &curr.entry
    })
}

pub fn max<T, U>(tree: &Tree<T, U>) -> Option<&Entry<T, U>> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref right_node) = curr.right {
            curr = right_node;
        }
        &curr.entry
    })
}

pub fn height<T, U>(tree: &Tree<T, U>) -> isize {
    match tree {
        None => -1,
        Some(ref node) => cmp::max(height(&node.left), height(&node.right)) + 1,
    }
}

// Returns the number of black nodes on every path from the root of the tree down to a leaf.
fn check<'a, T, U>(
    tree: &'a Tree<T, U>,
    lower: Option<&'a T>,
    upper: Option<&'a T>,
    count: &mut usize,
) -> Result<usize>
where
    T: Ord,
{
    let node = match tree {
        Some(ref node) => node,
        None => return Ok(0),
    };

    let key = &node.entry.key;
    if lower.map_or(false, |lower| lower >= key) || upper.map_or(false, |upper| upper <= key) {
        return Err(Error::OutOfOrder);
    }
    if is_red(&node.right) {
        return Err(Error::RedRightChild);
    }
    if node.is_red() && is_red(&node.left) {
        return Err(Error::DoubleRed);
    }

    let left_black_height = check(&node.left, lower, Some(key), count)?;
    let right_black_height = check(&node.right, Some(key), upper, count)?;
    if left_black_height != right_black_height {
        return Err(Error::BlackHeightMismatch);
    }
    *count += 1;

    match node.color {
        Color::Red => Ok(left_black_height),
        Color::Black => Ok(left_black_height + 1),
    }
}

/// Checks ordering, the left-leaning shape, the absence of consecutive red links and the black
/// height. Returns the number of reachable nodes.
pub fn validate<T, U>(tree: &Tree<T, U>) -> Result<usize>
where
    T: Ord,
{
    if is_red(tree) {
        return Err(Error::RedRoot);
    }
    let mut count = 0;
    check(tree, None, None, &mut count)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::{insert, remove, remove_min, remove_min_node, validate, Tree};
    use crate::llrb_tree::node::{Color, Node};

    fn build(keys: &[u32]) -> Tree<u32, u32> {
        let mut tree = None;
        for &key in keys {
            insert(&mut tree, Node::new(key, key));
        }
        tree
    }

    fn keys(tree: &Tree<u32, u32>, out: &mut Vec<u32>) {
        if let Some(ref node) = tree {
            keys(&node.left, out);
            out.push(node.entry.key);
            keys(&node.right, out);
        }
    }

    fn black(key: u32) -> Box<Node<u32, u32>> {
        let mut node = Box::new(Node::new(key, key));
        node.color = Color::Black;
        node
    }

    #[test]
    fn test_fixup_leans_left() {
        let mut node = black(1);
        node.right = Some(Box::new(Node::new(2, 2)));
        node.fixup();
        assert_eq!(node.entry.key, 2);
        assert_eq!(node.color, Color::Black);
        assert_eq!(node.left.as_ref().map(|child| child.color), Some(Color::Red));
        assert!(node.right.is_none());
    }

    #[test]
    fn test_fixup_splits_four_node() {
        let mut left = Box::new(Node::new(2, 2));
        left.left = Some(Box::new(Node::new(1, 1)));
        let mut node = black(3);
        node.left = Some(left);
        node.fixup();

        assert_eq!(node.entry.key, 2);
        assert_eq!(node.color, Color::Red);
        assert_eq!(node.left.as_ref().map(|child| child.color), Some(Color::Black));
        assert_eq!(node.right.as_ref().map(|child| child.color), Some(Color::Black));
    }

    #[test]
    fn test_insert_ascending() {
        let tree = build(&[10, 20, 30]);
        let root = tree.as_ref().unwrap();
        assert_eq!(root.entry.key, 20);
        assert_eq!(root.color, Color::Black);
        assert_eq!(validate(&tree), Ok(3));
    }

    #[test]
    fn test_remove_min() {
        let mut tree = build(&(0..32).collect::<Vec<u32>>());
        for expected in 0..32 {
            assert_eq!(remove_min(&mut tree).map(|entry| entry.key), Some(expected));
            assert_eq!(validate(&tree), Ok(31 - expected as usize));
        }
        assert!(tree.is_none());
        assert!(remove_min(&mut tree).is_none());
    }

    #[test]
    fn test_remove_min_node_is_detached() {
        let mut tree = build(&(0..15).collect::<Vec<u32>>());
        let node = remove_min_node(&mut tree);
        assert_eq!(node.entry.key, 0);
        assert!(node.left.is_none() && node.right.is_none());

        let mut actual = Vec::new();
        keys(&tree, &mut actual);
        assert_eq!(actual, (1..15).collect::<Vec<u32>>());
    }

    #[test]
    fn test_remove_two_children_uses_successor() {
        let mut tree = build(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(remove(&mut tree, &4).map(|entry| entry.key), Some(4));
        assert!(validate(&tree).is_ok());
        let mut actual = Vec::new();
        keys(&tree, &mut actual);
        assert_eq!(actual, vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_remove_descending() {
        let mut tree = build(&(0..50).collect::<Vec<u32>>());
        for key in (0..50).rev() {
            assert_eq!(remove(&mut tree, &key).map(|entry| entry.value), Some(key));
            assert!(validate(&tree).is_ok());
        }
        assert!(tree.is_none());
    }
}
