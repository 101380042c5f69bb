use crate::avl_tree::node::Node;
use crate::entry::Entry;
use crate::error::{Error, Result};
use log::trace;
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

pub type Tree<T, U> = Option<Box<Node<T, U>>>;

pub fn height<T, U>(tree: &Tree<T, U>) -> isize {
    match tree {
        None => -1,
        Some(ref node) => node.height,
    }
}

fn rotate_left<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    let mut child = match node.right.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.right = child.left.take();
    node.update();
    child.left = Some(node);
    child.update();
    child
}

fn rotate_right<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    let mut child = match node.left.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.left = child.right.take();
    node.update();
    child.right = Some(node);
    child.update();
    child
}

// Recomputes the height of the subtree root and restores the balance factor with at most two
// rotations. A child with a balance factor of zero is always handled by a single rotation.
fn balance<T, U>(tree: &mut Tree<T, U>) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update();

    if node.balance() > 1 {
        if let Some(child) = node.left.take() {
            if child.balance() < 0 {
                trace!("avl: left-right rotation at height {}", node.height);
                node.left = Some(rotate_left(child));
            } else {
                trace!("avl: right rotation at height {}", node.height);
                node.left = Some(child);
            }
        }
        node = rotate_right(node);
    } else if node.balance() < -1 {
        if let Some(child) = node.right.take() {
            if child.balance() > 0 {
                trace!("avl: right-left rotation at height {}", node.height);
                node.right = Some(rotate_right(child));
            } else {
                trace!("avl: left rotation at height {}", node.height);
                node.right = Some(child);
            }
        }
        node = rotate_left(node);
    }

    *tree = Some(node);
}

// precondition: the tree is non-empty
fn remove_min<T, U>(tree: &mut Tree<T, U>) -> Box<Node<T, U>> {
    if let Some(ref mut node) = tree {
        if node.left.is_some() {
            let ret = remove_min(&mut node.left);
            balance(tree);
            return ret;
        }
    }

    let mut node = tree.take().expect("Expected a non-empty tree.");
    *tree = node.right.take();
    node
}

// precondition: the tree is non-empty
fn remove_max<T, U>(tree: &mut Tree<T, U>) -> Box<Node<T, U>> {
    if let Some(ref mut node) = tree {
        if node.right.is_some() {
            let ret = remove_max(&mut node.right);
            balance(tree);
            return ret;
        }
    }

    let mut node = tree.take().expect("Expected a non-empty tree.");
    *tree = node.left.take();
    node
}

pub fn insert<T, U>(tree: &mut Tree<T, U>, new_node: Node<T, U>) -> Option<U>
where
    T: Ord,
{
    let ret = match tree {
        Some(ref mut node) => match new_node.entry.key.cmp(&node.entry.key) {
            Ordering::Less => insert(&mut node.left, new_node),
            Ordering::Greater => insert(&mut node.right, new_node),
            Ordering::Equal => {
                return Some(mem::replace(&mut node.entry.value, new_node.entry.value));
            },
        },
        None => {
            *tree = Some(Box::new(new_node));
            return None;
        },
    };

    balance(tree);
    ret
}

pub fn remove<T, U, V>(tree: &mut Tree<T, U>, key: &V) -> Option<Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let ret = match tree.take() {
        Some(mut node) => match key.cmp(node.entry.key.borrow()) {
            Ordering::Less => {
                let ret = remove(&mut node.left, key);
                *tree = Some(node);
                ret
            },
            Ordering::Greater => {
                let ret = remove(&mut node.right, key);
                *tree = Some(node);
                ret
            },
            Ordering::Equal => {
                if node.left.is_some() && node.right.is_some() {
                    // ties go to the in-order predecessor
                    let replacement = if height(&node.left) >= height(&node.right) {
                        remove_max(&mut node.left)
                    } else {
                        remove_min(&mut node.right)
                    };
                    let Node { entry, .. } = *replacement;
                    let ret = mem::replace(&mut node.entry, entry);
                    *tree = Some(node);
                    Some(ret)
                } else {
                    let Node { entry, left, right, .. } = *node;
                    *tree = left.or(right);
                    Some(entry)
                }
            },
        },
        None => return None,
    };

    balance(tree);
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

fn check<'a, T, U>(
    tree: &'a Tree<T, U>,
    lower: Option<&'a T>,
    upper: Option<&'a T>,
    count: &mut usize,
) -> Result<isize>
where
    T: Ord,
{
    let node = match tree {
        Some(ref node) => node,
        None => return Ok(-1),
    };

    let key = &node.entry.key;
    if lower.map_or(false, |lower| lower >= key) || upper.map_or(false, |upper| upper <= key) {
        return Err(Error::OutOfOrder);
    }

    let left_height = check(&node.left, lower, Some(key), count)?;
    let right_height = check(&node.right, Some(key), upper, count)?;
    *count += 1;

    if (left_height - right_height).abs() > 1 {
        return Err(Error::Unbalanced);
    }
    if node.height != cmp::max(left_height, right_height) + 1 {
        return Err(Error::StaleHeight);
    }
    Ok(node.height)
}

/// Checks ordering, balance factors and cached heights. Returns the number of reachable nodes.
pub fn validate<T, U>(tree: &Tree<T, U>) -> Result<usize>
where
    T: Ord,
{
    let mut count = 0;
    check(tree, None, None, &mut count)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::{height, insert, remove, remove_max, remove_min, validate, Tree};
    use crate::avl_tree::node::Node;

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

    #[test]
    fn test_height_empty() {
        let tree: Tree<u32, u32> = None;
        assert_eq!(height(&tree), -1);
        assert_eq!(height(&build(&[1])), 0);
    }

    #[test]
    fn test_right_right_rotation() {
        let tree = build(&[1, 2, 3]);
        let root = tree.as_ref().unwrap();
        assert_eq!(root.entry.key, 2);
        assert_eq!(root.height, 1);
        assert_eq!(validate(&tree), Ok(3));
    }

    #[test]
    fn test_left_right_rotation() {
        let tree = build(&[3, 1, 2]);
        assert_eq!(tree.as_ref().unwrap().entry.key, 2);
        assert_eq!(validate(&tree), Ok(3));
    }

    #[test]
    fn test_right_left_rotation() {
        let tree = build(&[1, 3, 2]);
        assert_eq!(tree.as_ref().unwrap().entry.key, 2);
        assert_eq!(validate(&tree), Ok(3));
    }

    #[test]
    fn test_remove_tie_takes_predecessor() {
        let mut tree = build(&[2, 1, 3]);
        assert_eq!(remove(&mut tree, &2).map(|entry| entry.key), Some(2));
        assert_eq!(tree.as_ref().unwrap().entry.key, 1);
        assert_eq!(validate(&tree), Ok(2));
    }

    #[test]
    fn test_remove_taller_right_takes_successor() {
        let mut tree = build(&[2, 1, 3, 4]);
        assert_eq!(remove(&mut tree, &2).map(|entry| entry.key), Some(2));
        assert_eq!(tree.as_ref().unwrap().entry.key, 3);
        assert_eq!(validate(&tree), Ok(3));
    }

    #[test]
    fn test_spliced_replacement_is_detached() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let node = remove_max(&mut tree.as_mut().unwrap().left);
        assert_eq!(node.entry.key, 3);
        assert!(node.left.is_none() && node.right.is_none());

        let node = remove_min(&mut tree.as_mut().unwrap().right);
        assert_eq!(node.entry.key, 5);
        assert!(node.left.is_none() && node.right.is_none());

        let mut actual = Vec::new();
        keys(&tree, &mut actual);
        assert_eq!(actual, vec![1, 2, 4, 6, 7]);
    }

    #[test]
    fn test_remove_leaves_even_child_single_rotation() {
        let mut tree = build(&[2, 1, 4, 3, 5]);
        assert_eq!(tree.as_ref().unwrap().right.as_ref().unwrap().balance(), 0);

        assert_eq!(remove(&mut tree, &1).map(|entry| entry.key), Some(1));
        let root = tree.as_ref().unwrap();
        assert_eq!(root.entry.key, 4);
        assert_eq!(root.height, 2);

        let left = root.left.as_ref().unwrap();
        assert_eq!(left.entry.key, 2);
        assert_eq!(left.right.as_ref().map(|node| node.entry.key), Some(3));
        assert_eq!(root.right.as_ref().map(|node| node.entry.key), Some(5));
        assert_eq!(validate(&tree), Ok(4));
    }

    #[test]
    fn test_remove_rebalances() {
        let mut tree = build(&(0..64).collect::<Vec<u32>>());
        for key in (0..64).step_by(2) {
            assert!(remove(&mut tree, &key).is_some());
            assert!(validate(&tree).is_ok());
        }
        let mut actual = Vec::new();
        keys(&tree, &mut actual);
        assert_eq!(actual, (1..64).step_by(2).collect::<Vec<u32>>());
    }
}
