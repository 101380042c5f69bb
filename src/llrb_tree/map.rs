use crate::error::{Error, Result};
use crate::llrb_tree::node::Node;
use crate::llrb_tree::tree;
use log::debug;
use std::borrow::Borrow;
use std::ops::{Index, IndexMut};

/// An ordered map implemented using a left-leaning red black tree.
///
/// A left-leaning red black tree is a red black tree in which red links may only lean left. It is
/// an isometry of a 2-3 tree: every red link glues a node to its parent to form a 3-node. New
/// nodes are always inserted red and a single fixup step (lean left, split, flip) is applied on
/// the way back up after both insertions and removals.
///
/// # Examples
///
/// ```
/// use balanced_trees::llrb_tree::LlrbMap;
///
/// let mut map = LlrbMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some((&0, &1)));
/// assert_eq!(map.max(), Some((&3, &4)));
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct LlrbMap<T, U> {
    tree: tree::Tree<T, U>,
    len: usize,
}

impl<T, U> LlrbMap<T, U> {
    /// Constructs a new, empty `LlrbMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::llrb_tree::LlrbMap;
    ///
    /// let map: LlrbMap<u32, u32> = LlrbMap::new();
    /// ```
    pub fn new() -> Self {
        LlrbMap { tree: None, len: 0 }
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, its value is
    /// replaced in place and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::llrb_tree::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some(1));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<U>
    where
        T: Ord,
    {
        let LlrbMap { ref mut tree, ref mut len } = self;
        let ret = tree::insert(tree, Node::new(key, value));
        if ret.is_none() {
            *len += 1;
        }
        ret
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`.
    ///
    /// The key is looked up before any node is touched, so removing a key that does not exist
    /// leaves both the shape and the colors of the tree exactly as they were. The descent itself
    /// repaints and rotates nodes on the way down even when the key turns out to be absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::llrb_tree::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<(T, U)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        if !self.contains_key(key) {
            return None;
        }
        let LlrbMap { ref mut tree, ref mut len } = self;
        tree::remove(tree, key).map(|entry| {
            *len -= 1;
            entry.into_pair()
        })
    }

    /// Removes the entry with the minimum key from the map and returns it. Returns `None` if the
    /// map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::llrb_tree::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
    /// map.insert(3, 3);
    /// map.insert(1, 1);
    /// assert_eq!(map.remove_min(), Some((1, 1)));
    /// assert_eq!(map.remove_min(), Some((3, 3)));
    /// assert_eq!(map.remove_min(), None);
    /// ```
    pub fn remove_min(&mut self) -> Option<(T, U)> {
        let LlrbMap { ref mut tree, ref mut len } = self;
        tree::remove_min(tree).map(|entry| {
            *len -= 1;
            entry.into_pair()
        })
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::llrb_tree::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    pub fn get<V>(&self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get(&self.tree, key).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get_mut(&mut self.tree, key).map(|entry| &mut entry.value)
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::llrb_tree::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing llrb map with {} entries", self.len);
        self.tree = None;
        self.len = 0;
    }

    /// Returns the entry with the minimum key of the map. Returns `None` if the map is empty.
    pub fn min(&self) -> Option<(&T, &U)> {
        tree::min(&self.tree).map(|entry| entry.as_pair())
    }

    /// Returns the entry with the maximum key of the map. Returns `None` if the map is empty.
    pub fn max(&self) -> Option<(&T, &U)> {
        tree::max(&self.tree).map(|entry| entry.as_pair())
    }

    /// Returns the height of the tree, counting both red and black links. An empty map has a
    /// height of `-1`.
    pub fn height(&self) -> isize {
        tree::height(&self.tree)
    }

    /// Checks every structural invariant of the tree: key ordering, the left-leaning shape, the
    /// absence of consecutive red links, a uniform black height, a black root and the cached
    /// length.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::llrb_tree::LlrbMap;
    ///
    /// let mut map = LlrbMap::new();
    /// for key in 0..100 {
    ///     map.insert(key, key);
    /// }
    /// assert!(map.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()>
    where
        T: Ord,
    {
        let actual = tree::validate(&self.tree).map_err(|err| {
            debug!("llrb map failed validation: {}", err);
            err
        })?;
        if actual != self.len {
            return Err(Error::LengthMismatch { expected: self.len, actual });
        }
        Ok(())
    }
}

impl<T, U> Default for LlrbMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, U, V> Index<&'a V> for LlrbMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    type Output = U;

    fn index(&self, key: &V) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, T, U, V> IndexMut<&'a V> for LlrbMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    fn index_mut(&mut self, key: &V) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}

#[cfg(test)]
mod tests {
    use super::LlrbMap;
    use crate::llrb_tree::node::Color;
    use crate::llrb_tree::tree::Tree;

    fn keys(map: &LlrbMap<u32, u32>) -> Vec<u32> {
        fn walk(tree: &Tree<u32, u32>, out: &mut Vec<u32>) {
            if let Some(ref node) = tree {
                walk(&node.left, out);
                out.push(node.entry.key);
                walk(&node.right, out);
            }
        }
        let mut out = Vec::new();
        walk(&map.tree, &mut out);
        out
    }

    #[test]
    fn test_len_empty() {
        let map: LlrbMap<u32, u32> = LlrbMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: LlrbMap<u32, u32> = LlrbMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let map: LlrbMap<u32, u32> = LlrbMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut map = LlrbMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_replace() {
        let mut map = LlrbMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert_eq!(map.insert(1, 3), Some(1));
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut map = LlrbMap::new();
        map.insert(1, 1);
        assert_eq!(map.remove(&1), Some((1, 1)));
        assert!(!map.contains_key(&1));
    }

    #[test]
    fn test_min_max() {
        let mut map = LlrbMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Some((&1, &1)));
        assert_eq!(map.max(), Some((&5, &5)));
    }

    #[test]
    fn test_get_mut() {
        let mut map = LlrbMap::new();
        map.insert(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
    }

    #[test]
    fn test_lean_left_on_ascending_insert() {
        let mut map = LlrbMap::new();
        map.insert(10, 10);
        map.insert(20, 20);
        map.insert(30, 30);

        let root = map.tree.as_ref().unwrap();
        assert_eq!(root.entry.key, 20);
        assert_eq!(root.color, Color::Black);
        let left = root.left.as_ref().unwrap();
        let right = root.right.as_ref().unwrap();
        assert_eq!((left.entry.key, left.color), (10, Color::Black));
        assert_eq!((right.entry.key, right.color), (30, Color::Black));
        assert_eq!(keys(&map), vec![10, 20, 30]);
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_remove_only_key() {
        let mut map = LlrbMap::new();
        map.insert(1, 1);
        assert_eq!(map.remove(&1), Some((1, 1)));
        assert!(map.is_empty());
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_remove_missing_key() {
        let mut map = LlrbMap::new();
        for key in 0..10 {
            map.insert(key, key);
        }
        let before = keys(&map);
        assert_eq!(map.remove(&42), None);
        assert_eq!(keys(&map), before);
        assert_eq!(map.len(), 10);
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_remove_missing_key_keeps_colors() {
        fn shape(tree: &Tree<u32, u32>, out: &mut Vec<(u32, Color)>) {
            if let Some(ref node) = tree {
                out.push((node.entry.key, node.color));
                shape(&node.left, out);
                shape(&node.right, out);
            }
        }

        let mut map = LlrbMap::new();
        for key in (0..64).map(|key| key * 2) {
            map.insert(key, key);
        }
        let mut before = Vec::new();
        shape(&map.tree, &mut before);

        for key in (0..64).map(|key| key * 2 + 1) {
            assert_eq!(map.remove(&key), None);
            let mut after = Vec::new();
            shape(&map.tree, &mut after);
            assert_eq!(after, before);
        }
        assert_eq!(map.len(), 64);
    }

    #[test]
    fn test_remove_min_keeps_invariants() {
        let mut map = LlrbMap::new();
        for key in (0..100).rev() {
            map.insert(key, key);
        }
        for expected in 0..100 {
            assert_eq!(map.remove_min(), Some((expected, expected)));
            assert!(map.validate().is_ok());
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut map = LlrbMap::new();
        for key in 0..10 {
            map.insert(key, key);
        }
        map.clear();
        assert!(map.is_empty());
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_height_bound() {
        let mut map = LlrbMap::new();
        for key in 0..1023 {
            map.insert(key, key);
        }
        // 2 * log2(n + 1)
        assert!(map.height() < 20);
    }
}
