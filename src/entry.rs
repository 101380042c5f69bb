/// A key-value pair stored in a tree node. Entries are ordered by key only.
#[derive(Debug)]
pub struct Entry<T, U> {
    pub key: T,
    pub value: U,
}

impl<T, U> Entry<T, U> {
    pub fn new(key: T, value: U) -> Self {
        Entry { key, value }
    }

    pub fn as_pair(&self) -> (&T, &U) {
        (&self.key, &self.value)
    }

    pub fn into_pair(self) -> (T, U) {
        (self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::Entry;

    #[test]
    fn test_pairs() {
        let entry = Entry::new(1, "one");
        assert_eq!(entry.as_pair(), (&1, &"one"));
        assert_eq!(entry.into_pair(), (1, "one"));
    }
}
