use std::error;
use std::fmt;
use std::result;

/// Convenience `Error` enum describing the first structural invariant a tree was found to
/// violate by `validate`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// An in-order traversal yielded a key that is not strictly greater than its predecessor.
    OutOfOrder,
    /// A node's subtree heights differ by more than one.
    Unbalanced,
    /// A node's cached height disagrees with the heights of its subtrees.
    StaleHeight,
    /// A red link leans right in a left-leaning red-black tree.
    RedRightChild,
    /// A red node has a red child.
    DoubleRed,
    /// Two root-to-leaf paths pass through a different number of black nodes.
    BlackHeightMismatch,
    /// The root of a red-black tree is red.
    RedRoot,
    /// A node's parent link does not name the node that holds it as a child.
    BrokenParentLink,
    /// The cached length disagrees with the number of reachable nodes.
    LengthMismatch { expected: usize, actual: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OutOfOrder => write!(f, "keys are not in strictly increasing order"),
            Error::Unbalanced => write!(f, "balance factor out of range"),
            Error::StaleHeight => write!(f, "cached height does not match subtree heights"),
            Error::RedRightChild => write!(f, "red link leans right"),
            Error::DoubleRed => write!(f, "red node has a red child"),
            Error::BlackHeightMismatch => write!(f, "black height is not uniform"),
            Error::RedRoot => write!(f, "root is red"),
            Error::BrokenParentLink => write!(f, "parent link does not match child link"),
            Error::LengthMismatch { expected, actual } => write!(
                f,
                "length is {} but {} nodes are reachable",
                expected, actual,
            ),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_display() {
        assert_eq!(Error::RedRoot.to_string(), "root is red");
        assert_eq!(
            Error::LengthMismatch { expected: 3, actual: 2 }.to_string(),
            "length is 3 but 2 nodes are reachable",
        );
    }
}
