use core::borrow::Borrow;
use core::fmt;

use crate::error::Error;
use crate::raw::RawAvlgTree;

/// A binary search tree that keeps every node's subtree heights within a configurable
/// tolerance `G` of each other.
///
/// With `G = 1` this is a classic AVL tree. Larger values of `G` allow more skew before a
/// rotation fires, trading slower searches for cheaper insertions and deletions. Heights stay
/// logarithmic in the number of keys for any fixed `G`.
///
/// Keys equal to an existing node are placed in its right subtree, but storing duplicates is
/// not supported: it is a logic error to [`insert`](AvlgTree::insert) a key that is already
/// present. The resulting behavior is not specified, but will not be undefined behavior.
///
/// It is likewise a logic error for a key to be modified in such a way that its ordering
/// relative to any other key changes while it is in the tree.
///
/// # Examples
///
/// ```
/// use avlg_tree::AvlgTree;
///
/// let mut tree = AvlgTree::new(2)?;
/// for key in [40, 10, 30, 20, 50] {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.search(&30)?, Some(&30));
/// assert_eq!(tree.delete(&10)?, Some(10));
/// assert_eq!(tree.search(&10)?, None);
/// assert!(tree.is_bst());
/// assert!(tree.is_avlg_balanced());
/// # Ok::<(), avlg_tree::Error>(())
/// ```
#[derive(Clone)]
pub struct AvlgTree<K> {
    raw: RawAvlgTree<K>,
}

impl<K> AvlgTree<K> {
    /// Creates an empty tree that tolerates a height difference of up to `max_imbalance`
    /// between the two subtrees of any node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBalance`] if `max_imbalance` is smaller than 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::{AvlgTree, Error};
    ///
    /// let tree: AvlgTree<u32> = AvlgTree::new(1).unwrap();
    /// assert!(tree.is_empty());
    ///
    /// assert_eq!(AvlgTree::<u32>::new(0).unwrap_err(), Error::InvalidBalance(0));
    /// ```
    pub fn new(max_imbalance: i32) -> Result<Self, Error> {
        Self::check_balance(max_imbalance)?;
        Ok(Self {
            raw: RawAvlgTree::new(max_imbalance),
        })
    }

    /// Creates an empty tree with room for at least `capacity` keys before reallocating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBalance`] if `max_imbalance` is smaller than 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTree;
    ///
    /// let tree: AvlgTree<i64> = AvlgTree::with_capacity(3, 64).unwrap();
    /// assert!(tree.capacity() >= 64);
    /// assert_eq!(tree.max_imbalance(), 3);
    /// ```
    pub fn with_capacity(max_imbalance: i32, capacity: usize) -> Result<Self, Error> {
        Self::check_balance(max_imbalance)?;
        Ok(Self {
            raw: RawAvlgTree::with_capacity(max_imbalance, capacity),
        })
    }

    fn check_balance(max_imbalance: i32) -> Result<(), Error> {
        if max_imbalance < 1 {
            return Err(Error::InvalidBalance(max_imbalance));
        }
        Ok(())
    }

    /// Returns the number of keys the tree can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the tolerance `G` the tree was created with.
    #[must_use]
    pub const fn max_imbalance(&self) -> i32 {
        self.raw.max_imbalance()
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTree;
    ///
    /// let mut tree = AvlgTree::new(1).unwrap();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert('a');
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the tree: -1 when empty, 0 for a single key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTree;
    ///
    /// let mut tree = AvlgTree::new(1).unwrap();
    /// assert_eq!(tree.height(), -1);
    /// tree.extend([10, 20, 30]);
    /// assert_eq!(tree.height(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1); the height is cached at every node.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.raw.height()
    }

    /// Returns the key stored at the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTree`] if the tree holds no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::{AvlgTree, Error};
    ///
    /// let mut tree = AvlgTree::new(1).unwrap();
    /// assert_eq!(tree.root(), Err(Error::EmptyTree));
    ///
    /// tree.extend([10, 20, 30]);
    /// assert_eq!(tree.root(), Ok(&20));
    /// ```
    pub fn root(&self) -> Result<&K, Error> {
        self.raw.root_key().ok_or(Error::EmptyTree)
    }

    /// Removes every key, leaving an empty tree with the same tolerance.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns `true` if no node's subtree heights differ by more than
    /// [`max_imbalance`](Self::max_imbalance). Heights are recomputed, not read from cache.
    ///
    /// Trivially `true` for empty and single-key trees.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn is_avlg_balanced(&self) -> bool {
        self.raw.is_balanced()
    }

    /// Returns `true` if every node's cached height equals the height of its subtree.
    #[must_use]
    pub fn has_consistent_heights(&self) -> bool {
        self.raw.has_consistent_heights()
    }
}

impl<K: Ord> AvlgTree<K> {
    /// Adds `key` to the tree, rotating on the way back up wherever a node's subtree heights
    /// drift more than `G` apart.
    ///
    /// `key` must not already be present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K) {
        self.raw.insert(key);
    }

    /// Removes `key` and returns the stored key, or `Ok(None)` if it was not present.
    ///
    /// A key with two children is replaced by its in-order successor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTree`] if the tree holds no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::{AvlgTree, Error};
    ///
    /// let mut tree = AvlgTree::new(1).unwrap();
    /// assert_eq!(tree.delete(&5), Err(Error::EmptyTree));
    ///
    /// tree.extend([5, 3, 8]);
    /// assert_eq!(tree.delete(&4), Ok(None));
    /// assert_eq!(tree.delete(&5), Ok(Some(5)));
    /// assert_eq!(tree.root(), Ok(&8));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn delete<Q>(&mut self, key: &Q) -> Result<Option<K>, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if self.raw.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(self.raw.remove(key))
    }

    /// Returns a reference to the stored key equal to `key`, or `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTree`] if the tree holds no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::{AvlgTree, Error};
    ///
    /// let mut tree = AvlgTree::new(2).unwrap();
    /// assert_eq!(tree.search("kiwi"), Err(Error::EmptyTree));
    ///
    /// tree.insert(String::from("kiwi"));
    /// assert_eq!(tree.search("kiwi").unwrap().map(String::as_str), Some("kiwi"));
    /// assert_eq!(tree.search("fig"), Ok(None));
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Result<Option<&K>, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if self.raw.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(self.raw.get(key))
    }

    /// Returns `true` if the tree holds `key`. Unlike [`search`](Self::search), an empty tree
    /// simply answers `false`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Returns `true` if every key in each left subtree is strictly less than its ancestor and
    /// every key in each right subtree is greater or equal.
    ///
    /// An empty tree is reported as *not* being a search tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTree;
    ///
    /// let mut tree = AvlgTree::new(1).unwrap();
    /// assert!(!tree.is_bst());
    /// tree.insert(1);
    /// assert!(tree.is_bst());
    /// ```
    #[must_use]
    pub fn is_bst(&self) -> bool {
        self.raw.is_bst()
    }
}

impl<K: Ord> Extend<K> for AvlgTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> fmt::Debug for AvlgTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvlgTree")
            .field("max_imbalance", &self.max_imbalance())
            .field("len", &self.len())
            .field("height", &self.height())
            .finish()
    }
}
