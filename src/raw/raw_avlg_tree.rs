use core::borrow::Borrow;
use core::cmp::{self, Ordering};
use core::mem;

use smallvec::{SmallVec, smallvec};

use super::arena::Arena;
use super::node_id::NodeId;
use super::node::{Direction, EMPTY_HEIGHT, Node};

/// The core AVL-G implementation backing `AvlgTree`.
#[derive(Clone)]
pub(crate) struct RawAvlgTree<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// NodeId to the root node, if the tree is non-empty.
    root: Option<NodeId>,
    /// Number of stored keys.
    len: usize,
    /// Largest tolerated `|height(left) - height(right)|` at any node.
    max_imbalance: i32,
}

/// Path element for tracking traversal during mutations.
#[derive(Clone, Copy)]
struct PathElement {
    /// NodeId to the node at this level.
    node: NodeId,
    /// Child link we descended through.
    direction: Direction,
}

/// Stack of visited nodes, root first.
type Path = SmallVec<[PathElement; 32]>;

/// What happened below a node, which decides between a single and a double rotation.
#[derive(Clone, Copy)]
enum Change {
    /// A leaf was attached; the shape is chosen by comparing its key with the heavy child.
    Inserted(NodeId),
    /// A node was spliced out; the shape is chosen by the heavy child's own balance.
    Removed,
}

impl<K> RawAvlgTree<K> {
    /// Creates a new, empty tree. `max_imbalance` is validated by the caller.
    pub(crate) const fn new(max_imbalance: i32) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            max_imbalance,
        }
    }

    pub(crate) fn with_capacity(max_imbalance: i32, capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            max_imbalance,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn max_imbalance(&self) -> i32 {
        self.max_imbalance
    }

    /// Drops every node and resets the tree to empty.
    pub(crate) fn clear(&mut self) {
        log::debug!("clearing tree of {} keys", self.len);
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn root_key(&self) -> Option<&K> {
        self.root.map(|root| &self.node(root).key)
    }

    /// Cached height of the root, or -1 when empty.
    pub(crate) fn height(&self) -> i32 {
        self.height_of(self.root)
    }

    #[inline]
    fn node(&self, handle: NodeId) -> &Node<K> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: NodeId) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn height_of(&self, subtree: Option<NodeId>) -> i32 {
        subtree.map_or(EMPTY_HEIGHT, |handle| self.node(handle).height)
    }

    /// `height(left) - height(right)`, or 0 for an absent subtree.
    fn balance_of(&self, subtree: Option<NodeId>) -> i32 {
        subtree.map_or(0, |handle| {
            let node = self.node(handle);
            self.height_of(node.left) - self.height_of(node.right)
        })
    }

    fn update_height(&mut self, handle: NodeId) {
        let node = self.node(handle);
        let height = 1 + cmp::max(self.height_of(node.left), self.height_of(node.right));
        self.node_mut(handle).height = height;
    }

    /// Rotates the subtree at `node` to the right and returns its new root.
    ///
    /// Returns `node` unchanged when it has no left child to lift.
    fn rotate_right(&mut self, node: NodeId) -> NodeId {
        let Some(pivot) = self.node(node).left else {
            return node;
        };
        let inner = self.node(pivot).right;
        self.node_mut(node).left = inner;
        self.node_mut(pivot).right = Some(node);
        // `pivot`'s height depends on `node`'s.
        self.update_height(node);
        self.update_height(pivot);
        log::trace!("rotated right at {node:?}, new subtree root {pivot:?}");
        pivot
    }

    /// Mirror image of [`rotate_right`](Self::rotate_right).
    fn rotate_left(&mut self, node: NodeId) -> NodeId {
        let Some(pivot) = self.node(node).right else {
            return node;
        };
        let inner = self.node(pivot).left;
        self.node_mut(node).right = inner;
        self.node_mut(pivot).left = Some(node);
        self.update_height(node);
        self.update_height(pivot);
        log::trace!("rotated left at {node:?}, new subtree root {pivot:?}");
        pivot
    }

    /// Points `parent`'s link (or the root, if there is no parent) at `child`.
    fn relink(&mut self, parent: Option<PathElement>, child: Option<NodeId>) {
        match parent {
            Some(parent) => self.node_mut(parent.node).set_child(parent.direction, child),
            None => self.root = child,
        }
    }

    /// Checks the balance condition at every node against recomputed heights.
    pub(crate) fn is_balanced(&self) -> bool {
        self.balanced_height(self.root).is_some()
    }

    fn balanced_height(&self, subtree: Option<NodeId>) -> Option<i32> {
        let Some(handle) = subtree else {
            return Some(EMPTY_HEIGHT);
        };
        let node = self.node(handle);
        let left = self.balanced_height(node.left)?;
        let right = self.balanced_height(node.right)?;
        if (left - right).abs() > self.max_imbalance {
            return None;
        }
        Some(1 + cmp::max(left, right))
    }

    /// Checks that every cached height matches the subtree it describes.
    pub(crate) fn has_consistent_heights(&self) -> bool {
        self.verified_height(self.root).is_some()
    }

    fn verified_height(&self, subtree: Option<NodeId>) -> Option<i32> {
        let Some(handle) = subtree else {
            return Some(EMPTY_HEIGHT);
        };
        let node = self.node(handle);
        let height = 1 + cmp::max(self.verified_height(node.left)?, self.verified_height(node.right)?);
        (height == node.height).then_some(height)
    }
}

impl<K: Ord> RawAvlgTree<K> {
    /// Adds `key`. Equal keys descend to the right; callers must not insert duplicates.
    pub(crate) fn insert(&mut self, key: K) {
        let mut path = Path::new();
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.node(handle);
            let direction = if key >= node.key { Direction::Right } else { Direction::Left };
            path.push(PathElement { node: handle, direction });
            cursor = node.child(direction);
        }

        let leaf = self.nodes.insert(Node::new(key));
        self.relink(path.last().copied(), Some(leaf));
        self.len += 1;
        debug_assert_eq!(self.nodes.len(), self.len);
        self.rebalance_path(&path, Change::Inserted(leaf));
    }

    /// Finds the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.node(handle);
            cursor = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|handle| &self.node(handle).key)
    }

    /// Removes `key` and returns the stored key, or `None` (with no mutation) if absent.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut path = Path::new();
        let mut cursor = self.root;
        let target = loop {
            let handle = cursor?;
            let node = self.node(handle);
            let direction = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break handle,
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
            };
            path.push(PathElement { node: handle, direction });
            cursor = node.child(direction);
        };

        let target_node = self.node(target);
        let removed = match (target_node.left, target_node.right) {
            (Some(_), Some(right)) => {
                // Splice out the in-order successor and move its key up into `target`.
                path.push(PathElement {
                    node: target,
                    direction: Direction::Right,
                });
                let mut successor = right;
                while let Some(next) = self.node(successor).left {
                    path.push(PathElement {
                        node: successor,
                        direction: Direction::Left,
                    });
                    successor = next;
                }
                let orphan = self.node(successor).right;
                self.relink(path.last().copied(), orphan);
                let successor_key = self.nodes.remove(successor).key;
                log::trace!("replacing {target:?} with successor {successor:?}");
                mem::replace(&mut self.node_mut(target).key, successor_key)
            }
            (child, None) | (None, child) => {
                self.relink(path.last().copied(), child);
                self.nodes.remove(target).key
            }
        };

        self.len -= 1;
        debug_assert_eq!(self.nodes.len(), self.len);
        self.rebalance_path(&path, Change::Removed);
        Some(removed)
    }

    /// Checks the search-tree ordering over every node: left keys strictly less, right keys
    /// greater or equal. An empty tree does not count as a search tree.
    pub(crate) fn is_bst(&self) -> bool {
        let Some(root) = self.root else {
            return false;
        };

        // (node, inclusive lower bound, exclusive upper bound)
        let mut stack: SmallVec<[(NodeId, Option<&K>, Option<&K>); 32]> = smallvec![(root, None, None)];
        while let Some((handle, lower, upper)) = stack.pop() {
            let node = self.node(handle);
            if lower.is_some_and(|lower| node.key < *lower) || upper.is_some_and(|upper| node.key >= *upper) {
                return false;
            }
            if let Some(left) = node.left {
                stack.push((left, lower, Some(&node.key)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(&node.key), upper));
            }
        }
        true
    }

    /// Walks `path` bottom-up, restoring heights and balance and relinking rotated subtrees.
    fn rebalance_path(&mut self, path: &Path, change: Change) {
        for depth in (0..path.len()).rev() {
            let node = path[depth].node;
            let subtree_root = self.rebalance(node, change);
            if subtree_root != node {
                let parent = depth.checked_sub(1).map(|parent| path[parent]);
                self.relink(parent, Some(subtree_root));
            }
        }
    }

    /// Refreshes `node`'s height and rotates if its balance exceeds the tolerance.
    /// Returns the root of the subtree afterwards.
    fn rebalance(&mut self, node: NodeId, change: Change) -> NodeId {
        self.update_height(node);
        let balance = self.balance_of(Some(node));

        if balance > self.max_imbalance {
            let Some(left) = self.node(node).left else {
                return node;
            };
            let outer = match change {
                Change::Inserted(leaf) => self.node(leaf).key < self.node(left).key,
                Change::Removed => self.balance_of(Some(left)) >= 0,
            };
            if !outer {
                let lifted = self.rotate_left(left);
                self.node_mut(node).left = Some(lifted);
            }
            self.rotate_right(node)
        } else if balance < -self.max_imbalance {
            let Some(right) = self.node(node).right else {
                return node;
            };
            let outer = match change {
                // Equal keys descend right on insert, so they count as the outer case here.
                Change::Inserted(leaf) => self.node(leaf).key >= self.node(right).key,
                Change::Removed => self.balance_of(Some(right)) <= 0,
            };
            if !outer {
                let lifted = self.rotate_right(right);
                self.node_mut(node).right = Some(lifted);
            }
            self.rotate_left(node)
        } else {
            node
        }
    }
}
