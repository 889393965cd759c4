use super::node_id::NodeId;

/// Height of an absent subtree.
pub(crate) const EMPTY_HEIGHT: i32 = -1;

/// One stored key.
///
/// There is no parent link: every restructuring walks down from the root and relinks the
/// subtree roots it gets back on the way up.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    // Cached height of the subtree rooted here; 0 for a leaf.
    pub(crate) height: i32,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

/// Which child link a traversal followed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl<K> Node<K> {
    /// Creates a leaf.
    pub(crate) const fn new(key: K) -> Self {
        Self {
            key,
            height: 0,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, direction: Direction, child: Option<NodeId>) {
        match direction {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
    }
}
