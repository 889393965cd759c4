use core::fmt;
use core::num::NonZeroU32;

/// Identifies a node's slot in the [`Arena`](super::arena::Arena).
///
/// Stored off by one in a `NonZeroU32`, so an absent child (`Option<NodeId>`) is still four
/// bytes and both child links of a node fit in eight bytes.
#[derive(Clone, Copy, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct NodeId(NonZeroU32);

impl NodeId {
    /// Largest slot index a `NodeId` can address.
    pub(crate) const MAX_INDEX: usize = u32::MAX as usize - 1;

    pub(crate) fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index)
            .ok()
            .and_then(|index| index.checked_add(1))
            .and_then(NonZeroU32::new);
        match raw {
            Some(raw) => Self(raw),
            None => panic!("`NodeId::from_index()` - slot {index} is out of range"),
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

// Shows up in rotation traces, so keep it short.
impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}
