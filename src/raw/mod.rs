mod arena;
mod node_id;
mod node;
mod raw_avlg_tree;

pub(crate) use raw_avlg_tree::RawAvlgTree;
