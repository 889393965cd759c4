use std::collections::BTreeSet;

use avlg_tree::{AvlgTree, Error};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a narrow range so that deletes and searches regularly hit.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

/// Fewest keys a tree of `height` can hold when siblings may differ by `max_imbalance`.
fn min_keys_for_height(height: i32, max_imbalance: i32) -> u64 {
    if height < 0 {
        return 0;
    }
    1 + min_keys_for_height(height - 1, max_imbalance) + min_keys_for_height(height - 1 - max_imbalance, max_imbalance)
}

fn assert_well_formed(tree: &AvlgTree<i64>) {
    assert!(tree.is_avlg_balanced(), "unbalanced: {tree:?}");
    assert!(tree.has_consistent_heights(), "stale heights: {tree:?}");
    assert_eq!(tree.is_bst(), !tree.is_empty());
}

// ─── Construction ────────────────────────────────────────────────────────────

#[test]
fn rejects_tolerance_below_one() {
    assert_eq!(AvlgTree::<i64>::new(0).unwrap_err(), Error::InvalidBalance(0));
    assert_eq!(AvlgTree::<i64>::new(-1).unwrap_err(), Error::InvalidBalance(-1));
    assert_eq!(AvlgTree::<i64>::with_capacity(0, 8).unwrap_err(), Error::InvalidBalance(0));
    assert_eq!(Error::InvalidBalance(-1).to_string(), "maximum imbalance must be at least 1, got -1");
}

#[test]
fn new_tree_is_empty() {
    let tree: AvlgTree<i64> = AvlgTree::new(4).unwrap();
    assert_eq!(tree.max_imbalance(), 4);
    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    assert_eq!(format!("{tree:?}"), "AvlgTree { max_imbalance: 4, len: 0, height: -1 }");
}

// ─── Empty-tree behavior ─────────────────────────────────────────────────────

#[test]
fn empty_tree_rejects_lookups() {
    let mut tree: AvlgTree<i64> = AvlgTree::new(1).unwrap();
    assert_eq!(tree.search(&5), Err(Error::EmptyTree));
    assert_eq!(tree.delete(&5), Err(Error::EmptyTree));
    assert_eq!(tree.root(), Err(Error::EmptyTree));
    assert!(!tree.contains(&5));
    assert_eq!(tree.height(), -1);
    assert!(!tree.is_bst());
    assert!(tree.is_avlg_balanced());

    // The failed delete left nothing behind.
    assert!(tree.is_empty());
    assert_eq!(tree.height(), -1);
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn ascending_triple_rotates_into_root() {
    let mut tree = AvlgTree::new(1).unwrap();
    tree.extend([10, 20, 30]);

    assert_eq!(tree.root(), Ok(&20));
    assert_eq!(tree.height(), 1);
    assert!(tree.is_bst());
    assert!(tree.is_avlg_balanced());

    // Removing 20 leaves 30 in its place with 10 on its left.
    assert_eq!(tree.delete(&20), Ok(Some(20)));
    assert_eq!(tree.root(), Ok(&30));
    assert_eq!(tree.delete(&30), Ok(Some(30)));
    assert_eq!(tree.root(), Ok(&10));
    assert_eq!(tree.height(), 0);
}

#[test]
fn loose_tolerance_builds_a_chain_before_rotating() {
    let mut tree = AvlgTree::new(3).unwrap();
    for key in 1..=4 {
        tree.insert(key);
        assert_eq!(tree.root(), Ok(&1));
        assert_eq!(tree.height(), key as i32 - 1);
        assert_well_formed(&tree);
    }

    tree.insert(5);
    assert_eq!(tree.root(), Ok(&2));
    assert_eq!(tree.height(), 3);

    let heights = [4, 4, 4, 4, 5];
    let roots = [2, 2, 4, 4, 4];
    for (key, (height, root)) in (6..=10).zip(heights.into_iter().zip(roots)) {
        tree.insert(key);
        assert_eq!(tree.height(), height, "height after {key}");
        assert_eq!(tree.root(), Ok(&root), "root after {key}");
        assert_well_formed(&tree);
    }
    assert_eq!(tree.len(), 10);
}

#[test]
fn unit_tolerance_is_classic_avl() {
    let mut tree = AvlgTree::new(1).unwrap();
    for key in 1..=1023 {
        tree.insert(key);
    }
    // Ascending insertion into an AVL tree ends perfectly balanced.
    assert_eq!(tree.height(), 9);
    assert_eq!(tree.root(), Ok(&512));
    assert_well_formed(&tree);
}

#[test]
fn wider_tolerance_grows_taller() {
    let mut strict = AvlgTree::new(1).unwrap();
    let mut loose = AvlgTree::new(6).unwrap();
    strict.extend(0..500);
    loose.extend(0..500);

    assert!(loose.height() > strict.height());
    assert_well_formed(&strict);
    assert_well_formed(&loose);
}

#[test]
fn round_trip() {
    let mut tree = AvlgTree::new(2).unwrap();
    tree.extend([8, 3, 12, 1, 5]);

    tree.insert(7);
    assert_eq!(tree.search(&7), Ok(Some(&7)));
    assert!(tree.contains(&7));

    assert_eq!(tree.delete(&7), Ok(Some(7)));
    assert_eq!(tree.search(&7), Ok(None));
    assert_eq!(tree.delete(&7), Ok(None));
    assert_eq!(tree.len(), 5);
}

#[test]
fn deleting_inner_nodes_keeps_order() {
    let mut tree = AvlgTree::new(1).unwrap();
    tree.extend([50, 30, 70, 20, 40, 60, 80, 35, 45, 65]);

    for key in [30, 50, 70, 40] {
        assert_eq!(tree.delete(&key), Ok(Some(key)));
        assert_well_formed(&tree);
        assert_eq!(tree.search(&key), Ok(None));
    }
    for key in [20, 35, 45, 60, 65, 80] {
        assert_eq!(tree.search(&key), Ok(Some(&key)));
    }
    assert_eq!(tree.len(), 6);
}

#[test]
fn clear_resets_to_fresh_tree() {
    let mut tree = AvlgTree::new(2).unwrap();
    tree.extend(0..100);
    tree.clear();

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.height(), -1);
    assert_eq!(tree.max_imbalance(), 2);
    assert_eq!(tree.search(&3), Err(Error::EmptyTree));

    tree.clear();
    assert!(tree.is_empty());

    let mut fresh = AvlgTree::new(2).unwrap();
    for key in [4, 9, 1, 7] {
        tree.insert(key);
        fresh.insert(key);
    }
    assert_eq!(tree.root(), fresh.root());
    assert_eq!(tree.height(), fresh.height());
    assert_eq!(tree.len(), 4);
}

#[test]
fn borrowed_lookups() {
    let mut tree = AvlgTree::new(1).unwrap();
    tree.extend(["pear", "apple", "quince", "fig"].map(String::from));

    assert_eq!(tree.search("fig").unwrap().map(String::as_str), Some("fig"));
    assert_eq!(tree.delete("apple"), Ok(Some(String::from("apple"))));
    assert!(!tree.contains("apple"));
    assert!(tree.is_bst());
}

#[test]
fn clones_are_independent() {
    let mut original = AvlgTree::new(2).unwrap();
    original.extend(0..20);
    let copy = original.clone();

    original.clear();
    assert_eq!(copy.len(), 20);
    assert_eq!(copy.search(&19), Ok(Some(&19)));
    assert!(original.is_empty());
}

// ─── Randomized model tests ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64),
    Delete(i64),
    Search(i64),
    Clear,
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        6 => key_strategy().prop_map(TreeOp::Insert),
        4 => key_strategy().prop_map(TreeOp::Delete),
        2 => key_strategy().prop_map(TreeOp::Search),
        1 => Just(TreeOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Replays random operations against `BTreeSet` and checks every invariant after each
    /// step. Inserts of keys already present are skipped since duplicates are unsupported.
    #[test]
    fn ops_match_btreeset(
        max_imbalance in 1..6_i32,
        ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE),
    ) {
        let mut tree = AvlgTree::new(max_imbalance).unwrap();
        let mut model = BTreeSet::new();

        for op in &ops {
            match *op {
                TreeOp::Insert(key) => {
                    if model.insert(key) {
                        tree.insert(key);
                    }
                }
                TreeOp::Delete(key) => {
                    let expected = if model.is_empty() { Err(Error::EmptyTree) } else { Ok(model.take(&key)) };
                    prop_assert_eq!(tree.delete(&key), expected, "delete({})", key);
                }
                TreeOp::Search(key) => {
                    let expected = if model.is_empty() { Err(Error::EmptyTree) } else { Ok(model.get(&key)) };
                    prop_assert_eq!(tree.search(&key), expected, "search({})", key);
                }
                TreeOp::Clear => {
                    tree.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(tree.len(), model.len());
            prop_assert_eq!(tree.is_empty(), model.is_empty());
            prop_assert!(tree.is_avlg_balanced());
            prop_assert!(tree.has_consistent_heights());
            prop_assert_eq!(tree.is_bst(), !model.is_empty());
            prop_assert!(
                min_keys_for_height(tree.height(), max_imbalance) <= model.len() as u64,
                "height {} too large for {} keys",
                tree.height(),
                model.len()
            );
        }
    }

    /// Monotone runs are the worst case for an unbalanced tree; the height must stay
    /// logarithmic regardless of tolerance.
    #[test]
    fn sorted_runs_stay_logarithmic(max_imbalance in 1..8_i32, len in 1..2_000usize, descending in any::<bool>()) {
        let mut tree = AvlgTree::new(max_imbalance).unwrap();
        let keys: Vec<i64> = if descending { (0..len as i64).rev().collect() } else { (0..len as i64).collect() };
        tree.extend(keys);

        prop_assert!(tree.is_avlg_balanced());
        prop_assert!(min_keys_for_height(tree.height(), max_imbalance) <= len as u64);
        let bound = f64::from(max_imbalance + 1) * (len as f64 + 1.0).log2();
        prop_assert!(f64::from(tree.height()) <= bound, "height {} over {}", tree.height(), bound);
    }
}
