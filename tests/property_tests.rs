//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and verify that the linked
//! heap keeps its complete-tree shape and min-heap order after every step, and that
//! it agrees with `std::collections::BinaryHeap` used as a min-heap via `Reverse`.

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use linked_binary_heap::{HeapError, LinkedBinaryHeap, NodeKey};

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

/// Walks the tree through the public node API and checks shape, order and back-links
///
/// Independent of `LinkedBinaryHeap::validate`, so the two cross-check each other.
fn check_structure(heap: &LinkedBinaryHeap<i32, i32>) -> Result<(), TestCaseError> {
    let root = heap.root();
    prop_assert_eq!(heap.peek_node().parent(), None, "root has a parent");

    let mut queue: VecDeque<(NodeKey, usize)> = VecDeque::from([(root, 1)]);
    let mut visited = 0;
    let mut deepest_position = 1;
    while let Some((key, position)) = queue.pop_front() {
        visited += 1;
        // Level order visits positions 1, 2, 3, ... with no gaps
        prop_assert_eq!(position, visited, "gap in level order");
        deepest_position = position;

        let node = heap.node(key).expect("reachable node is in the heap");
        for (child, offset) in [(node.left(), 0), (node.right(), 1)] {
            if let Some(child) = child {
                let child_node = heap.node(child).expect("child is in the heap");
                prop_assert_eq!(child_node.parent(), Some(key), "stale parent link");
                prop_assert!(node.key() <= child_node.key(), "heap order violated");
                queue.push_back((child, 2 * position + offset));
            }
        }
    }

    prop_assert_eq!(visited, heap.len());
    prop_assert_eq!(heap.depth(), deepest_position.ilog2() as usize);
    prop_assert_eq!(heap.is_full(), (heap.len() + 1).is_power_of_two());
    prop_assert_eq!(heap.validate(), Ok(()));
    Ok(())
}

/// Test that every insert and extract leaves a complete, heap-ordered tree
fn test_structure_invariant(seed: i32, ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap = LinkedBinaryHeap::with_key(seed);
    check_structure(&heap)?;

    for (should_extract, key) in ops {
        if should_extract {
            let before = heap.len();
            match heap.extract_min() {
                Ok(_) => {
                    prop_assert_eq!(heap.len(), before - 1);
                }
                Err(err) => {
                    prop_assert_eq!(err, HeapError::SoleNode);
                    prop_assert_eq!(before, 1);
                }
            }
        } else {
            heap.insert_key(key);
        }
        check_structure(&heap)?;
    }

    Ok(())
}

/// Test that the linked heap matches the standard library heap step by step
fn test_matches_std_heap(seed: i32, ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap = LinkedBinaryHeap::with_key(seed);
    let mut reference = BinaryHeap::from([Reverse(seed)]);

    for (should_extract, key) in ops {
        if should_extract && reference.len() > 1 {
            let Reverse(expected) = reference.pop().expect("reference is non-empty");
            let (actual, value) = heap
                .extract_min()
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(value, expected);
        } else if !should_extract {
            heap.insert_key(key);
            reference.push(Reverse(key));
        }

        prop_assert_eq!(heap.len(), reference.len());
        let Reverse(expected_min) = reference.peek().expect("reference is non-empty");
        prop_assert_eq!(heap.peek_min().0, expected_min);
    }

    Ok(())
}

/// Test that extracting everything yields the keys in non-decreasing order
fn test_sorted_extraction(seed: i32, keys: Vec<i32>) -> Result<(), TestCaseError> {
    let mut heap = LinkedBinaryHeap::with_key(seed);
    for key in &keys {
        heap.insert_key(*key);
    }
    prop_assert_eq!(heap.len(), keys.len() + 1);

    let mut expected = keys.clone();
    expected.push(seed);
    expected.sort_unstable();

    let mut extracted = Vec::with_capacity(expected.len());
    while let Ok((key, _)) = heap.extract_min() {
        extracted.push(key);
    }
    prop_assert_eq!(heap.len(), 1);
    extracted.push(*heap.peek_min().0);

    prop_assert_eq!(extracted, expected);
    Ok(())
}

/// Test that values stay attached to the key they were inserted with
fn test_values_follow_keys(entries: Vec<(i32, u16)>) -> Result<(), TestCaseError> {
    let mut heap = LinkedBinaryHeap::new(i32::MIN, (i32::MIN, u16::MAX));
    heap.extend(entries.iter().map(|&(k, tag)| (k, (k, tag))));

    let mut expected: Vec<(i32, u16)> = entries.clone();
    expected.push((i32::MIN, u16::MAX));
    expected.sort_unstable();

    let mut drained: Vec<(i32, u16)> = heap
        .into_sorted_vec()
        .into_iter()
        .map(|(key, value)| {
            assert_eq!(key, value.0, "value detached from its key");
            value
        })
        .collect();
    // Equal keys may come out in any order
    drained.sort_unstable();

    prop_assert_eq!(drained, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn structure_invariant(
        seed in -100i32..100,
        ops in prop::collection::vec((prop::bool::weighted(0.4), -100i32..100), 0..200)
    ) {
        test_structure_invariant(seed, ops)?;
    }

    #[test]
    fn matches_std_heap(
        seed in -100i32..100,
        ops in prop::collection::vec((prop::bool::ANY, -100i32..100), 0..200)
    ) {
        test_matches_std_heap(seed, ops)?;
    }

    #[test]
    fn sorted_extraction(
        seed in any::<i32>(),
        keys in prop::collection::vec(any::<i32>(), 0..150)
    ) {
        test_sorted_extraction(seed, keys)?;
    }

    #[test]
    fn sorted_extraction_with_duplicates(
        seed in 0i32..4,
        keys in prop::collection::vec(0i32..4, 0..100)
    ) {
        test_sorted_extraction(seed, keys)?;
    }

    #[test]
    fn values_follow_keys(entries in prop::collection::vec((-50i32..50, any::<u16>()), 0..100)) {
        test_values_follow_keys(entries)?;
    }

    #[test]
    fn extract_returns_minimum(
        seed in -1000i32..1000,
        keys in prop::collection::vec(-1000i32..1000, 1..100)
    ) {
        let mut heap = LinkedBinaryHeap::with_key(seed);
        heap.extend(keys.iter().map(|&k| (k, k)));
        let expected = keys.iter().copied().chain([seed]).min();

        let len = heap.len();
        let (key, _) = heap.extract_min().map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(Some(key), expected);
        prop_assert_eq!(heap.len(), len - 1);
    }
}
