//! Folding one sorted list into another.

use super::sort::{MergeSort, SortStats};
use crate::error::ListError;
use crate::list::provider::NodeProvider;
use crate::list::{next, prev, List};

/// Move every node of `other` into `list`, both sorted under `less`, so that
/// `list` stays sorted. Runs of `other` that belong in front of a node of
/// `list` are detached and attached as a whole. On ties the node of `list`
/// comes first.
pub(crate) fn merge_lists<T, P, F>(
    list: &mut List<T, P>,
    other: &mut List<T, P>,
    less: F,
) -> Result<SortStats, ListError>
where
    P: NodeProvider,
    F: FnMut(&T, &T) -> bool,
{
    list.check_grow(other.len())?;
    let mut merger = MergeSort::new(less);
    let moved = other.len();
    let ghost = list.ghost_node();
    let mut left = list.front_node();
    while left != ghost && !other.is_empty() {
        let right = other.front_node();
        // SAFETY: `left` is an element node of `list` and `right` the front
        // node of the non-empty `other`.
        unsafe {
            if merger.less(right, left) {
                let (run_end, len) = merger.scan_run(right, other.ghost_node(), left);
                let chain = other.detach(right, prev(run_end), len);
                list.attach(left, chain);
                merger.stats.relinks += 1;
            }
            left = next(left);
        }
    }
    if let Some(rest) = other.detach_all() {
        list.attach_back(rest);
        merger.stats.relinks += 1;
    }
    tracing::trace!(
        len = list.len(),
        moved,
        comparisons = merger.stats.comparisons,
        relinks = merger.stats.relinks,
        "merged lists"
    );
    Ok(merger.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::testing::CountingProvider;

    #[test]
    fn interleaved() {
        let mut list = List::from([1, 4, 6, 9]);
        let mut other = List::from([0, 2, 3, 7, 10, 11]);
        let stats = merge_lists(&mut list, &mut other, |a, b| a < b).unwrap();
        list.verify_ring();
        other.verify_ring();
        assert!(other.is_empty());
        assert_eq!(list.into_vec(), vec![0, 1, 2, 3, 4, 6, 7, 9, 10, 11]);
        // [0], [2, 3], [7] and the tail [10, 11]
        assert_eq!(stats.relinks, 4);
    }

    #[test]
    fn into_an_empty_list() {
        let mut list = List::new();
        let mut other = List::from([1, 2]);
        merge_lists(&mut list, &mut other, |a, b| a < b).unwrap();
        assert_eq!(list.into_vec(), vec![1, 2]);
        assert!(other.is_empty());
    }

    #[test]
    fn ties_keep_the_receiver_first() {
        let mut list = List::from([(1, 'a'), (2, 'a')]);
        let mut other = List::from([(1, 'b'), (2, 'b')]);
        merge_lists(&mut list, &mut other, |a, b| a.0 < b.0).unwrap();
        assert_eq!(
            list.into_vec(),
            vec![(1, 'a'), (1, 'b'), (2, 'a'), (2, 'b')]
        );
    }

    #[test]
    fn length_bound_leaves_both_lists() {
        let provider = CountingProvider::with_max_len(3);
        let mut list = List::new_in(provider.clone());
        list.extend([1, 3]);
        let mut other = List::new_in(provider.clone());
        other.extend([2, 4]);
        assert!(matches!(
            merge_lists(&mut list, &mut other, |a, b| a < b),
            Err(ListError::LengthExceeded { .. })
        ));
        assert_eq!(list.to_vec(), vec![1, 3]);
        assert_eq!(other.to_vec(), vec![2, 4]);
        assert_eq!(provider.outstanding(), 4);
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn merges_two_sorted_lists(
            a in prop::collection::vec(0u8..16, 0..100),
            b in prop::collection::vec(0u8..16, 0..100),
        ) {
            let (mut a, mut b) = (a, b);
            a.sort();
            b.sort();
            let tag = |side: char| move |(i, key): (usize, u8)| (key, side, i);
            let mut list = List::from_iter(a.iter().copied().enumerate().map(tag('a')));
            let mut other = List::from_iter(b.iter().copied().enumerate().map(tag('b')));

            let stats = merge_lists(&mut list, &mut other, |x, y| x.0 < y.0).unwrap();
            list.verify_ring();
            other.verify_ring();
            prop_assert!(other.is_empty());
            prop_assert!(stats.relinks <= b.len());

            // ties order the receiver's side first, then by original position
            let mut expected: Vec<_> = a.iter().copied().enumerate().map(tag('a'))
                .chain(b.iter().copied().enumerate().map(tag('b')))
                .collect();
            expected.sort();
            prop_assert_eq!(list.into_vec(), expected);
        }
    }
}
