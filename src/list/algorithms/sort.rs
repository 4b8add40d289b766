//! A stable merge sort that only rewrites links.
//!
//! No element is moved, copied or swapped, and nothing is allocated: a
//! range is split by walking to its midpoint, both halves are sorted
//! recursively, and the right half is merged into the left by relinking
//! whole runs at once.

use crate::list::chain::relink;
use crate::list::provider::NodeProvider;
use crate::list::{element, next, prev, Link, List};
use std::marker::PhantomData;

/// Counters of one sort or merge, logged at trace level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SortStats {
    pub(crate) comparisons: usize,
    pub(crate) relinks: usize,
}

/// A strict "less than" predicate over the elements of nodes, with the
/// bookkeeping shared by sort and merge.
pub(crate) struct MergeSort<T, F> {
    less: F,
    pub(crate) stats: SortStats,
    _marker: PhantomData<fn(&T, &T)>,
}

impl<T, F> MergeSort<T, F>
where
    F: FnMut(&T, &T) -> bool,
{
    pub(crate) fn new(less: F) -> Self {
        Self {
            less,
            stats: SortStats::default(),
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// Both nodes must be live element nodes.
    pub(crate) unsafe fn less(&mut self, a: Link, b: Link) -> bool {
        self.stats.comparisons += 1;
        (self.less)(element(a), element(b))
    }

    /// Starting at `front`, which is already known to be less than `pivot`,
    /// find the end of the run of nodes less than `pivot`, stopping at `end`.
    /// Returns the first node past the run and the run length.
    ///
    /// # Safety
    ///
    /// `front..end` must be element nodes of one ring and `pivot` an element
    /// node.
    pub(crate) unsafe fn scan_run(&mut self, front: Link, end: Link, pivot: Link) -> (Link, usize) {
        let (mut run_end, mut len) = (next(front), 1);
        while run_end != end && self.less(run_end, pivot) {
            run_end = next(run_end);
            len += 1;
        }
        (run_end, len)
    }

    /// Sort the `n` nodes starting at `first`; `end` is the node right after
    /// them and is never moved. Returns the new first node of the range.
    ///
    /// # Safety
    ///
    /// `first` must be followed by at least `n` element nodes before `end`.
    unsafe fn sort_range(&mut self, first: Link, end: Link, n: usize) -> Link {
        match n {
            0 | 1 => return first,
            2 => {
                let second = next(first);
                if self.less(second, first) {
                    relink(second, second, first);
                    self.stats.relinks += 1;
                    return second;
                }
                return first;
            }
            _ => {}
        }
        let half = n / 2;
        let mut mid = first;
        (0..half).for_each(|_| mid = next(mid));
        // `mid` ends the left half, so it stays put while the left half is sorted.
        let left = self.sort_range(first, mid, half);
        let right = self.sort_range(mid, end, n - half);
        self.merge_runs(left, right, end)
    }

    /// Merge the sorted ranges `left..right` and `right..end`, which are
    /// adjacent. Returns the new first node.
    unsafe fn merge_runs(&mut self, mut left: Link, mut right: Link, end: Link) -> Link {
        let mut head = left;
        while left != right && right != end {
            if self.less(right, left) {
                let (run_end, _) = self.scan_run(right, end, left);
                relink(right, prev(run_end), left);
                self.stats.relinks += 1;
                if left == head {
                    head = right;
                }
                right = run_end;
            }
            left = next(left);
        }
        head
    }
}

/// Sort `list` with the strict order `less`.
pub(crate) fn merge_sort<T, P, F>(list: &mut List<T, P>, less: F) -> SortStats
where
    P: NodeProvider,
    F: FnMut(&T, &T) -> bool,
{
    let mut sorter = MergeSort::new(less);
    if list.len() >= 2 {
        // SAFETY: the ring holds exactly `len` element nodes between the front
        // node and the ghost node.
        unsafe { sorter.sort_range(list.front_node(), list.ghost_node(), list.len()) };
    }
    #[cfg(feature = "verify")]
    list.verify_ring();
    tracing::trace!(
        len = list.len(),
        comparisons = sorter.stats.comparisons,
        relinks = sorter.stats.relinks,
        "sorted list"
    );
    sorter.stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(vec![] => (0, 0) ; "empty")]
    #[test_case(vec![1] => (0, 0) ; "single")]
    #[test_case(vec![1, 2] => (1, 0) ; "ordered pair")]
    #[test_case(vec![2, 1] => (1, 1) ; "swapped pair")]
    #[test_case(vec![1, 2, 3, 4] => (4, 0) ; "already sorted")]
    #[test_case(vec![3, 4, 1, 2] => (4, 1) ; "one run moves")]
    fn stats(input: Vec<i32>) -> (usize, usize) {
        let mut list = List::from(input.clone());
        let stats = merge_sort(&mut list, |a, b| a < b);
        list.verify_ring();
        let mut expected = input;
        expected.sort();
        assert_eq!(list.to_vec(), expected);
        (stats.comparisons, stats.relinks)
    }

    #[test]
    fn sort_example() {
        let mut list = List::from([5, 3, 8, 1]);
        merge_sort(&mut list, |a, b| a < b);
        assert_eq!(list.into_vec(), vec![1, 3, 5, 8]);
    }

    #[test]
    fn ties_never_move() {
        let mut list = List::from_iter((0..20).map(|i| (i % 3, i)));
        merge_sort(&mut list, |a, b| a.0 < b.0);
        let expected: Vec<_> = (0..3)
            .flat_map(|k| (0..20).filter(move |i| i % 3 == k).map(move |i| (k, i)))
            .collect();
        assert_eq!(list.into_vec(), expected);
    }

    #[test]
    fn panicking_comparator_keeps_the_ring() {
        let mut list = List::from_iter((0..16).rev());
        let mut budget = 20;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            merge_sort(&mut list, |a, b| {
                budget -= 1;
                if budget == 0 {
                    panic!("comparator gave up");
                }
                a < b
            })
        }));
        assert!(result.is_err());
        list.verify_ring();
        let mut values = list.into_vec();
        values.sort();
        assert_eq!(values, (0..16).collect::<Vec<_>>());
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// `n * ceil(log2(n))`
    fn relink_bound(n: usize) -> usize {
        if n < 2 {
            return 0;
        }
        let log = usize::BITS - (n - 1).leading_zeros();
        n * log as usize
    }

    proptest! {
        #[test]
        fn sorts_stably(input in prop::collection::vec(0u8..8, 0..200)) {
            let tagged: Vec<_> = input.iter().copied().zip(0..).collect();
            let mut list = List::from(tagged.clone());
            merge_sort(&mut list, |a, b| a.0 < b.0);
            list.verify_ring();

            let mut expected = tagged;
            expected.sort_by_key(|&(key, _)| key);
            prop_assert_eq!(list.into_vec(), expected);
        }

        #[test]
        fn relinks_are_bounded(input in prop::collection::vec(any::<i16>(), 0..300)) {
            let n = input.len();
            let mut list = List::from(input);
            let stats = merge_sort(&mut list, |a, b| a < b);
            prop_assert!(stats.relinks <= stats.comparisons);
            prop_assert!(stats.relinks <= relink_bound(n));
            prop_assert!(list.iter().zip(list.iter().skip(1)).all(|(a, b)| a <= b));
        }

        #[test]
        fn interleaved_runs_stay_bounded(runs in prop::collection::vec(1usize..6, 1..40)) {
            // Alternate short ascending runs from two value bands, so that the
            // merge keeps splicing short runs across the halves.
            let mut input = Vec::new();
            for (i, len) in runs.iter().enumerate() {
                let base = if i % 2 == 0 { 0 } else { 1000 };
                input.extend((0..*len).map(|k| base + (i * 10 + k) as i32));
            }
            let n = input.len();
            let mut list = List::from(input);
            let stats = merge_sort(&mut list, |a, b| a < b);
            prop_assert!(stats.relinks <= relink_bound(n));
        }
    }
}
