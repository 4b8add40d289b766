use crate::error::ListError;
use crate::list::provider::NodeProvider;
use crate::list::{element_mut, next, List};
use drain::{Drain, ExtractIf};
use merge::merge_lists;
use sort::merge_sort;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::RangeBounds;

pub(crate) mod drain;
mod merge;
mod sort;

impl<T: PartialEq, P: NodeProvider> PartialEq for List<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T: Eq, P: NodeProvider> Eq for List<T, P> {}

impl<T: PartialOrd, P: NodeProvider> PartialOrd for List<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord, P: NodeProvider> Ord for List<T, P> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T: Clone, P: NodeProvider + Clone> Clone for List<T, P> {
    fn clone(&self) -> Self {
        let mut list = Self::new_in(self.provider.clone());
        list.extend(self.iter().cloned());
        list
    }

    /// Reuses the nodes `self` already has, allocating or freeing only the
    /// difference in length.
    fn clone_from(&mut self, other: &Self) {
        self.assign_iter(other.iter().cloned());
    }
}

impl<T: Hash, P: NodeProvider> Hash for List<T, P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T, P: NodeProvider> List<T, P> {
    /// Returns `true` if the `List` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_back(0);
    /// list.push_back(1);
    /// list.push_back(2);
    ///
    /// assert_eq!(list.contains(&0), true);
    /// assert_eq!(list.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|e| e == x)
    }

    /// Sort the list.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time. It allocates
    /// nothing and never moves an element: only links are rewritten, so
    /// references obtained through cursors stay valid.
    ///
    /// # Current Implementation
    ///
    /// A top-down merge sort. Each merge moves whole runs of the right half in
    /// front of the first larger element of the left half, one relink per run.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut list = List::from_iter([5, 2, 4, 3, 1]);
    ///
    /// list.sort();
    ///
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        merge_sort(self, |a, b| a.lt(b));
    }

    /// Sort the list with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// The comparator function must define a total ordering for the
    /// elements in the list. If the ordering is not total, the order
    /// of the elements is unspecified, but the list stays a valid list
    /// holding the same elements. The same holds if `compare` panics.
    ///
    /// For example, while [`f64`] doesn’t implement [`Ord`] because
    /// `NaN != NaN`, we can use `partial_cmp` as our sort function
    /// when we know the list doesn’t contain a `NaN`.
    /// ```
    /// use splice_list::List;
    /// let mut floats = List::from([5f64, 4.0, 1.0, 3.0, 2.0]);
    /// floats.sort_by(|a, b| a.partial_cmp(b).unwrap());
    /// assert_eq!(floats.into_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut v = List::from([5, 4, 1, 3, 2]);
    /// v.sort_by(|a, b| a.cmp(b));
    /// assert_eq!(v.to_vec(), vec![1, 2, 3, 4, 5]);
    ///
    /// // reverse sorting
    /// v.sort_by(|a, b| b.cmp(a));
    /// assert_eq!(v.to_vec(), vec![5, 4, 3, 2, 1]);
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        merge_sort(self, |a, b| compare(a, b) == Ordering::Less);
    }

    /// Sorts the list with a key extraction function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements)
    /// and *O*(*m* \* *n* \* log(*n*)) worst-case, where the
    /// key function is *O*(*m*).
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut v = List::from([-5i32, 4, 1, -3, 2]);
    ///
    /// v.sort_by_key(|k| k.abs());
    /// assert_eq!(v.into_vec(), vec![1, 2, -3, 4, -5]);
    /// ```
    pub fn sort_by_key<K, F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> K,
        K: Ord,
    {
        merge_sort(self, |a, b| f(a).lt(&f(b)));
    }

    /// Moves every element of `other` into the list. Both lists must already
    /// be sorted; the result is sorted too, and `other` is left empty.
    ///
    /// The merge is stable: of two equal elements, the one from `self` comes
    /// first. Elements are never moved or copied, runs of `other` are relinked
    /// in one step each.
    ///
    /// If the combined length would exceed [`List::max_len`], nothing moves and
    /// an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut list = List::from([1, 4, 6]);
    /// let mut other = List::from([2, 3, 7]);
    ///
    /// list.merge(&mut other).unwrap();
    ///
    /// assert!(other.is_empty());
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 4, 6, 7]);
    /// ```
    pub fn merge(&mut self, other: &mut Self) -> Result<(), ListError>
    where
        T: Ord,
    {
        merge_lists(self, other, |a, b| a.lt(b)).map(drop)
    }

    /// Like [`List::merge`], with both lists sorted by `compare`.
    pub fn merge_by<F>(&mut self, other: &mut Self, mut compare: F) -> Result<(), ListError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        merge_lists(self, other, |a, b| compare(a, b) == Ordering::Less).map(drop)
    }

    /// Like [`List::merge`], with both lists sorted by the key `f` extracts.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut list = List::from([(1, 'a'), (3, 'a')]);
    /// let mut other = List::from([(1, 'b'), (2, 'b')]);
    ///
    /// list.merge_by_key(&mut other, |&(k, _)| k).unwrap();
    ///
    /// assert_eq!(list.into_vec(), vec![(1, 'a'), (1, 'b'), (2, 'b'), (3, 'a')]);
    /// ```
    pub fn merge_by_key<K, F>(&mut self, other: &mut Self, mut f: F) -> Result<(), ListError>
    where
        F: FnMut(&T) -> K,
        K: Ord,
    {
        merge_lists(self, other, |a, b| f(a).lt(&f(b))).map(drop)
    }

    /// Removes consecutive repeated elements, keeping the first of each run.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut list = List::from([1, 1, 2, 2, 2, 3, 1]);
    ///
    /// list.dedup();
    ///
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 1]);
    /// ```
    pub fn dedup(&mut self)
    where
        T: PartialEq,
    {
        self.dedup_by(|a, b| a == b);
    }

    /// Removes all but the first of consecutive elements that resolve to the
    /// same key.
    pub fn dedup_by_key<K, F>(&mut self, mut key: F)
    where
        F: FnMut(&mut T) -> K,
        K: PartialEq,
    {
        self.dedup_by(|a, b| key(a) == key(b));
    }

    /// Removes all but the first of consecutive elements satisfying a given
    /// equality relation.
    ///
    /// `same_bucket(a, b)` is called with `a` being the element under
    /// inspection and `b` the last element that was kept, which need not be
    /// `a`'s original neighbour. If it returns `true`, `a` is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut list = List::from([10, 11, 12, 20, 25, 31]);
    ///
    /// list.dedup_by(|a, b| *a - *b < 2);
    ///
    /// assert_eq!(list.into_vec(), vec![10, 12, 20, 25, 31]);
    /// ```
    pub fn dedup_by<F>(&mut self, mut same_bucket: F)
    where
        F: FnMut(&mut T, &mut T) -> bool,
    {
        if self.len() < 2 {
            return;
        }
        let ghost = self.ghost_node();
        let mut kept = self.front_node();
        let mut removed = 0;
        // SAFETY: `kept` and `node` are distinct element nodes of this list, and
        // the successor of `node` is read before `node` may be removed.
        unsafe {
            let mut node = next(kept);
            while node != ghost {
                let following = next(node);
                if same_bucket(element_mut(node), element_mut(kept)) {
                    drop(self.remove_node(node));
                    removed += 1;
                } else {
                    kept = node;
                }
                node = following;
            }
        }
        tracing::trace!(removed, len = self.len(), "deduplicated list");
    }

    /// Creates an iterator which uses a closure to determine if an element
    /// should be removed.
    ///
    /// If the closure returns true, the element is removed and yielded. If the
    /// closure returns false, the element stays in the list and will not be
    /// yielded. The closure may mutate every element it sees.
    ///
    /// Dropping the iterator before it is exhausted still removes every
    /// remaining match.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut numbers = List::from([1, 2, 3, 4, 5, 6, 8, 9, 11, 13, 14, 15]);
    ///
    /// let evens: Vec<_> = numbers.extract_if(|x| *x % 2 == 0).collect();
    ///
    /// assert_eq!(evens, vec![2, 4, 6, 8, 14]);
    /// assert_eq!(numbers.into_vec(), vec![1, 3, 5, 9, 11, 13, 15]);
    /// ```
    pub fn extract_if<F>(&mut self, filter: F) -> ExtractIf<'_, T, F, P>
    where
        F: FnMut(&mut T) -> bool,
    {
        ExtractIf::new(self, filter)
    }

    /// Removes every element for which `pred` returns `true`, in one forward
    /// pass. Returns how many were removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut list = List::from_iter(1..=6);
    ///
    /// assert_eq!(list.remove_if(|x| *x % 3 == 0), 2);
    /// assert_eq!(list.into_vec(), vec![1, 2, 4, 5]);
    /// ```
    pub fn remove_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.extract_if(|x| pred(x)).count()
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut list = List::from([1, 2, 3, 4]);
    /// list.retain(|&x| x % 2 == 0);
    /// assert_eq!(list.into_vec(), vec![2, 4]);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.remove_if(|x| !f(x));
    }

    /// Removes every element equal to `value`. Returns how many were removed.
    pub fn remove_value(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.remove_if(|x| x == value)
    }

    /// Removes the elements in `range` and returns them as an iterator.
    ///
    /// The range is unlinked right away in *O*(`range.end`) time. Elements the
    /// iterator does not yield are dropped with it.
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or its end is past the end of the
    /// list.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut list = List::from_iter(0..5);
    ///
    /// let middle: Vec<_> = list.drain(1..4).collect();
    ///
    /// assert_eq!(middle, vec![1, 2, 3]);
    /// assert_eq!(list.into_vec(), vec![0, 4]);
    /// ```
    pub fn drain<R: RangeBounds<usize>>(&mut self, range: R) -> Drain<'_, T, P> {
        let chain = self.detach_range(range);
        Drain::new(self, chain)
    }

    /// Reverses the order of the elements in place by swapping the two links
    /// of every node. The elements themselves are not touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    /// let mut list = List::from([1, 3, 5, 8]);
    /// list.reverse();
    /// assert_eq!(list.into_vec(), vec![8, 5, 3, 1]);
    /// ```
    pub fn reverse(&mut self) {
        let ghost = self.ghost_node();
        let mut node = ghost;
        // SAFETY: every node of the ring, the ghost included, is visited once;
        // the old `next` is followed after the swap as the new `prev`.
        unsafe {
            loop {
                let links = &mut *node.as_ptr();
                mem::swap(&mut links.next, &mut links.prev);
                node = links.prev;
                if node == ghost {
                    break;
                }
            }
        }
        #[cfg(feature = "verify")]
        self.verify_ring();
    }
}

#[cfg(test)]
mod tests {
    use crate::list::testing::{CloneBomb, CountingProvider};
    use crate::List;
    use std::cell::Cell;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::rc::Rc;
    use test_case::test_case;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn sort_reverse_and_splice() {
        let mut list = List::from([5, 3, 8, 1]);
        list.sort();
        assert_eq!(list.to_vec(), vec![1, 3, 5, 8]);
        list.reverse();
        list.verify_ring();
        assert_eq!(list.to_vec(), vec![8, 5, 3, 1]);

        let mut a = List::from([1, 2]);
        let mut b = List::from([3, 4]);
        a.append(&mut b);
        assert_eq!(a.into_vec(), vec![1, 2, 3, 4]);
        assert!(b.is_empty());
    }

    #[test_case(vec![] ; "empty")]
    #[test_case(vec![1] ; "single")]
    #[test_case(vec![1, 2, 3, 4, 5] ; "odd")]
    fn reverse_twice(input: Vec<i32>) {
        let mut list = List::from(input.clone());
        list.reverse();
        list.verify_ring();
        assert_eq!(list.to_vec(), input.iter().rev().copied().collect::<Vec<_>>());
        list.reverse();
        list.verify_ring();
        assert_eq!(list.into_vec(), input);
    }

    #[test]
    fn reverse_moves_no_element() {
        let mut list = List::from([1, 2, 3]);
        let first: *const i32 = list.front().unwrap();
        list.reverse();
        assert!(std::ptr::eq(first, list.back().unwrap()));
    }

    #[test_case(vec![1, 1, 2, 2, 2, 3] => vec![1, 2, 3] ; "runs")]
    #[test_case(vec![] => Vec::<i32>::new() ; "empty")]
    #[test_case(vec![7, 7, 7] => vec![7] ; "all equal")]
    #[test_case(vec![1, 2, 1] => vec![1, 2, 1] ; "only adjacent")]
    fn dedup(input: Vec<i32>) -> Vec<i32> {
        let mut list = List::from(input);
        list.dedup();
        list.verify_ring();
        list.into_vec()
    }

    #[test]
    fn dedup_compares_with_the_last_kept() {
        let mut list = List::from([0, 1, 2, 3, 4, 5]);
        // each neighbour differs by one, but the reference only moves on a gap of two
        list.dedup_by(|a, b| *a - *b < 2);
        assert_eq!(list.into_vec(), vec![0, 2, 4]);

        let mut words = List::from(["a", "A", "b", "B", "a"]);
        words.dedup_by_key(|w| w.to_ascii_lowercase());
        assert_eq!(words.into_vec(), vec!["a", "b", "a"]);
    }

    #[test]
    fn remove_if_extremes() {
        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.extend(0..10);
        assert_eq!(list.remove_if(|_| false), 0);
        assert_eq!(list.to_vec(), (0..10).collect::<Vec<_>>());
        assert_eq!(list.remove_if(|_| true), 10);
        assert!(list.is_empty());
        list.verify_ring();
        assert_eq!(provider.outstanding(), 0);
    }

    #[test]
    fn retain_and_remove_value() {
        let mut list = List::from([1, 2, 3, 2, 4, 2]);
        assert_eq!(list.remove_value(&2), 3);
        assert_eq!(list.to_vec(), vec![1, 3, 4]);
        list.retain(|&x| x != 3);
        assert_eq!(list.into_vec(), vec![1, 4]);
    }

    #[test]
    fn merge_by_leaves_the_donor_empty() {
        let mut list = List::from([9, 5, 1]);
        let mut other = List::from([8, 6, 2]);
        list.merge_by(&mut other, |a, b| b.cmp(a)).unwrap();
        assert!(other.is_empty());
        other.verify_ring();
        assert_eq!(list.into_vec(), vec![9, 8, 6, 5, 2, 1]);
    }

    #[test]
    fn sort_by_key_is_stable() {
        let mut list = List::from([(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')]);
        list.sort_by_key(|&(k, _)| k);
        assert_eq!(list.into_vec(), vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn comparisons_and_hash() {
        let a = List::from([1, 2, 3]);
        let b = List::from([1, 2, 4]);
        assert!(a < b);
        assert_ne!(a, b);
        assert_eq!(a, List::from([1, 2, 3]));
        assert_eq!(hash_of(&a), hash_of(&List::from([1, 2, 3])));
        assert_ne!(
            hash_of(&List::from([List::from([1]), List::new()])),
            hash_of(&List::from([List::new(), List::from([1])]))
        );
    }

    #[test]
    fn clone_keeps_the_provider() {
        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.extend([1, 2, 3]);
        let copy = list.clone();
        assert_eq!(copy, list);
        assert_eq!(provider.outstanding(), 6);
    }

    #[test]
    fn clone_from_reuses_nodes() {
        let provider = CountingProvider::new();
        let mut target = List::new_in(provider.clone());
        target.extend([0; 4]);
        let mut source = List::new_in(provider.clone());
        source.extend([1, 2]);
        let before = provider.total_allocations();

        target.clone_from(&source);
        assert_eq!(target.to_vec(), vec![1, 2]);
        assert_eq!(provider.total_allocations(), before);

        source.extend([3, 4, 5]);
        let before = provider.total_allocations();
        target.clone_from(&source);
        assert_eq!(target.to_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(provider.total_allocations(), before + 3);
        target.verify_ring();
    }

    #[test]
    fn panicking_clone_releases_the_copy() {
        let budget = Rc::new(Cell::new(2));
        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.extend((0..4).map(|i| CloneBomb::new(i, &budget)));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| list.clone()));
        assert!(result.is_err());
        assert_eq!(provider.outstanding(), 4);
        assert_eq!(list.iter().map(|b| b.value).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use crate::List;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sort_is_a_sorted_permutation(input in prop::collection::vec(any::<i32>(), 0..200)) {
            let mut list = List::from(input.clone());
            list.sort();
            list.verify_ring();
            let mut expected = input;
            expected.sort();
            prop_assert_eq!(list.into_vec(), expected);
        }

        #[test]
        fn remove_if_matches_retain(
            input in prop::collection::vec(0u8..10, 0..100),
            cut in 0u8..10,
        ) {
            let mut list = List::from(input.clone());
            let removed = list.remove_if(|&x| x < cut);
            list.verify_ring();
            let mut expected = input.clone();
            expected.retain(|&x| x >= cut);
            prop_assert_eq!(removed, input.len() - expected.len());
            prop_assert_eq!(list.into_vec(), expected);
        }

        #[test]
        fn dedup_matches_vec(input in prop::collection::vec(0u8..4, 0..100)) {
            let mut list = List::from(input.clone());
            list.dedup();
            list.verify_ring();
            let mut expected = input;
            expected.dedup();
            prop_assert_eq!(list.into_vec(), expected);
        }
    }
}
