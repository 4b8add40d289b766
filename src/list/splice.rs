//! Whole-list and index-based splicing.
//!
//! Moving nodes between two lists always detaches a [`Chain`] from one list
//! before attaching it to the other, and checks the receiving list's length
//! bound before anything is unlinked. Moves inside one list rewrite links in
//! place and cannot fail.

use crate::error::ListError;
use crate::list::chain::{relink, Chain};
use crate::list::provider::NodeProvider;
use crate::list::{next, List};
use std::ops::RangeBounds;

impl<T, P: NodeProvider> List<T, P> {
    /// A new list owning `chain`.
    pub(crate) fn from_chain(provider: P, chain: Chain<T>) -> Self {
        let mut list = Self::new_in(provider);
        list.attach_back(chain);
        list
    }

    /// Moves all elements of `other` in front of the element at index `at`,
    /// leaving `other` empty.
    ///
    /// Walking to `at` is *O*(*n*); the move itself is *O*(1) regardless of how
    /// many elements `other` holds. If the combined length would exceed
    /// [`List::max_len`], nothing moves and an error is returned.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 4]);
    /// let mut other = List::from([2, 3]);
    /// list.splice_at(1, &mut other).unwrap();
    ///
    /// assert!(other.is_empty());
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 4]);
    /// ```
    pub fn splice_at(&mut self, at: usize, other: &mut Self) -> Result<(), ListError> {
        self.cursor_mut(at).splice(other)
    }

    /// Moves all elements of `other` to the back of the list, leaving `other`
    /// empty.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Panics
    ///
    /// Panics if the combined length would exceed [`List::max_len`].
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 2]);
    /// let mut other = List::from([3, 4]);
    /// list.append(&mut other);
    ///
    /// assert!(other.is_empty());
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 4]);
    /// ```
    pub fn append(&mut self, other: &mut Self) {
        if let Err(err) = self.cursor_end_mut().splice(other) {
            err.raise()
        }
    }

    /// Moves all elements of `other` to the front of the list, leaving `other`
    /// empty.
    ///
    /// # Panics
    ///
    /// Panics if the combined length would exceed [`List::max_len`].
    pub fn prepend(&mut self, other: &mut Self) {
        if let Err(err) = self.cursor_start_mut().splice(other) {
            err.raise()
        }
    }

    /// Splits the list into two at the given index. Returns everything after the
    /// given index, including the index.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// let tail = list.split_off(1);
    ///
    /// assert_eq!(list.into_vec(), vec![1]);
    /// assert_eq!(tail.into_vec(), vec![2, 3]);
    /// ```
    pub fn split_off(&mut self, at: usize) -> Self
    where
        P: Clone,
    {
        let provider = self.provider.clone();
        self.cursor_mut(at)
            .split()
            .unwrap_or_else(|| Self::new_in(provider))
    }

    /// Moves the element at index `from` so that it sits right before the
    /// element currently at index `to`. `to == len` moves it to the back.
    ///
    /// Nothing happens when `to == from` or `to == from + 1`, since the
    /// element already sits there.
    ///
    /// # Panics
    ///
    /// Panics if `from >= len` or `to > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from(['a', 'b', 'c', 'd']);
    /// list.relocate(3, 1);
    /// assert_eq!(list.to_vec(), vec!['a', 'd', 'b', 'c']);
    ///
    /// list.relocate(0, 4);
    /// assert_eq!(list.to_vec(), vec!['d', 'b', 'c', 'a']);
    /// ```
    pub fn relocate(&mut self, from: usize, to: usize) {
        assert!(
            from < self.len,
            "Cannot relocate from an index outside of the list bounds"
        );
        assert!(
            to <= self.len,
            "Cannot relocate to an index outside of the list bounds"
        );
        if to == from || to == from + 1 {
            return;
        }
        let (node, pos) = (self.node_at(from), self.node_at(to));
        tracing::trace!(from, to, "relocated an element");
        // SAFETY: `node` is a non-ghost node of this list, and `pos` is a
        // different node (or the ghost) of the same list.
        unsafe { relink(node, node, pos) };
        #[cfg(feature = "verify")]
        self.verify_ring();
    }

    /// Moves the elements in `range` so that they sit right before the element
    /// currently at index `to`, keeping their order.
    ///
    /// Nothing happens when `to` lies within `start..=end`, or the range is
    /// empty.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or `to > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter(0..6);
    /// list.relocate_range(3..5, 0);
    /// assert_eq!(list.into_vec(), vec![3, 4, 0, 1, 2, 5]);
    /// ```
    pub fn relocate_range<R: RangeBounds<usize>>(&mut self, range: R, to: usize) {
        let (start, end) = self.resolve_range(range);
        assert!(
            to <= self.len,
            "Cannot relocate to an index outside of the list bounds"
        );
        if start == end || (start..=end).contains(&to) {
            return;
        }
        let front = self.node_at(start);
        let mut back = front;
        // SAFETY: `start..end` is in bounds, so the walk stays on element nodes.
        (1..end - start).for_each(|_| back = unsafe { next(back) });
        let pos = self.node_at(to);
        tracing::trace!(start, end, to, "relocated a run");
        // SAFETY: `front..=back` is a run of this list and `pos` lies outside it.
        unsafe { relink(front, back, pos) };
        #[cfg(feature = "verify")]
        self.verify_ring();
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ListError;
    use crate::list::testing::CountingProvider;
    use crate::List;
    use test_case::test_case;

    #[test_case(0, 3 => vec![1, 2, 0, 3, 4] ; "front to middle")]
    #[test_case(4, 0 => vec![4, 0, 1, 2, 3] ; "back to front")]
    #[test_case(1, 5 => vec![0, 2, 3, 4, 1] ; "middle to back")]
    #[test_case(2, 2 => vec![0, 1, 2, 3, 4] ; "onto itself")]
    #[test_case(2, 3 => vec![0, 1, 2, 3, 4] ; "before its successor")]
    fn relocate(from: usize, to: usize) -> Vec<i32> {
        let mut list = List::from_iter(0..5);
        list.relocate(from, to);
        list.verify_ring();
        list.into_vec()
    }

    #[test_case(1..3, 5 => vec![0, 3, 4, 1, 2] ; "run to back")]
    #[test_case((3..), 0 => vec![3, 4, 0, 1, 2] ; "tail to front")]
    #[test_case(1..3, 1 => vec![0, 1, 2, 3, 4] ; "target at start")]
    #[test_case(1..3, 3 => vec![0, 1, 2, 3, 4] ; "target at end")]
    #[test_case(2..2, 0 => vec![0, 1, 2, 3, 4] ; "empty run")]
    fn relocate_range<R: std::ops::RangeBounds<usize>>(range: R, to: usize) -> Vec<i32> {
        let mut list = List::from_iter(0..5);
        list.relocate_range(range, to);
        list.verify_ring();
        list.into_vec()
    }

    #[test]
    #[should_panic(expected = "Cannot relocate from an index outside of the list bounds")]
    fn relocate_from_the_ghost() {
        List::from([1, 2]).relocate(2, 0);
    }

    #[test]
    fn splice_conserves_elements() {
        let provider = CountingProvider::new();
        let mut a = List::new_in(provider.clone());
        a.extend([1, 2]);
        let mut b = List::new_in(provider.clone());
        b.extend([3, 4]);
        a.append(&mut b);
        assert_eq!(a.to_vec(), vec![1, 2, 3, 4]);
        assert!(b.is_empty());
        b.verify_ring();

        b.extend([-1, 0]);
        a.prepend(&mut b);
        a.splice_at(6, &mut List::new_in(provider.clone())).unwrap();
        a.verify_ring();
        assert_eq!(a.to_vec(), vec![-1, 0, 1, 2, 3, 4]);
        assert_eq!(provider.outstanding(), 6);
    }

    #[test]
    fn splice_at_rejects_overflow() {
        let provider = CountingProvider::with_max_len(3);
        let mut a = List::new_in(provider.clone());
        a.extend([1, 2]);
        let mut b = List::new_in(provider);
        b.extend([3, 4]);
        assert_eq!(
            a.splice_at(0, &mut b),
            Err(ListError::LengthExceeded {
                len: 2,
                additional: 2,
                max: 3
            })
        );
        assert_eq!(a.to_vec(), vec![1, 2]);
        assert_eq!(b.to_vec(), vec![3, 4]);
    }

    #[test]
    fn split_off_at_both_ends() {
        let mut list = List::from_iter(0..3);
        let mut all = list.split_off(0);
        assert!(list.is_empty());
        list.verify_ring();
        let none = all.split_off(3);
        assert!(none.is_empty());
        assert_eq!(all.into_vec(), vec![0, 1, 2]);
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use crate::list::testing::CountingProvider;
    use crate::List;
    use proptest::prelude::*;

    /// One edit, applied to the first list when the flag is set and to the
    /// second otherwise. Indices are reduced modulo the length when applied.
    #[derive(Debug, Clone)]
    enum Op {
        Insert(bool, usize, i32),
        Remove(bool, usize),
        Erase(bool, usize, usize),
        Resize(bool, usize, i32),
        Assign(bool, usize, i32),
        AssignIter(bool, Vec<i32>),
        SpliceAt(bool, usize),
        Relocate(bool, usize, usize),
        RelocateRange(bool, usize, usize, usize),
        SplitOff(bool, usize),
        Append(bool),
    }

    fn op() -> impl Strategy<Value = Op> {
        let elem = || 0i32..100;
        prop_oneof![
            (any::<bool>(), any::<usize>(), elem()).prop_map(|(s, at, v)| Op::Insert(s, at, v)),
            (any::<bool>(), any::<usize>()).prop_map(|(s, at)| Op::Remove(s, at)),
            (any::<bool>(), any::<usize>(), any::<usize>()).prop_map(|(s, x, y)| Op::Erase(s, x, y)),
            (any::<bool>(), 0usize..12, elem()).prop_map(|(s, n, v)| Op::Resize(s, n, v)),
            (any::<bool>(), 0usize..12, elem()).prop_map(|(s, n, v)| Op::Assign(s, n, v)),
            (any::<bool>(), prop::collection::vec(elem(), 0..8))
                .prop_map(|(s, vs)| Op::AssignIter(s, vs)),
            (any::<bool>(), any::<usize>()).prop_map(|(s, at)| Op::SpliceAt(s, at)),
            (any::<bool>(), any::<usize>(), any::<usize>())
                .prop_map(|(s, from, to)| Op::Relocate(s, from, to)),
            (any::<bool>(), any::<usize>(), any::<usize>(), any::<usize>())
                .prop_map(|(s, x, y, to)| Op::RelocateRange(s, x, y, to)),
            (any::<bool>(), any::<usize>()).prop_map(|(s, at)| Op::SplitOff(s, at)),
            any::<bool>().prop_map(Op::Append),
        ]
    }

    fn ordered(x: usize, y: usize, len: usize) -> (usize, usize) {
        let (x, y) = (x % (len + 1), y % (len + 1));
        (x.min(y), x.max(y))
    }

    proptest! {
        #[test]
        fn mixed_edits_match_a_vec(ops in prop::collection::vec(op(), 0..60)) {
            let provider = CountingProvider::new();
            let mut a = List::new_in(provider.clone());
            let mut b = List::new_in(provider.clone());
            let (mut va, mut vb) = (Vec::new(), Vec::new());

            for op in ops {
                let first = match op {
                    Op::Insert(s, ..)
                    | Op::Remove(s, _)
                    | Op::Erase(s, ..)
                    | Op::Resize(s, ..)
                    | Op::Assign(s, ..)
                    | Op::AssignIter(s, _)
                    | Op::SpliceAt(s, _)
                    | Op::Relocate(s, ..)
                    | Op::RelocateRange(s, ..)
                    | Op::SplitOff(s, _)
                    | Op::Append(s) => s,
                };
                let (list, model, other, other_model) = if first {
                    (&mut a, &mut va, &mut b, &mut vb)
                } else {
                    (&mut b, &mut vb, &mut a, &mut va)
                };
                let len = list.len();

                match op {
                    Op::Insert(_, at, v) => {
                        let at = at % (len + 1);
                        list.insert(at, v);
                        model.insert(at, v);
                    }
                    Op::Remove(_, at) => {
                        if len > 0 {
                            let at = at % len;
                            prop_assert_eq!(list.remove(at), model.remove(at));
                        }
                    }
                    Op::Erase(_, x, y) => {
                        let (lo, hi) = ordered(x, y, len);
                        prop_assert_eq!(list.erase(lo..hi), hi - lo);
                        model.drain(lo..hi);
                    }
                    Op::Resize(_, n, v) => {
                        list.resize(n, v);
                        model.resize(n, v);
                    }
                    Op::Assign(_, n, v) => {
                        list.assign(n, v);
                        *model = vec![v; n];
                    }
                    Op::AssignIter(_, vs) => {
                        list.assign_iter(vs.iter().copied());
                        *model = vs;
                    }
                    Op::SpliceAt(_, at) => {
                        let at = at % (len + 1);
                        list.splice_at(at, other).unwrap();
                        model.splice(at..at, other_model.drain(..));
                    }
                    Op::Relocate(_, from, to) => {
                        if len > 0 {
                            let (from, to) = (from % len, to % (len + 1));
                            list.relocate(from, to);
                            if to != from && to != from + 1 {
                                let x = model.remove(from);
                                model.insert(if to > from { to - 1 } else { to }, x);
                            }
                        }
                    }
                    Op::RelocateRange(_, x, y, to) => {
                        let (lo, hi) = ordered(x, y, len);
                        let to = to % (len + 1);
                        list.relocate_range(lo..hi, to);
                        if lo != hi && !(lo..=hi).contains(&to) {
                            let run: Vec<_> = model.drain(lo..hi).collect();
                            let to = if to > hi { to - (hi - lo) } else { to };
                            model.splice(to..to, run);
                        }
                    }
                    Op::SplitOff(_, at) => {
                        let at = at % (len + 1);
                        let mut tail = list.split_off(at);
                        let tail_model = model.split_off(at);
                        prop_assert_eq!(tail.to_vec(), tail_model.clone());
                        other.append(&mut tail);
                        other_model.extend(tail_model);
                        prop_assert!(tail.is_empty());
                    }
                    Op::Append(_) => {
                        list.append(other);
                        model.append(other_model);
                    }
                }

                a.verify_ring();
                b.verify_ring();
                prop_assert_eq!(a.to_vec(), va.clone());
                prop_assert_eq!(b.to_vec(), vb.clone());
                prop_assert_eq!(provider.outstanding(), a.len() + b.len());
            }
        }
    }
}
