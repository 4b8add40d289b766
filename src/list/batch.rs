//! Multi-node mutation: batch construction, range erasure, resize and assign.
//!
//! Every batch insertion first builds a detached chain with a
//! [`ChainBuilder`], and attaches it only once every element exists. A failed
//! or panicking construction drops the builder, which releases the nodes built
//! so far, so the list is never observed half-filled.

use crate::error::{ListError, TryBuildError};
use crate::list::chain::{Chain, ChainBuilder};
use crate::list::provider::{Heap, NodeProvider};
use crate::list::{next, List};
use std::convert::Infallible;
use std::ops::{Bound, RangeBounds};

impl<T, P: NodeProvider> List<T, P> {
    /// Build a detached chain of `n` elements produced by `f`.
    fn build_with<E, F>(&self, n: usize, mut f: F) -> Result<Option<Chain<T>>, TryBuildError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.check_grow(n)?;
        let mut builder = ChainBuilder::for_list(self);
        for _ in 0..n {
            builder.push_with(&mut f)?;
        }
        Ok(builder.finish())
    }

    /// Build a detached chain from every element of `iter`.
    fn build_iter<I>(&self, iter: I) -> Result<Option<Chain<T>>, ListError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut builder = ChainBuilder::for_list(self);
        for element in iter {
            builder.push(element)?;
        }
        Ok(builder.finish())
    }

    /// Resolve `range` into `start..end` indices.
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or reaches past the end of the list.
    pub(crate) fn resolve_range<R: RangeBounds<usize>>(&self, range: R) -> (usize, usize) {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };
        assert!(
            start <= end,
            "range start {} is greater than range end {}",
            start,
            end
        );
        assert!(
            end <= self.len,
            "range end {} is out of bounds for a list of length {}",
            end,
            self.len
        );
        (start, end)
    }

    /// Detach the nodes of `range`, or `None` if it is empty.
    pub(crate) fn detach_range<R: RangeBounds<usize>>(&mut self, range: R) -> Option<Chain<T>> {
        let (start, end) = self.resolve_range(range);
        if start == end {
            return None;
        }
        let front = self.node_at(start);
        let mut back = front;
        // SAFETY: `start..end` is in bounds, so the walk stays on element nodes.
        (1..end - start).for_each(|_| back = unsafe { next(back) });
        // SAFETY: `front..=back` is a run of `end - start` nodes of this list.
        unsafe { Some(self.detach(front, back, end - start)) }
    }

    /// Inserts `n` clones of `value` before the element at index `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at > len` or the list would exceed [`List::max_len`].
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 4]);
    /// list.insert_n(1, 2, 0);
    /// assert_eq!(list.into_vec(), vec![1, 0, 0, 4]);
    /// ```
    pub fn insert_n(&mut self, at: usize, n: usize, value: T)
    where
        T: Clone,
    {
        if let Err(err) = self.try_insert_n(at, n, value) {
            err.raise()
        }
    }

    /// Like [`List::insert_n`], but reports allocation and length failures.
    /// On failure the list is unchanged.
    pub fn try_insert_n(&mut self, at: usize, n: usize, value: T) -> Result<(), ListError>
    where
        T: Clone,
    {
        self.try_insert_with(at, n, || Ok::<_, Infallible>(value.clone()))
            .map_err(TryBuildError::into_list_error)
    }

    /// Inserts `n` elements built by `f` before the element at index `at`.
    ///
    /// The new elements are attached only after all `n` were built. If `f`
    /// fails (or panics) on the k-th element, the k - 1 elements built before
    /// it are dropped and their nodes released, and the list is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::{List, TryBuildError};
    ///
    /// let mut list = List::from([0, 9]);
    /// let mut digits = "1234x".chars();
    /// let err = list
    ///     .try_insert_with(1, 5, || digits.next().unwrap().to_digit(10).ok_or("bad digit"))
    ///     .unwrap_err();
    ///
    /// assert_eq!(err, TryBuildError::Construct("bad digit"));
    /// assert_eq!(list.into_vec(), vec![0, 9]);
    /// ```
    pub fn try_insert_with<E, F>(&mut self, at: usize, n: usize, f: F) -> Result<(), TryBuildError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        assert!(
            at <= self.len,
            "Cannot insert at an index outside of the list bounds"
        );
        let pos = self.node_at(at);
        if let Some(chain) = self.build_with(n, f)? {
            // SAFETY: `pos` is a node of this list.
            unsafe { self.attach(pos, chain) };
        }
        Ok(())
    }

    /// Inserts every element of `iter` before the element at index `at`,
    /// keeping their order.
    ///
    /// # Panics
    ///
    /// Panics if `at > len` or the list would exceed [`List::max_len`].
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 5]);
    /// list.insert_iter(1, 2..5);
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn insert_iter<I>(&mut self, at: usize, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        if let Err(err) = self.try_insert_iter(at, iter) {
            err.raise()
        }
    }

    /// Like [`List::insert_iter`], but reports allocation and length failures.
    /// On failure the list is unchanged; the elements taken from `iter` so far
    /// are dropped.
    pub fn try_insert_iter<I>(&mut self, at: usize, iter: I) -> Result<(), ListError>
    where
        I: IntoIterator<Item = T>,
    {
        assert!(
            at <= self.len,
            "Cannot insert at an index outside of the list bounds"
        );
        let pos = self.node_at(at);
        if let Some(chain) = self.build_iter(iter)? {
            // SAFETY: `pos` is a node of this list.
            unsafe { self.attach(pos, chain) };
        }
        Ok(())
    }

    /// Appends every element of `iter`, all or nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1]);
    /// list.try_extend([2, 3]).unwrap();
    /// assert_eq!(list.into_vec(), vec![1, 2, 3]);
    /// ```
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), ListError>
    where
        I: IntoIterator<Item = T>,
    {
        self.try_insert_iter(self.len, iter)
    }

    /// Removes the elements in `range` and returns how many were removed.
    ///
    /// The range is detached in *O*(1) after walking to it; dropping the
    /// removed elements is *O*(*m*) in their number.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter(0..6);
    /// assert_eq!(list.erase(1..4), 3);
    /// assert_eq!(list.into_vec(), vec![0, 4, 5]);
    /// ```
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
        match self.detach_range(range) {
            Some(chain) => {
                let len = chain.len;
                chain.free(&self.provider);
                len
            }
            None => 0,
        }
    }

    /// Shortens the list, keeping the first `len` elements and dropping the
    /// rest. Does nothing if `len` is not less than the current length.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.erase(len..);
        }
    }

    /// Resizes the list in-place so that `len` is equal to `new_len`.
    ///
    /// If growing, clones of `value` are appended; if shrinking, the trailing
    /// elements are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from(["a"]);
    /// list.resize(3, "b");
    /// assert_eq!(list.to_vec(), vec!["a", "b", "b"]);
    ///
    /// list.resize(1, "c");
    /// assert_eq!(list.to_vec(), vec!["a"]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if let Err(err) = self.try_resize(new_len, value) {
            err.raise()
        }
    }

    /// Like [`List::resize`], but reports allocation and length failures.
    /// On failure the list is unchanged.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), ListError>
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.try_insert_n(self.len, new_len - self.len, value)
    }

    /// Resizes the list in-place, filling new slots with the values `f`
    /// returns.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            return self.truncate(new_len);
        }
        if let Err(err) = self.try_insert_with(self.len, new_len - self.len, || {
            Ok::<_, Infallible>(f())
        }) {
            err.raise()
        }
    }

    /// Replaces the contents with `n` clones of `value`.
    ///
    /// Existing elements are overwritten in place; missing ones are appended
    /// and surplus ones dropped.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`List::max_len`]. The list is unchanged then.
    /// An allocation failure while growing aborts after the existing elements
    /// were already overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// list.assign(2, 7);
    /// assert_eq!(list.to_vec(), vec![7, 7]);
    ///
    /// list.assign(4, 8);
    /// assert_eq!(list.to_vec(), vec![8, 8, 8, 8]);
    /// ```
    pub fn assign(&mut self, n: usize, value: T)
    where
        T: Clone,
    {
        if let Err(err) = self.check_grow(n.saturating_sub(self.len)) {
            err.raise()
        }
        self.iter_mut().take(n).for_each(|x| x.clone_from(&value));
        self.resize(n, value);
    }

    /// Replaces the contents with the elements of `iter`.
    ///
    /// Existing elements are overwritten in place while both sequences last;
    /// the remainder of `iter` is appended, or the leftover tail is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// list.assign_iter([4, 5]);
    /// assert_eq!(list.to_vec(), vec![4, 5]);
    ///
    /// list.assign_iter(6..10);
    /// assert_eq!(list.to_vec(), vec![6, 7, 8, 9]);
    /// ```
    pub fn assign_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut iter = iter.into_iter();
        let mut kept = 0;
        for slot in self.iter_mut() {
            match iter.next() {
                Some(value) => *slot = value,
                None => break,
            }
            kept += 1;
        }
        if kept < self.len {
            self.truncate(kept);
        } else {
            self.extend(iter);
        }
    }
}

impl<T: Clone> List<T> {
    /// Creates a list holding `n` clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let list = List::from_elem("x", 3);
    /// assert_eq!(list.into_vec(), vec!["x", "x", "x"]);
    /// ```
    pub fn from_elem(value: T, n: usize) -> Self {
        Self::try_from_elem_in(value, n, Heap).unwrap_or_else(|err| err.raise())
    }
}

impl<T, P: NodeProvider> List<T, P> {
    /// Creates a list holding `n` clones of `value`, with nodes from `provider`.
    pub fn try_from_elem_in(value: T, n: usize, provider: P) -> Result<Self, ListError>
    where
        T: Clone,
    {
        let mut list = Self::new_in(provider);
        list.try_insert_n(0, n, value)?;
        Ok(list)
    }

    /// Creates a list of `n` elements built by `f`, with nodes from `provider`.
    ///
    /// If any construction fails, every element built so far is dropped, every
    /// node is released, and the error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::{Heap, List};
    ///
    /// let mut next = 0;
    /// let list = List::try_from_fn_in(3, || { next += 1; Ok::<_, ()>(next * 10) }, Heap).unwrap();
    /// assert_eq!(list.into_vec(), vec![10, 20, 30]);
    /// ```
    pub fn try_from_fn_in<E, F>(n: usize, f: F, provider: P) -> Result<Self, TryBuildError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut list = Self::new_in(provider);
        list.try_insert_with(0, n, f)?;
        Ok(list)
    }
}

impl<T, P: NodeProvider> Extend<T> for List<T, P> {
    /// Appends every element of `iter`. The whole batch is attached at once.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(err) = self.try_extend(iter) {
            err.raise()
        }
    }
}

impl<'a, T: 'a + Copy, P: NodeProvider> Extend<&'a T> for List<T, P> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ListError, TryBuildError};
    use crate::list::testing::{CloneBomb, CountingProvider};
    use crate::List;
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;
    use test_case::test_case;

    #[test_case(0 ; "first construction fails")]
    #[test_case(4 ; "fifth construction fails")]
    #[test_case(9 ; "last construction fails")]
    fn failing_construction_unwinds_the_batch(k: usize) {
        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.extend([100, 200]);
        let mut built = 0;
        let err = list
            .try_insert_with(1, 10, || {
                if built == k {
                    return Err("construction failed");
                }
                built += 1;
                Ok(built)
            })
            .unwrap_err();
        assert_eq!(err, TryBuildError::Construct("construction failed"));
        list.verify_ring();
        assert_eq!(list.to_vec(), vec![100, 200]);
        assert_eq!(provider.outstanding(), 2);
    }

    #[test_case(0 ; "first allocation fails")]
    #[test_case(6 ; "seventh allocation fails")]
    fn failing_allocation_unwinds_the_batch(k: usize) {
        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.extend(0..3);
        provider.fail_after(k);
        let err = list.try_insert_n(3, 10, 7).unwrap_err();
        assert!(matches!(err, ListError::AllocFailed { .. }));
        assert_eq!(list.to_vec(), vec![0, 1, 2]);
        assert_eq!(provider.outstanding(), 3);
        assert_eq!(provider.total_allocations(), 3 + k);
    }

    #[test]
    fn panicking_clone_unwinds_the_batch() {
        let provider = CountingProvider::new();
        let budget = Rc::new(Cell::new(3));
        let mut list = List::new_in(provider.clone());
        list.push_back(CloneBomb::new(1, &budget));
        let value = CloneBomb::new(2, &budget);
        let result = catch_unwind(AssertUnwindSafe(|| list.insert_n(0, 5, value)));
        assert!(result.is_err());
        list.verify_ring();
        assert_eq!(list.len(), 1);
        assert_eq!(list.front().map(|x| x.value), Some(1));
        assert_eq!(provider.outstanding(), 1);
    }

    #[test]
    fn length_bound_is_checked_first() {
        let provider = CountingProvider::with_max_len(5);
        let mut list = List::new_in(provider.clone());
        list.extend(0..3);
        assert_eq!(
            list.try_insert_n(0, 3, 9),
            Err(ListError::LengthExceeded {
                len: 3,
                additional: 3,
                max: 5
            })
        );
        assert_eq!(provider.total_allocations(), 3);
        assert_eq!(
            list.try_extend(10..13),
            Err(ListError::LengthExceeded {
                len: 3,
                additional: 3,
                max: 5
            })
        );
        assert_eq!(list.to_vec(), vec![0, 1, 2]);
        assert_eq!(provider.outstanding(), 3);
        list.try_extend(10..12).unwrap();
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn failed_constructor_releases_the_new_list() {
        let provider = CountingProvider::new();
        let mut calls = 0;
        let result = List::try_from_fn_in(
            4,
            || {
                calls += 1;
                if calls == 3 {
                    Err(())
                } else {
                    Ok(calls.to_string())
                }
            },
            provider.clone(),
        );
        assert_eq!(result.unwrap_err(), TryBuildError::Construct(()));
        assert_eq!(provider.outstanding(), 0);

        let list = List::try_from_elem_in('z', 3, provider.clone()).unwrap();
        assert_eq!(list.to_vec(), vec!['z'; 3]);
        assert_eq!(provider.outstanding(), 3);
    }

    #[test_case((..), 5 => Vec::<i32>::new() ; "everything")]
    #[test_case((..2), 2 => vec![2, 3, 4] ; "prefix")]
    #[test_case((3..), 2 => vec![0, 1, 2] ; "suffix")]
    #[test_case((1..=3), 3 => vec![0, 4] ; "inclusive")]
    #[test_case((5..), 0 => vec![0, 1, 2, 3, 4] ; "empty at end")]
    fn erase<R: std::ops::RangeBounds<usize>>(range: R, removed: usize) -> Vec<i32> {
        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.extend(0..5);
        assert_eq!(list.erase(range), removed);
        list.verify_ring();
        assert_eq!(provider.outstanding(), list.len());
        list.into_vec()
    }

    #[test]
    #[should_panic(expected = "range end 4 is out of bounds for a list of length 3")]
    fn erase_past_the_end() {
        List::from([1, 2, 3]).erase(1..4);
    }

    #[test]
    fn resize_both_ways() {
        let mut list = List::from([1]);
        list.resize(4, 0);
        assert_eq!(list.to_vec(), vec![1, 0, 0, 0]);
        list.resize(2, 9);
        assert_eq!(list.to_vec(), vec![1, 0]);
        let mut n = 10;
        list.resize_with(4, || {
            n += 1;
            n
        });
        assert_eq!(list.to_vec(), vec![1, 0, 11, 12]);
        list.resize_with(0, || unreachable!());
        assert!(list.is_empty());
        list.verify_ring();
    }

    #[test]
    fn assign_reuses_nodes() {
        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.extend(0..4);
        list.assign_iter([7, 8]);
        assert_eq!(list.to_vec(), vec![7, 8]);
        assert_eq!(provider.total_allocations(), 4);

        list.assign(3, 5);
        assert_eq!(list.to_vec(), vec![5, 5, 5]);
        assert_eq!(provider.total_allocations(), 5);
        list.verify_ring();
    }
}
