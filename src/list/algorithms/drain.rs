use crate::list::chain::Chain;
use crate::list::cursor::CursorMut;
use crate::list::provider::{Heap, NodeProvider};
use crate::list::{element, next, prev, take_node, Link, List, Node};
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// An iterator over the values removed by [`List::drain`].
///
/// The range is unlinked from the list as soon as the `Drain` is created, so
/// the list is already consistent while it is iterated. Dropping the `Drain`
/// drops whatever it did not yield.
pub struct Drain<'a, T: 'a, P: NodeProvider = Heap> {
    front: Link,
    back: Link,
    len: usize,
    provider: &'a P,
    _marker: PhantomData<Box<Node<T>>>,
}

impl<'a, T: 'a, P: NodeProvider> Drain<'a, T, P> {
    pub(crate) fn new(list: &'a mut List<T, P>, chain: Option<Chain<T>>) -> Self {
        let list: &'a List<T, P> = list;
        let (front, back, len) = match chain {
            Some(chain) => (chain.front, chain.back, chain.len),
            None => (list.ghost_node(), list.ghost_node(), 0),
        };
        Self {
            front,
            back,
            len,
            provider: &list.provider,
            _marker: PhantomData,
        }
    }
}

impl<T, P: NodeProvider> Iterator for Drain<'_, T, P> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.front;
        self.len -= 1;
        // SAFETY: the drain owns `len` detached nodes starting at `front`. The
        // successor is only read while another node remains.
        unsafe {
            if self.len > 0 {
                self.front = next(node);
            }
            Some(take_node::<T, P>(self.provider, node))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T, P: NodeProvider> DoubleEndedIterator for Drain<'_, T, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.back;
        self.len -= 1;
        // SAFETY: as in `next`, from the other end.
        unsafe {
            if self.len > 0 {
                self.back = prev(node);
            }
            Some(take_node::<T, P>(self.provider, node))
        }
    }
}

impl<T, P: NodeProvider> ExactSizeIterator for Drain<'_, T, P> {}

impl<T, P: NodeProvider> FusedIterator for Drain<'_, T, P> {}

impl<T, P: NodeProvider> Drop for Drain<'_, T, P> {
    fn drop(&mut self) {
        if self.len > 0 {
            // SAFETY: `front..=back` are the `len` nodes not yielded yet.
            let rest = unsafe { Chain::<T>::new(self.front, self.back, self.len) };
            self.len = 0;
            rest.free(self.provider);
        }
    }
}

unsafe impl<T: Send, P: NodeProvider + Sync> Send for Drain<'_, T, P> {}

unsafe impl<T: Sync, P: NodeProvider + Sync> Sync for Drain<'_, T, P> {}

impl<T: fmt::Debug, P: NodeProvider> fmt::Debug for Drain<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut node = self.front;
        for i in 0..self.len {
            // SAFETY: only the `len` remaining nodes are visited.
            unsafe {
                list.entry(element::<T>(node));
                if i + 1 < self.len {
                    node = next(node);
                }
            }
        }
        list.finish()
    }
}

/// An iterator that removes the elements matching a predicate, produced by
/// [`List::extract_if`].
///
/// Elements that do not match are left in place. Dropping the iterator
/// finishes the scan, so every matching element is removed either way.
pub struct ExtractIf<'a, T: 'a, F: 'a, P: NodeProvider = Heap>
where
    F: FnMut(&mut T) -> bool,
{
    cursor: CursorMut<'a, T, P>,
    filter: F,
}

impl<'a, T, F, P: NodeProvider> ExtractIf<'a, T, F, P>
where
    F: FnMut(&mut T) -> bool,
{
    pub(crate) fn new(list: &'a mut List<T, P>, filter: F) -> Self {
        let cursor = list.cursor_start_mut();
        Self { cursor, filter }
    }
}

impl<T, F, P: NodeProvider> Iterator for ExtractIf<'_, T, F, P>
where
    F: FnMut(&mut T) -> bool,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if (self.filter)(self.cursor.current_mut()?) {
                return self.cursor.remove();
            }
            self.cursor.move_next_cyclic();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.cursor.list.len() - self.cursor.index()))
    }
}

impl<T, F, P: NodeProvider> FusedIterator for ExtractIf<'_, T, F, P> where
    F: FnMut(&mut T) -> bool
{
}

impl<T, F, P: NodeProvider> Drop for ExtractIf<'_, T, F, P>
where
    F: FnMut(&mut T) -> bool,
{
    fn drop(&mut self) {
        self.for_each(drop);
    }
}

impl<T: fmt::Debug, F, P: NodeProvider> fmt::Debug for ExtractIf<'_, T, F, P>
where
    F: FnMut(&mut T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExtractIf").field(self.cursor.view()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::list::testing::{CountingProvider, DropChecker};
    use crate::List;
    use std::cell::RefCell;

    #[test]
    fn drain_from_both_ends() {
        let mut list = List::from_iter(0..6);
        let mut drain = list.drain(1..5);
        assert_eq!(drain.len(), 4);
        assert_eq!(format!("{:?}", drain), "[1, 2, 3, 4]");
        assert_eq!(drain.next(), Some(1));
        assert_eq!(drain.next_back(), Some(4));
        assert_eq!(drain.collect::<Vec<_>>(), vec![2, 3]);
        list.verify_ring();
        assert_eq!(list.into_vec(), vec![0, 5]);
    }

    #[test]
    fn dropped_drain_releases_the_rest() {
        let provider = CountingProvider::new();
        let dropped = RefCell::new(Vec::new());
        let mut list = List::new_in(provider.clone());
        list.extend((0..5).map(|i| DropChecker::new(i, &dropped)));

        let mut drain = list.drain(..3);
        drop(drain.next());
        drop(drain);
        assert_eq!(*dropped.borrow(), vec![0, 1, 2]);
        assert_eq!(list.len(), 2);
        assert_eq!(provider.outstanding(), 2);
    }

    #[test]
    fn empty_drain() {
        let mut list = List::from([1, 2]);
        assert_eq!(list.drain(1..1).next(), None);
        assert_eq!(list.drain(..).count(), 2);
        assert!(list.is_empty());
        list.verify_ring();
    }

    #[test]
    fn extract_if_is_lazy() {
        let mut list = List::from_iter(0..8);
        let mut evens = list.extract_if(|x| *x % 2 == 0);
        assert_eq!(evens.next(), Some(0));
        assert_eq!(evens.next(), Some(2));
        drop(evens);
        list.verify_ring();
        assert_eq!(list.into_vec(), vec![1, 3, 5, 7]);
    }

    #[test]
    fn extract_if_can_edit_what_stays() {
        let mut list = List::from_iter(1..=5);
        let removed: Vec<_> = list
            .extract_if(|x| {
                *x *= 10;
                *x > 30
            })
            .collect();
        assert_eq!(removed, vec![40, 50]);
        assert_eq!(list.into_vec(), vec![10, 20, 30]);
    }
}
