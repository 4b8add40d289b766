//! The link engine: constant time relinking of closed node chains, and the
//! batch builder every multi-node insertion goes through.
//!
//! Nothing in here validates its arguments. Callers must guarantee that a
//! `front..=back` range really is a contiguous run of the ring they mutate.

use crate::error::{ListError, TryBuildError};
use crate::list::provider::NodeProvider;
use crate::list::{connect, drop_node, next, prev, Link, List, Node, Slot};
use std::marker::PhantomData;

/// Nodes `front..=back` detached from any ring.
///
/// A chain is the only way nodes travel between lists: it is produced by
/// [`List::detach`] or a [`ChainBuilder`] and consumed by [`List::attach`],
/// so the same nodes can never be linked into two rings.
///
/// While detached, `front.prev` and `back.next` are stale and must not be
/// read; walk the chain by its length instead.
#[must_use = "a detached chain leaks its nodes unless it is attached or freed"]
pub(crate) struct Chain<T> {
    pub(crate) front: Link,
    pub(crate) back: Link,
    pub(crate) len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

impl<T> Chain<T> {
    /// # Safety
    ///
    /// `front..=back` must be a chain of exactly `len` nodes holding values of
    /// type `T`, owned by nobody else.
    pub(crate) unsafe fn new(front: Link, back: Link, len: usize) -> Self {
        debug_assert!(len > 0, "Cannot build an empty chain");
        Self {
            front,
            back,
            len,
            _marker: PhantomData,
        }
    }

    pub(crate) fn single(node: Link) -> Self {
        // SAFETY: a lone node is a chain of length 1.
        unsafe { Self::new(node, node, 1) }
    }

    /// Drops every value in the chain and gives the slots back to `provider`.
    pub(crate) fn free<P: NodeProvider>(self, provider: &P) {
        let mut node = self.front;
        for _ in 0..self.len {
            // SAFETY: the chain owns `len` live nodes starting at `front`, and
            // the successor is read before the node is released.
            unsafe {
                let following = next(node);
                drop_node::<T, P>(provider, node);
                node = following;
            }
        }
    }
}

/// Splice the closed chain `front..=back` immediately before `pos`.
///
/// # Safety
///
/// `pos` must be a live node (or ghost) of a consistent ring and the chain
/// must be detached from every ring.
pub(crate) unsafe fn link_before(pos: Link, front: Link, back: Link) {
    connect(prev(pos), front);
    connect(back, pos);
}

/// Cut `front..=back` out of the ring it belongs to.
///
/// # Safety
///
/// `front..=back` must be a contiguous run of a consistent ring, not including
/// its ghost.
pub(crate) unsafe fn unlink(front: Link, back: Link) {
    connect(prev(front), next(back));
}

/// Move `front..=back` in front of `pos`, inside the same ring.
///
/// # Safety
///
/// As for [`unlink`] and [`link_before`]; additionally `pos` must not lie in
/// `front..=back`.
pub(crate) unsafe fn relink(front: Link, back: Link, pos: Link) {
    unlink(front, back);
    link_before(pos, front, back);
}

impl<T, P: NodeProvider> List<T, P> {
    /// Attach a detached chain in front of `pos`.
    ///
    /// # Safety
    ///
    /// `pos` must be a node (or the ghost) of this list.
    pub(crate) unsafe fn attach(&mut self, pos: Link, chain: Chain<T>) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev(pos), pos);
        link_before(pos, chain.front, chain.back);
        self.len += chain.len;
        #[cfg(feature = "verify")]
        self.verify_ring();
    }

    pub(crate) fn attach_front(&mut self, chain: Chain<T>) {
        // SAFETY: the front node always belongs to the list.
        unsafe { self.attach(self.front_node(), chain) }
    }

    pub(crate) fn attach_back(&mut self, chain: Chain<T>) {
        // SAFETY: the ghost always belongs to the list.
        unsafe { self.attach(self.ghost_node(), chain) }
    }

    /// Detach the `len` nodes `front..=back` from the list.
    ///
    /// # Safety
    ///
    /// `front..=back` must be a run of exactly `len` non-ghost nodes of this
    /// list, in ring order.
    pub(crate) unsafe fn detach(&mut self, front: Link, back: Link, len: usize) -> Chain<T> {
        unlink(front, back);
        self.len -= len;
        #[cfg(feature = "verify")]
        self.verify_ring();
        Chain::new(front, back, len)
    }

    /// Detach every node, or return `None` if the list is empty.
    pub(crate) fn detach_all(&mut self) -> Option<Chain<T>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: `front..=back` spans the whole ring apart from the ghost.
        unsafe { Some(self.detach(self.front_node(), self.back_node(), self.len)) }
    }
}

/// Builds a detached chain one node at a time.
///
/// If the builder is dropped before [`ChainBuilder::finish`], because a value
/// failed to construct or a panic is unwinding, every node built so far is
/// dropped and deallocated. Nothing is attached to a ring until the whole
/// batch exists.
pub(crate) struct ChainBuilder<'p, T, P: NodeProvider> {
    provider: &'p P,
    ends: Option<(Link, Link)>,
    len: usize,
    base_len: usize,
    max_len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

impl<'p, T, P: NodeProvider> ChainBuilder<'p, T, P> {
    /// A builder for a chain that will join `list`.
    pub(crate) fn for_list(list: &'p List<T, P>) -> Self {
        Self {
            provider: &list.provider,
            ends: None,
            len: 0,
            base_len: list.len,
            max_len: list.provider.max_len(),
            _marker: PhantomData,
        }
    }

    fn reserve_one(&self) -> Result<(), ListError> {
        if self.len >= self.max_len.saturating_sub(self.base_len) {
            return Err(ListError::LengthExceeded {
                len: self.base_len,
                additional: self.len + 1,
                max: self.max_len,
            });
        }
        Ok(())
    }

    fn link(&mut self, node: Link) {
        self.ends = match self.ends {
            None => Some((node, node)),
            Some((front, back)) => {
                // SAFETY: `back` is the last node of the chain under construction.
                unsafe { connect(back, node) };
                Some((front, node))
            }
        };
        self.len += 1;
    }

    /// Append a node holding `element`.
    pub(crate) fn push(&mut self, element: T) -> Result<(), ListError> {
        self.reserve_one()?;
        let node = Slot::<T, P>::new(self.provider)?.fill(element);
        self.link(node);
        Ok(())
    }

    /// Allocate a slot, then construct its value with `f`.
    pub(crate) fn push_with<E, F>(&mut self, f: F) -> Result<(), TryBuildError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.reserve_one()?;
        let slot = Slot::<T, P>::new(self.provider)?;
        let element = f().map_err(TryBuildError::Construct)?;
        self.link(slot.fill(element));
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Option<Chain<T>> {
        let len = self.len;
        self.ends.take().map(|(front, back)| {
            // SAFETY: the builder linked exactly `len` fresh nodes.
            unsafe { Chain::new(front, back, len) }
        })
    }
}

impl<T, P: NodeProvider> Drop for ChainBuilder<'_, T, P> {
    fn drop(&mut self) {
        if let Some((front, back)) = self.ends.take() {
            tracing::debug!(built = self.len, "unwinding a partially built chain");
            // SAFETY: the builder owns `len` nodes linked from `front`.
            unsafe { Chain::<T>::new(front, back, self.len) }.free(self.provider);
        }
    }
}

#[cfg(debug_assertions)]
pub(crate) fn assert_adjacent(prev: Link, next: Link) {
    unsafe {
        assert_eq!(crate::list::next(prev), next);
        assert_eq!(crate::list::prev(next), prev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::testing::CountingProvider;
    use crate::List;

    #[test]
    fn detach_and_attach_across_lists() {
        let mut a = List::from_iter(0..5);
        let mut b = List::from_iter(10..13);
        let chain = unsafe {
            let front = a.node_at(1);
            let back = a.node_at(3);
            a.detach(front, back, 3)
        };
        a.verify_ring();
        assert_eq!(a.to_vec(), vec![0, 4]);

        unsafe { b.attach(b.node_at(1), chain) };
        b.verify_ring();
        assert_eq!(b.to_vec(), vec![10, 1, 2, 3, 11, 12]);
    }

    #[test]
    fn attach_at_both_ends() {
        let mut list = List::from_iter([2, 3]);
        let mut other = List::from_iter([0, 1]);
        let front = other.detach_all().unwrap();
        list.attach_front(front);
        let mut other = List::from_iter([4]);
        list.attach_back(other.detach_all().unwrap());
        assert!(other.detach_all().is_none());
        list.verify_ring();
        assert_eq!(list.to_vec(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn relink_inside_one_ring() {
        let mut list = List::from_iter(0..6);
        unsafe {
            let front = list.node_at(3);
            let back = list.node_at(4);
            relink(front, back, list.node_at(0));
        }
        list.verify_ring();
        assert_eq!(list.to_vec(), vec![3, 4, 0, 1, 2, 5]);
    }

    #[test]
    fn dropped_builder_releases_nodes() {
        let provider = CountingProvider::new();
        let list: List<String, _> = List::new_in(provider.clone());
        let mut builder = ChainBuilder::for_list(&list);
        builder.push("a".to_string()).unwrap();
        builder.push("b".to_string()).unwrap();
        assert_eq!(provider.outstanding(), 2);
        drop(builder);
        assert_eq!(provider.outstanding(), 0);
    }

    #[test]
    fn failed_construction_releases_the_slot() {
        let provider = CountingProvider::new();
        let list: List<u32, _> = List::new_in(provider.clone());
        let mut builder = ChainBuilder::for_list(&list);
        builder.push(1).unwrap();
        let err = builder.push_with(|| Err::<u32, _>("nope")).unwrap_err();
        assert_eq!(err, TryBuildError::Construct("nope"));
        assert_eq!(provider.outstanding(), 1);
        let chain = builder.finish().unwrap();
        assert_eq!(chain.len, 1);
        chain.free(&provider);
        assert_eq!(provider.outstanding(), 0);
    }

    #[test]
    fn builder_respects_max_len() {
        let provider = CountingProvider::with_max_len(2);
        let list: List<u8, _> = List::new_in(provider.clone());
        let mut builder = ChainBuilder::for_list(&list);
        builder.push(1).unwrap();
        builder.push(2).unwrap();
        assert_eq!(
            builder.push(3),
            Err(ListError::LengthExceeded {
                len: 0,
                additional: 3,
                max: 2
            })
        );
    }
}
