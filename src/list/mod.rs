use std::alloc::Layout;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use crate::error::{ListError, TryBuildError};
use crate::list::chain::Chain;
use crate::list::cursor::{Cursor, CursorMut};
use crate::list::provider::{Heap, NodeProvider};
use crate::{IntoIter, Iter, IterMut};

pub mod cursor;
pub mod iterator;
pub mod provider;

mod algorithms;
mod batch;
mod chain;
mod splice;
#[cfg(test)]
pub(crate) mod testing;

pub use algorithms::drain::{Drain, ExtractIf};

/// The `List` is a doubly-linked list with owned nodes, implemented as a cyclic list.
/// It allows inserting, removing and splicing at any given position in constant
/// time. In compromise, reaching a position by index takes *O*(*n*) time.
///
/// The `List` contains:
/// - a pointer `ghost` to the ghost (sentinel) node, which carries no payload;
/// - the cached length `len`;
/// - the [`NodeProvider`] every element node is allocated from.
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of list nodes, both inclusive;
/// - `start..end`: a half-open range of list nodes, left inclusive and right
///   exclusive (probably the ghost node).
pub struct List<T, P: NodeProvider = Heap> {
    ghost: Link,
    /// the length of the list
    pub(crate) len: usize,
    pub(crate) provider: P,
    _marker: PhantomData<Box<Node<T>>>,
}

pub(crate) type Link = NonNull<Links>;

/// The link header shared by element nodes and the ghost node.
pub(crate) struct Links {
    pub(crate) next: Link,
    pub(crate) prev: Link,
}

/// An element node. `links` comes first so a `Link` to an element node can be
/// cast to the node itself.
#[repr(C)]
pub(crate) struct Node<T> {
    links: Links,
    element: T,
}

#[inline]
pub(crate) unsafe fn next(node: Link) -> Link {
    (*node.as_ptr()).next
}

#[inline]
pub(crate) unsafe fn prev(node: Link) -> Link {
    (*node.as_ptr()).prev
}

#[inline]
pub(crate) unsafe fn connect(prev: Link, next: Link) {
    (*prev.as_ptr()).next = next;
    (*next.as_ptr()).prev = prev;
}

/// # Safety
///
/// `node` must be a live element node (never the ghost) and the returned
/// reference must not outlive it.
#[inline]
pub(crate) unsafe fn element<'a, T>(node: Link) -> &'a T {
    &(*node.cast::<Node<T>>().as_ptr()).element
}

/// # Safety
///
/// As for [`element`], and no other reference to the element may be alive.
#[inline]
pub(crate) unsafe fn element_mut<'a, T>(node: Link) -> &'a mut T {
    &mut (*node.cast::<Node<T>>().as_ptr()).element
}

fn node_layout<T>() -> Layout {
    Layout::new::<Node<T>>()
}

/// An allocated node whose element is not constructed yet.
///
/// Dropping the slot gives the memory back to the provider, which is what
/// happens when constructing the element fails.
pub(crate) struct Slot<'p, T, P: NodeProvider> {
    ptr: NonNull<Node<T>>,
    provider: &'p P,
}

impl<'p, T, P: NodeProvider> Slot<'p, T, P> {
    pub(crate) fn new(provider: &'p P) -> Result<Self, ListError> {
        let ptr = provider.allocate(node_layout::<T>())?.cast();
        Ok(Self { ptr, provider })
    }

    /// Construct the element in place, producing a detached node.
    pub(crate) fn fill(self, element: T) -> Link {
        let ptr = self.ptr;
        std::mem::forget(self);
        let dangling = NonNull::dangling();
        let links = Links {
            next: dangling,
            prev: dangling,
        };
        // SAFETY: the slot was allocated with the layout of `Node<T>`.
        unsafe { ptr.as_ptr().write(Node { links, element }) };
        ptr.cast()
    }
}

impl<T, P: NodeProvider> Drop for Slot<'_, T, P> {
    fn drop(&mut self) {
        // SAFETY: an unfilled slot still owns its allocation.
        unsafe { self.provider.deallocate(self.ptr.cast(), node_layout::<T>()) }
    }
}

/// Destroy the element of a detached node and release the node.
///
/// # Safety
///
/// `node` must be a live element node allocated by `provider`'s type, and no
/// longer reachable from any ring.
pub(crate) unsafe fn drop_node<T, P: NodeProvider>(provider: &P, node: Link) {
    let ptr = node.cast::<Node<T>>();
    ptr::drop_in_place(ptr::addr_of_mut!((*ptr.as_ptr()).element));
    provider.deallocate(ptr.cast(), node_layout::<T>());
}

/// Move the element out of a detached node and release the node.
///
/// # Safety
///
/// As for [`drop_node`].
pub(crate) unsafe fn take_node<T, P: NodeProvider>(provider: &P, node: Link) -> T {
    let ptr = node.cast::<Node<T>>();
    let element = ptr::read(ptr::addr_of!((*ptr.as_ptr()).element));
    provider.deallocate(ptr.cast(), node_layout::<T>());
    element
}

// private methods
impl<T, P: NodeProvider> List<T, P> {
    pub(crate) fn ghost_node(&self) -> Link {
        self.ghost
    }
    pub(crate) fn front_node(&self) -> Link {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the list).
        unsafe { next(self.ghost) }
    }
    pub(crate) fn back_node(&self) -> Link {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the list).
        unsafe { prev(self.ghost) }
    }

    /// The node at index `at`, walking from whichever end is closer. `at == len`
    /// gives the ghost node.
    pub(crate) fn node_at(&self, at: usize) -> Link {
        debug_assert!(at <= self.len);
        let mut node;
        // SAFETY: at most `len` steps are taken, so the walk stays on the ring.
        unsafe {
            if at <= self.len / 2 {
                node = self.front_node();
                (0..at).for_each(|_| node = next(node));
            } else {
                node = self.ghost;
                (at..self.len).for_each(|_| node = prev(node));
            }
        }
        node
    }

    /// Check that the list may grow by `additional` nodes.
    pub(crate) fn check_grow(&self, additional: usize) -> Result<(), ListError> {
        let max = self.provider.max_len();
        if additional > max.saturating_sub(self.len) {
            let err = ListError::LengthExceeded {
                len: self.len,
                additional,
                max,
            };
            tracing::debug!(%err, "rejected list growth");
            return Err(err);
        }
        Ok(())
    }

    /// Insert a new node holding `element` before `pos`.
    ///
    /// # Safety
    ///
    /// `pos` must be a node (or the ghost) of this list.
    pub(crate) unsafe fn insert_before(&mut self, pos: Link, element: T) -> Result<Link, ListError> {
        self.check_grow(1)?;
        let node = Slot::<T, P>::new(&self.provider)?.fill(element);
        self.attach(pos, Chain::single(node));
        Ok(node)
    }

    /// Allocate a node, construct its element with `f`, then insert it before
    /// `pos`. A failing `f` leaves the list untouched.
    ///
    /// # Safety
    ///
    /// `pos` must be a node (or the ghost) of this list.
    pub(crate) unsafe fn emplace_before<E, F>(
        &mut self,
        pos: Link,
        f: F,
    ) -> Result<Link, TryBuildError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.check_grow(1)?;
        let slot = Slot::<T, P>::new(&self.provider)?;
        let node = slot.fill(f().map_err(TryBuildError::Construct)?);
        self.attach(pos, Chain::single(node));
        Ok(node)
    }

    /// Unlink a single node and return its element.
    ///
    /// # Safety
    ///
    /// `node` must be a non-ghost node of this list.
    pub(crate) unsafe fn remove_node(&mut self, node: Link) -> T {
        let chain = self.detach(node, node, 1);
        take_node::<T, P>(&self.provider, chain.front)
    }

    /// Walk the ring in both directions and assert the structural invariants:
    /// every link is mirrored by its neighbour, and the ring closes after exactly
    /// `len` element nodes.
    #[cfg(any(test, feature = "verify"))]
    pub(crate) fn verify_ring(&self) {
        let ghost = self.ghost;
        let mut node = ghost;
        let mut steps = 0;
        loop {
            // SAFETY: the walk is bounded by `len` and only follows live links.
            let following = unsafe { next(node) };
            assert_eq!(
                unsafe { prev(following) },
                node,
                "next/prev mismatch after {} steps",
                steps
            );
            if following == ghost {
                break;
            }
            steps += 1;
            assert!(
                steps <= self.len,
                "ring is longer than the cached length {}",
                self.len
            );
            node = following;
        }
        assert_eq!(steps, self.len, "ring is shorter than the cached length");
        assert_eq!(self.is_empty(), self.len == 0);
    }
}

impl<T> List<T> {
    /// Create an empty `List`
    ///
    /// # Examples
    /// ```
    /// use splice_list::List;
    /// let list: List<u32> = List::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::new_in(Heap)
    }
}

impl<T, P: NodeProvider> List<T, P> {
    /// Create an empty `List` whose nodes come from `provider`.
    ///
    /// The ghost node itself lives on the global heap; only element nodes are
    /// requested from the provider.
    pub fn new_in(provider: P) -> Self {
        Self {
            ghost: new_ghost(),
            len: 0,
            provider,
            _marker: PhantomData,
        }
    }

    /// The node provider of the list.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The largest length the list may reach, as configured by its provider.
    pub fn max_len(&self) -> usize {
        self.provider.max_len()
    }

    /// Returns `true` if the `List` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::new();
    /// assert!(list.is_empty());
    ///
    /// list.push_front("foo");
    /// assert!(!list.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// Returns the length of the `List`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Removes all elements from the `List`.
    ///
    /// The whole ring is detached at once, then every node is destroyed.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 2]);
    /// list.clear();
    /// assert_eq!(list.len(), 0);
    /// assert_eq!(list.front(), None);
    /// ```
    pub fn clear(&mut self) {
        if let Some(chain) = self.detach_all() {
            chain.free(&self.provider);
        }
    }

    /// Takes all elements out of the list, leaving it empty.
    ///
    /// A fresh ghost is swapped in; no element node is touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// let taken = list.take();
    /// assert!(list.is_empty());
    /// assert_eq!(taken.into_vec(), vec![1, 2, 3]);
    /// ```
    pub fn take(&mut self) -> Self
    where
        P: Clone,
    {
        let empty = List::new_in(self.provider.clone());
        std::mem::replace(self, empty)
    }

    /// Provides a reference to the front element, or `None` if the list is
    /// empty.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.cursor_start().current()
    }

    /// Provides a mutable reference to the front element, or `None` if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::new();
    /// list.push_front(1);
    ///
    /// if let Some(x) = list.front_mut() {
    ///     *x = 5;
    /// }
    /// assert_eq!(list.front(), Some(&5));
    /// ```
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the front node holds an element.
        unsafe { Some(element_mut(self.front_node())) }
    }

    /// Provides a reference to the back element, or `None` if the list is
    /// empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.cursor_end().previous()
    }

    /// Provides a mutable reference to the back element, or `None` if the list
    /// is empty.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the back node holds an element.
        unsafe { Some(element_mut(self.back_node())) }
    }

    /// Adds an element first in the list.
    ///
    /// # Panics
    ///
    /// Panics if the list is at its maximum length; aborts through
    /// [`std::alloc::handle_alloc_error`] if the node cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_front(2);
    /// assert_eq!(list.front().unwrap(), &2);
    ///
    /// list.push_front(1);
    /// assert_eq!(list.front().unwrap(), &1);
    /// ```
    pub fn push_front(&mut self, elt: T) {
        if let Err(err) = self.try_push_front(elt) {
            err.raise()
        }
    }

    /// Adds an element first in the list, reporting allocation and length
    /// failures instead of panicking. On failure the list is unchanged.
    pub fn try_push_front(&mut self, elt: T) -> Result<(), ListError> {
        // SAFETY: the front node belongs to the list.
        unsafe { self.insert_before(self.front_node(), elt) }.map(drop)
    }

    /// Removes the first element and returns it, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_front(), None);
    ///
    /// list.push_front(1);
    /// list.push_front(3);
    /// assert_eq!(list.pop_front(), Some(3));
    /// assert_eq!(list.pop_front(), Some(1));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the front node is not the ghost.
        unsafe { Some(self.remove_node(self.front_node())) }
    }

    /// Appends an element to the back of a list.
    ///
    /// # Panics
    ///
    /// As for [`List::push_front`].
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::new();
    /// list.push_back(1);
    /// list.push_back(3);
    /// assert_eq!(list.back().unwrap(), &3);
    /// ```
    pub fn push_back(&mut self, elt: T) {
        if let Err(err) = self.try_push_back(elt) {
            err.raise()
        }
    }

    /// Appends an element to the back of a list, reporting allocation and
    /// length failures instead of panicking. On failure the list is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::new();
    /// assert!(list.try_push_back(7).is_ok());
    /// assert_eq!(list.back(), Some(&7));
    /// ```
    pub fn try_push_back(&mut self, elt: T) -> Result<(), ListError> {
        // SAFETY: the ghost node belongs to the list.
        unsafe { self.insert_before(self.ghost_node(), elt) }.map(drop)
    }

    /// Removes the last element from a list and returns it, or `None` if
    /// it is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the back node is not the ghost.
        unsafe { Some(self.remove_node(self.back_node())) }
    }

    /// Provides a cursor at the node with given index.
    ///
    /// By convention, the cursor is pointing to the "ghost" node if `at == len`.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let list = List::from([1, 2, 3]);
    /// assert_eq!(list.cursor(1).current(), Some(&2));
    /// assert_eq!(list.cursor(3).current(), None);
    /// ```
    pub fn cursor(&self, at: usize) -> Cursor<'_, T, P> {
        assert!(
            at <= self.len,
            "Cannot create cursor at a nonexistent index"
        );
        Cursor::new(self, self.node_at(at), at)
    }

    /// Provides a cursor at the first node.
    ///
    /// The cursor is pointing to the "ghost" node if the list is empty.
    pub fn cursor_start(&self) -> Cursor<'_, T, P> {
        Cursor::new(self, self.front_node(), 0)
    }

    /// Provides a cursor at the ghost node.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let list = List::from([1, 2, 3]);
    /// let cursor = list.cursor_end();
    /// assert_eq!(cursor.current(), None);
    /// assert_eq!(cursor.previous(), Some(&3));
    /// ```
    pub fn cursor_end(&self) -> Cursor<'_, T, P> {
        Cursor::new(self, self.ghost_node(), self.len)
    }

    /// Provides a cursor with editing operations at the node with given index.
    ///
    /// By convention, the cursor is pointing to the "ghost" node if `at == len`.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// let mut cursor = list.cursor_mut(1);
    ///
    /// if let Some(x) = cursor.current_mut() {
    ///     *x *= 5;
    /// }
    /// assert_eq!(cursor.current(), Some(&10));
    /// assert_eq!(list.cursor_mut(3).current_mut(), None);
    /// ```
    pub fn cursor_mut(&mut self, at: usize) -> CursorMut<'_, T, P> {
        assert!(
            at <= self.len,
            "Cannot create cursor at a nonexistent index"
        );
        let node = self.node_at(at);
        CursorMut::new(self, node, at)
    }

    /// Provides a cursor with editing operations at the first node.
    ///
    /// The cursor is pointing to the "ghost" node if the list is empty.
    pub fn cursor_start_mut(&mut self) -> CursorMut<'_, T, P> {
        let node = self.front_node();
        CursorMut::new(self, node, 0)
    }

    /// Provides a cursor with editing operations at the ghost node.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, P> {
        let (node, len) = (self.ghost_node(), self.len);
        CursorMut::new(self, node, len)
    }

    /// Provides a forward iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let list = List::from([0, 1, 2]);
    ///
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Provides a forward iterator with mutable references.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Adds an element at the given index in the list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    ///
    /// list.insert(2, 4);
    /// list.insert(4, 5);
    ///
    /// assert_eq!(list.into_vec(), vec![1, 2, 4, 3, 5]);
    /// ```
    pub fn insert(&mut self, at: usize, elm: T) {
        if let Err(err) = self.try_insert(at, elm) {
            err.raise()
        }
    }

    /// Like [`List::insert`], but reports allocation and length failures.
    pub fn try_insert(&mut self, at: usize, elm: T) -> Result<(), ListError> {
        assert!(
            at <= self.len,
            "Cannot insert at an index outside of the list bounds"
        );
        // SAFETY: `node_at` returns a node of this list.
        unsafe { self.insert_before(self.node_at(at), elm) }.map(drop)
    }

    /// Removes the element at the given index and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `at >= len`
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from([3, 2, 1]);
    ///
    /// assert_eq!(list.remove(1), 2);
    /// assert_eq!(list.remove(0), 3);
    /// assert_eq!(list.remove(0), 1);
    /// ```
    pub fn remove(&mut self, at: usize) -> T {
        assert!(
            at < self.len,
            "Cannot remove at an index outside of the list bounds"
        );
        // SAFETY: `at < len`, so the node is not the ghost.
        unsafe { self.remove_node(self.node_at(at)) }
    }

    /// Copies the elements into a `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Moves the elements into a `Vec`.
    pub fn into_vec(self) -> Vec<T> {
        self.into_iter().collect()
    }
}

impl<T: Debug, P: NodeProvider> Debug for List<T, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, P: NodeProvider + Default> Default for List<T, P> {
    fn default() -> Self {
        Self::new_in(P::default())
    }
}

fn new_ghost() -> Link {
    let ghost = Box::new(Links {
        next: NonNull::dangling(),
        prev: NonNull::dangling(),
    });
    let ptr = NonNull::from(Box::leak(ghost));
    // SAFETY: `ptr` was just leaked from a box, so it is valid and unique.
    unsafe { connect(ptr, ptr) };
    ptr
}

impl<T, P: NodeProvider> Drop for List<T, P> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost was leaked from a box in `new_ghost` and is
        // released only here.
        unsafe { drop(Box::from_raw(self.ghost.as_ptr())) };
    }
}

unsafe impl<T: Send, P: NodeProvider + Send> Send for List<T, P> {}

unsafe impl<T: Sync, P: NodeProvider + Sync> Sync for List<T, P> {}

// Ensure that `List` and its read-only iterators are covariant in their type parameters.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: List<&'static str>) -> List<&'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
    fn c<'a>(x: IntoIter<&'static str>) -> IntoIter<&'a str> {
        x
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ListError, TryBuildError};
    use crate::list::testing::{CountingProvider, DropChecker};
    use crate::list::List;
    use std::cell::RefCell;
    use std::fmt::Debug;

    fn list_eq<T, I>(list: &List<T, impl crate::NodeProvider>, expected: I)
    where
        T: Debug + Clone + Eq,
        I: IntoIterator<Item = T>,
    {
        list.verify_ring();
        assert_eq!(
            Vec::from_iter(list.iter().cloned()),
            Vec::from_iter(expected)
        );
    }

    #[test]
    fn list_create() {
        let mut list = List::<i32>::new();
        assert!(list.is_empty());
        list.verify_ring();
        list.push_back(1);
        assert!(!list.is_empty());
        assert_eq!(list.pop_back(), Some(1));
        assert!(list.is_empty());
        list.verify_ring();
    }

    #[test]
    fn list_drop() {
        let dropped = RefCell::new(Vec::<i32>::new());
        let mut list = List::new();
        list.push_back(DropChecker::new(1, &dropped));
        list.push_back(DropChecker::new(2, &dropped));
        list.push_back(DropChecker::new(3, &dropped));
        drop(list);
        assert_eq!(dropped.borrow().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn list_push_and_pop() {
        let mut list = List::new();
        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.pop_back(), None);

        list.push_back(1);
        assert_eq!(list.back(), Some(&1));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());

        list.push_front(1);
        list.push_front(2);
        list.push_back(3);
        list_eq(&list, [2, 1, 3]);
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.pop_back(), Some(3));

        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn list_insert_and_remove() {
        let mut list = List::from_iter(0..10);
        list.insert(5, 10);
        list_eq(&list, (0..5).chain(Some(10)).chain(5..10));

        assert_eq!(list.remove(10), 9);
        assert_eq!(list.back(), Some(&8));
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9));

        list.insert(0, 11);
        assert_eq!(list.front(), Some(&11));
        list_eq(&list, (11..=11).chain((0..5).chain(Some(10)).chain(5..9)));

        assert_eq!(list.remove(0), 11);
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9));

        list.insert(10, 12);
        assert_eq!(list.back(), Some(&12));
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9).chain(Some(12)));
    }

    #[test]
    #[should_panic(expected = "Cannot remove at an index outside of the list bounds")]
    fn remove_past_the_end() {
        let mut list = List::from([1]);
        list.remove(1);
    }

    #[test]
    fn node_at_walks_from_both_ends() {
        let list = List::from_iter(0..7);
        for at in 0..7 {
            assert_eq!(unsafe { crate::list::element::<i32>(list.node_at(at)) }, &(at as i32));
        }
        assert_eq!(list.node_at(7), list.ghost_node());
    }

    #[test]
    fn take_leaves_an_empty_list() {
        let mut list = List::from([1, 2, 3]);
        let moved = std::mem::take(&mut list);
        list.verify_ring();
        assert!(list.is_empty());
        list_eq(&moved, [1, 2, 3]);

        list.push_back(4);
        list_eq(&list, [4]);
    }

    #[test]
    fn single_insert_failures_leave_the_list_alone() {
        let provider = CountingProvider::with_max_len(2);
        let mut list = List::new_in(provider.clone());
        list.push_back(1);
        list.push_back(2);
        assert_eq!(
            list.try_push_front(0),
            Err(ListError::LengthExceeded {
                len: 2,
                additional: 1,
                max: 2
            })
        );
        assert_eq!(provider.outstanding(), 2);
        list_eq(&list, [1, 2]);

        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.push_back(1);
        provider.fail_after(0);
        assert!(matches!(
            list.try_insert(1, 2),
            Err(ListError::AllocFailed { .. })
        ));
        assert_eq!(provider.outstanding(), 1);
        list_eq(&list, [1]);
    }

    #[test]
    fn emplace_failure_releases_the_slot() {
        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.push_back(1);
        let err = list
            .cursor_end_mut()
            .try_insert_with(|| Err::<i32, _>("no value"))
            .unwrap_err();
        assert_eq!(err, TryBuildError::Construct("no value"));
        assert_eq!(provider.outstanding(), 1);
        assert_eq!(provider.total_allocations(), 2);
        list_eq(&list, [1]);
    }

    #[test]
    fn drop_returns_every_node() {
        let provider = CountingProvider::new();
        let mut list = List::new_in(provider.clone());
        list.extend(0..100);
        assert_eq!(provider.outstanding(), 100);
        drop(list);
        assert_eq!(provider.outstanding(), 0);
    }
}
