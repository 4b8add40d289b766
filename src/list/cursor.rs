use crate::error::{ListError, TryBuildError};
use crate::list::provider::{Heap, NodeProvider};
use crate::list::{element, element_mut, next, prev, Link, List};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Formatter;

/// A cursor over a `List`.
///
/// A `Cursor` is like an iterator, except that it can freely seek back-and-forth.
///
/// In a list with length *n*, there are *n* + 1 valid locations for the cursor,
/// indexed by 0, 1, ..., *n*, where *n* is the ghost node of the list.
///
/// # Examples
///
/// Here is a simple example showing how the cursors work. (The ghost node of the
/// list is denoted by `#`).
/// ```
/// use splice_list::List;
///
/// // Create a list: [ A B C D #]
/// let list = List::from_iter(['A', 'B', 'C', 'D']);
///
/// // Create a cursor at start: [|A B C D #] (index = 0)
/// let mut cursor = list.cursor_start();
/// assert_eq!(cursor.current(), Some(&'A'));
///
/// // Move cursor forward: [ A|B C D #] (index = 1)
/// assert!(cursor.move_next().is_ok());
/// assert_eq!(cursor.current(), Some(&'B'));
/// assert_eq!(cursor.index(), 1);
///
/// // Create a cursor in the end: [ A B C D|#] (index = 4)
/// let mut cursor = list.cursor_end();
/// assert_eq!(cursor.current(), None);
///
/// // Move cursor backward: [ A B C|D #] (index = 3)
/// assert!(cursor.move_prev().is_ok());
/// assert_eq!(cursor.current(), Some(&'D'));
///
/// // Create a cursor in the end and move forward: [ A B C D|#] (index = 4)
/// let mut cursor = list.cursor_end();
/// assert!(cursor.move_next().is_err());
/// // Move cursor forward, cyclically: [|A B C D #] (index = 0)
/// cursor.move_next_cyclic();
/// assert_eq!(cursor.current(), Some(&'A'));
/// ```
pub struct Cursor<'a, T: 'a, P: NodeProvider = Heap> {
    index: usize,
    pub(crate) current: Link,
    pub(crate) list: &'a List<T, P>,
}

impl<'a, T: 'a, P: NodeProvider> Clone for Cursor<'a, T, P> {
    fn clone(&self) -> Self {
        Cursor::new(self.list, self.current, self.index)
    }
}

/// Compare cursors by its position.
///
/// Only cursors belong to the same list and have the same positions
/// are considered equal.
///
/// # Examples
/// ```
/// use splice_list::List;
///
/// let list = List::from_iter([1, 2, 3]);
/// let cursor1 = list.cursor_start();
/// let mut cursor2 = cursor1.clone();
/// // The same list, and the same position.
/// assert_eq!(cursor1, cursor2);
///
/// cursor2.move_next_cyclic();
/// // The same list, but different positions.
/// assert_ne!(cursor1, cursor2);
///
/// let another_list = list.clone();
/// let cursor3 = another_list.cursor_start();
/// // Different list, different positions.
/// assert_ne!(cursor1, cursor3);
/// ```
impl<'a, T: 'a, P: NodeProvider> PartialEq for Cursor<'a, T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.same_list_with(other) && self.current == other.current
    }
}

impl<'a, T: 'a, P: NodeProvider> Eq for Cursor<'a, T, P> {}

/// Compare cursors by its position.
///
/// Only cursors belong to the same list can compare, so it is `PartialOrd`
/// but not `Ord`.
///
/// # Examples
/// ```
/// use splice_list::List;
///
/// let list = List::from_iter([1, 2, 3]);
/// let cursor1 = list.cursor_start();
/// let mut cursor2 = cursor1.clone();
/// cursor2.move_next_cyclic();
/// // They belong to the same list, can compare.
/// assert!(cursor1 < cursor2);
///
/// let another_list = list.clone();
/// let cursor3 = another_list.cursor_end();
/// // They belong to different lists, cannot compare.
/// assert_eq!(cursor1.partial_cmp(&cursor3), None);
/// ```
impl<'a, T: 'a, P: NodeProvider> PartialOrd for Cursor<'a, T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.same_list_with(other) {
            return None;
        }
        Some(self.index().cmp(&other.index()))
    }
}

/// A cursor over a `List` with editing operations.
///
/// A `CursorMut` is like an iterator, except that it can freely seek back-and-forth,
/// and can safely mutate the list during iteration. This is because the lifetime of
/// its yielded references is tied to its own lifetime, instead of just the underlying
/// list. This means cursors cannot yield multiple elements at once.
///
/// Cross-list splicing is expressed between two mutable cursors (or a cursor and
/// a list), so the borrow checker rules out splicing a list into itself.
///
/// For convenience, [`CursorMut::view`] provides a function to temporarily borrow
/// the list and returns an immutable reference whose lifetime is shorter than the
/// iterator. See the documents for details.
///
/// In a list with length *n*, there are *n* + 1 valid locations for the cursor,
/// indexed by 0, 1, ..., *n*, where *n* is the ghost node of the list.
///
/// # Examples
///
/// ```compile_fail
/// use splice_list::List;
///
/// let mut list = List::from_iter([1, 2, 3]);
/// let mut cursor = list.cursor_start_mut();
/// println!("{:?}", list.back());
/// println!("{:?}", cursor.current());
/// ```
pub struct CursorMut<'a, T: 'a, P: NodeProvider = Heap> {
    index: usize,
    pub(crate) current: Link,
    pub(crate) list: &'a mut List<T, P>,
}

macro_rules! impl_cursor {
    ($CURSOR:ident) => {
        // Private methods
        impl<'a, T: 'a, P: NodeProvider> $CURSOR<'a, T, P> {
            pub(crate) fn is_ghost_node(&self) -> bool {
                self.current == self.list.ghost_node()
            }
            pub(crate) fn is_front_node(&self) -> bool {
                self.prev_node() == self.list.ghost_node()
            }
            pub(crate) fn next_node(&self) -> Link {
                // SAFETY: `current.next` is always valid since it is a cyclic list.
                unsafe { next(self.current) }
            }
            pub(crate) fn prev_node(&self) -> Link {
                // SAFETY: `current.prev` is always valid since it is a cyclic list.
                unsafe { prev(self.current) }
            }

            /// Move forward the cursor by given steps, without checking whether
            /// it will pass through the ghost node.
            ///
            /// It is unsafe because if the moving passes through the ghost node,
            /// the index will be invalid.
            unsafe fn seek_forward_fast(&mut self, steps: usize) {
                self.index = self.index.saturating_add(steps);
                (0..steps).for_each(|_| self.current = self.next_node());
            }

            /// Move backward the cursor by given steps, without checking whether
            /// it will pass through the ghost node.
            ///
            /// It is unsafe because if the moving passes through the ghost node,
            /// the index will be invalid.
            unsafe fn seek_backward_fast(&mut self, steps: usize) {
                self.index = self.index.saturating_sub(steps);
                (0..steps).for_each(|_| self.current = self.prev_node());
            }
        }

        impl<'a, T: 'a, P: NodeProvider> $CURSOR<'a, T, P> {
            /// Return the index of the cursor
            pub fn index(&self) -> usize {
                self.index
            }

            /// Returns `true` if the `List` is empty. See [`List::is_empty`].
            pub fn is_empty(&self) -> bool {
                self.list.is_empty()
            }

            /// Move the cursor to the next position, where passing
            /// through the ghost node is allowed.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Examples
            ///
            /// ```
            /// use splice_list::List;
            ///
            /// let list = List::from_iter([1, 2, 3]);
            /// let mut cursor = list.cursor_end();
            ///
            /// // The cursor is at the ghost node
            /// assert_eq!(cursor.previous(), Some(&3));
            /// cursor.move_next_cyclic();
            ///
            /// // The cursor is now at the first node
            /// assert_eq!(cursor.current(), Some(&1));
            /// ```
            pub fn move_next_cyclic(&mut self) {
                if self.is_empty() {
                    return;
                }
                if self.is_ghost_node() {
                    self.index = 0;
                } else {
                    self.index += 1;
                }
                self.current = self.next_node();
            }

            /// Move the cursor to the previous position, where passing
            /// through the ghost node is allowed.
            ///
            /// This operation should compute in *O*(*1*) time.
            pub fn move_prev_cyclic(&mut self) {
                if self.is_empty() {
                    return;
                }
                if self.is_front_node() {
                    self.index = self.list.len();
                } else {
                    self.index -= 1;
                }
                self.current = self.prev_node();
            }

            /// Move the cursor to the next position, or return an error
            /// when passing through the ghost node is happened.
            ///
            /// This operation should compute in *O*(*1*) time.
            pub fn move_next(&mut self) -> Result<(), &'static str> {
                if !self.is_empty() && !self.is_ghost_node() {
                    self.move_next_cyclic();
                    return Ok(());
                }
                Err("`move_next` across ghost boundary")
            }

            /// Move the cursor to the previous position, or return an error
            /// when passing through the ghost node is happened.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Examples
            ///
            /// ```
            /// use splice_list::List;
            ///
            /// let list = List::from_iter([1, 2, 3]);
            /// let mut cursor = list.cursor_start();
            ///
            /// // Forbid to move passing through the ghost node
            /// assert!(cursor.move_prev().is_err());
            ///
            /// // The cursor is still at the first node
            /// assert_eq!(cursor.current(), Some(&1));
            /// ```
            pub fn move_prev(&mut self) -> Result<(), &'static str> {
                if !self.is_empty() && !self.is_front_node() {
                    self.move_prev_cyclic();
                    return Ok(());
                }
                Err("`move_prev` across ghost boundary")
            }

            /// Move forward the cursor by given steps, or return an error
            /// when passing through the ghost node is happened.
            ///
            /// If an error occurs, the cursor will stay at the ghost node.
            ///
            /// This operation should compute in *O*(*n*) time.
            pub fn seek_forward(&mut self, steps: usize) -> Result<(), usize> {
                (0..steps).try_for_each(|i| self.move_next().map_err(|_| i))
            }

            /// Move backward the cursor by given steps, or return an error
            /// when passing through the ghost node is happened.
            ///
            /// If an error occurs, the cursor will stay at the first node.
            ///
            /// This operation should compute in *O*(*n*) time.
            pub fn seek_backward(&mut self, steps: usize) -> Result<(), usize> {
                (0..steps).try_for_each(|i| self.move_prev().map_err(|_| i))
            }

            /// Move the cursor to the given position `target`, or return an error
            /// when `target > len`.
            ///
            /// If an error occurs, the cursor will stay put.
            ///
            /// This operation should compute in *O*(*n*) time.
            ///
            /// # Examples
            ///
            /// ```
            /// use splice_list::List;
            ///
            /// let list = List::from_iter([1, 2, 3]);
            /// let mut cursor = list.cursor_start();
            ///
            /// // Move cursor to a valid place (at the third node)
            /// assert!(cursor.seek_to(2).is_ok());
            /// assert_eq!(cursor.current(), Some(&3));
            ///
            /// // Forbid to move to a invalid place
            /// assert!(cursor.seek_to(5).is_err());
            ///
            /// // The cursor is still at the third node
            /// assert_eq!(cursor.current(), Some(&3));
            /// ```
            pub fn seek_to(&mut self, target: usize) -> Result<(), usize> {
                if target == self.index {
                    return Ok(());
                }
                let len = self.list.len();
                match target {
                    target if target > len => return Err(target - len),
                    0 => self.move_to_start(),
                    target if target == len => self.move_to_end(),
                    _ => unsafe {
                        // current=c, target=t, ghost=#
                        if target > self.index {
                            // target is at the right side of current: [   c----->t   #]
                            if target - self.index <= len - target {
                                self.seek_forward_fast(target - self.index);
                            } else {
                                self.move_to_end();
                                self.seek_backward_fast(len - target);
                            }
                        } else {
                            // target is at the left side of current: [   t<-----c   #]
                            if self.index - target <= target {
                                self.seek_backward_fast(self.index - target);
                            } else {
                                self.move_to_start();
                                self.seek_forward_fast(target);
                            }
                        }
                    },
                }
                Ok(())
            }

            /// Set the cursor to the start of the list (i.e. the first node).
            #[inline]
            pub fn move_to_start(&mut self) {
                self.index = 0;
                self.current = self.list.front_node();
            }

            /// Set the cursor to the end of the list (i.e. the ghost node).
            #[inline]
            pub fn move_to_end(&mut self) {
                self.index = self.list.len();
                self.current = self.list.ghost_node();
            }
        }

        impl<'a, T: fmt::Debug + 'a, P: NodeProvider> fmt::Debug for $CURSOR<'a, T, P> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($CURSOR))
                    .field("list", &self.list)
                    .field("current", &self.current())
                    .field("index", &self.index)
                    .finish()
            }
        }
    };
}

impl_cursor!(CursorMut);
impl_cursor!(Cursor);

impl<'a, T: 'a, P: NodeProvider> Cursor<'a, T, P> {
    pub(crate) fn new(list: &'a List<T, P>, current: Link, index: usize) -> Self {
        Self {
            index,
            current,
            list,
        }
    }

    fn same_list_with(&self, other: &Self) -> bool {
        std::ptr::eq(self.list, other.list)
    }

    /// Return an immutable reference of current node of the cursor,
    /// or return `None` if it is located at the ghost node.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// assert_eq!(list.cursor(0).current(), Some(&1));
    /// assert_eq!(list.cursor(2).current(), Some(&3));
    /// assert_eq!(list.cursor(3).current(), None);
    /// ```
    pub fn current(&self) -> Option<&'a T> {
        if self.is_ghost_node() {
            return None;
        }
        // SAFETY: non-ghost nodes must hold a valid element.
        unsafe { Some(element(self.current)) }
    }

    /// Return an immutable reference of previous node of the cursor,
    /// or return `None` if it is located at the first node.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// assert_eq!(list.cursor(0).previous(), None);
    /// assert_eq!(list.cursor(1).previous(), Some(&1));
    /// assert_eq!(list.cursor(3).previous(), Some(&3));
    /// ```
    pub fn previous(&self) -> Option<&'a T> {
        if self.is_front_node() {
            return None;
        }
        // SAFETY: the previous node of a non-first node is never the ghost node.
        Some(unsafe { element(self.prev_node()) })
    }
}

impl<'a, T: 'a, P: NodeProvider> CursorMut<'a, T, P> {
    pub(crate) fn new(list: &'a mut List<T, P>, current: Link, index: usize) -> Self {
        Self {
            index,
            current,
            list,
        }
    }
}

// Methods that does not change the linking structure of the list.
impl<'a, T: 'a, P: NodeProvider> CursorMut<'a, T, P> {
    /// Return an immutable reference of current node of the cursor,
    /// or return `None` if it is located at the ghost node.
    pub fn current(&self) -> Option<&T> {
        if self.is_ghost_node() {
            return None;
        }
        // SAFETY: non-ghost nodes must hold a valid element.
        unsafe { Some(element(self.current)) }
    }

    /// Return an immutable reference of previous node of the cursor,
    /// or return `None` if it is located at the first node.
    pub fn previous(&self) -> Option<&T> {
        if self.is_front_node() {
            return None;
        }
        // SAFETY: the previous node of a non-first node is never the ghost node.
        Some(unsafe { element(self.prev_node()) })
    }

    /// Return an mutable reference of current node of the cursor,
    /// or return `None` if it is located at the ghost node.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    ///
    /// // Create a cursor and mutate the element in the current node.
    /// let mut cursor = list.cursor_mut(0);
    /// *cursor.current_mut().unwrap() *= 5;
    /// assert_eq!(cursor.current(), Some(&5));
    ///
    /// // Cannot mutate the ghost node.
    /// assert!(list.cursor_mut(3).current_mut().is_none());
    /// ```
    pub fn current_mut(&mut self) -> Option<&mut T> {
        if self.is_ghost_node() {
            return None;
        }
        // SAFETY: non-ghost nodes must hold a valid element, and the returned
        // borrow keeps the cursor exclusively borrowed.
        unsafe { Some(element_mut(self.current)) }
    }

    /// Return a mutable reference of previous node of the cursor,
    /// or return `None` if it is located at the first node.
    pub fn previous_mut(&mut self) -> Option<&mut T> {
        if self.is_front_node() {
            return None;
        }
        // SAFETY: the previous node of a non-first node is never the ghost node.
        Some(unsafe { element_mut(self.prev_node()) })
    }

    /// Re-borrow the mutable cursor as a short-lived immutable one.
    pub fn as_cursor(&self) -> Cursor<'_, T, P> {
        Cursor::new(self.list, self.current, self.index)
    }

    /// Convert the mutable cursor to an immutable one.
    pub fn into_cursor(self) -> Cursor<'a, T, P> {
        Cursor::new(self.list, self.current, self.index)
    }

    /// Temporarily view the list via an immutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// let mut cursor = list.cursor_start_mut();
    ///
    /// // Temporarily view the list
    /// assert_eq!(cursor.view().back(), Some(&3));
    ///
    /// cursor.insert(4);
    /// assert_eq!(Vec::from_iter(list), vec![4, 1, 2, 3]);
    /// ```
    pub fn view(&self) -> &List<T, P> {
        self.list
    }
}

// Methods that might change the linking structure of the list.
impl<'a, T: 'a, P: NodeProvider> CursorMut<'a, T, P> {
    /// Add an element first in the list.
    ///
    /// It is the same as [`List::push_front`], except it avoids
    /// another mutable borrow of the list while the mutable cursor
    /// is being used.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// let mut cursor = list.cursor_end_mut();
    ///
    /// cursor.insert(4);
    /// cursor.push_front(0);
    /// assert_eq!(cursor.index(), 5);
    /// assert_eq!(cursor.previous(), Some(&4));
    ///
    /// assert_eq!(Vec::from_iter(list), vec![0, 1, 2, 3, 4]);
    /// ```
    pub fn push_front(&mut self, item: T) {
        self.list.push_front(item);
        self.index += 1;
    }

    /// Remove the first element and return it, or `None` if the list is
    /// empty.
    ///
    /// If the cursor was at the first node, it moves on to the new first node.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let is_front = self.is_front_node();
        let item = self.list.pop_front();
        if is_front {
            self.current = self.list.front_node();
        } else {
            self.index -= 1;
        }
        item
    }

    /// Append an element to the back of a list.
    pub fn push_back(&mut self, item: T) {
        let at_ghost = self.is_ghost_node();
        self.list.push_back(item);
        if at_ghost {
            self.index += 1;
        }
    }

    /// Remove the last element from a list and return it, or `None` if
    /// it is empty.
    ///
    /// If the cursor was at the last node, it moves on to the ghost node.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// let mut cursor = list.cursor_mut(2);
    ///
    /// assert_eq!(cursor.pop_back(), Some(3));
    /// assert_eq!(cursor.current(), None);
    /// assert_eq!(cursor.index(), 2);
    ///
    /// assert_eq!(Vec::from_iter(list), vec![1, 2]);
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        if self.is_ghost_node() {
            self.index -= 1;
        } else if self.current == self.list.back_node() {
            self.current = self.list.ghost_node();
        }
        self.list.pop_back()
    }

    /// Add an element before the cursor position.
    ///
    /// After insertion, the cursor stays put but its `index` becomes
    /// `index + 1`.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Panics
    ///
    /// As for [`List::push_back`].
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// let mut cursor = list.cursor_mut(1);
    ///
    /// cursor.insert(4); // becomes [1, 4, 2, 3]
    /// assert_eq!(cursor.index(), 2);
    /// assert_eq!(cursor.current(), Some(&2));
    ///
    /// cursor.move_to_end();
    /// cursor.insert(5); // becomes [1, 4, 2, 3, 5]
    /// assert_eq!(cursor.index(), 5);
    /// assert_eq!(cursor.previous(), Some(&5));
    ///
    /// assert_eq!(Vec::from_iter(list), vec![1, 4, 2, 3, 5]);
    /// ```
    pub fn insert(&mut self, item: T) {
        if let Err(err) = self.try_insert(item) {
            err.raise()
        }
    }

    /// Like [`CursorMut::insert`], but reports allocation and length failures.
    /// On failure the list and the cursor are unchanged.
    pub fn try_insert(&mut self, item: T) -> Result<(), ListError> {
        // SAFETY: `self.current` is a valid node in the list.
        unsafe { self.list.insert_before(self.current, item) }?;
        self.index += 1;
        Ok(())
    }

    /// Allocate a node before the cursor position, then construct its element
    /// with `f`.
    ///
    /// If `f` fails, the node is released and its error is returned inside
    /// [`TryBuildError::Construct`]; the list is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::{List, TryBuildError};
    ///
    /// let mut list = List::from_iter([1, 3]);
    /// let mut cursor = list.cursor_mut(1);
    ///
    /// assert!(cursor.try_insert_with(|| "2".parse::<i32>()).is_ok());
    /// let err = cursor.try_insert_with(|| "two".parse::<i32>()).unwrap_err();
    /// assert!(matches!(err, TryBuildError::Construct(_)));
    ///
    /// assert_eq!(Vec::from_iter(list), vec![1, 2, 3]);
    /// ```
    pub fn try_insert_with<E, F>(&mut self, f: F) -> Result<(), TryBuildError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        // SAFETY: `self.current` is a valid node in the list.
        unsafe { self.list.emplace_before(self.current, f) }?;
        self.index += 1;
        Ok(())
    }

    /// Remove the element at the cursor and return it, or return `None`
    /// if the cursor is at the ghost node. After removal, the cursor
    /// is moved to the next node unless no removing is happened.
    ///
    /// This operation should compute in *O*(*1*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter(0..10);
    /// let mut cursor = list.cursor_mut(5);
    ///
    /// assert_eq!(cursor.remove(), Some(5)); // becomes [0, 1, 2, 3, 4, 6, 7, 8, 9]
    /// assert_eq!(cursor.index(), 5);
    /// assert_eq!(cursor.current(), Some(&6));
    ///
    /// cursor.move_to_end();
    /// assert_eq!(cursor.remove(), None);
    /// assert_eq!(cursor.index(), 9);
    ///
    /// assert_eq!(Vec::from_iter(list), vec![0, 1, 2, 3, 4, 6, 7, 8, 9]);
    /// ```
    pub fn remove(&mut self) -> Option<T> {
        if self.is_ghost_node() {
            return None;
        }
        let following = self.next_node();
        let node = std::mem::replace(&mut self.current, following);
        // SAFETY: `node` is a valid non-ghost node in the list.
        unsafe { Some(self.list.remove_node(node)) }
    }

    /// Remove the element before the cursor and return it, or return `None` if
    /// the cursor is at the first node. After removal, the cursor is not moved,
    /// but its `index` becomes `index - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter(0..10);
    /// let mut cursor = list.cursor_mut(5);
    ///
    /// assert_eq!(cursor.backspace(), Some(4)); // becomes [0, 1, 2, 3, 5, 6, 7, 8, 9]
    /// assert_eq!(cursor.index(), 4);
    /// assert_eq!(cursor.current(), Some(&5));
    ///
    /// cursor.move_to_start();
    /// assert_eq!(cursor.backspace(), None);
    /// assert_eq!(cursor.current(), Some(&0));
    /// ```
    pub fn backspace(&mut self) -> Option<T> {
        self.move_prev().ok().and_then(|_| self.remove())
    }

    /// Split the list into two after the current element (inclusive). This will
    /// return a new list consisting of everything after the cursor (inclusive),
    /// with the original list retaining everything before (exclusive).
    ///
    /// If the cursor is pointing at the ghost node, `None` will be returned.
    ///
    /// This operation should compute in *O*(*1*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter(0..10);
    /// let mut cursor = list.cursor_mut(5);
    ///
    /// let list2 = cursor.split().unwrap();
    /// assert_eq!(cursor.current(), None);
    /// assert_eq!(cursor.index(), 5);
    ///
    /// assert_eq!(Vec::from_iter(list2), vec![5, 6, 7, 8, 9]);
    /// assert_eq!(Vec::from_iter(list), vec![0, 1, 2, 3, 4]);
    /// ```
    pub fn split(&mut self) -> Option<List<T, P>>
    where
        P: Clone,
    {
        if self.is_ghost_node() {
            return None;
        }
        let len = self.list.len - self.index;
        // After splitting, the current node is pointing to the ghost node.
        let current = std::mem::replace(&mut self.current, self.list.ghost_node());
        let back = self.list.back_node();
        // SAFETY: since current is a non-ghost node, the range from current to
        // the back node is a valid run of `len` nodes.
        let chain = unsafe { self.list.detach(current, back, len) };
        Some(List::from_chain(self.list.provider.clone(), chain))
    }

    /// Split the list into two before the current element (exclusive). This will
    /// return a new list consisting of everything before the cursor (exclusive),
    /// with the original list retaining everything after (inclusive).
    ///
    /// If the cursor is pointing at the front node, `None` will be returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter(0..10);
    /// let mut cursor = list.cursor_mut(5);
    ///
    /// let list2 = cursor.split_before().unwrap();
    /// assert_eq!(cursor.current(), Some(&5));
    /// assert_eq!(cursor.index(), 0);
    ///
    /// assert_eq!(Vec::from_iter(list2), vec![0, 1, 2, 3, 4]);
    /// assert_eq!(Vec::from_iter(list), vec![5, 6, 7, 8, 9]);
    /// ```
    pub fn split_before(&mut self) -> Option<List<T, P>>
    where
        P: Clone,
    {
        if self.is_front_node() {
            return None;
        }
        // After splitting, the current node becomes a front node.
        let len = std::mem::replace(&mut self.index, 0);
        let (front, back) = (self.list.front_node(), self.prev_node());
        // SAFETY: since current is a non-front node, the range from the front node
        // to the previous node is a valid run of `len` nodes.
        let chain = unsafe { self.list.detach(front, back, len) };
        Some(List::from_chain(self.list.provider.clone(), chain))
    }

    /// Move every node of `other` between the current node and its previous
    /// node, leaving `other` empty.
    ///
    /// This operation should compute in *O*(*1*) time. Fails without touching
    /// either list if the result would exceed [`List::max_len`].
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter([0, 1, 7, 8, 9]);
    /// let mut list2 = List::from_iter([2, 3, 4, 5, 6]);
    /// let mut cursor = list.cursor_mut(2);
    ///
    /// cursor.splice(&mut list2).unwrap();
    /// assert_eq!(cursor.current(), Some(&7));
    /// assert_eq!(cursor.index(), 7);
    ///
    /// assert!(list2.is_empty());
    /// assert_eq!(Vec::from_iter(list), Vec::from_iter(0..10));
    /// ```
    pub fn splice(&mut self, other: &mut List<T, P>) -> Result<(), ListError> {
        self.list.check_grow(other.len)?;
        if let Some(chain) = other.detach_all() {
            tracing::trace!(moved = chain.len, at = self.index, "spliced a whole list");
            self.index += chain.len;
            // SAFETY: `self.current` is a valid node in the list.
            unsafe { self.list.attach(self.current, chain) };
        }
        Ok(())
    }

    /// Move the node under `donor` in front of this cursor.
    ///
    /// The donor cursor moves on to the following node. Nothing happens if the
    /// donor is at its ghost node.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter([1, 3]);
    /// let mut donor = List::from_iter([2, 4]);
    /// {
    ///     let mut cursor = list.cursor_mut(1);
    ///     let mut from = donor.cursor_start_mut();
    ///     cursor.splice_one(&mut from).unwrap();
    ///     assert_eq!(from.current(), Some(&4));
    ///     assert_eq!(cursor.index(), 2);
    /// }
    /// assert_eq!(Vec::from_iter(list), vec![1, 2, 3]);
    /// assert_eq!(Vec::from_iter(donor), vec![4]);
    /// ```
    pub fn splice_one(&mut self, donor: &mut CursorMut<'_, T, P>) -> Result<(), ListError> {
        if donor.is_ghost_node() {
            return Ok(());
        }
        self.list.check_grow(1)?;
        let following = donor.next_node();
        let node = std::mem::replace(&mut donor.current, following);
        // SAFETY: `node` is a non-ghost node of the donor list, and `self.current`
        // belongs to this list. They are different lists since both are borrowed
        // mutably.
        unsafe {
            let chain = donor.list.detach(node, node, 1);
            self.list.attach(self.current, chain);
        }
        self.index += 1;
        Ok(())
    }

    /// Move up to `n` nodes, starting at `donor`'s position, in front of this
    /// cursor. Returns how many nodes moved.
    ///
    /// The donor cursor ends at the first node it did not give away. Walking
    /// the run to count it is the only part that is not *O*(1); the length check
    /// happens after the walk and before any relinking.
    ///
    /// # Examples
    ///
    /// ```
    /// use splice_list::List;
    ///
    /// let mut list = List::from_iter([0, 4]);
    /// let mut donor = List::from_iter([1, 2, 3]);
    /// let moved = list.cursor_mut(1).splice_n(&mut donor.cursor_start_mut(), 5).unwrap();
    ///
    /// assert_eq!(moved, 3);
    /// assert!(donor.is_empty());
    /// assert_eq!(Vec::from_iter(list), vec![0, 1, 2, 3, 4]);
    /// ```
    pub fn splice_n(
        &mut self,
        donor: &mut CursorMut<'_, T, P>,
        n: usize,
    ) -> Result<usize, ListError> {
        let (front, ghost) = (donor.current, donor.list.ghost_node());
        let (mut end, mut count) = (front, 0);
        while count < n && end != ghost {
            // SAFETY: `end` is a node of the donor list.
            end = unsafe { next(end) };
            count += 1;
        }
        if count == 0 {
            return Ok(0);
        }
        self.list.check_grow(count)?;
        // SAFETY: `front..end` is a run of `count` non-ghost nodes of the donor
        // list, detached before it is attached to this one.
        unsafe {
            let chain = donor.list.detach(front, prev(end), count);
            self.list.attach(self.current, chain);
        }
        donor.current = end;
        self.index += count;
        tracing::trace!(moved = count, "spliced a run between lists");
        Ok(count)
    }
}

unsafe impl<T: Sync, P: NodeProvider + Sync> Send for Cursor<'_, T, P> {}

unsafe impl<T: Sync, P: NodeProvider + Sync> Sync for Cursor<'_, T, P> {}

unsafe impl<T: Send, P: NodeProvider + Send> Send for CursorMut<'_, T, P> {}

unsafe impl<T: Sync, P: NodeProvider + Sync> Sync for CursorMut<'_, T, P> {}
