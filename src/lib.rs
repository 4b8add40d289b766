//! This crate provides a doubly-linked list with owned nodes, implemented as a
//! cyclic ring around a ghost node.
//!
//! The [`List`] is built for structural edits: inserting or removing at a known
//! position, and moving whole runs of nodes within a list or between lists,
//! all take constant time once the position is reached. Sorting and merging
//! only rewrite links, so no element is ever moved in memory while it is in a
//! list.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use splice_list::List;
//!
//! let mut list = List::from_iter([1, 2, 3, 4]);
//!
//! let mut cursor = list.cursor_start_mut();
//!
//! cursor.insert(0); // insert 0 at the beginning of the list
//! assert_eq!(cursor.current(), Some(&1));
//! assert_eq!(cursor.view(), &List::from_iter([0, 1, 2, 3, 4]));
//!
//! cursor.seek_to(3).unwrap(); // move the cursor to position 3, and removes it.
//! assert_eq!(cursor.remove(), Some(3));
//! assert_eq!(cursor.view(), &List::from_iter([0, 1, 2, 4]));
//!
//! cursor.push_front(5); // pushing front to the list is also allowed
//! assert_eq!(cursor.view(), &List::from_iter([5, 0, 1, 2, 4]));
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Node N  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        ├───────────┤
//! │  ║ payload T ║           ║ payload T ║                        ┊No payload ┊
//! │  ╚═══════════╝           ╚═══════════╝                        └╌╌╌╌╌╌╌╌╌╌╌┘
//! │      Node 0                  Node 1                               ↑   ↑
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╟───────────╢
//! ║    len    ║
//! ╟───────────╢
//! ║ provider  ║
//! ╚═══════════╝
//!     List
//! ```
//! The `List` contains:
//! - a pointer `ghost` that points to the ghost node;
//! - the length `len` of the list;
//! - the [`NodeProvider`] that allocates and releases its element nodes.
//!
//! Each element node is allocated by the provider, and contains:
//! - the `next` pointer that points to the next element (or the ghost node if it
//!   is the last element in the list);
//! - the `prev` pointer that points to the previous element (or the ghost node if
//!   it is the first element in the list);
//! - the actual payload `T`.
//!
//! The ghost node has *NO* payload. It lives on the global heap for the whole
//! life of the list, so moving a `List` never touches its nodes.
//!
//! In convention, in a list with length *n*, the nodes are indexed by 0, 1, ...,
//! *n* - 1, and the ghost node is always indexed by *n*.
//!
//! # Node Providers
//!
//! All element nodes go through a [`NodeProvider`]. The default [`Heap`]
//! provider uses the global allocator. A provider also bounds the length of
//! the list with [`NodeProvider::max_len`]. Every operation that grows a list
//! checks that bound before it allocates anything, and reports a [`ListError`]
//! from its `try_` form:
//!
//! ```
//! use splice_list::{List, ListError};
//!
//! let mut list = List::new();
//! list.try_push_back(1)?;
//! list.try_insert_n(1, 3, 0)?;
//! assert_eq!(list.into_vec(), vec![1, 0, 0, 0]);
//! # Ok::<(), ListError>(())
//! ```
//!
//! # Batches
//!
//! Operations that create several nodes at once (`insert_n`, `insert_iter`,
//! `extend`, `resize`, the constructors, `clone`) build a detached chain first
//! and link it into the list only when every element was constructed. If a
//! value fails to construct, or an allocation fails, the chain is torn down and
//! the list is left exactly as it was.
//!
//! ```
//! use splice_list::{List, TryBuildError};
//!
//! let mut list = List::from([1, 2]);
//! let mut next = 0;
//! let result = list.try_insert_with(1, 5, || {
//!     next += 1;
//!     if next < 4 { Ok(next * 10) } else { Err("out of values") }
//! });
//!
//! assert_eq!(result, Err(TryBuildError::Construct("out of values")));
//! assert_eq!(list.into_vec(), vec![1, 2]);
//! ```
//!
//! # Iteration
//!
//! Iterating over a list is by the [`Iter`] and [`IterMut`] iterators. These are
//! double-ended iterators and iterate the list like an array (fused and non-cyclic).
//! [`IterMut`] provides mutability of the elements (but not the linked structure of
//! the list).
//!
//! ## Examples
//!
//! ```
//! use splice_list::List;
//!
//! let mut list = List::from_iter([1, 2, 3]);
//! let mut iter = list.iter();
//! assert_eq!(iter.next(), Some(&1));
//! assert_eq!(iter.next(), Some(&2));
//! assert_eq!(iter.next(), Some(&3));
//! assert_eq!(iter.next(), None);
//! assert_eq!(iter.next(), None); // Fused and non-cyclic
//!
//! list.iter_mut().for_each(|item| *item *= 2);
//! assert_eq!(Vec::from_iter(list), vec![2, 4, 6]);
//! ```
//!
//! # Cursors
//!
//! The cursors [`Cursor`] and [`CursorMut`] can move forward or backward over
//! the list. In a list with length *n*, there are *n* + 1 valid locations for
//! the cursor, indexed by 0, 1, ..., *n*, where *n* is the ghost node of the
//! list.
//!
//! [`CursorMut`] provides many useful ways to mutate the list in any position.
//! - [`insert`]: insert a new item at the cursor;
//! - [`remove`]: remove the item at the cursor;
//! - [`backspace`]: remove the item before the cursor;
//! - [`split`]: split the list into a new one, from the cursor position to the end;
//! - [`splice`]: splice another list before the cursor position;
//! - [`splice_n`]: move a run of another cursor's list before the cursor position.
//!
//! ## Examples
//!
//! ```
//! use splice_list::List;
//!
//! let mut list = List::from_iter([1, 2, 3, 4]);
//!
//! let mut cursor = list.cursor_start_mut();
//!
//! cursor.insert(5); // becomes [5, 1, 2, 3, 4], points to 1
//! assert_eq!(cursor.current(), Some(&1));
//!
//! assert!(cursor.seek_forward(2).is_ok());
//! assert_eq!(cursor.remove(), Some(3)); // becomes [5, 1, 2, 4], points to 4
//! assert_eq!(cursor.current(), Some(&4));
//!
//! assert_eq!(cursor.backspace(), Some(2)); // becomes [5, 1, 4], points to 4
//! assert_eq!(cursor.current(), Some(&4));
//!
//! assert_eq!(Vec::from_iter(list), vec![5, 1, 4]);
//! ```
//!
//! # Algorithms
//!
//! [`List::sort`], [`List::merge`], [`List::dedup`], [`List::remove_if`] and
//! [`List::reverse`] all work on links alone. Sorting and merging are stable.
//!
//! ```
//! use splice_list::List;
//!
//! let mut list = List::from([5, 3, 8, 1]);
//! list.sort();
//! assert_eq!(list.to_vec(), vec![1, 3, 5, 8]);
//!
//! let mut other = List::from([2, 3, 9]);
//! list.merge(&mut other).unwrap();
//! list.dedup();
//! assert_eq!(list.to_vec(), vec![1, 2, 3, 5, 8, 9]);
//!
//! list.reverse();
//! assert_eq!(list.into_vec(), vec![9, 8, 5, 3, 2, 1]);
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber: rejected
//! growth and unwound batches at `debug`, splice, merge and sort statistics at
//! `trace`.
//!
//! [`insert`]: crate::list::cursor::CursorMut::insert
//! [`remove`]: crate::list::cursor::CursorMut::remove
//! [`backspace`]: crate::list::cursor::CursorMut::backspace
//! [`split`]: crate::list::cursor::CursorMut::split
//! [`splice`]: crate::list::cursor::CursorMut::splice
//! [`splice_n`]: crate::list::cursor::CursorMut::splice_n

#[doc(inline)]
pub use error::{ListError, TryBuildError};
#[doc(inline)]
pub use list::cursor::{Cursor, CursorMut};
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter, IterMut};
#[doc(inline)]
pub use list::provider::{Heap, NodeProvider};
#[doc(inline)]
pub use list::{Drain, ExtractIf, List};

pub mod error;
pub mod list;
