//! Node slot allocation.
//!
//! A [`List`](crate::List) never calls the global allocator for its element
//! nodes directly. Every node slot is obtained from, and given back to, the
//! list's [`NodeProvider`]. This makes the allocation strategy pluggable and
//! lets tests count or fail allocations.

use crate::error::ListError;
use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

/// Hands out and takes back memory for list nodes.
///
/// Values are placed into a slot by the list itself (moved in, cloned in, or
/// produced by a caller supplied constructor), and dropped in place before
/// the slot is deallocated.
///
/// # Safety
///
/// - `allocate` must return a block that fits `layout` and stays valid until it
///   is passed to `deallocate`.
/// - Splicing moves nodes between lists, so a slot allocated by one value of the
///   provider type may be deallocated by another value of the same type.
///   Stateful providers must share their state between values (for example
///   through an `Rc`).
pub unsafe trait NodeProvider {
    /// Allocates one node slot.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, ListError>;

    /// Releases one node slot.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` with the same `layout` and
    /// not deallocated since.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// The largest length a list using this provider may reach.
    fn max_len(&self) -> usize {
        isize::MAX as usize
    }
}

unsafe impl<P: NodeProvider + ?Sized> NodeProvider for &P {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, ListError> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }

    fn max_len(&self) -> usize {
        (**self).max_len()
    }
}

/// The default provider, backed by the global allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Heap;

unsafe impl NodeProvider for Heap {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, ListError> {
        debug_assert!(layout.size() > 0, "list nodes always carry two links");
        // SAFETY: node layouts are never zero-sized.
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).ok_or(ListError::AllocFailed { layout })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        dealloc(ptr.as_ptr(), layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_round_trip() {
        let layout = Layout::new::<[usize; 3]>();
        let ptr = Heap.allocate(layout).unwrap();
        unsafe {
            ptr.cast::<[usize; 3]>().as_ptr().write([1, 2, 3]);
            assert_eq!(*ptr.cast::<[usize; 3]>().as_ptr(), [1, 2, 3]);
            Heap.deallocate(ptr, layout);
        }
        assert_eq!(Heap.max_len(), isize::MAX as usize);
    }

    #[test]
    fn reference_forwards() {
        let provider = &Heap;
        assert_eq!(provider.max_len(), Heap.max_len());
        let layout = Layout::new::<u64>();
        let ptr = provider.allocate(layout).unwrap();
        unsafe { provider.deallocate(ptr, layout) };
    }
}
