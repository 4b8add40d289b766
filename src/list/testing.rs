//! Test-only helpers: an allocation counting provider and element types that
//! record drops or panic on demand.

use crate::error::ListError;
use crate::list::provider::{Heap, NodeProvider};
use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Counters {
    outstanding: Cell<usize>,
    total: Cell<usize>,
    fail_after: Cell<Option<usize>>,
}

/// A provider that forwards to [`Heap`] while counting live slots.
///
/// Clones share their counters, so nodes spliced between two lists built
/// from the same provider keep the books balanced.
#[derive(Debug, Clone, Default)]
pub(crate) struct CountingProvider {
    counters: Rc<Counters>,
    max_len: Option<usize>,
}

impl CountingProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            ..Self::default()
        }
    }

    /// Let `n` more allocations succeed, then fail every following one.
    pub(crate) fn fail_after(&self, n: usize) {
        self.counters.fail_after.set(Some(n));
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.counters.outstanding.get()
    }

    pub(crate) fn total_allocations(&self) -> usize {
        self.counters.total.get()
    }
}

unsafe impl NodeProvider for CountingProvider {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, ListError> {
        let counters = &self.counters;
        if let Some(left) = counters.fail_after.get() {
            if left == 0 {
                return Err(ListError::AllocFailed { layout });
            }
            counters.fail_after.set(Some(left - 1));
        }
        let ptr = Heap.allocate(layout)?;
        counters.outstanding.set(counters.outstanding.get() + 1);
        counters.total.set(counters.total.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let counters = &self.counters;
        counters.outstanding.set(counters.outstanding.get() - 1);
        Heap.deallocate(ptr, layout)
    }

    fn max_len(&self) -> usize {
        self.max_len.unwrap_or(isize::MAX as usize)
    }
}

/// Records its value into a shared log when dropped.
#[derive(Debug)]
pub(crate) struct DropChecker<'a> {
    value: i32,
    dropped: &'a RefCell<Vec<i32>>,
}

impl<'a> DropChecker<'a> {
    pub(crate) fn new(value: i32, dropped: &'a RefCell<Vec<i32>>) -> Self {
        Self { value, dropped }
    }
}

impl Drop for DropChecker<'_> {
    fn drop(&mut self) {
        self.dropped.borrow_mut().push(self.value);
    }
}

/// A value whose `clone` panics once the shared budget of clones is used up.
#[derive(Debug)]
pub(crate) struct CloneBomb {
    pub(crate) value: i32,
    budget: Rc<Cell<usize>>,
}

impl CloneBomb {
    pub(crate) fn new(value: i32, budget: &Rc<Cell<usize>>) -> Self {
        Self {
            value,
            budget: Rc::clone(budget),
        }
    }
}

impl Clone for CloneBomb {
    fn clone(&self) -> Self {
        let left = self.budget.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }
        self.budget.set(left - 1);
        Self {
            value: self.value,
            budget: Rc::clone(&self.budget),
        }
    }
}
