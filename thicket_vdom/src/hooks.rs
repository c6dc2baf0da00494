// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Call-order state.
//!
//! ## Overview
//!
//! A root owns one [`HookStore`]: an ordered list of slots addressed by the
//! position of each [`Scope::use_state`] call within a pass. The cursor is
//! reset at the start of every pass, so a component that declares its state
//! unconditionally and in a fixed order finds the same slots every time.
//!
//! ## Checks
//!
//! - At the end of a pass the number of declarations is compared with the
//!   previous pass; a difference fails the pass with
//!   [`HookError::OrderChanged`].
//! - A slot is typed by its first declaration. Reading it back as another type
//!   fails with [`HookError::TypeMismatch`].

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::HookError;
use crate::root::RootRef;

#[derive(Default)]
pub(crate) struct HookStore {
    slots: Vec<Rc<dyn Any>>,
    cursor: usize,
    previous: Option<usize>,
}

impl fmt::Debug for HookStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookStore")
            .field("slots", &self.slots.len())
            .field("cursor", &self.cursor)
            .field("previous", &self.previous)
            .finish()
    }
}

impl HookStore {
    pub(crate) fn begin_pass(&mut self) {
        self.cursor = 0;
    }

    /// Close a pass. The declaration count is only recorded when the pass is consistent.
    pub(crate) fn end_pass(&mut self, check_order: bool) -> Result<(), HookError> {
        if check_order
            && let Some(expected) = self.previous
            && expected != self.cursor
        {
            return Err(HookError::OrderChanged {
                expected,
                found: self.cursor,
            });
        }
        self.previous = Some(self.cursor);
        Ok(())
    }

    /// Advance the cursor. `Ok(None)` means the slot does not exist yet.
    fn claim<T: 'static>(&mut self) -> Result<Option<Rc<RefCell<T>>>, HookError> {
        let slot = self.cursor;
        self.cursor += 1;
        let Some(existing) = self.slots.get(slot) else {
            return Ok(None);
        };
        Rc::clone(existing)
            .downcast::<RefCell<T>>()
            .map(Some)
            .map_err(|_| HookError::TypeMismatch {
                slot,
                expected: type_name::<T>(),
            })
    }

    fn allocate<T: 'static>(&mut self, initial: T) -> Rc<RefCell<T>> {
        let cell = Rc::new(RefCell::new(initial));
        self.slots.push(cell.clone());
        cell
    }

    pub(crate) fn reset(&mut self) {
        self.slots.clear();
        self.cursor = 0;
        self.previous = None;
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn value<T: Clone + 'static>(&self, slot: usize) -> Option<T> {
        self.slots
            .get(slot)?
            .downcast_ref::<RefCell<T>>()
            .map(|cell| cell.borrow().clone())
    }
}

/// Per-pass context handed to components.
pub struct Scope {
    hooks: Rc<RefCell<HookStore>>,
    root: RootRef,
    max_depth: usize,
    hook_error: RefCell<Option<HookError>>,
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("hooks", &self.hooks)
            .field("root", &self.root)
            .field("max_depth", &self.max_depth)
            .field("hook_error", &self.hook_error)
            .finish()
    }
}

impl Scope {
    pub(crate) fn new(hooks: Rc<RefCell<HookStore>>, root: RootRef, max_depth: usize) -> Self {
        Self {
            hooks,
            root,
            max_depth,
            hook_error: RefCell::new(None),
        }
    }

    /// A scope bound to no root, with its own store.
    ///
    /// Setters created through it update their cell and schedule nothing.
    pub fn detached() -> Self {
        Self::new(
            Rc::default(),
            RootRef::default(),
            crate::root::RootConfig::default().max_depth,
        )
    }

    /// Declare a state slot.
    ///
    /// The first pass stores `initial`; later passes return the stored value
    /// and ignore `initial`. Must be called unconditionally and in the same
    /// order on every pass.
    pub fn use_state<T: 'static>(&self, initial: T) -> (State<T>, Setter<T>) {
        let claimed = self.hooks.borrow_mut().claim::<T>();
        let cell = match claimed {
            Ok(Some(cell)) => cell,
            Ok(None) => self.hooks.borrow_mut().allocate(initial),
            Err(err) => {
                trace!(%err, "hook misuse recorded");
                let mut first = self.hook_error.borrow_mut();
                if first.is_none() {
                    *first = Some(err);
                }
                Rc::new(RefCell::new(initial))
            }
        };
        (
            State(cell.clone()),
            Setter {
                cell,
                root: self.root.clone(),
            },
        )
    }

    /// Handle of the root this pass belongs to.
    pub fn root(&self) -> &RootRef {
        &self.root
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn take_hook_error(&self) -> Option<HookError> {
        self.hook_error.borrow_mut().take()
    }
}

/// Read access to a state slot.
pub struct State<T>(Rc<RefCell<T>>);

impl<T> State<T> {
    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }
}

impl<T: Clone> State<T> {
    /// Clone the current value.
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State").field(&self.0.borrow()).finish()
    }
}

/// Write access to a state slot. Every write triggers a render of the owning root.
pub struct Setter<T> {
    cell: Rc<RefCell<T>>,
    root: RootRef,
}

impl<T> Setter<T> {
    /// Store `value` and render.
    pub fn set(&self, value: T) {
        *self.cell.borrow_mut() = value;
        self.root.request_render();
    }

    /// Modify the value in place and render.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.cell.borrow_mut());
        self.root.request_render();
    }
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
            root: self.root.clone(),
        }
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_persist_across_passes() {
        let scope = Scope::detached();
        scope.hooks.borrow_mut().begin_pass();
        let (count, set) = scope.use_state(0_i32);
        let (label, _) = scope.use_state(String::from("a"));
        scope.hooks.borrow_mut().end_pass(true).unwrap();
        set.set(5);
        assert_eq!(count.get(), 5);

        scope.hooks.borrow_mut().begin_pass();
        let (count, _) = scope.use_state(100_i32);
        let (again, _) = scope.use_state(String::from("ignored"));
        scope.hooks.borrow_mut().end_pass(true).unwrap();
        assert_eq!(count.get(), 5);
        assert_eq!(again.get(), label.get());
        assert_eq!(scope.hooks.borrow().value::<i32>(0), Some(5));
    }

    #[test]
    fn changed_declaration_count_fails() {
        let mut store = HookStore::default();
        store.begin_pass();
        store.allocate(1_u8);
        store.cursor = 1;
        store.end_pass(true).unwrap();

        store.begin_pass();
        assert_eq!(
            store.end_pass(true),
            Err(HookError::OrderChanged {
                expected: 1,
                found: 0
            })
        );
        store.begin_pass();
        assert_eq!(store.end_pass(false), Ok(()));
    }

    #[test]
    fn type_mismatch_is_recorded() {
        let scope = Scope::detached();
        scope.hooks.borrow_mut().begin_pass();
        let _ = scope.use_state(1_i32);
        scope.hooks.borrow_mut().begin_pass();
        let (fallback, _) = scope.use_state("text");
        assert_eq!(fallback.get(), "text");
        assert!(matches!(
            scope.take_hook_error(),
            Some(HookError::TypeMismatch { slot: 0, .. })
        ));
        assert_eq!(scope.take_hook_error(), None);
    }

    #[test]
    fn reset_forgets_slots() {
        let mut store = HookStore::default();
        store.allocate(3_i32);
        store.reset();
        assert_eq!(store.len(), 0);
        assert_eq!(store.value::<i32>(0), None);
    }
}
