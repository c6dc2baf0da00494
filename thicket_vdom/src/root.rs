// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount points.
//!
//! ## Overview
//!
//! A [`Root`] is one independent mount point. It owns everything a render
//! needs: the live [`Document`], the delegation registry, the table of direct
//! listeners attached by the applier, the hook store and the current binding
//! (root description, container and last resolved tree). Two roots never share
//! state.
//!
//! ## Passes
//!
//! [`Root::mount`] resolves the description against fresh state, clears the
//! container and materializes from scratch. The previous binding and its
//! state are only replaced once the new content is attached. [`Root::render`] resolves again, patches the
//! live tree against the previous resolved tree and stores the new one. A
//! failed patch is recovered by remounting the container content.
//!
//! Passes do not nest. A setter invoked while a pass is running (from a
//! component body or a ref callback) stores its value and schedules one more
//! pass, which starts as soon as the current one completes.
//!
//! ## Example
//!
//! ```
//! use thicket_vdom::{Component, Props, Root, children, create_element};
//!
//! let counter = Component::new("Counter", |_, scope| {
//!     let (count, set_count) = scope.use_state(0);
//!     let n = count.get();
//!     create_element(
//!         "button",
//!         Some(Props::new().on_click(move |_, _| {
//!             set_count.set(n + 1);
//!             Ok(())
//!         })),
//!         children![n],
//!     )
//! });
//!
//! let root = Root::new();
//! let container = root.with_document_mut(|doc| doc.create_element("div"));
//! root.mount(create_element(&counter, None, children![]), container).unwrap();
//!
//! let button = root.with_document(|doc| doc.child_at(container, 0)).unwrap();
//! root.click(button);
//! root.click(button);
//! assert_eq!(
//!     root.with_document(|doc| doc.to_html(container)),
//!     "<div><button data-click-id=\"3\">2</button></div>"
//! );
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use thicket_dom::{Document, Event, NodeId};
use thicket_events::dispatch::{DispatchReport, plan};
use thicket_events::registry::{DelegationConfig, DelegationRegistry};
use tracing::{debug, debug_span, trace, warn};

use crate::apply::{ListenerTable, LiveCx};
use crate::error::{ErrorSink, Incident, RenderError, TracingSink};
use crate::hooks::{HookStore, Scope};
use crate::node::Node;
use crate::patch::patch;
use crate::render::materialize;
use crate::resolve::{Resolved, resolve};

/// Limits and options of a [`Root`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootConfig {
    /// Maximum nesting of description nodes, components included.
    pub max_depth: usize,
    /// Maximum passes one call may run when setters keep scheduling more.
    pub max_render_passes: usize,
    /// Fail a pass whose number of state declarations differs from the previous pass.
    pub check_hook_order: bool,
    /// Delegated event category and marker attribute.
    pub delegation: DelegationConfig,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_render_passes: 32,
            check_hook_order: true,
            delegation: DelegationConfig::default(),
        }
    }
}

/// Counters of completed passes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Completed mounts.
    pub mounts: u64,
    /// Completed re-renders.
    pub renders: u64,
    /// Re-renders that fell back to remounting.
    pub recoveries: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum PassState {
    Idle,
    Running,
    Pending,
}

enum PassKind {
    Mount { node: Node, container: NodeId },
    Update,
}

struct Live {
    doc: Document,
    registry: DelegationRegistry,
    listeners: ListenerTable,
}

impl Live {
    fn cx(&mut self) -> LiveCx<'_> {
        LiveCx {
            doc: &mut self.doc,
            registry: &mut self.registry,
            listeners: &mut self.listeners,
        }
    }
}

struct Binding {
    node: Node,
    container: NodeId,
    resolved: Resolved,
    /// Live root node, tracked even after it leaves the container.
    live: NodeId,
}

struct RootInner {
    config: RootConfig,
    live: RefCell<Live>,
    hooks: Rc<RefCell<HookStore>>,
    binding: RefCell<Option<Binding>>,
    pass: Cell<PassState>,
    stats: Cell<RenderStats>,
    sink: RefCell<Rc<dyn ErrorSink>>,
}

impl RootInner {
    fn report(&self, incident: Incident<'_>) {
        let sink = Rc::clone(&self.sink.borrow());
        sink.report(incident);
    }

    fn bump(&self, f: impl FnOnce(&mut RenderStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

/// Resets the pass state when a pass ends, however it ends.
struct PassGuard<'a>(&'a Cell<PassState>);

impl<'a> PassGuard<'a> {
    fn enter(state: &'a Cell<PassState>) -> Self {
        state.set(PassState::Running);
        Self(state)
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(PassState::Idle);
    }
}

/// An independent mount point. Cloning yields another handle to the same root.
#[derive(Clone)]
pub struct Root {
    inner: Rc<RootInner>,
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("config", &self.inner.config)
            .field(
                "container",
                &self
                    .inner
                    .binding
                    .try_borrow()
                    .ok()
                    .and_then(|b| b.as_ref().map(|b| b.container)),
            )
            .field("pass", &self.inner.pass.get())
            .field("stats", &self.inner.stats.get())
            .finish_non_exhaustive()
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Root {
    /// A root with the default configuration and an empty document.
    pub fn new() -> Self {
        Self::with_config(RootConfig::default())
    }

    /// A root with `config` and an empty document.
    pub fn with_config(config: RootConfig) -> Self {
        let registry = DelegationRegistry::new(config.delegation.clone());
        Self {
            inner: Rc::new(RootInner {
                config,
                live: RefCell::new(Live {
                    doc: Document::new(),
                    registry,
                    listeners: ListenerTable::new(),
                }),
                hooks: Rc::default(),
                binding: RefCell::new(None),
                pass: Cell::new(PassState::Idle),
                stats: Cell::new(RenderStats::default()),
                sink: RefCell::new(Rc::new(TracingSink)),
            }),
        }
    }

    /// Replace the error sink. The default logs through `tracing`.
    pub fn set_error_sink(&self, sink: impl ErrorSink + 'static) {
        *self.inner.sink.borrow_mut() = Rc::new(sink);
    }

    /// The configuration this root was created with.
    pub fn config(&self) -> &RootConfig {
        &self.inner.config
    }

    /// A weak handle, for use from handlers and setters.
    pub fn handle(&self) -> RootRef {
        RootRef(Rc::downgrade(&self.inner))
    }

    /// Mount `node` into `container`, replacing whatever the container held.
    ///
    /// Any previous binding is discarded together with its state.
    pub fn mount(&self, node: Node, container: NodeId) -> Result<(), RenderError> {
        if self.inner.pass.get() != PassState::Idle {
            return Err(RenderError::Busy);
        }
        self.run(PassKind::Mount { node, container })
    }

    /// Re-render the mounted description.
    ///
    /// While a pass is running this only schedules a follow-up pass.
    pub fn render(&self) -> Result<(), RenderError> {
        if self.inner.pass.get() == PassState::Idle {
            self.run(PassKind::Update)
        } else {
            trace!("render deferred until the running pass completes");
            self.inner.pass.set(PassState::Pending);
            Ok(())
        }
    }

    /// Deliver `event` to direct listeners and the delegated handler.
    ///
    /// Handler failures are forwarded to the error sink and listed in the report.
    pub fn dispatch(&self, event: &Event) -> DispatchReport {
        let planned = match self.inner.live.try_borrow() {
            Ok(live) => plan(&live.doc, &live.registry, event),
            Err(_) => {
                warn!(event = event.name(), "event dispatched during a pass was dropped");
                return DispatchReport::default();
            }
        };
        let report = planned.run(event);
        for failure in &report.failures {
            self.inner.report(Incident::Handler(failure));
        }
        report
    }

    /// Dispatch a click aimed at `target`.
    pub fn click(&self, target: NodeId) -> DispatchReport {
        self.dispatch(&Event::click(target))
    }

    /// Read the live document.
    ///
    /// # Panics
    ///
    /// Panics when called while the document is being modified, e.g. from a
    /// ref callback. Use [`Root::try_with_document`] there.
    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.inner.live.borrow().doc)
    }

    /// Modify the live document, e.g. to create a container.
    ///
    /// # Panics
    ///
    /// Panics when the document is already borrowed, e.g. from a ref callback.
    /// Use [`Root::try_with_document_mut`] there.
    pub fn with_document_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.inner.live.borrow_mut().doc)
    }

    /// Read the live document, or fail with [`RenderError::Busy`] while a pass holds it.
    pub fn try_with_document<R>(
        &self,
        f: impl FnOnce(&Document) -> R,
    ) -> Result<R, RenderError> {
        let live = self.inner.live.try_borrow().map_err(|_| RenderError::Busy)?;
        Ok(f(&live.doc))
    }

    /// Modify the live document, or fail with [`RenderError::Busy`] while it is borrowed.
    pub fn try_with_document_mut<R>(
        &self,
        f: impl FnOnce(&mut Document) -> R,
    ) -> Result<R, RenderError> {
        let mut live = self
            .inner
            .live
            .try_borrow_mut()
            .map_err(|_| RenderError::Busy)?;
        Ok(f(&mut live.doc))
    }

    /// The last resolved tree.
    pub fn resolved(&self) -> Option<Resolved> {
        self.inner
            .binding
            .borrow()
            .as_ref()
            .map(|b| b.resolved.clone())
    }

    /// The container of the current binding.
    pub fn container(&self) -> Option<NodeId> {
        self.inner.binding.borrow().as_ref().map(|b| b.container)
    }

    /// Pass counters.
    pub fn stats(&self) -> RenderStats {
        self.inner.stats.get()
    }

    /// Whether a pass is running.
    pub fn is_rendering(&self) -> bool {
        self.inner.pass.get() != PassState::Idle
    }

    /// Current value of a state slot, by declaration index.
    pub fn hook_value<T: Clone + 'static>(&self, slot: usize) -> Option<T> {
        self.inner.hooks.borrow().value(slot)
    }

    /// Number of state slots allocated.
    pub fn hook_count(&self) -> usize {
        self.inner.hooks.borrow().len()
    }

    /// Number of delegated handlers bound.
    pub fn delegated_count(&self) -> usize {
        self.inner.live.borrow().registry.len()
    }

    fn run(&self, first: PassKind) -> Result<(), RenderError> {
        let _guard = PassGuard::enter(&self.inner.pass);
        let limit = self.inner.config.max_render_passes;
        let mut kind = first;
        let mut passes = 0;
        loop {
            if passes == limit {
                return Err(RenderError::RenderLoop { limit });
            }
            passes += 1;
            self.inner.pass.set(PassState::Running);
            match kind {
                PassKind::Mount { node, container } => self.mount_pass(node, container)?,
                PassKind::Update => self.update_pass()?,
            }
            if self.inner.pass.get() != PassState::Pending {
                return Ok(());
            }
            kind = PassKind::Update;
        }
    }

    fn resolve_pass(
        &self,
        hooks: &Rc<RefCell<HookStore>>,
        node: &Node,
    ) -> Result<Resolved, RenderError> {
        let scope = Scope::new(Rc::clone(hooks), self.handle(), self.inner.config.max_depth);
        hooks.borrow_mut().begin_pass();
        let resolved = resolve(node, &scope)?;
        if let Some(err) = scope.take_hook_error() {
            return Err(err.into());
        }
        hooks
            .borrow_mut()
            .end_pass(self.inner.config.check_hook_order)?;
        Ok(resolved)
    }

    fn mount_pass(&self, node: Node, container: NodeId) -> Result<(), RenderError> {
        let _span = debug_span!("mount", %container).entered();
        // The current binding and its state stay in place until the new content is attached.
        let hooks: Rc<RefCell<HookStore>> = Rc::default();
        let resolved = self.resolve_pass(&hooks, &node)?;
        let previous = self.inner.binding.borrow().as_ref().map(|b| b.live);
        let fresh = {
            let mut live = self.inner.live.borrow_mut();
            let mut cx = live.cx();
            let fresh = materialize(&mut cx, &resolved)?;
            if let Err(err) = cx.clear_container(container) {
                cx.discard(fresh);
                return Err(err.into());
            }
            if let Some(old) = previous {
                cx.discard(old);
            }
            if let Err(err) = cx.doc.append_child(container, fresh) {
                cx.discard(fresh);
                *self.inner.binding.borrow_mut() = None;
                return Err(err.into());
            }
            fresh
        };
        let state = std::mem::take(&mut *hooks.borrow_mut());
        *self.inner.hooks.borrow_mut() = state;
        *self.inner.binding.borrow_mut() = Some(Binding {
            node,
            container,
            resolved,
            live: fresh,
        });
        self.inner.bump(|s| s.mounts += 1);
        debug!("mounted");
        Ok(())
    }

    fn update_pass(&self) -> Result<(), RenderError> {
        let (node, container) = self
            .inner
            .binding
            .borrow()
            .as_ref()
            .map(|b| (b.node.clone(), b.container))
            .ok_or(RenderError::NotMounted)?;
        let _span = debug_span!("render", %container).entered();
        let resolved = self.resolve_pass(&self.inner.hooks, &node)?;

        let outcome = {
            let binding = self.inner.binding.borrow();
            let previous = binding.as_ref().map(|b| &b.resolved);
            let current = binding.as_ref().map(|b| b.live);
            let mut live = self.inner.live.borrow_mut();
            let mut cx = live.cx();
            patch(&mut cx, container, current, previous, Some(&resolved))
        };
        let live_root = match outcome {
            Ok(Some(id)) => id,
            Ok(None) => return Err(RenderError::NotMounted),
            Err(err) => {
                debug!(%err, "patch failed, remounting root content");
                self.inner.report(Incident::PatchRecovered(&err));
                let stale = self.inner.binding.borrow().as_ref().map(|b| b.live);
                let mut live = self.inner.live.borrow_mut();
                let mut cx = live.cx();
                if let Some(stale) = stale {
                    cx.discard(stale);
                }
                cx.clear_container(container)?;
                let fresh = materialize(&mut cx, &resolved)?;
                if let Err(err) = cx.doc.append_child(container, fresh) {
                    cx.discard(fresh);
                    return Err(err.into());
                }
                drop(live);
                self.inner.bump(|s| s.recoveries += 1);
                fresh
            }
        };

        if let Some(binding) = self.inner.binding.borrow_mut().as_mut() {
            binding.resolved = resolved;
            binding.live = live_root;
        }
        self.inner.bump(|s| s.renders += 1);
        debug!("rendered");
        Ok(())
    }
}

/// Weak handle to a [`Root`]. The default handle is bound to no root.
#[derive(Clone, Default)]
pub struct RootRef(Weak<RootInner>);

impl fmt::Debug for RootRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RootRef")
            .field(&if self.0.strong_count() > 0 {
                "live"
            } else {
                "detached"
            })
            .finish()
    }
}

impl RootRef {
    /// The root, if it is still alive.
    pub fn upgrade(&self) -> Option<Root> {
        self.0.upgrade().map(|inner| Root { inner })
    }

    /// Render the root now, or after the running pass. Failures go to the root's error sink.
    pub fn request_render(&self) {
        let Some(root) = self.upgrade() else {
            trace!("render requested on a detached root");
            return;
        };
        if let Err(err) = root.render() {
            debug!(%err, "render requested by a state change failed");
            root.inner.report(Incident::Render(&err));
        }
    }
}
