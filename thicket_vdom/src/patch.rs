// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional reconciliation.
//!
//! ## Decision table
//!
//! For one position under a live parent, with the live node currently there,
//! the previous resolved node and the new one:
//!
//! | previous | new | action |
//! |---|---|---|
//! | any | absent | tear down and remove the live node, if any |
//! | absent | present | materialize, insert before the live node (or append) |
//! | text | text | keep if equal, else replace with a fresh text node |
//! | element | element, same tag | apply props in place, recurse over children by index |
//! | otherwise | | materialize and replace in place |
//!
//! Children are matched by index only. Reordering a list patches every
//! shifted position.
//!
//! A live node that does not match the previous tree (missing, moved away,
//! or of another tag) is reported as a [`PatchError`]; the root recovers by
//! remounting its content.

use thicket_dom::{DomError, NodeId, NodeKind};
use tracing::trace;

use crate::apply::{LiveCx, apply_props};
use crate::error::PatchError;
use crate::render::materialize;
use crate::resolve::{Resolved, Tag};

/// Reconcile one position. Returns the live node now occupying it.
pub(crate) fn patch(
    cx: &mut LiveCx<'_>,
    parent: NodeId,
    current: Option<NodeId>,
    old: Option<&Resolved>,
    new: Option<&Resolved>,
) -> Result<Option<NodeId>, PatchError> {
    let Some(new) = new else {
        if let Some(live) = current {
            trace!(%parent, %live, "remove");
            cx.teardown(live);
            cx.doc.remove_child(parent, live)?;
        }
        return Ok(None);
    };
    let Some(old) = old else {
        let fresh = materialize(cx, new)?;
        trace!(%parent, %fresh, "insert");
        cx.doc.insert_before(parent, fresh, current)?;
        return Ok(Some(fresh));
    };
    let Some(live) = current else {
        return Err(PatchError::MissingLiveNode { parent });
    };
    if cx.doc.parent(live) != Some(parent) {
        return Err(DomError::NotAChild {
            parent,
            child: live,
        }
        .into());
    }

    match (old, new) {
        (Resolved::Text(a), Resolved::Text(b)) => {
            if cx.doc.kind(live) != Some(NodeKind::Text) {
                return Err(PatchError::Mismatch { node: live });
            }
            if a == b {
                return Ok(Some(live));
            }
            trace!(%live, "text changed");
            replace(cx, parent, live, new)
        }
        (Resolved::Element(a), Resolved::Element(b)) if a.tag == b.tag => {
            let matches = match &a.tag {
                Tag::Fragment => cx.doc.kind(live) == Some(NodeKind::Fragment),
                Tag::Name(name) => cx.doc.tag(live) == Some(name.as_str()),
            };
            if !matches {
                return Err(PatchError::Mismatch { node: live });
            }
            if matches!(a.tag, Tag::Name(_)) {
                apply_props(cx, live, Some(&a.props), Some(&b.props))?;
            }
            let live_children = cx.doc.children(live).to_vec();
            let len = a.children.len().max(b.children.len());
            for i in 0..len {
                patch(
                    cx,
                    live,
                    live_children.get(i).copied(),
                    a.children.get(i),
                    b.children.get(i),
                )?;
            }
            Ok(Some(live))
        }
        _ => {
            trace!(%live, "node type changed");
            replace(cx, parent, live, new)
        }
    }
}

fn replace(
    cx: &mut LiveCx<'_>,
    parent: NodeId,
    live: NodeId,
    new: &Resolved,
) -> Result<Option<NodeId>, PatchError> {
    let fresh = materialize(cx, new)?;
    cx.teardown(live);
    if let Err(err) = cx.doc.replace_child(parent, fresh, live) {
        cx.discard(fresh);
        return Err(err.into());
    }
    Ok(Some(fresh))
}
