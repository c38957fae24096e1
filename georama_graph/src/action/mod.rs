// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visitor-based traversal.
//!
//! Every read-only query over the graph is a [`NodeAction`]: a one-shot visitor
//! handed to [`GraphNode::execute`](crate::GraphNode::execute) or
//! [`VolumeLink::execute`](crate::VolumeLink::execute). The traversal
//! dispatches on the node kind, keeps a path of the volumes it is inside,
//! honors an optional depth limit and stops as soon as the action terminates.
//!
//! ## Traversal rules
//!
//! - Children are visited in insertion order.
//! - A volume pushes itself on the path before its handler runs and pops
//!   itself after its subtree. Its depth is the path length minus one.
//! - A volume deeper than the depth limit is skipped entirely. A volume at the
//!   limit is handled but its children are not visited.
//! - After any volume handler, a terminated action unwinds without visiting
//!   anything else.
//! - Serial transformers are handed to their handler as a whole; actions that
//!   care about the individual copies expand them themselves.

mod access;
mod accumulator;
mod clear;
mod count;
mod cursor;
mod print;

use std::sync::Arc;

use crate::node::VolumeLink;
use crate::serial::SerialTransformer;
use crate::surface::VirtualSurface;
use crate::transform::TransformNode;
use crate::types::{IdentifierTag, NameTag, SerialDenominator, SerialIdentifier};
use crate::volume::{FullPhysVol, PhysVol};

pub use access::{AccessSurfaceAction, AccessVolumeAction, ChildSurface, ChildVolume};
pub use clear::ClearPositionAction;
pub use count::{CountSurfaceAction, CountVolumeAction};
pub use cursor::{SurfaceCursor, VolumeCursor};
pub use print::{PrintFlags, PrintGraphAction};

/// Traversal bookkeeping carried by every action.
#[derive(Clone, Debug, Default)]
pub struct ActionState {
    path: Vec<VolumeLink>,
    depth_limit: Option<usize>,
    terminated: bool,
}

impl ActionState {
    /// Depth limit visiting only the volume the action is executed on.
    pub const SELF: usize = 0;
    /// Depth limit visiting a volume and its direct children.
    pub const SELF_AND_CHILDREN: usize = 1;

    /// Unlimited, running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// State with a depth limit.
    pub fn with_depth_limit(limit: usize) -> Self {
        Self {
            depth_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Volumes from the traversal root down to the current volume.
    pub fn path(&self) -> &[VolumeLink] {
        &self.path
    }

    /// Depth of the current volume: 0 for the traversal root.
    ///
    /// Outside of any volume the depth is reported as 0 too.
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Maximum depth at which volumes are handled, `None` for unlimited.
    pub fn depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }

    /// Change the depth limit.
    pub fn set_depth_limit(&mut self, limit: Option<usize>) {
        self.depth_limit = limit;
    }

    /// Stop the traversal after the current handler returns.
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Whether [`terminate`](Self::terminate) has been called.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Undo a termination so the action can be reused.
    pub(crate) fn resume(&mut self) {
        self.terminated = false;
    }

    pub(crate) fn push(&mut self, volume: VolumeLink) {
        self.path.push(volume);
    }

    pub(crate) fn pop(&mut self) {
        let popped = self.path.pop();
        debug_assert!(popped.is_some(), "traversal popped an empty path");
    }
}

/// A one-shot visitor over the graph.
///
/// Implementors expose their [`ActionState`] and override the handlers for the
/// node kinds they care about; every handler defaults to doing nothing.
pub trait NodeAction {
    /// Traversal state.
    fn state(&self) -> &ActionState;

    /// Mutable traversal state.
    fn state_mut(&mut self) -> &mut ActionState;

    /// A fixed or alignable transform.
    fn handle_transform(&mut self, _transform: &dyn TransformNode) {}

    /// A plain physical volume, already pushed on the path.
    fn handle_phys_vol(&mut self, _volume: &Arc<PhysVol>) {}

    /// A full physical volume, already pushed on the path.
    fn handle_full_phys_vol(&mut self, _volume: &Arc<FullPhysVol>) {}

    /// A name tag.
    fn handle_name_tag(&mut self, _tag: &NameTag) {}

    /// An identifier tag.
    fn handle_identifier_tag(&mut self, _tag: &IdentifierTag) {}

    /// A serial denominator.
    fn handle_serial_denominator(&mut self, _denominator: &SerialDenominator) {}

    /// A serial identifier.
    fn handle_serial_identifier(&mut self, _identifier: &SerialIdentifier) {}

    /// A serial transformer.
    fn handle_serial_transformer(&mut self, _transformer: &Arc<SerialTransformer>) {}

    /// A virtual surface.
    fn handle_surface(&mut self, _surface: &Arc<VirtualSurface>) {}

    /// Shorthand for `self.state_mut().terminate()`.
    fn terminate(&mut self) {
        self.state_mut().terminate();
    }
}
