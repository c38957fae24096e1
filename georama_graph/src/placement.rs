// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent tracking and local transforms.
//!
//! A volume or surface remembers the first parent it is added to. Adding it to
//! a second parent (or to the same parent twice) flips it to *shared* for the
//! rest of its life: it keeps working as a subtree, but it no longer has one
//! position, so every query that needs "the" parent fails with
//! [`GraphError::SharedNode`].
//!
//! ## Local transform
//!
//! A node's transform relative to its parent is recovered from the parent's
//! child sequence: starting just before the node and walking backward, every
//! transform node met is composed on the left until a volume, a serial
//! transformer or a surface is reached. That matches the authoring idiom of
//! pushing one or more transforms and then the volume they place.

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::{GraphError, Result};
use crate::node::{VolumeLink, WeakVolume};
use crate::store::AlignmentStore;
use crate::transform::TransformNode;
use crate::trf::{self, Transform3D};
use crate::types::NodeId;

#[derive(Debug)]
enum Docking {
    Free,
    Unique(WeakVolume),
    Shared,
}

pub(crate) enum Parent {
    Root,
    Unique(VolumeLink),
    Shared,
}

/// One-way latch recording the unique parent of a node, or that it is shared.
#[derive(Debug)]
pub struct Placement {
    docking: Mutex<Docking>,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            docking: Mutex::new(Docking::Free),
        }
    }
}

impl Placement {
    pub(crate) fn dock(&self, node: NodeId, parent: &VolumeLink) {
        let mut docking = self.docking.lock();
        *docking = match *docking {
            Docking::Free => Docking::Unique(parent.downgrade()),
            Docking::Unique(_) | Docking::Shared => {
                trace!(node = %node, parent = %parent.id(), "docked again; node is now shared");
                Docking::Shared
            }
        };
    }

    /// Whether the node has been docked more than once.
    pub fn is_shared(&self) -> bool {
        matches!(*self.docking.lock(), Docking::Shared)
    }

    pub(crate) fn resolve(&self) -> Parent {
        match &*self.docking.lock() {
            Docking::Free => Parent::Root,
            // A parent that has been dropped leaves the node as a root.
            Docking::Unique(weak) => weak.upgrade().map_or(Parent::Root, Parent::Unique),
            Docking::Shared => Parent::Shared,
        }
    }
}

/// Nodes that are docked into a parent volume: volumes and surfaces.
pub trait Placed {
    /// Identity of the node.
    fn node_id(&self) -> NodeId;

    /// The docking latch.
    fn placement(&self) -> &Placement;

    /// Whether the node has more than one parent.
    fn is_shared(&self) -> bool {
        self.placement().is_shared()
    }

    /// The unique parent, or `None` for a root or a shared node.
    fn parent(&self) -> Option<VolumeLink> {
        match self.placement().resolve() {
            Parent::Unique(parent) => Some(parent),
            Parent::Root | Parent::Shared => None,
        }
    }

    /// Transform from this node's frame to its parent's frame.
    ///
    /// Composes the transforms in front of the node back to the previous
    /// volume or serial transformer; surfaces in between do not interrupt
    /// the run. A root is at identity. Fails on a shared node.
    fn local_transform(&self, store: Option<&AlignmentStore>) -> Result<Transform3D> {
        scan_local(self.node_id(), self.placement(), |xf| xf.transform(store))
    }

    /// Like [`local_transform`](Self::local_transform), ignoring alignment.
    fn default_local_transform(&self) -> Result<Transform3D> {
        scan_local(self.node_id(), self.placement(), |xf| xf.default_transform())
    }
}

fn scan_local(
    node: NodeId,
    placement: &Placement,
    eval: impl Fn(&dyn TransformNode) -> Transform3D,
) -> Result<Transform3D> {
    let parent = match placement.resolve() {
        Parent::Root => return Ok(trf::identity()),
        Parent::Shared => {
            debug!(node = %node, "local transform requested on a shared node");
            return Err(GraphError::SharedNode { node });
        }
        Parent::Unique(parent) => parent,
    };
    let children = parent.core().children_guard();
    let Some(position) = children.iter().position(|c| c.id() == node) else {
        // Removed from its parent by `clear`.
        return Ok(trf::identity());
    };
    let mut xf = trf::identity();
    for sibling in children[..position].iter().rev() {
        if let Some(t) = sibling.as_transform() {
            xf = eval(t) * xf;
        } else if sibling.is_placement_boundary() {
            break;
        }
    }
    Ok(xf)
}

impl Placed for VolumeLink {
    fn node_id(&self) -> NodeId {
        self.id()
    }

    fn placement(&self) -> &Placement {
        self.core().placement()
    }
}
