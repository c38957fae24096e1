// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of graph nodes and volume handles.

use std::sync::{Arc, Weak};

use crate::action::NodeAction;
use crate::placement::{Placed, Placement};
use crate::serial::SerialTransformer;
use crate::surface::VirtualSurface;
use crate::transform::{AlignableTransform, Transform, TransformNode};
use crate::types::{IdentifierTag, NameTag, NodeId, SerialDenominator, SerialIdentifier};
use crate::volume::{FullPhysVol, PhysVol, VolumeCore};

/// A node of the geometry graph.
///
/// Nodes are reference counted and may be added to several parents. Cloning a
/// `GraphNode` clones the handle, not the node.
#[derive(Clone, Debug)]
pub enum GraphNode {
    /// Fixed transform.
    Transform(Arc<Transform>),
    /// Transform with an alignment delta.
    AlignableTransform(Arc<AlignableTransform>),
    /// Name of the next logical child.
    NameTag(Arc<NameTag>),
    /// Identifier of the next logical child.
    IdentifierTag(Arc<IdentifierTag>),
    /// Running names for the following logical children.
    SerialDenominator(Arc<SerialDenominator>),
    /// Running identifiers for the following logical children.
    SerialIdentifier(Arc<SerialIdentifier>),
    /// Procedural placement of one volume many times.
    SerialTransformer(Arc<SerialTransformer>),
    /// Container volume.
    PhysVol(Arc<PhysVol>),
    /// Container volume with a cached absolute position.
    FullPhysVol(Arc<FullPhysVol>),
    /// Positioned two-dimensional surface.
    Surface(Arc<VirtualSurface>),
}

impl GraphNode {
    /// Identity of the node.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Transform(n) => n.id(),
            Self::AlignableTransform(n) => n.id(),
            Self::NameTag(n) => n.id(),
            Self::IdentifierTag(n) => n.id(),
            Self::SerialDenominator(n) => n.id(),
            Self::SerialIdentifier(n) => n.id(),
            Self::SerialTransformer(n) => n.id(),
            Self::PhysVol(n) => n.id(),
            Self::FullPhysVol(n) => n.id(),
            Self::Surface(n) => n.id(),
        }
    }

    /// Short name of the node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transform(_) => "Transform",
            Self::AlignableTransform(_) => "AlignableTransform",
            Self::NameTag(_) => "NameTag",
            Self::IdentifierTag(_) => "IdentifierTag",
            Self::SerialDenominator(_) => "SerialDenominator",
            Self::SerialIdentifier(_) => "SerialIdentifier",
            Self::SerialTransformer(_) => "SerialTransformer",
            Self::PhysVol(_) => "PhysVol",
            Self::FullPhysVol(_) => "FullPhysVol",
            Self::Surface(_) => "VirtualSurface",
        }
    }

    /// Visit this node, and its subtree for volumes, with `action`.
    ///
    /// Volumes push themselves on the action's path, honor its depth limit and
    /// stop descending as soon as the action terminates. Every other node only
    /// calls the matching handler.
    pub fn execute<A: NodeAction + ?Sized>(&self, action: &mut A) {
        match self {
            Self::Transform(n) => action.handle_transform(&**n),
            Self::AlignableTransform(n) => action.handle_transform(&**n),
            Self::NameTag(n) => action.handle_name_tag(n),
            Self::IdentifierTag(n) => action.handle_identifier_tag(n),
            Self::SerialDenominator(n) => action.handle_serial_denominator(n),
            Self::SerialIdentifier(n) => action.handle_serial_identifier(n),
            Self::SerialTransformer(n) => action.handle_serial_transformer(n),
            Self::PhysVol(n) => VolumeLink::Phys(n.clone()).execute(action),
            Self::FullPhysVol(n) => VolumeLink::Full(n.clone()).execute(action),
            Self::Surface(n) => action.handle_surface(n),
        }
    }

    /// The transform view of transform nodes.
    pub fn as_transform(&self) -> Option<&dyn TransformNode> {
        match self {
            Self::Transform(n) => Some(&**n),
            Self::AlignableTransform(n) => Some(&**n),
            _ => None,
        }
    }

    /// The volume handle of volume nodes.
    pub fn as_volume(&self) -> Option<VolumeLink> {
        match self {
            Self::PhysVol(n) => Some(VolumeLink::Phys(n.clone())),
            Self::FullPhysVol(n) => Some(VolumeLink::Full(n.clone())),
            _ => None,
        }
    }

    /// Placement latch of nodes that are docked into their parent.
    pub(crate) fn placement(&self) -> Option<&Placement> {
        match self {
            Self::PhysVol(n) => Some(n.placement()),
            Self::FullPhysVol(n) => Some(n.placement()),
            Self::Surface(n) => Some(n.placement()),
            _ => None,
        }
    }

    /// Whether the node ends the backward transform scan of a later sibling.
    pub(crate) fn is_placement_boundary(&self) -> bool {
        matches!(
            self,
            Self::PhysVol(_) | Self::FullPhysVol(_) | Self::SerialTransformer(_)
        )
    }
}

macro_rules! node_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<Arc<$ty>> for GraphNode {
                fn from(value: Arc<$ty>) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

node_from! {
    Transform => Transform,
    AlignableTransform => AlignableTransform,
    NameTag => NameTag,
    IdentifierTag => IdentifierTag,
    SerialDenominator => SerialDenominator,
    SerialIdentifier => SerialIdentifier,
    SerialTransformer => SerialTransformer,
    PhysVol => PhysVol,
    FullPhysVol => FullPhysVol,
    Surface => VirtualSurface,
}

impl From<VolumeLink> for GraphNode {
    fn from(value: VolumeLink) -> Self {
        match value {
            VolumeLink::Phys(v) => Self::PhysVol(v),
            VolumeLink::Full(v) => Self::FullPhysVol(v),
        }
    }
}

/// Strong handle to either kind of physical volume.
#[derive(Clone, Debug)]
pub enum VolumeLink {
    /// Plain physical volume.
    Phys(Arc<PhysVol>),
    /// Full physical volume.
    Full(Arc<FullPhysVol>),
}

impl VolumeLink {
    pub(crate) fn core(&self) -> &VolumeCore {
        match self {
            Self::Phys(v) => v.core(),
            Self::Full(v) => v.core(),
        }
    }

    /// Identity of the volume.
    pub fn id(&self) -> NodeId {
        self.core().id()
    }

    /// The full physical volume, if this is one.
    pub fn as_full(&self) -> Option<&Arc<FullPhysVol>> {
        match self {
            Self::Full(v) => Some(v),
            Self::Phys(_) => None,
        }
    }

    /// Whether both handles point at the same volume.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    pub(crate) fn downgrade(&self) -> WeakVolume {
        match self {
            Self::Phys(v) => WeakVolume::Phys(Arc::downgrade(v)),
            Self::Full(v) => WeakVolume::Full(Arc::downgrade(v)),
        }
    }

    /// Visit the volume and its subtree with `action`.
    pub fn execute<A: NodeAction + ?Sized>(&self, action: &mut A) {
        let state = action.state_mut();
        state.push(self.clone());
        let depth = state.depth();
        let limit = state.depth_limit();
        if limit.is_some_and(|limit| depth > limit) {
            action.state_mut().pop();
            return;
        }
        match self {
            Self::Phys(v) => action.handle_phys_vol(v),
            Self::Full(v) => action.handle_full_phys_vol(v),
        }
        if action.state().is_terminated() {
            action.state_mut().pop();
            return;
        }
        if limit.is_none_or(|limit| depth < limit) {
            // Snapshot so handlers may add nodes without holding the child lock.
            for child in self.core().child_nodes() {
                child.execute(action);
                if action.state().is_terminated() {
                    break;
                }
            }
        }
        action.state_mut().pop();
    }
}

impl From<Arc<PhysVol>> for VolumeLink {
    fn from(value: Arc<PhysVol>) -> Self {
        Self::Phys(value)
    }
}

impl From<Arc<FullPhysVol>> for VolumeLink {
    fn from(value: Arc<FullPhysVol>) -> Self {
        Self::Full(value)
    }
}

/// Non-owning handle to a parent volume.
#[derive(Clone, Debug)]
pub(crate) enum WeakVolume {
    Phys(Weak<PhysVol>),
    Full(Weak<FullPhysVol>),
}

impl WeakVolume {
    pub(crate) fn upgrade(&self) -> Option<VolumeLink> {
        match self {
            Self::Phys(v) => v.upgrade().map(VolumeLink::Phys),
            Self::Full(v) => v.upgrade().map(VolumeLink::Full),
        }
    }
}
