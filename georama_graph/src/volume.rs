// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Physical volumes and the logical child API.
//!
//! A physical volume owns an ordered sequence of child nodes. The order is
//! significant: transforms and tags apply to the next volume, surface or serial
//! transformer after them.
//!
//! ## Logical children
//!
//! Consumers rarely want the raw sequence. The [`Volume`] trait presents the
//! *logical* children instead: every child volume counts once, every serial
//! transformer counts as many times as it has copies, and each logical child
//! comes with the transform, name and identifier its preceding nodes give it.
//!
//! ```
//! use georama_graph::{
//!     FullPhysVol, LogVol, Material, NameTag, PhysVol, SerialDenominator, SerialTransformer,
//!     Solid, Transform, Volume, trf,
//! };
//!
//! let air = Material::new("Air", 0.0012);
//! let world = PhysVol::new(LogVol::new(
//!     "World",
//!     Solid::Box { x_half: 10.0, y_half: 10.0, z_half: 10.0 },
//!     air.clone(),
//! ));
//! let cell = FullPhysVol::new(LogVol::new(
//!     "Cell",
//!     Solid::Box { x_half: 0.5, y_half: 0.5, z_half: 0.5 },
//!     air,
//! ));
//!
//! world.add(NameTag::new("Core"));
//! world.add(Transform::new(trf::translate(0.0, 0.0, 5.0)));
//! world.add(cell.clone());
//! world.add(SerialDenominator::new("Cell"));
//! world.add(SerialTransformer::new(cell, |i: usize| trf::translate(i as f64, 0.0, 0.0), 3));
//!
//! assert_eq!(world.child_count(), 4);
//! assert_eq!(world.name_of_child(0).unwrap(), "Core");
//! assert_eq!(world.name_of_child(3).unwrap(), "Cell2");
//! ```

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use tracing::debug;

use crate::action::{
    AccessSurfaceAction, AccessVolumeAction, ChildSurface, ChildVolume, CountSurfaceAction,
    CountVolumeAction, VolumeCursor,
};
use crate::error::{GraphError, Result};
use crate::node::{GraphNode, VolumeLink};
use crate::placement::{Placed, Placement};
use crate::positioning::{self, PositionCache, Positioned};
use crate::store::AlignmentStore;
use crate::traverse::{self, VolumeAction};
use crate::trf::Transform3D;
use crate::types::{LogVol, NodeId};

/// Name reported for logical children without a name tag or denominator.
pub const ANONYMOUS: &str = "ANON";

/// State shared by both volume kinds.
#[derive(Debug)]
pub(crate) struct VolumeCore {
    id: NodeId,
    log_vol: Arc<LogVol>,
    children: RwLock<Vec<GraphNode>>,
    placement: Placement,
}

impl VolumeCore {
    fn new(log_vol: Arc<LogVol>) -> Self {
        Self {
            id: NodeId::next(),
            log_vol,
            children: RwLock::new(Vec::new()),
            placement: Placement::default(),
        }
    }

    pub(crate) fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Cheap copy of the child handles.
    pub(crate) fn child_nodes(&self) -> Vec<GraphNode> {
        self.children.read().clone()
    }

    pub(crate) fn children_guard(&self) -> RwLockReadGuard<'_, Vec<GraphNode>> {
        self.children.read()
    }

    fn push(&self, child: GraphNode, this: &VolumeLink) {
        if let Some(placement) = child.placement() {
            placement.dock(child.id(), this);
        }
        self.children.write().push(child);
    }
}

/// Container volume without a position cache.
///
/// Plain volumes are the ones meant to be shared: a subtree built once and
/// added under many parents. A shared volume can still be traversed, but it
/// has no single position.
#[derive(Debug)]
pub struct PhysVol {
    core: VolumeCore,
}

impl PhysVol {
    /// Create a volume of the given logical volume.
    pub fn new(log_vol: Arc<LogVol>) -> Arc<Self> {
        Arc::new(Self {
            core: VolumeCore::new(log_vol),
        })
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.core.id
    }

    /// Shape and material.
    pub fn log_vol(&self) -> &Arc<LogVol> {
        &self.core.log_vol
    }

    pub(crate) fn core(&self) -> &VolumeCore {
        &self.core
    }
}

impl Placed for PhysVol {
    fn node_id(&self) -> NodeId {
        self.core.id
    }

    fn placement(&self) -> &Placement {
        &self.core.placement
    }
}

/// Container volume with identity: it caches its absolute position and
/// answers to its absolute name.
///
/// A full physical volume is expected to be placed exactly once. Asking a
/// shared one for its position fails with [`GraphError::SharedNode`].
#[derive(Debug)]
pub struct FullPhysVol {
    core: VolumeCore,
    cache: PositionCache,
    absolute_name: RwLock<Option<String>>,
    clone_origin: Mutex<Option<Weak<Self>>>,
}

impl FullPhysVol {
    /// Create a full volume of the given logical volume.
    pub fn new(log_vol: Arc<LogVol>) -> Arc<Self> {
        Arc::new(Self {
            core: VolumeCore::new(log_vol),
            cache: PositionCache::default(),
            absolute_name: RwLock::new(None),
            clone_origin: Mutex::new(None),
        })
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.core.id
    }

    /// Shape and material.
    pub fn log_vol(&self) -> &Arc<LogVol> {
        &self.core.log_vol
    }

    pub(crate) fn core(&self) -> &VolumeCore {
        &self.core
    }

    /// Names of the logical children leading from the root down to this
    /// volume, each prefixed with `/`. A root has an empty name.
    ///
    /// The result is cached until [`Positioned::clear_cache`].
    pub fn absolute_name(&self) -> Result<String> {
        if let Some(name) = self.absolute_name.read().clone() {
            return Ok(name);
        }
        if self.is_shared() {
            debug!(node = %self.id(), "absolute name requested on a shared volume");
            return Err(GraphError::SharedNode { node: self.id() });
        }
        let mut segments = Vec::new();
        let mut child = self.id();
        let mut parent = self.parent();
        while let Some(volume) = parent {
            let Some(index) = volume.index_of(child) else {
                break;
            };
            segments.push(volume.name_of_child(index)?);
            if volume.is_shared() {
                debug!(node = %self.id(), ancestor = %volume.id(), "absolute name through a shared volume");
                return Err(GraphError::SharedNode { node: volume.id() });
            }
            child = volume.id();
            parent = volume.parent();
        }
        let name: String = segments.iter().rev().map(|s| format!("/{s}")).collect();
        *self.absolute_name.write() = Some(name.clone());
        Ok(name)
    }

    /// Identifier given to this volume by its parent, if any.
    pub fn identifier(&self) -> Result<Option<i64>> {
        if self.is_shared() {
            return Err(GraphError::SharedNode { node: self.id() });
        }
        let Some(parent) = self.parent() else {
            return Ok(None);
        };
        match parent.index_of(self.id()) {
            Some(index) => parent.id_of_child(index),
            None => Ok(None),
        }
    }

    /// A new full volume with the same logical volume and the same children.
    ///
    /// The children are added to the clone, not copied, so every docked child
    /// becomes shared. With `attached`, the clone remembers where it came from:
    /// the original becomes the origin of its clones unless it is a clone
    /// itself, in which case its own origin is passed on.
    pub fn clone_volume(self: &Arc<Self>, attached: bool) -> Arc<Self> {
        let clone = Self::new(self.core.log_vol.clone());
        for child in self.core.child_nodes() {
            clone.add(child);
        }
        if attached {
            let mut origin = self.clone_origin.lock();
            if origin.is_none() {
                *origin = Some(Arc::downgrade(self));
            }
            *clone.clone_origin.lock() = (*origin).clone();
        }
        debug!(original = %self.id(), clone = %clone.id(), attached, "full volume cloned");
        clone
    }

    /// The volume this one was cloned from with `attached` set.
    pub fn clone_origin(&self) -> Option<Arc<Self>> {
        self.clone_origin.lock().as_ref().and_then(Weak::upgrade)
    }

    /// Drop every child.
    pub fn clear(&self) {
        self.core.children.write().clear();
    }
}

impl Placed for FullPhysVol {
    fn node_id(&self) -> NodeId {
        self.core.id
    }

    fn placement(&self) -> &Placement {
        &self.core.placement
    }
}

impl Positioned for FullPhysVol {
    fn position_cache(&self) -> &PositionCache {
        &self.cache
    }

    fn clear_cache(&self) {
        self.cache.clear();
        *self.absolute_name.write() = None;
    }
}

impl VolumeLink {
    /// Shape and material.
    pub fn log_vol(&self) -> &Arc<LogVol> {
        &self.core().log_vol
    }

    /// Absolute transform of the volume.
    ///
    /// Full volumes use their cache; plain volumes recompute every time.
    pub fn absolute_transform(&self, store: Option<&AlignmentStore>) -> Result<Transform3D> {
        match self {
            Self::Full(v) => v.absolute_transform(store),
            Self::Phys(v) => {
                positioning::accumulate(v.local_transform(store)?, v.parent(), store, true)
            }
        }
    }

    /// Absolute transform of the volume, ignoring alignment.
    pub fn default_absolute_transform(
        &self,
        store: Option<&AlignmentStore>,
    ) -> Result<Transform3D> {
        match self {
            Self::Full(v) => v.default_absolute_transform(store),
            Self::Phys(v) => {
                positioning::accumulate(v.default_local_transform()?, v.parent(), store, false)
            }
        }
    }
}

/// The child API shared by every volume handle.
///
/// Implemented for `Arc<PhysVol>`, `Arc<FullPhysVol>` and [`VolumeLink`].
pub trait Volume {
    /// Handle to the volume.
    fn to_link(&self) -> VolumeLink;

    /// Append a child node and dock it if it is a volume or a surface.
    fn add(&self, child: impl Into<GraphNode>)
    where
        Self: Sized,
    {
        let this = self.to_link();
        this.core().push(child.into(), &this);
    }

    /// Number of raw child nodes, of every kind.
    fn node_count(&self) -> usize {
        self.to_link().core().children.read().len()
    }

    /// Raw child nodes in insertion order.
    fn child_nodes(&self) -> Vec<GraphNode> {
        self.to_link().core().child_nodes()
    }

    /// Number of logical child volumes.
    fn child_count(&self) -> usize {
        let mut count = CountVolumeAction::new();
        self.to_link().execute(&mut count);
        count.count()
    }

    /// Logical child volume `index` with its transform, name and identifier.
    fn child_at(&self, index: usize, store: Option<&AlignmentStore>) -> Result<ChildVolume> {
        let mut access = AccessVolumeAction::new(index, store);
        self.to_link().execute(&mut access);
        access.finish()?.ok_or_else(|| GraphError::IndexOutOfRange {
            index,
            count: self.child_count(),
        })
    }

    /// Logical child volume `index`.
    fn child_volume(&self, index: usize) -> Result<VolumeLink> {
        self.child_at(index, None).map(|child| child.volume)
    }

    /// Name of logical child `index`, `"ANON"` if it has none.
    fn name_of_child(&self, index: usize) -> Result<String> {
        self.child_at(index, None)
            .map(|child| child.name.unwrap_or_else(|| ANONYMOUS.to_owned()))
    }

    /// Identifier of logical child `index`.
    fn id_of_child(&self, index: usize) -> Result<Option<i64>> {
        self.child_at(index, None).map(|child| child.id)
    }

    /// Transform from logical child `index` to this volume.
    fn transform_to_child(&self, index: usize, store: Option<&AlignmentStore>) -> Result<Transform3D> {
        self.child_at(index, store).map(|child| child.transform)
    }

    /// Transform from logical child `index` to this volume, ignoring alignment.
    fn default_transform_to_child(&self, index: usize) -> Result<Transform3D> {
        self.child_at(index, None)
            .map(|child| child.default_transform)
    }

    /// Transform from logical child `index` to the root.
    fn absolute_transform_to_child(
        &self,
        index: usize,
        store: Option<&AlignmentStore>,
    ) -> Result<Transform3D> {
        let relative = self.transform_to_child(index, store)?;
        Ok(self.to_link().absolute_transform(store)? * relative)
    }

    /// Logical index of the first occurrence of the child volume `child`.
    fn index_of(&self, child: NodeId) -> Option<usize> {
        let mut cursor = VolumeCursor::new(&self.to_link(), None);
        while let Some(volume) = cursor.volume() {
            if volume.id() == child {
                return Some(cursor.index());
            }
            cursor.advance();
        }
        None
    }

    /// Run `action` over this volume and every logical volume below it.
    fn traverse<A: VolumeAction + ?Sized>(&self, action: &mut A, store: Option<&AlignmentStore>) {
        traverse::traverse(self.to_link(), action, store);
    }

    /// Number of child surfaces.
    fn surface_count(&self) -> usize {
        let mut count = CountSurfaceAction::new();
        self.to_link().execute(&mut count);
        count.count()
    }

    /// Child surface `index` with its transform.
    fn surface_at(&self, index: usize, store: Option<&AlignmentStore>) -> Result<ChildSurface> {
        let mut access = AccessSurfaceAction::new(index, store);
        self.to_link().execute(&mut access);
        access.into_child().ok_or_else(|| GraphError::IndexOutOfRange {
            index,
            count: self.surface_count(),
        })
    }
}

impl Volume for Arc<PhysVol> {
    fn to_link(&self) -> VolumeLink {
        VolumeLink::Phys(self.clone())
    }
}

impl Volume for Arc<FullPhysVol> {
    fn to_link(&self) -> VolumeLink {
        VolumeLink::Full(self.clone())
    }
}

impl Volume for VolumeLink {
    fn to_link(&self) -> VolumeLink {
        self.clone()
    }
}
