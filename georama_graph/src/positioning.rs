// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily cached absolute positions.
//!
//! The absolute transform of a placed node is the product of the local
//! transforms of the node and every ancestor, root-most on the left. It is
//! computed on first request and cached, either in the node's private
//! [`PositionCache`] or, when a store is passed, in the [`AlignmentStore`].
//!
//! ## Concurrency
//!
//! The private cache is a pair of reader-writer locks. A warm lookup takes a
//! read lock; a miss computes without holding any lock and then stores the
//! result under a write lock. Two threads missing together both compute the
//! same value and the second store overwrites the first with an equal one.
//!
//! Caches are never invalidated implicitly. After changing an alignment delta,
//! clear the caches of the affected subtree with
//! [`ClearPositionAction`](crate::ClearPositionAction).

use parking_lot::RwLock;
use tracing::trace;

use crate::error::{GraphError, Result};
use crate::node::VolumeLink;
use crate::placement::Placed;
use crate::store::AlignmentStore;
use crate::trf::Transform3D;

/// Private absolute-transform cache of a positioned node.
#[derive(Debug, Default)]
pub struct PositionCache {
    aligned: RwLock<Option<Transform3D>>,
    default: RwLock<Option<Transform3D>>,
}

impl PositionCache {
    fn get(&self, aligned: bool) -> Option<Transform3D> {
        if aligned {
            *self.aligned.read()
        } else {
            *self.default.read()
        }
    }

    fn set(&self, aligned: bool, xf: Transform3D) {
        if aligned {
            *self.aligned.write() = Some(xf);
        } else {
            *self.default.write() = Some(xf);
        }
    }

    pub(crate) fn clear(&self) {
        *self.aligned.write() = None;
        *self.default.write() = None;
    }
}

/// Placed nodes that cache their absolute position: full physical volumes and
/// virtual surfaces.
pub trait Positioned: Placed {
    /// The private cache.
    fn position_cache(&self) -> &PositionCache;

    /// Transform from this node's frame to the root frame, alignment included.
    ///
    /// Fails with [`GraphError::SharedNode`] if this node or an ancestor is
    /// shared.
    fn absolute_transform(&self, store: Option<&AlignmentStore>) -> Result<Transform3D> {
        resolve(self, store, true)
    }

    /// Transform from this node's frame to the root frame, ignoring alignment.
    fn default_absolute_transform(&self, store: Option<&AlignmentStore>) -> Result<Transform3D> {
        resolve(self, store, false)
    }

    /// The aligned absolute transform if it has already been computed.
    fn cached_absolute_transform(&self, store: Option<&AlignmentStore>) -> Result<Transform3D> {
        lookup(self, store, true).ok_or(GraphError::NotComputed {
            node: self.node_id(),
        })
    }

    /// The default absolute transform if it has already been computed.
    fn cached_default_absolute_transform(
        &self,
        store: Option<&AlignmentStore>,
    ) -> Result<Transform3D> {
        lookup(self, store, false).ok_or(GraphError::NotComputed {
            node: self.node_id(),
        })
    }

    /// Drop the private cache. Entries in external stores are left alone.
    fn clear_cache(&self) {
        self.position_cache().clear();
    }
}

fn lookup<P: Positioned + ?Sized>(
    node: &P,
    store: Option<&AlignmentStore>,
    aligned: bool,
) -> Option<Transform3D> {
    match (store, aligned) {
        (Some(store), true) => store.abs_position(node.node_id()),
        (Some(store), false) => store.def_abs_position(node.node_id()),
        (None, _) => node.position_cache().get(aligned),
    }
}

fn resolve<P: Positioned + ?Sized>(
    node: &P,
    store: Option<&AlignmentStore>,
    aligned: bool,
) -> Result<Transform3D> {
    if let Some(xf) = lookup(node, store, aligned) {
        return Ok(xf);
    }
    let local = if aligned {
        node.local_transform(store)?
    } else {
        node.default_local_transform()?
    };
    let xf = accumulate(local, node.parent(), store, aligned)?;
    trace!(node = %node.node_id(), aligned, "absolute transform computed");
    match store {
        Some(store) if aligned => store.set_abs_position(node.node_id(), xf),
        Some(store) => store.set_def_abs_position(node.node_id(), xf),
        None => node.position_cache().set(aligned, xf),
    }
    Ok(xf)
}

/// Compose `local` with the local transforms of `parent` and its ancestors.
pub(crate) fn accumulate(
    local: Transform3D,
    mut parent: Option<VolumeLink>,
    store: Option<&AlignmentStore>,
    aligned: bool,
) -> Result<Transform3D> {
    let mut xf = local;
    while let Some(volume) = parent {
        let step = if aligned {
            volume.local_transform(store)?
        } else {
            volume.default_local_transform()?
        };
        xf = step * xf;
        parent = volume.parent();
    }
    Ok(xf)
}
