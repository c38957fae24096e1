// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform nodes.
//!
//! A transform node places the next volume or surface in its parent's child
//! sequence. Several transform nodes in a row compose left to right.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::store::AlignmentStore;
use crate::trf::{self, Transform3D};
use crate::types::NodeId;

/// Common view of [`Transform`] and [`AlignableTransform`].
pub trait TransformNode: core::fmt::Debug + Send + Sync {
    /// Node identity.
    fn node_id(&self) -> NodeId;

    /// Effective transform, including any alignment delta.
    ///
    /// With a store, the delta is read from the store instead of the node.
    fn transform(&self, store: Option<&AlignmentStore>) -> Transform3D;

    /// Nominal transform without alignment.
    fn default_transform(&self) -> Transform3D;

    /// Whether the transform carries an alignment delta slot.
    fn is_alignable(&self) -> bool {
        false
    }
}

/// Fixed transform.
#[derive(Debug)]
pub struct Transform {
    id: NodeId,
    xf: Transform3D,
}

impl Transform {
    /// Create a fixed transform node.
    pub fn new(xf: Transform3D) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::next(),
            xf,
        })
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl TransformNode for Transform {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn transform(&self, _store: Option<&AlignmentStore>) -> Transform3D {
        self.xf
    }

    fn default_transform(&self) -> Transform3D {
        self.xf
    }
}

/// Transform with a runtime alignment correction applied on top of a fixed
/// base: `transform = base * delta`.
///
/// Changing the delta does not invalidate cached absolute positions below the
/// transform. Callers clear those caches themselves, typically by running a
/// [`ClearPositionAction`](crate::ClearPositionAction) over the affected
/// subtree.
#[derive(Debug)]
pub struct AlignableTransform {
    id: NodeId,
    base: Transform3D,
    delta: RwLock<Option<Transform3D>>,
}

const DELTA_EPSILON: f64 = 1e-12;

impl AlignableTransform {
    /// Create an alignable transform with no delta.
    pub fn new(base: Transform3D) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::next(),
            base,
            delta: RwLock::new(None),
        })
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current alignment delta, from the store if one is given.
    pub fn delta(&self, store: Option<&AlignmentStore>) -> Option<Transform3D> {
        match store {
            Some(store) => store.delta(self.id),
            None => *self.delta.read(),
        }
    }

    /// Set the alignment delta.
    ///
    /// With a store the delta is recorded there and the node is untouched.
    /// Setting a delta equal to the current one is a no-op.
    pub fn set_delta(&self, delta: Transform3D, store: Option<&AlignmentStore>) {
        if let Some(store) = store {
            store.set_delta(self.id, delta);
            debug!(node = %self.id, "alignment delta stored; clear downstream positions");
            return;
        }
        let mut slot = self.delta.write();
        if slot.is_some_and(|current| trf::approx_eq(&current, &delta, DELTA_EPSILON)) {
            return;
        }
        *slot = Some(delta);
        debug!(node = %self.id, "alignment delta changed; clear downstream positions");
    }

    /// Drop the private delta. A no-op when a store is given.
    pub fn clear_delta(&self, store: Option<&AlignmentStore>) {
        if store.is_some() {
            return;
        }
        if self.delta.write().take().is_some() {
            debug!(node = %self.id, "alignment delta cleared; clear downstream positions");
        }
    }
}

impl TransformNode for AlignableTransform {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn transform(&self, store: Option<&AlignmentStore>) -> Transform3D {
        match self.delta(store) {
            Some(delta) => self.base * delta,
            None => self.base,
        }
    }

    fn default_transform(&self) -> Transform3D {
        self.base
    }

    fn is_alignable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_applies_on_top_of_base() {
        let at = AlignableTransform::new(trf::translate(0.0, 0.0, 10.0));
        assert!(trf::approx_eq(&at.transform(None), &at.default_transform(), 0.0));

        at.set_delta(trf::rotate_z(0.5), None);
        let expected = trf::translate(0.0, 0.0, 10.0) * trf::rotate_z(0.5);
        assert!(trf::approx_eq(&at.transform(None), &expected, 1e-12));
        assert!(trf::approx_eq(
            &at.default_transform(),
            &trf::translate(0.0, 0.0, 10.0),
            0.0
        ));

        at.clear_delta(None);
        assert_eq!(at.delta(None), None);
    }

    #[test]
    fn store_delta_does_not_touch_the_node() {
        let at = AlignableTransform::new(trf::identity());
        let store = AlignmentStore::new();
        at.set_delta(trf::translate(1.0, 2.0, 3.0), Some(&store));
        assert_eq!(at.delta(None), None, "private delta untouched");
        assert!(trf::approx_eq(
            &at.transform(Some(&store)),
            &trf::translate(1.0, 2.0, 3.0),
            1e-12
        ));
        at.clear_delta(Some(&store));
        assert!(store.delta(at.id()).is_some(), "clearing with a store is a no-op");
    }
}
