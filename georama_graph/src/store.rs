// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller-owned alignment and position storage.

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::trf::Transform3D;
use crate::types::NodeId;

/// External store of alignment deltas and absolute positions, keyed by node.
///
/// When a store is passed to a query, alignable transforms read their delta
/// from it and positioned nodes cache their absolute transforms in it instead
/// of in their private caches. Keeping one store per worker lets several
/// workers resolve positions of the same graph under different alignments
/// without contending on the nodes' private caches.
///
/// The store is internally synchronized, so queries only need `&AlignmentStore`.
#[derive(Debug, Default)]
pub struct AlignmentStore {
    deltas: RwLock<HashMap<NodeId, Transform3D>>,
    abs_positions: RwLock<HashMap<NodeId, Transform3D>>,
    def_abs_positions: RwLock<HashMap<NodeId, Transform3D>>,
}

impl AlignmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alignment delta of an alignable transform.
    pub fn set_delta(&self, node: NodeId, delta: Transform3D) {
        self.deltas.write().insert(node, delta);
    }

    /// Alignment delta of an alignable transform, if any.
    pub fn delta(&self, node: NodeId) -> Option<Transform3D> {
        self.deltas.read().get(&node).copied()
    }

    /// Store the aligned absolute transform of a positioned node.
    pub fn set_abs_position(&self, node: NodeId, xf: Transform3D) {
        self.abs_positions.write().insert(node, xf);
    }

    /// Aligned absolute transform of a positioned node, if stored.
    pub fn abs_position(&self, node: NodeId) -> Option<Transform3D> {
        self.abs_positions.read().get(&node).copied()
    }

    /// Store the default absolute transform of a positioned node.
    pub fn set_def_abs_position(&self, node: NodeId, xf: Transform3D) {
        self.def_abs_positions.write().insert(node, xf);
    }

    /// Default absolute transform of a positioned node, if stored.
    pub fn def_abs_position(&self, node: NodeId) -> Option<Transform3D> {
        self.def_abs_positions.read().get(&node).copied()
    }

    /// Forget every stored absolute position, keeping the deltas.
    pub fn clear_positions(&self) {
        self.abs_positions.write().clear();
        self.def_abs_positions.write().clear();
    }

    /// Forget the stored positions of one node.
    pub fn clear_position(&self, node: NodeId) {
        self.abs_positions.write().remove(&node);
        self.def_abs_positions.write().remove(&node);
    }

    /// Number of stored deltas.
    pub fn delta_count(&self) -> usize {
        self.deltas.read().len()
    }

    /// Number of stored aligned absolute positions.
    pub fn position_count(&self) -> usize {
        self.abs_positions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trf;

    #[test]
    fn positions_clear_independently_of_deltas() {
        let store = AlignmentStore::new();
        let a = NodeId::next();
        store.set_delta(a, trf::translate(1.0, 0.0, 0.0));
        store.set_abs_position(a, trf::identity());
        store.set_def_abs_position(a, trf::identity());
        assert_eq!(store.position_count(), 1);

        store.clear_positions();
        assert_eq!(store.abs_position(a), None);
        assert_eq!(store.def_abs_position(a), None);
        assert_eq!(store.delta_count(), 1, "deltas survive position clearing");
    }
}
