// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use crate::action::{ActionState, NodeAction};
use crate::positioning::Positioned;
use crate::store::AlignmentStore;
use crate::surface::VirtualSurface;
use crate::volume::FullPhysVol;

/// Drops cached absolute transforms below the volume it is executed on.
///
/// Caches are never invalidated automatically; run this over the affected
/// subtree after changing a transform or an alignment delta. With a store,
/// the positions the store holds for the visited nodes are dropped as well.
#[derive(Debug, Default)]
pub struct ClearPositionAction<'s> {
    state: ActionState,
    store: Option<&'s AlignmentStore>,
    cleared: usize,
}

impl<'s> ClearPositionAction<'s> {
    /// Clear the private caches only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also clear the positions recorded in `store`.
    pub fn with_store(store: &'s AlignmentStore) -> Self {
        Self {
            store: Some(store),
            ..Self::default()
        }
    }

    /// Number of nodes whose cache was cleared.
    pub fn cleared(&self) -> usize {
        self.cleared
    }

    fn clear(&mut self, node: &dyn Positioned) {
        node.clear_cache();
        if let Some(store) = self.store {
            store.clear_position(node.node_id());
        }
        self.cleared += 1;
    }
}

impl NodeAction for ClearPositionAction<'_> {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn handle_full_phys_vol(&mut self, volume: &Arc<FullPhysVol>) {
        self.clear(&**volume);
    }

    fn handle_surface(&mut self, surface: &Arc<VirtualSurface>) {
        self.clear(&**surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{box_log, rect_surface};
    use crate::transform::AlignableTransform;
    use crate::trf;
    use crate::volume::{PhysVol, Volume};

    #[test]
    fn stale_until_cleared() {
        let world = PhysVol::new(box_log("World"));
        let shift = AlignableTransform::new(trf::translate(1.0, 0.0, 0.0));
        let det = FullPhysVol::new(box_log("Det"));
        let surface = rect_surface();
        world.add(shift.clone());
        world.add(det.clone());
        det.add(surface.clone());

        let before = det.absolute_transform(None).unwrap();
        let _ = surface.absolute_transform(None).unwrap();
        shift.set_delta(trf::translate(0.0, 2.0, 0.0), None);
        assert!(
            trf::approx_eq(&det.absolute_transform(None).unwrap(), &before, 0.0),
            "cached value survives the delta"
        );

        let mut clear = ClearPositionAction::new();
        world.to_link().execute(&mut clear);
        assert_eq!(clear.cleared(), 2);
        let after = det.absolute_transform(None).unwrap();
        assert!(trf::approx_eq(&after, &trf::translate(1.0, 2.0, 0.0), 1e-12));
        assert!(trf::approx_eq(
            &surface.absolute_transform(None).unwrap(),
            &after,
            1e-12
        ));
    }

    #[test]
    fn store_positions_are_dropped() {
        let store = AlignmentStore::new();
        let world = PhysVol::new(box_log("World"));
        let det = FullPhysVol::new(box_log("Det"));
        world.add(det.clone());
        let _ = det.absolute_transform(Some(&store)).unwrap();
        assert_eq!(store.position_count(), 1);

        let mut clear = ClearPositionAction::with_store(&store);
        world.to_link().execute(&mut clear);
        assert_eq!(store.position_count(), 0);
    }
}
