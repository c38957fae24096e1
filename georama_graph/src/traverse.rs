// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Volume-level traversal.
//!
//! A [`VolumeAction`] sees only volumes, one per logical child, with serial
//! transformer copies expanded. Along the way a [`TraversalState`] accumulates
//! absolute transforms and names from the traversal root, so no position cache
//! is read or written.
//!
//! ```
//! use georama_graph::{
//!     LogVol, Material, NameTag, PhysVol, Solid, Transform, TraversalState, Volume,
//!     VolumeAction, VolumeLink, trf,
//! };
//!
//! struct Names(Vec<String>);
//!
//! impl VolumeAction for Names {
//!     fn handle_volume(&mut self, _volume: &VolumeLink, state: &mut TraversalState) {
//!         self.0.push(state.absolute_name().to_owned());
//!     }
//! }
//!
//! let log = LogVol::new("Box", Solid::Box { x_half: 1.0, y_half: 1.0, z_half: 1.0 }, Material::new("Air", 0.0012));
//! let world = PhysVol::new(log.clone());
//! let layer = PhysVol::new(log.clone());
//! layer.add(NameTag::new("Pad"));
//! layer.add(PhysVol::new(log));
//! world.add(NameTag::new("Layer"));
//! world.add(Transform::new(trf::translate(0.0, 0.0, 1.0)));
//! world.add(layer);
//!
//! let mut names = Names(Vec::new());
//! world.traverse(&mut names, None);
//! assert_eq!(names.0, ["", "/Layer", "/Layer/Pad"]);
//! ```

use crate::action::VolumeCursor;
use crate::node::VolumeLink;
use crate::store::AlignmentStore;
use crate::trf::{self, Transform3D};

/// When a volume is handed to [`VolumeAction::handle_volume`] relative to its
/// children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TraversalOrder {
    /// A volume before its children.
    #[default]
    TopDown,
    /// A volume after its children.
    BottomUp,
}

/// A visitor over the logical volumes of a subtree.
pub trait VolumeAction {
    /// Traversal order; top-down unless overridden.
    fn order(&self) -> TraversalOrder {
        TraversalOrder::TopDown
    }

    /// Handle one logical volume. `state` describes where it sits.
    fn handle_volume(&mut self, volume: &VolumeLink, state: &mut TraversalState);
}

#[derive(Clone, Debug)]
struct Level {
    transform: Transform3D,
    default_transform: Transform3D,
    absolute: Transform3D,
    default_absolute: Transform3D,
    name: String,
    absolute_name: String,
    id: Option<i64>,
}

impl Level {
    fn root() -> Self {
        Self {
            transform: trf::identity(),
            default_transform: trf::identity(),
            absolute: trf::identity(),
            default_absolute: trf::identity(),
            name: String::new(),
            absolute_name: String::new(),
            id: None,
        }
    }
}

/// Where the volume being handled sits relative to the traversal root.
///
/// The traversal root itself is at identity with an empty name.
#[derive(Debug)]
pub struct TraversalState {
    path: Vec<VolumeLink>,
    levels: Vec<Level>,
    terminated: bool,
}

impl TraversalState {
    fn new(root: VolumeLink) -> Self {
        Self {
            path: vec![root],
            levels: vec![Level::root()],
            terminated: false,
        }
    }

    fn level(&self) -> &Level {
        // The root level is never popped.
        &self.levels[self.levels.len() - 1]
    }

    /// Volumes from the traversal root down to the current volume.
    pub fn path(&self) -> &[VolumeLink] {
        &self.path
    }

    /// Depth of the current volume; the traversal root is at depth 0.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// Transform from the current volume to its parent.
    pub fn transform(&self) -> Transform3D {
        self.level().transform
    }

    /// Like [`transform`](Self::transform), ignoring alignment.
    pub fn default_transform(&self) -> Transform3D {
        self.level().default_transform
    }

    /// Transform from the current volume to the traversal root.
    pub fn absolute_transform(&self) -> Transform3D {
        self.level().absolute
    }

    /// Like [`absolute_transform`](Self::absolute_transform), ignoring
    /// alignment.
    pub fn default_absolute_transform(&self) -> Transform3D {
        self.level().default_absolute
    }

    /// Name of the current volume in its parent.
    pub fn name(&self) -> &str {
        &self.level().name
    }

    /// `/`-joined names from the traversal root down to the current volume.
    pub fn absolute_name(&self) -> &str {
        &self.level().absolute_name
    }

    /// Identifier of the current volume in its parent.
    pub fn id(&self) -> Option<i64> {
        self.level().id
    }

    /// Stop the traversal once the current handler returns.
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Whether [`terminate`](Self::terminate) has been called.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn descend(&mut self, cursor: &VolumeCursor<'_>, volume: VolumeLink) {
        let parent = self.level();
        let name = cursor.name();
        let level = Level {
            transform: cursor.transform(),
            default_transform: cursor.default_transform(),
            absolute: parent.absolute * cursor.transform(),
            default_absolute: parent.default_absolute * cursor.default_transform(),
            absolute_name: format!("{}/{name}", parent.absolute_name),
            name,
            id: cursor.id(),
        };
        self.levels.push(level);
        self.path.push(volume);
    }

    fn ascend(&mut self) {
        self.levels.pop();
        self.path.pop();
    }

    fn walk<A: VolumeAction + ?Sized>(&mut self, action: &mut A, store: Option<&AlignmentStore>) {
        let Some(volume) = self.path.last().cloned() else {
            return;
        };
        let order = action.order();
        if order == TraversalOrder::TopDown {
            action.handle_volume(&volume, self);
            if self.terminated {
                return;
            }
        }
        let mut cursor = VolumeCursor::new(&volume, store);
        while let Some(child) = cursor.volume().cloned() {
            self.descend(&cursor, child);
            self.walk(action, store);
            self.ascend();
            if self.terminated {
                return;
            }
            cursor.advance();
        }
        if order == TraversalOrder::BottomUp {
            action.handle_volume(&volume, self);
        }
    }
}

/// Run `action` over `root` and every logical volume below it.
pub(crate) fn traverse<A: VolumeAction + ?Sized>(
    root: VolumeLink,
    action: &mut A,
    store: Option<&AlignmentStore>,
) {
    let mut state = TraversalState::new(root);
    state.walk(action, store);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::positioning::Positioned;
    use crate::serial::SerialTransformer;
    use crate::testing::box_log;
    use crate::transform::{AlignableTransform, Transform};
    use crate::types::{IdentifierTag, NameTag, SerialDenominator};
    use crate::volume::{FullPhysVol, PhysVol, Volume};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Log {
        order: TraversalOrder,
        seen: Vec<(usize, String, Option<i64>)>,
        stop_at: Option<&'static str>,
    }

    impl VolumeAction for Log {
        fn order(&self) -> TraversalOrder {
            self.order
        }

        fn handle_volume(&mut self, _volume: &VolumeLink, state: &mut TraversalState) {
            self.seen
                .push((state.depth(), state.absolute_name().to_owned(), state.id()));
            if self.stop_at == Some(state.name()) {
                state.terminate();
            }
        }
    }

    fn detector() -> (Arc<PhysVol>, Arc<FullPhysVol>) {
        let world = PhysVol::new(box_log("World"));
        let barrel = PhysVol::new(box_log("Barrel"));
        let module = FullPhysVol::new(box_log("Module"));
        world.add(NameTag::new("Barrel"));
        world.add(IdentifierTag::new(1));
        world.add(Transform::new(trf::translate(0.0, 0.0, 3.0)));
        world.add(barrel.clone());
        barrel.add(SerialDenominator::new("Stave"));
        barrel.add(SerialTransformer::new(
            PhysVol::new(box_log("Stave")),
            |i: usize| trf::translate(i as f64, 0.0, 0.0),
            2,
        ));
        barrel.add(NameTag::new("Module"));
        barrel.add(AlignableTransform::new(trf::translate(0.0, 1.0, 0.0)));
        barrel.add(module.clone());
        (world, module)
    }

    #[test]
    fn top_down_lists_expanded_copies() {
        let (world, _) = detector();
        let mut log = Log::default();
        world.traverse(&mut log, None);
        assert_eq!(
            log.seen,
            vec![
                (0, String::new(), None),
                (1, "/Barrel".to_owned(), Some(1)),
                (2, "/Barrel/Stave0".to_owned(), None),
                (2, "/Barrel/Stave1".to_owned(), None),
                (2, "/Barrel/Module".to_owned(), None),
            ]
        );
    }

    #[test]
    fn bottom_up_and_termination() {
        let (world, _) = detector();
        let mut log = Log {
            order: TraversalOrder::BottomUp,
            ..Log::default()
        };
        world.traverse(&mut log, None);
        let names: Vec<&str> = log.seen.iter().map(|(_, n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            ["/Barrel/Stave0", "/Barrel/Stave1", "/Barrel/Module", "/Barrel", ""]
        );

        let mut log = Log {
            stop_at: Some("Stave0"),
            ..Log::default()
        };
        world.traverse(&mut log, None);
        assert_eq!(log.seen.len(), 3, "stops right after Stave0");
    }

    #[test]
    fn absolute_transforms_match_the_position_cache() {
        let (world, module) = detector();

        struct Grab(Option<(Transform3D, Transform3D)>);
        impl VolumeAction for Grab {
            fn handle_volume(&mut self, _volume: &VolumeLink, state: &mut TraversalState) {
                if state.name() == "Module" {
                    self.0 = Some((state.absolute_transform(), state.default_absolute_transform()));
                    state.terminate();
                }
            }
        }

        let mut grab = Grab(None);
        world.traverse(&mut grab, None);
        let (aligned, default) = grab.0.unwrap();
        assert!(trf::approx_eq(
            &aligned,
            &module.absolute_transform(None).unwrap(),
            1e-12
        ));
        assert!(trf::approx_eq(
            &default,
            &trf::translate(0.0, 1.0, 3.0),
            1e-12
        ));
    }
}
