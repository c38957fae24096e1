// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Streaming iteration over logical children.

use std::sync::Arc;

use crate::action::access::{ChildSurface, ChildVolume};
use crate::action::accumulator::{Accumulator, Pending};
use crate::action::{ActionState, NodeAction};
use crate::node::{GraphNode, VolumeLink};
use crate::serial::SerialTransformer;
use crate::store::AlignmentStore;
use crate::surface::VirtualSurface;
use crate::transform::TransformNode;
use crate::trf::{self, Transform3D};
use crate::types::{IdentifierTag, NameTag, SerialDenominator, SerialIdentifier};
use crate::volume::{ANONYMOUS, FullPhysVol, PhysVol};

#[derive(Debug)]
struct SerialRun {
    transformer: Arc<SerialTransformer>,
    minor: usize,
    pending: Pending,
}

/// Steps through the logical child volumes of a parent one at a time.
///
/// Ordinary child volumes are one step each; a serial transformer with `N`
/// copies is `N` consecutive steps reporting its prototype under each copy
/// transform. Surfaces are skipped.
///
/// ```
/// use georama_graph::{LogVol, Material, PhysVol, SerialTransformer, Solid, Volume, VolumeCursor, trf};
///
/// let log = LogVol::new(
///     "Slab",
///     Solid::Box { x_half: 1.0, y_half: 1.0, z_half: 1.0 },
///     Material::new("Lead", 11.35),
/// );
/// let world = PhysVol::new(log.clone());
/// world.add(SerialTransformer::new(PhysVol::new(log), |i: usize| trf::translate(0.0, 0.0, 2.0 * i as f64), 3));
///
/// let mut cursor = VolumeCursor::new(&world.to_link(), None);
/// let mut z = Vec::new();
/// while !cursor.at_end() {
///     z.push(trf::translation_of(&cursor.transform()).z);
///     cursor.advance();
/// }
/// assert_eq!(z, [0.0, 2.0, 4.0]);
/// ```
#[derive(Debug)]
pub struct VolumeCursor<'s> {
    state: ActionState,
    children: Vec<GraphNode>,
    major: usize,
    index: usize,
    store: Option<&'s AlignmentStore>,
    acc: Accumulator,
    serial: Option<SerialRun>,
    current: Option<ChildVolume>,
    has_alignable: bool,
}

impl<'s> VolumeCursor<'s> {
    /// Position a cursor on the first logical child of `parent`.
    pub fn new(parent: &VolumeLink, store: Option<&'s AlignmentStore>) -> Self {
        let mut cursor = Self {
            state: ActionState::with_depth_limit(ActionState::SELF),
            children: parent.core().child_nodes(),
            major: 0,
            index: 0,
            store,
            acc: Accumulator::default(),
            serial: None,
            current: None,
            has_alignable: false,
        };
        cursor.step();
        cursor
    }

    /// Move to the next logical child.
    pub fn advance(&mut self) {
        if self.current.is_some() {
            self.index += 1;
            self.step();
        }
    }

    /// Whether the cursor has moved past the last logical child.
    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Logical index of the current child.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current child with everything known about it.
    pub fn current(&self) -> Option<&ChildVolume> {
        self.current.as_ref()
    }

    /// The current child volume.
    pub fn volume(&self) -> Option<&VolumeLink> {
        self.current.as_ref().map(|c| &c.volume)
    }

    /// Transform from the current child to the parent; identity at the end.
    pub fn transform(&self) -> Transform3D {
        self.current
            .as_ref()
            .map_or_else(trf::identity, |c| c.transform)
    }

    /// Like [`transform`](Self::transform), ignoring alignment.
    pub fn default_transform(&self) -> Transform3D {
        self.current
            .as_ref()
            .map_or_else(trf::identity, |c| c.default_transform)
    }

    /// Name of the current child, `"ANON"` if it has none.
    pub fn name(&self) -> String {
        self.current
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| ANONYMOUS.to_owned())
    }

    /// Identifier of the current child.
    pub fn id(&self) -> Option<i64> {
        self.current.as_ref().and_then(|c| c.id)
    }

    /// Whether an alignable transform contributes to the current transform.
    pub fn has_alignable_transform(&self) -> bool {
        self.has_alignable
    }

    fn step(&mut self) {
        self.current = None;
        if let Some(run) = &mut self.serial {
            run.minor += 1;
            if run.minor < run.transformer.copy_count() {
                self.emit_copy();
                return;
            }
            self.serial = None;
            self.acc.end_step();
        }
        while self.current.is_none() && self.major < self.children.len() {
            let child = self.children[self.major].clone();
            self.major += 1;
            self.state.resume();
            child.execute(self);
        }
    }

    fn emit_copy(&mut self) {
        if let Some(run) = &self.serial {
            let copy = run.transformer.evaluate(run.minor);
            self.has_alignable = run.pending.has_alignable;
            self.current = Some(ChildVolume::new(
                run.transformer.prototype().clone(),
                run.pending,
                Some(copy),
                &self.acc,
                self.index,
            ));
        }
    }

    fn emit_volume(&mut self, volume: VolumeLink) {
        let pending = self.acc.take_transforms();
        self.has_alignable = pending.has_alignable;
        self.current = Some(ChildVolume::new(
            volume,
            pending,
            None,
            &self.acc,
            self.index,
        ));
        self.acc.end_step();
        self.terminate();
    }
}

impl NodeAction for VolumeCursor<'_> {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn handle_transform(&mut self, transform: &dyn TransformNode) {
        self.acc.push_transform(transform, self.store);
    }

    fn handle_phys_vol(&mut self, volume: &Arc<PhysVol>) {
        self.emit_volume(VolumeLink::Phys(volume.clone()));
    }

    fn handle_full_phys_vol(&mut self, volume: &Arc<FullPhysVol>) {
        self.emit_volume(VolumeLink::Full(volume.clone()));
    }

    fn handle_name_tag(&mut self, tag: &NameTag) {
        self.acc.set_name_tag(tag);
    }

    fn handle_identifier_tag(&mut self, tag: &IdentifierTag) {
        self.acc.set_identifier_tag(tag);
    }

    fn handle_serial_denominator(&mut self, denominator: &SerialDenominator) {
        self.acc.set_serial_denominator(denominator, self.index);
    }

    fn handle_serial_identifier(&mut self, identifier: &SerialIdentifier) {
        self.acc.set_serial_identifier(identifier, self.index);
    }

    fn handle_serial_transformer(&mut self, transformer: &Arc<SerialTransformer>) {
        let pending = self.acc.take_transforms();
        if transformer.copy_count() == 0 {
            self.acc.end_step();
            return;
        }
        self.serial = Some(SerialRun {
            transformer: transformer.clone(),
            minor: 0,
            pending,
        });
        self.emit_copy();
        self.terminate();
    }
}

/// Steps through the child surfaces of a parent one at a time.
///
/// Volumes and serial transformers between surfaces consume the transforms in
/// front of them; a surface does not, so each surface reports the same
/// transform as its [`local_transform`](crate::Placed::local_transform).
/// Serial transformers are not expanded.
#[derive(Debug)]
pub struct SurfaceCursor<'s> {
    state: ActionState,
    children: Vec<GraphNode>,
    major: usize,
    index: usize,
    store: Option<&'s AlignmentStore>,
    acc: Accumulator,
    current: Option<ChildSurface>,
}

impl<'s> SurfaceCursor<'s> {
    /// Position a cursor on the first child surface of `parent`.
    pub fn new(parent: &VolumeLink, store: Option<&'s AlignmentStore>) -> Self {
        let mut cursor = Self {
            state: ActionState::with_depth_limit(ActionState::SELF),
            children: parent.core().child_nodes(),
            major: 0,
            index: 0,
            store,
            acc: Accumulator::default(),
            current: None,
        };
        cursor.step();
        cursor
    }

    /// Move to the next surface.
    pub fn advance(&mut self) {
        if self.current.is_some() {
            self.index += 1;
            self.step();
        }
    }

    /// Whether the cursor has moved past the last surface.
    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Index of the current surface among the surfaces of the parent.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current surface with its transforms.
    pub fn current(&self) -> Option<&ChildSurface> {
        self.current.as_ref()
    }

    /// The current surface.
    pub fn surface(&self) -> Option<&Arc<VirtualSurface>> {
        self.current.as_ref().map(|c| &c.surface)
    }

    /// Transform from the current surface to the parent; identity at the end.
    pub fn transform(&self) -> Transform3D {
        self.current
            .as_ref()
            .map_or_else(trf::identity, |c| c.transform)
    }

    /// Like [`transform`](Self::transform), ignoring alignment.
    pub fn default_transform(&self) -> Transform3D {
        self.current
            .as_ref()
            .map_or_else(trf::identity, |c| c.default_transform)
    }

    fn step(&mut self) {
        self.current = None;
        while self.current.is_none() && self.major < self.children.len() {
            let child = self.children[self.major].clone();
            self.major += 1;
            self.state.resume();
            child.execute(self);
        }
    }
}

impl NodeAction for SurfaceCursor<'_> {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn handle_transform(&mut self, transform: &dyn TransformNode) {
        self.acc.push_transform(transform, self.store);
    }

    fn handle_phys_vol(&mut self, _volume: &Arc<PhysVol>) {
        self.acc.clear_transforms();
    }

    fn handle_full_phys_vol(&mut self, _volume: &Arc<FullPhysVol>) {
        self.acc.clear_transforms();
    }

    fn handle_serial_transformer(&mut self, _transformer: &Arc<SerialTransformer>) {
        self.acc.clear_transforms();
    }

    fn handle_surface(&mut self, surface: &Arc<VirtualSurface>) {
        let pending = self.acc.pending();
        self.current = Some(ChildSurface {
            surface: surface.clone(),
            transform: pending.transform,
            default_transform: pending.default_transform,
        });
        self.terminate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Placed;
    use crate::testing::{box_log, rect_surface};
    use crate::transform::{AlignableTransform, Transform};
    use crate::volume::Volume;

    fn listing(parent: &VolumeLink) -> Vec<(String, Option<i64>)> {
        let mut cursor = VolumeCursor::new(parent, None);
        let mut out = Vec::new();
        while !cursor.at_end() {
            out.push((cursor.name(), cursor.id()));
            cursor.advance();
        }
        out
    }

    #[test]
    fn empty_parent_starts_at_end() {
        let world = PhysVol::new(box_log("World"));
        let mut cursor = VolumeCursor::new(&world.to_link(), None);
        assert!(cursor.at_end());
        cursor.advance();
        assert!(cursor.at_end(), "advancing past the end is harmless");
        assert!(trf::approx_eq(&cursor.transform(), &trf::identity(), 0.0));
    }

    #[test]
    fn serial_copies_are_flattened_between_volumes() {
        let world = PhysVol::new(box_log("World"));
        let proto = FullPhysVol::new(box_log("Proto"));
        world.add(NameTag::new("First"));
        world.add(PhysVol::new(box_log("A")));
        world.add(SerialDenominator::new("Copy"));
        world.add(Transform::new(trf::translate(0.0, 10.0, 0.0)));
        world.add(SerialTransformer::new(
            proto.clone(),
            |i: usize| trf::translate(i as f64, 0.0, 0.0),
            3,
        ));
        world.add(NameTag::new("Last"));
        world.add(PhysVol::new(box_log("B")));

        let link = world.to_link();
        let names: Vec<String> = listing(&link).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["First", "Copy0", "Copy1", "Copy2", "Last"]);

        let mut cursor = VolumeCursor::new(&link, None);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.index(), 2);
        assert!(cursor.volume().is_some_and(|v| v.id() == proto.id()));
        let expected = trf::translate(0.0, 10.0, 0.0) * trf::translate(1.0, 0.0, 0.0);
        assert!(trf::approx_eq(&cursor.transform(), &expected, 1e-12));
        assert!(!proto.is_shared(), "prototype is never docked");
    }

    #[test]
    fn identifiers_follow_tags() {
        let world = PhysVol::new(box_log("World"));
        let proto = PhysVol::new(box_log("Proto"));
        world.add(IdentifierTag::new(42));
        world.add(PhysVol::new(box_log("A")));
        world.add(PhysVol::new(box_log("B")));
        world.add(SerialIdentifier::new(100));
        world.add(SerialTransformer::new(proto, |_: usize| trf::identity(), 2));
        world.add(PhysVol::new(box_log("C")));

        let ids: Vec<Option<i64>> = listing(&world.to_link())
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        assert_eq!(ids, [Some(42), None, Some(100), Some(101), Some(102)]);
    }

    #[test]
    fn surfaces_leave_transforms_to_later_siblings() {
        let world = PhysVol::new(box_log("World"));
        let volume = FullPhysVol::new(box_log("A"));
        let first = rect_surface();
        let second = rect_surface();
        world.add(Transform::new(trf::translate(1.0, 0.0, 0.0)));
        world.add(first.clone());
        world.add(Transform::new(trf::translate(0.0, 2.0, 0.0)));
        world.add(second.clone());
        world.add(volume.clone());
        world.add(AlignableTransform::new(trf::translate(0.0, 0.0, 3.0)));
        world.add(rect_surface());

        let both = trf::translate(1.0, 0.0, 0.0) * trf::translate(0.0, 2.0, 0.0);
        let link = world.to_link();
        let volumes = VolumeCursor::new(&link, None);
        assert!(
            trf::approx_eq(&volumes.transform(), &both, 0.0),
            "surfaces do not interrupt the run in front of a volume"
        );
        assert!(trf::approx_eq(&volume.local_transform(None).unwrap(), &both, 0.0));
        assert!(!volumes.has_alignable_transform());

        let mut surfaces = SurfaceCursor::new(&link, None);
        let expected = [
            trf::translate(1.0, 0.0, 0.0),
            both,
            trf::translate(0.0, 0.0, 3.0),
        ];
        for xf in expected {
            let surface = surfaces.surface().cloned().unwrap();
            assert!(trf::approx_eq(&surfaces.transform(), &xf, 0.0));
            assert!(trf::approx_eq(&surface.local_transform(None).unwrap(), &xf, 0.0));
            surfaces.advance();
        }
        assert!(surfaces.at_end());
        assert!(trf::approx_eq(&second.local_transform(None).unwrap(), &both, 0.0));
        assert!(trf::approx_eq(
            &first.local_transform(None).unwrap(),
            &trf::translate(1.0, 0.0, 0.0),
            0.0
        ));
    }
}
