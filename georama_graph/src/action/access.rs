// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random access to one logical child.

use std::sync::Arc;

use crate::action::accumulator::{Accumulator, Pending};
use crate::action::{ActionState, NodeAction};
use crate::error::{GraphError, Result};
use crate::node::VolumeLink;
use crate::serial::SerialTransformer;
use crate::store::AlignmentStore;
use crate::surface::VirtualSurface;
use crate::transform::TransformNode;
use crate::trf::Transform3D;
use crate::types::{IdentifierTag, NameTag, SerialDenominator, SerialIdentifier};
use crate::volume::{FullPhysVol, PhysVol};

/// A logical child volume as seen from its parent.
#[derive(Clone, Debug)]
pub struct ChildVolume {
    /// The child, or the prototype of a serial transformer copy.
    pub volume: VolumeLink,
    /// Transform from the child to the parent.
    pub transform: Transform3D,
    /// Same as `transform`, ignoring alignment.
    pub default_transform: Transform3D,
    /// Name given by a name tag or a serial denominator.
    pub name: Option<String>,
    /// Identifier given by an identifier tag or a serial identifier.
    pub id: Option<i64>,
}

impl ChildVolume {
    pub(crate) fn new(
        volume: VolumeLink,
        pending: Pending,
        copy: Option<Transform3D>,
        acc: &Accumulator,
        index: usize,
    ) -> Self {
        let (transform, default_transform) = match copy {
            Some(copy) => (pending.transform * copy, pending.default_transform * copy),
            None => (pending.transform, pending.default_transform),
        };
        Self {
            volume,
            transform,
            default_transform,
            name: acc.name(index),
            id: acc.id(index),
        }
    }
}

/// A child surface as seen from its parent.
#[derive(Clone, Debug)]
pub struct ChildSurface {
    /// The surface.
    pub surface: Arc<VirtualSurface>,
    /// Transform from the surface to the parent.
    pub transform: Transform3D,
    /// Same as `transform`, ignoring alignment.
    pub default_transform: Transform3D,
}

/// Finds logical child volume `index` of the volume it is executed on.
///
/// Reports exactly what a [`VolumeCursor`](crate::VolumeCursor) reports at the
/// same index, without stepping through the children before it one by one:
/// a serial transformer in front of the target is skipped in one go.
#[derive(Debug)]
pub struct AccessVolumeAction<'s> {
    state: ActionState,
    index: usize,
    counter: usize,
    store: Option<&'s AlignmentStore>,
    acc: Accumulator,
    found: Option<ChildVolume>,
    misuse: bool,
}

impl<'s> AccessVolumeAction<'s> {
    /// Look for logical child `index`, resolving alignment through `store`.
    pub fn new(index: usize, store: Option<&'s AlignmentStore>) -> Self {
        Self {
            state: ActionState::with_depth_limit(ActionState::SELF_AND_CHILDREN),
            index,
            counter: 0,
            store,
            acc: Accumulator::default(),
            found: None,
            misuse: false,
        }
    }

    /// The child, if the index was in range.
    pub fn child(&self) -> Option<&ChildVolume> {
        self.found.as_ref()
    }

    /// Take the child, if the index was in range.
    pub fn into_child(self) -> Option<ChildVolume> {
        self.found
    }

    /// Take the child, reporting a traversal that ran below the direct
    /// children.
    pub fn finish(self) -> Result<Option<ChildVolume>> {
        if self.misuse {
            return Err(GraphError::DepthLimitMisuse {
                reason: "volume access visited grandchildren",
            });
        }
        Ok(self.found)
    }

    fn visit(&mut self, volume: VolumeLink) {
        let depth = self.state.depth();
        debug_assert!(
            depth <= ActionState::SELF_AND_CHILDREN,
            "volume access visited grandchildren"
        );
        if depth > ActionState::SELF_AND_CHILDREN {
            self.misuse = true;
            return;
        }
        if depth == ActionState::SELF {
            return;
        }
        if self.counter == self.index {
            let pending = self.acc.take_transforms();
            self.found = Some(ChildVolume::new(
                volume,
                pending,
                None,
                &self.acc,
                self.counter,
            ));
            self.terminate();
        } else {
            self.acc.clear_transforms();
        }
        self.acc.end_step();
        self.counter += 1;
    }
}

impl NodeAction for AccessVolumeAction<'_> {
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
        self.visit(VolumeLink::Phys(volume.clone()));
    }

    fn handle_full_phys_vol(&mut self, volume: &Arc<FullPhysVol>) {
        self.visit(VolumeLink::Full(volume.clone()));
    }

    fn handle_name_tag(&mut self, tag: &NameTag) {
        self.acc.set_name_tag(tag);
    }

    fn handle_identifier_tag(&mut self, tag: &IdentifierTag) {
        self.acc.set_identifier_tag(tag);
    }

    fn handle_serial_denominator(&mut self, denominator: &SerialDenominator) {
        self.acc.set_serial_denominator(denominator, self.counter);
    }

    fn handle_serial_identifier(&mut self, identifier: &SerialIdentifier) {
        self.acc.set_serial_identifier(identifier, self.counter);
    }

    fn handle_serial_transformer(&mut self, transformer: &Arc<SerialTransformer>) {
        let copies = transformer.copy_count();
        if (self.counter..self.counter + copies).contains(&self.index) {
            let copy = transformer.evaluate(self.index - self.counter);
            let pending = self.acc.take_transforms();
            self.found = Some(ChildVolume::new(
                transformer.prototype().clone(),
                pending,
                Some(copy),
                &self.acc,
                self.index,
            ));
            self.terminate();
        } else {
            self.acc.clear_transforms();
        }
        self.acc.end_step();
        self.counter += copies;
    }
}

/// Finds child surface `index` of the volume it is executed on.
#[derive(Debug)]
pub struct AccessSurfaceAction<'s> {
    state: ActionState,
    index: usize,
    counter: usize,
    store: Option<&'s AlignmentStore>,
    acc: Accumulator,
    found: Option<ChildSurface>,
}

impl<'s> AccessSurfaceAction<'s> {
    /// Look for child surface `index`, resolving alignment through `store`.
    pub fn new(index: usize, store: Option<&'s AlignmentStore>) -> Self {
        Self {
            state: ActionState::with_depth_limit(ActionState::SELF_AND_CHILDREN),
            index,
            counter: 0,
            store,
            acc: Accumulator::default(),
            found: None,
        }
    }

    /// The surface, if the index was in range.
    pub fn child(&self) -> Option<&ChildSurface> {
        self.found.as_ref()
    }

    /// Take the surface, if the index was in range.
    pub fn into_child(self) -> Option<ChildSurface> {
        self.found
    }

    fn skip_volume(&mut self) {
        if self.state.depth() > 0 {
            self.acc.clear_transforms();
        }
    }
}

impl NodeAction for AccessSurfaceAction<'_> {
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
        self.skip_volume();
    }

    fn handle_full_phys_vol(&mut self, _volume: &Arc<FullPhysVol>) {
        self.skip_volume();
    }

    fn handle_serial_transformer(&mut self, _transformer: &Arc<SerialTransformer>) {
        self.acc.clear_transforms();
    }

    fn handle_surface(&mut self, surface: &Arc<VirtualSurface>) {
        if self.counter == self.index {
            let pending = self.acc.pending();
            self.found = Some(ChildSurface {
                surface: surface.clone(),
                transform: pending.transform,
                default_transform: pending.default_transform,
            });
            self.terminate();
        }
        self.counter += 1;
    }
}
