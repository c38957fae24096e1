// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical child counts.

use std::sync::Arc;

use crate::action::{ActionState, NodeAction};
use crate::serial::SerialTransformer;
use crate::surface::VirtualSurface;
use crate::volume::{FullPhysVol, PhysVol};

/// Counts the logical child volumes of the volume it is executed on.
///
/// Every child volume counts once and every serial transformer counts as its
/// number of copies.
#[derive(Debug)]
pub struct CountVolumeAction {
    state: ActionState,
    count: usize,
}

impl Default for CountVolumeAction {
    fn default() -> Self {
        Self {
            state: ActionState::with_depth_limit(ActionState::SELF_AND_CHILDREN),
            count: 0,
        }
    }
}

impl CountVolumeAction {
    /// A fresh counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical children seen so far.
    pub fn count(&self) -> usize {
        self.count
    }

    fn visit(&mut self) {
        if self.state.depth() > ActionState::SELF {
            self.count += 1;
        }
    }
}

impl NodeAction for CountVolumeAction {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn handle_phys_vol(&mut self, _volume: &Arc<PhysVol>) {
        self.visit();
    }

    fn handle_full_phys_vol(&mut self, _volume: &Arc<FullPhysVol>) {
        self.visit();
    }

    fn handle_serial_transformer(&mut self, transformer: &Arc<SerialTransformer>) {
        self.count += transformer.copy_count();
    }
}

/// Counts the child surfaces of the volume it is executed on.
#[derive(Debug)]
pub struct CountSurfaceAction {
    state: ActionState,
    count: usize,
}

impl Default for CountSurfaceAction {
    fn default() -> Self {
        Self {
            state: ActionState::with_depth_limit(ActionState::SELF_AND_CHILDREN),
            count: 0,
        }
    }
}

impl CountSurfaceAction {
    /// A fresh counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Surfaces seen so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl NodeAction for CountSurfaceAction {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn handle_surface(&mut self, _surface: &Arc<VirtualSurface>) {
        self.count += 1;
    }
}
