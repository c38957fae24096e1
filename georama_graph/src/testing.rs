// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small graphs shared by the unit tests.

use std::sync::Arc;

use crate::surface::VirtualSurface;
use crate::types::{LogVol, Material, Solid};
use crate::volume::{FullPhysVol, PhysVol, Volume};

/// A unit box of air.
pub(crate) fn box_log(name: &str) -> Arc<LogVol> {
    LogVol::new(
        name,
        Solid::Box {
            x_half: 1.0,
            y_half: 1.0,
            z_half: 1.0,
        },
        Material::new("Air", 0.0012),
    )
}

/// A 2 by 2 rectangle surface.
pub(crate) fn rect_surface() -> Arc<VirtualSurface> {
    VirtualSurface::new(georama_surface::Rectangle::new(1.0, 1.0).unwrap())
}

/// `World(PhysVol) -> [A(FullPhysVol) -> [A1(PhysVol)], B(PhysVol)]`.
pub(crate) fn world_with_two_levels() -> Arc<PhysVol> {
    let world = PhysVol::new(box_log("World"));
    let a = FullPhysVol::new(box_log("A"));
    a.add(PhysVol::new(box_log("A1")));
    world.add(a);
    world.add(PhysVol::new(box_log("B")));
    world
}
