// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Georama Graph: a shareable detector-geometry graph.
//!
//! A detector is described as a tree of physical volumes. Each volume owns an
//! ordered list of child nodes: transforms, tags, other volumes, serial
//! transformers and virtual surfaces. The order carries meaning: the
//! transforms and tags in front of a volume place and name it.
//!
//! - [`PhysVol`] and [`FullPhysVol`] are the containers. Full volumes cache
//!   their absolute position and know their absolute name.
//! - [`Transform`] and [`AlignableTransform`] place what follows them.
//!   Alignable transforms carry a runtime correction, either privately or in
//!   a caller-owned [`AlignmentStore`].
//! - [`SerialTransformer`] places one prototype volume `N` times through a
//!   pure function of the copy index, without creating `N` nodes.
//! - [`NameTag`], [`IdentifierTag`], [`SerialDenominator`] and
//!   [`SerialIdentifier`] name and number the children that follow them.
//! - [`VirtualSurface`] is a positioned two-dimensional shape from
//!   [`georama_surface`].
//!
//! ## Sharing
//!
//! Nodes are reference counted and a subtree may be added under several
//! parents. A volume or surface remembers its first parent; a second one
//! makes it shared for good, after which asking for its position fails with
//! [`GraphError::SharedNode`]. See [`Placement`].
//!
//! ## Queries
//!
//! Read-only queries are visitors ([`NodeAction`]). The [`Volume`] trait wraps
//! the common ones: logical child counts and random access, streaming
//! [`VolumeCursor`]s and [`SurfaceCursor`]s, and full [`traverse`](Volume::traverse)
//! runs with a [`VolumeAction`].
//!
//! ## Example
//!
//! ```rust
//! use georama_graph::{
//!     FullPhysVol, IdentifierTag, LogVol, Material, PhysVol, Positioned, SerialIdentifier,
//!     SerialTransformer, Solid, Transform, Volume, trf,
//! };
//!
//! let air = Material::new("Air", 0.0012);
//! let silicon = Material::new("Silicon", 2.33);
//! let world = PhysVol::new(LogVol::new(
//!     "World",
//!     Solid::Box { x_half: 100.0, y_half: 100.0, z_half: 100.0 },
//!     air,
//! ));
//! let sensor = FullPhysVol::new(LogVol::new(
//!     "Sensor",
//!     Solid::Box { x_half: 1.0, y_half: 1.0, z_half: 0.1 },
//!     silicon,
//! ));
//!
//! // One sensor placed explicitly...
//! world.add(IdentifierTag::new(7));
//! world.add(Transform::new(trf::translate(0.0, 0.0, 50.0)));
//! world.add(sensor.clone());
//!
//! // ...and ten more along x, numbered from 100.
//! let strip = FullPhysVol::new(sensor.log_vol().clone());
//! world.add(SerialIdentifier::new(100));
//! world.add(SerialTransformer::new(strip, |i: usize| trf::translate(3.0 * i as f64, 0.0, 0.0), 10));
//!
//! assert_eq!(world.child_count(), 11);
//! assert_eq!(world.id_of_child(0).unwrap(), Some(7));
//! assert_eq!(world.id_of_child(10).unwrap(), Some(109));
//!
//! let at = sensor.absolute_transform(None).unwrap();
//! assert_eq!(trf::translation_of(&at).z, 50.0);
//! ```

mod action;
mod error;
mod node;
mod placement;
mod positioning;
mod serial;
mod store;
mod surface;
mod transform;
mod traverse;
mod types;
mod volume;

pub mod trf;

pub use action::{
    AccessSurfaceAction, AccessVolumeAction, ActionState, ChildSurface, ChildVolume,
    ClearPositionAction, CountSurfaceAction, CountVolumeAction, NodeAction, PrintFlags,
    PrintGraphAction, SurfaceCursor, VolumeCursor,
};
pub use error::{GraphError, Result};
pub use node::{GraphNode, VolumeLink};
pub use placement::{Placed, Placement};
pub use positioning::{PositionCache, Positioned};
pub use serial::{PlacementFunction, SerialTransformer};
pub use store::AlignmentStore;
pub use surface::VirtualSurface;
pub use transform::{AlignableTransform, Transform, TransformNode};
pub use traverse::{TraversalOrder, TraversalState, VolumeAction};
pub use types::{
    IdentifierTag, LogVol, Material, NameTag, NodeId, SerialDenominator, SerialIdentifier, Solid,
};
pub use volume::{ANONYMOUS, FullPhysVol, PhysVol, Volume};

pub use georama_surface::{
    Annulus, Diamond, Rectangle, SURFACE_TOLERANCE, ShapeKind, SurfaceError, SurfaceShape,
    Trapezoid,
};

#[cfg(test)]
mod testing;
