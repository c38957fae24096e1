// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Georama Surface: Kurbo-native virtual surface shapes.
//!
//! Virtual surfaces are zero-thickness, planar shapes used to describe sensitive
//! layers in a detector description. They carry no material; they only answer
//! "what is the area" and "is this local point on me".
//!
//! - [`Rectangle`]: axis-aligned rectangle.
//! - [`Trapezoid`]: isosceles trapezoid with its short edge at `-y`.
//! - [`Diamond`]: hexagon made of two trapezoids stacked at `y = 0`.
//! - [`Annulus`]: annular sector whose opening angle is measured from a
//!   deviated focus point.
//!
//! [`SurfaceShape`] is the closed enum over all of them.
//!
//! ## Frames and tolerance
//!
//! Every shape lives in its local `z = 0` plane. Containment is boundary
//! inclusive and uses a fixed [`SURFACE_TOLERANCE`]: a point off the plane by
//! more than the tolerance is outside, and polygon edges accept points that sit
//! within the tolerance on the wrong side.
//!
//! Construction validates parameters and returns [`SurfaceError`] on degenerate
//! input, so an existing shape is always well formed.
//!
//! ## Features
//!
//! - `std` (default): float math from the standard library.
//! - `libm`: float math from `libm` through Kurbo, for `no_std` builds.
//!
//! Without `std` the crate is `no_std` and needs no allocator.
//!
//! ## Example
//!
//! ```
//! use georama_surface::{Annulus, Rectangle, SurfaceShape};
//! use kurbo::Point;
//!
//! let pad = SurfaceShape::from(Rectangle::new(5.0, 5.0).unwrap());
//! assert!(pad.contains_local(Point::new(5.0, 5.0), 0.0));
//! assert!(!pad.contains_local(Point::new(5.01, 0.0), 0.0));
//! assert_eq!(pad.area(), 100.0);
//!
//! let half_ring = Annulus::new(0.0, 0.0, 5.0, 10.0, core::f64::consts::PI).unwrap();
//! assert!(half_ring.contains_point(Point::new(7.0, 0.0)));
//! assert!(!half_ring.contains_point(Point::new(0.0, -7.0)));
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

mod annulus;
mod error;
mod polygon;
mod shape;

pub use annulus::{Annulus, normalize_span};
pub use error::SurfaceError;
pub use polygon::{Diamond, Rectangle, Trapezoid};
pub use shape::{ShapeKind, SurfaceShape};

/// Distance within which a point still counts as on a surface or its boundary.
pub const SURFACE_TOLERANCE: f64 = 1e-5;
