// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of surface shapes.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use crate::SURFACE_TOLERANCE;
use crate::annulus::Annulus;
use crate::polygon::{Diamond, Rectangle, Trapezoid};

/// Shape kind, used for printing and logging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// [`Rectangle`].
    Rectangle,
    /// [`Trapezoid`].
    Trapezoid,
    /// [`Annulus`].
    Annulus,
    /// [`Diamond`].
    Diamond,
}

impl ShapeKind {
    /// Lower-case name of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Trapezoid => "trapezoid",
            Self::Annulus => "annulus",
            Self::Diamond => "diamond",
        }
    }
}

impl core::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A surface shape lying in its local `z = 0` plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceShape {
    /// Axis-aligned rectangle.
    Rectangle(Rectangle),
    /// Isosceles trapezoid.
    Trapezoid(Trapezoid),
    /// Annular sector with a deviated focus.
    Annulus(Annulus),
    /// Hexagonal diamond.
    Diamond(Diamond),
}

impl SurfaceShape {
    /// Which kind of shape this is.
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Trapezoid(_) => ShapeKind::Trapezoid,
            Self::Annulus(_) => ShapeKind::Annulus,
            Self::Diamond(_) => ShapeKind::Diamond,
        }
    }

    /// Area of the shape.
    pub fn area(&self) -> f64 {
        match self {
            Self::Rectangle(s) => s.area(),
            Self::Trapezoid(s) => s.area(),
            Self::Annulus(s) => s.area(),
            Self::Diamond(s) => s.area(),
        }
    }

    /// In-plane containment, ignoring `z`.
    pub fn contains_point(&self, p: Point) -> bool {
        match self {
            Self::Rectangle(s) => s.contains_point(p),
            Self::Trapezoid(s) => s.contains_point(p),
            Self::Annulus(s) => s.contains_point(p),
            Self::Diamond(s) => s.contains_point(p),
        }
    }

    /// Containment of a local 3D point `(p.x, p.y, z)`.
    ///
    /// Points further than [`SURFACE_TOLERANCE`] from the plane are outside.
    pub fn contains_local(&self, p: Point, z: f64) -> bool {
        if z.abs() > SURFACE_TOLERANCE {
            return false;
        }
        self.contains_point(p)
    }
}

impl From<Rectangle> for SurfaceShape {
    fn from(value: Rectangle) -> Self {
        Self::Rectangle(value)
    }
}

impl From<Trapezoid> for SurfaceShape {
    fn from(value: Trapezoid) -> Self {
        Self::Trapezoid(value)
    }
}

impl From<Annulus> for SurfaceShape {
    fn from(value: Annulus) -> Self {
        Self::Annulus(value)
    }
}

impl From<Diamond> for SurfaceShape {
    fn from(value: Diamond) -> Self {
        Self::Diamond(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_plane_points_are_outside() {
        let shape = SurfaceShape::from(Rectangle::new(5.0, 5.0).unwrap());
        assert!(shape.contains_local(Point::new(1.0, 1.0), 0.0));
        assert!(shape.contains_local(Point::new(1.0, 1.0), 5e-6), "within tolerance");
        assert!(!shape.contains_local(Point::new(1.0, 1.0), 0.5), "above the plane");
        assert!(!shape.contains_local(Point::new(1.0, 1.0), -1e-4), "below the plane");
    }

    #[test]
    fn kind_and_area_dispatch() {
        let shape = SurfaceShape::from(Trapezoid::new(1.0, 2.0, 1.0).unwrap());
        assert_eq!(shape.kind(), ShapeKind::Trapezoid);
        assert_eq!(shape.kind().to_string(), "trapezoid");
        assert_eq!(shape.area(), 6.0);
    }
}
