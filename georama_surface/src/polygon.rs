// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygonal surfaces: rectangles, trapezoids and diamonds.
//!
//! All three are convex polygons symmetric about the local `y` axis. Their
//! containment test walks the edges counter-clockwise and rejects a point as
//! soon as it lies to the right of an edge by more than [`SURFACE_TOLERANCE`].

use kurbo::Point;

use crate::SURFACE_TOLERANCE;
use crate::error::SurfaceError;

/// Returns true if `p` lies on the left of (or within tolerance of) every edge
/// of the counter-clockwise polygon `vertices`.
pub(crate) fn inside_convex(vertices: &[Point], p: Point) -> bool {
    let n = vertices.len();
    (0..n).all(|i| {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        (b - a).cross(p - a) >= -SURFACE_TOLERANCE
    })
}

fn check_half_length(
    shape: &'static str,
    value: f64,
    reason: &'static str,
) -> Result<(), SurfaceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SurfaceError::invalid(shape, reason))
    }
}

fn check_non_negative(
    shape: &'static str,
    value: f64,
    reason: &'static str,
) -> Result<(), SurfaceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SurfaceError::invalid(shape, reason))
    }
}

/// Axis-aligned rectangle centered on the local origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    x_half: f64,
    y_half: f64,
}

impl Rectangle {
    /// Create a rectangle from its half lengths along `x` and `y`.
    ///
    /// Both half lengths must be finite and strictly positive.
    pub fn new(x_half: f64, y_half: f64) -> Result<Self, SurfaceError> {
        check_half_length("rectangle", x_half, "x half length must be positive")?;
        check_half_length("rectangle", y_half, "y half length must be positive")?;
        Ok(Self { x_half, y_half })
    }

    /// Half length along local `x`.
    pub fn x_half_length(&self) -> f64 {
        self.x_half
    }

    /// Half length along local `y`.
    pub fn y_half_length(&self) -> f64 {
        self.y_half
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        4.0 * self.x_half * self.y_half
    }

    /// Corners, counter-clockwise, starting at `(+x, -y)`.
    pub fn vertices(&self) -> [Point; 4] {
        let (x, y) = (self.x_half, self.y_half);
        [
            Point::new(x, -y),
            Point::new(x, y),
            Point::new(-x, y),
            Point::new(-x, -y),
        ]
    }

    /// In-plane containment of a local point, boundary inclusive.
    pub fn contains_point(&self, p: Point) -> bool {
        inside_convex(&self.vertices(), p)
    }
}

/// Isosceles trapezoid: the short edge at `-y`, the long edge at `+y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trapezoid {
    x_half_min: f64,
    x_half_max: f64,
    y_half: f64,
}

impl Trapezoid {
    /// Create a trapezoid from the half length of its bottom edge, its top
    /// edge, and its half height.
    pub fn new(x_half_min: f64, x_half_max: f64, y_half: f64) -> Result<Self, SurfaceError> {
        check_non_negative("trapezoid", x_half_min, "bottom half length must be non-negative")?;
        check_non_negative("trapezoid", x_half_max, "top half length must be non-negative")?;
        if x_half_min == 0.0 && x_half_max == 0.0 {
            return Err(SurfaceError::invalid(
                "trapezoid",
                "at least one edge must have a positive length",
            ));
        }
        check_half_length("trapezoid", y_half, "y half length must be positive")?;
        Ok(Self {
            x_half_min,
            x_half_max,
            y_half,
        })
    }

    /// Half length of the edge at `-y`.
    pub fn x_half_length_min(&self) -> f64 {
        self.x_half_min
    }

    /// Half length of the edge at `+y`.
    pub fn x_half_length_max(&self) -> f64 {
        self.x_half_max
    }

    /// Half height.
    pub fn y_half_length(&self) -> f64 {
        self.y_half
    }

    /// Area of the trapezoid.
    pub fn area(&self) -> f64 {
        2.0 * (self.x_half_min + self.x_half_max) * self.y_half
    }

    /// Corners, counter-clockwise, starting at the bottom right.
    pub fn vertices(&self) -> [Point; 4] {
        let y = self.y_half;
        [
            Point::new(self.x_half_min, -y),
            Point::new(self.x_half_max, y),
            Point::new(-self.x_half_max, y),
            Point::new(-self.x_half_min, -y),
        ]
    }

    /// In-plane containment of a local point, boundary inclusive.
    pub fn contains_point(&self, p: Point) -> bool {
        inside_convex(&self.vertices(), p)
    }
}

/// Hexagon made of two stacked trapezoids sharing the edge at `y = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diamond {
    x_bottom_half: f64,
    x_mid_half: f64,
    x_top_half: f64,
    y_bottom_half: f64,
    y_top_half: f64,
}

impl Diamond {
    /// Create a diamond.
    ///
    /// The bottom edge sits at `-y_bottom_half` with half length
    /// `x_bottom_half`, the widest cut at `y = 0` with half length
    /// `x_mid_half`, and the top edge at `+y_top_half` with half length
    /// `x_top_half`. The cut at `y = 0` must be at least as wide as both
    /// edges, which keeps the hexagon convex.
    pub fn new(
        x_bottom_half: f64,
        x_mid_half: f64,
        x_top_half: f64,
        y_bottom_half: f64,
        y_top_half: f64,
    ) -> Result<Self, SurfaceError> {
        check_non_negative("diamond", x_bottom_half, "bottom half length must be non-negative")?;
        check_half_length("diamond", x_mid_half, "middle half length must be positive")?;
        check_non_negative("diamond", x_top_half, "top half length must be non-negative")?;
        check_non_negative("diamond", y_bottom_half, "bottom height must be non-negative")?;
        check_non_negative("diamond", y_top_half, "top height must be non-negative")?;
        if y_bottom_half + y_top_half <= 0.0 {
            return Err(SurfaceError::invalid(
                "diamond",
                "total height must be positive",
            ));
        }
        if x_mid_half < x_bottom_half || x_mid_half < x_top_half {
            return Err(SurfaceError::invalid(
                "diamond",
                "middle half length must not be shorter than the edges",
            ));
        }
        Ok(Self {
            x_bottom_half,
            x_mid_half,
            x_top_half,
            y_bottom_half,
            y_top_half,
        })
    }

    /// Half length of the bottom edge.
    pub fn x_bottom_half(&self) -> f64 {
        self.x_bottom_half
    }

    /// Half length of the cut at `y = 0`.
    pub fn x_mid_half(&self) -> f64 {
        self.x_mid_half
    }

    /// Half length of the top edge.
    pub fn x_top_half(&self) -> f64 {
        self.x_top_half
    }

    /// Distance from `y = 0` down to the bottom edge.
    pub fn y_bottom_half(&self) -> f64 {
        self.y_bottom_half
    }

    /// Distance from `y = 0` up to the top edge.
    pub fn y_top_half(&self) -> f64 {
        self.y_top_half
    }

    /// Area of the diamond.
    pub fn area(&self) -> f64 {
        (self.x_bottom_half + self.x_mid_half) * self.y_bottom_half
            + (self.x_mid_half + self.x_top_half) * self.y_top_half
    }

    /// Corners, counter-clockwise, starting at the bottom right.
    pub fn vertices(&self) -> [Point; 6] {
        [
            Point::new(self.x_bottom_half, -self.y_bottom_half),
            Point::new(self.x_mid_half, 0.0),
            Point::new(self.x_top_half, self.y_top_half),
            Point::new(-self.x_top_half, self.y_top_half),
            Point::new(-self.x_mid_half, 0.0),
            Point::new(-self.x_bottom_half, -self.y_bottom_half),
        ]
    }

    /// In-plane containment of a local point, boundary inclusive.
    pub fn contains_point(&self, p: Point) -> bool {
        inside_convex(&self.vertices(), p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_corner_is_inside_and_past_edge_is_outside() {
        let r = Rectangle::new(5.0, 5.0).unwrap();
        assert!(r.contains_point(Point::new(5.0, 5.0)), "corner is on the boundary");
        assert!(r.contains_point(Point::new(0.0, 0.0)), "center is inside");
        assert!(!r.contains_point(Point::new(5.01, 0.0)), "past +x edge");
        assert!(!r.contains_point(Point::new(0.0, -5.01)), "past -y edge");
        assert_eq!(r.area(), 100.0);
    }

    #[test]
    fn rectangle_tolerance_band() {
        let r = Rectangle::new(1.0, 1.0).unwrap();
        // The edge test scales the offset by the edge length (2.0).
        assert!(r.contains_point(Point::new(1.0 + 4e-6, 0.0)));
        assert!(!r.contains_point(Point::new(1.0 + 1e-4, 0.0)));
    }

    #[test]
    fn rectangle_rejects_degenerate() {
        assert!(Rectangle::new(0.0, 1.0).is_err());
        assert!(Rectangle::new(1.0, -1.0).is_err());
        assert!(Rectangle::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn trapezoid_slanted_edges() {
        let t = Trapezoid::new(2.0, 4.0, 3.0).unwrap();
        assert!(t.contains_point(Point::new(3.9, 2.9)));
        // Near the short edge the slanted side is close to x = 2.
        assert!(!t.contains_point(Point::new(3.0, -2.9)));
        assert!(t.contains_point(Point::new(-2.0, -3.0)), "bottom left corner");
        assert_eq!(t.area(), 36.0);
    }

    #[test]
    fn trapezoid_may_collapse_to_triangle() {
        let t = Trapezoid::new(0.0, 2.0, 1.0).unwrap();
        assert!(t.contains_point(Point::new(0.0, -1.0)), "apex");
        assert!(!t.contains_point(Point::new(0.5, -1.0)));
        assert!(Trapezoid::new(0.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn diamond_hexagon() {
        let d = Diamond::new(1.0, 3.0, 2.0, 2.0, 4.0).unwrap();
        assert!(d.contains_point(Point::new(3.0, 0.0)), "widest vertex");
        assert!(d.contains_point(Point::new(0.0, 4.0)), "top edge");
        assert!(!d.contains_point(Point::new(0.0, 4.1)));
        assert!(!d.contains_point(Point::new(2.5, -1.9)), "outside bottom slant");
        assert_eq!(d.area(), (1.0 + 3.0) * 2.0 + (3.0 + 2.0) * 4.0);
    }

    #[test]
    fn diamond_rejects_flat() {
        assert!(Diamond::new(1.0, 2.0, 1.0, 0.0, 0.0).is_err());
        assert!(Diamond::new(1.0, 0.0, 1.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn diamond_must_be_convex() {
        let err = Diamond::new(5.0, 1.0, 5.0, 1.0, 1.0).unwrap_err();
        assert!(
            matches!(err, SurfaceError::InvalidShapeParameters { shape: "diamond", .. }),
            "{err}"
        );
        assert!(Diamond::new(1.0, 2.0, 3.0, 1.0, 1.0).is_err(), "top wider than the cut");
        let square = Diamond::new(2.0, 2.0, 2.0, 1.0, 1.0).unwrap();
        assert!(square.contains_point(Point::new(2.0, 0.9)), "equal widths are a rectangle");
    }
}
