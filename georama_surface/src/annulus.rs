// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Annular sectors with a deviated focus.
//!
//! An [`Annulus`] is the part of the ring `radius_in <= |p| <= radius_out`
//! (centered on the local origin) that is swept by rays leaving the deviation
//! point `(ox, oy)` at angles in `[0, span]`, measured counter-clockwise from
//! local `+x`. With the deviation at the origin and a span of `2π` this is a
//! plain annulus.

use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::SURFACE_TOLERANCE;
use crate::error::SurfaceError;

/// Number of Simpson intervals used to integrate the area of a deviated sector.
const AREA_INTERVALS: u32 = 512;

/// Annular sector swept from a deviation point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annulus {
    deviation: Point,
    radius_in: f64,
    radius_out: f64,
    phi: f64,
    span: f64,
}

/// Normalize a span angle into `[0, 2π]`.
///
/// A positive input that lands exactly on a multiple of `2π` is a full turn,
/// not an empty sector.
pub fn normalize_span(phi: f64) -> f64 {
    let mut theta = phi % TAU;
    if theta < 0.0 {
        theta += TAU;
    }
    if theta == 0.0 && phi > 0.0 { TAU } else { theta }
}

impl Annulus {
    /// Create an annular sector.
    ///
    /// - `ox`, `oy`: deviation of the focusing point from the ring center.
    /// - `radius_in`, `radius_out`: ring radii.
    /// - `phi`: span angle of the sector in radians; `2π` gives a full ring.
    ///
    /// The outer radius must be positive and no smaller than the inner radius,
    /// and the deviation point must lie within the inner radius.
    pub fn new(
        ox: f64,
        oy: f64,
        radius_in: f64,
        radius_out: f64,
        phi: f64,
    ) -> Result<Self, SurfaceError> {
        if !(ox.is_finite() && oy.is_finite() && phi.is_finite()) {
            return Err(SurfaceError::invalid(
                "annulus",
                "deviation and span must be finite",
            ));
        }
        if !(radius_in.is_finite() && radius_in >= 0.0) {
            return Err(SurfaceError::invalid(
                "annulus",
                "inner radius must be non-negative",
            ));
        }
        if !(radius_out.is_finite() && radius_out > 0.0) {
            return Err(SurfaceError::invalid(
                "annulus",
                "outer radius must be positive",
            ));
        }
        if radius_out < radius_in {
            return Err(SurfaceError::invalid(
                "annulus",
                "outer radius is smaller than inner radius",
            ));
        }
        let deviation = Point::new(ox, oy);
        if deviation.to_vec2().hypot() > radius_in {
            return Err(SurfaceError::invalid(
                "annulus",
                "deviation point lies outside the inner radius",
            ));
        }
        Ok(Self {
            deviation,
            radius_in,
            radius_out,
            phi,
            span: normalize_span(phi),
        })
    }

    /// Deviation of the focus along `x`.
    pub fn ox(&self) -> f64 {
        self.deviation.x
    }

    /// Deviation of the focus along `y`.
    pub fn oy(&self) -> f64 {
        self.deviation.y
    }

    /// Inner ring radius.
    pub fn radius_in(&self) -> f64 {
        self.radius_in
    }

    /// Outer ring radius.
    pub fn radius_out(&self) -> f64 {
        self.radius_out
    }

    /// Span angle as given at construction.
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Span angle normalized into `[0, 2π]`.
    pub fn span(&self) -> f64 {
        self.span
    }

    /// In-plane containment of a local point.
    ///
    /// The point must sit inside the ring (within tolerance on the squared
    /// radius) and its direction from the deviation point must fall inside the
    /// sector.
    pub fn contains_point(&self, p: Point) -> bool {
        let r2 = p.to_vec2().hypot2();
        if r2 - self.radius_in * self.radius_in < -SURFACE_TOLERANCE
            || r2 - self.radius_out * self.radius_out > SURFACE_TOLERANCE
        {
            return false;
        }
        let mut angle = (p - self.deviation).atan2();
        if angle < 0.0 {
            angle += TAU;
        }
        angle <= self.span
    }

    /// Area of the sector.
    ///
    /// Rays from the deviation point cross the inner circle once and the outer
    /// circle once, so the area is `∫ (t_out² - t_in²) / 2 dθ` over the span.
    /// The centered part of that integral is closed form; the deviated part is
    /// integrated with Simpson's rule.
    pub fn area(&self) -> f64 {
        let band = 0.5 * self.span * (self.radius_out.powi(2) - self.radius_in.powi(2));
        let o = self.deviation.to_vec2();
        if o.hypot2() == 0.0 || self.span == 0.0 {
            return band;
        }
        let o2 = o.hypot2();
        let (ri2, ro2) = (self.radius_in.powi(2), self.radius_out.powi(2));
        let integrand = |theta: f64| {
            let b = o.dot(Vec2::from_angle(theta));
            let s_in = (b * b - o2 + ri2).max(0.0).sqrt();
            let s_out = (b * b - o2 + ro2).max(0.0).sqrt();
            b * (s_out - s_in)
        };
        let h = self.span / f64::from(AREA_INTERVALS);
        let mut sum = integrand(0.0) + integrand(self.span);
        for k in 1..AREA_INTERVALS {
            let weight = if k % 2 == 1 { 4.0 } else { 2.0 };
            sum += weight * integrand(h * f64::from(k));
        }
        band - sum * h / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;
    use kurbo::Affine;

    fn annulus() -> Annulus {
        Annulus::new(0.0, 0.0, 5.0, 10.0, PI).unwrap()
    }

    #[test]
    fn point_on_positive_x_is_inside() {
        assert!(annulus().contains_point(Point::new(7.0, 0.0)));
    }

    #[test]
    fn point_rotated_past_span_is_outside() {
        let rotated = Affine::rotate(200.0_f64.to_radians()) * Point::new(7.0, 0.0);
        assert!(!annulus().contains_point(rotated));
        let within = Affine::rotate(170.0_f64.to_radians()) * Point::new(7.0, 0.0);
        assert!(annulus().contains_point(within));
    }

    #[test]
    fn point_inside_inner_radius_is_outside() {
        assert!(!annulus().contains_point(Point::new(4.999, 0.0)));
        assert!(annulus().contains_point(Point::new(5.0, 0.0)));
        assert!(!annulus().contains_point(Point::new(10.001, 0.0)));
    }

    #[test]
    fn span_normalization() {
        assert_eq!(normalize_span(TAU), TAU, "positive full turn stays full");
        assert_eq!(normalize_span(2.0 * TAU), TAU);
        assert_eq!(normalize_span(0.0), 0.0);
        assert!((normalize_span(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((normalize_span(TAU + 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn full_turn_contains_every_direction() {
        let a = Annulus::new(0.0, 0.0, 1.0, 2.0, TAU).unwrap();
        for deg in [0.0_f64, 90.0, 180.0, 270.0, 359.0] {
            let p = Affine::rotate(deg.to_radians()) * Point::new(1.5, 0.0);
            assert!(a.contains_point(p), "direction {deg} should be inside");
        }
    }

    #[test]
    fn deviation_shifts_the_sector_edge() {
        // Focus to the right: a point just above the x axis on the left side
        // is seen from the focus at an angle below π.
        let a = Annulus::new(2.0, 0.0, 3.0, 6.0, PI).unwrap();
        assert!(a.contains_point(Point::new(-4.0, 0.5)));
        assert!(!a.contains_point(Point::new(-4.0, -0.5)));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(Annulus::new(6.0, 0.0, 5.0, 10.0, PI).is_err(), "deviation outside");
        assert!(Annulus::new(0.0, 0.0, 5.0, 0.0, PI).is_err(), "outer not positive");
        assert!(Annulus::new(0.0, 0.0, 5.0, 4.0, PI).is_err(), "outer < inner");
        assert!(Annulus::new(0.0, 0.0, -1.0, 4.0, PI).is_err(), "negative inner");
        assert!(Annulus::new(0.0, 0.0, 1.0, 4.0, f64::INFINITY).is_err());
    }

    #[test]
    fn centered_area_is_closed_form() {
        let a = annulus();
        let expected = 0.5 * PI * (100.0 - 25.0);
        assert!((a.area() - expected).abs() < 1e-9);
    }

    #[test]
    fn deviated_full_turn_area_matches_ring() {
        // A full turn covers the whole ring wherever the focus sits.
        let a = Annulus::new(1.0, -0.5, 3.0, 6.0, TAU).unwrap();
        let expected = PI * (36.0 - 9.0);
        assert!((a.area() - expected).abs() < 1e-6, "area {}", a.area());
    }

    #[test]
    fn deviated_half_turn_area_differs_from_centered() {
        let centered = Annulus::new(0.0, 0.0, 3.0, 6.0, PI).unwrap().area();
        // Focus shifted up: the half plane above it holds less of the ring.
        let shifted = Annulus::new(0.0, 1.0, 3.0, 6.0, PI).unwrap().area();
        assert!(shifted < centered, "{shifted} should be below {centered}");
    }
}
