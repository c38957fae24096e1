// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual surfaces placed in the graph.

use std::sync::Arc;

use georama_surface::{Annulus, Diamond, Rectangle, SurfaceShape, Trapezoid};
use kurbo::Point;

use crate::error::Result;
use crate::placement::{Placed, Placement};
use crate::positioning::{PositionCache, Positioned};
use crate::store::AlignmentStore;
use crate::trf::{Point3D, Transform3D};
use crate::types::NodeId;

/// A zero-thickness shape placed like a volume.
///
/// Surfaces are leaves: they have no children, no material and no logical
/// volume. They dock into their parent like volumes do and cache their
/// absolute position like full volumes do.
///
/// ```
/// use georama_graph::{LogVol, Material, PhysVol, Solid, Transform, VirtualSurface, Volume, trf};
///
/// let world = PhysVol::new(LogVol::new(
///     "World",
///     Solid::Box { x_half: 50.0, y_half: 50.0, z_half: 50.0 },
///     Material::new("Air", 0.0012),
/// ));
/// let pad = VirtualSurface::rectangle(5.0, 5.0).unwrap();
/// world.add(Transform::new(trf::translate(0.0, 0.0, 20.0)));
/// world.add(pad.clone());
///
/// assert!(pad.is_on_surface(trf::Point3D::new(5.0, -5.0, 20.0), None).unwrap());
/// assert!(!pad.is_on_surface(trf::Point3D::new(0.0, 0.0, 0.0), None).unwrap());
/// ```
#[derive(Debug)]
pub struct VirtualSurface {
    id: NodeId,
    shape: SurfaceShape,
    placement: Placement,
    cache: PositionCache,
}

impl VirtualSurface {
    /// Create a surface of the given shape.
    pub fn new(shape: impl Into<SurfaceShape>) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::next(),
            shape: shape.into(),
            placement: Placement::default(),
            cache: PositionCache::default(),
        })
    }

    /// Rectangle surface; see [`Rectangle::new`].
    pub fn rectangle(x_half: f64, y_half: f64) -> Result<Arc<Self>> {
        Ok(Self::new(Rectangle::new(x_half, y_half)?))
    }

    /// Trapezoid surface; see [`Trapezoid::new`].
    pub fn trapezoid(x_half_min: f64, x_half_max: f64, y_half: f64) -> Result<Arc<Self>> {
        Ok(Self::new(Trapezoid::new(x_half_min, x_half_max, y_half)?))
    }

    /// Annulus surface; see [`Annulus::new`].
    pub fn annulus(
        ox: f64,
        oy: f64,
        radius_in: f64,
        radius_out: f64,
        phi: f64,
    ) -> Result<Arc<Self>> {
        Ok(Self::new(Annulus::new(ox, oy, radius_in, radius_out, phi)?))
    }

    /// Diamond surface; see [`Diamond::new`].
    pub fn diamond(
        x_bottom_half: f64,
        x_mid_half: f64,
        x_top_half: f64,
        y_bottom_half: f64,
        y_top_half: f64,
    ) -> Result<Arc<Self>> {
        Ok(Self::new(Diamond::new(
            x_bottom_half,
            x_mid_half,
            x_top_half,
            y_bottom_half,
            y_top_half,
        )?))
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The shape.
    pub fn shape(&self) -> &SurfaceShape {
        &self.shape
    }

    /// Area of the shape.
    pub fn area(&self) -> f64 {
        self.shape.area()
    }

    /// Whether `point` lies on the surface placed by `node_to_world`.
    ///
    /// The point is taken into the surface frame by the inverse transform,
    /// then checked against the plane and the shape outline.
    pub fn contains(&self, point: Point3D, node_to_world: &Transform3D) -> bool {
        let local = node_to_world.inverse_transform_point(&point);
        self.shape
            .contains_local(Point::new(local.x, local.y), local.z)
    }

    /// Whether `point`, in root coordinates, lies on the surface at its own
    /// absolute position.
    pub fn is_on_surface(&self, point: Point3D, store: Option<&AlignmentStore>) -> Result<bool> {
        let xf = self.absolute_transform(store)?;
        Ok(self.contains(point, &xf))
    }
}

impl Placed for VirtualSurface {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }
}

impl Positioned for VirtualSurface {
    fn position_cache(&self) -> &PositionCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use super::*;
    use crate::error::GraphError;
    use crate::testing::box_log;
    use crate::transform::Transform;
    use crate::trf;
    use crate::volume::{PhysVol, Volume};
    use georama_surface::{ShapeKind, SurfaceError};

    #[test]
    fn invalid_parameters_fail_at_construction() {
        let err = VirtualSurface::annulus(6.0, 0.0, 5.0, 10.0, PI).unwrap_err();
        assert!(
            matches!(
                err,
                GraphError::Surface(SurfaceError::InvalidShapeParameters { shape: "annulus", .. })
            ),
            "deviation point outside the inner radius: {err:?}"
        );
        assert!(VirtualSurface::rectangle(0.0, 1.0).is_err(), "zero width");
    }

    #[test]
    fn annulus_through_a_rotation() {
        let ring = VirtualSurface::annulus(0.0, 0.0, 5.0, 10.0, PI).unwrap();
        assert_eq!(ring.shape().kind(), ShapeKind::Annulus);
        let xf = trf::identity();
        assert!(ring.contains(Point3D::new(7.0, 0.0, 0.0), &xf));
        let rotated =
            trf::rotate_z(200_f64.to_radians()).transform_point(&Point3D::new(7.0, 0.0, 0.0));
        assert!(!ring.contains(rotated, &xf));
        assert!(!ring.contains(Point3D::new(4.999, 0.0, 0.0), &xf));

        // Rotating the placement along with the point keeps it inside.
        let placed = trf::rotate_z(200_f64.to_radians());
        assert!(ring.contains(rotated, &placed));
        let against = trf::rotate_z(-200_f64.to_radians());
        assert!(!ring.contains(Point3D::new(7.0, 0.0, 0.0), &against));
    }

    #[test]
    fn plane_tolerance() {
        let pad = VirtualSurface::rectangle(5.0, 5.0).unwrap();
        let xf = trf::identity();
        assert!(pad.contains(Point3D::new(5.0, 5.0, 0.0), &xf));
        assert!(pad.contains(Point3D::new(0.0, 0.0, 0.5e-5), &xf));
        assert!(!pad.contains(Point3D::new(0.0, 0.0, 2e-5), &xf));
        assert!(!pad.contains(Point3D::new(5.01, 0.0, 0.0), &xf));
        assert_eq!(pad.area(), 100.0);
    }

    #[test]
    fn placed_surface_uses_its_absolute_position() {
        let world = PhysVol::new(box_log("World"));
        let pad = VirtualSurface::rectangle(1.0, 1.0).unwrap();
        world.add(Transform::new(trf::translate(10.0, 0.0, 0.0)));
        world.add(Transform::new(trf::rotate_x(PI / 2.0)));
        world.add(pad.clone());

        // Local y maps to world z after the quarter turn about x.
        assert!(pad.is_on_surface(Point3D::new(10.5, 0.0, 0.9), None).unwrap());
        assert!(!pad.is_on_surface(Point3D::new(10.5, 0.9, 0.0), None).unwrap());
        assert!(pad.cached_absolute_transform(None).is_ok(), "position is now warm");

        let other = PhysVol::new(box_log("Other"));
        other.add(pad.clone());
        pad.clear_cache();
        assert_eq!(
            pad.is_on_surface(Point3D::origin(), None),
            Err(GraphError::SharedNode { node: pad.id() })
        );
    }
}
