// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual surfaces.
//!
//! Place one surface of each shape in a volume, then probe world points
//! against them.
//!
//! Run:
//! - `cargo run -p georama_demos --example surfaces`

use core::f64::consts::PI;

use georama_graph::{
    LogVol, Material, PhysVol, Positioned, Solid, SurfaceCursor, Transform, VirtualSurface, Volume,
    trf,
};
use georama_surface::{Annulus, SurfaceError};
use kurbo::Point;
use tracing::warn;

fn main() -> Result<(), georama_graph::GraphError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let world = PhysVol::new(LogVol::new(
        "World",
        Solid::Box {
            x_half: 50.0,
            y_half: 50.0,
            z_half: 50.0,
        },
        Material::new("Vacuum", 0.0),
    ));

    let shapes = [
        VirtualSurface::rectangle(5.0, 5.0)?,
        VirtualSurface::trapezoid(2.0, 4.0, 3.0)?,
        VirtualSurface::annulus(0.0, 0.0, 5.0, 10.0, PI)?,
        VirtualSurface::diamond(1.0, 3.0, 2.0, 2.0, 1.5)?,
    ];
    // Transforms in front of a surface carry on to the surfaces after it, so
    // each step only adds the next 10 along z.
    for surface in &shapes {
        world.add(Transform::new(trf::translate(0.0, 0.0, 10.0)));
        world.add(surface.clone());
    }

    let mut cursor = SurfaceCursor::new(&world.to_link(), None);
    while let Some(surface) = cursor.surface() {
        println!(
            "surface {} {} area={:.3} at z={}",
            cursor.index(),
            surface.shape().kind(),
            surface.area(),
            trf::translation_of(&cursor.transform()).z
        );
        cursor.advance();
    }

    let ring = &shapes[2];
    let placed = ring.absolute_transform(None)?;
    for local in [
        trf::Point3D::new(7.0, 0.0, 0.0),
        trf::Point3D::new(0.0, -7.0, 0.0),
        trf::Point3D::new(4.999, 0.0, 0.0),
    ] {
        let world_point = placed.transform_point(&local);
        println!(
            "{local} -> {world_point}: on ring = {}",
            ring.is_on_surface(world_point, None)?
        );
    }

    // Shapes validate at construction.
    if let Err(SurfaceError::InvalidShapeParameters { shape, reason }) =
        Annulus::new(6.0, 0.0, 5.0, 10.0, PI)
    {
        warn!(shape, reason, "rejected");
    }
    let half = Annulus::new(0.0, 0.0, 5.0, 10.0, PI)?;
    println!("half ring contains (7, 0): {}", half.contains_point(Point::new(7.0, 0.0)));
    Ok(())
}
