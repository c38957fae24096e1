// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Toy detector.
//!
//! Build a barrel of staves with a serial transformer, print the graph, walk
//! the logical volumes, then apply an alignment correction and clear the
//! affected positions.
//!
//! Run:
//! - `cargo run -p georama_demos --example toy_detector`
//! - `RUST_LOG=georama_graph=trace cargo run -p georama_demos --example toy_detector`

use core::f64::consts::TAU;

use georama_graph::{
    AlignableTransform, ClearPositionAction, FullPhysVol, IdentifierTag, LogVol, Material,
    NameTag, PhysVol, Positioned, PrintGraphAction, SerialDenominator, SerialIdentifier,
    SerialTransformer, Solid, TraversalState, Volume, VolumeAction, VolumeLink, trf,
};
use tracing::info;

const STAVES: usize = 12;

struct Listing;

impl VolumeAction for Listing {
    fn handle_volume(&mut self, volume: &VolumeLink, state: &mut TraversalState) {
        let at = trf::translation_of(&state.absolute_transform());
        println!(
            "{:indent$}{} ({}) id={:?} at ({:.2}, {:.2}, {:.2})",
            "",
            state.absolute_name(),
            volume.log_vol().name(),
            state.id(),
            at.x,
            at.y,
            at.z,
            indent = 2 * state.depth(),
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,georama_graph=debug".into()),
        )
        .init();

    let air = Material::new("Air", 0.0012);
    let silicon = Material::new("Silicon", 2.33);

    let world = PhysVol::new(LogVol::new(
        "World",
        Solid::Box {
            x_half: 200.0,
            y_half: 200.0,
            z_half: 400.0,
        },
        air.clone(),
    ));
    let barrel = FullPhysVol::new(LogVol::new(
        "Barrel",
        Solid::Tube {
            radius_min: 30.0,
            radius_max: 120.0,
            z_half: 300.0,
        },
        air,
    ));
    let stave = FullPhysVol::new(LogVol::new(
        "Stave",
        Solid::Box {
            x_half: 10.0,
            y_half: 0.2,
            z_half: 300.0,
        },
        silicon,
    ));

    let alignment = AlignableTransform::new(trf::identity());
    world.add(NameTag::new("Barrel"));
    world.add(IdentifierTag::new(1));
    world.add(alignment.clone());
    world.add(barrel.clone());

    barrel.add(SerialDenominator::new("Stave"));
    barrel.add(SerialIdentifier::new(100));
    barrel.add(SerialTransformer::new(
        stave,
        |i: usize| {
            let phi = TAU * i as f64 / STAVES as f64;
            trf::rotate_z(phi) * trf::translate(50.0, 0.0, 0.0)
        },
        STAVES,
    ));

    let mut print = PrintGraphAction::new(String::new());
    world.to_link().execute(&mut print);
    match print.finish() {
        Ok(text) => print!("{text}"),
        Err(err) => eprintln!("listing failed: {err}"),
    }

    world.traverse(&mut Listing, None);

    let before = barrel.absolute_transform(None).unwrap();
    alignment.set_delta(trf::translate(0.0, 0.0, 0.5), None);
    let mut clear = ClearPositionAction::new();
    world.to_link().execute(&mut clear);
    let after = barrel.absolute_transform(None).unwrap();
    info!(
        cleared = clear.cleared(),
        shift = trf::translation_of(&after).z - trf::translation_of(&before).z,
        "barrel realigned"
    );

    let seventh = barrel.child_at(6, None).unwrap();
    println!(
        "{} id={:?} at {:?}",
        seventh.name.as_deref().unwrap_or(georama_graph::ANONYMOUS),
        seventh.id,
        trf::translation_of(&(after * seventh.transform))
    );
}
