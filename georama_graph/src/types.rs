// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identities, logical volumes and the tag nodes.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-unique identity of a graph node.
///
/// Identities are allocated monotonically and never reused. They key the
/// entries of an [`AlignmentStore`](crate::AlignmentStore) and locate a node
/// among its parent's children.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bulk material.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Density in g/cm³.
    pub density: f64,
}

impl Material {
    /// Create a material.
    pub fn new(name: impl Into<String>, density: f64) -> Self {
        Self {
            name: name.into(),
            density,
        }
    }
}

/// Shape of a logical volume.
///
/// Only the few primitives the engine needs to describe a detector; boolean
/// composition is not supported.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Solid {
    /// Axis-aligned box given by its half lengths.
    Box {
        /// Half length along `x`.
        x_half: f64,
        /// Half length along `y`.
        y_half: f64,
        /// Half length along `z`.
        z_half: f64,
    },
    /// Cylindrical shell along `z`.
    Tube {
        /// Inner radius.
        radius_min: f64,
        /// Outer radius.
        radius_max: f64,
        /// Half length along `z`.
        z_half: f64,
    },
    /// Trapezoid whose `x` and `y` half lengths vary linearly along `z`.
    Trd {
        /// Half length along `x` at `-z`.
        x_half_1: f64,
        /// Half length along `x` at `+z`.
        x_half_2: f64,
        /// Half length along `y` at `-z`.
        y_half_1: f64,
        /// Half length along `y` at `+z`.
        y_half_2: f64,
        /// Half length along `z`.
        z_half: f64,
    },
}

impl Solid {
    /// Name of the solid kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Box { .. } => "Box",
            Self::Tube { .. } => "Tube",
            Self::Trd { .. } => "Trd",
        }
    }

    /// Volume enclosed by the solid.
    pub fn volume(&self) -> f64 {
        match *self {
            Self::Box {
                x_half,
                y_half,
                z_half,
            } => 8.0 * x_half * y_half * z_half,
            Self::Tube {
                radius_min,
                radius_max,
                z_half,
            } => core::f64::consts::TAU * z_half * (radius_max * radius_max - radius_min * radius_min),
            Self::Trd {
                x_half_1,
                x_half_2,
                y_half_1,
                y_half_2,
                z_half,
            } => {
                // Prismatoid: exact for faces varying linearly in both axes.
                let a1 = 4.0 * x_half_1 * y_half_1;
                let a2 = 4.0 * x_half_2 * y_half_2;
                let am = (x_half_1 + x_half_2) * (y_half_1 + y_half_2);
                2.0 * z_half * (a1 + 4.0 * am + a2) / 6.0
            }
        }
    }
}

/// Immutable shape and material pair, shared by every physical volume placed
/// from it.
#[derive(Clone, Debug, PartialEq)]
pub struct LogVol {
    name: String,
    solid: Solid,
    material: Material,
}

impl LogVol {
    /// Create a shared logical volume.
    pub fn new(name: impl Into<String>, solid: Solid, material: Material) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            solid,
            material,
        })
    }

    /// Name of the logical volume.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape.
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// Material.
    pub fn material(&self) -> &Material {
        &self.material
    }
}

/// Names the next logical child.
#[derive(Debug)]
pub struct NameTag {
    id: NodeId,
    name: String,
}

impl NameTag {
    /// Create a name tag.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::next(),
            name: name.into(),
        })
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Numbers the next logical child.
#[derive(Debug)]
pub struct IdentifierTag {
    id: NodeId,
    identifier: i64,
}

impl IdentifierTag {
    /// Create an identifier tag.
    pub fn new(identifier: i64) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::next(),
            identifier,
        })
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The identifier.
    pub fn identifier(&self) -> i64 {
        self.identifier
    }
}

/// Names every following logical child `base` + running position.
#[derive(Debug)]
pub struct SerialDenominator {
    id: NodeId,
    base_name: String,
}

impl SerialDenominator {
    /// Create a serial denominator.
    pub fn new(base_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::next(),
            base_name: base_name.into(),
        })
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Prefix of the generated names.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }
}

/// Numbers every following logical child `base` + running position.
#[derive(Debug)]
pub struct SerialIdentifier {
    id: NodeId,
    base_id: i64,
}

impl SerialIdentifier {
    /// Create a serial identifier.
    pub fn new(base_id: i64) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::next(),
            base_id,
        })
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// First identifier handed out.
    pub fn base_id(&self) -> i64 {
        self.base_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_unique_and_increasing() {
        let a = NameTag::new("a").id();
        let b = NameTag::new("b").id();
        assert!(b > a, "{b} should follow {a}");
    }

    #[test]
    fn trd_volume_reduces_to_box() {
        let trd = Solid::Trd {
            x_half_1: 1.0,
            x_half_2: 1.0,
            y_half_1: 2.0,
            y_half_2: 2.0,
            z_half: 3.0,
        };
        let bx = Solid::Box {
            x_half: 1.0,
            y_half: 2.0,
            z_half: 3.0,
        };
        assert!((trd.volume() - bx.volume()).abs() < 1e-12);
        assert_eq!(bx.kind(), "Box");
    }
}
