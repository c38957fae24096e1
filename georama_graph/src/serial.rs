// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Procedural placement of one volume many times.

use core::fmt;
use std::sync::Arc;

use crate::error::{GraphError, Result};
use crate::node::VolumeLink;
use crate::trf::Transform3D;
use crate::types::NodeId;

/// Maps a copy index to the transform of that copy.
///
/// Implementations must be pure: the same index always yields the same
/// transform. Traversals, cursors and random access all re-evaluate the
/// function and rely on agreeing results.
pub trait PlacementFunction: Send + Sync {
    /// Transform of copy `index`.
    fn evaluate(&self, index: usize) -> Transform3D;
}

impl<F> PlacementFunction for F
where
    F: Fn(usize) -> Transform3D + Send + Sync,
{
    fn evaluate(&self, index: usize) -> Transform3D {
        self(index)
    }
}

/// Places a prototype volume `count` times at `function(0..count)`.
///
/// The prototype is referenced, not docked: it keeps its own parent state and
/// may serve as the prototype of any number of serial transformers.
///
/// ```
/// use georama_graph::{FullPhysVol, LogVol, Material, SerialTransformer, Solid, trf};
///
/// let log = LogVol::new(
///     "Plate",
///     Solid::Box { x_half: 1.0, y_half: 1.0, z_half: 0.1 },
///     Material::new("Iron", 7.87),
/// );
/// let plate = FullPhysVol::new(log);
/// let stack = SerialTransformer::new(plate, |i: usize| trf::translate(0.0, 0.0, i as f64), 4);
/// assert_eq!(stack.copy_count(), 4);
/// assert!(stack.transform_at(4).is_err());
/// ```
pub struct SerialTransformer {
    id: NodeId,
    function: Box<dyn PlacementFunction>,
    prototype: VolumeLink,
    count: usize,
}

impl SerialTransformer {
    /// Create a serial transformer.
    pub fn new(
        prototype: impl Into<VolumeLink>,
        function: impl PlacementFunction + 'static,
        count: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::next(),
            function: Box::new(function),
            prototype: prototype.into(),
            count,
        })
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Number of copies.
    pub fn copy_count(&self) -> usize {
        self.count
    }

    /// The placed volume.
    pub fn prototype(&self) -> &VolumeLink {
        &self.prototype
    }

    /// Transform of copy `index`.
    pub fn transform_at(&self, index: usize) -> Result<Transform3D> {
        if index >= self.count {
            return Err(GraphError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        Ok(self.function.evaluate(index))
    }

    /// Transform of a copy already known to be in range.
    pub(crate) fn evaluate(&self, index: usize) -> Transform3D {
        debug_assert!(index < self.count, "copy {index} of {}", self.count);
        self.function.evaluate(index)
    }
}

impl fmt::Debug for SerialTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialTransformer")
            .field("id", &self.id)
            .field("prototype", &self.prototype.id())
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Placed;
    use crate::trf;
    use crate::types::{LogVol, Material, Solid};
    use crate::volume::FullPhysVol;

    fn plate() -> Arc<FullPhysVol> {
        FullPhysVol::new(LogVol::new(
            "Plate",
            Solid::Box {
                x_half: 1.0,
                y_half: 1.0,
                z_half: 0.1,
            },
            Material::new("Iron", 7.87),
        ))
    }

    #[test]
    fn transform_at_is_deterministic_and_bounded() {
        let st = SerialTransformer::new(plate(), |i: usize| trf::rotate_z(0.1 * i as f64), 3);
        for i in 0..3 {
            assert_eq!(st.transform_at(i).unwrap(), st.transform_at(i).unwrap());
        }
        assert_eq!(
            st.transform_at(3),
            Err(GraphError::IndexOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn empty_transformer_has_no_valid_index() {
        let st = SerialTransformer::new(plate(), |_: usize| trf::identity(), 0);
        assert!(st.transform_at(0).is_err(), "zero copies");
    }

    #[test]
    fn prototype_is_not_docked() {
        let proto = plate();
        let _a = SerialTransformer::new(proto.clone(), |_: usize| trf::identity(), 2);
        let _b = SerialTransformer::new(proto.clone(), |_: usize| trf::identity(), 5);
        assert!(!proto.is_shared(), "being a prototype twice is not a dock");
        assert!(proto.parent().is_none());
    }
}
