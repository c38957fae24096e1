// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while constructing surface shapes.

/// Failure to build a surface shape from its parameters.
///
/// Shapes validate eagerly: a shape that exists is always well formed, so
/// containment and area never fail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// A parameter violates the geometric invariants of the shape.
    #[error("invalid {shape} parameters: {reason}")]
    InvalidShapeParameters {
        /// Shape kind being constructed.
        shape: &'static str,
        /// Which invariant was violated.
        reason: &'static str,
    },
}

impl SurfaceError {
    pub(crate) const fn invalid(shape: &'static str, reason: &'static str) -> Self {
        Self::InvalidShapeParameters { shape, reason }
    }
}
