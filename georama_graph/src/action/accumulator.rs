// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forward accumulation of transforms and tags over a child sequence.
//!
//! Walking a parent's children in order, transforms compose left to right
//! into the pending transform of the next logical child, which gives the same
//! product as the backward scan of [`Placed::local_transform`](crate::Placed).
//! Only volumes and serial transformers use the transforms up; a surface sees
//! them and leaves them for the siblings after it.
//!
//! Name tags and identifier tags apply to the next logical step only; a serial
//! transformer is one step for this purpose, so all of its copies share them.
//! Serial denominators and identifiers stay in effect until replaced, numbering
//! each logical child from the logical index at which they were met.

use crate::store::AlignmentStore;
use crate::transform::TransformNode;
use crate::trf::{self, Transform3D};
use crate::types::{IdentifierTag, NameTag, SerialDenominator, SerialIdentifier};

/// Transforms taken from the accumulator for one logical step.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Pending {
    pub(crate) transform: Transform3D,
    pub(crate) default_transform: Transform3D,
    pub(crate) has_alignable: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Accumulator {
    pending: Pending,
    name_tag: Option<String>,
    id_tag: Option<i64>,
    serial_denominator: Option<(String, usize)>,
    serial_identifier: Option<(i64, usize)>,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            pending: Pending {
                transform: trf::identity(),
                default_transform: trf::identity(),
                has_alignable: false,
            },
            name_tag: None,
            id_tag: None,
            serial_denominator: None,
            serial_identifier: None,
        }
    }
}

impl Accumulator {
    pub(crate) fn push_transform(
        &mut self,
        xf: &dyn TransformNode,
        store: Option<&AlignmentStore>,
    ) {
        self.pending.transform = self.pending.transform * xf.transform(store);
        self.pending.default_transform = self.pending.default_transform * xf.default_transform();
        self.pending.has_alignable |= xf.is_alignable();
    }

    /// Pending transforms, left in place for later siblings.
    pub(crate) fn pending(&self) -> Pending {
        self.pending
    }

    /// Pending transforms, leaving identity behind.
    pub(crate) fn take_transforms(&mut self) -> Pending {
        let pending = self.pending;
        self.clear_transforms();
        pending
    }

    pub(crate) fn clear_transforms(&mut self) {
        self.pending = Pending {
            transform: trf::identity(),
            default_transform: trf::identity(),
            has_alignable: false,
        };
    }

    pub(crate) fn set_name_tag(&mut self, tag: &NameTag) {
        self.name_tag = Some(tag.name().to_owned());
        self.serial_denominator = None;
    }

    pub(crate) fn set_identifier_tag(&mut self, tag: &IdentifierTag) {
        self.id_tag = Some(tag.identifier());
        self.serial_identifier = None;
    }

    pub(crate) fn set_serial_denominator(&mut self, denominator: &SerialDenominator, position: usize) {
        self.serial_denominator = Some((denominator.base_name().to_owned(), position));
    }

    pub(crate) fn set_serial_identifier(&mut self, identifier: &SerialIdentifier, position: usize) {
        self.serial_identifier = Some((identifier.base_id(), position));
    }

    /// Name of logical child `index`, if any tag names it.
    pub(crate) fn name(&self, index: usize) -> Option<String> {
        if let Some(name) = &self.name_tag {
            return Some(name.clone());
        }
        self.serial_denominator
            .as_ref()
            .map(|(base, position)| format!("{base}{}", index.saturating_sub(*position)))
    }

    /// Identifier of logical child `index`, if any tag numbers it.
    pub(crate) fn id(&self, index: usize) -> Option<i64> {
        if self.id_tag.is_some() {
            return self.id_tag;
        }
        self.serial_identifier.map(|(base, position)| {
            let offset = i64::try_from(index.saturating_sub(position)).unwrap_or(i64::MAX);
            base.saturating_add(offset)
        })
    }

    /// Forget the single-use tags once a logical step is complete.
    pub(crate) fn end_step(&mut self) {
        self.name_tag = None;
        self.id_tag = None;
    }
}
