// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::{self, Write};
use std::sync::Arc;

use bitflags::bitflags;

use crate::action::{ActionState, NodeAction};
use crate::serial::SerialTransformer;
use crate::surface::VirtualSurface;
use crate::transform::TransformNode;
use crate::trf;
use crate::types::{IdentifierTag, LogVol, NameTag, SerialDenominator, SerialIdentifier};
use crate::volume::{FullPhysVol, PhysVol};

bitflags! {
    /// Node kinds listed by [`PrintGraphAction`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PrintFlags: u8 {
        /// Fixed and alignable transforms.
        const TRANSFORMS          = 0b0000_0001;
        /// Physical volumes of both kinds.
        const VOLUMES             = 0b0000_0010;
        /// Name tags.
        const NAME_TAGS           = 0b0000_0100;
        /// Identifier tags.
        const IDENTIFIER_TAGS     = 0b0000_1000;
        /// Serial denominators.
        const SERIAL_DENOMINATORS = 0b0001_0000;
        /// Serial identifiers.
        const SERIAL_IDENTIFIERS  = 0b0010_0000;
        /// Serial transformers.
        const SERIAL_TRANSFORMERS = 0b0100_0000;
        /// Virtual surfaces.
        const SURFACES            = 0b1000_0000;
    }
}

impl Default for PrintFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Writes an indented listing of the graph below the volume it is executed on.
///
/// Each volume is indented by its depth and its other children one level
/// deeper. The first write error terminates the traversal and is reported by
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct PrintGraphAction<W> {
    state: ActionState,
    out: W,
    flags: PrintFlags,
    error: Option<fmt::Error>,
}

impl<W: Write> PrintGraphAction<W> {
    /// List every node kind into `out`.
    pub fn new(out: W) -> Self {
        Self::with_flags(out, PrintFlags::default())
    }

    /// List the node kinds in `flags` into `out`.
    pub fn with_flags(out: W, flags: PrintFlags) -> Self {
        Self {
            state: ActionState::new(),
            out,
            flags,
            error: None,
        }
    }

    /// Restrict the listing to volumes up to `depth`.
    pub fn with_depth_limit(mut self, depth: usize) -> Self {
        self.state.set_depth_limit(Some(depth));
        self
    }

    /// The writer, or the first error met while writing to it.
    pub fn finish(self) -> Result<W, fmt::Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn line(&mut self, kind: PrintFlags, indent: usize, args: fmt::Arguments<'_>) {
        if !self.flags.contains(kind) || self.error.is_some() {
            return;
        }
        let written = (0..indent)
            .try_for_each(|_| self.out.write_str("  "))
            .and_then(|()| self.out.write_fmt(args))
            .and_then(|()| self.out.write_char('\n'));
        if let Err(err) = written {
            self.error = Some(err);
            self.terminate();
        }
    }

    fn child_indent(&self) -> usize {
        self.state.path().len()
    }

    fn volume(&mut self, kind: &str, log_vol: &LogVol) {
        let indent = self.state.depth();
        self.line(
            PrintFlags::VOLUMES,
            indent,
            format_args!(
                "{kind} {} [{}, {}]",
                log_vol.name(),
                log_vol.solid().kind(),
                log_vol.material().name
            ),
        );
    }
}

impl<W: Write> NodeAction for PrintGraphAction<W> {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn handle_transform(&mut self, transform: &dyn TransformNode) {
        let t = trf::translation_of(&transform.default_transform());
        let kind = if transform.is_alignable() {
            "AlignableTransform"
        } else {
            "Transform"
        };
        let indent = self.child_indent();
        self.line(
            PrintFlags::TRANSFORMS,
            indent,
            format_args!("{kind} ({}, {}, {})", t.x, t.y, t.z),
        );
    }

    fn handle_phys_vol(&mut self, volume: &Arc<PhysVol>) {
        self.volume("PhysVol", volume.log_vol());
    }

    fn handle_full_phys_vol(&mut self, volume: &Arc<FullPhysVol>) {
        self.volume("FullPhysVol", volume.log_vol());
    }

    fn handle_name_tag(&mut self, tag: &NameTag) {
        let indent = self.child_indent();
        self.line(
            PrintFlags::NAME_TAGS,
            indent,
            format_args!("NameTag {:?}", tag.name()),
        );
    }

    fn handle_identifier_tag(&mut self, tag: &IdentifierTag) {
        let indent = self.child_indent();
        self.line(
            PrintFlags::IDENTIFIER_TAGS,
            indent,
            format_args!("IdentifierTag {}", tag.identifier()),
        );
    }

    fn handle_serial_denominator(&mut self, denominator: &SerialDenominator) {
        let indent = self.child_indent();
        self.line(
            PrintFlags::SERIAL_DENOMINATORS,
            indent,
            format_args!("SerialDenominator {:?}", denominator.base_name()),
        );
    }

    fn handle_serial_identifier(&mut self, identifier: &SerialIdentifier) {
        let indent = self.child_indent();
        self.line(
            PrintFlags::SERIAL_IDENTIFIERS,
            indent,
            format_args!("SerialIdentifier {}", identifier.base_id()),
        );
    }

    fn handle_serial_transformer(&mut self, transformer: &Arc<SerialTransformer>) {
        let indent = self.child_indent();
        let prototype = transformer.prototype().log_vol().name().to_owned();
        self.line(
            PrintFlags::SERIAL_TRANSFORMERS,
            indent,
            format_args!(
                "SerialTransformer {} x {prototype}",
                transformer.copy_count()
            ),
        );
    }

    fn handle_surface(&mut self, surface: &Arc<VirtualSurface>) {
        let indent = self.child_indent();
        self.line(
            PrintFlags::SURFACES,
            indent,
            format_args!("VirtualSurface {}", surface.shape().kind()),
        );
    }
}
