// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The explicit local-to-world transform stack used during traversal.

use alloc::vec::Vec;
use kurbo::Affine;

/// A stack of composed world matrices.
///
/// Entering a scene node pushes its local transform composed onto the current
/// top; leaving the node pops it. The top of the stack is always the world
/// matrix of the node currently being visited, starting from identity at the
/// root. This makes the traversal the single owner of transform state; the
/// drawing surface never has to be interrogated for it.
#[derive(Clone, Debug)]
pub struct TransformStack {
    frames: Vec<Affine>,
}

impl TransformStack {
    /// A stack whose base is the identity matrix.
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
        }
    }

    /// The current composed world matrix.
    pub fn current(&self) -> Affine {
        self.frames.last().copied().unwrap_or(Affine::IDENTITY)
    }

    /// Compose `local` onto the current matrix and push the result.
    ///
    /// Returns the new world matrix for convenience.
    pub fn push(&mut self, local: Affine) -> Affine {
        let world = self.current() * local;
        self.frames.push(world);
        world
    }

    /// Pop the most recently pushed frame.
    ///
    /// Popping an empty stack is a no-op; the base identity is never removed.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Number of pushed frames (zero at the root).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
