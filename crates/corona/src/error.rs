//! Error types for Corona operations.
//!
//! This module provides the main error type [`CoronaError`] which wraps the
//! error conditions that can occur while building a layout tree, validating
//! configuration and running layout passes.

use std::{io, ops::Range};

use thiserror::Error;

use corona_core::{geometry::GeometryError, model::ComponentKind};

use crate::layout::ItemId;

/// The main error type for Corona operations.
///
/// Every variant is raised by the call that introduces the invalid input;
/// a rejected mutation leaves the tree untouched.
///
/// # Diagnostic Variants
///
/// The `Input` variant keeps the offending source text and, when known, the
/// byte range of the error so front-ends can point at it.
#[derive(Debug, Error)]
pub enum CoronaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid input: {message}")]
    Input {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown item {0}")]
    UnknownItem(ItemId),

    #[error("Item {0} cannot have children")]
    NotAGroup(ItemId),

    #[error("Item of kind `{kind}` fits neither layer (inner `{inner}`, outer `{outer}`)")]
    UnroutableKind {
        kind: ComponentKind,
        inner: ComponentKind,
        outer: ComponentKind,
    },

    #[error("Both layers route the same kind `{0}`")]
    IdenticalLayers(ComponentKind),

    #[error("Layout error: {0}")]
    Layout(String),
}

impl CoronaError {
    /// Create a new `Input` error with the associated source text.
    pub fn new_input_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Input {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}
