//! Corona Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Corona radial
//! layout engine and its front-ends. It includes:
//!
//! - **Geometry**: Points, boxes and the polar ranges describing sectors ([`geometry`] module)
//! - **Model**: The component tree the engine lays out ([`model`] module)
//! - **Text**: Text styles and the text measurement seam ([`text`] module)

pub mod geometry;
pub mod model;
pub mod text;
