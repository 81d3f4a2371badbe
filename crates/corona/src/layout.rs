//! Circular layout engine.
//!
//! The engine arranges a tree of sizeable items into nested sectors of an
//! annulus. Sizing flows bottom-up: every item reports the minimum and
//! preferred angular extent it needs for a given radial band. Placement
//! flows top-down: a layout pass hands the root a [`Placement`] and each
//! group splits its own descriptor among its children.
//!
//! # Overview
//!
//! - [`LayoutTree`] - Arena owning every item, driving invalidation and layout passes
//! - [`Item`] - The three item variants: leaf, single-ring group, dual-layer group
//! - [`RingAllocator`] - Splits an angular range among siblings sharing one band
//! - [`DualLayerAllocator`] - Splits a band into two concentric layers by item kind
//! - [`LeafGeometry`] - Concrete boxes a renderer draws for one leaf
//!
//! # Item lifecycle
//!
//! ```text
//!  Unplaced ──layout──► Placed ──mutation──► Dirty ──layout──► Placed
//! ```
//!
//! Items start dirty. Any local mutation (selection, child added or removed)
//! marks the item and all of its ancestors dirty; only a full pass started at
//! the root brings them back.
//!
//! [`Placement`]: corona_core::geometry::Placement

mod dual_layer;
mod item;
mod leaf;
mod ring;
mod tree;

pub use dual_layer::{DualLayerAllocator, Layer, LayerRouting};
pub use item::{DualLayerGroup, Item, ItemId, LeafContent, LeafItem, RingGroup, Sizeable};
pub use leaf::{BadgeGeometry, CounterGeometry, LeafGeometry};
pub use ring::{RingAllocator, allocate_extents, contiguous_ranges};
pub use tree::LayoutTree;

use serde::Serialize;

/// Minimum and preferred angular extent, in degrees, of an item or a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Extents {
    minimum: f64,
    preferred: f64,
}

impl Extents {
    /// Creates a new pair of extents.
    ///
    /// The preferred extent is raised to the minimum when it is smaller, so
    /// `minimum <= preferred` always holds.
    pub fn new(minimum: f64, preferred: f64) -> Self {
        Self {
            minimum,
            preferred: preferred.max(minimum),
        }
    }

    pub fn minimum(self) -> f64 {
        self.minimum
    }

    pub fn preferred(self) -> f64 {
        self.preferred
    }

    /// Extents of two items laid out side by side.
    pub fn sum(self, other: Extents) -> Self {
        Self {
            minimum: self.minimum + other.minimum,
            preferred: self.preferred + other.preferred,
        }
    }

    /// Extents of two items sharing the same angular window.
    pub fn max(self, other: Extents) -> Self {
        Self {
            minimum: self.minimum.max(other.minimum),
            preferred: self.preferred.max(other.preferred),
        }
    }
}
