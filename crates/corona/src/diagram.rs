//! A built diagram and the frames it produces for a renderer.

use log::{debug, info};
use serde::Serialize;

use corona_core::{
    geometry::{Placement, Point, RadialRange},
    model::ComponentKind,
};

use crate::{
    CoronaError,
    layout::{Extents, ItemId, LayoutTree, LeafGeometry},
};

/// A layout tree together with the descriptor its root is placed at.
#[derive(Debug)]
pub struct RadialDiagram {
    tree: LayoutTree,
    root: ItemId,
    placement: Placement,
}

impl RadialDiagram {
    pub(crate) fn new(tree: LayoutTree, root: ItemId, placement: Placement) -> Self {
        Self {
            tree,
            root,
            placement,
        }
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// Mutable access for selection changes and structural edits.
    pub fn tree_mut(&mut self) -> &mut LayoutTree {
        &mut self.tree
    }

    pub fn root(&self) -> ItemId {
        self.root
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Moves or resizes the whole diagram. Takes effect on the next frame.
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    /// Produces the geometry of every leaf, running a layout pass first
    /// when the tree is stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout pass fails.
    pub fn frame(&mut self) -> Result<Frame, CoronaError> {
        if self.tree.layout(self.root, self.placement)? {
            info!("Layout pass executed");
        }

        let extents = self.tree.extents(self.root, &self.placement)?;
        let mut leaves = Vec::new();
        for id in self.tree.leaves(self.root)? {
            let (Some(placement), Some(geometry)) =
                (self.tree.placement(id)?, self.tree.leaf_geometry(id)?)
            else {
                continue;
            };
            leaves.push(LeafFrame {
                id,
                kind: self.tree.kind(id)?,
                placement,
                geometry: geometry.clone(),
            });
        }
        debug!(leaves = leaves.len(); "Frame collected");

        Ok(Frame {
            center: self.placement.center(),
            radial: self.placement.radial(),
            extents,
            leaves,
        })
    }
}

/// Everything a renderer needs to draw one leaf.
#[derive(Debug, Clone, Serialize)]
pub struct LeafFrame {
    id: ItemId,
    kind: ComponentKind,
    placement: Placement,
    geometry: LeafGeometry,
}

impl LeafFrame {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn geometry(&self) -> &LeafGeometry {
        &self.geometry
    }
}

/// Snapshot of a laid out diagram.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    center: Point,
    radial: RadialRange,
    extents: Extents,
    leaves: Vec<LeafFrame>,
}

impl Frame {
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radial(&self) -> RadialRange {
        self.radial
    }

    /// Minimum and preferred extent of the whole diagram. When the preferred
    /// extent exceeds the root's angular range, some leaves fall back to
    /// minimum view.
    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// Leaves in depth-first child order.
    pub fn leaves(&self) -> &[LeafFrame] {
        &self.leaves
    }
}
