//! Sizeable items: the nodes the layout engine places.
//!
//! Every node implements [`Sizeable`]. The concrete variant is chosen through
//! the [`Item`] discriminant rather than by inspecting types at runtime.

use std::fmt;

use serde::Serialize;

use corona_core::{
    geometry::{GeometryError, Placement, RadialRange},
    model::{BadgeKind, Component},
};

use super::{
    Extents, LayoutTree,
    dual_layer::{DualLayerAllocator, LayerRouting},
    ring::RingAllocator,
};

/// Handle of an item inside a [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemId(usize);

impl ItemId {
    pub(super) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(super) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The contract shared by every placeable node.
pub trait Sizeable {
    /// Minimum and preferred angular extent the item needs inside `radial`.
    fn extents(&self, tree: &LayoutTree, radial: RadialRange) -> Extents;

    /// Splits `constraint` among the item's children.
    ///
    /// Returns one descriptor per child, in child order. Leaves return an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if an allocated range is not a valid sector.
    fn distribute(
        &self,
        tree: &LayoutTree,
        constraint: &Placement,
    ) -> Result<Vec<(ItemId, Placement)>, GeometryError>;

    /// Ordered child items.
    fn children(&self) -> &[ItemId];
}

/// Descriptive state of a leaf, read from the component it stands for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafContent {
    header: String,
    details: Vec<String>,
    execution_count: Option<u64>,
    badges: Vec<BadgeKind>,
}

impl LeafContent {
    /// Creates content showing only a header.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    /// Adds a detail line shown below the header outside minimum view.
    pub fn with_detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }

    /// Sets the execution counter shown next to the inner radius.
    pub fn with_execution_count(mut self, count: u64) -> Self {
        self.execution_count = Some(count);
        self
    }

    /// Adds a badge drawn along the trailing edge.
    pub fn with_badge(mut self, badge: BadgeKind) -> Self {
        self.badges.push(badge);
        self
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn execution_count(&self) -> Option<u64> {
        self.execution_count
    }

    pub fn badges(&self) -> &[BadgeKind] {
        &self.badges
    }
}

impl From<&Component> for LeafContent {
    fn from(component: &Component) -> Self {
        Self {
            header: component.label().to_string(),
            details: component
                .properties()
                .iter()
                .map(ToString::to_string)
                .collect(),
            execution_count: component.execution_count(),
            badges: component.badges().to_vec(),
        }
    }
}

/// A component drawn inside its own sector.
#[derive(Debug, Clone)]
pub struct LeafItem {
    content: LeafContent,
}

impl LeafItem {
    pub fn new(content: LeafContent) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &LeafContent {
        &self.content
    }
}

impl Sizeable for LeafItem {
    fn extents(&self, tree: &LayoutTree, radial: RadialRange) -> Extents {
        let metrics = tree.leaf_metrics();
        Extents::new(
            metrics.angular_extent(&self.content, radial, true),
            metrics.angular_extent(&self.content, radial, false),
        )
    }

    fn distribute(
        &self,
        _tree: &LayoutTree,
        _constraint: &Placement,
    ) -> Result<Vec<(ItemId, Placement)>, GeometryError> {
        Ok(Vec::new())
    }

    fn children(&self) -> &[ItemId] {
        &[]
    }
}

/// Siblings sharing one radial band, laid out side by side.
#[derive(Debug, Clone, Default)]
pub struct RingGroup {
    children: Vec<ItemId>,
}

impl Sizeable for RingGroup {
    fn extents(&self, tree: &LayoutTree, radial: RadialRange) -> Extents {
        RingAllocator.extents(tree, &self.children, radial)
    }

    fn distribute(
        &self,
        tree: &LayoutTree,
        constraint: &Placement,
    ) -> Result<Vec<(ItemId, Placement)>, GeometryError> {
        RingAllocator.distribute(tree, &self.children, constraint)
    }

    fn children(&self) -> &[ItemId] {
        &self.children
    }
}

/// Children split into two concentric layers by kind.
#[derive(Debug, Clone)]
pub struct DualLayerGroup {
    routing: LayerRouting,
    children: Vec<ItemId>,
}

impl DualLayerGroup {
    pub fn new(routing: LayerRouting) -> Self {
        Self {
            routing,
            children: Vec::new(),
        }
    }

    pub fn routing(&self) -> LayerRouting {
        self.routing
    }

    fn allocator(&self, tree: &LayoutTree) -> DualLayerAllocator {
        DualLayerAllocator::with_checked_ratio(self.routing, tree.config().split_ratio())
    }
}

impl Sizeable for DualLayerGroup {
    fn extents(&self, tree: &LayoutTree, radial: RadialRange) -> Extents {
        self.allocator(tree).extents(tree, &self.children, radial)
    }

    fn distribute(
        &self,
        tree: &LayoutTree,
        constraint: &Placement,
    ) -> Result<Vec<(ItemId, Placement)>, GeometryError> {
        self.allocator(tree).distribute(tree, &self.children, constraint)
    }

    fn children(&self) -> &[ItemId] {
        &self.children
    }
}

/// A node of the layout tree.
#[derive(Debug, Clone)]
pub enum Item {
    Leaf(LeafItem),
    Ring(RingGroup),
    DualLayer(DualLayerGroup),
}

impl Item {
    /// Returns true for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Mutable child list, or `None` for leaves.
    pub(super) fn children_mut(&mut self) -> Option<&mut Vec<ItemId>> {
        match self {
            Self::Leaf(_) => None,
            Self::Ring(group) => Some(&mut group.children),
            Self::DualLayer(group) => Some(&mut group.children),
        }
    }
}

impl Sizeable for Item {
    fn extents(&self, tree: &LayoutTree, radial: RadialRange) -> Extents {
        match self {
            Self::Leaf(leaf) => leaf.extents(tree, radial),
            Self::Ring(group) => group.extents(tree, radial),
            Self::DualLayer(group) => group.extents(tree, radial),
        }
    }

    fn distribute(
        &self,
        tree: &LayoutTree,
        constraint: &Placement,
    ) -> Result<Vec<(ItemId, Placement)>, GeometryError> {
        match self {
            Self::Leaf(leaf) => leaf.distribute(tree, constraint),
            Self::Ring(group) => group.distribute(tree, constraint),
            Self::DualLayer(group) => group.distribute(tree, constraint),
        }
    }

    fn children(&self) -> &[ItemId] {
        match self {
            Self::Leaf(leaf) => leaf.children(),
            Self::Ring(group) => group.children(),
            Self::DualLayer(group) => group.children(),
        }
    }
}

#[cfg(test)]
mod tests {
    use corona_core::model::{BadgeKind, Component, ComponentKind};

    use super::*;

    #[test]
    fn test_leaf_content_from_component() {
        let component = Component::new(ComponentKind::Sender, "HttpSender")
            .with_property("target", "http://localhost:8080")
            .with_property("method", "POST")
            .with_execution_count(7)
            .with_badge(BadgeKind::Remove);

        let content = LeafContent::from(&component);

        assert_eq!(content.header(), "HttpSender");
        assert_eq!(
            content.details(),
            &["target: http://localhost:8080", "method: POST"]
        );
        assert_eq!(content.execution_count(), Some(7));
        assert_eq!(content.badges(), &[BadgeKind::Remove]);
    }

    #[test]
    fn test_item_children_mut_only_for_groups() {
        let mut leaf = Item::Leaf(LeafItem::new(LeafContent::new("leaf")));
        let mut ring = Item::Ring(RingGroup::default());

        assert!(leaf.children_mut().is_none());
        assert!(ring.children_mut().is_some());
        assert!(leaf.is_leaf());
        assert!(!ring.is_leaf());
    }

    #[test]
    fn test_item_id_display() {
        assert_eq!(ItemId::new(3).to_string(), "#3");
    }
}
