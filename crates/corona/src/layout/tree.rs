//! Arena owning every item of a layout.
//!
//! Items refer to each other through [`ItemId`] handles. Each group owns the
//! ordered list of its children; a child keeps a back-reference to its parent
//! that is only used to walk invalidation upwards.

use std::{cell::OnceCell, fmt, rc::Rc};

use log::{debug, info, trace};

use corona_core::{
    geometry::{GeometryError, Placement, RadialRange},
    model::ComponentKind,
    text::{MonospaceMeasure, TextMeasure},
};

use super::{
    DualLayerGroup, Extents, Item, ItemId, LayerRouting, LeafContent, LeafItem, RingGroup,
    Sizeable,
    leaf::{LeafGeometry, LeafMetrics},
};
use crate::{
    CoronaError,
    config::{LayoutConfig, TextConfig},
};

#[derive(Debug)]
struct Node {
    kind: ComponentKind,
    item: Item,
    parent: Option<ItemId>,
    dirty: bool,
    selected: bool,
    removed: bool,
    placement: Option<Placement>,
    /// Derived from `placement`; reset whenever a new placement is assigned.
    geometry: OnceCell<LeafGeometry>,
}

impl Node {
    fn new(kind: ComponentKind, item: Item) -> Self {
        Self {
            kind,
            item,
            parent: None,
            dirty: true,
            selected: false,
            removed: false,
            placement: None,
            geometry: OnceCell::new(),
        }
    }
}

/// Owner of all items of one diagram.
///
/// Removed items stay in the arena as tombstones so their ids can be
/// rejected; storage therefore grows with every item ever added. A tree
/// edited for a long time should be rebuilt from its component tree, which
/// is what [`DiagramBuilder::build`](crate::DiagramBuilder::build) does.
///
/// # Examples
///
/// ```
/// # use corona::config::{LayoutConfig, TextConfig};
/// # use corona::layout::{LayoutTree, LeafContent};
/// # use corona_core::geometry::{AngularRange, Placement, Point, RadialRange};
/// # use corona_core::model::ComponentKind;
/// let mut tree = LayoutTree::new(LayoutConfig::default(), TextConfig::default()).unwrap();
/// let root = tree.add_ring(ComponentKind::Scenario);
/// let sender = tree.add_leaf(ComponentKind::Sender, LeafContent::new("HttpSender"));
/// tree.add_child(root, sender).unwrap();
///
/// let placement = Placement::new(
///     Point::new(400.0, 400.0),
///     AngularRange::full_circle(0.0),
///     RadialRange::new(80.0, 380.0).unwrap(),
/// );
/// assert!(tree.layout(root, placement).unwrap());
/// assert!(!tree.layout(root, placement).unwrap()); // nothing changed
/// assert!(tree.leaf_geometry(sender).unwrap().is_some());
/// ```
pub struct LayoutTree {
    nodes: Vec<Node>,
    layout: LayoutConfig,
    text: TextConfig,
    measure: Rc<dyn TextMeasure>,
}

impl fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutTree")
            .field("nodes", &self.nodes)
            .field("layout", &self.layout)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl LayoutTree {
    /// Creates an empty tree measuring text with [`MonospaceMeasure`].
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::Config`] if either configuration section is
    /// invalid, so layout passes never see a bad split ratio or size.
    pub fn new(layout: LayoutConfig, text: TextConfig) -> Result<Self, CoronaError> {
        layout.validate()?;
        text.validate()?;
        Ok(Self {
            nodes: Vec::new(),
            layout,
            text,
            measure: Rc::new(MonospaceMeasure::default()),
        })
    }

    /// Replaces the text measure (builder style).
    pub fn with_measure(mut self, measure: Rc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn text_config(&self) -> &TextConfig {
        &self.text
    }

    /// Number of items ever added, removed ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no item was ever added.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of items that were not removed.
    pub fn live_len(&self) -> usize {
        self.nodes.iter().filter(|node| !node.removed).count()
    }

    pub(super) fn leaf_metrics(&self) -> LeafMetrics<'_> {
        LeafMetrics::new(&self.layout, &self.text, self.measure.as_ref())
    }

    // Unchecked accessors for allocators, which only see ids of attached
    // live children.
    pub(super) fn item_kind(&self, id: ItemId) -> ComponentKind {
        self.nodes[id.index()].kind
    }

    pub(super) fn item_extents(&self, id: ItemId, radial: RadialRange) -> Extents {
        self.nodes[id.index()].item.extents(self, radial)
    }

    fn push(&mut self, kind: ComponentKind, item: Item) -> ItemId {
        let id = ItemId::new(self.nodes.len());
        self.nodes.push(Node::new(kind, item));
        trace!(item:% = id, kind:% = kind; "Added item");
        id
    }

    /// Adds a detached leaf.
    pub fn add_leaf(&mut self, kind: ComponentKind, content: LeafContent) -> ItemId {
        self.push(kind, Item::Leaf(LeafItem::new(content)))
    }

    /// Adds a detached single-ring group.
    pub fn add_ring(&mut self, kind: ComponentKind) -> ItemId {
        self.push(kind, Item::Ring(RingGroup::default()))
    }

    /// Adds a detached dual-layer group.
    pub fn add_dual_layer(&mut self, kind: ComponentKind, routing: LayerRouting) -> ItemId {
        self.push(kind, Item::DualLayer(DualLayerGroup::new(routing)))
    }

    fn node(&self, id: ItemId) -> Result<&Node, CoronaError> {
        self.nodes
            .get(id.index())
            .filter(|node| !node.removed)
            .ok_or(CoronaError::UnknownItem(id))
    }

    fn node_mut(&mut self, id: ItemId) -> Result<&mut Node, CoronaError> {
        self.nodes
            .get_mut(id.index())
            .filter(|node| !node.removed)
            .ok_or(CoronaError::UnknownItem(id))
    }

    /// Appends `child` to `parent`'s children.
    ///
    /// # Errors
    ///
    /// See [`insert_child`](Self::insert_child).
    pub fn add_child(&mut self, parent: ItemId, child: ItemId) -> Result<(), CoronaError> {
        let index = self.node(parent)?.item.children().len();
        self.insert_child(parent, index, child)
    }

    /// Inserts `child` at `index` among `parent`'s children.
    ///
    /// # Errors
    ///
    /// - [`CoronaError::UnknownItem`] if either id is unknown or removed.
    /// - [`CoronaError::NotAGroup`] if `parent` is a leaf.
    /// - [`CoronaError::UnroutableKind`] if `parent` is a dual-layer group and
    ///   the child's kind matches neither layer.
    /// - [`CoronaError::Layout`] if `child` already has a parent, the insertion
    ///   would create a cycle, or `index` is out of bounds.
    pub fn insert_child(
        &mut self,
        parent: ItemId,
        index: usize,
        child: ItemId,
    ) -> Result<(), CoronaError> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;

        if parent_node.item.is_leaf() {
            return Err(CoronaError::NotAGroup(parent));
        }
        if child_node.parent.is_some() {
            return Err(CoronaError::Layout(format!(
                "item {child} already has a parent"
            )));
        }
        if let Item::DualLayer(group) = &parent_node.item {
            let routing = group.routing();
            if routing.layer_of(child_node.kind).is_none() {
                return Err(CoronaError::UnroutableKind {
                    kind: child_node.kind,
                    inner: routing.inner(),
                    outer: routing.outer(),
                });
            }
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(CoronaError::Layout(format!(
                "adding item {child} to item {parent} would create a cycle"
            )));
        }
        let len = parent_node.item.children().len();
        if index > len {
            return Err(CoronaError::Layout(format!(
                "index {index} out of bounds for item {parent} with {len} children"
            )));
        }

        if let Some(children) = self.nodes[parent.index()].item.children_mut() {
            children.insert(index, child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.mark_dirty(parent);
        debug!(parent:% = parent, child:% = child, index; "Inserted child");
        Ok(())
    }

    /// Detaches `child` from `parent` and removes its whole subtree.
    ///
    /// Ids of removed items are never reused; using them afterwards yields
    /// [`CoronaError::UnknownItem`]. Returns `false` if `child` is not a
    /// child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is unknown or `parent` is a leaf.
    pub fn remove_child(&mut self, parent: ItemId, child: ItemId) -> Result<bool, CoronaError> {
        self.node(child)?;
        let Some(children) = self.node_mut(parent)?.item.children_mut() else {
            return Err(CoronaError::NotAGroup(parent));
        };
        let Some(position) = children.iter().position(|&id| id == child) else {
            return Ok(false);
        };
        children.remove(position);

        let mut pending = vec![child];
        let mut removed = 0usize;
        while let Some(id) = pending.pop() {
            let node = &mut self.nodes[id.index()];
            pending.extend_from_slice(node.item.children());
            node.removed = true;
            node.parent = None;
            node.placement = None;
            node.geometry = OnceCell::new();
            removed += 1;
        }

        self.mark_dirty(parent);
        debug!(parent:% = parent, child:% = child, removed; "Removed subtree");
        Ok(true)
    }

    /// Walks from `id` up to its root, `id` included.
    fn ancestors(&self, id: ItemId) -> impl Iterator<Item = ItemId> + '_ {
        std::iter::successors(Some(id), |id| self.nodes[id.index()].parent)
    }

    fn mark_dirty(&mut self, id: ItemId) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &mut self.nodes[id.index()];
            node.dirty = true;
            current = node.parent;
        }
    }

    /// Marks `id` and all of its ancestors dirty.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::UnknownItem`] for unknown or removed ids.
    pub fn invalidate(&mut self, id: ItemId) -> Result<(), CoronaError> {
        self.node(id)?;
        self.mark_dirty(id);
        Ok(())
    }

    /// Sets the selection flag, invalidating the item only when it changes.
    ///
    /// Returns whether the flag changed.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::UnknownItem`] for unknown or removed ids.
    pub fn set_selected(&mut self, id: ItemId, selected: bool) -> Result<bool, CoronaError> {
        let node = self.node_mut(id)?;
        if node.selected == selected {
            return Ok(false);
        }
        node.selected = selected;
        node.geometry = OnceCell::new();
        self.mark_dirty(id);
        Ok(true)
    }

    pub fn is_selected(&self, id: ItemId) -> Result<bool, CoronaError> {
        Ok(self.node(id)?.selected)
    }

    /// Whether the item needs a layout pass.
    pub fn is_dirty(&self, id: ItemId) -> Result<bool, CoronaError> {
        Ok(self.node(id)?.dirty)
    }

    pub fn kind(&self, id: ItemId) -> Result<ComponentKind, CoronaError> {
        Ok(self.node(id)?.kind)
    }

    pub fn item(&self, id: ItemId) -> Result<&Item, CoronaError> {
        Ok(&self.node(id)?.item)
    }

    pub fn parent(&self, id: ItemId) -> Result<Option<ItemId>, CoronaError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: ItemId) -> Result<&[ItemId], CoronaError> {
        Ok(self.node(id)?.item.children())
    }

    /// Minimum and preferred extent of `id` within the radial band of
    /// `constraint`.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::UnknownItem`] for unknown or removed ids.
    pub fn extents(&self, id: ItemId, constraint: &Placement) -> Result<Extents, CoronaError> {
        Ok(self.node(id)?.item.extents(self, constraint.radial()))
    }

    pub fn minimum_extent(&self, id: ItemId, constraint: &Placement) -> Result<f64, CoronaError> {
        Ok(self.extents(id, constraint)?.minimum())
    }

    pub fn preferred_extent(&self, id: ItemId, constraint: &Placement) -> Result<f64, CoronaError> {
        Ok(self.extents(id, constraint)?.preferred())
    }

    /// Runs a top-down layout pass from `root`.
    ///
    /// The pass only runs when the root is dirty or `placement` differs from
    /// the one assigned last time. Returns whether it ran.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is unknown, is attached to a parent, or an
    /// allocator produces an invalid sector. A failed pass leaves the root
    /// dirty.
    pub fn layout(&mut self, root: ItemId, placement: Placement) -> Result<bool, CoronaError> {
        let node = self.node(root)?;
        if node.parent.is_some() {
            return Err(CoronaError::Layout(format!(
                "layout must start at a root, item {root} has a parent"
            )));
        }
        if !node.dirty && node.placement == Some(placement) {
            debug!(root:% = root; "Layout up to date");
            return Ok(false);
        }

        info!(root:% = root; "Running layout pass");
        self.place(root, placement)?;
        Ok(true)
    }

    fn place(&mut self, id: ItemId, placement: Placement) -> Result<(), GeometryError> {
        trace!(item:% = id, placement:?; "Placing item");
        let plan = self.nodes[id.index()].item.distribute(self, &placement)?;

        let node = &mut self.nodes[id.index()];
        node.placement = Some(placement);
        node.geometry = OnceCell::new();

        for (child, child_placement) in plan {
            self.place(child, child_placement)?;
        }
        self.nodes[id.index()].dirty = false;
        Ok(())
    }

    /// Descriptor assigned to `id` by the last layout pass, if any.
    pub fn placement(&self, id: ItemId) -> Result<Option<Placement>, CoronaError> {
        Ok(self.node(id)?.placement)
    }

    /// Drawing geometry of a leaf, computed on first access after each pass.
    ///
    /// Returns `None` for groups and for leaves that were never placed. The
    /// geometry follows the last assigned placement; run
    /// [`layout`](Self::layout) first when the tree is dirty.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::UnknownItem`] for unknown or removed ids.
    pub fn leaf_geometry(&self, id: ItemId) -> Result<Option<&LeafGeometry>, CoronaError> {
        let node = self.node(id)?;
        let (Item::Leaf(leaf), Some(placement)) = (&node.item, node.placement) else {
            return Ok(None);
        };
        Ok(Some(node.geometry.get_or_init(|| {
            self.leaf_metrics()
                .geometry(leaf.content(), &placement, node.selected)
        })))
    }

    /// Leaves below `root` in depth-first, child order.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::UnknownItem`] for unknown or removed ids.
    pub fn leaves(&self, root: ItemId) -> Result<Vec<ItemId>, CoronaError> {
        self.node(root)?;
        let mut leaves = Vec::new();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let item = &self.nodes[id.index()].item;
            if item.is_leaf() {
                leaves.push(id);
            } else {
                pending.extend(item.children().iter().rev());
            }
        }
        Ok(leaves)
    }
}
