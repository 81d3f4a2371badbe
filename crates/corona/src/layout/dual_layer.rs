//! Dual-layer radial allocation.
//!
//! A dual-layer group splits its radial band into two concentric layers and
//! routes every child into one of them by kind. Both layers span the same
//! angular window at the same time, so the group needs as much angle as its
//! hungrier layer, not the sum of both.

use log::debug;

use corona_core::{
    geometry::{GeometryError, Placement, RadialRange},
    model::ComponentKind,
};

use super::{Extents, ItemId, LayoutTree, ring::RingAllocator};
use crate::{CoronaError, config::validate_split_ratio};

/// One of the two concentric bands of a dual-layer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Inner,
    Outer,
}

/// Static mapping from component kind to layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerRouting {
    inner: ComponentKind,
    outer: ComponentKind,
}

impl LayerRouting {
    /// Routes `inner` items to the inner layer and `outer` items to the outer one.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::IdenticalLayers`] when both kinds are the same.
    pub fn new(inner: ComponentKind, outer: ComponentKind) -> Result<Self, CoronaError> {
        if inner == outer {
            return Err(CoronaError::IdenticalLayers(inner));
        }
        Ok(Self { inner, outer })
    }

    pub fn inner(self) -> ComponentKind {
        self.inner
    }

    pub fn outer(self) -> ComponentKind {
        self.outer
    }

    /// Layer hosting items of `kind`, if any.
    pub fn layer_of(self, kind: ComponentKind) -> Option<Layer> {
        if kind == self.inner {
            Some(Layer::Inner)
        } else if kind == self.outer {
            Some(Layer::Outer)
        } else {
            None
        }
    }
}

/// Allocator delegating each layer to its own [`RingAllocator`].
#[derive(Debug, Clone, Copy)]
pub struct DualLayerAllocator {
    routing: LayerRouting,
    split_ratio: f64,
}

impl DualLayerAllocator {
    /// Creates an allocator giving `split_ratio` of the band to the inner layer.
    ///
    /// # Errors
    ///
    /// Returns [`CoronaError::Config`] unless `split_ratio` lies strictly
    /// between 0 and 1.
    pub fn new(routing: LayerRouting, split_ratio: f64) -> Result<Self, CoronaError> {
        validate_split_ratio(split_ratio)?;
        Ok(Self::with_checked_ratio(routing, split_ratio))
    }

    /// For ratios already checked as part of a [`LayoutConfig`](crate::config::LayoutConfig).
    pub(super) fn with_checked_ratio(routing: LayerRouting, split_ratio: f64) -> Self {
        Self {
            routing,
            split_ratio,
        }
    }

    pub fn routing(&self) -> LayerRouting {
        self.routing
    }

    pub fn split_ratio(&self) -> f64 {
        self.split_ratio
    }

    /// Splits `children` into the inner and outer layer, keeping their order.
    pub fn partition(&self, tree: &LayoutTree, children: &[ItemId]) -> (Vec<ItemId>, Vec<ItemId>) {
        let mut inner = Vec::new();
        let mut outer = Vec::new();
        for &child in children {
            match self.routing.layer_of(tree.item_kind(child)) {
                Some(Layer::Inner) => inner.push(child),
                Some(Layer::Outer) => outer.push(child),
                None => {}
            }
        }
        (inner, outer)
    }

    /// Radial bands of the inner and outer layer.
    ///
    /// When only one layer has children it gets the whole band; the empty
    /// layer's band is then [`RadialRange::unset`].
    pub fn bands(
        &self,
        radial: RadialRange,
        inner: &[ItemId],
        outer: &[ItemId],
    ) -> (RadialRange, RadialRange) {
        match (inner.is_empty(), outer.is_empty()) {
            (false, false) => radial.split(self.split_ratio),
            (false, true) => (radial, RadialRange::unset()),
            (true, false) => (RadialRange::unset(), radial),
            (true, true) => (RadialRange::unset(), RadialRange::unset()),
        }
    }

    /// Extents of the group: the maximum over the non-empty layers.
    pub fn extents(&self, tree: &LayoutTree, children: &[ItemId], radial: RadialRange) -> Extents {
        let (inner, outer) = self.partition(tree, children);
        let (inner_band, outer_band) = self.bands(radial, &inner, &outer);

        let layers = [(inner, inner_band), (outer, outer_band)];
        layers
            .iter()
            .filter(|(items, _)| !items.is_empty())
            .map(|(items, band)| RingAllocator.extents(tree, items, *band))
            .fold(Extents::default(), Extents::max)
    }

    pub fn minimum_extent(&self, tree: &LayoutTree, children: &[ItemId], radial: RadialRange) -> f64 {
        self.extents(tree, children, radial).minimum()
    }

    pub fn preferred_extent(
        &self,
        tree: &LayoutTree,
        children: &[ItemId],
        radial: RadialRange,
    ) -> f64 {
        self.extents(tree, children, radial).preferred()
    }

    /// Distributes `constraint` over both layers.
    ///
    /// The split radius is derived from `constraint` itself, so a band that
    /// shrank since the last extent query is split correctly. The returned
    /// list holds the inner layer first, then the outer layer.
    ///
    /// # Errors
    ///
    /// Returns an error if a ring allocation produces an invalid sector.
    pub fn distribute(
        &self,
        tree: &LayoutTree,
        children: &[ItemId],
        constraint: &Placement,
    ) -> Result<Vec<(ItemId, Placement)>, GeometryError> {
        let (inner, outer) = self.partition(tree, children);
        let (inner_band, outer_band) = self.bands(constraint.radial(), &inner, &outer);

        debug!(
            inner_items = inner.len(),
            outer_items = outer.len(),
            split = inner_band.outer();
            "Distributing dual layer"
        );

        let mut plan =
            RingAllocator.distribute(tree, &inner, &constraint.with_radial(inner_band))?;
        plan.extend(RingAllocator.distribute(tree, &outer, &constraint.with_radial(outer_band))?);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_routing_rejects_identical_kinds() {
        let err = LayerRouting::new(ComponentKind::Sender, ComponentKind::Sender).unwrap_err();
        assert!(matches!(err, CoronaError::IdenticalLayers(ComponentKind::Sender)));
    }

    #[test]
    fn test_routing_layer_of() {
        let routing = LayerRouting::new(ComponentKind::Reporter, ComponentKind::Destination).unwrap();
        assert_eq!(routing.layer_of(ComponentKind::Reporter), Some(Layer::Inner));
        assert_eq!(routing.layer_of(ComponentKind::Destination), Some(Layer::Outer));
        assert_eq!(routing.layer_of(ComponentKind::Sender), None);
    }

    #[test]
    fn test_allocator_rejects_ratio_outside_unit_interval() {
        let routing = LayerRouting::new(ComponentKind::Reporter, ComponentKind::Destination).unwrap();
        for ratio in [1.5, 1.0, 0.0, -0.2, f64::NAN] {
            assert!(
                matches!(
                    DualLayerAllocator::new(routing, ratio),
                    Err(CoronaError::Config(_))
                ),
                "ratio {ratio}"
            );
        }
    }

    #[test]
    fn test_bands_split_at_ratio() {
        let routing = LayerRouting::new(ComponentKind::Reporter, ComponentKind::Destination).unwrap();
        let allocator = DualLayerAllocator::new(routing, 0.55).unwrap();
        let radial = RadialRange::new(100.0, 300.0).unwrap();
        let item = [ItemId::new(0)];

        let (inner, outer) = allocator.bands(radial, &item, &item);
        assert_approx_eq!(f64, inner.inner(), 100.0);
        assert_approx_eq!(f64, inner.outer(), 210.0, epsilon = 1e-9);
        assert_approx_eq!(f64, outer.inner(), 210.0, epsilon = 1e-9);
        assert_approx_eq!(f64, outer.outer(), 300.0);
    }

    #[test]
    fn test_bands_single_layer_gets_full_band() {
        let routing = LayerRouting::new(ComponentKind::Reporter, ComponentKind::Destination).unwrap();
        let allocator = DualLayerAllocator::new(routing, 0.55).unwrap();
        let radial = RadialRange::new(100.0, 300.0).unwrap();
        let item = [ItemId::new(0)];

        let (inner, outer) = allocator.bands(radial, &[], &item);
        assert!(inner.is_unset());
        assert_eq!(outer, radial);

        let (inner, outer) = allocator.bands(radial, &item, &[]);
        assert_eq!(inner, radial);
        assert!(outer.is_unset());
    }
}
