//! Corona - A circular layout engine for nested radial component diagrams.
//!
//! Every component of a tree occupies a sector of an annulus and its children
//! occupy sectors nested further outward. This crate sizes those sectors,
//! assigns them, and derives the boxes a renderer draws for every leaf.

pub mod config;
pub mod layout;

mod diagram;
mod error;

pub use corona_core::{geometry, model, text};

pub use diagram::{Frame, LeafFrame, RadialDiagram};
pub use error::CoronaError;

use std::{fmt, rc::Rc};

use log::{debug, info};

use corona_core::{
    model::Component,
    text::{MonospaceMeasure, TextMeasure},
};

use config::AppConfig;
use layout::{ItemId, LayerRouting, LayoutTree, LeafContent};

/// Builder turning component trees into radial diagrams.
///
/// # Examples
///
/// ```
/// use corona::{DiagramBuilder, config::AppConfig};
/// use corona::model::{Component, ComponentKind};
///
/// let scenario = Component::new(ComponentKind::Scenario, "http")
///     .with_child(Component::new(ComponentKind::Generator, "DefaultMessageGenerator"))
///     .with_child(Component::new(ComponentKind::Sender, "HttpSender"));
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let mut diagram = builder.build(&scenario).expect("Failed to build");
/// let frame = diagram.frame().expect("Failed to lay out");
/// assert_eq!(frame.leaves().len(), 2);
/// ```
pub struct DiagramBuilder {
    config: AppConfig,
    measure: Rc<dyn TextMeasure>,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl fmt::Debug for DiagramBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// Text is measured with [`MonospaceMeasure`] unless another measure is
    /// supplied through [`with_measure`](Self::with_measure).
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            measure: Rc::new(MonospaceMeasure::default()),
        }
    }

    /// Sets the text measure used to size and truncate labels.
    pub fn with_measure(mut self, measure: Rc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Wraps a component tree into sizeable items.
    ///
    /// - The root becomes a single-ring group of its children.
    /// - A childless component becomes a leaf.
    /// - A component with children becomes a dual-layer group: its own leaf
    ///   sits in the inner layer and its children in the outer layer, which
    ///   hosts the kind of the first child.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a component has the
    /// same kind as its first child, or children of one component have
    /// different kinds.
    pub fn build(&self, scenario: &Component) -> Result<RadialDiagram, CoronaError> {
        self.config.validate()?;

        info!(label = scenario.label(); "Building layout tree");
        let mut tree = LayoutTree::new(self.config.layout().clone(), self.config.text().clone())?
            .with_measure(Rc::clone(&self.measure));

        let root = tree.add_ring(scenario.kind());
        for child in scenario.children() {
            let id = add_component(&mut tree, child)?;
            tree.add_child(root, id)?;
        }
        debug!(leaves = tree.leaves(root)?.len(); "Layout tree built");

        let placement = self.config.root_placement()?;
        Ok(RadialDiagram::new(tree, root, placement))
    }
}

fn add_component(tree: &mut LayoutTree, component: &Component) -> Result<ItemId, CoronaError> {
    let kind = component.kind();
    let Some(first) = component.children().first() else {
        return Ok(tree.add_leaf(kind, LeafContent::from(component)));
    };

    let group = tree.add_dual_layer(kind, LayerRouting::new(kind, first.kind())?);
    let own = tree.add_leaf(kind, LeafContent::from(component));
    tree.add_child(group, own)?;
    for child in component.children() {
        let id = add_component(tree, child)?;
        tree.add_child(group, id)?;
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use corona_core::model::ComponentKind;

    use super::*;
    use crate::layout::Item;

    #[test]
    fn test_build_maps_children_to_items() {
        let scenario = Component::new(ComponentKind::Scenario, "http")
            .with_child(Component::new(ComponentKind::Sender, "HttpSender"))
            .with_child(
                Component::new(ComponentKind::Reporter, "ThroughputStatsReporter")
                    .with_child(Component::new(ComponentKind::Destination, "ConsoleDestination"))
                    .with_child(Component::new(ComponentKind::Destination, "CsvDestination")),
            );

        let diagram = DiagramBuilder::default().build(&scenario).unwrap();
        let tree = diagram.tree();
        let children = tree.children(diagram.root()).unwrap();
        assert_eq!(children.len(), 2);
        assert!(matches!(tree.item(children[0]).unwrap(), Item::Leaf(_)));

        let Item::DualLayer(group) = tree.item(children[1]).unwrap() else {
            panic!("expected a dual-layer group");
        };
        assert_eq!(group.routing().inner(), ComponentKind::Reporter);
        assert_eq!(group.routing().outer(), ComponentKind::Destination);
        // own leaf plus two destinations
        assert_eq!(tree.children(children[1]).unwrap().len(), 3);
    }

    #[test]
    fn test_build_rejects_mixed_child_kinds() {
        let scenario = Component::new(ComponentKind::Scenario, "http").with_child(
            Component::new(ComponentKind::Reporter, "Reporter")
                .with_child(Component::new(ComponentKind::Destination, "Console"))
                .with_child(Component::new(ComponentKind::Validator, "Regex")),
        );
        assert!(matches!(
            DiagramBuilder::default().build(&scenario),
            Err(CoronaError::UnroutableKind {
                kind: ComponentKind::Validator,
                ..
            })
        ));
    }

    #[test]
    fn test_build_rejects_child_of_same_kind() {
        let scenario = Component::new(ComponentKind::Scenario, "nested").with_child(
            Component::new(ComponentKind::Sequence, "outer")
                .with_child(Component::new(ComponentKind::Sequence, "inner")),
        );
        assert!(matches!(
            DiagramBuilder::default().build(&scenario),
            Err(CoronaError::IdenticalLayers(ComponentKind::Sequence))
        ));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "layout": { "split_ratio": 1.5 } }"#).unwrap();
        let scenario = Component::new(ComponentKind::Scenario, "empty");
        assert!(matches!(
            DiagramBuilder::new(config).build(&scenario),
            Err(CoronaError::Config(_))
        ));
    }
}
