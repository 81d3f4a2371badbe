//! Component tree consumed by the layout engine.
//!
//! The engine reads this tree and never mutates it. Each [`Component`] has a
//! kind, a label, a list of key/value properties shown under the label, an
//! optional execution counter and the badges a renderer draws along its
//! sector edge. Children are ordered; their order decides angular placement.
//!
//! Trees deserialize from any serde format:
//!
//! ```
//! # use corona_core::model::{Component, ComponentKind};
//! let json = r#"{
//!     "kind": "scenario",
//!     "label": "http",
//!     "children": [
//!         { "kind": "generator", "label": "DefaultMessageGenerator" },
//!         { "kind": "sender", "label": "HttpSender",
//!           "properties": [{ "key": "target", "value": "http://localhost" }] }
//!     ]
//! }"#;
//! # let scenario: Component = serde_json::from_str(json).unwrap();
//! # assert_eq!(scenario.children().len(), 2);
//! # assert_eq!(scenario.children()[1].kind(), ComponentKind::Sender);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a component in a performance-test scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Scenario,
    Generator,
    Sender,
    Receiver,
    Correlator,
    Reporter,
    Destination,
    Validator,
    Message,
    Sequence,
}

impl ComponentKind {
    /// Returns a human-readable name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Scenario => "scenario",
            Self::Generator => "generator",
            Self::Sender => "sender",
            Self::Receiver => "receiver",
            Self::Correlator => "correlator",
            Self::Reporter => "reporter",
            Self::Destination => "destination",
            Self::Validator => "validator",
            Self::Message => "message",
            Self::Sequence => "sequence",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Control drawn as a small badge on a component's sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Add,
    Remove,
    Toggle,
}

/// A key/value pair displayed below a component's label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    key: String,
    value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// A node of the component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    kind: ComponentKind,
    label: String,
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(default)]
    execution_count: Option<u64>,
    #[serde(default)]
    badges: Vec<BadgeKind>,
    #[serde(default)]
    children: Vec<Component>,
}

impl Component {
    /// Creates a component without properties, badges or children.
    pub fn new(kind: ComponentKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            properties: Vec::new(),
            execution_count: None,
            badges: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds a property (builder style).
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property::new(key, value));
        self
    }

    /// Sets the execution counter (builder style).
    pub fn with_execution_count(mut self, count: u64) -> Self {
        self.execution_count = Some(count);
        self
    }

    /// Adds a badge (builder style).
    pub fn with_badge(mut self, badge: BadgeKind) -> Self {
        self.badges.push(badge);
        self
    }

    /// Appends a child (builder style).
    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn execution_count(&self) -> Option<u64> {
        self.execution_count
    }

    pub fn badges(&self) -> &[BadgeKind] {
        &self.badges
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let reporter = Component::new(ComponentKind::Reporter, "ThroughputStatsReporter")
            .with_property("minimumEnabled", "false")
            .with_execution_count(42)
            .with_badge(BadgeKind::Add)
            .with_child(Component::new(ComponentKind::Destination, "ConsoleDestination"));

        assert_eq!(reporter.kind(), ComponentKind::Reporter);
        assert_eq!(reporter.properties().len(), 1);
        assert_eq!(reporter.properties()[0].to_string(), "minimumEnabled: false");
        assert_eq!(reporter.execution_count(), Some(42));
        assert_eq!(reporter.badges(), &[BadgeKind::Add]);
        assert_eq!(reporter.children()[0].label(), "ConsoleDestination");
    }

    #[test]
    fn test_deserialize_defaults_optional_fields() {
        let component: Component =
            serde_json::from_str(r#"{ "kind": "receiver", "label": "HttpReceiver" }"#).unwrap();

        assert_eq!(component.kind(), ComponentKind::Receiver);
        assert!(component.properties().is_empty());
        assert!(component.badges().is_empty());
        assert!(component.children().is_empty());
        assert_eq!(component.execution_count(), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ComponentKind::Destination.to_string(), "destination");
        assert_eq!(ComponentKind::Scenario.name(), "scenario");
    }
}
