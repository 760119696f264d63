//! Core data model for tcxsync
//!
//! Two views of the same entities live side by side in a model:
//! - the "class" view: `ComponentClass` grouping `Component`s
//! - the "domain" view: `NamedDomain` grouping `Element`s
//!
//! Names are the identity key everywhere: class, domain, and element names
//! are unique within their enclosing collection. The remaining model
//! sections (`root_parts`, `collections`, `applications`, `includes`) are
//! opaque pass-through values the engine never interprets.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single component inside a component class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub description: String,
    /// Opaque feature-value mapping; defaults to an empty object
    #[serde(default = "empty_object")]
    pub feature_values: Value,
}

impl Component {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            feature_values: empty_object(),
        }
    }
}

/// A named group of components (the "class" view of the model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentClass {
    pub name: String,
    pub description: String,
    pub components: Vec<Component>,
}

/// An element inside a named domain
///
/// `index` is assigned by the class→domain transform as the 0-based position
/// of the source component; the reverse transform drops it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub index: usize,
    pub name: String,
    pub description: String,
}

/// A named group of elements (the "domain" view of the model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedDomain {
    pub name: String,
    pub elements: Vec<Element>,
}

/// Root aggregate read fresh from a `.tcx` document for every operation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub named_domains: Vec<NamedDomain>,
    pub component_classes: Vec<ComponentClass>,
    pub root_parts: Value,
    pub collections: Value,
    pub applications: Value,
    pub includes: Value,
}

/// A trusted, regenerable copy of a model's non-class sections
///
/// Persisted next to its source document as `<stem>_backup.json`. Component
/// classes are regenerable structure, not curated data, so `create` never
/// stores them; `component_classes` is only populated transiently while a
/// restore rebuilds a model from merged domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub named_domains: Vec<NamedDomain>,
    pub root_parts: Value,
    pub collections: Value,
    pub applications: Value,
    pub includes: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_classes: Option<Vec<ComponentClass>>,
}

impl Snapshot {
    /// Extract the non-class sections of a model
    pub fn from_model(model: &Model) -> Self {
        Self {
            named_domains: model.named_domains.clone(),
            root_parts: model.root_parts.clone(),
            collections: model.collections.clone(),
            applications: model.applications.clone(),
            includes: model.includes.clone(),
            component_classes: None,
        }
    }

    /// Rebuild a full model from this snapshot plus a class collection
    pub fn into_model(self, component_classes: Vec<ComponentClass>) -> Model {
        Model {
            named_domains: self.named_domains,
            component_classes,
            root_parts: self.root_parts,
            collections: self.collections,
            applications: self.applications,
            includes: self.includes,
        }
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
