//! Codec boundary for `.tcx` structured documents
//!
//! A `.tcx` document is a compact tree: leaf values are wrapped as
//! `{ "text": value }`, and a section holding a single entry may carry the
//! entry directly instead of a one-element array. The root key `model-data`
//! holds an `identification` block (free-text editor fingerprints) and the
//! `model` with its six sections.
//!
//! Decoding normalizes the wire shape into the plain types of
//! [`crate::model`]; encoding always builds a fresh template value, so no
//! document state leaks between operations.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TcxError, TcxResult};
use crate::model::{Component, ComponentClass, Element, Model, NamedDomain};

/// Fingerprint this tool writes into `created-by` / `edited-with`
pub const OWN_FINGERPRINT: &str = concat!("TCX Sync ", env!("CARGO_PKG_VERSION"));

/// Document format version written into `identification.xml-version`
const XML_VERSION: &str = "4.11";

/// Editor identity resolved once from the `edited-with` fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFingerprint {
    /// The structured editor this system trusts (or tcxsync itself)
    Trusted,
    /// A spreadsheet-family tool that does not understand domain structure
    Untrusted(UntrustedKind),
    /// Anything else; such edits are left alone
    Unknown,
}

/// Recognized untrusted editor families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UntrustedKind {
    Excel,
    Calc,
    Sheets,
}

impl std::fmt::Display for UntrustedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UntrustedKind::Excel => write!(f, "Excel"),
            UntrustedKind::Calc => write!(f, "Calc"),
            UntrustedKind::Sheets => write!(f, "Sheets"),
        }
    }
}

impl EditorFingerprint {
    /// Classify a free-text `edited-with` fingerprint
    pub fn classify(fingerprint: &str) -> Self {
        let fp = fingerprint.to_lowercase();
        if fp.contains("tcx sync") || fp.contains("tcx studio") {
            EditorFingerprint::Trusted
        } else if fp.contains("excel") {
            EditorFingerprint::Untrusted(UntrustedKind::Excel)
        } else if fp.contains("calc") {
            EditorFingerprint::Untrusted(UntrustedKind::Calc)
        } else if fp.contains("sheets") {
            EditorFingerprint::Untrusted(UntrustedKind::Sheets)
        } else {
            EditorFingerprint::Unknown
        }
    }
}

/// A decoded document: identification metadata plus the model
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub created_by: String,
    pub edited_with: String,
    pub model: Model,
}

impl Document {
    /// Resolve the editor fingerprint of the last writer
    pub fn fingerprint(&self) -> EditorFingerprint {
        EditorFingerprint::classify(&self.edited_with)
    }
}

/// Decode document text into a [`Document`]
///
/// `path` is used for error context only.
pub fn decode(path: &Path, text: &str) -> TcxResult<Document> {
    let wire: WireRoot = serde_json::from_str(text).map_err(|e| TcxError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let data = wire.model_data;
    let model = Model {
        named_domains: data
            .model
            .named_domains
            .named_domain
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|d| d.into_domain(path))
            .collect::<TcxResult<_>>()?,
        component_classes: data
            .model
            .component_classes
            .component_class
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.into_class(path))
            .collect::<TcxResult<_>>()?,
        root_parts: data.model.root_parts,
        collections: data.model.collections,
        applications: data.model.applications,
        includes: data.model.includes,
    };

    Ok(Document {
        created_by: data.identification.created_by.map(|t| t.text).unwrap_or_default(),
        edited_with: data.identification.edited_with.map(|t| t.text).unwrap_or_default(),
        model,
    })
}

/// Encode a model into document text
///
/// Builds a fresh identification block stamped with this tool's own
/// fingerprint and the current time.
pub fn encode(model: &Model) -> TcxResult<String> {
    let wire = WireRoot {
        model_data: WireModelData {
            identification: WireIdentification {
                created_by: Some(Text::new(OWN_FINGERPRINT)),
                edited_with: Some(Text::new(OWN_FINGERPRINT)),
                date: Some(Text::new(chrono::Local::now().to_rfc2822())),
                xml_version: Some(Text::new(XML_VERSION)),
            },
            model: WireModel {
                named_domains: WireDomainsSection {
                    named_domain: non_empty(
                        model.named_domains.iter().map(WireDomain::from_domain).collect(),
                    ),
                },
                component_classes: WireClassesSection {
                    component_class: non_empty(
                        model.component_classes.iter().map(WireClass::from_class).collect(),
                    ),
                },
                root_parts: model.root_parts.clone(),
                collections: model.collections.clone(),
                applications: model.applications.clone(),
                includes: model.includes.clone(),
            },
        },
    };

    serde_json::to_string_pretty(&wire).map_err(|e| TcxError::Parse {
        path: Path::new("<encode>").to_path_buf(),
        message: e.to_string(),
    })
}

fn non_empty<T>(items: Vec<T>) -> Option<OneOrMany<T>> {
    if items.is_empty() {
        None
    } else {
        Some(OneOrMany::Many(items))
    }
}

// === Wire types ===

/// A compact-shape leaf value: `{ "text": value }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Text<T = String> {
    text: T,
}

impl Text<String> {
    fn new(value: impl Into<String>) -> Self {
        Self { text: value.into() }
    }
}

/// One entry or a list of entries; single entries are normalized to lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(Box<T>),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![*item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireRoot {
    #[serde(rename = "model-data")]
    model_data: WireModelData,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireModelData {
    #[serde(default)]
    identification: WireIdentification,
    model: WireModel,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireIdentification {
    #[serde(rename = "created-by", default, skip_serializing_if = "Option::is_none")]
    created_by: Option<Text>,
    #[serde(rename = "edited-with", default, skip_serializing_if = "Option::is_none")]
    edited_with: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<Text>,
    #[serde(rename = "xml-version", default, skip_serializing_if = "Option::is_none")]
    xml_version: Option<Text>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireModel {
    #[serde(rename = "named-domains", default)]
    named_domains: WireDomainsSection,
    #[serde(rename = "component-classes", default)]
    component_classes: WireClassesSection,
    #[serde(rename = "root-parts", default = "empty_object")]
    root_parts: Value,
    #[serde(default = "empty_object")]
    collections: Value,
    #[serde(default = "empty_object")]
    applications: Value,
    #[serde(default = "empty_object")]
    includes: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireDomainsSection {
    #[serde(rename = "named-domain", default, skip_serializing_if = "Option::is_none")]
    named_domain: Option<OneOrMany<WireDomain>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireClassesSection {
    #[serde(rename = "component-class", default, skip_serializing_if = "Option::is_none")]
    component_class: Option<OneOrMany<WireClass>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WireDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<Text>,
    #[serde(default)]
    elements: WireElementsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct WireElementsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element: Option<OneOrMany<WireElement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WireElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index: Option<Text<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WireClass {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<Text>,
    #[serde(default)]
    components: WireComponentsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct WireComponentsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component: Option<OneOrMany<WireComponent>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WireComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<Text>,
    #[serde(rename = "feature-values", default = "empty_object")]
    feature_values: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

// === Wire ↔ model conversions ===

impl WireDomain {
    fn into_domain(self, path: &Path) -> TcxResult<NamedDomain> {
        let name = required_name(self.name, path)?;
        let elements = self
            .elements
            .element
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(position, e)| {
                Ok(Element {
                    index: e.index.map(|t| t.text).unwrap_or(position),
                    name: required_name(e.name, path)?,
                    description: e.description.map(|t| t.text).unwrap_or_default(),
                })
            })
            .collect::<TcxResult<_>>()?;
        Ok(NamedDomain { name, elements })
    }

    fn from_domain(domain: &NamedDomain) -> Self {
        Self {
            name: Some(Text::new(&domain.name)),
            elements: WireElementsSection {
                element: non_empty(
                    domain
                        .elements
                        .iter()
                        .map(|e| WireElement {
                            index: Some(Text { text: e.index }),
                            name: Some(Text::new(&e.name)),
                            description: Some(Text::new(&e.description)),
                        })
                        .collect(),
                ),
            },
        }
    }
}

impl WireClass {
    fn into_class(self, path: &Path) -> TcxResult<ComponentClass> {
        let name = required_name(self.name, path)?;
        let components = self
            .components
            .component
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|c| {
                Ok(Component {
                    name: required_name(c.name, path)?,
                    description: c.description.map(|t| t.text).unwrap_or_default(),
                    feature_values: c.feature_values,
                })
            })
            .collect::<TcxResult<_>>()?;
        Ok(ComponentClass {
            name,
            description: self.description.map(|t| t.text).unwrap_or_default(),
            components,
        })
    }

    fn from_class(class: &ComponentClass) -> Self {
        Self {
            name: Some(Text::new(&class.name)),
            description: Some(Text::new(&class.description)),
            components: WireComponentsSection {
                component: non_empty(
                    class
                        .components
                        .iter()
                        .map(|c| WireComponent {
                            name: Some(Text::new(&c.name)),
                            description: Some(Text::new(&c.description)),
                            feature_values: c.feature_values.clone(),
                        })
                        .collect(),
                ),
            },
        }
    }
}

fn required_name(name: Option<Text>, path: &Path) -> TcxResult<String> {
    name.map(|t| t.text).ok_or_else(|| TcxError::MissingName {
        path: path.to_path_buf(),
    })
}
