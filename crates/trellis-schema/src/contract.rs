//! Prop-type metadata
//!
//! A component may declare a contract for its properties: which names it
//! accepts, which are required, their expected kind and default values.
//! Kinds are checked shallowly; nested descriptions (`array.element`,
//! `shape.fields`) are kept for documentation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trellis_core::{PropKind, PropValue, Result, TrellisError};

/// The declared type of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    Any,
    String,
    Number,
    Bool,
    Object,
    Element,
    /// Anything renderable: text, numbers, elements or lists of them
    Node,
    Array {
        #[serde(default)]
        element: Option<Box<PropType>>,
    },
    #[serde(rename = "enum")]
    Enum { values: Vec<PropValue> },
    Union { variants: Vec<PropType> },
    Shape { fields: BTreeMap<String, PropType> },
}

impl PropType {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropType::Any => "any",
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Bool => "bool",
            PropType::Object => "object",
            PropType::Element => "element",
            PropType::Node => "node",
            PropType::Array { .. } => "array",
            PropType::Enum { .. } => "enum",
            PropType::Union { .. } => "union",
            PropType::Shape { .. } => "shape",
        }
    }

    /// Human-readable form, e.g. `array<string>` or `number | string`
    pub fn describe(&self) -> String {
        match self {
            PropType::Array { element: Some(el) } => format!("array<{}>", el.describe()),
            PropType::Enum { values } => {
                let items: Vec<String> = values.iter().map(describe_literal).collect();
                format!("enum[{}]", items.join(", "))
            }
            PropType::Union { variants } => variants
                .iter()
                .map(|v| v.describe())
                .collect::<Vec<_>>()
                .join(" | "),
            PropType::Shape { fields } => {
                let names: Vec<&str> = fields.keys().map(|s| s.as_str()).collect();
                format!("shape{{{}}}", names.join(", "))
            }
            other => other.type_name().to_string(),
        }
    }

    /// Shallow kind check. Enum membership is handled by the validator.
    pub fn accepts_kind(&self, kind: PropKind) -> bool {
        match self {
            PropType::Any => true,
            PropType::String => kind == PropKind::String,
            PropType::Number => kind == PropKind::Number,
            PropType::Bool => kind == PropKind::Bool,
            PropType::Object | PropType::Shape { .. } => kind == PropKind::Mapping,
            PropType::Element => kind == PropKind::Element,
            PropType::Array { .. } => kind == PropKind::Sequence,
            PropType::Node => matches!(
                kind,
                PropKind::String | PropKind::Number | PropKind::Element | PropKind::Sequence
            ),
            PropType::Enum { values } => values.iter().any(|v| v.kind() == kind),
            PropType::Union { variants } => variants.iter().any(|v| v.accepts_kind(kind)),
        }
    }
}

fn describe_literal(value: &PropValue) -> String {
    match value {
        PropValue::String(s) => format!("'{}'", s),
        PropValue::Number(n) => n.to_string(),
        PropValue::Bool(b) => b.to_string(),
        other => other.kind().to_string(),
    }
}

/// Schema for a single property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSchema {
    #[serde(rename = "type")]
    pub prop_type: PropType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<PropValue>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PropSchema {
    pub fn new(prop_type: PropType) -> Self {
        Self {
            prop_type,
            required: false,
            default: None,
            description: None,
        }
    }

    pub fn required(prop_type: PropType) -> Self {
        Self {
            required: true,
            ..Self::new(prop_type)
        }
    }

    pub fn with_default(mut self, value: impl Into<PropValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// The declared property contract of one component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentContract {
    #[serde(default)]
    pub props: BTreeMap<String, PropSchema>,
}

impl ComponentContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: declare one property
    pub fn with_prop(mut self, name: impl Into<String>, schema: PropSchema) -> Self {
        self.props.insert(name.into(), schema);
        self
    }

    pub fn get_prop(&self, name: &str) -> Option<&PropSchema> {
        self.props.get(name)
    }

    pub fn prop_names(&self) -> Vec<&str> {
        self.props.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_prop_required(&self, name: &str) -> bool {
        self.props.get(name).map(|p| p.required).unwrap_or(false)
    }

    /// Declared default values, by property name
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.props
            .iter()
            .filter_map(|(name, p)| p.default.as_ref().map(|d| (name.as_str(), d)))
    }
}

/// Property definition as it appears in library manifests.
///
/// Either a bare type name (`a_number = "number"`) or a detailed table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PropSchemaDefinition {
    Simple(String),
    Detailed(DetailedPropSchema),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DetailedPropSchema {
    #[serde(rename = "type")]
    prop_type: String,
    #[serde(default)]
    values: Option<Vec<PropValue>>,
    #[serde(default)]
    variants: Option<Vec<String>>,
    #[serde(default)]
    element: Option<String>,
    #[serde(default)]
    fields: Option<BTreeMap<String, String>>,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    default: Option<PropValue>,
    #[serde(default)]
    description: Option<String>,
}

impl PropSchemaDefinition {
    pub(crate) fn to_prop_schema(self) -> Result<PropSchema> {
        match self {
            PropSchemaDefinition::Simple(type_str) => {
                Ok(PropSchema::new(parse_prop_type(&type_str)?))
            }
            PropSchemaDefinition::Detailed(d) => {
                let prop_type = match d.prop_type.as_str() {
                    "enum" => PropType::Enum {
                        values: d.values.unwrap_or_default(),
                    },
                    "union" => PropType::Union {
                        variants: d
                            .variants
                            .unwrap_or_default()
                            .iter()
                            .map(|v| parse_prop_type(v))
                            .collect::<Result<_>>()?,
                    },
                    "array" => PropType::Array {
                        element: match d.element.as_deref() {
                            Some(el) => Some(Box::new(parse_prop_type(el)?)),
                            None => None,
                        },
                    },
                    "shape" => PropType::Shape {
                        fields: d
                            .fields
                            .unwrap_or_default()
                            .into_iter()
                            .map(|(name, t)| Ok((name, parse_prop_type(&t)?)))
                            .collect::<Result<_>>()?,
                    },
                    other => parse_prop_type(other)?,
                };
                Ok(PropSchema {
                    prop_type,
                    required: d.required.unwrap_or(false),
                    default: d.default,
                    description: d.description,
                })
            }
        }
    }
}

/// Parse a bare type name. Compound types given bare carry no detail.
pub(crate) fn parse_prop_type(type_str: &str) -> Result<PropType> {
    let prop_type = match type_str {
        "any" => PropType::Any,
        "string" => PropType::String,
        "number" => PropType::Number,
        "bool" => PropType::Bool,
        "object" => PropType::Object,
        "element" => PropType::Element,
        "node" => PropType::Node,
        "array" => PropType::Array { element: None },
        "shape" => PropType::Shape {
            fields: BTreeMap::new(),
        },
        other => {
            return Err(TrellisError::ManifestError(format!(
                "Unknown prop type '{}'",
                other
            )))
        }
    };
    Ok(prop_type)
}
