//! YAML manifest types for Tabula models.
//!
//! ```yaml
//! enums:
//!   Status:
//!     members: [Open, { name: Shipped, displayName: Sent }]
//! types:
//!   OrderLine:
//!     rowContract: true
//!     edit: { allowDeletions: false }
//!     properties:
//!       - { name: ID, type: integer, hidden: true }
//!       - { name: Qty, type: integer, column: { includeTotal: true } }
//!       - { name: Status, type: Status }
//!       - { name: IsActive, type: boolean }
//!       - { name: IsDirty, type: boolean }
//! ```
//!
//! A property `type` is a scalar name (`text`, `integer`, `decimal`,
//! `float`, `date`, `bytes`, `boolean`), a declared enum, or a declared
//! type. Types may be declared in any order.

use crate::data::property_value;
use crate::error::ManifestError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabula_core::{
    ConfigError, DataList, DataType, DropDownList, EnumDescriptor, Object, PropertyDescriptor,
    PropertyKind, ScalarKind, TableColumn, TableDisplay, TableEdit, TableLink, TypeDescriptor,
};
use tracing::debug;

/// Model manifest: enums and row types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Enum types by name.
    #[serde(default)]
    pub enums: IndexMap<String, EnumSpec>,
    /// Row and nested types by name.
    #[serde(default)]
    pub types: IndexMap<String, TypeSpec>,
}

/// Enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumSpec {
    /// Members in order.
    pub members: Vec<MemberSpec>,
}

/// Enum member: a bare name, or a name with display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberSpec {
    /// Member displayed as its own name.
    Name(String),
    /// Member with display text.
    Named {
        /// Member name.
        name: String,
        /// Display text.
        #[serde(default, rename = "displayName")]
        display_name: Option<String>,
    },
}

impl MemberSpec {
    /// Member name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Named { name, .. } => name,
        }
    }
}

const fn yes() -> bool {
    true
}

/// Type declaration with its class-level annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TypeSpec {
    /// Every property is read-only.
    #[serde(default)]
    pub read_only: bool,
    /// Exposes `IsActive`/`IsDirty`.
    #[serde(default)]
    pub row_contract: bool,
    /// Whether a default instance can be produced.
    #[serde(default = "yes")]
    pub default_constructor: bool,
    /// Field values of the default instance, over the property defaults.
    #[serde(default)]
    pub defaults: Option<IndexMap<String, serde_yaml_ng::Value>>,
    /// `table-display` annotation.
    #[serde(default)]
    pub display: Option<TableDisplay>,
    /// `table-edit` annotation.
    #[serde(default)]
    pub edit: Option<TableEdit>,
    /// `table-link` annotation of the type.
    #[serde(default)]
    pub link: Option<TableLink>,
    /// Declared properties, in order.
    pub properties: Vec<PropertySpec>,
}

/// Property declaration with its annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertySpec {
    /// Property name.
    pub name: String,
    /// Scalar, enum or type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// A collection of `type`.
    #[serde(default)]
    pub collection: bool,
    /// Accepts null.
    #[serde(default)]
    pub nullable: bool,
    /// Read-only in editable tables.
    #[serde(default)]
    pub read_only: bool,
    /// Must be posted even when null.
    #[serde(default)]
    pub required: bool,
    /// Rendered as a hidden input only.
    #[serde(default)]
    pub hidden: bool,
    /// Header text.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Composite format string.
    #[serde(default)]
    pub format: Option<String>,
    /// Text shown for null.
    #[serde(default)]
    pub null_display: Option<String>,
    /// Data type hint.
    #[serde(default)]
    pub data_type: DataType,
    /// `table-column` annotation.
    #[serde(default)]
    pub column: Option<TableColumn>,
    /// `table-link` annotation.
    #[serde(default)]
    pub link: Option<TableLink>,
    /// `drop-down-list` annotation.
    #[serde(default)]
    pub drop_down: Option<DropDownList>,
    /// `data-list` annotation.
    #[serde(default)]
    pub data_list: Option<DataList>,
}

impl Manifest {
    /// Parse a manifest.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Build every declared type, validating annotations.
    pub fn resolve(&self) -> Result<Schema, ManifestError> {
        let mut resolver = Resolver {
            manifest: self,
            enums: self
                .enums
                .iter()
                .map(|(name, spec)| (name.clone(), Arc::new(enum_descriptor(name, spec))))
                .collect(),
            types: IndexMap::new(),
            stack: Vec::new(),
        };
        for name in self.types.keys() {
            resolver.resolve_type(name, name)?;
        }
        debug!(
            types = resolver.types.len(),
            enums = resolver.enums.len(),
            "manifest resolved"
        );
        Ok(Schema {
            enums: resolver.enums,
            types: resolver.types,
        })
    }
}

fn enum_descriptor(name: &str, spec: &EnumSpec) -> EnumDescriptor {
    let mut descriptor = EnumDescriptor::new(name, spec.members.iter().map(MemberSpec::name));
    for member in &spec.members {
        if let MemberSpec::Named {
            name,
            display_name: Some(display),
        } = member
        {
            descriptor = descriptor.display(name, display.as_str());
        }
    }
    descriptor
}

/// Resolved types of a manifest.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    enums: IndexMap<String, Arc<EnumDescriptor>>,
    types: IndexMap<String, Arc<TypeDescriptor>>,
}

impl Schema {
    /// Parse and resolve a manifest.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        Manifest::from_yaml(yaml)?.resolve()
    }

    /// Type by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    /// Type by name, or an unknown-type error naming `owner`.
    pub fn require(&self, name: &str, owner: &str) -> Result<&Arc<TypeDescriptor>, ManifestError> {
        self.get(name).ok_or_else(|| ManifestError::UnknownType {
            name: name.to_string(),
            owner: owner.to_string(),
        })
    }

    /// Enum by name.
    #[must_use]
    pub fn enum_type(&self, name: &str) -> Option<&Arc<EnumDescriptor>> {
        self.enums.get(name)
    }

    /// Declared type names, in manifest order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

struct Resolver<'a> {
    manifest: &'a Manifest,
    enums: IndexMap<String, Arc<EnumDescriptor>>,
    types: IndexMap<String, Arc<TypeDescriptor>>,
    // Types being built, outermost first.
    stack: Vec<String>,
}

impl Resolver<'_> {
    fn resolve_type(&mut self, name: &str, owner: &str) -> Result<Arc<TypeDescriptor>, ManifestError> {
        if let Some(ty) = self.types.get(name) {
            return Ok(Arc::clone(ty));
        }
        if let Some(start) = self.stack.iter().position(|n| n == name) {
            let mut cycle = self.stack[start..].to_vec();
            cycle.push(name.to_string());
            return Err(ManifestError::Cycle(cycle));
        }
        let manifest = self.manifest;
        let spec = manifest
            .types
            .get(name)
            .ok_or_else(|| ManifestError::UnknownType {
                name: name.to_string(),
                owner: owner.to_string(),
            })?;

        self.stack.push(name.to_string());
        let properties = spec
            .properties
            .iter()
            .map(|p| self.property(name, p))
            .collect::<Result<Vec<_>, _>>()?;
        self.stack.pop();

        let mut builder = TypeDescriptor::builder(name);
        if spec.read_only {
            builder = builder.read_only();
        }
        if spec.row_contract {
            builder = builder.row_contract();
        }
        if let Some(display) = &spec.display {
            builder = builder.display(display.clone());
        }
        if let Some(edit) = &spec.edit {
            builder = builder.edit(edit.clone());
        }
        if let Some(link) = &spec.link {
            builder = builder.link(link.clone());
        }
        if !spec.default_constructor {
            builder = builder.no_default_constructor();
        } else if let Some(defaults) = &spec.defaults {
            builder = builder.default_instance(default_instance(name, &properties, defaults)?);
        }
        let ty = builder.properties(properties).build()?;
        self.types.insert(name.to_string(), Arc::clone(&ty));
        Ok(ty)
    }

    fn property(&mut self, owner: &str, spec: &PropertySpec) -> Result<PropertyDescriptor, ManifestError> {
        let target = format!("{owner}.{}", spec.name);
        let kind = self.kind(&spec.type_name, &target)?;
        let kind = if spec.collection {
            PropertyKind::Collection(Box::new(kind))
        } else {
            kind
        };

        let mut property = PropertyDescriptor::new(spec.name.as_str(), kind).data_type(spec.data_type);
        property.nullable = spec.nullable;
        property.read_only = spec.read_only;
        property.required = spec.required;
        property.hidden = spec.hidden;
        property.display_name.clone_from(&spec.display_name);
        property.format.clone_from(&spec.format);
        property.null_display.clone_from(&spec.null_display);
        property.column.clone_from(&spec.column);
        property.link.clone_from(&spec.link);
        property.drop_down.clone_from(&spec.drop_down);
        property.data_list.clone_from(&spec.data_list);
        Ok(property)
    }

    fn kind(&mut self, type_name: &str, target: &str) -> Result<PropertyKind, ManifestError> {
        let scalar = match type_name {
            "text" | "string" => Some(ScalarKind::Text),
            "integer" | "int" => Some(ScalarKind::Integer),
            "decimal" => Some(ScalarKind::Decimal),
            "float" => Some(ScalarKind::Float),
            "date" => Some(ScalarKind::Date),
            "bytes" => Some(ScalarKind::Bytes),
            "boolean" | "bool" => return Ok(PropertyKind::Boolean),
            _ => None,
        };
        if let Some(kind) = scalar {
            return Ok(PropertyKind::Scalar(kind));
        }
        if let Some(e) = self.enums.get(type_name) {
            return Ok(PropertyKind::Enum(Arc::clone(e)));
        }
        Ok(PropertyKind::Complex(self.resolve_type(type_name, target)?))
    }
}

fn default_instance(
    type_name: &str,
    properties: &[PropertyDescriptor],
    defaults: &IndexMap<String, serde_yaml_ng::Value>,
) -> Result<Object, ManifestError> {
    let mut instance: Object = properties
        .iter()
        .map(|p| (p.name.clone(), p.default_value()))
        .collect();
    for (field, yaml) in defaults {
        let property = properties
            .iter()
            .find(|p| &p.name == field)
            .ok_or_else(|| ConfigError::MissingProperty {
                type_name: type_name.to_string(),
                property: field.clone(),
            })?;
        let value = property_value(property, yaml, &format!("{type_name}.{field}"))?;
        instance.insert(field.clone(), value);
    }
    Ok(instance)
}
