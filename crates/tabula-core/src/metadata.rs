//! Model metadata: the property descriptor tree a table is planned from.
//!
//! A [`TypeDescriptor`] lists the declared properties of a row type in order.
//! Each [`PropertyDescriptor`] carries its kind, display metadata and the
//! table annotations attached to it. Types are built once with
//! [`TypeDescriptor::builder`], which validates every annotation against the
//! declared properties before handing out a shareable [`Arc`].

use crate::annotation::{DataList, DropDownList, TableColumn, TableDisplay, TableEdit, TableLink};
use crate::error::ConfigError;
use crate::value::{Object, Value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Well-known active-flag property of row-contract types.
pub const ROW_CONTRACT_ACTIVE: &str = "IsActive";
/// Well-known dirty-flag property of row-contract types.
pub const ROW_CONTRACT_DIRTY: &str = "IsDirty";

/// Scalar property flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// Exact decimal.
    Decimal,
    /// Floating point.
    Float,
    /// Date, carried as text.
    Date,
    /// Raw bytes, rendered as base64.
    Bytes,
}

impl ScalarKind {
    /// Whether values of this kind are numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal | Self::Float)
    }

    /// Whether values of this kind are whole numbers.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Integer)
    }
}

/// Semantic data type hint of a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// No hint.
    #[default]
    Plain,
    /// Rendered as a `mailto:` link in read-only tables.
    EmailAddress,
    /// Edited with a textarea.
    MultilineText,
}

/// One member of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    /// Member name, also the posted value.
    pub name: String,
    /// Text shown to users.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl EnumMember {
    /// Text shown for this member.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Enum type with ordered members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    /// Type name.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
}

impl EnumDescriptor {
    /// Enum whose members display as their own names.
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members
                .into_iter()
                .map(|m| EnumMember {
                    name: m.into(),
                    display_name: None,
                })
                .collect(),
        }
    }

    /// Give `member` a display name.
    #[must_use]
    pub fn display(mut self, member: &str, display_name: impl Into<String>) -> Self {
        if let Some(m) = self.members.iter_mut().find(|m| m.name == member) {
            m.display_name = Some(display_name.into());
        }
        self
    }

    /// Display text of `member`, falling back to the raw name.
    #[must_use]
    pub fn label_of<'a>(&'a self, member: &'a str) -> &'a str {
        self.members
            .iter()
            .find(|m| m.name == member)
            .map_or(member, EnumMember::label)
    }
}

/// The closed set of property kinds a table plan distinguishes.
#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// Simple value.
    Scalar(ScalarKind),
    /// Boolean.
    Boolean,
    /// Enum.
    Enum(Arc<EnumDescriptor>),
    /// Nested complex type.
    Complex(Arc<TypeDescriptor>),
    /// Collection of another kind.
    Collection(Box<PropertyKind>),
}

/// A declared property and everything attached to it.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,
    /// Declared kind.
    pub kind: PropertyKind,
    /// Accepts null.
    pub nullable: bool,
    /// Cannot be edited.
    pub read_only: bool,
    /// Header text; defaults to the name.
    pub display_name: Option<String>,
    /// Composite format string, e.g. `{0:N2}`.
    pub format: Option<String>,
    /// Text shown for null values.
    pub null_display: Option<String>,
    /// Required for validation and hidden-input serialization.
    pub required: bool,
    /// Data type hint.
    pub data_type: DataType,
    /// Posted as a hidden input rather than shown.
    pub hidden: bool,
    /// Column directives.
    pub column: Option<TableColumn>,
    /// Link directive.
    pub link: Option<TableLink>,
    /// Select list binding.
    pub drop_down: Option<DropDownList>,
    /// Suggestion list binding.
    pub data_list: Option<DataList>,
}

impl PropertyDescriptor {
    /// Property of an arbitrary kind.
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            read_only: false,
            display_name: None,
            format: None,
            null_display: None,
            required: false,
            data_type: DataType::Plain,
            hidden: false,
            column: None,
            link: None,
            drop_down: None,
            data_list: None,
        }
    }

    /// Text property.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarKind::Text))
    }

    /// Integer property.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarKind::Integer))
    }

    /// Decimal property.
    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarKind::Decimal))
    }

    /// Floating-point property.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarKind::Float))
    }

    /// Date property.
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarKind::Date))
    }

    /// Byte-array property.
    pub fn bytes(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Scalar(ScalarKind::Bytes))
    }

    /// Boolean property.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Boolean)
    }

    /// Enum property.
    pub fn enumeration(name: impl Into<String>, ty: Arc<EnumDescriptor>) -> Self {
        Self::new(name, PropertyKind::Enum(ty))
    }

    /// Nested complex property.
    pub fn complex(name: impl Into<String>, ty: Arc<TypeDescriptor>) -> Self {
        Self::new(name, PropertyKind::Complex(ty))
    }

    /// Collection property.
    pub fn collection(name: impl Into<String>, item: PropertyKind) -> Self {
        Self::new(name, PropertyKind::Collection(Box::new(item)))
    }

    /// Accept null.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark read-only.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Set the header text.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the format string.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the null display text.
    #[must_use]
    pub fn null_display(mut self, text: impl Into<String>) -> Self {
        self.null_display = Some(text.into());
        self
    }

    /// Mark required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the data type hint.
    #[must_use]
    pub const fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Post as a hidden input only.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Attach column directives.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.column = Some(column);
        self
    }

    /// Attach a link directive.
    #[must_use]
    pub fn link(mut self, link: TableLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Bind to a select list.
    #[must_use]
    pub fn drop_down(mut self, drop_down: DropDownList) -> Self {
        self.drop_down = Some(drop_down);
        self
    }

    /// Bind to a suggestion list.
    #[must_use]
    pub fn data_list(mut self, data_list: DataList) -> Self {
        self.data_list = Some(data_list);
        self
    }

    /// Header text.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Nested type of a complex property.
    #[must_use]
    pub const fn complex_type(&self) -> Option<&Arc<TypeDescriptor>> {
        match &self.kind {
            PropertyKind::Complex(ty) => Some(ty),
            _ => None,
        }
    }

    /// Scalar flavour, if scalar.
    #[must_use]
    pub const fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.kind {
            PropertyKind::Scalar(k) => Some(k),
            _ => None,
        }
    }

    /// Whether the property is numeric.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.scalar_kind().is_some_and(ScalarKind::is_numeric)
    }

    /// Whether the property is integral.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.scalar_kind().is_some_and(ScalarKind::is_integral)
    }

    /// Whether the property is a collection. Byte arrays are scalars.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self.kind, PropertyKind::Collection(_))
    }

    /// Whether the property is a non-nullable boolean.
    #[must_use]
    pub const fn is_plain_boolean(&self) -> bool {
        matches!(self.kind, PropertyKind::Boolean) && !self.nullable
    }

    /// Whether the column is excluded.
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.column.as_ref().is_some_and(|c| c.exclude)
    }

    /// Column footer total, honored for numeric properties only.
    #[must_use]
    pub fn has_total(&self) -> bool {
        self.is_numeric() && self.column.as_ref().is_some_and(|c| c.include_total)
    }

    /// Repeat suppression, ignored when a total is requested.
    #[must_use]
    pub fn has_no_repeat(&self) -> bool {
        self.column
            .as_ref()
            .is_some_and(|c| c.no_repeat && !c.include_total)
    }

    /// Display-property indirection, honored for complex properties only.
    #[must_use]
    pub fn indirection(&self) -> Option<&str> {
        self.complex_type()?;
        self.column.as_ref()?.display_property.as_deref()
    }

    /// Link directive, honored for complex properties only.
    #[must_use]
    pub fn effective_link(&self) -> Option<&TableLink> {
        self.complex_type()?;
        self.link.as_ref()
    }

    /// Whether the column is read-only in edit mode.
    #[must_use]
    pub fn is_readonly_column(&self) -> bool {
        self.read_only || self.column.as_ref().is_some_and(|c| c.readonly)
    }

    /// Value of a default-constructed instance for this property.
    ///
    /// Reference-like kinds (text, dates, bytes, complex values,
    /// collections) and nullable properties default to null.
    #[must_use]
    pub fn default_value(&self) -> Value {
        if self.nullable {
            return Value::Null;
        }
        match &self.kind {
            PropertyKind::Scalar(ScalarKind::Integer) => Value::Int(0),
            PropertyKind::Scalar(ScalarKind::Decimal) => Value::Decimal(Decimal::ZERO),
            PropertyKind::Scalar(ScalarKind::Float) => Value::Float(0.0),
            PropertyKind::Boolean => Value::Bool(false),
            PropertyKind::Enum(e) => e
                .members
                .first()
                .map_or(Value::Null, |m| Value::Enum(m.name.clone())),
            _ => Value::Null,
        }
    }
}

/// How a default instance of a type is produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Construction {
    /// Every property takes its [`PropertyDescriptor::default_value`].
    #[default]
    Synthesized,
    /// A fixed default instance.
    Template(Object),
    /// The type cannot be constructed without arguments.
    Unavailable,
}

/// A row or nested type: ordered properties plus class-level annotations.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: String,
    /// Declared properties, in order.
    pub properties: Vec<PropertyDescriptor>,
    /// All properties are read-only.
    pub read_only: bool,
    /// Default construction path.
    pub construction: Construction,
    /// Exposes `IsActive`/`IsDirty` row-state properties.
    pub row_contract: bool,
    /// Row numbering and navigation links.
    pub display: Option<TableDisplay>,
    /// Edit-table behaviour.
    pub edit: Option<TableEdit>,
    /// Row link.
    pub link: Option<TableLink>,
}

impl TypeDescriptor {
    /// Start declaring a type.
    pub fn builder(name: impl Into<String>) -> TypeBuilder {
        TypeBuilder {
            ty: Self {
                name: name.into(),
                properties: Vec::new(),
                read_only: false,
                construction: Construction::Synthesized,
                row_contract: false,
                display: None,
                edit: None,
                link: None,
            },
        }
    }

    /// Property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Name of the active-flag property, if tracked.
    #[must_use]
    pub fn active_property(&self) -> Option<&str> {
        if self.row_contract {
            return Some(ROW_CONTRACT_ACTIVE);
        }
        self.edit.as_ref()?.is_active_property.as_deref()
    }

    /// Name of the dirty-flag property, if tracked.
    #[must_use]
    pub fn dirty_property(&self) -> Option<&str> {
        if self.row_contract {
            return Some(ROW_CONTRACT_DIRTY);
        }
        self.edit.as_ref()?.is_dirty_property.as_deref()
    }

    /// Whether rows may be added client-side.
    #[must_use]
    pub fn allow_additions(&self) -> bool {
        self.edit.as_ref().is_some_and(|e| e.allow_additions)
    }

    /// Whether rows may be deleted or archived client-side.
    #[must_use]
    pub fn allow_deletions(&self) -> bool {
        self.edit.as_ref().is_some_and(|e| e.allow_deletions)
    }

    /// A default-constructed instance, or `None` without a construction path.
    #[must_use]
    pub fn default_instance(&self) -> Option<Value> {
        match &self.construction {
            Construction::Synthesized => Some(Value::Object(
                self.properties
                    .iter()
                    .map(|p| (p.name.clone(), p.default_value()))
                    .collect(),
            )),
            Construction::Template(o) => Some(Value::Object(o.clone())),
            Construction::Unavailable => None,
        }
    }
}

/// Validating builder for [`TypeDescriptor`].
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    ty: TypeDescriptor,
}

impl TypeBuilder {
    /// Declare the next property.
    #[must_use]
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.ty.properties.push(property);
        self
    }

    /// Declare several properties.
    #[must_use]
    pub fn properties(mut self, properties: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        self.ty.properties.extend(properties);
        self
    }

    /// Make every property read-only in edit mode.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.ty.read_only = true;
        self
    }

    /// Declare that the type has no zero-argument construction path.
    #[must_use]
    pub fn no_default_constructor(mut self) -> Self {
        self.ty.construction = Construction::Unavailable;
        self
    }

    /// Use a fixed default instance.
    #[must_use]
    pub fn default_instance(mut self, instance: Object) -> Self {
        self.ty.construction = Construction::Template(instance);
        self
    }

    /// Adopt the `IsActive`/`IsDirty` row contract.
    #[must_use]
    pub const fn row_contract(mut self) -> Self {
        self.ty.row_contract = true;
        self
    }

    /// Attach `table-display`.
    #[must_use]
    pub fn display(mut self, display: TableDisplay) -> Self {
        self.ty.display = Some(display);
        self
    }

    /// Attach `table-edit`.
    #[must_use]
    pub fn edit(mut self, edit: TableEdit) -> Self {
        self.ty.edit = Some(edit);
        self
    }

    /// Attach a class-level `table-link`.
    #[must_use]
    pub fn link(mut self, link: TableLink) -> Self {
        self.ty.link = Some(link);
        self
    }

    /// Validate every annotation and freeze the type.
    pub fn build(self) -> Result<Arc<TypeDescriptor>, ConfigError> {
        validate(&self.ty)?;
        Ok(Arc::new(self.ty))
    }
}

fn validate(ty: &TypeDescriptor) -> Result<(), ConfigError> {
    for (i, p) in ty.properties.iter().enumerate() {
        if ty.properties[..i].iter().any(|q| q.name == p.name) {
            return Err(ConfigError::DuplicateProperty {
                type_name: ty.name.clone(),
                property: p.name.clone(),
            });
        }
    }

    if let Some(display) = &ty.display {
        if display.has_actions() {
            if display.controller.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::MissingController {
                    annotation: "table-display",
                    target: ty.name.clone(),
                });
            }
            require(ty, &display.id_property)?;
        }
    }

    if ty.row_contract {
        require_boolean(ty, ROW_CONTRACT_ACTIVE)?;
        require_boolean(ty, ROW_CONTRACT_DIRTY)?;
    } else if let Some(edit) = &ty.edit {
        for name in [&edit.is_active_property, &edit.is_dirty_property]
            .into_iter()
            .flatten()
        {
            require_boolean(ty, name)?;
        }
    }

    if let Some(link) = &ty.link {
        validate_link(ty, &ty.name, link)?;
    }

    for p in &ty.properties {
        validate_property(ty, p)?;
    }
    Ok(())
}

fn validate_property(owner: &TypeDescriptor, p: &PropertyDescriptor) -> Result<(), ConfigError> {
    let target = format!("{}.{}", owner.name, p.name);
    if let Some(link) = &p.link {
        match p.complex_type() {
            Some(ty) => validate_link(ty, &target, link)?,
            None => warn!(property = %target, "table-link ignored on a non-complex property"),
        }
    }
    if let Some(column) = &p.column {
        if let Some(display) = &column.display_property {
            match p.complex_type() {
                Some(ty) => {
                    require(ty, display)?;
                }
                None => warn!(property = %target, "displayProperty ignored on a non-complex property"),
            }
        }
        if column.include_total && !p.is_numeric() {
            warn!(property = %target, "includeTotal ignored on a non-numeric property");
        }
        if column.include_total && column.no_repeat {
            warn!(property = %target, "noRepeat ignored because includeTotal is set");
        }
    }
    Ok(())
}

fn validate_link(ty: &TypeDescriptor, target: &str, link: &TableLink) -> Result<(), ConfigError> {
    if link.controller.is_empty() {
        return Err(ConfigError::MissingController {
            annotation: "table-link",
            target: target.to_string(),
        });
    }
    require(ty, &link.id_property)?;
    require(ty, &link.display_property)?;
    Ok(())
}

fn require<'a>(ty: &'a TypeDescriptor, name: &str) -> Result<&'a PropertyDescriptor, ConfigError> {
    ty.property(name)
        .ok_or_else(|| ConfigError::missing(&ty.name, name))
}

fn require_boolean(ty: &TypeDescriptor, name: &str) -> Result<(), ConfigError> {
    if require(ty, name)?.is_plain_boolean() {
        Ok(())
    } else {
        Err(ConfigError::NotBoolean {
            type_name: ty.name.clone(),
            property: name.to_string(),
        })
    }
}
