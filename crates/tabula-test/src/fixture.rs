//! Sample model types and rows.

use std::sync::Arc;
use tabula_core::{
    DataType, Decimal, EnumDescriptor, PropertyDescriptor, PropertyKind, TableColumn,
    TableDisplay, TableEdit, TypeDescriptor, Value,
};

/// Order line row type used across the table suites.
///
/// | Property | Kind | Notes |
/// |----------|------|-------|
/// | `ID` | integer | hidden |
/// | `Product` | text | no-repeat |
/// | `Qty` | integer | totalled |
/// | `Price` | decimal | `{0:N2}` |
/// | `Status` | enum | `Open`, `Shipped` |
/// | `Note` | multi-line text | nullable |
/// | `IsActive`, `IsDirty` | boolean | row contract |
pub fn order_line_type() -> Arc<TypeDescriptor> {
    let status = Arc::new(EnumDescriptor::new("Status", ["Open", "Shipped"]));
    TypeDescriptor::builder("OrderLine")
        .property(PropertyDescriptor::integer("ID").hidden())
        .property(PropertyDescriptor::text("Product").column(TableColumn::default().no_repeat()))
        .property(PropertyDescriptor::integer("Qty").column(TableColumn::default().total()))
        .property(PropertyDescriptor::decimal("Price").format("{0:N2}"))
        .property(PropertyDescriptor::enumeration("Status", status))
        .property(
            PropertyDescriptor::text("Note")
                .nullable()
                .data_type(DataType::MultilineText),
        )
        .property(PropertyDescriptor::boolean("IsActive"))
        .property(PropertyDescriptor::boolean("IsDirty"))
        .row_contract()
        .display(
            TableDisplay::default()
                .row_numbers()
                .controller("Orders")
                .details("Details"),
        )
        .edit(TableEdit::default())
        .build()
        .unwrap()
}

/// One order line.
pub fn line(id: i64, product: &str, qty: i64, active: bool) -> Value {
    Value::object([
        ("ID", Value::from(id)),
        ("Product", Value::from(product)),
        ("Qty", Value::from(qty)),
        ("Price", Value::from(Decimal::new(1250, 2))),
        ("Status", Value::Enum("Open".to_string())),
        ("Note", Value::Null),
        ("IsActive", Value::from(active)),
        ("IsDirty", Value::from(false)),
    ])
}

/// Active lines with the given quantities, all of the same product.
pub fn lines(quantities: &[i64]) -> Value {
    Value::List(
        quantities
            .iter()
            .zip(1..)
            .map(|(qty, id)| line(id, "Widget", *qty, true))
            .collect(),
    )
}

/// `Foo` / `Bar` / `Baz` graph for hidden-input serialization.
///
/// `Foo.Bar` is required and `Bar.BarID` is nullable but required;
/// `Foo.Baz` and `Baz.BazID` are neither. `Foo.BarsList` is a collection.
#[derive(Debug, Clone)]
pub struct HiddenFixture {
    /// `Foo` type.
    pub foo: Arc<TypeDescriptor>,
    /// `Bar` type.
    pub bar: Arc<TypeDescriptor>,
    /// `Baz` type.
    pub baz: Arc<TypeDescriptor>,
}

impl HiddenFixture {
    /// Build the three types.
    pub fn new() -> Self {
        let bar = TypeDescriptor::builder("Bar")
            .property(PropertyDescriptor::integer("BarID").nullable().required())
            .property(PropertyDescriptor::text("BarName"))
            .build()
            .unwrap();
        let baz = TypeDescriptor::builder("Baz")
            .property(PropertyDescriptor::integer("BazID").nullable())
            .property(PropertyDescriptor::text("BazName"))
            .build()
            .unwrap();
        let foo = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::integer("FooID"))
            .property(PropertyDescriptor::text("FooName"))
            .property(PropertyDescriptor::complex("Bar", Arc::clone(&bar)).required())
            .property(PropertyDescriptor::complex("Baz", Arc::clone(&baz)))
            .property(PropertyDescriptor::collection(
                "BarsList",
                PropertyKind::Complex(Arc::clone(&bar)),
            ))
            .build()
            .unwrap();
        Self { foo, bar, baz }
    }

    /// Property descriptor binding a whole `Foo` value.
    pub fn foo_property(&self) -> PropertyDescriptor {
        PropertyDescriptor::complex("Foo", Arc::clone(&self.foo))
    }

    /// A `Foo` with id 1 and name `Foo`; other fields as given.
    pub fn foo(&self, bar: Value, baz: Value) -> Value {
        Value::object([
            ("FooID", Value::from(1)),
            ("FooName", Value::from("Foo")),
            ("Bar", bar),
            ("Baz", baz),
            ("BarsList", Value::Null),
        ])
    }
}

impl Default for HiddenFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_line_type_builds() {
        let ty = order_line_type();
        assert_eq!(ty.active_property(), Some("IsActive"));
        assert_eq!(ty.properties.len(), 8);
    }

    #[test]
    fn test_lines_are_numbered() {
        let rows = lines(&[10, 20]);
        let rows = rows.as_list().unwrap();
        assert_eq!(rows[1].field("ID"), &Value::Int(2));
        assert_eq!(rows[1].field("Qty"), &Value::Int(20));
    }

    #[test]
    fn test_hidden_fixture() {
        let f = HiddenFixture::new();
        assert!(f.foo.property("BarsList").unwrap().is_collection());
        assert!(f.foo.property("Bar").unwrap().required);
        assert_eq!(f.bar.name, "Bar");
        assert_eq!(f.baz.name, "Baz");
    }
}
