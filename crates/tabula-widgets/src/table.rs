//! Table entry points.
//!
//! [`TableHelper`] validates the model shape, builds one render context per
//! call and drives the header, body and footer passes over it.

use crate::body::render_body;
use crate::context::{data_list_id, TableRenderContext};
use crate::editor::{render_edit_body, render_template};
use crate::error::TableError;
use crate::footer::render_footer;
use crate::header::render_header;
use crate::hidden::hidden_inputs_for;
use crate::link::{LinkResolver, RouteLinks};
use crate::lists::{data_list, select_list};
use crate::plan::RenderMode;
use std::sync::Arc;
use tabula_core::dom::id_from_name;
use tabula_core::{Element, Fragment, PropertyDescriptor, RenderOptions, TypeDescriptor, Value};
use tracing::debug;

/// Class of a read-only table.
pub const READONLY_TABLE_CLASS: &str = "readonly-table";
/// Class of an editable table.
pub const EDIT_TABLE_CLASS: &str = "edit-table";

/// Renders read-only and editable tables for collections of rows.
///
/// # Example
///
/// ```
/// use tabula_core::{PropertyDescriptor, TypeDescriptor, Value};
/// use tabula_widgets::TableHelper;
///
/// let row_type = TypeDescriptor::builder("Line")
///     .property(PropertyDescriptor::text("Name"))
///     .build()
///     .unwrap();
/// let rows = Value::List(vec![Value::object([("Name", Value::from("Bolt"))])]);
/// let table = TableHelper::new().display_for("Lines", &rows, &row_type).unwrap();
/// assert!(table.to_html().contains("<td>Bolt</td>"));
/// ```
pub struct TableHelper {
    options: RenderOptions,
    links: Box<dyn LinkResolver>,
}

impl Default for TableHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TableHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableHelper")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl TableHelper {
    /// Helper with default options and `/{controller}/{action}/{id}` links.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: RenderOptions::default(),
            links: Box::new(RouteLinks::default()),
        }
    }

    /// Use `options` for labels and tokens.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Use `links` for row and column hyperlinks.
    #[must_use]
    pub fn with_links(mut self, links: impl LinkResolver + 'static) -> Self {
        self.links = Box::new(links);
        self
    }

    /// Render options in use.
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Read-only table for the collection `model` bound to `field`.
    pub fn display_for(
        &self,
        field: &str,
        model: &Value,
        row_type: &Arc<TypeDescriptor>,
    ) -> Result<Element, TableError> {
        let rows = rows_of(model)?;
        let mut ctx =
            TableRenderContext::new(field, row_type, RenderMode::ReadOnly, &self.options, &*self.links);
        let mut table = table_element(&ctx, READONLY_TABLE_CLASS);
        table.push(render_header(&ctx));
        table.push(render_body(&mut ctx, rows));
        if let Some(footer) = render_footer(&ctx) {
            table.push(footer);
        }
        debug!(field, rows = rows.len(), mode = "read-only", "table rendered");
        Ok(table)
    }

    /// Editable table for the collection `model` bound to `field`.
    ///
    /// Select and suggestion lists are read from `view_model`. The table is
    /// followed by one `<datalist>` per suggestion-list column.
    pub fn editor_for(
        &self,
        field: &str,
        model: &Value,
        row_type: &Arc<TypeDescriptor>,
        view_model: &Value,
    ) -> Result<Fragment, TableError> {
        let rows = rows_of(model)?;
        let default_row = row_type
            .default_instance()
            .ok_or_else(|| TableError::NoConstructor(row_type.name.clone()))?;
        let mut ctx =
            TableRenderContext::new(field, row_type, RenderMode::Editable, &self.options, &*self.links);
        load_lists(&mut ctx, view_model)?;

        let mut table = table_element(&ctx, EDIT_TABLE_CLASS);
        if let Some(active) = &ctx.active_property {
            table.set_attr("data-isactiveproperty", active.as_str());
        }
        if let Some(dirty) = &ctx.dirty_property {
            table.set_attr("data-isdirtyproperty", dirty.as_str());
        }
        table.push(render_header(&ctx));
        table.push(render_edit_body(&mut ctx, rows));
        table.push(render_template(&mut ctx, &default_row));
        if let Some(footer) = render_footer(&ctx) {
            table.push(footer);
        }

        let mut out = Fragment::from(table);
        for (id, items) in &ctx.data_lists {
            let list = Element::new("datalist")
                .attr("id", id.as_str())
                .children(items.iter().map(|i| Element::new("option").attr("value", i.as_str())));
            out.push(list);
        }
        debug!(field, rows = rows.len(), mode = "editable", "table rendered");
        Ok(out)
    }

    /// Hidden inputs posting `value` back as `field`.
    pub fn hidden_input_for(&self, field: &str, value: &Value, property: &PropertyDescriptor) -> Fragment {
        Fragment(hidden_inputs_for(field, value, property).into_iter().map(Into::into).collect())
    }
}

fn rows_of(model: &Value) -> Result<&[Value], TableError> {
    let rows = match model {
        Value::Null => return Err(TableError::NullCollection),
        Value::Text(_) => return Err(TableError::UnsupportedShape("a string")),
        Value::Map(_) => return Err(TableError::UnsupportedShape("a keyed or grouped collection")),
        Value::List(rows) => rows,
        _ => return Err(TableError::UnsupportedShape("a value that is not a collection")),
    };
    if rows.iter().any(|r| !matches!(r, Value::Object(_))) {
        return Err(TableError::UnsupportedShape("a collection of scalar items"));
    }
    Ok(rows)
}

fn table_element(ctx: &TableRenderContext<'_>, class: &str) -> Element {
    Element::new("table")
        .attr("id", id_from_name(&ctx.field))
        .class(class)
}

fn load_lists(ctx: &mut TableRenderContext<'_>, view_model: &Value) -> Result<(), TableError> {
    for (index, column) in ctx.plan.columns.iter().enumerate() {
        if !column.is_visible() {
            continue;
        }
        if let Some(key) = &column.select_list {
            let label = column
                .property
                .drop_down
                .as_ref()
                .and_then(|d| d.option_label.as_deref());
            ctx.select_lists
                .insert(index, select_list(view_model, key, label)?);
        }
        if let Some(key) = &column.data_list {
            let property = column
                .display_property
                .as_ref()
                .unwrap_or(&column.property);
            let id = data_list_id(&property.name);
            if !ctx.data_lists.iter().any(|(existing, _)| *existing == id) {
                ctx.data_lists.push((id, data_list(view_model, key)?));
            }
        }
    }
    Ok(())
}
