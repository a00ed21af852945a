//! Table footer: column totals and the add button.

use crate::context::TableRenderContext;
use crate::editor::{button, ADD_BUTTON_CLASS};
use tabula_core::format::apply;
use tabula_core::{Element, Value};

/// Class of a footer total; the client recomputes it in place.
pub const TOTAL_CLASS: &str = "footer-total";

/// `<tfoot>`, or `None` when the table has nothing to show there.
///
/// A read-only table gets a footer only when a column is totalled. An
/// editable table also gets one when rows can be added or deleted, so the
/// add button has a home.
pub fn render_footer(ctx: &TableRenderContext<'_>) -> Option<Element> {
    let plan = &ctx.plan;
    if !plan.has_totals() && !plan.buttons {
        return None;
    }
    let mut row = Element::new("tr");
    if plan.row_numbers {
        row.push(Element::new("td"));
    }
    for column in plan.visible() {
        let mut cell = Element::new("td");
        if let Some(format) = &column.total_format {
            let total = apply(format, &Value::Decimal(column.total()));
            cell.push(
                Element::new("div")
                    .class(TOTAL_CLASS)
                    .attr("data-format", format.as_str())
                    .text(total),
            );
        }
        row.push(cell);
    }
    if plan.details_link {
        row.push(Element::new("td"));
    }
    if plan.edit_link {
        row.push(Element::new("td"));
    }
    if plan.buttons {
        let mut cell = Element::new("td").class("button-cell");
        if ctx.allow_additions {
            cell.push(button(ADD_BUTTON_CLASS));
        }
        row.push(cell);
    }
    if plan.technical {
        row.push(Element::new("td"));
    }
    Some(Element::new("tfoot").child(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::render_body;
    use crate::link::RouteLinks;
    use crate::plan::RenderMode;
    use std::sync::Arc;
    use tabula_core::{
        PropertyDescriptor, RenderOptions, TableColumn, TableDisplay, TableEdit, TypeDescriptor,
    };

    fn ty(edit: Option<TableEdit>) -> Arc<TypeDescriptor> {
        let builder = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::text("Name"))
            .property(PropertyDescriptor::decimal("Cost").column(TableColumn::default().total()))
            .display(TableDisplay::default().row_numbers());
        match edit {
            Some(edit) => builder.edit(edit).build().unwrap(),
            None => builder.build().unwrap(),
        }
    }

    #[test]
    fn test_read_only_footer_with_totals() {
        let ty = ty(None);
        let options = RenderOptions::default();
        let links = RouteLinks::default();
        let mut ctx = TableRenderContext::new("Foos", &ty, RenderMode::ReadOnly, &options, &links);
        let rows: Vec<_> = ["1000.5", "0.25"]
            .into_iter()
            .map(|c| Value::object([("Cost", Value::Decimal(c.parse().unwrap()))]))
            .collect();
        render_body(&mut ctx, &rows);
        assert_eq!(
            render_footer(&ctx).unwrap().to_html(),
            concat!(
                "<tfoot><tr><td></td><td></td>",
                r#"<td><div class="footer-total" data-format="{0:N2}">1,000.75</div></td>"#,
                "</tr></tfoot>"
            )
        );
    }

    #[test]
    fn test_no_footer_without_totals() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::text("Name"))
            .build()
            .unwrap();
        let options = RenderOptions::default();
        let links = RouteLinks::default();
        let ctx = TableRenderContext::new("Foos", &ty, RenderMode::ReadOnly, &options, &links);
        assert!(render_footer(&ctx).is_none());
    }

    #[test]
    fn test_editable_footer_has_add_button() {
        let ty = ty(Some(TableEdit::default()));
        let options = RenderOptions::default();
        let links = RouteLinks::default();
        let ctx = TableRenderContext::new("Foos", &ty, RenderMode::Editable, &options, &links);
        let html = render_footer(&ctx).unwrap().to_html();
        assert!(html.contains(
            r#"<td class="button-cell"><button class="table-button add-button" type="button"></button></td><td></td></tr>"#
        ));
        assert!(html.contains(r#"data-format="{0:N2}">0.00</div>"#));
    }

    #[test]
    fn test_editable_footer_without_additions() {
        let ty = ty(Some(TableEdit::default().no_additions()));
        let options = RenderOptions::default();
        let links = RouteLinks::default();
        let ctx = TableRenderContext::new("Foos", &ty, RenderMode::Editable, &options, &links);
        let html = render_footer(&ctx).unwrap().to_html();
        assert!(!html.contains("add-button"));
        assert!(html.contains(r#"<td class="button-cell"></td>"#));
    }
}
