//! Read-only table body.

use crate::context::TableRenderContext;
use crate::link::LinkResolver;
use crate::plan::{ColumnDescriptor, ColumnLink};
use tabula_core::format::display_text;
use tabula_core::{Element, RenderOptions, Value};

enum Content {
    Text(String),
    Markup(Element),
}

/// `<tbody>` with one row per item.
///
/// Running totals and repeat caches of the plan are updated as rows are
/// rendered.
pub fn render_body(ctx: &mut TableRenderContext<'_>, rows: &[Value]) -> Element {
    let mut body = Element::new("tbody");
    for (i, row) in rows.iter().enumerate() {
        body.push(render_row(ctx, row, i + 1));
    }
    body
}

fn render_row(ctx: &mut TableRenderContext<'_>, row: &Value, number: usize) -> Element {
    let options = ctx.options;
    let links = ctx.links;
    let mut tr = Element::new("tr");
    if ctx.plan.row_numbers {
        tr.push(Element::new("td").text(number.to_string()));
    }
    for column in ctx.plan.columns.iter_mut().filter(|c| c.is_visible()) {
        let value = column.resolve(row);
        column.accumulate(value);
        let cell = match cell_content(column, row, value, options, links) {
            Content::Text(text) => Element::new("td").text(column.suppress_repeat(text)),
            Content::Markup(markup) => {
                if column.suppress_repeat(markup.to_html()).is_empty() {
                    Element::new("td")
                } else {
                    Element::new("td").child(markup)
                }
            }
        };
        tr.push(cell);
    }
    if let Some(display) = &ctx.row_type.display {
        let controller = display.controller.as_deref().unwrap_or_default();
        let id = row.field(&display.id_property).to_input_string();
        let row_links = [
            (ctx.plan.details_link, &display.details_action, &options.details_text, "details-link"),
            (ctx.plan.edit_link, &display.edit_action, &options.edit_text, "edit-link"),
        ];
        for (included, action, text, class) in row_links {
            if let (true, Some(action)) = (included, action) {
                let href = links.action_url(controller, action, &id);
                let anchor = Element::new("a").attr("href", href).class(class).text(text.as_str());
                tr.push(Element::new("td").child(anchor));
            }
        }
    }
    tr
}

fn cell_content(
    column: &ColumnDescriptor,
    row: &Value,
    value: &Value,
    options: &RenderOptions,
    links: &dyn LinkResolver,
) -> Content {
    if !value.is_null() {
        if column.email {
            let address = value.to_input_string();
            let anchor = Element::new("a")
                .attr("href", format!("mailto:{address}"))
                .text(address);
            return Content::Markup(anchor);
        }
        if let Some(link) = &column.link {
            let target = if link.on_container {
                column.container(row)
            } else {
                value
            };
            return Content::Markup(anchor(link, target, options, links));
        }
        if let Some(child) = &column.display_property {
            return Content::Text(display_text(child, value.field(&child.name), options));
        }
    }
    Content::Text(display_text(&column.property, value, options))
}

fn anchor(link: &ColumnLink, target: &Value, options: &RenderOptions, links: &dyn LinkResolver) -> Element {
    let directive = &link.link;
    let id = target.field(&directive.id_property).to_input_string();
    let text = link
        .target
        .property(&directive.display_property)
        .map(|p| display_text(p, target.field(&p.name), options))
        .unwrap_or_default();
    let href = links.action_url(&directive.controller, &directive.action, &id);
    Element::new("a").attr("href", href).text(text)
}
