//! Table header.

use crate::context::TableRenderContext;
use tabula_core::Element;

fn header_cell(text: &str, class: Option<&str>) -> Element {
    let mut cell = Element::new("th").text(text);
    if let Some(class) = class {
        cell.add_class(class);
    }
    cell
}

/// `<thead>` with one cell per visible column plus the structural cells.
pub fn render_header(ctx: &TableRenderContext<'_>) -> Element {
    let plan = &ctx.plan;
    let mut row = Element::new("tr");
    if plan.row_numbers {
        row.push(header_cell(&ctx.options.row_number_header, None));
    }
    for column in plan.visible() {
        row.push(header_cell(&column.label, None));
    }
    if plan.details_link {
        row.push(header_cell("", None));
    }
    if plan.edit_link {
        row.push(header_cell("", None));
    }
    if plan.buttons {
        row.push(header_cell("", Some("button-header-cell")));
    }
    if plan.technical {
        row.push(header_cell("", Some("hidden-header-cell")));
    }
    Element::new("thead").child(row)
}
