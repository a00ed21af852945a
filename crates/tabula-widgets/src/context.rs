//! Per-render state threaded through the table passes.

use crate::link::LinkResolver;
use crate::lists::SelectOption;
use crate::plan::{ColumnPlan, RenderMode};
use std::collections::HashMap;
use std::sync::Arc;
use tabula_core::{Element, RenderOptions, TypeDescriptor};

/// Everything one table render reads and mutates.
///
/// A context is created by the top-level render call and dropped when it
/// returns; renders never share one.
pub struct TableRenderContext<'a> {
    /// Column plan, with its running totals and repeat caches.
    pub plan: ColumnPlan,
    /// Fully qualified field name of the collection.
    pub field: String,
    /// Row type.
    pub row_type: Arc<TypeDescriptor>,
    /// Labels and tokens.
    pub options: &'a RenderOptions,
    /// Route generation.
    pub links: &'a dyn LinkResolver,
    /// Rows may be added client-side.
    pub allow_additions: bool,
    /// Rows may be deleted or archived client-side.
    pub allow_deletions: bool,
    /// Active-flag property name.
    pub active_property: Option<String>,
    /// Dirty-flag property name.
    pub dirty_property: Option<String>,
    /// Select lists by column index.
    pub select_lists: HashMap<usize, Vec<SelectOption>>,
    /// Suggestion lists: datalist id and options, in column order.
    pub data_lists: Vec<(String, Vec<String>)>,
    /// Hidden inputs of the row being rendered.
    pub hidden: Vec<Element>,
    /// The row being rendered is archived.
    pub archived: bool,
}

impl<'a> TableRenderContext<'a> {
    /// Context for rendering `row_type` rows under `field`.
    pub fn new(
        field: impl Into<String>,
        row_type: &Arc<TypeDescriptor>,
        mode: RenderMode,
        options: &'a RenderOptions,
        links: &'a dyn LinkResolver,
    ) -> Self {
        let editable = mode == RenderMode::Editable;
        Self {
            plan: ColumnPlan::build(row_type, mode),
            field: field.into(),
            row_type: Arc::clone(row_type),
            options,
            links,
            allow_additions: editable && row_type.allow_additions(),
            allow_deletions: editable && row_type.allow_deletions(),
            active_property: row_type
                .active_property()
                .filter(|_| editable)
                .map(str::to_string),
            dirty_property: row_type
                .dirty_property()
                .filter(|_| editable)
                .map(str::to_string),
            select_lists: HashMap::new(),
            data_lists: Vec::new(),
            hidden: Vec::new(),
            archived: false,
        }
    }

    /// Whether the table is editable.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.plan.mode == RenderMode::Editable
    }
}

impl std::fmt::Debug for TableRenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRenderContext")
            .field("field", &self.field)
            .field("row_type", &self.row_type.name)
            .field("mode", &self.plan.mode)
            .field("archived", &self.archived)
            .finish_non_exhaustive()
    }
}

/// Datalist element id for a property.
#[must_use]
pub fn data_list_id(property: &str) -> String {
    format!("{}-datalist", property.to_lowercase())
}
