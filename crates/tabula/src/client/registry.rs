//! One controller per table.

use super::{ClientError, TableController};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tabula_core::{Behavior, Element, RenderOptions};
use tracing::debug;

/// Controllers of the editable tables on a page, keyed by table id.
#[derive(Debug, Default)]
pub struct TableRegistry {
    controllers: HashMap<String, TableController>,
}

impl TableRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a controller to `table` unless one is already bound to a table
    /// with the same id, in which case the existing controller is returned and
    /// `table` is dropped.
    pub fn attach(
        &mut self,
        table: Element,
        available: &[Behavior],
        options: &RenderOptions,
    ) -> Result<&mut TableController, ClientError> {
        let id = table.get_attr("id").unwrap_or_default().to_string();
        match self.controllers.entry(id) {
            Entry::Occupied(entry) => {
                debug!(table = %entry.key(), "controller already attached");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let controller = TableController::attach(table, available, options)?;
                Ok(entry.insert(controller))
            }
        }
    }

    /// Controller bound to the table with `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TableController> {
        self.controllers.get(id)
    }

    /// Mutable [`TableRegistry::get`].
    pub fn get_mut(&mut self, id: &str) -> Option<&mut TableController> {
        self.controllers.get_mut(id)
    }

    /// Unbind and return the controller of the table with `id`.
    pub fn detach(&mut self, id: &str) -> Option<TableController> {
        self.controllers.remove(id)
    }

    /// Number of bound tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Whether no table is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
