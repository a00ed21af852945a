//! Row-lifecycle state contract.
//!
//! The client controller follows the Elm Architecture:
//! `State + Message → (State, Command)`. Messages are user actions on a
//! rendered table; commands describe the side effects the host page has to
//! carry out (binding enhancement behaviors, re-parsing validation, moving
//! focus, raising events, posting the form).
//!
//! # Examples
//!
//! ```
//! use tabula_core::{Command, State};
//!
//! #[derive(Default)]
//! struct Counter {
//!     rows: usize,
//! }
//!
//! enum Msg {
//!     Add,
//! }
//!
//! impl State for Counter {
//!     type Message = Msg;
//!     type Error = std::convert::Infallible;
//!
//!     fn update(&mut self, msg: Msg) -> Result<Command, Self::Error> {
//!         match msg {
//!             Msg::Add => self.rows += 1,
//!         }
//!         Ok(Command::None)
//!     }
//! }
//!
//! let mut state = Counter::default();
//! state.update(Msg::Add).unwrap();
//! assert_eq!(state.rows, 1);
//! ```

use serde::{Deserialize, Serialize};

/// Stateful component driven by messages.
pub trait State {
    /// Message type for state updates.
    type Message;
    /// Error returned when a message cannot be applied.
    type Error;

    /// Update state in response to a message.
    ///
    /// Returns a command describing side effects for the host.
    fn update(&mut self, msg: Self::Message) -> Result<Command, Self::Error>;
}

/// Client enhancement behaviors a table may rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Numeric input formatting.
    NumericInput,
    /// Searchable select.
    SearchableSelect,
    /// Date picker.
    DatePicker,
}

impl Behavior {
    /// Every behavior, in binding order.
    pub const ALL: [Self; 3] = [Self::NumericInput, Self::SearchableSelect, Self::DatePicker];

    /// CSS class marking controls that need this behavior.
    #[must_use]
    pub const fn marker_class(self) -> &'static str {
        match self {
            Self::NumericInput => "numeric-input",
            Self::SearchableSelect => "select-input",
            Self::DatePicker => "datepicker-input",
        }
    }
}

/// Events raised on the table element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableEvent {
    /// An existing row was archived.
    RowDeleted {
        /// Index token of the row.
        token: String,
    },
    /// An archived row was restored.
    RowActivated {
        /// Index token of the row.
        token: String,
    },
}

impl TableEvent {
    /// Event name as dispatched on the page.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RowDeleted { .. } => "rowDeleted.table",
            Self::RowActivated { .. } => "rowActivated.table",
        }
    }
}

/// Side effects requested by a state update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Command {
    /// No command.
    #[default]
    None,
    /// Execute multiple commands.
    Batch(Vec<Command>),
    /// Attach an enhancement behavior to the named controls.
    Bind {
        /// Behavior to attach.
        behavior: Behavior,
        /// Control names.
        controls: Vec<String>,
    },
    /// Re-parse validation rules for the named controls.
    Revalidate {
        /// Control names.
        controls: Vec<String>,
    },
    /// Drop validation rules of removed controls.
    DropValidation {
        /// Control names.
        controls: Vec<String>,
    },
    /// Move focus to a control.
    Focus {
        /// Control name.
        control: String,
    },
    /// Raise a table event.
    Emit(TableEvent),
    /// Post the form.
    Submit {
        /// Name/value pairs in document order.
        payload: Vec<(String, String)>,
    },
}

impl Command {
    /// Create a batch of commands, skipping empty ones.
    pub fn batch(commands: impl IntoIterator<Item = Self>) -> Self {
        let commands: Vec<Self> = commands.into_iter().filter(|c| !c.is_none()).collect();
        match commands.len() {
            0 => Self::None,
            _ => Self::Batch(commands),
        }
    }

    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Commands in execution order, with batches flattened.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
