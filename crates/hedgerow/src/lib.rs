#![forbid(unsafe_code)]

//! Hedgerow: an adaptive grid of paired summary cells and expandable
//! detail panels.
//!
//! Items and pops are distributed into matched row pairs (an item row plus
//! its pop row) according to a columns-per-row value. Clicking an item
//! expands its pop below the row containing it; at most one pop is
//! expanded at a time. When the host's responsive breakpoints change the
//! effective column count, the grid reflows, reusing row containers and
//! carrying the expanded state across the reflow.
//!
//! The element tree and the host seam live in [`hedgerow_core`]; this
//! crate owns the widget itself.

use std::fmt;

pub mod active;
pub mod bootstrap;
pub mod breakpoints;
pub mod config;
pub mod layout;
pub mod rows;
pub mod widget;

pub use active::ToggleOutcome;
pub use bootstrap::{CONFIG_ATTR, bootstrap};
pub use breakpoints::{ConditionRegistry, ConditionSubscription, SharedRegistry};
pub use config::{Columns, Watch, WidgetConfig};
pub use layout::RowPair;
pub use widget::{ClickOutcome, RowStats, Widget};

pub use hedgerow_core::{ElementId, ElementSnapshot, ElementTree, HostEnv, Markers, Selector};

/// Errors surfaced by widget construction and operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// Construction target is not a live element.
    InvalidElement,
    /// Discovered item and pop counts differ.
    ItemPopMismatch {
        /// Number of items the item selector found.
        items: usize,
        /// Number of pops the pop selector found.
        pops: usize,
    },
    /// Resolved columns-per-row value is zero.
    InvalidColumns(u16),
    /// A selector in the configuration matches nothing by construction.
    EmptySelector,
    /// Toggle index outside the item/pop stores.
    UnresolvedToggleIndex {
        /// The requested index.
        index: usize,
        /// Store length at the time of the call.
        len: usize,
    },
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidElement => write!(f, "construction target is not a live element"),
            Self::ItemPopMismatch { items, pops } => {
                write!(f, "item and pop counts don't match: {items} items, {pops} pops")
            }
            Self::InvalidColumns(n) => write!(f, "invalid columns-per-row value: {n}"),
            Self::EmptySelector => write!(f, "empty selector in configuration"),
            Self::UnresolvedToggleIndex { index, len } => {
                write!(f, "toggle index {index} outside stores of length {len}")
            }
        }
    }
}

impl std::error::Error for WidgetError {}

/// Standard result type for hedgerow APIs.
pub type Result<T> = std::result::Result<T, WidgetError>;

pub mod prelude {
    //! Day-to-day imports.
    pub use crate::{
        Columns, ConditionRegistry, ElementId, ElementTree, HostEnv, Markers, Result, Selector,
        ToggleOutcome, Watch, Widget, WidgetConfig, WidgetError, bootstrap,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_counts() {
        let err = WidgetError::ItemPopMismatch { items: 5, pops: 4 };
        assert_eq!(
            err.to_string(),
            "item and pop counts don't match: 5 items, 4 pops"
        );
    }

    #[test]
    fn errors_render_toggle_index() {
        let err = WidgetError::UnresolvedToggleIndex { index: 9, len: 6 };
        assert_eq!(err.to_string(), "toggle index 9 outside stores of length 6");
    }

    #[test]
    fn error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&WidgetError::InvalidElement);
    }
}
