#![forbid(unsafe_code)]

//! The host-environment seam.
//!
//! Everything the widget needs from its surroundings arrives through
//! [`HostEnv`]: the styling hook that encodes columns-per-row,
//! media-condition state, and the set of conditional rules present in
//! active style sources. The widget never talks to a renderer directly.

use crate::tree::{ElementId, ElementTree};

/// Narrow interface to the hosting environment.
pub trait HostEnv {
    /// Columns-per-row value the host's active styling encodes for
    /// `element`, or `None` when the styling does not specify one.
    fn columns_hint(&self, tree: &ElementTree, element: ElementId) -> Option<u16>;

    /// Whether a media condition currently matches.
    fn condition_matches(&self, condition: &str) -> bool;

    /// Conditional-rule texts from the host's active style sources.
    ///
    /// Implementations skip sources that refuse enumeration. Duplicates
    /// are tolerated; callers deduplicate.
    fn style_conditions(&self) -> Vec<String>;
}

/// Fixed-answer host for tests.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    columns: Option<u16>,
    conditions: Vec<String>,
    matching: std::collections::HashSet<String>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl StaticHost {
    /// Host with no columns hint and no conditions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose styling encodes the given columns-per-row value.
    pub fn with_columns(columns: u16) -> Self {
        Self {
            columns: Some(columns),
            ..Self::default()
        }
    }

    /// Replace the columns hint.
    pub fn set_columns(&mut self, columns: Option<u16>) {
        self.columns = columns;
    }

    /// Append conditional-rule texts to the simulated style sources.
    pub fn add_conditions<I, S>(&mut self, conditions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.extend(conditions.into_iter().map(Into::into));
    }

    /// Mark a condition as currently matching or not.
    pub fn set_matching(&mut self, condition: &str, matches: bool) {
        if matches {
            self.matching.insert(condition.to_string());
        } else {
            self.matching.remove(condition);
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl HostEnv for StaticHost {
    fn columns_hint(&self, _tree: &ElementTree, _element: ElementId) -> Option<u16> {
        self.columns
    }

    fn condition_matches(&self, condition: &str) -> bool {
        self.matching.contains(condition)
    }

    fn style_conditions(&self) -> Vec<String> {
        self.conditions.clone()
    }
}
