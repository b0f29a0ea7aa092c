#![forbid(unsafe_code)]

//! Widget configuration.
//!
//! An explicit struct with named, typed fields and documented defaults;
//! host-supplied option bags are never iterated. The serialized form (the
//! bootstrap blob) keeps the historical shorthand: `columns` accepts an
//! integer or `"auto"`, `watch` accepts `true`, `false`, or a list of
//! condition strings.

use std::fmt;

use serde::Deserialize;
use serde::de::{self, Deserializer, SeqAccess, Visitor};

use hedgerow_core::Selector;

use crate::{Result, WidgetError};

/// Column resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Columns {
    /// Query the host style hook at build time; an absent hint means one
    /// column.
    #[default]
    Auto,
    /// Fixed count of item/pop pairs per row.
    Fixed(u16),
}

impl<'de> Deserialize<'de> for Columns {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColumnsVisitor;

        impl Visitor<'_> for ColumnsVisitor {
            type Value = Columns;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "\"auto\" or a column count")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Columns, E> {
                u16::try_from(v)
                    .map(Columns::Fixed)
                    .map_err(|_| E::custom(format!("column count {v} out of range")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Columns, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("column count {v} out of range")))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Columns, E> {
                if v.eq_ignore_ascii_case("auto") {
                    Ok(Columns::Auto)
                } else {
                    Err(E::custom(format!("expected \"auto\", got {v:?}")))
                }
            }
        }

        deserializer.deserialize_any(ColumnsVisitor)
    }
}

/// Breakpoint watching mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Watch {
    /// No reflow on environment changes.
    Off,
    /// Discover conditions from the host's active style sources.
    #[default]
    Discover,
    /// Watch exactly these condition texts.
    Conditions(Vec<String>),
}

impl<'de> Deserialize<'de> for Watch {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WatchVisitor;

        impl<'de> Visitor<'de> for WatchVisitor {
            type Value = Watch;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a boolean or a list of condition strings")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Watch, E> {
                Ok(if v { Watch::Discover } else { Watch::Off })
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Watch, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut conditions = Vec::new();
                while let Some(condition) = seq.next_element::<String>()? {
                    conditions.push(condition);
                }
                Ok(Watch::Conditions(conditions))
            }
        }

        deserializer.deserialize_any(WatchVisitor)
    }
}

/// Widget configuration.
///
/// Defaults: `columns` is [`Columns::Auto`], `watch` is
/// [`Watch::Discover`]. The two selectors have no default: a widget
/// without them has nothing to lay out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WidgetConfig {
    /// Selector discovering the summary cells.
    pub item_selector: Selector,
    /// Selector discovering the detail panels.
    pub pop_selector: Selector,
    /// Column resolution strategy.
    #[serde(default)]
    pub columns: Columns,
    /// Breakpoint watching mode.
    #[serde(default)]
    pub watch: Watch,
}

impl WidgetConfig {
    /// Configuration with the given selectors and default behavior.
    pub fn new(item_selector: impl Into<String>, pop_selector: impl Into<String>) -> Self {
        Self {
            item_selector: Selector::tag(item_selector),
            pop_selector: Selector::tag(pop_selector),
            columns: Columns::default(),
            watch: Watch::default(),
        }
    }

    /// Set the column resolution strategy.
    pub fn columns(mut self, columns: Columns) -> Self {
        self.columns = columns;
        self
    }

    /// Set the breakpoint watching mode.
    pub fn watch(mut self, watch: Watch) -> Self {
        self.watch = watch;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.item_selector.is_empty() || self.pop_selector.is_empty() {
            return Err(WidgetError::EmptySelector);
        }
        Ok(())
    }
}
