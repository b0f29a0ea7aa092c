#![forbid(unsafe_code)]

//! Widget controller.
//!
//! Owns the element collections and wires the allocator, layout builder,
//! active tracker, and breakpoint machinery together. Construction
//! validates everything up front and fails without touching the tree;
//! after construction, operations log their failures and leave prior
//! state untouched rather than unwinding into the host event loop.

use hedgerow_core::{ElementId, ElementSnapshot, ElementTree, HostEnv, Markers};

use crate::active::{self, ToggleOutcome};
use crate::breakpoints::{self, ConditionSubscription, SharedRegistry};
use crate::config::{Columns, Watch, WidgetConfig};
use crate::layout::{self, RowPair};
use crate::rows;
use crate::{Result, WidgetError};

/// Columns-per-row applied when the host styling gives no hint.
pub const DEFAULT_COLUMNS: u16 = 1;

/// What a delegated click resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click landed on (or inside) an item and toggled it.
    Toggled(ToggleOutcome),
    /// The click resolved to no item.
    Ignored,
}

/// Row-pair bookkeeping: what exists versus what the current item count
/// and column count require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStats {
    /// Row pairs currently materialized.
    pub existing: usize,
    /// Row pairs the layout needs.
    pub needed: usize,
}

/// An adaptive grid mounted on one container element.
#[derive(Debug)]
pub struct Widget {
    container: ElementId,
    config: WidgetConfig,
    columns: u16,
    items: Vec<ElementId>,
    pops: Vec<ElementId>,
    pairs: Vec<RowPair>,
    snapshot: ElementSnapshot,
    subscription: Option<ConditionSubscription>,
}

impl Widget {
    /// Validate `config` against `container` and mount a widget on it.
    ///
    /// On failure the tree is untouched and no widget exists; the error is
    /// also reported on the diagnostic channel.
    pub fn create(
        tree: &mut ElementTree,
        host: &dyn HostEnv,
        registry: &SharedRegistry,
        container: ElementId,
        config: WidgetConfig,
    ) -> Result<Self> {
        match Self::try_create(tree, host, registry, container, config) {
            Ok(widget) => Ok(widget),
            Err(err) => {
                tracing::error!(%err, "widget construction failed");
                Err(err)
            }
        }
    }

    fn try_create(
        tree: &mut ElementTree,
        host: &dyn HostEnv,
        registry: &SharedRegistry,
        container: ElementId,
        config: WidgetConfig,
    ) -> Result<Self> {
        if !tree.contains(container) {
            return Err(WidgetError::InvalidElement);
        }
        config.validate()?;

        let items = tree.query(container, &config.item_selector);
        let pops = tree.query(container, &config.pop_selector);
        if items.len() != pops.len() {
            return Err(WidgetError::ItemPopMismatch {
                items: items.len(),
                pops: pops.len(),
            });
        }

        let columns = resolve_columns(tree, host, container, config.columns)?;
        let snapshot = tree.snapshot(container).ok_or(WidgetError::InvalidElement)?;

        tree.insert_marker(container, Markers::ROOT);
        let mut widget = Self {
            container,
            config,
            columns,
            items,
            pops,
            pairs: Vec::new(),
            snapshot,
            subscription: None,
        };
        widget.rebuild_layout(tree)?;

        if !matches!(widget.config.watch, Watch::Off) {
            let conditions = breakpoints::resolve_conditions(&widget.config.watch, registry, host);
            if !conditions.is_empty() {
                widget.subscription = Some(ConditionSubscription::watch(registry, conditions));
            }
        }

        tracing::debug!(
            items = widget.items.len(),
            columns = widget.columns,
            pairs = widget.pairs.len(),
            watching = widget.is_watching(),
            "widget mounted"
        );
        Ok(widget)
    }

    /// The container this widget is mounted on.
    pub fn container(&self) -> ElementId {
        self.container
    }

    /// Current effective columns-per-row.
    pub fn columns(&self) -> u16 {
        self.columns
    }

    /// Discovered items, in index order.
    pub fn items(&self) -> &[ElementId] {
        &self.items
    }

    /// Discovered pops, in index order.
    pub fn pops(&self) -> &[ElementId] {
        &self.pops
    }

    /// Materialized row pairs, top to bottom.
    pub fn row_pairs(&self) -> &[RowPair] {
        &self.pairs
    }

    /// Whether any breakpoint conditions are subscribed.
    pub fn is_watching(&self) -> bool {
        self.subscription.is_some()
    }

    /// Index of the currently expanded pop, if any.
    pub fn active_index(&self, tree: &ElementTree) -> Option<usize> {
        active::active_index(tree, &self.pops)
    }

    /// Existing versus needed row pairs.
    pub fn row_stats(&self) -> RowStats {
        RowStats {
            existing: self.pairs.len(),
            needed: rows::needed_pairs(self.items.len(), self.columns).unwrap_or(0),
        }
    }

    /// Expand or close the pair at `index`.
    pub fn toggle(&mut self, tree: &mut ElementTree, index: usize) -> Result<ToggleOutcome> {
        match active::toggle(tree, &self.items, &self.pops, &self.pairs, index) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                tracing::warn!(%err, "toggle refused");
                Err(err)
            }
        }
    }

    /// Relayout with the current stores and column count.
    pub fn rebuild(&mut self, tree: &mut ElementTree) -> Result<()> {
        match self.rebuild_layout(tree) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(%err, "rebuild refused");
                Err(err)
            }
        }
    }

    fn rebuild_layout(&mut self, tree: &mut ElementTree) -> Result<()> {
        layout::rebuild(
            tree,
            self.container,
            &self.items,
            &self.pops,
            &mut self.pairs,
            self.columns,
        )
    }

    /// Resolve a click on `target` to an item index and toggle it.
    ///
    /// Walks ancestors from the target up to (but not including) the
    /// container; the first element carrying an item index wins. Clicks
    /// that resolve to no item, including clicks inside pops, are
    /// ignored.
    pub fn handle_click(&mut self, tree: &mut ElementTree, target: ElementId) -> ClickOutcome {
        let Some(index) = self.resolve_click(tree, target) else {
            return ClickOutcome::Ignored;
        };
        match self.toggle(tree, index) {
            Ok(outcome) => ClickOutcome::Toggled(outcome),
            Err(_) => ClickOutcome::Ignored,
        }
    }

    fn resolve_click(&self, tree: &ElementTree, target: ElementId) -> Option<usize> {
        if !tree.contains(target) {
            return None;
        }
        let mut cur = target;
        loop {
            if cur == self.container {
                return None;
            }
            if tree.has_marker(cur, Markers::ITEM) {
                if let Some(index) = tree.pair_index(cur) {
                    return Some(index as usize);
                }
            }
            cur = tree.parent(cur)?;
        }
    }

    /// React to a change notification for a breakpoint condition.
    ///
    /// Recomputes the effective column count from the host style hook and
    /// relayouts only when it changed. Returns whether a relayout ran.
    /// Notifications for conditions this widget does not watch, or for
    /// conditions that no longer match, are ignored.
    pub fn on_condition_change(
        &mut self,
        tree: &mut ElementTree,
        host: &dyn HostEnv,
        condition: &str,
    ) -> Result<bool> {
        let watched = self
            .subscription
            .as_ref()
            .is_some_and(|sub| sub.covers(condition));
        if !watched || !host.condition_matches(condition) {
            return Ok(false);
        }

        let columns = host
            .columns_hint(tree, self.container)
            .unwrap_or(DEFAULT_COLUMNS);
        if columns == 0 {
            tracing::warn!(%condition, "ignoring zero columns hint from host");
            return Ok(false);
        }
        if columns == self.columns {
            return Ok(false);
        }

        tracing::debug!(%condition, from = self.columns, to = columns, "breakpoint reflow");
        self.columns = columns;
        self.rebuild(tree)?;
        Ok(true)
    }

    /// Re-discover items and pops from the container's current contents.
    ///
    /// Fails with [`WidgetError::ItemPopMismatch`] on uneven counts,
    /// leaving the stores untouched. On success, stable indices are
    /// reassigned and the layout rebuilt.
    pub fn reset_stores(&mut self, tree: &mut ElementTree) -> Result<()> {
        let items = tree.query(self.container, &self.config.item_selector);
        let pops = tree.query(self.container, &self.config.pop_selector);
        if items.len() != pops.len() {
            let err = WidgetError::ItemPopMismatch {
                items: items.len(),
                pops: pops.len(),
            };
            tracing::warn!(%err, "store reset refused");
            return Err(err);
        }
        self.items = items;
        self.pops = pops;
        self.rebuild(tree)
    }

    /// Tear the widget down: release breakpoint subscriptions and restore
    /// the container to its pre-widget structure.
    pub fn destroy(mut self, tree: &mut ElementTree) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
        tree.restore(self.container, &self.snapshot);
        tracing::debug!("widget destroyed");
    }
}

fn resolve_columns(
    tree: &ElementTree,
    host: &dyn HostEnv,
    container: ElementId,
    columns: Columns,
) -> Result<u16> {
    let resolved = match columns {
        Columns::Fixed(n) => n,
        Columns::Auto => host.columns_hint(tree, container).unwrap_or(DEFAULT_COLUMNS),
    };
    if resolved == 0 {
        return Err(WidgetError::InvalidColumns(0));
    }
    Ok(resolved)
}
