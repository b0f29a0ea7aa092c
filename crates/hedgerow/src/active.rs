#![forbid(unsafe_code)]

//! Active-state tracking.
//!
//! At most one item, one pop, and one row pair carry an active marker at
//! any time. Activating an index closes whatever was open before it;
//! activating an already-open index closes it.

use hedgerow_core::{ElementId, ElementTree, Markers};

use crate::layout::RowPair;
use crate::{Result, WidgetError};

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The indexed pop is now expanded.
    Opened,
    /// The indexed pop was expanded and is now closed.
    Closed,
}

/// Index of the currently expanded pop, if any.
pub(crate) fn active_index(tree: &ElementTree, pops: &[ElementId]) -> Option<usize> {
    pops.iter()
        .position(|&p| tree.has_marker(p, Markers::POP_ACTIVE))
}

/// Toggle the item/pop pair at `index`.
pub fn toggle(
    tree: &mut ElementTree,
    items: &[ElementId],
    pops: &[ElementId],
    pairs: &[RowPair],
    index: usize,
) -> Result<ToggleOutcome> {
    let len = items.len();
    let (Some(&item), Some(&pop)) = (items.get(index), pops.get(index)) else {
        return Err(WidgetError::UnresolvedToggleIndex { index, len });
    };

    if tree.has_marker(pop, Markers::POP_ACTIVE) {
        tree.remove_marker(item, Markers::ITEM_ACTIVE);
        tree.remove_marker(pop, Markers::POP_ACTIVE);
        if let Some(row) = containing_row(tree, pairs, pop) {
            tree.remove_marker(row, Markers::ROW_ACTIVE);
        }
        return Ok(ToggleOutcome::Closed);
    }

    // Close whatever was open before opening `index`.
    if let Some(prev) = active_index(tree, pops) {
        tree.remove_marker(items[prev], Markers::ITEM_ACTIVE);
        tree.remove_marker(pops[prev], Markers::POP_ACTIVE);
        if let Some(row) = containing_row(tree, pairs, pops[prev]) {
            tree.remove_marker(row, Markers::ROW_ACTIVE);
        }
    }

    tree.insert_marker(item, Markers::ITEM_ACTIVE);
    tree.insert_marker(pop, Markers::POP_ACTIVE);
    if let Some(row) = containing_row(tree, pairs, pop) {
        tree.insert_marker(row, Markers::ROW_ACTIVE);
    }
    Ok(ToggleOutcome::Opened)
}

/// The pop row currently containing `pop`.
fn containing_row(tree: &ElementTree, pairs: &[RowPair], pop: ElementId) -> Option<ElementId> {
    let parent = tree.parent(pop)?;
    pairs
        .iter()
        .find(|pair| pair.pop_row == parent)
        .map(|pair| pair.pop_row)
}
