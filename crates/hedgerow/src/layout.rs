#![forbid(unsafe_code)]

//! Layout building and reconciliation.
//!
//! `rebuild` reconciles the row-pair containers under a widget's container
//! against the current item count and column count, then redistributes
//! items and pops into them. Row containers are reused wherever possible
//! (a reused row keeps its element key and whatever markers it carries),
//! and pairs are always added or removed as a unit.

use hedgerow_core::{ElementId, ElementTree, Markers};

use crate::rows;
use crate::{Result, WidgetError};

/// Tag given to row containers created by the builder.
pub const ROW_TAG: &str = "hedgerow-row";

/// Matched item-row/pop-row unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPair {
    /// Row holding up to `columns` items.
    pub item_row: ElementId,
    /// Row holding the matching pops.
    pub pop_row: ElementId,
}

/// Rebuild the grid under `container`.
///
/// Detaches items, pops, and row containers into a holding state, applies
/// the allocator's delta to `pairs`, redistributes item *i* and pop *i*
/// into row pair `i / columns`, and reattaches the finished rows in one
/// pass. An expanded pop keeps its expansion across the rebuild; its new
/// containing row pair ends up as the one carrying [`Markers::ROW_ACTIVE`].
pub fn rebuild(
    tree: &mut ElementTree,
    container: ElementId,
    items: &[ElementId],
    pops: &[ElementId],
    pairs: &mut Vec<RowPair>,
    columns: u16,
) -> Result<()> {
    let delta = rows::row_delta(items.len(), columns, pairs.len())?;
    if items.len() != pops.len() {
        return Err(WidgetError::ItemPopMismatch {
            items: items.len(),
            pops: pops.len(),
        });
    }

    // Which pop is expanded, before anything moves.
    let active = pops
        .iter()
        .position(|&p| tree.has_marker(p, Markers::POP_ACTIVE));

    // Free the items and pops, then pull the row containers out of the
    // container. Reused rows keep their keys.
    for &id in items.iter().chain(pops) {
        tree.detach(id);
    }
    for pair in pairs.iter() {
        tree.detach(pair.item_row);
        tree.detach(pair.pop_row);
    }

    if delta > 0 {
        for _ in 0..delta {
            let item_row = tree.create(ROW_TAG);
            tree.insert_marker(item_row, Markers::ITEM_ROW);
            let pop_row = tree.create(ROW_TAG);
            tree.insert_marker(pop_row, Markers::POP_ROW);
            pairs.push(RowPair { item_row, pop_row });
        }
    } else {
        for _ in 0..delta.unsigned_abs() {
            if let Some(pair) = pairs.pop() {
                tree.remove(pair.item_row);
                tree.remove(pair.pop_row);
            }
        }
    }

    tracing::trace!(
        items = items.len(),
        columns,
        delta,
        pairs = pairs.len(),
        "row reconcile"
    );

    // Distribute in index order: pair i lands in row i / columns.
    for (i, (&item, &pop)) in items.iter().zip(pops).enumerate() {
        let pair = &pairs[i / columns as usize];
        tree.set_pair_index(item, i as u32);
        tree.insert_marker(item, Markers::ITEM);
        tree.set_pair_index(pop, i as u32);
        tree.insert_marker(pop, Markers::POP);
        tree.append_child(pair.item_row, item);
        tree.append_child(pair.pop_row, pop);
    }

    // One attach pass: the container never sees a half-built layout.
    for pair in pairs.iter() {
        tree.append_child(container, pair.item_row);
        tree.append_child(container, pair.pop_row);
    }

    mark_active_row(tree, pairs, active.map(|i| i / columns as usize));
    Ok(())
}

/// Row activity is derived: the pair holding the expanded pop carries
/// [`Markers::ROW_ACTIVE`] on its pop row, every other pair does not.
pub(crate) fn mark_active_row(tree: &mut ElementTree, pairs: &[RowPair], active: Option<usize>) {
    for (r, pair) in pairs.iter().enumerate() {
        if Some(r) == active {
            tree.insert_marker(pair.pop_row, Markers::ROW_ACTIVE);
        } else {
            tree.remove_marker(pair.pop_row, Markers::ROW_ACTIVE);
        }
    }
}
