#![forbid(unsafe_code)]

//! Property tests for the reflow and toggle invariants:
//!
//! - after any rebuild, the row-pair count is `ceil(items / columns)` and
//!   every item and pop sits in exactly one row pair, in index order;
//! - rebuilding with unchanged inputs changes nothing;
//! - any toggle sequence leaves at most one item/pop/row active, and the
//!   three markers agree;
//! - the expanded pop survives a breakpoint-driven column change.

use proptest::prelude::*;

use hedgerow::prelude::*;
use hedgerow::ConditionRegistry;
use hedgerow_core::StaticHost;

const BREAKPOINT: &str = "(max-width: 560px)";

fn build(
    items: usize,
    columns: u16,
) -> (ElementTree, StaticHost, Widget, Vec<ElementId>, Vec<ElementId>) {
    let mut tree = ElementTree::new();
    let container = tree.create("album-view");
    let mut item_ids = Vec::new();
    let mut pop_ids = Vec::new();
    for _ in 0..items {
        let item = tree.create("album");
        let pop = tree.create("track-list");
        tree.append_child(container, item);
        tree.append_child(container, pop);
        item_ids.push(item);
        pop_ids.push(pop);
    }

    let registry = ConditionRegistry::shared();
    let mut host = StaticHost::with_columns(columns);
    host.set_matching(BREAKPOINT, true);
    let config = WidgetConfig::new("album", "track-list")
        .watch(Watch::Conditions(vec![BREAKPOINT.into()]));
    let widget = Widget::create(&mut tree, &host, &registry, container, config).unwrap();
    (tree, host, widget, item_ids, pop_ids)
}

fn assert_distribution(
    tree: &ElementTree,
    widget: &Widget,
    items: &[ElementId],
    pops: &[ElementId],
) -> std::result::Result<(), TestCaseError> {
    let columns = widget.columns() as usize;
    let expected_pairs = items.len().div_ceil(columns);
    prop_assert_eq!(widget.row_pairs().len(), expected_pairs);

    let mut seen_items = Vec::new();
    let mut seen_pops = Vec::new();
    for pair in widget.row_pairs() {
        let row_items = tree.children(pair.item_row);
        let row_pops = tree.children(pair.pop_row);
        prop_assert_eq!(row_items.len(), row_pops.len());
        prop_assert!(row_items.len() <= columns);
        seen_items.extend_from_slice(row_items);
        seen_pops.extend_from_slice(row_pops);
    }
    prop_assert_eq!(seen_items.as_slice(), items);
    prop_assert_eq!(seen_pops.as_slice(), pops);
    Ok(())
}

fn assert_exclusive(
    tree: &ElementTree,
    widget: &Widget,
    items: &[ElementId],
    pops: &[ElementId],
) -> std::result::Result<(), TestCaseError> {
    let active_items = items
        .iter()
        .filter(|&&i| tree.has_marker(i, Markers::ITEM_ACTIVE))
        .count();
    let active_pops = pops
        .iter()
        .filter(|&&p| tree.has_marker(p, Markers::POP_ACTIVE))
        .count();
    let active_rows = widget
        .row_pairs()
        .iter()
        .filter(|p| tree.has_marker(p.pop_row, Markers::ROW_ACTIVE))
        .count();
    prop_assert!(active_items <= 1);
    prop_assert_eq!(active_items, active_pops);
    prop_assert_eq!(active_pops, active_rows);
    if let Some(index) = widget.active_index(tree) {
        let row = widget.row_pairs()[index / widget.columns() as usize];
        prop_assert!(tree.has_marker(row.pop_row, Markers::ROW_ACTIVE));
        prop_assert!(tree.has_marker(items[index], Markers::ITEM_ACTIVE));
    }
    Ok(())
}

proptest! {
    #[test]
    fn every_pair_lands_in_exactly_one_row(items in 0usize..40, columns in 1u16..8) {
        let (tree, _host, widget, item_ids, pop_ids) = build(items, columns);
        assert_distribution(&tree, &widget, &item_ids, &pop_ids)?;
    }

    #[test]
    fn rebuild_with_unchanged_inputs_is_identity(items in 0usize..30, columns in 1u16..6) {
        let (mut tree, _host, mut widget, ..) = build(items, columns);
        let pairs = widget.row_pairs().to_vec();
        let structure = tree.snapshot(widget.container()).unwrap();

        widget.rebuild(&mut tree).unwrap();
        prop_assert_eq!(widget.row_pairs(), pairs.as_slice());
        prop_assert_eq!(tree.snapshot(widget.container()).unwrap(), structure);
    }

    #[test]
    fn toggle_sequences_stay_exclusive(
        items in 1usize..20,
        columns in 1u16..6,
        sequence in prop::collection::vec(0usize..20, 0..12),
    ) {
        let (mut tree, _host, mut widget, item_ids, pop_ids) = build(items, columns);
        for index in sequence {
            let _ = widget.toggle(&mut tree, index);
            assert_exclusive(&tree, &widget, &item_ids, &pop_ids)?;
        }
    }

    #[test]
    fn double_toggle_returns_to_inactive(items in 1usize..20, columns in 1u16..6, pick in 0usize..20) {
        let (mut tree, _host, mut widget, item_ids, pop_ids) = build(items, columns);
        let index = pick % items;
        prop_assert_eq!(widget.toggle(&mut tree, index).unwrap(), ToggleOutcome::Opened);
        prop_assert_eq!(widget.toggle(&mut tree, index).unwrap(), ToggleOutcome::Closed);
        prop_assert_eq!(widget.active_index(&tree), None);
        assert_exclusive(&tree, &widget, &item_ids, &pop_ids)?;
    }

    #[test]
    fn expanded_pop_survives_column_change(
        items in 1usize..24,
        before in 1u16..6,
        after in 1u16..6,
        pick in 0usize..24,
    ) {
        let (mut tree, mut host, mut widget, item_ids, pop_ids) = build(items, before);
        let index = pick % items;
        widget.toggle(&mut tree, index).unwrap();

        host.set_columns(Some(after));
        widget.on_condition_change(&mut tree, &host, BREAKPOINT).unwrap();

        prop_assert_eq!(widget.columns(), after);
        prop_assert_eq!(widget.active_index(&tree), Some(index));
        assert_distribution(&tree, &widget, &item_ids, &pop_ids)?;
        assert_exclusive(&tree, &widget, &item_ids, &pop_ids)?;
    }
}
