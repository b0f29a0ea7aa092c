#![forbid(unsafe_code)]

//! Marker flags carried by elements.
//!
//! Markers replace presentation class names. The widget reasons purely in
//! flags; the host maps whichever flags it cares about back to its own
//! styling vocabulary.

use bitflags::bitflags;

bitflags! {
    /// Structural and state markers stamped onto elements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Markers: u16 {
        /// Container a widget is mounted on.
        const ROOT        = 1 << 0;
        /// Summary cell.
        const ITEM        = 1 << 1;
        /// Expandable detail panel.
        const POP         = 1 << 2;
        /// Row container holding items.
        const ITEM_ROW    = 1 << 3;
        /// Row container holding pops.
        const POP_ROW     = 1 << 4;
        /// The currently expanded item.
        const ITEM_ACTIVE = 1 << 5;
        /// The currently expanded pop.
        const POP_ACTIVE  = 1 << 6;
        /// The pop row of the pair containing the expanded pop.
        const ROW_ACTIVE  = 1 << 7;
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(Markers::default().is_empty());
    }

    #[test]
    fn flags_are_distinct() {
        let all = [
            Markers::ROOT,
            Markers::ITEM,
            Markers::POP,
            Markers::ITEM_ROW,
            Markers::POP_ROW,
            Markers::ITEM_ACTIVE,
            Markers::POP_ACTIVE,
            Markers::ROW_ACTIVE,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!((*a & *b).is_empty(), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn insert_and_remove_compose() {
        let mut m = Markers::ITEM | Markers::ITEM_ACTIVE;
        m.remove(Markers::ITEM_ACTIVE);
        assert_eq!(m, Markers::ITEM);
        m.insert(Markers::ITEM_ACTIVE);
        assert!(m.contains(Markers::ITEM | Markers::ITEM_ACTIVE));
    }
}
