#![forbid(unsafe_code)]

//! Retained element tree.
//!
//! A slotmap-keyed arena of elements with tags, marker flags, string
//! attributes, and parent/children links. Keys are stable across
//! reparenting, so a container moved between parents keeps its identity,
//! including any markers it carries.
//!
//! Detached subtrees stay alive in the arena until explicitly removed;
//! removal is recursive.

use std::collections::BTreeMap;

use slotmap::{SlotMap, new_key_type};

use crate::marker::Markers;

new_key_type! {
    /// Stable handle to an element.
    pub struct ElementId;
}

/// Tag-based element selector.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(transparent))]
pub struct Selector {
    tag: String,
}

impl Selector {
    /// Select elements whose tag equals `tag`.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// The tag this selector matches.
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Whether the selector matches nothing by construction.
    pub fn is_empty(&self) -> bool {
        self.tag.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    markers: Markers,
    pair_index: Option<u32>,
    attrs: BTreeMap<String, String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Owned structural copy of a subtree.
///
/// Records tags, markers, pair indices, attributes, and child order.
/// Restoring a snapshot produces fresh element keys; only the structure is
/// preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    tag: String,
    markers: Markers,
    pair_index: Option<u32>,
    attrs: BTreeMap<String, String>,
    children: Vec<ElementSnapshot>,
}

/// Arena of elements.
#[derive(Debug, Default)]
pub struct ElementTree {
    nodes: SlotMap<ElementId, Element>,
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached element with the given tag.
    pub fn create(&mut self, tag: impl Into<String>) -> ElementId {
        self.nodes.insert(Element {
            tag: tag.into(),
            ..Element::default()
        })
    }

    /// Whether `id` refers to a live element.
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Tag of an element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.tag.as_str())
    }

    /// Parent of an element, if attached.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Children of an element, in document order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Append `child` as the last child of `parent`, detaching it from its
    /// current parent first. Returns `false` when either id is dead, the
    /// two are equal, or the append would create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.is_descendant(parent, child) {
            return false;
        }
        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        true
    }

    /// Detach an element from its parent. The subtree stays alive.
    pub fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.nodes[parent].children.retain(|&c| c != id);
        self.nodes[id].parent = None;
    }

    /// Remove an element and its whole subtree from the arena.
    pub fn remove(&mut self, id: ElementId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
            }
        }
    }

    /// Whether `id` is a strict descendant of `ancestor`.
    pub fn is_descendant(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut cur = self.parent(id);
        while let Some(node) = cur {
            if node == ancestor {
                return true;
            }
            cur = self.parent(node);
        }
        false
    }

    /// Descendants of `root` in document (pre-order) order, excluding
    /// `root` itself.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Descendants of `root` matching `selector`, in document order.
    pub fn query(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| {
                self.nodes
                    .get(id)
                    .is_some_and(|n| !selector.is_empty() && n.tag == selector.as_str())
            })
            .collect()
    }

    /// Markers of an element; empty for a dead id.
    pub fn markers(&self, id: ElementId) -> Markers {
        self.nodes.get(id).map(|n| n.markers).unwrap_or_default()
    }

    /// Whether an element carries all of `markers`.
    pub fn has_marker(&self, id: ElementId, markers: Markers) -> bool {
        self.markers(id).contains(markers)
    }

    /// Add markers to an element.
    pub fn insert_marker(&mut self, id: ElementId, markers: Markers) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.markers.insert(markers);
        }
    }

    /// Remove markers from an element.
    pub fn remove_marker(&mut self, id: ElementId, markers: Markers) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.markers.remove(markers);
        }
    }

    /// Stable pair index of an element.
    pub fn pair_index(&self, id: ElementId) -> Option<u32> {
        self.nodes.get(id).and_then(|n| n.pair_index)
    }

    /// Set the stable pair index of an element. Idempotent.
    pub fn set_pair_index(&mut self, id: ElementId, index: u32) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.pair_index = Some(index);
        }
    }

    /// Attribute value of an element.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    /// Set an attribute on an element.
    pub fn set_attr(&mut self, id: ElementId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attrs.insert(name.into(), value.into());
        }
    }

    /// Record a structural snapshot of `root` and its subtree.
    pub fn snapshot(&self, root: ElementId) -> Option<ElementSnapshot> {
        let node = self.nodes.get(root)?;
        let children = node
            .children
            .iter()
            .filter_map(|&c| self.snapshot(c))
            .collect();
        Some(ElementSnapshot {
            tag: node.tag.clone(),
            markers: node.markers,
            pair_index: node.pair_index,
            attrs: node.attrs.clone(),
            children,
        })
    }

    /// Restore `root` and its subtree from a snapshot.
    ///
    /// The element's own tag, markers, index, and attributes are reset to
    /// the recorded state; current children are removed recursively and
    /// rebuilt from the snapshot with fresh keys.
    pub fn restore(&mut self, root: ElementId, snapshot: &ElementSnapshot) {
        if !self.contains(root) {
            return;
        }
        for child in self.children(root).to_vec() {
            self.remove(child);
        }
        {
            let node = &mut self.nodes[root];
            node.tag = snapshot.tag.clone();
            node.markers = snapshot.markers;
            node.pair_index = snapshot.pair_index;
            node.attrs = snapshot.attrs.clone();
        }
        for child in &snapshot.children {
            let id = self.materialize(child);
            self.append_child(root, id);
        }
    }

    fn materialize(&mut self, snapshot: &ElementSnapshot) -> ElementId {
        let id = self.nodes.insert(Element {
            tag: snapshot.tag.clone(),
            markers: snapshot.markers,
            pair_index: snapshot.pair_index,
            attrs: snapshot.attrs.clone(),
            parent: None,
            children: Vec::new(),
        });
        for child in &snapshot.children {
            let child_id = self.materialize(child);
            self.append_child(id, child_id);
        }
        id
    }
}
