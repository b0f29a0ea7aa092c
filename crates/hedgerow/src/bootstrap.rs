#![forbid(unsafe_code)]

//! Declarative construction.
//!
//! Elements tagged with the [`CONFIG_ATTR`] attribute carry a serialized
//! [`WidgetConfig`] blob; the bootstrap sweep finds them and mounts a
//! widget on each. One malformed blob never aborts the sweep.

use hedgerow_core::{ElementId, ElementTree, HostEnv};

use crate::breakpoints::SharedRegistry;
use crate::config::WidgetConfig;
use crate::widget::Widget;

/// Attribute carrying a serialized widget configuration.
pub const CONFIG_ATTR: &str = "data-hedgerow";

/// Mount a widget on every element under `root` (inclusive) tagged with
/// [`CONFIG_ATTR`]. Malformed blobs and failed constructions are logged
/// and skipped; successfully mounted widgets are returned in document
/// order.
pub fn bootstrap(
    tree: &mut ElementTree,
    host: &dyn HostEnv,
    registry: &SharedRegistry,
    root: ElementId,
) -> Vec<Widget> {
    let mut tagged: Vec<(ElementId, String)> = Vec::new();
    for id in std::iter::once(root).chain(tree.descendants(root)) {
        if let Some(blob) = tree.attr(id, CONFIG_ATTR) {
            tagged.push((id, blob.to_string()));
        }
    }

    let mut widgets = Vec::new();
    for (container, blob) in tagged {
        let config: WidgetConfig = match serde_json::from_str(&blob) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(%err, "skipping malformed widget config");
                continue;
            }
        };
        match Widget::create(tree, host, registry, container, config) {
            Ok(widget) => widgets.push(widget),
            Err(err) => {
                tracing::warn!(%err, "skipping widget bootstrap");
            }
        }
    }
    widgets
}
