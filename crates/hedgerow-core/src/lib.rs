#![forbid(unsafe_code)]

//! Core model types for Hedgerow.
//!
//! This crate holds the pieces the widget crate builds on: a retained
//! [`tree::ElementTree`] arena, the [`marker::Markers`] flag set, and the
//! [`host::HostEnv`] trait through which the hosting environment is
//! consumed.

pub mod host;
pub mod marker;
pub mod tree;

pub use host::HostEnv;
#[cfg(any(test, feature = "test-helpers"))]
pub use host::StaticHost;
pub use marker::Markers;
pub use tree::{ElementId, ElementSnapshot, ElementTree, Selector};
