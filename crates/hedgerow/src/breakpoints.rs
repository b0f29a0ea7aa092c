#![forbid(unsafe_code)]

//! Breakpoint watching.
//!
//! Widgets subscribe to media conditions either given verbatim in their
//! configuration or discovered from the host's active style sources.
//! Deduplication across widgets is refcounted through a shared
//! [`ConditionRegistry`]: the host creates one registry and passes it to
//! every construction that should share subscriptions. No process-wide
//! state exists.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use hedgerow_core::HostEnv;

use crate::config::Watch;

/// Shared handle to a condition registry.
pub type SharedRegistry = Rc<RefCell<ConditionRegistry>>;

/// Refcounted registry of watched condition texts.
///
/// Discovery results are cached per registry: the first construction that
/// asks for discovery scans the host's style sources, later ones reuse the
/// scan. Hosts whose stylesheets change can rescan by building a fresh
/// registry.
#[derive(Debug, Default)]
pub struct ConditionRegistry {
    watched: HashMap<String, usize>,
    discovered: Option<Vec<String>>,
}

impl ConditionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry behind a shared handle.
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Conditions currently watched by at least one widget, sorted.
    pub fn active(&self) -> Vec<String> {
        let mut out: Vec<String> = self.watched.keys().cloned().collect();
        out.sort();
        out
    }

    /// Whether any widget watches `condition`.
    pub fn is_watched(&self, condition: &str) -> bool {
        self.watched.contains_key(&normalize(condition))
    }

    /// Number of widgets watching `condition`.
    pub fn watch_count(&self, condition: &str) -> usize {
        self.watched.get(&normalize(condition)).copied().unwrap_or(0)
    }

    /// Conditions found in the host's style sources, scanned once per
    /// registry and deduplicated by normalized text.
    pub fn discovered(&mut self, env: &dyn HostEnv) -> Vec<String> {
        if self.discovered.is_none() {
            self.discovered = Some(dedup(env.style_conditions()));
        }
        self.discovered.clone().unwrap_or_default()
    }

    /// Returns true when the condition was not watched before.
    fn acquire(&mut self, condition: &str) -> bool {
        let count = self.watched.entry(normalize(condition)).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Returns true when the last watcher released the condition.
    fn release(&mut self, condition: &str) -> bool {
        let key = normalize(condition);
        match self.watched.get_mut(&key) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                self.watched.remove(&key);
                true
            }
            None => false,
        }
    }
}

/// A widget's claim on a set of conditions.
///
/// Releasing (or dropping) the subscription decrements the registry
/// refcounts; the last release of a condition removes it entirely.
#[derive(Debug)]
pub struct ConditionSubscription {
    registry: SharedRegistry,
    conditions: Vec<String>,
}

impl ConditionSubscription {
    /// Claim `conditions` in the registry. The input is normalized and
    /// deduplicated so release stays symmetric.
    pub fn watch(registry: &SharedRegistry, conditions: Vec<String>) -> Self {
        let conditions = dedup(conditions);
        {
            let mut reg = registry.borrow_mut();
            for condition in &conditions {
                if reg.acquire(condition) {
                    tracing::debug!(%condition, "watching breakpoint condition");
                }
            }
        }
        Self {
            registry: Rc::clone(registry),
            conditions,
        }
    }

    /// The claimed condition texts.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Whether this subscription covers `condition`.
    pub fn covers(&self, condition: &str) -> bool {
        let key = normalize(condition);
        self.conditions.iter().any(|c| *c == key)
    }

    /// Release all claims. Safe to call more than once.
    pub fn release(&mut self) {
        let mut reg = self.registry.borrow_mut();
        for condition in self.conditions.drain(..) {
            if reg.release(&condition) {
                tracing::debug!(%condition, "released breakpoint condition");
            }
        }
    }
}

impl Drop for ConditionSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Resolve a watch mode to the concrete set of condition texts.
pub fn resolve_conditions(
    watch: &Watch,
    registry: &SharedRegistry,
    env: &dyn HostEnv,
) -> Vec<String> {
    match watch {
        Watch::Off => Vec::new(),
        Watch::Conditions(list) => dedup(list.clone()),
        Watch::Discover => registry.borrow_mut().discovered(env),
    }
}

fn normalize(condition: &str) -> String {
    condition.trim().to_string()
}

fn dedup(conditions: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for condition in conditions {
        let key = normalize(&condition);
        if key.is_empty() || out.contains(&key) {
            continue;
        }
        out.push(key);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedgerow_core::StaticHost;

    const NARROW: &str = "(max-width: 560px)";
    const WIDE: &str = "(min-width: 561px)";

    #[test]
    fn watch_and_release_refcount() {
        let registry = ConditionRegistry::shared();
        let mut a = ConditionSubscription::watch(&registry, vec![NARROW.into()]);
        let mut b = ConditionSubscription::watch(&registry, vec![NARROW.into(), WIDE.into()]);

        assert_eq!(registry.borrow().watch_count(NARROW), 2);
        assert_eq!(registry.borrow().watch_count(WIDE), 1);

        a.release();
        assert_eq!(registry.borrow().watch_count(NARROW), 1);
        assert!(registry.borrow().is_watched(NARROW));

        b.release();
        assert!(!registry.borrow().is_watched(NARROW));
        assert!(!registry.borrow().is_watched(WIDE));
    }

    #[test]
    fn release_twice_is_safe() {
        let registry = ConditionRegistry::shared();
        let mut sub = ConditionSubscription::watch(&registry, vec![NARROW.into()]);
        sub.release();
        sub.release();
        assert_eq!(registry.borrow().watch_count(NARROW), 0);
    }

    #[test]
    fn drop_releases() {
        let registry = ConditionRegistry::shared();
        {
            let _sub = ConditionSubscription::watch(&registry, vec![NARROW.into()]);
            assert!(registry.borrow().is_watched(NARROW));
        }
        assert!(!registry.borrow().is_watched(NARROW));
    }

    #[test]
    fn duplicate_claims_count_once() {
        let registry = ConditionRegistry::shared();
        let sub = ConditionSubscription::watch(
            &registry,
            vec![NARROW.into(), format!("  {NARROW} "), NARROW.into()],
        );
        assert_eq!(sub.conditions().len(), 1);
        assert_eq!(registry.borrow().watch_count(NARROW), 1);
    }

    #[test]
    fn covers_normalizes() {
        let registry = ConditionRegistry::shared();
        let sub = ConditionSubscription::watch(&registry, vec![NARROW.into()]);
        assert!(sub.covers(&format!(" {NARROW} ")));
        assert!(!sub.covers(WIDE));
    }

    #[test]
    fn resolve_off_is_empty() {
        let registry = ConditionRegistry::shared();
        let host = StaticHost::new();
        assert!(resolve_conditions(&Watch::Off, &registry, &host).is_empty());
    }

    #[test]
    fn resolve_conditions_verbatim_deduped() {
        let registry = ConditionRegistry::shared();
        let host = StaticHost::new();
        let watch = Watch::Conditions(vec![NARROW.into(), NARROW.into(), String::new()]);
        assert_eq!(resolve_conditions(&watch, &registry, &host), vec![NARROW.to_string()]);
    }

    #[test]
    fn discovery_scans_once_per_registry() {
        let registry = ConditionRegistry::shared();
        let mut host = StaticHost::new();
        host.add_conditions([NARROW, WIDE, NARROW]);

        let first = resolve_conditions(&Watch::Discover, &registry, &host);
        assert_eq!(first, vec![NARROW.to_string(), WIDE.to_string()]);

        // Later additions are invisible to the same registry.
        host.add_conditions(["(min-width: 851px)"]);
        let second = resolve_conditions(&Watch::Discover, &registry, &host);
        assert_eq!(second, first);

        // A fresh registry rescans.
        let fresh = ConditionRegistry::shared();
        let third = resolve_conditions(&Watch::Discover, &fresh, &host);
        assert_eq!(third.len(), 3);
    }

    #[test]
    fn active_lists_sorted_watched_conditions() {
        let registry = ConditionRegistry::shared();
        let _a = ConditionSubscription::watch(&registry, vec![WIDE.into()]);
        let _b = ConditionSubscription::watch(&registry, vec![NARROW.into()]);
        assert_eq!(
            registry.borrow().active(),
            vec![NARROW.to_string(), WIDE.to_string()]
        );
    }
}
