//! Cross-view selection & viewport persistence.
//!
//! One explicit store object instead of ambient globals: independently
//! routed views share it by handle, subscribe to changes, and read back
//! the last selection / viewport when they mount. All persisted values
//! are namespaced by scenario — a selection from one scenario must never
//! leak into another.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::viewport::ViewportDomain;

/// Pluggable persistence backend (browser localStorage, a config file,
/// or plain memory in tests).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value);
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key);
    }
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// What a click on a rendered bar selects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub order_no: String,
    pub machine_id: String,
    pub operation_id: i64,
}

/// Persisted envelope: the scenario the value was written under travels
/// with it, so a stale entry can be rejected on restore.
#[derive(Debug, Deserialize)]
struct Persisted<T> {
    scenario: String,
    value: T,
}

#[derive(Serialize)]
struct PersistedRef<'a, T> {
    scenario: &'a str,
    value: &'a T,
}

pub struct SelectionStore<S: KeyValueStore> {
    storage: S,
    scenario: Option<String>,
    selection: Option<Selection>,
    viewport: Option<ViewportDomain>,
    listeners: Vec<Box<dyn Fn()>>,
}

impl<S: KeyValueStore> SelectionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            scenario: None,
            selection: None,
            viewport: None,
            listeners: Vec::new(),
        }
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    /// Switch the active scenario. The in-memory selection and viewport
    /// are dropped, then restored from storage when a matching persisted
    /// entry exists for the new scenario.
    pub fn set_scenario(&mut self, scenario: &str) {
        if self.scenario.as_deref() == Some(scenario) {
            return;
        }
        self.scenario = Some(scenario.to_string());
        self.selection = self.restore("selection");
        self.viewport = self.restore("viewportDomain");
        self.notify();
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.persist("selection", &selection);
        self.selection = Some(selection);
        self.notify();
    }

    pub fn clear_selection(&mut self) {
        if let Some(key) = self.key("selection") {
            self.storage.remove(&key);
        }
        if self.selection.take().is_some() {
            self.notify();
        }
    }

    pub fn viewport_domain(&self) -> Option<ViewportDomain> {
        self.viewport
    }

    /// Last-used zoom/pan window, persisted independently of the
    /// selection so a detail view can resume where the user left off.
    pub fn set_viewport_domain(&mut self, domain: ViewportDomain) {
        self.persist("viewportDomain", &domain);
        self.viewport = Some(domain);
        self.notify();
    }

    /// Register a change callback. Fired after every mutation, including
    /// scenario switches.
    pub fn subscribe(&mut self, listener: impl Fn() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener();
        }
    }

    fn key(&self, name: &str) -> Option<String> {
        self.scenario.as_ref().map(|s| format!("{s}/{name}"))
    }

    fn persist<T: Serialize>(&mut self, name: &str, value: &T) {
        let Some(scenario) = self.scenario.clone() else {
            return;
        };
        let Some(key) = self.key(name) else { return };
        let envelope = PersistedRef {
            scenario: &scenario,
            value,
        };
        if let Ok(json) = serde_json::to_string(&envelope) {
            self.storage.set(&key, &json);
        }
    }

    fn restore<T: for<'de> Deserialize<'de>>(&mut self, name: &str) -> Option<T> {
        let key = self.key(name)?;
        let raw = self.storage.get(&key)?;
        let Ok(envelope) = serde_json::from_str::<Persisted<T>>(&raw) else {
            // Unreadable entries are stale by definition.
            self.storage.remove(&key);
            return None;
        };
        if Some(envelope.scenario.as_str()) != self.scenario.as_deref() {
            self.storage.remove(&key);
            return None;
        }
        Some(envelope.value)
    }
}

impl<S: KeyValueStore + std::fmt::Debug> std::fmt::Debug for SelectionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("storage", &self.storage)
            .field("scenario", &self.scenario)
            .field("selection", &self.selection)
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn selection(order: &str) -> Selection {
        Selection {
            order_no: order.into(),
            machine_id: "512".into(),
            operation_id: 1,
        }
    }

    #[test]
    fn selection_does_not_leak_across_scenarios() {
        let mut store = SelectionStore::new(MemoryStore::default());
        store.set_scenario("A");
        store.set_selection(selection("4711"));
        assert!(store.selection().is_some());

        store.set_scenario("B");
        assert_eq!(store.selection(), None);

        // Switching back restores A's persisted selection.
        store.set_scenario("A");
        assert_eq!(store.selection().map(|s| s.order_no.as_str()), Some("4711"));
    }

    #[test]
    fn restore_survives_a_new_store_instance() {
        let mut backing = MemoryStore::default();
        {
            let mut store = SelectionStore::new(&mut backing);
            store.set_scenario("A");
            store.set_selection(selection("9000"));
            store.set_viewport_domain(ViewportDomain {
                start: 10.0,
                end: 20.0,
            });
        }
        let mut store = SelectionStore::new(&mut backing);
        store.set_scenario("A");
        assert_eq!(store.selection().map(|s| s.order_no.as_str()), Some("9000"));
        assert_eq!(
            store.viewport_domain(),
            Some(ViewportDomain {
                start: 10.0,
                end: 20.0
            })
        );
    }

    #[test]
    fn clear_also_removes_the_persisted_entry() {
        let mut store = SelectionStore::new(MemoryStore::default());
        store.set_scenario("A");
        store.set_selection(selection("4711"));
        store.clear_selection();
        store.set_scenario("B");
        store.set_scenario("A");
        assert_eq!(store.selection(), None);
    }

    #[test]
    fn corrupt_persisted_values_are_discarded() {
        let mut backing = MemoryStore::default();
        backing.set("A/selection", "{not json");
        let mut store = SelectionStore::new(backing);
        store.set_scenario("A");
        assert_eq!(store.selection(), None);
    }

    #[test]
    fn listeners_fire_on_mutation() {
        let count = Rc::new(Cell::new(0u32));
        let mut store = SelectionStore::new(MemoryStore::default());
        let c = count.clone();
        store.subscribe(move || c.set(c.get() + 1));
        store.set_scenario("A");
        store.set_selection(selection("1"));
        store.clear_selection();
        assert_eq!(count.get(), 3);
    }
}
