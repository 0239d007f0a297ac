use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown field: {field}")]
    UnknownField { field: String },
    #[error("listener for field {field} failed: {source}")]
    Listener {
        field: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Callback invoked with the new value every time its field is set.
pub type Listener<V> = Rc<dyn Fn(&V) -> anyhow::Result<()>>;

/// Named-field store with synchronous per-field change listeners.
///
/// The set of field names is fixed at construction. The store lives on the UI
/// thread (it is deliberately `!Send`); all methods take `&self` so listeners
/// may read it, or set other fields, while a notification is in progress.
pub struct ReactiveStore<V> {
    values: RefCell<HashMap<String, V>>,
    listeners: RefCell<HashMap<String, Vec<Listener<V>>>>,
}

impl<V: Clone + Default> ReactiveStore<V> {
    /// Creates a store declaring `fields`, each holding `V::default()`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: HashMap<String, V> = fields
            .into_iter()
            .map(|name| (name.into(), V::default()))
            .collect();
        let listeners = values.keys().map(|name| (name.clone(), Vec::new())).collect();
        Self {
            values: RefCell::new(values),
            listeners: RefCell::new(listeners),
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.values.borrow().contains_key(field)
    }

    pub fn get(&self, field: &str) -> Result<V, StoreError> {
        self.values
            .borrow()
            .get(field)
            .cloned()
            .ok_or_else(|| unknown(field))
    }

    /// Stores `value` and notifies the field's listeners in registration order.
    ///
    /// The first failing listener aborts the notification and its error is
    /// returned; the new value remains stored.
    pub fn set(&self, field: &str, value: V) -> Result<(), StoreError> {
        {
            let mut values = self.values.borrow_mut();
            let slot = values.get_mut(field).ok_or_else(|| unknown(field))?;
            *slot = value.clone();
        }

        // Snapshot so listeners can register more listeners or set fields.
        let listeners: Vec<Listener<V>> = self
            .listeners
            .borrow()
            .get(field)
            .cloned()
            .unwrap_or_default();

        for listener in listeners {
            listener(&value).map_err(|source| StoreError::Listener {
                field: field.to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Registers `listener` for every future `set` of `field`.
    ///
    /// The listener is not called with the current value.
    pub fn on_change<F>(&self, field: &str, listener: F) -> Result<(), StoreError>
    where
        F: Fn(&V) -> anyhow::Result<()> + 'static,
    {
        self.listeners
            .borrow_mut()
            .get_mut(field)
            .ok_or_else(|| unknown(field))?
            .push(Rc::new(listener));
        Ok(())
    }

    pub fn listener_count(&self, field: &str) -> Result<usize, StoreError> {
        self.listeners
            .borrow()
            .get(field)
            .map(Vec::len)
            .ok_or_else(|| unknown(field))
    }
}

fn unknown(field: &str) -> StoreError {
    StoreError::UnknownField {
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_start_with_default_values() {
        let store: ReactiveStore<Option<u32>> = ReactiveStore::new(["a", "b"]);
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), None);
        assert!(store.has_field("a"));
        assert!(!store.has_field("c"));
    }

    #[test]
    fn listener_may_read_store_during_notification() {
        let store: Rc<ReactiveStore<u32>> = Rc::new(ReactiveStore::new(["a", "b"]));
        let weak = Rc::downgrade(&store);
        store
            .on_change("a", move |value| {
                let store = weak.upgrade().expect("store alive");
                assert_eq!(store.get("a")?, *value);
                store.set("b", value * 2)?;
                Ok(())
            })
            .unwrap();

        store.set("a", 21).unwrap();
        assert_eq!(store.get("b").unwrap(), 42);
    }
}
