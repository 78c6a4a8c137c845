//! `PropertySet` for pass communication.
//!
//! Passes record what they did in a [`PropertySet`] that the caller passes
//! through the whole pipeline. Each value is keyed by its type, so a pass
//! reads its own report back with [`PropertySet::get`].
//!
//! # Examples
//!
//! ```
//! use qem_mitigate::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct RunStats {
//!     gates_added: usize,
//! }
//!
//! let mut props = PropertySet::new();
//! props.insert(RunStats { gates_added: 12 });
//!
//! let stats = props.get::<RunStats>().unwrap();
//! assert_eq!(stats.gates_added, 12);
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

/// Type-keyed properties shared between passes.
///
/// Each type can have at most one value stored; inserting again replaces it.
#[derive(Debug, Default)]
pub struct PropertySet {
    entries: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// The stored value of type `T`, if any.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Check whether a property of type `T` is stored.
    pub fn contains<T: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Take the value of type `T` out of the set.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no properties are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
