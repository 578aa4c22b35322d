//! Name bindings that may collide
//!
//! Registering a second element under a taken name turns the entry into a
//! single [`AmbiguousBinding`] that lists every candidate. Later collisions
//! add candidates to the same wrapper instead of nesting wrappers.

use super::EdmCheckable;
use crate::error::{EdmError, EdmErrorCode};
use crate::locations::Location;
use crate::messages;
use indexmap::IndexMap;

/// Several elements registered under one name
#[derive(Debug, Clone)]
pub struct AmbiguousBinding<T> {
    name: String,
    candidates: Vec<T>,
    errors: Vec<EdmError>,
}

impl<T> AmbiguousBinding<T> {
    /// The colliding name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every candidate in registration order
    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }
}

/// The result of looking a name up
#[derive(Debug, Clone)]
pub enum Binding<T> {
    /// Exactly one element has the name
    Unique(T),
    /// More than one element has the name
    Ambiguous(AmbiguousBinding<T>),
}

impl<T> Binding<T> {
    /// The unique element, or the first candidate of an ambiguous binding
    pub fn first(&self) -> &T {
        match self {
            Binding::Unique(value) => value,
            // An ambiguous binding always holds at least two candidates
            Binding::Ambiguous(ambiguous) => &ambiguous.candidates[0],
        }
    }

    /// The element, if the name is unique
    pub fn unique(&self) -> Option<&T> {
        match self {
            Binding::Unique(value) => Some(value),
            Binding::Ambiguous(_) => None,
        }
    }

    /// Whether the name collided
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Binding::Ambiguous(_))
    }

    /// All elements bound to the name
    pub fn candidates(&self) -> &[T] {
        match self {
            Binding::Unique(value) => std::slice::from_ref(value),
            Binding::Ambiguous(ambiguous) => &ambiguous.candidates,
        }
    }
}

impl<T> EdmCheckable for Binding<T> {
    fn errors(&self) -> Vec<EdmError> {
        match self {
            Binding::Unique(_) => Vec::new(),
            Binding::Ambiguous(ambiguous) => ambiguous.errors.clone(),
        }
    }
}

/// Ordered name table that records collisions
#[derive(Debug, Clone)]
pub struct BindingRegistry<T> {
    entries: IndexMap<String, Binding<T>>,
}

impl<T> Default for BindingRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BindingRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Register `value` under `key`
    ///
    /// Returns the error describing the collision when `key` was already
    /// taken. `display_name` is the name used in that message.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        display_name: &str,
        value: T,
        location: &Location,
    ) -> Option<EdmError> {
        let key = key.into();
        let Some(existing) = self.entries.get_mut(&key) else {
            self.entries.insert(key, Binding::Unique(value));
            return None;
        };

        let error = EdmError::new(
            location.clone(),
            EdmErrorCode::BadAmbiguousElementBinding,
            messages::ambiguous_binding(display_name),
        );
        match existing {
            Binding::Ambiguous(ambiguous) => {
                ambiguous.candidates.push(value);
                ambiguous.errors.push(error.clone());
            }
            Binding::Unique(_) => {
                let placeholder = Binding::Ambiguous(AmbiguousBinding {
                    name: display_name.to_string(),
                    candidates: Vec::new(),
                    errors: vec![error.clone()],
                });
                if let Binding::Unique(first) = std::mem::replace(existing, placeholder) {
                    if let Binding::Ambiguous(ambiguous) = existing {
                        ambiguous.candidates.push(first);
                        ambiguous.candidates.push(value);
                    }
                }
            }
        }
        Some(error)
    }

    /// Look a key up
    pub fn get(&self, key: &str) -> Option<&Binding<T>> {
        self.entries.get(key)
    }

    /// Whether `key` is bound
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding<T>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Bindings in registration order
    pub fn values(&self) -> impl Iterator<Item = &Binding<T>> {
        self.entries.values()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
