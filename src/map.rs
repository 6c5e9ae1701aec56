//! A fixed, ordered set of named value boxes.

use std::collections::HashMap;

use crate::error::ValueError;
use crate::value::AnyValue;

/// A map from field names to boxes, built once.
///
/// Bindings cannot be added or removed after [`build`](ValueMapBuilder::build).
/// [`put`](Self::put) copies into the existing box instead of replacing it.
#[derive(Debug, Clone)]
pub struct ValueMap {
    entries: Vec<(String, AnyValue)>,
    index: HashMap<String, usize>,
}

/// Builder for a [`ValueMap`].
#[derive(Debug, Default)]
pub struct ValueMapBuilder {
    entries: Vec<(String, AnyValue)>,
}

impl ValueMapBuilder {
    /// Adds a binding. Order of calls is the iteration order of the map.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<AnyValue>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// Builds the map, failing on a repeated name.
    pub fn build(self) -> Result<ValueMap, ValueError> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for (position, (name, _)) in self.entries.iter().enumerate() {
            if index.insert(name.clone(), position).is_some() {
                return Err(ValueError::DuplicateName(name.clone()));
            }
        }
        tracing::debug!(bindings = self.entries.len(), "value map built");
        Ok(ValueMap {
            entries: self.entries,
            index,
        })
    }
}

impl ValueMap {
    pub fn builder() -> ValueMapBuilder {
        ValueMapBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&AnyValue> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AnyValue> {
        let i = *self.index.get(name)?;
        Some(&mut self.entries[i].1)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Copies `value` into the box bound to `name`.
    pub fn put(&mut self, name: &str, value: &AnyValue) -> Result<(), ValueError> {
        self.get_mut(name)
            .ok_or_else(|| ValueError::UnknownName(name.to_owned()))?
            .copy_from(value)
    }

    /// Clears the box bound to `name`.
    pub fn clear(&mut self, name: &str) -> Result<(), ValueError> {
        self.get_mut(name)
            .ok_or_else(|| ValueError::UnknownName(name.to_owned()))?
            .clear();
        Ok(())
    }

    /// Clears every box; bindings stay.
    pub fn clear_all(&mut self) {
        for (_, value) in &mut self.entries {
            value.clear();
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnyValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
