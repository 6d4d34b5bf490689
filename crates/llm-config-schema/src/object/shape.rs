//! Object shape: ordered key to schema mapping

use std::collections::HashMap;
use std::sync::Arc;

use crate::base::Schema;

/// Declared keys of an object schema, in declaration order
///
/// Keys are unique. Inserting an existing key replaces its schema in place,
/// so the key keeps its original position. The key index also serves as the
/// membership set when the engine looks for undeclared input keys.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Vec<(String, Arc<dyn Schema>)>,
    index: HashMap<String, usize>,
}

impl Shape {
    /// Create an empty shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, consuming and returning the shape
    pub fn field<S: Schema>(self, key: impl Into<String>, schema: S) -> Self {
        self.field_shared(key, Arc::new(schema))
    }

    /// Add a key with an already shared schema
    pub fn field_shared(mut self, key: impl Into<String>, schema: Arc<dyn Schema>) -> Self {
        self.insert(key, schema);
        self
    }

    /// Insert a key, returning the schema it replaced
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        schema: Arc<dyn Schema>,
    ) -> Option<Arc<dyn Schema>> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.fields[position].1, schema)),
            None => {
                self.index.insert(key.clone(), self.fields.len());
                self.fields.push((key, schema));
                None
            }
        }
    }

    /// Get the schema declared for a key
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Schema>> {
        self.index.get(key).map(|&position| &self.fields[position].1)
    }

    /// Check if a key is declared
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Declared keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Declared keys and schemas in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Schema>)> {
        self.fields.iter().map(|(key, schema)| (key.as_str(), schema))
    }

    /// Number of declared keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no keys are declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keep only the keys for which `keep` returns true, preserving order
    pub(crate) fn filter<F>(&self, keep: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        self.iter()
            .filter(|(key, _)| keep(*key))
            .map(|(key, schema)| (key.to_string(), Arc::clone(schema)))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Arc<dyn Schema>)> for Shape {
    fn from_iter<I: IntoIterator<Item = (K, Arc<dyn Schema>)>>(iter: I) -> Self {
        let mut shape = Shape::new();
        for (key, schema) in iter {
            shape.insert(key, schema);
        }
        shape
    }
}
