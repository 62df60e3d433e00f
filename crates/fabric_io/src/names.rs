//! Insertion-ordered name/index mapping for external pool and unit names.

use std::collections::HashMap;

/// A bidirectional name table: external names to dense indices and back.
///
/// Indices are assigned in insertion order starting from zero, matching the
/// index spaces of the model's ID types.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    forward: HashMap<String, u32>,
    reverse: Vec<String>,
}

impl NameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a name, returning its index. Re-interning returns the
    /// existing index.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(&index) = self.forward.get(name) {
            return index;
        }
        let index = self.reverse.len() as u32;
        self.forward.insert(name.to_string(), index);
        self.reverse.push(name.to_string());
        index
    }

    /// Looks up a previously interned name.
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.forward.get(name).copied()
    }

    /// The name at an index.
    pub fn name_of(&self, index: u32) -> Option<&str> {
        self.reverse.get(index as usize).map(String::as_str)
    }

    /// Number of interned names.
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Names in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.reverse.iter().map(String::as_str)
    }
}
