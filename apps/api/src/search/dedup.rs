//! Identifier deduplication for indirect (review-derived) employee hits.

use std::collections::HashSet;

/// Insertion-ordered set of employee identifiers seen during one federated search.
#[derive(Debug, Default, Clone)]
pub struct IdentifierSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `id` unless already present. Returns whether it was new.
    /// Empty identifiers are never recorded.
    pub fn add(&mut self, id: &str) -> bool {
        if id.is_empty() || !self.seen.insert(id.to_string()) {
            return false;
        }
        self.order.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identifiers in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Position of `id` in first-seen order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|known| known == id)
    }
}
