use tracing::debug;

pub const DEFAULT_CATEGORIES: [&str; 4] = ["Food", "Transport", "Utilities", "Subscriptions"];

/// Ordered, duplicate-free list of category names.
///
/// Membership is an exact, case-sensitive string match. Removing a category
/// does not touch expenses already recorded under it.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRegistry {
    names: Vec<String>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self {
            names: DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn empty() -> Self {
        Self { names: Vec::new() }
    }

    /// Appends `name` unless it is blank or already present. Returns whether
    /// the list changed.
    pub fn add(&mut self, name: &str) -> bool {
        if name.trim().is_empty() || self.contains(name) {
            debug!(category = name, "category add ignored");
            return false;
        }
        self.names.push(name.to_string());
        debug!(category = name, "category added");
        true
    }

    /// Removes `name` if present. Returns whether the list changed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|existing| existing == name) {
            Some(index) => {
                self.names.remove(index);
                debug!(category = name, "category removed");
                true
            }
            None => {
                debug!(category = name, "category remove ignored");
                false
            }
        }
    }

    pub fn list(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|existing| existing == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
