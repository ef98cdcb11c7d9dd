//! The canonical cross-category insertion order.
//!
//! [`GlobalSequence`] is an ordered set keyed by signed positions: appending
//! takes `max + 1`, prepending takes `min - 1`, so both ends are O(log n) and
//! membership is a hash lookup.
//!
//! A file keeps the position of its front-most recording. Prepending a file
//! that is already present moves it to the front; appending one leaves it
//! where it is.

use std::collections::{BTreeMap, HashMap};

use crate::package::ConfigFile;

/// Ordered set of every direct file recorded during one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalSequence {
    order: BTreeMap<i64, ConfigFile>,
    positions: HashMap<ConfigFile, i64>,
}

impl GlobalSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `file` at the end unless already present.
    pub fn push_back(&mut self, file: ConfigFile) {
        if self.positions.contains_key(&file) {
            return;
        }
        let position = self.order.last_key_value().map_or(0, |(p, _)| p + 1);
        self.place(position, file);
    }

    /// Record `file` at the front, moving it there if already present.
    pub fn push_front(&mut self, file: ConfigFile) {
        if let Some(old) = self.positions.get(&file).copied() {
            if self.order.first_key_value().is_some_and(|(p, _)| *p == old) {
                return;
            }
            self.order.remove(&old);
        }
        let position = self.order.first_key_value().map_or(0, |(p, _)| p - 1);
        self.place(position, file);
    }

    fn place(&mut self, position: i64, file: ConfigFile) {
        tracing::trace!("Sequence position {position}: {file}");
        self.positions.insert(file.clone(), position);
        self.order.insert(position, file);
    }

    /// Sort key of `file`, if recorded.
    pub fn position(&self, file: &ConfigFile) -> Option<i64> {
        self.positions.get(file).copied()
    }

    /// True if `file` was recorded.
    pub fn contains(&self, file: &ConfigFile) -> bool {
        self.positions.contains_key(file)
    }

    /// Files in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigFile> {
        self.order.values()
    }

    /// Number of distinct files.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
