//! Distribution of a field's current values across the working set.

use crate::tags::{TagField, TagHandle};
use crate::workset::AudioFile;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ValueGroup {
    /// `None` when the field is missing or empty
    pub value: Option<String>,
    pub files: Vec<String>,
}

impl ValueGroup {
    pub fn count(&self) -> usize {
        self.files.len()
    }

    pub fn percentage(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.files.len() as f64 / total as f64 * 100.0
        }
    }
}

/// Group files by their current value of `field`.
///
/// Set values come first in lexicographic order; unset files are grouped
/// last.
pub fn value_distribution<H: TagHandle>(files: &[AudioFile<H>], field: TagField) -> Vec<ValueGroup> {
    let mut by_value: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut not_set = Vec::new();

    for file in files {
        match file.current(field).filter(|v| !v.is_empty()) {
            Some(value) => by_value.entry(value).or_default().push(file.file_name()),
            None => not_set.push(file.file_name()),
        }
    }

    let mut groups: Vec<ValueGroup> = by_value
        .into_iter()
        .map(|(value, files)| ValueGroup {
            value: Some(value),
            files,
        })
        .collect();

    if !not_set.is_empty() {
        groups.push(ValueGroup {
            value: None,
            files: not_set,
        });
    }

    groups
}
