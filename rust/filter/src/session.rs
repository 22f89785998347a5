// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Filter entries, the append-only filter list and its cursor.

use crate::error::FilterWarning;
use serde::Serialize;

/// One (category, property) pattern pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterEntry {
    category: String,
    property: String,
}

impl FilterEntry {
    /// Trim both patterns; either one empty is a warning
    pub fn new(category: &str, property: &str) -> Result<Self, FilterWarning> {
        let category = category.trim();
        let property = property.trim();
        if category.is_empty() {
            return Err(FilterWarning::MissingCategory);
        }
        if property.is_empty() {
            return Err(FilterWarning::MissingProperty);
        }
        Ok(Self {
            category: category.to_string(),
            property: property.to_string(),
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn property(&self) -> &str {
        &self.property
    }
}

/// Index of the applied entry; serialized as -1 while unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(into = "i64")]
pub struct FilterCursor(Option<usize>);

impl FilterCursor {
    pub const UNSET: FilterCursor = FilterCursor(None);

    pub fn index(&self) -> Option<usize> {
        self.0
    }

    /// Index, or the -1 sentinel
    pub fn position(&self) -> i64 {
        self.0.map_or(-1, |i| i as i64)
    }
}

impl From<FilterCursor> for i64 {
    fn from(cursor: FilterCursor) -> Self {
        cursor.position()
    }
}

/// Cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Filter list and cursor for the currently loaded model
///
/// The list only grows; the cursor is a valid index whenever it is set.
#[derive(Debug, Clone, Default)]
pub struct FilterSession {
    entries: Vec<FilterEntry>,
    cursor: FilterCursor,
}

impl FilterSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> FilterCursor {
        self.cursor
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&FilterEntry> {
        self.cursor.index().and_then(|i| self.entries.get(i))
    }

    /// Append and return the new length; the first entry also sets the cursor to 0
    pub fn push(&mut self, entry: FilterEntry) -> usize {
        self.entries.push(entry);
        if self.entries.len() == 1 {
            self.cursor = FilterCursor(Some(0));
        }
        self.entries.len()
    }

    /// Move the cursor with wraparound; `None` if the list is empty
    pub fn step(&mut self, direction: Direction) -> Option<usize> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        let next = match (direction, self.cursor.index()) {
            (Direction::Next, Some(i)) => (i + 1) % len,
            (Direction::Previous, Some(i)) => (i + len - 1) % len,
            (Direction::Next, None) => 0,
            (Direction::Previous, None) => len - 1,
        };
        self.cursor = FilterCursor(Some(next));
        Some(next)
    }
}
