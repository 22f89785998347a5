// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element visibility over a loaded model.

use crate::element::{ElementId, ElementSet};

/// Which elements of the model are currently shown
///
/// Ids outside the model are ignored, so `visible` is always a subset of
/// `universe`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilitySet {
    universe: ElementSet,
    visible: ElementSet,
}

impl VisibilitySet {
    /// Everything in `ids` visible
    pub fn new(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let universe: ElementSet = ids.into_iter().collect();
        Self {
            visible: universe.clone(),
            universe,
        }
    }

    /// `show` with no ids shows or hides everything; with ids it shows or
    /// hides just those
    pub fn set_visibility(&mut self, show: bool, ids: Option<&ElementSet>) {
        match (show, ids) {
            (true, None) => self.visible = self.universe.clone(),
            (false, None) => self.visible.clear(),
            (true, Some(ids)) => self
                .visible
                .extend(ids.iter().copied().filter(|id| self.universe.contains(id))),
            (false, Some(ids)) => self.visible.retain(|id| !ids.contains(id)),
        }
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.visible.contains(&id)
    }

    /// Visible ids in ascending order
    pub fn visible_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.visible.iter().copied()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn total(&self) -> usize {
        self.universe.len()
    }

    pub fn all_visible(&self) -> bool {
        self.visible.len() == self.universe.len()
    }
}
