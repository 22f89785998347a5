// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stepper collaborators backed by [`IfcModel`] and [`VisibilitySet`].

use crate::session::FilterEntry;
use crate::stepper::{FilterStepper, QueryExecutor, VisibilityController};
use async_trait::async_trait;
use ifc_view_model::{ElementSet, IfcModel, QueryError, VisibilitySet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// Runs element queries on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelQueryExecutor;

#[async_trait]
impl QueryExecutor for ModelQueryExecutor {
    type Model = Arc<IfcModel>;
    type Error = QueryError;

    async fn query(&self, model: &Arc<IfcModel>, entry: &FilterEntry) -> Result<ElementSet, QueryError> {
        let model = Arc::clone(model);
        let category = entry.category().to_string();
        let property = entry.property().to_string();

        tokio::task::spawn_blocking(move || model.find(&category, &property))
            .await
            .map_err(|e| QueryError::Worker(e.to_string()))?
    }
}

/// Visibility state shared between the stepper and readers
#[derive(Debug, Clone, Default)]
pub struct SharedVisibility {
    inner: Arc<RwLock<VisibilitySet>>,
}

impl SharedVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, VisibilitySet> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> VisibilitySet {
        self.read().clone()
    }
}

impl VisibilityController<Arc<IfcModel>> for SharedVisibility {
    fn set_visibility(&self, show: bool, ids: Option<&ElementSet>) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_visibility(show, ids);
    }

    fn bind_model(&self, model: &Arc<IfcModel>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = VisibilitySet::new(model.element_ids());
    }
}

/// Stepper over a loaded [`IfcModel`]
pub type ModelStepper = FilterStepper<ModelQueryExecutor, SharedVisibility>;
