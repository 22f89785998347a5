// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sequential filter stepper.
//!
//! Owns the [`FilterSession`] of the loaded model and drives a
//! [`QueryExecutor`] and a [`VisibilityController`] whenever a filter is
//! applied. Every application gets a sequence number; when a query resolves,
//! its result is applied only if no newer application has been issued since.

use crate::error::FilterWarning;
use crate::session::{Direction, FilterCursor, FilterEntry, FilterSession};
use async_trait::async_trait;
use ifc_view_model::ElementSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Resolves a filter entry to the matching elements of a model
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    type Model: Clone + Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn query(&self, model: &Self::Model, entry: &FilterEntry) -> Result<ElementSet, Self::Error>;
}

/// Shows and hides elements of the loaded model
pub trait VisibilityController<M>: Send + Sync {
    /// `show` with no ids shows or hides everything; with ids it shows or
    /// hides just those
    fn set_visibility(&self, show: bool, ids: Option<&ElementSet>);

    /// Switch to a newly loaded model, everything visible
    fn bind_model(&self, model: &M);
}

/// What to show when a filter matches nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyResultPolicy {
    /// Hide every element
    #[default]
    HideAll,
    /// Leave every element visible
    ShowAll,
}

impl FromStr for EmptyResultPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hide-all" | "hide" => Ok(EmptyResultPolicy::HideAll),
            "show-all" | "show" => Ok(EmptyResultPolicy::ShowAll),
            other => Err(format!("unknown empty result policy '{}'", other)),
        }
    }
}

/// Result of a stepper operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The entry at `cursor` was applied to visibility
    Applied {
        cursor: usize,
        entry: FilterEntry,
        matched: usize,
    },
    /// Appended without applying (not the first entry)
    Added { len: usize },
    /// A newer application was issued while this query ran; result discarded
    Superseded { sequence: u64 },
    /// Precondition or input problem; nothing changed
    Warned { warning: FilterWarning },
}

/// Read-only view of the stepper for UIs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepperSnapshot {
    pub filters: Vec<FilterEntry>,
    pub cursor: FilterCursor,
    /// Entry whose result is currently applied to visibility
    pub applied: Option<FilterEntry>,
    pub model_loaded: bool,
}

struct StepperState<M> {
    session: FilterSession,
    model: Option<M>,
    /// Sequence number of the most recently issued application
    issued: u64,
    applied: Option<FilterEntry>,
}

/// Application issued under the state lock; its query runs with the lock released
struct Application<M> {
    sequence: u64,
    cursor: usize,
    entry: FilterEntry,
    model: M,
}

enum Plan<M> {
    Apply(Application<M>),
    Done(StepOutcome),
}

/// Sequential category/property filter stepper
pub struct FilterStepper<Q: QueryExecutor, V> {
    executor: Q,
    visibility: V,
    policy: EmptyResultPolicy,
    state: Mutex<StepperState<Q::Model>>,
}

impl<Q, V> FilterStepper<Q, V>
where
    Q: QueryExecutor,
    V: VisibilityController<Q::Model>,
{
    pub fn new(executor: Q, visibility: V, policy: EmptyResultPolicy) -> Self {
        Self {
            executor,
            visibility,
            policy,
            state: Mutex::new(StepperState {
                session: FilterSession::new(),
                model: None,
                issued: 0,
                applied: None,
            }),
        }
    }

    pub fn executor(&self) -> &Q {
        &self.executor
    }

    pub fn visibility(&self) -> &V {
        &self.visibility
    }

    pub fn policy(&self) -> EmptyResultPolicy {
        self.policy
    }

    /// Switch to a new model with a fresh, empty filter session
    ///
    /// Queries still in flight for the previous model are superseded.
    pub fn load_model(&self, model: Q::Model) {
        let mut state = self.lock();
        self.visibility.bind_model(&model);
        state.session = FilterSession::new();
        state.model = Some(model);
        state.applied = None;
        state.issued += 1;
        tracing::info!("Filter session reset for new model");
    }

    /// Currently loaded model
    pub fn model(&self) -> Option<Q::Model> {
        self.lock().model.clone()
    }

    pub fn snapshot(&self) -> StepperSnapshot {
        let state = self.lock();
        StepperSnapshot {
            filters: state.session.entries().to_vec(),
            cursor: state.session.cursor(),
            applied: state.applied.clone(),
            model_loaded: state.model.is_some(),
        }
    }

    /// Append a filter; the first one is applied immediately
    pub async fn add_filter(&self, category: &str, property: &str) -> Result<StepOutcome, Q::Error> {
        let entry = match FilterEntry::new(category, property) {
            Ok(entry) => entry,
            Err(warning) => return Ok(warn(warning)),
        };

        let plan = {
            let mut state = self.lock();
            let len = state.session.push(entry.clone());
            tracing::info!(
                category = entry.category(),
                property = entry.property(),
                len,
                "Filter added"
            );
            if len > 1 {
                Plan::Done(StepOutcome::Added { len })
            } else {
                plan_application(&mut state, 0, entry)
            }
        };

        self.execute(plan).await
    }

    /// Step back one filter, wrapping to the last
    pub async fn previous(&self) -> Result<StepOutcome, Q::Error> {
        self.navigate(Direction::Previous).await
    }

    /// Step forward one filter, wrapping to the first
    pub async fn next(&self) -> Result<StepOutcome, Q::Error> {
        self.navigate(Direction::Next).await
    }

    async fn navigate(&self, direction: Direction) -> Result<StepOutcome, Q::Error> {
        let plan = {
            let mut state = self.lock();
            match state.session.step(direction) {
                None => Plan::Done(warn(FilterWarning::EmptyFilterList)),
                Some(cursor) => {
                    let entry = state.session.entries()[cursor].clone();
                    tracing::debug!(?direction, cursor, "Cursor moved");
                    plan_application(&mut state, cursor, entry)
                }
            }
        };

        self.execute(plan).await
    }

    async fn execute(&self, plan: Plan<Q::Model>) -> Result<StepOutcome, Q::Error> {
        let application = match plan {
            Plan::Done(outcome) => return Ok(outcome),
            Plan::Apply(application) => application,
        };

        // Visibility changes only under the state lock, and only for the latest application
        {
            let state = self.lock();
            if state.issued != application.sequence {
                return Ok(superseded(&application, state.issued));
            }
            self.visibility.set_visibility(true, None);
        }

        let result = self.executor.query(&application.model, &application.entry).await;

        let mut state = self.lock();
        let stale = state.issued != application.sequence;

        let ids = match result {
            Ok(ids) => ids,
            Err(error) => {
                tracing::warn!(
                    sequence = application.sequence,
                    stale,
                    error = %error,
                    "Filter query failed"
                );
                return Err(error);
            }
        };

        if stale {
            return Ok(superseded(&application, state.issued));
        }

        if ids.is_empty() {
            tracing::warn!(
                category = application.entry.category(),
                property = application.entry.property(),
                policy = ?self.policy,
                "Filter matched no elements"
            );
            if self.policy == EmptyResultPolicy::HideAll {
                self.visibility.set_visibility(false, None);
            }
        } else {
            self.visibility.set_visibility(false, None);
            self.visibility.set_visibility(true, Some(&ids));
        }

        tracing::info!(
            cursor = application.cursor,
            category = application.entry.category(),
            property = application.entry.property(),
            matched = ids.len(),
            "Filter applied"
        );

        state.applied = Some(application.entry.clone());
        Ok(StepOutcome::Applied {
            cursor: application.cursor,
            entry: application.entry,
            matched: ids.len(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, StepperState<Q::Model>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn plan_application<M: Clone>(state: &mut StepperState<M>, cursor: usize, entry: FilterEntry) -> Plan<M> {
    let Some(model) = state.model.clone() else {
        return Plan::Done(warn(FilterWarning::NoModelLoaded));
    };
    state.issued += 1;
    Plan::Apply(Application {
        sequence: state.issued,
        cursor,
        entry,
        model,
    })
}

fn superseded<M>(application: &Application<M>, latest: u64) -> StepOutcome {
    tracing::debug!(
        sequence = application.sequence,
        latest,
        "Discarding stale filter application"
    );
    StepOutcome::Superseded {
        sequence: application.sequence,
    }
}

fn warn(warning: FilterWarning) -> StepOutcome {
    tracing::warn!(
        code = warning.code(),
        input_error = warning.is_input_error(),
        "{}",
        warning
    );
    StepOutcome::Warned { warning }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("hide-all".parse(), Ok(EmptyResultPolicy::HideAll));
        assert_eq!(" Show-All ".parse(), Ok(EmptyResultPolicy::ShowAll));
        assert!("sometimes".parse::<EmptyResultPolicy>().is_err());
        assert_eq!(EmptyResultPolicy::default(), EmptyResultPolicy::HideAll);
    }

    #[test]
    fn test_outcome_serialization() {
        let warned = StepOutcome::Warned {
            warning: FilterWarning::EmptyFilterList,
        };
        assert_eq!(
            serde_json::to_value(&warned).unwrap(),
            serde_json::json!({ "outcome": "warned", "warning": "empty_filter_list" })
        );
    }
}
