//! The asynchronous filtering step.
//!
//! Filtering itself is a plain, order-preserving predicate over the records.
//! It is wrapped in an async operation that suspends once before resolving so
//! that callers already treat it as an out-of-process dependency. Whether the
//! step succeeds is decided by an injected [`StepDecision`] function; the
//! default decision always proceeds.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::property::{PropertyRecord, COMPLETED_WORKFLOW, HTV_TYPE};

/// Outcome chosen by a filter step's decision function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDecision {
    /// Resolve with the filtered records.
    Proceed,
    /// Reject with [`Error::StepFailed`].
    Fail,
}

type Decide = dyn Fn(&[PropertyRecord]) -> StepDecision + Send + Sync;

/// Filtering step with an injectable success/failure decision.
///
/// Cheap to clone; the decision function is shared.
#[derive(Clone)]
pub struct FilterStep {
    decide: Arc<Decide>,
}

impl FilterStep {
    /// Build a step whose outcome is chosen by `decide` for every run.
    pub fn with_decision<F>(decide: F) -> Self
    where
        F: Fn(&[PropertyRecord]) -> StepDecision + Send + Sync + 'static,
    {
        Self {
            decide: Arc::new(decide),
        }
    }

    /// Build a step that always rejects.
    pub fn failing() -> Self {
        Self::with_decision(|_| StepDecision::Fail)
    }

    /// Run the step over `records`.
    ///
    /// Resolves with the records whose type is `htv` and whose workflow is
    /// `completed`, in their original order, or rejects with
    /// [`Error::StepFailed`] when the decision says so.
    pub async fn run(&self, records: Vec<PropertyRecord>) -> Result<Vec<PropertyRecord>> {
        let decision = (self.decide)(&records);
        debug!(?decision, records = records.len(), "filter step decision");

        tokio::task::yield_now().await;

        match decision {
            StepDecision::Proceed => Ok(filter_completed_htv(records)),
            StepDecision::Fail => Err(Error::StepFailed),
        }
    }
}

impl Default for FilterStep {
    fn default() -> Self {
        Self::with_decision(|_| StepDecision::Proceed)
    }
}

impl fmt::Debug for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStep").finish_non_exhaustive()
    }
}

/// Returns true when the record is an `htv` property with a `completed` workflow.
///
/// Both comparisons are exact and case-sensitive.
pub fn is_completed_htv(record: &PropertyRecord) -> bool {
    record.kind.as_deref() == Some(HTV_TYPE)
        && record.workflow.as_deref() == Some(COMPLETED_WORKFLOW)
}

/// Keep only completed `htv` records, preserving their relative order.
pub fn filter_completed_htv(records: Vec<PropertyRecord>) -> Vec<PropertyRecord> {
    records
        .into_iter()
        .filter(|record| is_completed_htv(record))
        .collect()
}
