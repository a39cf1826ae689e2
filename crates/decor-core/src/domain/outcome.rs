//! Outcome model: per-record results and the batch aggregate.
//!
//! Outcomes are produced by the retrying updater, consumed by the orchestrator
//! for aggregation, and never persisted.

use serde::{Deserialize, Serialize};

use super::decoration::DecorationSpec;
use super::ids::RecordId;

/// Reason recorded when every attempt was rate limited.
pub const MAX_RETRIES_EXCEEDED: &str = "max retries exceeded";

/// Classification of an update result.
///
/// Serialized as SCREAMING_SNAKE_CASE: SUCCESS / FAILURE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// Result of decorating one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateOutcome {
    Success { decoration: DecorationSpec },
    Failure { reason: String },
}

impl UpdateOutcome {
    pub fn success(decoration: DecorationSpec) -> Self {
        Self::Success { decoration }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn max_retries_exceeded() -> Self {
        Self::failure(MAX_RETRIES_EXCEEDED)
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success { .. } => OutcomeKind::Success,
            Self::Failure { .. } => OutcomeKind::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind() == OutcomeKind::Success
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}

/// An outcome tagged with the record it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub record_id: RecordId,
    pub outcome: UpdateOutcome,
}

/// Aggregate of one batch.
///
/// Folding is commutative: the counts do not depend on completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,

    /// Entries returned by the query but not eligible (decorated or partial).
    pub skipped: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RecordOutcome>,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: RecordOutcome) {
        if outcome.outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failures.push(outcome);
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn message(&self) -> String {
        format!(
            "Updated {} pages successfully. Failed to update {} pages.",
            self.succeeded, self.failed
        )
    }
}

impl FromIterator<RecordOutcome> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = RecordOutcome>>(iter: I) -> Self {
        let mut summary = BatchSummary::default();
        for outcome in iter {
            summary.record(outcome);
        }
        summary
    }
}
