use serde::Serialize;
use uuid::Uuid;

/// What happened to one user during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunOutcome {
    /// Pushed to `sent` endpoints (possibly zero).
    Sent { sent: usize },
    /// Not due yet and nothing stored for today.
    Skipped,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

impl RunResult {
    #[must_use]
    pub fn new(user_id: Uuid, outcome: RunOutcome) -> Self {
        Self { user_id, outcome }
    }
}

/// Per-status user counts plus the number of endpoints pushed to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub users: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    pub endpoints: usize,
}

impl RunTotals {
    #[must_use]
    pub fn from_results(results: &[RunResult]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut totals, result| {
                totals.users += 1;
                match &result.outcome {
                    RunOutcome::Sent { sent } => {
                        totals.sent += 1;
                        totals.endpoints += sent;
                    }
                    RunOutcome::Skipped => totals.skipped += 1,
                    RunOutcome::Failed { .. } => totals.failed += 1,
                }
                totals
            })
    }
}
