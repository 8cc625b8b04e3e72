use serde::{Deserialize, Serialize};

use crate::script::script_model::ScriptResult;

/// Aggregated outcome of one or more walkthrough scripts.
///
/// Built from a `Vec<ScriptResult>` via `from_results()` and printed by the
/// console reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Script name, or the script path when several were run
    pub suite_name: String,

    /// Number of scripts run
    pub total: usize,

    /// Scripts whose every assertion held
    pub passed: usize,

    /// Scripts with a failed assertion or a step that could not run
    pub failed: usize,

    /// Wall-clock duration of the whole run in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    /// Completed checklist steps at the end of the last script
    pub completed_step_count: usize,

    /// Per-script results, in run order
    pub results: Vec<ScriptResult>,
}

impl SuiteReport {
    /// Build a report, counting passes and failures from `results`.
    pub fn from_results(suite_name: &str, results: Vec<ScriptResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            suite_name: suite_name.to_string(),
            total,
            passed,
            failed: total - passed,
            duration_ms: None,
            completed_step_count: 0,
            results,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Record where the checklist ended up.
    pub fn with_progress(mut self, completed_step_count: usize) -> Self {
        self.completed_step_count = completed_step_count;
        self
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
