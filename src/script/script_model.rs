use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WizardError, WizardResult};
use crate::feature::task_feed::MappingFeed;
use crate::session::events::UiEvent;
use crate::workflow::checklist::StepStatus;

/// A scripted walk through the wizard, read from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalkthroughScript {
    /// Name shown in the report
    pub name: String,

    /// Page to open before the first step; the wizard start page if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_page: Option<String>,

    /// Steps run in order; the script stops at the first one that cannot run
    pub steps: Vec<ScriptStep>,
}

impl WalkthroughScript {
    /// Parse a script. `context` names the source in error messages.
    pub fn from_yaml_str(source: &str, context: &str) -> WizardResult<Self> {
        serde_yaml::from_str(source).map_err(|source| WizardError::Script {
            context: context.to_string(),
            source,
        })
    }

    pub fn load_file(path: impl AsRef<Path>) -> WizardResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| WizardError::io(format!("reading {}", path.display()), e))?;
        Self::from_yaml_str(&text, &path.display().to_string())
    }
}

/// One scripted interaction, tagged by `action`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Open a page directly, as a route change would
    Navigate { page: String },

    /// Press a schema button by its action id
    Dispatch { action_id: String },

    /// Feed a widget interaction to the session
    Event { event: UiEvent },

    /// Fresh session state, data refetched
    Reset,

    /// Check session state; failures are recorded and the script continues
    Assert { assertions: Vec<Assertion> },
}

/// A check against session state, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Page the session is showing
    CurrentPage { expected: String },

    /// Checklist progress counter
    CompletedStepCount { expected: usize },

    /// Status of one checklist step, looked up by id
    StepStatus { step_id: String, expected: StepStatus },

    /// Number of connections in one mapping feed
    ConnectionCount { feed: MappingFeed, expected: usize },

    /// This exact pair is connected in the feed
    Connected {
        feed: MappingFeed,
        left_id: String,
        right_id: String,
    },

    /// Rendering this page yields the not-found view
    PageNotFound { page: String },

    /// Components rendered on the current page, headings excluded
    ComponentCount { expected: usize },

    /// Submit flag as bound for the current render
    SubmitDisabled { expected: bool },
}

impl Assertion {
    pub fn name(&self) -> &'static str {
        match self {
            Assertion::CurrentPage { .. } => "CurrentPage",
            Assertion::CompletedStepCount { .. } => "CompletedStepCount",
            Assertion::StepStatus { .. } => "StepStatus",
            Assertion::ConnectionCount { .. } => "ConnectionCount",
            Assertion::Connected { .. } => "Connected",
            Assertion::PageNotFound { .. } => "PageNotFound",
            Assertion::ComponentCount { .. } => "ComponentCount",
            Assertion::SubmitDisabled { .. } => "SubmitDisabled",
        }
    }
}

/// Outcome of evaluating one assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// Step this assertion belongs to (0-indexed)
    pub step_index: usize,

    /// The assertion that was evaluated
    pub assertion: Assertion,

    /// Whether the assertion held
    pub passed: bool,

    /// Observed value, formatted for the report
    pub actual: Option<String>,

    /// Failure description (None on pass)
    pub message: Option<String>,
}

/// Outcome of running one walkthrough script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptResult {
    /// Name of the script that was run
    pub script_name: String,

    /// No failed assertion and no step error
    pub passed: bool,

    /// Steps executed before finishing or stopping
    pub steps_run: usize,

    /// Every assertion evaluated, in order
    pub assertion_results: Vec<AssertionResult>,

    /// Set when a step could not run, as opposed to an assertion failing
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps_and_assertions() {
        let yaml = r#"
name: first step
steps:
  - action: dispatch
    action_id: START_MIGRATION
  - action: event
    event:
      type: master_id_changed
      id: MID-ALPHA
  - action: reset
  - action: assert
    assertions:
      - type: current_page
        expected: master-id
      - type: step_status
        step_id: step-1
        expected: active
"#;
        let script = WalkthroughScript::from_yaml_str(yaml, "inline").unwrap();
        assert_eq!(script.steps.len(), 4);
        assert_eq!(script.start_page, None);
        assert_eq!(script.steps[2], ScriptStep::Reset);
        let ScriptStep::Assert { assertions } = &script.steps[3] else {
            panic!("expected assert step");
        };
        assert_eq!(
            assertions[1],
            Assertion::StepStatus {
                step_id: "step-1".into(),
                expected: StepStatus::Active
            }
        );
    }

    #[test]
    fn unknown_step_action_is_a_script_error() {
        let err = WalkthroughScript::from_yaml_str(
            "name: x\nsteps:\n  - action: teleport\n",
            "inline",
        )
        .unwrap_err();
        assert!(matches!(err, WizardError::Script { .. }));
    }
}
