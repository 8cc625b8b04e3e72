use crate::engine::render_model::PageView;
use crate::script::context::ScriptContext;
use crate::script::script_model::{
    AssertionResult, Assertion, ScriptResult, ScriptStep, WalkthroughScript,
};
use crate::session::wizard::WizardSession;

/// Executes a walkthrough script step by step against a session.
pub struct ScriptRunner;

impl ScriptRunner {
    /// Run a whole script. The session should already be loaded.
    ///
    /// A step that cannot run stops the script and is reported in `error`;
    /// failed assertions do not stop it.
    pub fn run(script: &WalkthroughScript, session: &mut WizardSession) -> ScriptResult {
        let mut ctx = ScriptContext::new();

        if let Some(page) = &script.start_page {
            session.navigate(page);
        }

        for (i, step) in script.steps.iter().enumerate() {
            ctx.current_step = i;

            if let Err(e) = Self::execute_step(step, i, session, &mut ctx) {
                tracing::warn!(script = %script.name, step = i, error = %e, "script step failed");
                return ScriptResult {
                    script_name: script.name.clone(),
                    passed: false,
                    steps_run: i + 1,
                    assertion_results: ctx.assertion_results,
                    error: Some(format!("Step {} failed: {}", i, e)),
                };
            }
        }

        let passed = ctx.all_passed();
        tracing::info!(
            script = %script.name,
            passed,
            failures = ctx.fail_count(),
            "script finished"
        );
        ScriptResult {
            script_name: script.name.clone(),
            passed,
            steps_run: script.steps.len(),
            assertion_results: ctx.assertion_results,
            error: None,
        }
    }

    fn execute_step(
        step: &ScriptStep,
        step_index: usize,
        session: &mut WizardSession,
        ctx: &mut ScriptContext,
    ) -> Result<(), String> {
        match step {
            ScriptStep::Navigate { page } => {
                session.navigate(page);
                Ok(())
            }

            ScriptStep::Dispatch { action_id } => {
                let outcome = session.dispatch(action_id);
                if outcome.is_recognized() {
                    Ok(())
                } else {
                    Err(format!("Unknown action: {}", action_id))
                }
            }

            ScriptStep::Event { event } => {
                session.handle_event(event.clone());
                Ok(())
            }

            ScriptStep::Reset => {
                session.reset();
                session.load();
                Ok(())
            }

            ScriptStep::Assert { assertions } => {
                let results = assertions
                    .iter()
                    .map(|assertion| Self::evaluate_one(assertion, step_index, session))
                    .collect();
                ctx.record_assertions(results);
                Ok(())
            }
        }
    }

    fn evaluate_one(
        assertion: &Assertion,
        step_index: usize,
        session: &WizardSession,
    ) -> AssertionResult {
        let (passed, actual, failure) = match assertion {
            Assertion::CurrentPage { expected } => {
                let actual = session.current_page().to_string();
                (
                    actual == *expected,
                    actual,
                    format!("current page is not '{}'", expected),
                )
            }

            Assertion::CompletedStepCount { expected } => {
                let count = session.checklist().completed_step_count();
                (
                    count == *expected,
                    count.to_string(),
                    format!("completed step count is {} but expected {}", count, expected),
                )
            }

            Assertion::StepStatus { step_id, expected } => {
                match session.checklist().find_step(step_id) {
                    Some(step) => (
                        step.status == *expected,
                        format!("{:?}", step.status),
                        format!("step '{}' is not {:?}", step_id, expected),
                    ),
                    None => (
                        false,
                        "missing".to_string(),
                        format!("no checklist step '{}'", step_id),
                    ),
                }
            }

            Assertion::ConnectionCount { feed, expected } => {
                let count = session.mapping(*feed).engine.connections().len();
                (
                    count == *expected,
                    count.to_string(),
                    format!(
                        "{} has {} connections but expected {}",
                        feed.label(),
                        count,
                        expected
                    ),
                )
            }

            Assertion::Connected {
                feed,
                left_id,
                right_id,
            } => {
                let engine = &session.mapping(*feed).engine;
                let partner = engine
                    .connection_by_left(left_id)
                    .map(|c| c.right_id.clone());
                (
                    partner.as_deref() == Some(right_id.as_str()),
                    partner.unwrap_or_else(|| "unconnected".to_string()),
                    format!("'{}' is not connected to '{}'", left_id, right_id),
                )
            }

            Assertion::PageNotFound { page } => {
                let view = session.render_page(page);
                (
                    view.is_not_found(),
                    view_kind(&view).to_string(),
                    format!("page '{}' resolved", page),
                )
            }

            Assertion::ComponentCount { expected } => {
                let count = session.render().components().len();
                (
                    count == *expected,
                    count.to_string(),
                    format!("rendered {} components but expected {}", count, expected),
                )
            }

            Assertion::SubmitDisabled { expected } => {
                let disabled = session.external_state().submit_disabled;
                (
                    disabled == *expected,
                    disabled.to_string(),
                    format!("submit disabled is {}", disabled),
                )
            }
        };

        AssertionResult {
            step_index,
            assertion: assertion.clone(),
            passed,
            actual: Some(actual),
            message: if passed { None } else { Some(failure) },
        }
    }
}

fn view_kind(view: &PageView) -> &'static str {
    match view {
        PageView::Loaded { .. } => "loaded",
        PageView::NotFound { .. } => "notFound",
    }
}
