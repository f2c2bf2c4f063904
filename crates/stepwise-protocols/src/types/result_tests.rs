use super::*;
use crate::types::ActionKind;

fn finished(number: u32, status: StepStatus, optional: bool) -> StepResult {
    let mut step = Step::new(number, ActionKind::Click).with_target("#x");
    step.optional = optional;
    let mut result = StepResult::start(&step);
    result.attempts = 1;
    if status == StepStatus::Failed {
        result.error = Some(format!("step {} broke", number));
    }
    result.finish(status);
    result
}

#[test]
fn test_step_result_start_is_running() {
    let step = Step::new(1, ActionKind::Navigate).with_target("https://x.test");
    let result = StepResult::start(&step);
    assert_eq!(result.status, StepStatus::Running);
    assert_eq!(result.action, "navigate");
    assert!(result.finished_at.is_none());
}

#[test]
fn test_step_result_skipped() {
    let step = Step::new(5, ActionKind::Click);
    let result = StepResult::skipped(&step);
    assert_eq!(result.status, StepStatus::Skipped);
    assert_eq!(result.attempts, 0);
    assert!(result.finished_at.is_some());
}

#[test]
fn test_derive_status_all_passed() {
    let steps = vec![
        finished(1, StepStatus::Passed, false),
        finished(2, StepStatus::Passed, false),
    ];
    assert_eq!(TestResult::derive_status(&steps), RunStatus::Passed);
}

#[test]
fn test_derive_status_empty_is_passed() {
    assert_eq!(TestResult::derive_status(&[]), RunStatus::Passed);
}

#[test]
fn test_derive_status_required_failure() {
    let steps = vec![
        finished(1, StepStatus::Passed, false),
        finished(2, StepStatus::Failed, false),
    ];
    assert_eq!(TestResult::derive_status(&steps), RunStatus::Failed);
}

#[test]
fn test_derive_status_optional_failure_is_partial() {
    let steps = vec![finished(1, StepStatus::Failed, true)];
    assert_eq!(TestResult::derive_status(&steps), RunStatus::Partial);
}

#[test]
fn test_derive_status_skipped_is_partial() {
    let steps = vec![
        finished(1, StepStatus::Passed, false),
        finished(2, StepStatus::Skipped, false),
    ];
    assert_eq!(TestResult::derive_status(&steps), RunStatus::Partial);
}

#[test]
fn test_builder_counts_and_invariant() {
    let mut builder = TestResultBuilder::new(Some("checkout".to_string()));
    builder.push(finished(1, StepStatus::Passed, false));
    builder.push(finished(2, StepStatus::Failed, true));
    builder.push(finished(3, StepStatus::Skipped, false));
    let result = builder.finalize();

    assert_eq!(result.passed, 1);
    assert_eq!(result.failed, 1);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.total, 3);
    assert!(result.is_consistent());
    assert_eq!(result.status, RunStatus::Partial);
    assert_eq!(result.plan_name.as_deref(), Some("checkout"));
}

#[test]
fn test_builder_first_failure_summary() {
    let mut builder = TestResultBuilder::new(None);
    builder.push(finished(1, StepStatus::Passed, false));
    let mut failed = finished(2, StepStatus::Failed, false);
    failed.screenshot = Some("artifacts/step-02-screenshot.png".to_string());
    builder.push(failed);
    let result = builder.finalize();

    let first = result.first_failure.as_ref().unwrap();
    assert_eq!(first.step_number, 2);
    assert_eq!(first.error, "step 2 broke");
    assert_eq!(first.screenshot.as_deref(), Some("artifacts/step-02-screenshot.png"));
    assert!(result.error.as_ref().unwrap().contains("Step 2"));
    assert_eq!(result.status, RunStatus::Failed);
}

#[test]
fn test_builder_running_step_counted_as_failed() {
    let step = Step::new(1, ActionKind::Click);
    let mut builder = TestResultBuilder::new(None);
    builder.push(StepResult::start(&step));
    let result = builder.finalize();
    assert_eq!(result.failed, 1);
    assert_eq!(result.steps[0].status, StepStatus::Failed);
    assert!(result.is_consistent());
}

#[test]
fn test_builder_run_error_wins() {
    let mut builder = TestResultBuilder::new(None);
    builder.push(finished(1, StepStatus::Passed, false));
    builder.fail_run("Browser launch failed: no chrome");
    builder.fail_run("second message ignored");
    let result = builder.finalize();
    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(result.error.as_deref(), Some("Browser launch failed: no chrome"));
    assert!(result.is_consistent());
}

#[test]
fn test_result_serialization_shape() {
    let mut builder = TestResultBuilder::new(None);
    builder.push(finished(1, StepStatus::Passed, false));
    let result = builder.finalize();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "passed");
    assert_eq!(json["steps"][0]["status"], "passed");
    assert!(json.get("first_failure").is_none());
}
