use super::*;

#[test]
fn test_action_kind_parse_case_insensitive() {
    assert_eq!(ActionKind::parse("click"), Some(ActionKind::Click));
    assert_eq!(ActionKind::parse("Navigate"), Some(ActionKind::Navigate));
    assert_eq!(ActionKind::parse(" VERIFY "), Some(ActionKind::Verify));
    assert_eq!(ActionKind::parse("drag"), None);
}

#[test]
fn test_action_kind_text_entry() {
    assert!(ActionKind::Type.is_text_entry());
    assert!(!ActionKind::Click.is_text_entry());
    assert!(!ActionKind::Select.is_text_entry());
}

#[test]
fn test_step_action_unknown_deserializes() {
    let step: Step = serde_json::from_str(r#"{"number": 4, "action": "drag"}"#).unwrap();
    assert_eq!(step.action, StepAction::Unsupported("drag".to_string()));
    assert_eq!(step.action.kind(), None);
}

#[test]
fn test_step_action_serializes_as_name() {
    let json = serde_json::to_string(&StepAction::Known(ActionKind::Hover)).unwrap();
    assert_eq!(json, "\"hover\"");
}

#[test]
fn test_step_deserialize_full() {
    let json = serde_json::json!({
        "step_number": 2,
        "action": "Verify",
        "target": "#missing",
        "expected": "element visible",
        "timeout_ms": 5000,
        "retries": 1,
        "optional": true
    });
    let step: Step = serde_json::from_value(json).unwrap();
    assert_eq!(step.number, 2);
    assert_eq!(step.action.kind(), Some(ActionKind::Verify));
    assert_eq!(step.assertion.as_deref(), Some("element visible"));
    assert_eq!(step.timeout_ms, Some(5000));
    assert_eq!(step.retries, Some(1));
    assert!(step.optional);
}

#[test]
fn test_step_defaults() {
    let step: Step = serde_json::from_str(r#"{"number": 1, "action": "click"}"#).unwrap();
    assert!(step.target.is_none());
    assert!(step.retries.is_none());
    assert!(!step.optional);
}

#[test]
fn test_target_ref_locator() {
    let step = Step::new(1, ActionKind::Click).with_target("#login");
    assert_eq!(step.target_ref(), Some(TargetRef::Locator("#login")));
}

#[test]
fn test_target_ref_description() {
    let step = Step::new(1, ActionKind::Click).with_target("the login button");
    assert_eq!(step.target_ref(), Some(TargetRef::Description("the login button")));
}

#[test]
fn test_target_ref_blank() {
    let step = Step::new(1, ActionKind::Wait).with_target("   ");
    assert_eq!(step.target_ref(), None);
}

#[test]
fn test_structural_locators() {
    for locator in [
        "#missing",
        ".btn-primary",
        "[data-testid=save]",
        "button.primary",
        "input[name=q]",
        "input[placeholder='Search here']",
        "form > button",
        "a:first-child",
        "//div[@id='x']",
        "xpath=//button",
        "text=\"Log In\"",
        "css=div",
    ] {
        assert!(is_structural_locator(locator), "expected locator: {locator}");
    }
}

#[test]
fn test_descriptions_are_not_locators() {
    for description in [
        "the login button",
        "Submit",
        "Email address field",
        "Mr.Smith profile link",
        "button",
        "Click here.",
        "#",
    ] {
        assert!(
            !is_structural_locator(description),
            "expected description: {description}"
        );
    }
}

#[test]
fn test_plan_from_json_object() {
    let raw = r#"{"name": "login", "steps": [{"number": 1, "action": "navigate", "target": "https://x.test"}]}"#;
    let plan = TestPlan::from_json(raw).unwrap();
    assert_eq!(plan.name.as_deref(), Some("login"));
    assert_eq!(plan.steps.len(), 1);
}

#[test]
fn test_plan_from_json_array() {
    let raw = r#"[{"number": 1, "action": "click", "target": "OK"}, {"number": 2, "action": "press", "data": "Enter"}]"#;
    let plan = TestPlan::from_json(raw).unwrap();
    assert!(plan.name.is_none());
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.steps[1].data.as_deref(), Some("Enter"));
}

#[test]
fn test_step_builder() {
    let step = Step::new(3, ActionKind::Type)
        .with_target("Email")
        .with_data("a@b.test")
        .with_retries(0)
        .optional();
    assert_eq!(step.retries, Some(0));
    assert!(step.optional);
    assert_eq!(step.data.as_deref(), Some("a@b.test"));
}
