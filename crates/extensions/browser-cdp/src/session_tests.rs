use super::*;

#[test]
fn test_excerpt_collapses_whitespace() {
    assert_eq!(excerpt("  Welcome\n\n  back,   Ada  "), "Welcome back, Ada");
}

#[test]
fn test_excerpt_truncates_long_text() {
    let text = "word ".repeat(100);
    let short = excerpt(&text);
    assert!(short.ends_with("..."));
    assert_eq!(short.chars().count(), EXCERPT_LIMIT + 3);
}

#[test]
fn test_assert_that() {
    assert!(assert_that(true, || unreachable!()).is_ok());
    let err = assert_that(false, || "#banner is still visible".to_string()).unwrap_err();
    assert!(matches!(err, ActionError::AssertionFailed(msg) if msg == "#banner is still visible"));
}

#[tokio::test(start_paused = true)]
async fn test_poll_sleep_is_capped_by_deadline() {
    let start = Instant::now();
    let deadline = start + Duration::from_millis(30);

    assert!(sleep_until_next_poll(deadline).await);
    assert!(Instant::now() >= deadline);
    assert!(!sleep_until_next_poll(deadline).await);
}

#[tokio::test(start_paused = true)]
async fn test_poll_sleep_uses_interval() {
    let start = Instant::now();
    let deadline = start + Duration::from_secs(5);

    assert!(sleep_until_next_poll(deadline).await);
    let waited = Instant::now() - start;
    assert!(waited >= POLL_INTERVAL && waited < Duration::from_secs(1));
}
