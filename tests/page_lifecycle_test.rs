//! Page creation fault boundary, close-once guard and load verification

use std::time::Duration;

use kodegen_tools_stocknews::page_lifecycle::{StabilityWindow, wait_for_stability};
use kodegen_tools_stocknews::{
    Deadline, NavigateOptions, ScrapeError, create_page, navigate_and_verify,
};

mod common;
use common::{Creation, MockBrowser, SiteScript, test_config};

const URL: &str = "https://news.example/a";

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(600))
}

#[tokio::test]
async fn test_create_page_converts_driver_panic() {
    let browser = MockBrowser::new().with_creations(&[Creation::Panic]);

    let result = create_page(&browser, Duration::from_secs(60), &deadline(), "panicky").await;

    match result {
        Err(ScrapeError::PageCreation(message)) => {
            assert!(message.contains("driver crashed while opening a tab"));
        }
        Err(other) => panic!("expected PageCreation, got {other}"),
        Ok(_) => panic!("expected PageCreation, got a page"),
    }
    assert_eq!(browser.pages_created(), 0);
}

#[tokio::test]
async fn test_create_page_rejects_missing_page_and_errors() {
    let browser = MockBrowser::new().with_creations(&[Creation::Empty, Creation::Error]);

    for _ in 0..2 {
        let result = create_page(&browser, Duration::from_secs(60), &deadline(), "x").await;
        assert!(matches!(result, Err(ScrapeError::PageCreation(_))));
    }

    // Plan exhausted: creation works again
    let guard = create_page(&browser, Duration::from_secs(60), &deadline(), "x")
        .await
        .unwrap();
    guard.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_create_page_timeout_leaves_stalled_tab_to_session() {
    let browser = MockBrowser::new().with_creations(&[Creation::Stalled]);

    let result = create_page(&browser, Duration::from_secs(5), &deadline(), "stalled").await;

    match result {
        Err(ScrapeError::PageCreation(message)) => assert!(message.contains("timed out")),
        Err(other) => panic!("expected PageCreation, got {other}"),
        Ok(_) => panic!("expected PageCreation, got a page"),
    }
    // No guard exists for the orphaned tab; browser shutdown reclaims it
    assert_eq!(browser.pages_created(), 1);
    assert_eq!(browser.pages_closed(), 0);
}

#[tokio::test]
async fn test_create_page_observes_cancellation() {
    let browser = MockBrowser::new();
    let deadline = deadline();
    deadline.cancel();

    let result = create_page(&browser, Duration::from_secs(60), &deadline, "x").await;

    assert!(matches!(result, Err(ScrapeError::Cancelled(_))));
    assert_eq!(browser.pages_created(), 0);
}

#[tokio::test]
async fn test_guard_close_is_idempotent() {
    let browser = MockBrowser::new();
    let guard = create_page(&browser, Duration::from_secs(60), &deadline(), "x")
        .await
        .unwrap();

    guard.close().await;
    guard.close().await;

    assert!(guard.is_closed());
    assert_eq!(guard.page().close_count(), 1);
    drop(guard);
    tokio::task::yield_now().await;
    assert_eq!(browser.pages_closed(), 1);
}

#[tokio::test]
async fn test_dropped_guard_still_closes_page() {
    let browser = MockBrowser::new();
    let guard = create_page(&browser, Duration::from_secs(60), &deadline(), "x")
        .await
        .unwrap();
    let page = guard.page().clone();

    drop(guard);
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    assert_eq!(page.close_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_navigate_verifies_title() {
    let browser = MockBrowser::new().with_site(URL, SiteScript::titled("Loaded"));
    let page = browser.blank_page();
    let options = NavigateOptions::for_fetch(&test_config());

    navigate_and_verify(&page, URL, &options).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_navigate_distinguishes_transport_and_verification_failures() {
    let browser = MockBrowser::new()
        .with_site(URL, SiteScript::untitled())
        .with_site("https://down.example/", SiteScript::unreachable());
    let page = browser.blank_page();
    let options = NavigateOptions::for_fetch(&test_config());

    let untitled = navigate_and_verify(&page, URL, &options).await;
    assert!(matches!(untitled, Err(ScrapeError::LoadVerification { .. })));

    let down = navigate_and_verify(&page, "https://down.example/", &options).await;
    assert!(matches!(down, Err(ScrapeError::Navigation { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_navigation_timeout_is_a_navigation_error() {
    let browser = MockBrowser::new().with_site(
        URL,
        SiteScript::titled("Slow").with_navigation_delay(Duration::from_secs(600)),
    );
    let page = browser.blank_page();
    let options = NavigateOptions::for_fetch(&test_config());

    let result = navigate_and_verify(&page, URL, &options).await;

    match result {
        Err(ScrapeError::Navigation { message, .. }) => assert!(message.contains("timeout")),
        other => panic!("expected navigation timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_search_navigation_waits_for_stability() {
    let browser = MockBrowser::new().with_site(URL, SiteScript::titled("Results"));
    let page = browser.blank_page();
    let options = NavigateOptions::for_search(&test_config());

    let started = tokio::time::Instant::now();
    navigate_and_verify(&page, URL, &options).await.unwrap();

    // settle (1s) + quiet interval (2s) + post-stability pause (2s)
    assert!(started.elapsed() >= Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_stability_wait_gives_up_after_window() {
    let browser = MockBrowser::new().with_site(URL, SiteScript::titled("Busy").mutating());
    let page = browser.page_at(URL).await;

    let started = tokio::time::Instant::now();
    let stable = wait_for_stability(
        &page,
        StabilityWindow::new(Duration::from_secs(3), Duration::from_secs(30)),
    )
    .await;

    assert!(!stable);
    assert!(started.elapsed() >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_stability_wait_returns_once_quiet() {
    let browser = MockBrowser::new().with_site(URL, SiteScript::titled("Calm"));
    let page = browser.page_at(URL).await;

    let started = tokio::time::Instant::now();
    let stable = wait_for_stability(
        &page,
        StabilityWindow::new(Duration::from_secs(3), Duration::from_secs(30)),
    )
    .await;

    assert!(stable);
    assert!(started.elapsed() < Duration::from_secs(5));
}
