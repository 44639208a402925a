//! Acceptance tests against a live Plus Code link page.
//!
//! Requires Chromium and a running instance of the page:
//!
//! ```bash
//! PLUSLINK_BASE_URL=http://localhost:4173 \
//!     cargo test -p pluslink-e2e --features browser -- --ignored
//! ```

#![cfg(feature = "browser")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use pluslink_e2e::prelude::*;
use std::time::Duration;

fn base_url() -> String {
    std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

fn browser() -> BrowserConfig {
    let mut config = BrowserConfig::default();
    if std::env::var("CI").is_ok() {
        config = config.with_no_sandbox();
    }
    config
}

async fn assert_button_visible(target: &str, name: &str) {
    let factory = ChromiumFactory::launch(
        &browser(),
        Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
    )
    .await
    .expect("chromium should launch");

    let mut page = factory.open().await.expect("context should open");
    let url = NavigationTarget::parse(target).unwrap().resolve(&base_url());
    let outcome = async {
        page.navigate(&url).await?;
        expect(Locator::button(name)).to_be_visible().verify(&page).await
    }
    .await;

    page.close().await.unwrap();
    factory.shutdown().await.unwrap();
    outcome.unwrap_or_else(|e| panic!("{url}: {e}"));
}

#[tokio::test]
#[ignore = "requires chromium and a running page"]
async fn renders_locate_me_button() {
    assert_button_visible("/", "Locate Me").await;
}

#[tokio::test]
#[ignore = "requires chromium and a running page"]
async fn renders_locate_me_button_when_passed_invalid_code() {
    assert_button_visible("/#12345678+90", "Locate Me").await;
}

#[tokio::test]
#[ignore = "requires chromium and a running page"]
async fn renders_waze_button_when_passed_valid_code() {
    assert_button_visible("/#86x4rv66+99", "Waze").await;
}

#[tokio::test]
#[ignore = "requires chromium and a running page"]
async fn renders_apple_maps_button_when_passed_valid_code() {
    assert_button_visible("/#86x4rv66+99", "Apple Maps").await;
}

#[tokio::test]
#[ignore = "requires chromium and a running page"]
async fn renders_google_maps_button_when_passed_valid_code() {
    assert_button_visible("/#86x4rv66+99", "Google Maps").await;
}

#[tokio::test]
#[ignore = "requires chromium and a running page"]
async fn builtin_suite_passes_twice_in_fresh_contexts() {
    let config = HarnessConfig::new()
        .with_base_url(base_url())
        .with_browser(browser())
        .with_repeat(2);
    let factory = ChromiumFactory::launch(
        &config.browser,
        Duration::from_millis(config.navigation_timeout_ms),
    )
    .await
    .unwrap();
    let runner = SuiteRunner::new(factory, config).unwrap();

    let results = runner.run(&TestSuite::plus_code_links(), None).await;
    runner.shutdown().await.unwrap();

    let report = Reporter::from_results(&results);
    assert!(report.all_passed(), "{}", report.render_junit());
    assert_eq!(results.total(), 10);
}
