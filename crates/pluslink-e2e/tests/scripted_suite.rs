//! The built-in suite against scripted pages that model the Plus Code link page.
#![allow(clippy::unwrap_used)]

use pluslink_e2e::prelude::*;
use proptest::prelude::*;

fn fallback() -> Vec<AccessibleElement> {
    vec![
        AccessibleElement::new("h1").with_text("Plus Code Links"),
        AccessibleElement::button("Locate Me"),
    ]
}

/// The page as the suite expects it to behave
fn working_site() -> MockSite {
    MockSite::new()
        .page("", fallback())
        .page(INVALID_PLUS_CODE, fallback())
        .page(
            VALID_PLUS_CODE,
            vec![
                AccessibleElement::new("a")
                    .with_role("button")
                    .with_aria_label("Waze"),
                AccessibleElement::new("input")
                    .with_input_type("button")
                    .with_value("Apple Maps"),
                AccessibleElement::button("  Google\n Maps "),
            ],
        )
}

fn harness() -> HarnessConfig {
    HarnessConfig::new()
        .with_base_url("http://localhost:4173")
        .with_timeout(200)
        .with_poll_interval(5)
}

#[tokio::test]
async fn builtin_suite_passes_against_working_page() {
    let factory = MockFactory::new(working_site());
    let runner = SuiteRunner::new(factory.clone(), harness()).unwrap();
    let results = runner.run(&TestSuite::plus_code_links(), None).await;

    assert!(results.all_passed(), "{:?}", results.failures());
    assert_eq!(results.passed_count(), 5);
    assert_eq!(factory.opened(), 5);
    assert_eq!(factory.closed(), 5);
}

#[tokio::test]
async fn map_buttons_rendered_late_are_waited_for() {
    let site = MockSite::new()
        .page("", fallback())
        .page(INVALID_PLUS_CODE, fallback())
        .late_element(VALID_PLUS_CODE, AccessibleElement::button("Waze"), 3)
        .late_element(VALID_PLUS_CODE, AccessibleElement::button("Apple Maps"), 3)
        .late_element(VALID_PLUS_CODE, AccessibleElement::button("Google Maps"), 3);
    let runner = SuiteRunner::new(MockFactory::new(site), harness()).unwrap();
    let results = runner.run(&TestSuite::plus_code_links(), None).await;
    assert!(results.all_passed(), "{:?}", results.failures());
}

#[tokio::test]
async fn hidden_map_button_times_out_with_state() {
    let site = working_site().page(
        VALID_PLUS_CODE,
        vec![
            AccessibleElement::button("Waze").with_visible(false),
            AccessibleElement::button("Apple Maps"),
            AccessibleElement::button("Google Maps"),
        ],
    );
    let runner = SuiteRunner::new(MockFactory::new(site), harness()).unwrap();
    let results = runner
        .run(&TestSuite::plus_code_links(), Some("Waze"))
        .await;

    let failure = &results.results[0];
    assert_eq!(failure.failure, Some(FailureKind::Timeout));
    assert!(failure.message.as_deref().unwrap().contains("none visible"));
}

#[tokio::test]
async fn hidden_duplicate_of_map_button_still_passes() {
    // Responsive layouts often keep a hidden copy of a control around
    let site = working_site().page(
        VALID_PLUS_CODE,
        vec![
            AccessibleElement::button("Waze").with_visible(false),
            AccessibleElement::button("Waze"),
            AccessibleElement::button("Apple Maps"),
            AccessibleElement::button("Google Maps"),
        ],
    );
    let runner = SuiteRunner::new(MockFactory::new(site), harness()).unwrap();
    let results = runner
        .run(&TestSuite::plus_code_links(), Some("[Waze]"))
        .await;

    assert_eq!(results.total(), 1);
    assert_eq!(results.results[0].status, CaseStatus::Passed);
}

#[tokio::test]
async fn duplicate_buttons_are_an_assertion_failure() {
    let site = working_site().page(
        "",
        vec![
            AccessibleElement::button("Locate Me"),
            AccessibleElement::button("Locate Me"),
        ],
    );
    let runner = SuiteRunner::new(MockFactory::new(site), harness()).unwrap();
    let results = runner
        .run(&TestSuite::plus_code_links(), Some("renders [Locate Me] button"))
        .await;

    // Both fallback cases match the filter; only the root page is ambiguous
    assert_eq!(results.total(), 2);
    assert_eq!(results.results[0].failure, Some(FailureKind::Assertion));
    assert!(results.results[1].is_passed());
}

#[tokio::test]
async fn unreachable_page_is_a_navigation_failure() {
    let factory = MockFactory::new(working_site().unreachable());
    let runner = SuiteRunner::new(factory.clone(), harness()).unwrap();
    let results = runner.run(&TestSuite::plus_code_links(), None).await;

    assert_eq!(results.failed_count(), 5);
    assert!(results
        .failures()
        .iter()
        .all(|r| r.failure == Some(FailureKind::Navigation)));
    assert_eq!(factory.closed(), 5);
}

#[tokio::test]
async fn yaml_suite_runs_like_builtin() {
    let yaml = TestSuite::plus_code_links().to_yaml().unwrap();
    let suite = TestSuite::from_yaml(&yaml).unwrap();
    let runner = SuiteRunner::new(MockFactory::new(working_site()), harness()).unwrap();
    assert!(runner.run(&suite, None).await.all_passed());
}

fn outcomes(results: &SuiteResults) -> Vec<(CaseStatus, Option<FailureKind>)> {
    results.results.iter().map(|r| (r.status, r.failure)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Repeating the suite in fresh contexts never changes an outcome
    #[test]
    fn repeated_runs_agree(repeat in 1u32..4, hide_waze in any::<bool>()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let site = if hide_waze {
            working_site().page(VALID_PLUS_CODE, vec![AccessibleElement::button("Apple Maps")])
        } else {
            working_site()
        };
        let config = harness().with_timeout(30).with_repeat(repeat);
        let runner = SuiteRunner::new(MockFactory::new(site), config).unwrap();

        let results = rt.block_on(runner.run(&TestSuite::plus_code_links(), None));
        let per_run: Vec<_> = outcomes(&results)
            .chunks(repeat as usize)
            .map(|chunk| {
                prop_assert!(chunk.iter().all(|o| *o == chunk[0]));
                Ok(chunk[0])
            })
            .collect::<Result<_, TestCaseError>>()?;
        prop_assert_eq!(per_run.len(), 5);
    }
}
