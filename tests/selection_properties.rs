//! Property-based tests for selection, loader and feedback invariants
//!
//! Drives `AppModel::update` with generated message sequences and checks the
//! invariants the dashboard relies on: results never outlive the host they
//! were loaded for, failures leave nothing stale behind, and only real
//! selection changes reach the network.

use hostlens_api::{AnomalyReport, ApiError, Host, MetricCategory, MetricPoint, Timestamp};
use hostlens_tui::{AppMessage, AppModel, Command, LoadState, Loader, Resolution, Tab};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

const HOST_IDS: [&str; 3] = ["10101", "10102", "10103"];

fn arb_host() -> impl Strategy<Value = String> {
    prop::sample::select(HOST_IDS.to_vec()).prop_map(str::to_string)
}

fn arb_category() -> impl Strategy<Value = MetricCategory> {
    prop::sample::select(MetricCategory::ALL.to_vec())
}

fn arb_points() -> impl Strategy<Value = Vec<MetricPoint>> {
    prop::collection::vec(
        (0u32..86_400, -1000.0f64..1000.0)
            .prop_map(|(t, v)| MetricPoint::new(Timestamp::Epoch(t as f64), v)),
        0..20,
    )
}

fn arb_blank_host() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[ \t]{0,4}".prop_map(Some)]
}

#[derive(Debug, Clone)]
enum NavAction {
    Toggle,
    Select(Tab),
    Next,
}

fn arb_nav_action() -> impl Strategy<Value = NavAction> {
    prop_oneof![
        Just(NavAction::Toggle),
        Just(NavAction::Select(Tab::Dashboard)),
        Just(NavAction::Select(Tab::Analysis)),
        Just(NavAction::Next),
    ]
}

// ============================================================================
// Helpers
// ============================================================================

fn model_with_hosts() -> AppModel {
    let (model, commands) = AppModel::default().bootstrap();
    let tag = match commands.as_slice() {
        [Command::FetchHosts(tag)] => tag.clone(),
        other => panic!("unexpected start-up commands {:?}", other),
    };
    let hosts = HOST_IDS
        .iter()
        .map(|id| Host::new(*id, format!("host-{}", id)))
        .collect();
    model
        .update(AppMessage::HostsLoaded {
            tag,
            result: Ok(hosts),
        })
        .0
}

fn chart_fetches(commands: &[Command]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, Command::FetchChart(_)))
        .count()
}

/// Select `host`, then load and resolve every host-scoped view
fn fully_loaded(host: &str, points: Vec<MetricPoint>) -> AppModel {
    let (mut model, _) =
        model_with_hosts().update(AppMessage::HostSelected(Some(host.to_string())));

    for request in [
        AppMessage::LoadChartRequested,
        AppMessage::DetectAnomaliesRequested,
        AppMessage::AnalyzeRootCauseRequested,
    ] {
        let (next, commands) = model.update(request);
        model = next;
        let reply = match commands.into_iter().next() {
            Some(Command::FetchChart(tag)) => AppMessage::ChartLoaded {
                tag,
                result: Ok(points.clone()),
            },
            Some(Command::DetectAnomalies(tag)) => AppMessage::AnomaliesLoaded {
                tag,
                result: Ok(AnomalyReport::default()),
            },
            Some(Command::AnalyzeRootCause(tag)) => AppMessage::RootCauseLoaded {
                tag,
                result: Ok(Default::default()),
            },
            other => panic!("unexpected command {:?}", other),
        };
        model = model.update(reply).0;
    }
    model
}

// ============================================================================
// Host change clears results
// For any two distinct hosts, switching clears chart and analysis results.
// ============================================================================

proptest! {
    #[test]
    fn prop_host_change_clears_results(
        from in arb_host(),
        to in arb_host(),
        points in arb_points(),
    ) {
        prop_assume!(from != to);
        let model = fully_loaded(&from, points);
        prop_assert!(model.chart.data().is_some());
        prop_assert!(model.anomalies.data().is_some());
        prop_assert!(model.root_cause.data().is_some());

        let (model, commands) = model.update(AppMessage::HostSelected(Some(to)));

        prop_assert!(commands.is_empty());
        prop_assert_eq!(model.chart.state(), &LoadState::Idle);
        prop_assert_eq!(model.anomalies.state(), &LoadState::Idle);
        prop_assert_eq!(model.root_cause.state(), &LoadState::Idle);
    }

    #[test]
    fn prop_reselecting_host_keeps_results(host in arb_host(), points in arb_points()) {
        let model = fully_loaded(&host, points.clone());
        let (model, commands) = model.update(AppMessage::HostSelected(Some(host)));

        prop_assert!(commands.is_empty());
        prop_assert_eq!(model.chart.data(), Some(&points));
    }
}

// ============================================================================
// Failure clears data
// For any history of successful loads, a failure leaves no data and no
// loading flag behind.
// ============================================================================

proptest! {
    #[test]
    fn prop_failure_clears_loaded_data(
        values in prop::collection::vec(any::<u32>(), 0..10),
        message in "[a-zA-Z ]{1,40}",
    ) {
        let mut loader: Loader<(), u32> = Loader::new();
        for value in values {
            let tag = loader.begin(());
            prop_assert_eq!(loader.resolve(&tag, Ok(value)), Resolution::Applied);
        }

        let tag = loader.begin(());
        loader.resolve(&tag, Err(message.clone()));

        prop_assert!(!loader.is_loading());
        prop_assert!(loader.data().is_none());
        prop_assert_eq!(loader.error(), Some(message.as_str()));
    }

    #[test]
    fn prop_only_newest_request_applies(
        count in 1usize..12,
        rotation in 0usize..12,
    ) {
        let mut loader: Loader<usize, usize> = Loader::new();
        let tags: Vec<_> = (0..count).map(|i| loader.begin(i)).collect();

        // Deliver the superseded responses in a scrambled order first
        let mut stale: Vec<_> = tags[..count - 1].to_vec();
        let len = stale.len().max(1);
        stale.rotate_left(rotation % len);
        for tag in &stale {
            prop_assert_eq!(loader.resolve(tag, Ok(tag.key)), Resolution::Stale);
            prop_assert!(loader.is_loading());
        }

        let newest = &tags[count - 1];
        prop_assert_eq!(loader.resolve(newest, Ok(newest.key)), Resolution::Applied);
        prop_assert_eq!(loader.data(), Some(&(count - 1)));
    }
}

// ============================================================================
// Category changes
// With a host selected every real category change issues exactly one chart
// load; without a host none is issued.
// ============================================================================

proptest! {
    #[test]
    fn prop_one_chart_load_per_category_change(
        host in arb_host(),
        categories in prop::collection::vec(arb_category(), 1..15),
    ) {
        let (mut model, _) = model_with_hosts().update(AppMessage::HostSelected(Some(host)));
        let mut previous = model.selection.category;
        let mut expected = 0;
        let mut issued = 0;

        for category in categories {
            if category != previous {
                expected += 1;
            }
            previous = category;

            let (next, commands) = model.update(AppMessage::CategorySelected(category));
            model = next;
            issued += chart_fetches(&commands);
        }

        prop_assert_eq!(issued, expected);
    }

    #[test]
    fn prop_no_chart_load_without_host(
        categories in prop::collection::vec(arb_category(), 1..15),
    ) {
        let mut model = model_with_hosts();
        for category in categories {
            let (next, commands) = model.update(AppMessage::CategorySelected(category));
            model = next;
            prop_assert!(commands.is_empty());
        }

        let (_, commands) = model.update(AppMessage::LoadChartRequested);
        prop_assert!(commands.is_empty());
    }

    #[test]
    fn prop_late_chart_response_for_old_category_is_dropped(
        host in arb_host(),
        first in arb_category(),
        second in arb_category(),
        stale_points in arb_points(),
    ) {
        prop_assume!(first != second);
        let (model, _) = model_with_hosts().update(AppMessage::HostSelected(Some(host)));
        let (model, _) = model.update(AppMessage::CategorySelected(first));
        let (model, commands) = model.update(AppMessage::LoadChartRequested);
        let old_tag = match commands.as_slice() {
            [Command::FetchChart(tag)] => tag.clone(),
            other => panic!("unexpected {:?}", other),
        };

        let (model, _) = model.update(AppMessage::CategorySelected(second));
        let (model, _) = model.update(AppMessage::ChartLoaded {
            tag: old_tag,
            result: Ok(stale_points),
        });

        prop_assert!(model.chart.is_loading());
        prop_assert_eq!(model.chart.key().map(|k| k.category), Some(second));
    }
}

// ============================================================================
// Feedback
// A blank or missing host never produces a submission.
// ============================================================================

proptest! {
    #[test]
    fn prop_feedback_with_blank_host_never_submits(
        host in arb_blank_host(),
        comment in ".{0,60}",
        toggle in any::<bool>(),
    ) {
        let mut model = model_with_hosts();
        model.selection.host_id = host;
        model.feedback.comment = comment.clone();
        if toggle {
            model = model.update(AppMessage::FeedbackVerdictToggled).0;
        }

        let (model, commands) = model.update(AppMessage::FeedbackSubmitRequested);

        prop_assert!(commands.is_empty());
        prop_assert!(!model.feedback.submitting);
        prop_assert_eq!(model.feedback.comment, comment);
    }

    #[test]
    fn prop_failed_submission_keeps_form(comment in "[a-z ]{1,40}", status in 400u16..600) {
        let (mut model, _) =
            model_with_hosts().update(AppMessage::HostSelected(Some("10101".to_string())));
        model.feedback.comment = comment.clone();

        let (model, commands) = model.update(AppMessage::FeedbackSubmitRequested);
        let submission = match commands.as_slice() {
            [Command::SubmitFeedback(s)] => s.clone(),
            other => panic!("unexpected {:?}", other),
        };
        let (model, _) = model.update(AppMessage::FeedbackSubmitted {
            submission,
            result: Err(ApiError::Http { status, body: String::new() }),
        });

        prop_assert_eq!(model.feedback.comment, comment);
        prop_assert!(model.feedback.status.is_some());
    }
}

// ============================================================================
// Navigation
// Shell changes never reach the network and derived layout follows state.
// ============================================================================

proptest! {
    #[test]
    fn prop_navigation_is_local(actions in prop::collection::vec(arb_nav_action(), 0..20)) {
        let mut model = model_with_hosts();
        let mut open = model.navigation.sidebar_open;

        for action in actions {
            let message = match action {
                NavAction::Toggle => {
                    open = !open;
                    AppMessage::SidebarToggled
                }
                NavAction::Select(tab) => AppMessage::TabSelected(tab),
                NavAction::Next => AppMessage::NextTab,
            };
            let (next, commands) = model.update(message);
            model = next;
            prop_assert!(commands.is_empty());
        }

        prop_assert_eq!(model.navigation.sidebar_open, open);
        prop_assert_eq!(model.navigation.toggle_glyph(), if open { "‹" } else { "›" });
        prop_assert_eq!(model.navigation.sidebar_class(), if open { "open" } else { "closed" });
    }
}
