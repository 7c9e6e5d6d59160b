// ABOUTME: Integration tests for the health-gated poll loop.
// ABOUTME: Drives the sequencer with scripted probes and a recording ticker.

mod support;

use mediastack::runtime::HealthState::{self, *};
use mediastack::sequencer::{
    DeploymentConfig, Sequencer, SequencerError, SequencerOutcome, TokioTicker, run_sequencer,
    take_snapshot,
};
use proptest::prelude::*;
use std::time::Duration;
use support::{RecordingTicker, ScriptedProbe, gate, name};

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

mod outcomes {
    use super::*;

    #[tokio::test]
    async fn all_healthy_is_stable_on_first_tick_without_waiting() {
        support::init_tracing();
        let config = gate(&["gluetun", "sonarr", "radarr"], 10, 300);
        let probe = ScriptedProbe::new()
            .always("gluetun", Healthy)
            .always("sonarr", Healthy)
            .always("radarr", Healthy);
        let mut ticker = RecordingTicker::default();

        let report = Sequencer::new(&config, &probe).run(&mut ticker).await.unwrap();

        assert_eq!(report.outcome, SequencerOutcome::AllStable);
        assert_eq!(report.polls, 1);
        assert_eq!(report.elapsed, Duration::ZERO);
        assert!(ticker.waits.is_empty());
        assert_eq!(probe.total_calls(), 3);
    }

    #[tokio::test]
    async fn service_stuck_starting_times_out_after_ceil_polls() {
        let config = gate(&["sonarr", "radarr"], 10, 25);
        let probe = ScriptedProbe::new()
            .always("sonarr", Healthy)
            .always("radarr", Starting);
        let mut ticker = RecordingTicker::default();

        let report = Sequencer::new(&config, &probe).run(&mut ticker).await.unwrap();

        assert_eq!(report.outcome, SequencerOutcome::TimedOut);
        assert_eq!(report.polls, 3);
        assert_eq!(ticker.waits, vec![secs(10); 3]);
        assert_eq!(report.elapsed, secs(30));
        assert_eq!(report.snapshot.state_of(&name("radarr")), Some(Starting));
    }

    #[tokio::test]
    async fn elapsed_reaching_timeout_exactly_times_out() {
        let config = gate(&["jellyfin"], 10, 30);
        let probe = ScriptedProbe::new().always("jellyfin", Unhealthy);
        let mut ticker = RecordingTicker::default();

        let report = Sequencer::new(&config, &probe).run(&mut ticker).await.unwrap();

        assert_eq!(report.outcome, SequencerOutcome::TimedOut);
        assert_eq!(report.elapsed, secs(30));
        assert_eq!(report.polls, 3);
    }

    #[tokio::test]
    async fn oversized_durations_time_out_without_overflow() {
        let config = DeploymentConfig::builder([name("jellyfin")])
            .poll_interval(secs(u64::MAX / 2 + 1))
            .timeout(secs(u64::MAX))
            .build()
            .unwrap();
        let probe = ScriptedProbe::new().always("jellyfin", Starting);
        let mut ticker = RecordingTicker::default();

        let report = Sequencer::new(&config, &probe).run(&mut ticker).await.unwrap();

        assert_eq!(report.outcome, SequencerOutcome::TimedOut);
        assert_eq!(report.polls, 2);
        assert_eq!(ticker.waits.len(), 2);
        assert!(report.elapsed >= config.timeout());
    }

    #[tokio::test]
    async fn missing_container_does_not_block() {
        let config = gate(&["sonarr", "bazarr"], 10, 300);
        // bazarr is unscripted and therefore NotFound on every query.
        let probe = ScriptedProbe::new().always("sonarr", Healthy);
        let mut ticker = RecordingTicker::default();

        let report = Sequencer::new(&config, &probe).run(&mut ticker).await.unwrap();

        assert_eq!(report.outcome, SequencerOutcome::AllStable);
        assert_eq!(report.polls, 1);
        assert_eq!(report.snapshot.absent().count(), 1);
    }

    #[tokio::test]
    async fn stopped_container_does_not_block() {
        let config = gate(&["sonarr", "lidarr"], 10, 300);
        let probe = ScriptedProbe::new()
            .always("sonarr", Healthy)
            .always("lidarr", NotRunning);
        let mut ticker = RecordingTicker::default();

        let report = Sequencer::new(&config, &probe).run(&mut ticker).await.unwrap();

        assert_eq!(report.outcome, SequencerOutcome::AllStable);
    }

    #[tokio::test]
    async fn running_without_healthcheck_blocks() {
        let config = gate(&["prowlarr"], 5, 10);
        let probe = ScriptedProbe::new().always("prowlarr", NoHealthcheck);
        let mut ticker = RecordingTicker::default();

        let report = Sequencer::new(&config, &probe).run(&mut ticker).await.unwrap();

        assert_eq!(report.outcome, SequencerOutcome::TimedOut);
        assert_eq!(report.polls, 2);
    }

    #[tokio::test]
    async fn service_becoming_healthy_on_third_tick_is_stable() {
        let config = gate(&["a", "b"], 1, 3);
        let probe = ScriptedProbe::new()
            .always("a", Healthy)
            .script("b", &[Starting, Starting, Healthy]);
        let mut ticker = RecordingTicker::default();

        let report = Sequencer::new(&config, &probe).run(&mut ticker).await.unwrap();

        assert_eq!(report.outcome, SequencerOutcome::AllStable);
        assert_eq!(report.polls, 3);
        assert!(report.elapsed <= secs(3));
        assert_eq!(report.elapsed, secs(2));
        assert_eq!(probe.calls("b"), 3);
    }

    #[tokio::test]
    async fn unhealthy_service_recovering_is_stable() {
        let config = gate(&["qbittorrent"], 10, 300);
        let probe =
            ScriptedProbe::new().script("qbittorrent", &[Unhealthy, Unhealthy, Unhealthy, Healthy]);
        let mut ticker = RecordingTicker::default();

        let report = Sequencer::new(&config, &probe).run(&mut ticker).await.unwrap();

        assert!(report.is_stable());
        assert_eq!(report.polls, 4);
        assert_eq!(ticker.total(), secs(30));
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn unavailable_runtime_aborts_immediately() {
        let config = gate(&["sonarr"], 10, 300);
        let probe = ScriptedProbe::new()
            .always("sonarr", Starting)
            .unavailable_from("sonarr", 2);
        let mut ticker = RecordingTicker::default();

        let err = Sequencer::new(&config, &probe)
            .run(&mut ticker)
            .await
            .unwrap_err();

        match err {
            SequencerError::ProbeUnavailable { service, .. } => {
                assert_eq!(service, name("sonarr"));
            }
            other => panic!("expected ProbeUnavailable, got {other:?}"),
        }
        assert_eq!(probe.calls("sonarr"), 3);
        assert_eq!(ticker.waits.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_probe_times_out() {
        let config = DeploymentConfig::builder([name("sonarr"), name("radarr")])
            .probe_timeout(secs(2))
            .build()
            .unwrap();
        let probe = ScriptedProbe::new()
            .always("sonarr", Healthy)
            .hang_on("radarr");
        let mut ticker = RecordingTicker::default();

        let err = Sequencer::new(&config, &probe)
            .run(&mut ticker)
            .await
            .unwrap_err();

        match err {
            SequencerError::ProbeTimedOut { service, timeout } => {
                assert_eq!(service, name("radarr"));
                assert_eq!(timeout, secs(2));
            }
            other => panic!("expected ProbeTimedOut, got {other:?}"),
        }
        assert!(ticker.waits.is_empty());
    }
}

mod reporting {
    use super::*;

    #[tokio::test]
    async fn status_lines_follow_report_interval() {
        let config = DeploymentConfig::builder([name("jellyfin")])
            .poll_interval(secs(10))
            .timeout(secs(100))
            .report_interval(secs(30))
            .build()
            .unwrap();
        let probe = ScriptedProbe::new().always("jellyfin", Starting);
        let mut ticker = RecordingTicker::default();
        let mut reported = Vec::new();

        let report = Sequencer::new(&config, &probe)
            .on_status(|line| reported.push(line.elapsed))
            .run(&mut ticker)
            .await
            .unwrap();

        assert_eq!(report.outcome, SequencerOutcome::TimedOut);
        assert_eq!(reported, vec![secs(0), secs(30), secs(60), secs(90)]);
    }

    #[tokio::test]
    async fn status_lines_wait_at_least_report_interval() {
        let config = DeploymentConfig::builder([name("jellyfin")])
            .poll_interval(secs(7))
            .timeout(secs(84))
            .report_interval(secs(30))
            .build()
            .unwrap();
        let probe = ScriptedProbe::new().always("jellyfin", Starting);
        let mut ticker = RecordingTicker::default();
        let mut reported = Vec::new();

        let report = Sequencer::new(&config, &probe)
            .on_status(|line| reported.push(line.elapsed))
            .run(&mut ticker)
            .await
            .unwrap();

        assert_eq!(report.outcome, SequencerOutcome::TimedOut);
        assert_eq!(report.polls, 12);
        assert_eq!(reported, vec![secs(0), secs(35), secs(70)]);
    }

    #[tokio::test]
    async fn first_blocking_tick_reports_even_with_long_interval() {
        let config = DeploymentConfig::builder([name("sonarr")])
            .poll_interval(secs(1))
            .timeout(secs(3))
            .report_interval(secs(600))
            .build()
            .unwrap();
        let probe = ScriptedProbe::new().script("sonarr", &[Starting, Healthy]);
        let mut ticker = RecordingTicker::default();
        let mut lines = Vec::new();

        Sequencer::new(&config, &probe)
            .on_status(|line| lines.push(line.to_string()))
            .run(&mut ticker)
            .await
            .unwrap();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("sonarr (starting)"), "got: {}", lines[0]);
    }

    #[tokio::test]
    async fn stable_first_tick_reports_nothing() {
        let config = gate(&["sonarr"], 10, 300);
        let probe = ScriptedProbe::new().always("sonarr", Healthy);
        let mut ticker = RecordingTicker::default();
        let mut count = 0;

        Sequencer::new(&config, &probe)
            .on_status(|_| count += 1)
            .run(&mut ticker)
            .await
            .unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn status_line_lists_absent_services_separately() {
        let config = gate(&["sonarr", "bazarr"], 10, 10);
        let probe = ScriptedProbe::new().always("sonarr", Unhealthy);
        let mut ticker = RecordingTicker::default();
        let mut lines = Vec::new();

        Sequencer::new(&config, &probe)
            .on_status(|line| lines.push(line.to_string()))
            .run(&mut ticker)
            .await
            .unwrap();

        assert_eq!(
            lines,
            vec!["waiting on 1 after 0s: sonarr (unhealthy); not running: bazarr (not found)"]
        );
    }
}

mod snapshots {
    use super::*;

    #[tokio::test]
    async fn snapshot_preserves_config_order() {
        let config = gate(&["radarr", "gluetun", "sonarr"], 10, 300);
        let probe = ScriptedProbe::new()
            .always("gluetun", Healthy)
            .always("sonarr", Starting);

        let snapshot = take_snapshot(&config, &probe, 7).await.unwrap();

        let order: Vec<_> = snapshot
            .services()
            .iter()
            .map(|entry| entry.service.as_str())
            .collect();
        assert_eq!(order, vec!["radarr", "gluetun", "sonarr"]);
        assert_eq!(snapshot.tick(), 7);
        assert_eq!(snapshot.state_of(&name("radarr")), Some(NotFound));
        assert!(!snapshot.is_stable());
    }

    #[tokio::test]
    async fn every_service_is_queried_once_per_tick() {
        let config = gate(&["a", "b", "c"], 10, 300);
        let probe = ScriptedProbe::new();

        take_snapshot(&config, &probe, 1).await.unwrap();

        assert_eq!(probe.total_calls(), 3);
        let mut queried = probe.query_order();
        queried.sort();
        assert_eq!(queried, vec![name("a"), name("b"), name("c")]);
    }
}

mod tokio_timer {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn run_sequencer_waits_on_tokio_time() {
        let config = gate(&["sonarr"], 10, 300);
        let probe = ScriptedProbe::new().script("sonarr", &[Starting, Starting, Healthy]);
        let start = tokio::time::Instant::now();

        let outcome = run_sequencer(&config, &probe).await.unwrap();

        assert_eq!(outcome, SequencerOutcome::AllStable);
        assert_eq!(start.elapsed(), secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn run_sequencer_times_out_on_tokio_time() {
        let config = gate(&["sonarr"], 10, 30);
        let probe = ScriptedProbe::new().always("sonarr", Starting);

        let report = Sequencer::new(&config, &probe)
            .run(&mut TokioTicker)
            .await
            .unwrap();

        assert_eq!(report.outcome, SequencerOutcome::TimedOut);
        assert_eq!(report.polls, 3);
    }
}

// =============================================================================
// Properties
// =============================================================================

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn any_state() -> impl Strategy<Value = HealthState> {
    prop_oneof![
        Just(Healthy),
        Just(Unhealthy),
        Just(Starting),
        Just(NoHealthcheck),
        Just(NotRunning),
        Just(NotFound),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn never_healthy_service_polls_ceil_of_timeout_over_interval(
        interval in 1u64..30,
        extra in 0u64..200,
    ) {
        let timeout = interval + extra;
        let config = gate(&["sonarr"], interval, timeout);
        let probe = ScriptedProbe::new().always("sonarr", Starting);
        let mut ticker = RecordingTicker::default();

        let report = block_on(Sequencer::new(&config, &probe).run(&mut ticker)).unwrap();

        prop_assert_eq!(report.outcome, SequencerOutcome::TimedOut);
        prop_assert_eq!(u64::from(report.polls), timeout.div_ceil(interval));
        prop_assert_eq!(report.polls, config.max_polls());
        prop_assert!(report.elapsed >= secs(timeout));
    }

    #[test]
    fn identical_scripts_give_identical_runs(
        first in prop::collection::vec(any_state(), 1..8),
        second in prop::collection::vec(any_state(), 1..8),
        interval in 1u64..10,
        polls in 1u64..10,
    ) {
        let config = gate(&["a", "b"], interval, interval * polls);
        let run = || {
            let probe = ScriptedProbe::new().script("a", &first).script("b", &second);
            let mut ticker = RecordingTicker::default();
            let report = block_on(Sequencer::new(&config, &probe).run(&mut ticker)).unwrap();
            (report.outcome, report.polls, report.elapsed, report.snapshot, ticker.waits)
        };

        prop_assert_eq!(run(), run());
    }
}
