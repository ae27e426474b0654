#[cfg(test)]
mod tests {
    use crate::comparison::Comparison;
    use crate::config::ExperimentConfig;
    use crate::error::WalkinError;
    use crate::events::{ActorEvent, EventSink, NullSink};
    use crate::types::{ActorStats, ExperimentOutcome, SignalingMode};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts how many runs were started.
    #[derive(Default)]
    struct StartCounter {
        started: AtomicUsize,
    }

    impl EventSink for StartCounter {
        fn record(&self, _event: &ActorEvent) {}

        fn experiment_started(&self, _run_id: &str, _signaling: SignalingMode) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn experiment_finished(&self, _outcome: &ExperimentOutcome) {}
    }

    fn scaled() -> ExperimentConfig {
        ExperimentConfig {
            actor_count: 10,
            run_time_ms: 600,
            time_in_resource_ms: 20,
            backoff_ms: 90,
            refractory_ms: 120,
            seed: Some(1_000),
            ..ExperimentConfig::default()
        }
    }

    #[tokio::test]
    async fn zero_trials_is_rejected() {
        let result = Comparison::new(scaled()).trials(0).run().await;
        assert!(matches!(result, Err(WalkinError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn interrupted_comparison_runs_no_trials() {
        let comparison = Comparison::new(scaled()).trials(5).sink(Arc::new(NullSink));
        comparison.interrupt_handle().interrupt_all();

        let report = comparison.run().await.expect("valid config");

        assert!(report.interrupted);
        assert!(report.trials.is_empty());
        assert_eq!(report.unsignaled.trials, 0);
        assert_eq!(report.unsignaled.mean_conflicts, 0.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn interrupt_during_first_run_skips_the_signaled_run() {
        let sink = Arc::new(StartCounter::default());
        let comparison = Comparison::new(ExperimentConfig {
            run_time_ms: 5_000,
            poll_interval_ms: 1,
            ..scaled()
        })
        .trials(1)
        .sink(sink.clone());
        let handle = comparison.interrupt_handle();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            handle.interrupt_all();
        });
        let report = comparison.run().await.expect("valid config");

        assert!(report.interrupted);
        assert!(report.trials.is_empty());
        assert_eq!(report.signaled.trials, 0);
        assert_eq!(report.signaled.totals, ActorStats::default());
        // Only the signaling-off run ever started.
        assert_eq!(sink.started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn trials_are_paired_by_seed() {
        let report = Comparison::new(scaled())
            .trials(3)
            .sink(Arc::new(NullSink))
            .run()
            .await
            .expect("valid config");

        assert!(!report.interrupted);
        assert_eq!(report.base_seed, 1_000);
        assert_eq!(report.trials.len(), 3);

        for (i, pair) in report.trials.iter().enumerate() {
            assert_eq!(pair.trial, i);
            assert_eq!(pair.seed, 1_000 + i as u64);
            assert_eq!(pair.unsignaled.seed, pair.seed);
            assert_eq!(pair.signaled.seed, pair.seed);
            assert_eq!(pair.unsignaled.signaling, SignalingMode::Off);
            assert_eq!(pair.signaled.signaling, SignalingMode::On);
            assert!(pair.unsignaled.peak_occupancy <= 1);
            assert!(pair.signaled.peak_occupancy <= 1);
            assert!(pair.unsignaled.result.uses >= 1);
        }

        // Summary statistics agree with the per-trial data.
        let mean_off = report.trials.iter().map(|t| t.unsignaled.result.conflicts as f64).sum::<f64>() / 3.0;
        let mean_on = report.trials.iter().map(|t| t.signaled.result.conflicts as f64).sum::<f64>() / 3.0;
        assert!((report.unsignaled.mean_conflicts - mean_off).abs() < 1e-9);
        assert!((report.signaled.mean_conflicts - mean_on).abs() < 1e-9);
        assert!((report.mean_conflict_difference - (mean_on - mean_off)).abs() < 1e-9);
        assert_eq!(report.signaling_reduces_conflicts(), mean_on < mean_off);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn signaling_suppresses_attempts_on_locked_door() {
        let report = Comparison::new(scaled())
            .trials(2)
            .sink(Arc::new(NullSink))
            .run()
            .await
            .expect("valid config");

        let off = &report.unsignaled.totals;
        let on = &report.signaled.totals;

        // Without a sign, some actors try a locked door; with one, they read
        // the sign instead and only the race window lets an attempt through.
        assert_eq!(off.sign_abstentions, 0);
        assert!(on.sign_abstentions > 0);
        assert!(off.locked_failures > 0);
        assert!(on.locked_failures < off.locked_failures);

        let off_rate = off.knock_rate().expect("knock decisions taken");
        let on_rate = on.knock_rate().expect("knock decisions taken");
        assert!(on_rate < off_rate, "signaled {} vs unsignaled {}", on_rate, off_rate);
    }
}
