#[cfg(test)]
mod tests {
    use crate::config::ExperimentConfig;
    use crate::error::WalkinError;
    use crate::types::SignalingMode;
    use std::time::Duration;

    #[test]
    fn defaults_match_the_classic_experiment() {
        let config = ExperimentConfig::default();
        assert_eq!(config.time_in_resource(), Duration::from_millis(200));
        assert_eq!(config.backoff(), Duration::from_millis(900));
        assert_eq!(config.run_time(), Duration::from_secs(10));
        assert_eq!(config.refractory(), Duration::from_secs(2));
        assert_eq!(config.actor_count, 10);
        assert_eq!(config.signaling, SignalingMode::Off);
        assert!(config.poll_interval().is_zero());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn with_signaling_changes_only_signaling() {
        let off = ExperimentConfig::default().with_seed(5);
        let on = off.with_signaling(SignalingMode::On);

        assert_eq!(on.signaling, SignalingMode::On);
        assert_eq!(on.with_signaling(SignalingMode::Off), off);
    }

    #[test]
    fn probabilities_outside_unit_interval_are_rejected() {
        for config in [
            ExperimentConfig { lock_probability: 1.5, ..ExperimentConfig::default() },
            ExperimentConfig { base_urge_probability: -0.1, ..ExperimentConfig::default() },
            ExperimentConfig { knock_probability_signaled: f64::NAN, ..ExperimentConfig::default() },
        ] {
            assert!(matches!(config.validate(), Err(WalkinError::InvalidConfig(_))));
        }
    }

    #[test]
    fn unsignaled_knocking_must_be_more_likely() {
        let config = ExperimentConfig {
            knock_probability_unsignaled: 0.3,
            knock_probability_signaled: 0.3,
            ..ExperimentConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("knock_probability_unsignaled"));
    }

    #[test]
    fn empty_pool_and_zero_run_time_are_rejected() {
        let no_actors = ExperimentConfig { actor_count: 0, ..ExperimentConfig::default() };
        let no_time = ExperimentConfig { run_time_ms: 0, ..ExperimentConfig::default() };
        assert!(no_actors.validate().is_err());
        assert!(no_time.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = ExperimentConfig::from_json_str(
            r#"{ "actor_count": 4, "signaling": "on", "seed": 9 }"#,
        )
        .expect("valid json");

        assert_eq!(config.actor_count, 4);
        assert_eq!(config.signaling, SignalingMode::On);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.backoff_ms, 900);
    }

    #[test]
    fn json_is_validated() {
        let result = ExperimentConfig::from_json_str(r#"{ "lock_probability": 2.0 }"#);
        assert!(matches!(result, Err(WalkinError::InvalidConfig(_))));

        let result = ExperimentConfig::from_json_str("not json");
        assert!(matches!(result, Err(WalkinError::ConfigParse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = ExperimentConfig::from_json_file("/definitely/not/here.json");
        assert!(matches!(result, Err(WalkinError::Io(_))));
    }
}
