//! Tests for generation configuration.

use super::*;

#[test]
fn test_defaults() {
    let config = GeneratorConfig::default();
    assert_eq!(config.random_seed, None);
    assert_eq!(config.seed(), 0);
    assert_eq!(config.restart_count, 4);
    assert_eq!(config.thread_count, ThreadCount::Auto);
    assert_eq!(
        config.time_limit(),
        Some(Duration::from_secs(DEFAULT_SECONDS_SPENT_LIMIT))
    );
    assert_eq!(config.node_limit(), None);
    assert_eq!(config.search.max_backjump_depth, 16);
    assert!(config.search.same_faculty_per_section);
    assert_eq!(config.search.refinement_pass_limit, 4);
    assert_eq!(config.acceptance.soft_cost_threshold, None);
    assert_eq!(config.weights.time_window, 0.1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_toml_is_default() {
    let config = GeneratorConfig::from_toml_str("").unwrap();
    assert_eq!(config, GeneratorConfig::default());
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        random_seed = 42
        restart_count = 2
        thread_count = "none"

        [termination]
        seconds_spent_limit = 3
        millis_spent_limit = 250

        [search]
        max_backjump_depth = 4
        same_faculty_per_section = false

        [acceptance]
        soft_cost_threshold = 12.5

        [weights]
        room_affinity = 0.0
    "#;

    let config = GeneratorConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.restart_count, 2);
    assert_eq!(config.thread_count, ThreadCount::None);
    assert_eq!(config.time_limit(), Some(Duration::from_millis(3250)));
    assert_eq!(config.search.max_backjump_depth, 4);
    assert!(!config.search.same_faculty_per_section);
    assert_eq!(config.search.refinement_pass_limit, 4);
    assert_eq!(config.acceptance.soft_cost_threshold, Some(12.5));
    assert_eq!(config.weights.room_affinity, 0.0);
    assert_eq!(config.weights.batch_gaps, 3.0);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        random_seed: 9
        thread_count: none
        termination:
          node_limit: 0
        weights:
          daily_load: 1.5
    "#;

    let config = GeneratorConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.random_seed, Some(9));
    assert_eq!(config.thread_count, ThreadCount::None);
    assert_eq!(config.node_limit(), Some(0));
    assert_eq!(config.weights.daily_load, 1.5);
}

#[test]
fn test_termination_table_replaces_default_budget() {
    let config = GeneratorConfig::from_toml_str("[termination]\nnode_limit = 10\n").unwrap();
    assert_eq!(config.time_limit(), None);
    assert_eq!(config.node_limit(), Some(10));

    let config = GeneratorConfig::from_toml_str("restart_count = 2").unwrap();
    assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
}

#[test]
fn test_time_builders_replace_each_other() {
    let config = GeneratorConfig::new().with_termination_millis(250);
    assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));

    let config = config.with_termination_seconds(2);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(2)));
}

#[test]
fn test_zero_time_limit_is_kept() {
    let config = GeneratorConfig::new().with_termination_seconds(0);
    assert_eq!(config.time_limit(), Some(Duration::ZERO));
}

#[test]
fn test_builder() {
    let config = GeneratorConfig::new()
        .with_random_seed(123)
        .with_restart_count(6)
        .with_termination_seconds(1)
        .with_node_limit(500)
        .with_soft_cost_threshold(1.0);

    assert_eq!(config.seed(), 123);
    assert_eq!(config.restart_count, 6);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(1)));
    assert_eq!(config.node_limit(), Some(500));
    assert_eq!(config.acceptance.soft_cost_threshold, Some(1.0));
}

#[test]
fn test_validate_rejects_zero_restarts() {
    let config = GeneratorConfig::new().with_restart_count(0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_bad_weights() {
    let weights = WeightsConfig {
        batch_gaps: -1.0,
        ..WeightsConfig::default()
    };
    let err = GeneratorConfig::new().with_weights(weights).validate();
    assert!(matches!(err, Err(ConfigError::Invalid(ref msg)) if msg.contains("batch_gaps")));

    let weights = WeightsConfig {
        time_window: f64::NAN,
        ..WeightsConfig::default()
    };
    assert!(GeneratorConfig::new().with_weights(weights).validate().is_err());
}

#[test]
fn test_invalid_toml() {
    assert!(matches!(
        GeneratorConfig::from_toml_str("restart_count = \"many\""),
        Err(ConfigError::Toml(_))
    ));
}
