//! Tests for solver configuration.

use std::time::Duration;

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "reproducible"
        random_seed = 42

        [termination]
        seconds_spent_limit = 30

        [[phases]]
        type = "construction_heuristic"
        construction_heuristic_type = "first_fit_decreasing"

        [[phases]]
        type = "local_search"
        [phases.acceptor]
        type = "late_acceptance"
        late_acceptance_size = 400
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.termination.as_ref().unwrap().seconds_spent_limit, Some(30));
    assert_eq!(config.phases.len(), 2);
    assert!(matches!(
        &config.phases[1],
        PhaseConfig::LocalSearch(LocalSearchConfig {
            acceptor: Some(AcceptorConfig::LateAcceptance(LateAcceptanceConfig {
                late_acceptance_size: Some(400)
            })),
            ..
        })
    ));
    assert!(config.validate().is_ok());
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: reproducible
        random_seed: 42
        move_thread_count:
          count: 4
        termination:
          seconds_spent_limit: 30
        phases:
          - type: construction_heuristic
            construction_heuristic_type: first_fit_decreasing
          - type: local_search
            acceptor:
              type: late_acceptance
              late_acceptance_size: 400
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.move_thread_count, MoveThreadCount::Count(4));
    assert_eq!(config.move_thread_count.resolve(), Some(4));
}

#[test]
fn test_move_thread_count_forms() {
    let toml_count = |value: &str| {
        SolverConfig::from_toml_str(&format!("move_thread_count = {}", value))
            .map(|c| c.move_thread_count)
    };
    assert_eq!(toml_count("\"auto\"").unwrap(), MoveThreadCount::Auto);
    assert_eq!(toml_count("\"none\"").unwrap(), MoveThreadCount::None);
    assert_eq!(toml_count("4").unwrap(), MoveThreadCount::Count(4));
    assert_eq!(toml_count("{ count = 2 }").unwrap(), MoveThreadCount::Count(2));
    assert!(toml_count("\"many\"").is_err());
    assert!(toml_count("-1").is_err());

    let yaml_count = |value: &str| {
        SolverConfig::from_yaml_str(&format!("move_thread_count: {}", value))
            .map(|c| c.move_thread_count)
    };
    assert_eq!(yaml_count("auto").unwrap(), MoveThreadCount::Auto);
    assert_eq!(yaml_count("none").unwrap(), MoveThreadCount::None);
    assert_eq!(yaml_count("3").unwrap(), MoveThreadCount::Count(3));
    assert!(yaml_count("lots").is_err());

    let default = SolverConfig::from_toml_str("random_seed = 1").unwrap();
    assert_eq!(default.move_thread_count, MoveThreadCount::None);
}

#[test]
fn test_move_thread_count_serializes_plainly() {
    let config = SolverConfig::new().with_move_thread_count(MoveThreadCount::Count(4));
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("move_thread_count = 4"));
    let parsed = SolverConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed.move_thread_count, MoveThreadCount::Count(4));

    let config = SolverConfig::new().with_move_thread_count(MoveThreadCount::Auto);
    let text = serde_yaml::to_string(&config).unwrap();
    assert!(text.contains("move_thread_count: auto"));
}

#[test]
fn test_toml_and_yaml_agree() {
    let toml = SolverConfig::from_toml_str(
        r#"
        [termination]
        best_score_limit = "0hard/-5soft"
        termination_composition = "and"
        unimproved_step_count_limit = 100

        [[phases]]
        type = "local_search"
        [phases.forager]
        accepted_count_limit = 4
        tie_break = "random"
        [phases.move_selector]
        type = "union_move_selector"
        [[phases.move_selector.selectors]]
        type = "change_move_selector"
        selection_order = "original"
        [[phases.move_selector.selectors]]
        type = "swap_move_selector"
    "#,
    )
    .unwrap();

    let yaml = SolverConfig::from_yaml_str(
        r#"
        termination:
          best_score_limit: 0hard/-5soft
          termination_composition: and
          unimproved_step_count_limit: 100
        phases:
          - type: local_search
            forager:
              accepted_count_limit: 4
              tie_break: random
            move_selector:
              type: union_move_selector
              selectors:
                - type: change_move_selector
                  selection_order: original
                - type: swap_move_selector
    "#,
    )
    .unwrap();

    assert_eq!(toml, yaml);
    assert!(toml.validate().is_ok());
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_random_seed(123)
        .with_termination_seconds(60)
        .with_phase(PhaseConfig::ConstructionHeuristic(
            ConstructionHeuristicConfig::default(),
        ))
        .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig::default()));

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.phases.len(), 2);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
}

#[test]
fn test_time_limits_add_up() {
    let t = TerminationConfig {
        minutes_spent_limit: Some(1),
        seconds_spent_limit: Some(5),
        millis_spent_limit: Some(250),
        unimproved_millis_spent_limit: Some(40),
        ..TerminationConfig::default()
    };
    assert_eq!(t.time_limit(), Some(Duration::from_millis(65_250)));
    assert_eq!(t.unimproved_time_limit(), Some(Duration::from_millis(40)));
    assert!(TerminationConfig::default().is_empty());
    assert!(!TerminationConfig::default().with_best_score_feasible(true).is_empty());
}

#[test]
fn test_default_phases() {
    let config = SolverConfig::new().with_termination_seconds(1);
    let phases = config.effective_phases();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0].type_name(), "construction_heuristic");
    assert_eq!(phases[1].type_name(), "local_search");
    assert!(config.validate().is_ok());
}

#[test]
fn test_local_search_without_termination_is_rejected() {
    let err = SolverConfig::new().validate().unwrap_err();
    assert_eq!(err.path, "phases[1]");

    let phase_terminated =
        SolverConfig::new().with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
            termination: Some(TerminationConfig::default().with_step_count_limit(10)),
            ..LocalSearchConfig::default()
        }));
    assert!(phase_terminated.validate().is_ok());
}

#[test]
fn test_out_of_range_settings_are_rejected() {
    let with_acceptor = |acceptor| {
        SolverConfig::new()
            .with_termination_seconds(1)
            .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
                acceptor: Some(acceptor),
                ..LocalSearchConfig::default()
            }))
    };

    let err = with_acceptor(AcceptorConfig::LateAcceptance(LateAcceptanceConfig {
        late_acceptance_size: Some(0),
    }))
    .validate()
    .unwrap_err();
    assert_eq!(err.path, "phases[0].acceptor.late_acceptance_size");

    let err = with_acceptor(AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
        starting_temperature: Some(2.0),
        cooling_rate: Some(0.0),
    }))
    .validate()
    .unwrap_err();
    assert_eq!(err.path, "phases[0].acceptor.cooling_rate");

    let err = with_acceptor(AcceptorConfig::TabuSearch(TabuSearchConfig::default()))
        .validate()
        .unwrap_err();
    assert_eq!(err.path, "phases[0].acceptor");

    let err = SolverConfig::new()
        .with_termination_seconds(1)
        .with_move_thread_count(MoveThreadCount::Count(0))
        .validate()
        .unwrap_err();
    assert_eq!(err.path, "move_thread_count");
}

#[test]
fn test_best_score_limit_must_parse() {
    let config = |limit: &str| {
        SolverConfig::new()
            .with_termination(TerminationConfig::default().with_best_score_limit(limit))
    };
    assert!(config("0hard/-3soft").validate().is_ok());
    assert!(config("-2").validate().is_ok());
    assert!(config("0hard/0medium/-1soft").validate().is_ok());
    assert!(config("[0]hard/[0/0]soft").validate().is_ok());

    let err = config("zero").validate().unwrap_err();
    assert_eq!(err.path, "termination.best_score_limit");
    assert!(err.message.contains("zero"));
}

#[test]
fn test_sub_list_sizes_are_checked() {
    let config = SolverConfig::new()
        .with_termination_seconds(1)
        .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
            move_selector: Some(MoveSelectorConfig::UnionMoveSelector(UnionMoveSelectorConfig {
                selectors: vec![
                    MoveSelectorConfig::ListChangeMoveSelector(ListMoveSelectorConfig::default()),
                    MoveSelectorConfig::SubListChangeMoveSelector(SubListChangeMoveConfig {
                        minimum_sub_list_size: Some(4),
                        maximum_sub_list_size: Some(2),
                        ..SubListChangeMoveConfig::default()
                    }),
                ],
            })),
            ..LocalSearchConfig::default()
        }));
    let err = config.validate().unwrap_err();
    assert_eq!(err.path, "phases[0].move_selector.selectors[1]");
}

#[test]
fn test_config_error_converts() {
    let err = SolverConfig::from_toml_str("random_seed = \"x\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    let converted: ConfigurationError = err.into();
    assert_eq!(converted.path, "<source>");

    let missing = SolverConfig::load("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(missing, ConfigError::Io(_)));
}

#[test]
fn test_environment_mode_flags() {
    assert!(!EnvironmentMode::NonReproducible.is_reproducible());
    assert!(EnvironmentMode::FastAssert.asserts_steps());
    assert!(!EnvironmentMode::FastAssert.asserts_moves());
    assert!(EnvironmentMode::FullAssert.asserts_moves());
    assert_eq!(MoveThreadCount::default().resolve(), None);
    assert_eq!(MoveThreadCount::Count(1).resolve(), None);
}
