//! # Lifecycle Flow Tests
//!
//! Startup ordering, fail-fast initialization, state preconditions,
//! checkpoint retention and reverse-order teardown, driven through the
//! public orchestrator API only.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{calls, orchestrator, register, CallLog};
    use lc_01_orchestrator::{
        DependencyError, LifecycleOrchestratorApi, OrchestratorError,
    };
    use shared_types::{LifecycleEvent, LifecycleState, PhaseOutcome};

    // =========================================================================
    // STARTUP
    // =========================================================================

    #[test]
    fn test_three_subsystem_chain_reaches_operational() {
        let (orchestrator, sink) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &[]);
        register(&orchestrator, &log, "B", &["A"]);
        register(&orchestrator, &log, "C", &["A", "B"]);

        assert_eq!(orchestrator.initialize_all(), Ok(true));

        assert_eq!(orchestrator.orchestrator_state(), LifecycleState::Operational);
        for name in ["A", "B", "C"] {
            assert_eq!(orchestrator.state(name), Some(LifecycleState::Operational));
        }
        assert_eq!(calls(&log, "initialize"), vec!["A", "B", "C"]);
        assert_eq!(
            sink.count(|e| matches!(
                e,
                LifecycleEvent::Phase {
                    phase: "initialize_all",
                    outcome: PhaseOutcome::Complete,
                    ..
                }
            )),
            1
        );
    }

    #[test]
    fn test_registration_order_does_not_change_startup_order() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "C", &["A", "B"]);
        register(&orchestrator, &log, "B", &["A"]);
        register(&orchestrator, &log, "A", &[]);

        assert_eq!(orchestrator.initialize_all(), Ok(true));

        assert_eq!(calls(&log, "initialize"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_mutual_dependency_is_rejected_before_any_initialize() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &["B"]);
        register(&orchestrator, &log, "B", &["A"]);

        let result = orchestrator.initialize_all();

        assert!(matches!(
            result,
            Err(OrchestratorError::Dependency(
                DependencyError::CycleDetected { .. }
            ))
        ));
        assert_eq!(orchestrator.state("A"), Some(LifecycleState::Uninitialized));
        assert_eq!(orchestrator.state("B"), Some(LifecycleState::Uninitialized));
        assert!(calls(&log, "initialize").is_empty());
    }

    #[test]
    fn test_initialize_all_stops_at_first_failure() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &[]);
        let b = register(&orchestrator, &log, "B", &["A"]);
        let c = register(&orchestrator, &log, "C", &["B"]);
        b.update(|behavior| behavior.initialize_ok = false);

        assert_eq!(orchestrator.initialize_all(), Ok(false));

        assert_eq!(orchestrator.orchestrator_state(), LifecycleState::Failed);
        assert_eq!(orchestrator.state("A"), Some(LifecycleState::Operational));
        assert_eq!(orchestrator.state("B"), Some(LifecycleState::Failed));
        assert_eq!(orchestrator.state("C"), Some(LifecycleState::Uninitialized));
        assert_eq!(c.counters().initialize, 0);
    }

    // =========================================================================
    // STATE PRECONDITIONS
    // =========================================================================

    #[test]
    fn test_operate_only_on_operational_subsystems() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &[]);
        let b = register(&orchestrator, &log, "B", &["A"]);
        let c = register(&orchestrator, &log, "C", &["B"]);
        b.update(|behavior| behavior.initialize_ok = false);
        orchestrator.initialize_all().unwrap();

        let result = orchestrator.operate_subsystem("A").unwrap();
        assert_eq!(result["operations"], 1);

        let err = orchestrator.operate_subsystem("C").unwrap_err();
        assert_eq!(
            err,
            OrchestratorError::InvalidState {
                name: "C".to_string(),
                current: LifecycleState::Uninitialized,
                expected: LifecycleState::Operational,
            }
        );
        assert!(err.to_string().contains("uninitialized"));
        assert!(err.to_string().contains("operational"));
        assert_eq!(c.counters().operate, 0);
        assert_eq!(orchestrator.state("C"), Some(LifecycleState::Uninitialized));
    }

    #[test]
    fn test_validate_all_after_startup() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &[]);
        register(&orchestrator, &log, "B", &["A"]);
        orchestrator.initialize_all().unwrap();

        assert!(orchestrator.validate_all());
        assert_eq!(orchestrator.state("B"), Some(LifecycleState::Operational));
    }

    // =========================================================================
    // CHECKPOINTS
    // =========================================================================

    #[test]
    fn test_eleven_checkpoints_retain_ten_most_recent() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &[]);
        orchestrator.initialize_all().unwrap();

        for _ in 0..11 {
            assert_eq!(orchestrator.checkpoint_subsystem("A"), Ok(true));
        }

        let retained = orchestrator.checkpoints("A").unwrap();
        let sequences: Vec<u64> = retained
            .iter()
            .filter_map(|checkpoint| checkpoint.data["sequence"].as_u64())
            .collect();
        assert_eq!(sequences, (2..=11).collect::<Vec<u64>>());
        assert!(retained
            .iter()
            .all(|checkpoint| checkpoint.state == LifecycleState::Checkpointing));
        assert_eq!(orchestrator.state("A"), Some(LifecycleState::Operational));
        assert_eq!(orchestrator.system_status().subsystems["A"].checkpoints, 10);
    }

    #[test]
    fn test_checkpoint_all_covers_every_subsystem() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        let a = register(&orchestrator, &log, "A", &[]);
        let b = register(&orchestrator, &log, "B", &["A"]);
        orchestrator.initialize_all().unwrap();

        assert!(orchestrator.checkpoint_all());

        assert_eq!(a.counters().checkpoint, 1);
        assert_eq!(b.counters().checkpoint, 1);
        assert_eq!(
            orchestrator.latest_checkpoint("B").unwrap().data["sequence"],
            1
        );
    }

    // =========================================================================
    // TEARDOWN
    // =========================================================================

    #[test]
    fn test_terminate_all_reverses_resolved_order() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "C", &["A", "B"]);
        register(&orchestrator, &log, "A", &[]);
        register(&orchestrator, &log, "D", &[]);
        register(&orchestrator, &log, "B", &["A"]);
        orchestrator.initialize_all().unwrap();

        assert_eq!(orchestrator.terminate_all(), Ok(true));

        let mut expected = orchestrator.resolve_order().unwrap();
        assert_eq!(calls(&log, "initialize"), expected);
        expected.reverse();
        assert_eq!(calls(&log, "terminate"), expected);
        assert_eq!(orchestrator.orchestrator_state(), LifecycleState::Terminated);
    }

    #[test]
    fn test_terminate_skips_subsystems_never_started() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &[]);
        let b = register(&orchestrator, &log, "B", &["A"]);
        let c = register(&orchestrator, &log, "C", &["B"]);
        b.update(|behavior| behavior.initialize_ok = false);
        orchestrator.initialize_all().unwrap();

        // B is failed, so the teardown is not clean
        assert_eq!(orchestrator.terminate_all(), Ok(false));

        assert_eq!(calls(&log, "terminate"), vec!["A"]);
        assert_eq!(c.counters().terminate, 0);
        assert_eq!(orchestrator.state("A"), Some(LifecycleState::Terminated));
        assert_eq!(orchestrator.state("B"), Some(LifecycleState::Failed));
    }

    #[test]
    fn test_restart_after_terminate() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        let a = register(&orchestrator, &log, "A", &[]);
        register(&orchestrator, &log, "B", &["A"]);
        orchestrator.initialize_all().unwrap();
        orchestrator.terminate_all().unwrap();

        assert_eq!(orchestrator.initialize_all(), Ok(true));

        assert_eq!(a.counters().initialize, 2);
        assert_eq!(orchestrator.state("B"), Some(LifecycleState::Operational));
        assert_eq!(orchestrator.orchestrator_state(), LifecycleState::Operational);
    }
}
