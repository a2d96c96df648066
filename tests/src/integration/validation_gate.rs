//! # Validation Gate Tests
//!
//! The validator checking live orchestrator status, and the runtime's
//! startup gate built on it.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{orchestrator, register, CallLog};
    use lc_01_orchestrator::LifecycleOrchestratorApi;
    use lc_02_validator::rules::{
        ALL_SUBSYSTEMS_OPERATIONAL, NO_FAILED_SUBSYSTEMS, ORCHESTRATOR_OPERATIONAL,
        RECOVERY_BUDGET_HEALTHY,
    };
    use lc_02_validator::{standard_rules, RuleOutcome, SystemValidator};
    use lc_runtime::{LifecycleRuntime, RuntimeConfig};
    use serde_json::json;
    use shared_types::{LifecycleEvent, LifecycleState, MemorySink};
    use std::sync::Arc;

    fn standard_validator() -> (SystemValidator, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let mut validator = SystemValidator::new(sink.clone());
        standard_rules(&mut validator);
        (validator, sink)
    }

    #[test]
    fn test_error_lists_only_critical_failures() {
        let sink = Arc::new(MemorySink::new());
        let mut validator = SystemValidator::new(sink.clone());
        validator.add_rule(
            "ledger_balanced",
            |_| Ok(RuleOutcome::fail("debits exceed credits")),
            true,
        );
        validator.add_rule(
            "cache_warm",
            |_| Ok(RuleOutcome::fail("hit rate below 50%")),
            false,
        );

        let err = validator.validate_system(&json!({})).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("ledger_balanced: debits exceed credits"));
        assert!(!message.contains("cache_warm"));

        let record = validator.last_record().unwrap();
        assert!(!record.passed);
        assert_eq!(record.failures().count(), 2);
        assert_eq!(record.critical_failures().count(), 1);
        assert_eq!(
            sink.count(|e| matches!(e, LifecycleEvent::RuleFailed { .. })),
            2
        );
    }

    #[test]
    fn test_standard_rules_pass_on_healthy_system() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &[]);
        register(&orchestrator, &log, "B", &["A"]);
        orchestrator.initialize_all().unwrap();
        let (mut validator, _) = standard_validator();

        let result = validator.validate_system(&orchestrator.system_status().to_snapshot());

        assert!(result.is_ok());
        let record = validator.last_record().unwrap();
        assert_eq!(record.results.len(), 4);
        assert!(record.results.iter().all(|r| r.valid));
    }

    #[test]
    fn test_standard_rules_block_failed_startup() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &[]);
        let b = register(&orchestrator, &log, "B", &["A"]);
        register(&orchestrator, &log, "C", &["B"]);
        b.update(|behavior| behavior.initialize_ok = false);
        orchestrator.initialize_all().unwrap();
        let (mut validator, _) = standard_validator();

        let err = validator
            .validate_system(&orchestrator.system_status().to_snapshot())
            .unwrap_err();

        let blocking: Vec<(&str, &str)> = err
            .failures()
            .iter()
            .map(|f| (f.rule.as_str(), f.message.as_str()))
            .collect();
        assert_eq!(
            blocking,
            vec![
                (ORCHESTRATOR_OPERATIONAL, "orchestrator is failed"),
                (NO_FAILED_SUBSYSTEMS, "failed: B"),
            ]
        );

        let advisory: Vec<&str> = validator
            .last_record()
            .unwrap()
            .failures()
            .filter(|f| !f.critical)
            .map(|f| f.rule.as_str())
            .collect();
        assert_eq!(advisory, vec![ALL_SUBSYSTEMS_OPERATIONAL]);
    }

    #[test]
    fn test_pending_recovery_is_advisory() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        let a = register(&orchestrator, &log, "A", &[]);
        orchestrator.initialize_all().unwrap();
        a.update(|behavior| {
            behavior.reconcile_ok = false;
            behavior.initialize_ok = false;
        });
        orchestrator.report_failure("A").unwrap();
        let (mut validator, _) = standard_validator();

        let err = validator
            .validate_system(&orchestrator.system_status().to_snapshot())
            .unwrap_err();

        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].rule, NO_FAILED_SUBSYSTEMS);
        let budget = validator
            .last_record()
            .unwrap()
            .results
            .iter()
            .find(|r| r.rule == RECOVERY_BUDGET_HEALTHY)
            .cloned()
            .unwrap();
        assert!(!budget.valid);
        assert_eq!(budget.message, "recovery attempts pending: A (1)");
    }

    #[test]
    fn test_history_keeps_every_run() {
        let (orchestrator, _) = orchestrator();
        let log = CallLog::default();
        register(&orchestrator, &log, "A", &[]);
        let (mut validator, _) = standard_validator();

        // Before startup the orchestrator is uninitialized
        assert!(validator
            .validate_system(&orchestrator.system_status().to_snapshot())
            .is_err());
        orchestrator.initialize_all().unwrap();
        assert!(validator
            .validate_system(&orchestrator.system_status().to_snapshot())
            .is_ok());

        let passed: Vec<bool> = validator.history().iter().map(|r| r.passed).collect();
        assert_eq!(passed, vec![false, true]);
    }

    #[tokio::test]
    async fn test_runtime_start_and_shutdown() {
        let sink = Arc::new(MemorySink::new());
        let runtime = LifecycleRuntime::with_sink(RuntimeConfig::default(), sink.clone()).unwrap();

        runtime.start().await.unwrap();
        assert!(runtime.validate_status().is_ok());

        runtime.shutdown().await.unwrap();

        let orchestrator = runtime.orchestrator();
        assert_eq!(orchestrator.orchestrator_state(), LifecycleState::Terminated);
        let terminated = orchestrator
            .system_status()
            .in_state(LifecycleState::Terminated)
            .len();
        assert_eq!(terminated, orchestrator.subsystem_names().len());
        assert!(sink.count(|e| matches!(
            e,
            LifecycleEvent::ValidationCompleted { passed: true, .. }
        )) >= 1);
    }
}
