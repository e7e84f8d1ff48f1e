#[cfg(test)]
mod tests {
    use crate::config::{new_test_config, Pipeline, RestartStep};
    use crate::directory::Directory;
    use crate::facade::{PlanStep, RestartAction, RestartPlan};

    fn with_plan(steps: &[(&str, &str)]) -> crate::config::Config {
        let mut cfg = new_test_config();
        cfg.manager.pipeline = Some(Pipeline {
            restart: Some(
                steps
                    .iter()
                    .map(|(service, action)| RestartStep {
                        service: service.to_string(),
                        action: action.to_string(),
                    })
                    .collect(),
            ),
        });
        cfg
    }

    #[test]
    fn test_builtin_plan_follows_capabilities() {
        let plan = RestartPlan::builtin(&Directory::builtin());
        assert_eq!(
            plan.steps(),
            &[
                PlanStep::new("hdfswatcher", RestartAction::Stop),
                PlanStep::new("textproc", RestartAction::Stop),
                PlanStep::new("embedproc", RestartAction::Stop),
                PlanStep::new("hdfswatcher", RestartAction::Clear),
                PlanStep::new("textproc", RestartAction::Reset),
            ]
        );
    }

    #[test]
    fn test_no_pipeline_section_uses_builtin() {
        let directory = Directory::builtin();
        let plan = RestartPlan::from_config(&new_test_config(), &directory).unwrap();
        assert_eq!(plan, RestartPlan::builtin(&directory));
    }

    #[test]
    fn test_configured_plan_is_kept_in_order() {
        let cfg = with_plan(&[("textproc", "STOP"), ("textproc", "reset")]);
        let plan = RestartPlan::from_config(&cfg, &Directory::builtin()).unwrap();
        assert_eq!(
            plan.steps(),
            &[
                PlanStep::new("textproc", RestartAction::Stop),
                PlanStep::new("textproc", RestartAction::Reset),
            ]
        );
    }

    #[test]
    fn test_configured_plan_is_validated_against_directory() {
        let directory = Directory::builtin();

        let err = RestartPlan::from_config(&with_plan(&[("ghost", "stop")]), &directory).unwrap_err();
        assert!(err.to_string().contains("not in the directory"), "{}", err);

        let err = RestartPlan::from_config(&with_plan(&[("embedproc", "reset")]), &directory).unwrap_err();
        assert!(err.to_string().contains("does not support reset"), "{}", err);

        let err = RestartPlan::from_config(&with_plan(&[("textproc", "reboot")]), &directory).unwrap_err();
        assert!(err.to_string().contains("unknown restart action"), "{}", err);
    }
}
