use anyhow::Result;
use std::fmt;
use std::str::FromStr;

use crate::config::{Config, ConfigTrait};
use crate::directory::{Directory, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartAction {
    Stop,
    Clear,
    Reset,
}

impl RestartAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RestartAction::Stop => "stop",
            RestartAction::Clear => "clear",
            RestartAction::Reset => "reset",
        }
    }

    /// Capability a service needs for this step.
    pub fn operation(self) -> Operation {
        match self {
            RestartAction::Stop => Operation::Stop,
            RestartAction::Clear => Operation::Clear,
            RestartAction::Reset => Operation::Reset,
        }
    }
}

impl fmt::Display for RestartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown restart action: {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for RestartAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stop" => Ok(RestartAction::Stop),
            "clear" => Ok(RestartAction::Clear),
            "reset" => Ok(RestartAction::Reset),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub service: String,
    pub action: RestartAction,
}

impl PlanStep {
    pub fn new(service: impl Into<String>, action: RestartAction) -> Self {
        Self {
            service: service.into(),
            action,
        }
    }
}

/// Ordered steps executed by a pipeline restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestartPlan {
    steps: Vec<PlanStep>,
}

impl RestartPlan {
    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    /// Stops every service in directory order, then wipes each one's
    /// progress: clear where supported, processing reset otherwise.
    pub fn builtin(directory: &Directory) -> Self {
        let mut steps: Vec<PlanStep> = directory
            .iter()
            .filter(|d| d.supports(Operation::Stop))
            .map(|d| PlanStep::new(d.name(), RestartAction::Stop))
            .collect();

        for d in directory.iter() {
            if d.supports(Operation::Clear) {
                steps.push(PlanStep::new(d.name(), RestartAction::Clear));
            } else if d.supports(Operation::Reset) {
                steps.push(PlanStep::new(d.name(), RestartAction::Reset));
            }
        }

        Self { steps }
    }

    /// Uses `pipeline.restart` when configured. Every step must name a
    /// directory service that supports the step's action.
    pub fn from_config(cfg: &Config, directory: &Directory) -> Result<Self> {
        let Some(raw_steps) = cfg.restart_plan() else {
            return Ok(Self::builtin(directory));
        };

        let mut steps = Vec::with_capacity(raw_steps.len());
        for (i, raw) in raw_steps.iter().enumerate() {
            let action: RestartAction = raw
                .action
                .parse()
                .map_err(|e| anyhow::anyhow!("pipeline.restart[{}]: {}", i, e))?;
            let Some(descriptor) = directory.get(&raw.service) else {
                anyhow::bail!(
                    "pipeline.restart[{}]: service {:?} is not in the directory",
                    i,
                    raw.service
                );
            };
            if !descriptor.supports(action.operation()) {
                anyhow::bail!(
                    "pipeline.restart[{}]: service {:?} does not support {}",
                    i,
                    raw.service,
                    action
                );
            }
            steps.push(PlanStep::new(raw.service.clone(), action));
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
