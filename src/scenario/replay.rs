//! Deterministic replay of a scenario script

use serde::Serialize;

use crate::battle::state::WarUnitState;
use crate::battle::traits::TraitTable;
use crate::command::ambush::AmbushCommand;
use crate::command::requirement::FailReason;
use crate::command::{CommandContext, CommandRegistry, CommandResult};
use crate::core::config::ReplayConfig;
use crate::core::error::{Result, WarError};
use crate::core::rng::SeededRng;
use crate::core::types::Turn;
use crate::scenario::{pair_mut, Scenario, ScriptStep, StepAction};

/// Result of one scripted step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub turn: Turn,
    pub action: StepAction,
    pub executor: String,
    pub target: Option<String>,
    pub result: CommandResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub scenario: String,
    pub seed: u64,
    pub outcomes: Vec<StepOutcome>,
    /// Unit states after the last step
    pub units: Vec<WarUnitState>,
    /// Values drawn from the stream over the whole run
    pub rng_draws: u64,
}

impl ReplayReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.success).count()
    }

    pub fn unit(&self, name: &str) -> Option<&WarUnitState> {
        self.units.iter().find(|u| u.name == name)
    }
}

/// Run every step of `scenario` against a fresh copy of its units
pub fn run_scenario(
    scenario: &Scenario,
    registry: &CommandRegistry,
    traits: &TraitTable,
    config: &ReplayConfig,
) -> Result<ReplayReport> {
    scenario.validate()?;

    let mut units = scenario.units.clone();
    let mut rng = SeededRng::new(config.seed);
    let mut turn = config.start_turn;
    let mut outcomes = Vec::with_capacity(scenario.steps.len());

    tracing::info!(
        scenario = %scenario.name,
        seed = config.seed,
        steps = scenario.steps.len(),
        "replaying scenario"
    );

    for (i, step) in scenario.steps.iter().enumerate() {
        if let Some(t) = step.turn {
            turn = t;
        }
        let executor = scenario.unit_index(&step.executor)?;
        let target = step
            .target
            .as_deref()
            .map(|name| scenario.unit_index(name))
            .transpose()?;

        let result = match step.action.command_kind() {
            Some(kind) => {
                let (executor, target) = split_units(&mut units, executor, target);
                let mut ctx = CommandContext::new(executor, &scenario.battle, traits, &mut rng).on_turn(turn);
                if let Some(t) = target {
                    ctx = ctx.with_target(t);
                }
                if let Some(position) = step.position {
                    ctx = ctx.with_position(position);
                }
                if config.skip_precheck {
                    match registry.get(kind) {
                        Some(command) => command.execute(&mut ctx),
                        None => CommandResult::refused(FailReason::NotRegistered { kind }),
                    }
                } else {
                    registry.dispatch(kind, &mut ctx)
                }
            }
            None => {
                let Some(victim) = target else {
                    return Err(missing_target(i, step));
                };
                let (ambusher, victim) = pair_mut(&mut units, executor, victim);
                AmbushCommand::trigger_ambush(ambusher, victim, &mut rng)
            }
        };

        tracing::debug!(step = i + 1, turn, action = ?step.action, success = result.success, "step resolved");
        outcomes.push(StepOutcome {
            step: i + 1,
            turn,
            action: step.action,
            executor: step.executor.clone(),
            target: step.target.clone(),
            result,
        });
    }

    Ok(ReplayReport {
        scenario: scenario.name.clone(),
        seed: config.seed,
        outcomes,
        units,
        rng_draws: rng.position(),
    })
}

fn split_units(
    units: &mut [WarUnitState],
    executor: usize,
    target: Option<usize>,
) -> (&mut WarUnitState, Option<&mut WarUnitState>) {
    match target {
        Some(t) => {
            let (e, t) = pair_mut(units, executor, t);
            (e, Some(t))
        }
        None => (&mut units[executor], None),
    }
}

fn missing_target(index: usize, step: &ScriptStep) -> WarError {
    WarError::InvalidScenario(format!(
        "step {}: {:?} by {} needs a target",
        index + 1,
        step.action,
        step.executor
    ))
}
