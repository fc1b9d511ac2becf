//! Scripted engagements
//!
//! A scenario file fixes the battle context, the starting state of every
//! unit and an ordered list of orders. Replaying it against a seed is fully
//! deterministic, which makes scenario files the regression format for
//! balance changes.

pub mod replay;

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{ATMOS_MAX, TRAIN_MAX};
use crate::battle::context::BattleContext;
use crate::battle::state::WarUnitState;
use crate::command::CommandKind;
use crate::core::config::ReplayConfig;
use crate::core::error::{Result, WarError};
use crate::core::types::{Position, Turn};

// Re-exports for convenient access
pub use replay::{run_scenario, ReplayReport, StepOutcome};

/// What a scripted step asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepAction {
    Attack,
    Move,
    Ambush,
    FireAttack,
    RockDrop,
    EmergencyRetreat,
    Charge,
    Defend,
    TriggerAmbush, // Spring the executor's prepared ambush on the target
}

impl StepAction {
    /// Registry kind for this action; `None` for out-of-band actions
    pub fn command_kind(self) -> Option<CommandKind> {
        match self {
            StepAction::Attack => Some(CommandKind::Attack),
            StepAction::Move => Some(CommandKind::Move),
            StepAction::Ambush => Some(CommandKind::Ambush),
            StepAction::FireAttack => Some(CommandKind::FireAttack),
            StepAction::RockDrop => Some(CommandKind::RockDrop),
            StepAction::EmergencyRetreat => Some(CommandKind::EmergencyRetreat),
            StepAction::Charge => Some(CommandKind::Charge),
            StepAction::Defend => Some(CommandKind::Defend),
            StepAction::TriggerAmbush => None,
        }
    }
}

/// One scripted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Turn the order executes on; defaults to the previous step's turn
    #[serde(default)]
    pub turn: Option<Turn>,
    pub action: StepAction,
    /// Unit name
    pub executor: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub battle: BattleContext,
    #[serde(default)]
    pub units: Vec<WarUnitState>,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(source)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Index of the unit called `name`
    pub fn unit_index(&self, name: &str) -> Result<usize> {
        self.units
            .iter()
            .position(|u| u.name == name)
            .ok_or_else(|| WarError::UnknownUnit(name.to_string()))
    }

    /// Reject scenarios the replay could not run to the end
    pub fn validate(&self) -> Result<()> {
        let mut names = BTreeSet::new();
        let mut ids = BTreeSet::new();
        for unit in &self.units {
            if unit.name.is_empty() {
                return Err(WarError::InvalidScenario(format!("unit {:?} has no name", unit.id)));
            }
            if !names.insert(unit.name.as_str()) {
                return Err(WarError::InvalidScenario(format!("duplicate unit name {}", unit.name)));
            }
            if !ids.insert(unit.id) {
                return Err(WarError::InvalidScenario(format!("duplicate unit id {:?}", unit.id)));
            }
            if unit.hp < 0 || unit.hp > unit.max_hp {
                return Err(WarError::InvalidScenario(format!(
                    "{}: hp {} outside 0..={}",
                    unit.name, unit.hp, unit.max_hp
                )));
            }
            if !(0..=ATMOS_MAX).contains(&unit.atmos) || !(0..=TRAIN_MAX).contains(&unit.train) {
                return Err(WarError::InvalidScenario(format!(
                    "{}: atmos {} / train {} out of range",
                    unit.name, unit.atmos, unit.train
                )));
            }
        }

        let mut last_turn = self.replay.start_turn;
        for (i, step) in self.steps.iter().enumerate() {
            let executor = self.unit_index(&step.executor)?;
            if let Some(target) = &step.target {
                if self.unit_index(target)? == executor {
                    return Err(WarError::InvalidScenario(format!(
                        "step {}: {} cannot target itself",
                        i + 1,
                        step.executor
                    )));
                }
            }
            if let Some(turn) = step.turn {
                if turn < last_turn {
                    return Err(WarError::InvalidScenario(format!(
                        "step {}: turn {} comes after turn {}",
                        i + 1,
                        turn,
                        last_turn
                    )));
                }
                last_turn = turn;
            }
        }
        Ok(())
    }
}

/// Borrow two distinct units mutably at once
pub fn pair_mut(units: &mut [WarUnitState], a: usize, b: usize) -> (&mut WarUnitState, &mut WarUnitState) {
    assert_ne!(a, b, "pair_mut needs two distinct units");
    if a < b {
        let (left, right) = units.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = units.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
