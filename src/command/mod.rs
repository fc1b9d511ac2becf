//! Combat commands
//!
//! Each command is a self-contained algorithm behind the `BattleCommand`
//! interface: a pure `can_execute` check, an `execute` that either fully
//! applies or touches nothing, and a `cancel` hook that nothing supports yet.
//!
//! Orchestrator flow: build a `CommandRegistry` once, then per order
//! `CommandContext` -> `can_execute` -> `execute` -> `CommandResult`.

pub mod ambush;
pub mod attack;
pub mod charge;
pub mod defend;
pub mod fire_attack;
pub mod markup;
pub mod movement;
pub mod registry;
pub mod requirement;
pub mod result;
pub mod retreat;
pub mod rock_drop;

use serde::{Deserialize, Serialize};

use crate::battle::context::BattleContext;
use crate::battle::state::WarUnitState;
use crate::battle::traits::TraitTable;
use crate::core::rng::BattleRng;
use crate::core::types::{Position, Turn};

pub use ambush::AmbushCommand;
pub use attack::AttackCommand;
pub use charge::ChargeCommand;
pub use defend::DefendCommand;
pub use fire_attack::FireAttackCommand;
pub use movement::MoveCommand;
pub use registry::CommandRegistry;
pub use requirement::{Availability, FailReason, Requirement};
pub use result::{CommandData, CommandResult};
pub use retreat::EmergencyRetreatCommand;
pub use rock_drop::RockDropCommand;

/// Closed set of combat commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    Attack,
    Move,
    Ambush,
    FireAttack,
    RockDrop,
    EmergencyRetreat,
    Charge,
    Defend,
}

impl CommandKind {
    pub const ALL: [CommandKind; 8] = [
        CommandKind::Attack,
        CommandKind::Move,
        CommandKind::Ambush,
        CommandKind::FireAttack,
        CommandKind::RockDrop,
        CommandKind::EmergencyRetreat,
        CommandKind::Charge,
        CommandKind::Defend,
    ];
}

/// Everything one command invocation may read or mutate
pub struct CommandContext<'a> {
    pub executor: &'a mut WarUnitState,
    pub target: Option<&'a mut WarUnitState>,
    pub target_position: Option<Position>,
    pub battle: &'a BattleContext,
    pub traits: &'a TraitTable,
    pub rng: &'a mut dyn BattleRng,
    pub current_turn: Turn,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        executor: &'a mut WarUnitState,
        battle: &'a BattleContext,
        traits: &'a TraitTable,
        rng: &'a mut dyn BattleRng,
    ) -> Self {
        Self {
            executor,
            target: None,
            target_position: None,
            battle,
            traits,
            rng,
            current_turn: 0,
        }
    }

    pub fn with_target(mut self, target: &'a mut WarUnitState) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.target_position = Some(position);
        self
    }

    pub fn on_turn(mut self, turn: Turn) -> Self {
        self.current_turn = turn;
        self
    }
}

/// Uniform capability implemented by every command
pub trait BattleCommand {
    fn kind(&self) -> CommandKind;

    fn requirement(&self) -> &Requirement;

    /// Side-effect-free precondition check. Never draws from the rng.
    fn can_execute(&self, ctx: &CommandContext<'_>) -> Availability {
        self.requirement().check(self.kind(), ctx).into()
    }

    /// Perform the command. Implementations re-check their critical
    /// preconditions and return a refusal without mutating anything when
    /// they fail.
    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult;

    fn cancel(&self, _ctx: &mut CommandContext<'_>) -> bool {
        false
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_screaming_case() {
        let json = serde_json::to_string(&CommandKind::FireAttack).expect("serializes");
        assert_eq!(json, "\"FIRE_ATTACK\"");
    }

    #[test]
    fn test_all_kinds_distinct() {
        let mut kinds = CommandKind::ALL.to_vec();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), 8);
    }
}
