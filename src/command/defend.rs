//! Defensive stance
//!
//! Defending does not reduce anything by itself. Whoever resolves incoming
//! damage consults `DefendCommand::calculate_defended_damage` with the bonus
//! stored on the unit.

use crate::battle::constants::*;
use crate::battle::crew::ArmType;
use crate::battle::state::WarUnitState;
use crate::command::markup;
use crate::command::requirement::Requirement;
use crate::command::result::{CommandData, CommandResult, DefendReport};
use crate::command::{BattleCommand, CommandContext, CommandKind};

#[derive(Debug, Clone)]
pub struct DefendCommand {
    requirement: Requirement,
}

impl Default for DefendCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl DefendCommand {
    pub fn new() -> Self {
        Self {
            requirement: Requirement::new(),
        }
    }

    fn arm_adjustment(arm_type: ArmType) -> f64 {
        match arm_type {
            ArmType::Footman | ArmType::Castle => DEFEND_ARM_ADJUST,
            ArmType::Cavalry | ArmType::Siege => -DEFEND_ARM_ADJUST,
            ArmType::Archer | ArmType::Wizard => 0.0,
        }
    }

    /// Damage reduction granted by the stance, always within [0.10, 0.60]
    pub fn defense_bonus(unit: &WarUnitState) -> f64 {
        let bonus = DEFEND_BASE_BONUS
            + Self::arm_adjustment(unit.arm_type())
            + (f64::from(unit.train) - DEFEND_TRAIN_BASELINE) / DEFEND_STAT_DIVISOR
            + (f64::from(unit.stats.leadership) - STAT_BASELINE) / DEFEND_STAT_DIVISOR;
        bonus.clamp(DEFEND_BONUS_RANGE.0, DEFEND_BONUS_RANGE.1)
    }

    pub fn calculate_defended_damage(raw_damage: i32, defense_bonus: f64) -> i32 {
        round_half_up(f64::from(raw_damage) * (1.0 - defense_bonus))
    }
}

impl BattleCommand for DefendCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Defend
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let executor = &mut *ctx.executor;
        let defense_bonus = Self::defense_bonus(executor);
        let regen = ctx.rng.next_range_int(DEFEND_ATMOS_REGEN.0, DEFEND_ATMOS_REGEN.1);

        executor.is_defending = true;
        executor.defense_bonus = defense_bonus;
        executor.defend_turn = Some(ctx.current_turn);
        let atmos_gain = executor.restore_atmos(regen, DEFEND_ATMOS_CAP);
        tracing::trace!(defense_bonus, regen, atmos_gain, "defend");

        let mut logs = vec![format!(
            "{} {} (damage {}).",
            markup::name(executor),
            markup::highlight("braces for impact"),
            markup::gain(format!("-{}", markup::percent(defense_bonus)))
        )];
        if atmos_gain > 0 {
            logs.push(format!("Morale {}.", markup::gain(format!("+{}", atmos_gain))));
        }

        CommandResult::succeeded(
            logs,
            CommandData::Defend(DefendReport {
                defense_bonus,
                atmos_gain,
            }),
        )
    }
}
