//! Rock drop (낙석) from high ground

use crate::battle::constants::*;
use crate::battle::context::{BattleContext, BattleType, Terrain};
use crate::battle::crew::ArmType;
use crate::battle::state::{resolve_hit, StatusEffect, WarUnitState};
use crate::command::markup;
use crate::command::requirement::{FailReason, Requirement};
use crate::command::result::{CommandData, CommandResult, RockDropReport};
use crate::command::{BattleCommand, CommandContext, CommandKind};

#[derive(Debug, Clone)]
pub struct RockDropCommand {
    requirement: Requirement,
}

impl Default for RockDropCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl RockDropCommand {
    pub fn new() -> Self {
        Self {
            requirement: Requirement::new()
                .target()
                .terrains(&[Terrain::Mountain])
                .skill(SKILL_ROCK_DROP),
        }
    }

    /// Bonus from standing above the target, in [0, 0.2]
    pub fn elevation_bonus(executor: &WarUnitState, target: &WarUnitState) -> f64 {
        let rise = f64::from(executor.position.y - target.position.y);
        (rise * ROCK_ELEVATION_STEP).clamp(0.0, ROCK_ELEVATION_CAP)
    }

    pub fn success_chance(executor: &WarUnitState, target: &WarUnitState, battle: &BattleContext) -> f64 {
        let mut chance = ROCK_BASE_CHANCE
            + (f64::from(executor.stats.intel) - STAT_BASELINE) / ROCK_INTEL_CHANCE_DIVISOR
            + Self::elevation_bonus(executor, target);
        if battle.battle_type == BattleType::Defense {
            chance += ROCK_DEFENSE_BONUS;
        }
        chance
    }
}

impl BattleCommand for RockDropCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::RockDrop
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if ctx.battle.terrain != Terrain::Mountain {
            return CommandResult::refused(FailReason::TerrainNotAllowed {
                terrain: ctx.battle.terrain,
            });
        }
        if !ctx.executor.has_skill(SKILL_ROCK_DROP) {
            return CommandResult::refused(FailReason::MissingSkill {
                skill: SKILL_ROCK_DROP.to_string(),
            });
        }
        let Some(target) = ctx.target.as_deref_mut() else {
            return CommandResult::refused(FailReason::MissingTarget);
        };
        if !target.is_alive() {
            return CommandResult::refused(FailReason::TargetDefeated);
        }
        let executor = &mut *ctx.executor;
        let rng = &mut *ctx.rng;

        let chance = Self::success_chance(executor, target, ctx.battle);
        if !rng.next_bool(chance) {
            return CommandResult::failed(
                FailReason::ChanceFailed { chance },
                vec![format!(
                    "{}'s rocks miss {} ({} chance).",
                    markup::name(executor),
                    markup::name(target),
                    markup::percent(chance)
                )],
                None,
            );
        }

        let base = ROCK_BASE_DAMAGE + f64::from(target.max_hp) * ROCK_HP_RATIO;
        let intel_mult = 1.0 + f64::from(executor.stats.intel) / ROCK_INTEL_DAMAGE_DIVISOR;
        let variance = rng.range(ROCK_DAMAGE_VARIANCE.0, ROCK_DAMAGE_VARIANCE.1);
        let mut raw = base * intel_mult * variance;
        match target.arm_type() {
            ArmType::Cavalry => raw *= ROCK_VS_CAVALRY,
            ArmType::Siege => raw *= ROCK_VS_SIEGE,
            _ => {}
        }
        let damage = round_half_up(raw).max(0);
        let actual_damage = resolve_hit(executor, target, damage);

        let immobilized = rng.next_bool(ROCK_IMMOBILIZE_CHANCE);
        if immobilized {
            target.status_effects.push(StatusEffect::Immobilize {
                duration: ROCK_IMMOBILIZE_TURNS,
            });
        }

        tracing::trace!(chance, variance, damage, actual_damage, immobilized, "rock drop");

        let mut logs = vec![format!(
            "{} sends rocks down on {}: {} casualties.",
            markup::name(executor),
            markup::name(target),
            markup::loss(actual_damage)
        )];
        if immobilized {
            logs.push(format!("{} is {}.", markup::name(target), markup::highlight("pinned in place")));
        }

        CommandResult::succeeded(
            logs,
            CommandData::RockDrop(RockDropReport {
                chance,
                damage,
                actual_damage,
                immobilized,
            }),
        )
    }
}
