//! Cavalry charge
//!
//! Open-field cavalry only. The charge publishes a cooldown on the executor.
//! Callers enforce it through `can_execute`; `execute` only re-checks the
//! ground rules.

use crate::battle::constants::*;
use crate::battle::context::{BattleContext, BattleType, Terrain};
use crate::battle::crew::ArmType;
use crate::battle::state::{resolve_hit, WarUnitState};
use crate::command::markup;
use crate::command::requirement::{FailReason, Requirement};
use crate::command::result::{ChargeReport, CommandData, CommandResult};
use crate::command::{BattleCommand, CommandContext, CommandKind};

#[derive(Debug, Clone)]
pub struct ChargeCommand {
    requirement: Requirement,
}

impl Default for ChargeCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ChargeCommand {
    pub fn new() -> Self {
        Self {
            requirement: Requirement::new()
                .target()
                .arm_types(&[ArmType::Cavalry])
                .terrains(&[Terrain::Plain])
                .battle_types(&[BattleType::Field])
                .cooldown(CHARGE_COOLDOWN_TURNS),
        }
    }

    pub fn charge_bonus(unit: &WarUnitState) -> f64 {
        let base = CHARGE_BASE_BONUS + (f64::from(unit.stats.strength) - STAT_BASELINE) / CHARGE_STRENGTH_DIVISOR;
        base * (f64::from(unit.atmos) / 100.0).max(CHARGE_MIN_ATMOS_MULT)
    }

    fn target_modifier(target: ArmType) -> f64 {
        match target {
            ArmType::Footman => CHARGE_VS_FOOTMAN,
            ArmType::Archer => CHARGE_VS_ARCHER,
            _ => 1.0,
        }
    }

    /// The ground rules re-checked at execution time
    fn blocker(executor: &WarUnitState, battle: &BattleContext) -> Option<FailReason> {
        let arm_type = executor.arm_type();
        if arm_type != ArmType::Cavalry {
            return Some(FailReason::ArmTypeNotAllowed { arm_type });
        }
        if battle.terrain != Terrain::Plain {
            return Some(FailReason::TerrainNotAllowed {
                terrain: battle.terrain,
            });
        }
        if battle.battle_type != BattleType::Field {
            return Some(FailReason::BattleTypeNotAllowed {
                battle_type: battle.battle_type,
            });
        }
        None
    }
}

impl BattleCommand for ChargeCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Charge
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if let Some(reason) = Self::blocker(ctx.executor, ctx.battle) {
            return CommandResult::refused(reason);
        }
        let Some(target) = ctx.target.as_deref_mut() else {
            return CommandResult::refused(FailReason::MissingTarget);
        };
        if !target.is_alive() {
            return CommandResult::refused(FailReason::TargetDefeated);
        }
        let executor = &mut *ctx.executor;
        let rng = &mut *ctx.rng;

        let charge_bonus = Self::charge_bonus(executor);
        let modifier = Self::target_modifier(target.arm_type());
        let variance = rng.range(CHARGE_VARIANCE.0, CHARGE_VARIANCE.1);
        let mut damage =
            round_half_up(f64::from(executor.unit.attack) * charge_bonus * modifier * variance).max(0);

        let crit_chance = (f64::from(executor.unit.critical) / 100.0).min(CHARGE_CRIT_CAP);
        let critical = rng.next_bool(crit_chance);
        if critical {
            damage = round_half_up(f64::from(damage) * CHARGE_CRIT_MULT);
        }
        let actual_damage = resolve_hit(executor, target, damage);

        let breakthrough_morale = if rng.next_bool(CHARGE_BREAKTHROUGH_CHANCE) {
            let amount = rng.next_range_int(CHARGE_BREAKTHROUGH_MORALE.0, CHARGE_BREAKTHROUGH_MORALE.1);
            Some(target.drain_atmos(amount))
        } else {
            None
        };

        let recoil_variance = rng.range(CHARGE_RECOIL_VARIANCE.0, CHARGE_RECOIL_VARIANCE.1);
        let recoil = executor.receive_damage(round_half_up(
            f64::from(actual_damage) * CHARGE_RECOIL_RATIO * recoil_variance,
        ));

        let cooldown_until = ctx.current_turn + CHARGE_COOLDOWN_TURNS;
        executor.command_cooldowns.insert(CommandKind::Charge, cooldown_until);

        tracing::trace!(charge_bonus, modifier, variance, damage, critical, recoil, "charge");

        let mut logs = vec![format!(
            "{} {} into {}: {} casualties.",
            markup::name(executor),
            markup::highlight("charges"),
            markup::name(target),
            markup::loss(actual_damage)
        )];
        if critical {
            logs.push(markup::highlight("The line shatters under the impact!"));
        }
        if let Some(morale) = breakthrough_morale {
            logs.push(format!(
                "{}! {} morale {}.",
                markup::highlight("Breakthrough"),
                markup::name(target),
                markup::loss(-morale)
            ));
        }
        if recoil > 0 {
            logs.push(format!("{} loses {} in the clash.", markup::name(executor), markup::loss(recoil)));
        }

        CommandResult::succeeded(
            logs,
            CommandData::Charge(ChargeReport {
                charge_bonus,
                damage,
                actual_damage,
                critical,
                breakthrough_morale,
                recoil,
                cooldown_until,
            }),
        )
    }
}
