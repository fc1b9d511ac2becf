//! Standard melee attack

use crate::battle::constants::*;
use crate::battle::state::resolve_hit;
use crate::command::markup;
use crate::command::requirement::{FailReason, Requirement};
use crate::command::result::{AttackReport, CommandData, CommandResult};
use crate::command::{BattleCommand, CommandContext, CommandKind};

#[derive(Debug, Clone)]
pub struct AttackCommand {
    requirement: Requirement,
}

impl Default for AttackCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackCommand {
    pub fn new() -> Self {
        Self {
            requirement: Requirement::new().target(),
        }
    }
}

impl BattleCommand for AttackCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Attack
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let Some(target) = ctx.target.as_deref_mut() else {
            return CommandResult::refused(FailReason::MissingTarget);
        };
        if !target.is_alive() {
            return CommandResult::refused(FailReason::TargetDefeated);
        }
        let executor = &mut *ctx.executor;
        let rng = &mut *ctx.rng;

        let advantage = ctx
            .traits
            .crew_advantage(executor.unit.crew_type, target.unit.crew_type);
        let base = f64::from(executor.unit.attack)
            + f64::from(executor.stats.strength) / ATTACK_STRENGTH_DIVISOR
            - f64::from(target.unit.defence) * ATTACK_DEFENCE_FACTOR;
        let atmos_mult = (f64::from(executor.atmos) / 100.0)
            .clamp(ATTACK_ATMOS_MULT_RANGE.0, ATTACK_ATMOS_MULT_RANGE.1);
        let train_mult = (f64::from(executor.train) / 100.0)
            .clamp(ATTACK_TRAIN_MULT_RANGE.0, ATTACK_TRAIN_MULT_RANGE.1);
        let variance = rng.range(ATTACK_VARIANCE.0, ATTACK_VARIANCE.1);

        let mut damage = round_half_up(base * advantage * atmos_mult * train_mult * variance)
            .max(ATTACK_MIN_DAMAGE);

        let mut logs = Vec::new();
        let critical = rng.next_bool(f64::from(executor.unit.critical) / 100.0);
        if critical {
            let mult = rng.range(ATTACK_CRIT_MULT.0, ATTACK_CRIT_MULT.1);
            damage = round_half_up(f64::from(damage) * mult);
            logs.push(format!("{} {}", markup::name(executor), markup::highlight("lands a critical blow!")));
        }

        let avoided = rng.next_bool(f64::from(target.unit.avoid) / 100.0);
        if avoided {
            damage = round_half_up(f64::from(damage) * ATTACK_AVOID_FACTOR);
            logs.push(format!("{} blunts the assault.", markup::name(target)));
        }

        tracing::trace!(advantage, atmos_mult, train_mult, variance, damage, critical, avoided, "attack roll");

        let actual_damage = resolve_hit(executor, target, damage);
        let morale_scale = if target.max_hp > 0 {
            f64::from(actual_damage) / f64::from(target.max_hp) * ATTACK_MORALE_SCALE
        } else {
            0.0
        };
        let morale_loss = target.drain_atmos(round_half_up(morale_scale).min(ATTACK_MORALE_CAP));

        logs.push(format!(
            "{} attacks {}: {} casualties.",
            markup::name(executor),
            markup::name(target),
            markup::loss(actual_damage)
        ));
        if morale_loss > 0 {
            logs.push(format!("{} morale {}.", markup::name(target), markup::loss(-morale_loss)));
        }
        let target_defeated = !target.is_alive();
        if target_defeated {
            logs.push(format!("{} is {}!", markup::name(target), markup::highlight("routed")));
        }

        CommandResult::succeeded(
            logs,
            CommandData::Attack(AttackReport {
                advantage,
                damage,
                actual_damage,
                critical,
                avoided,
                morale_loss,
                target_defeated,
            }),
        )
    }
}
