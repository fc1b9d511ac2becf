//! Ambush: lie in wait, then spring on whoever walks in
//!
//! Setting the ambush and springing it are separate calls. The orchestrator
//! decides when an enemy has entered the ambush position and calls
//! `AmbushCommand::trigger_ambush`.

use crate::battle::constants::*;
use crate::battle::context::{BattleContext, Terrain, Weather};
use crate::battle::crew::ArmType;
use crate::battle::state::{resolve_hit, WarUnitState};
use crate::command::markup;
use crate::command::requirement::{Availability, FailReason, Requirement};
use crate::command::result::{AmbushSetupReport, AmbushStrikeReport, CommandData, CommandResult};
use crate::command::{BattleCommand, CommandContext, CommandKind};
use crate::core::rng::BattleRng;

#[derive(Debug, Clone)]
pub struct AmbushCommand {
    requirement: Requirement,
}

impl Default for AmbushCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl AmbushCommand {
    pub fn new() -> Self {
        Self {
            requirement: Requirement::new(),
        }
    }

    /// Probability that the ambush goes unnoticed while being set
    pub fn setup_chance(unit: &WarUnitState, battle: &BattleContext) -> f64 {
        let mut chance =
            AMBUSH_BASE_CHANCE + (f64::from(unit.stats.intel) - STAT_BASELINE) / AMBUSH_INTEL_DIVISOR;
        match unit.arm_type() {
            arm if arm.is_infantry() => chance += AMBUSH_INFANTRY_BONUS,
            ArmType::Cavalry => chance -= AMBUSH_CAVALRY_PENALTY,
            _ => {}
        }
        if battle.terrain == Terrain::Mountain {
            chance += AMBUSH_MOUNTAIN_BONUS;
        }
        if battle.weather == Weather::Fog {
            chance += AMBUSH_FOG_BONUS;
        }
        chance
    }

    /// Spring a prepared ambush on `victim`. Clears the ambush whether or
    /// not the victim survives.
    pub fn trigger_ambush(
        ambusher: &mut WarUnitState,
        victim: &mut WarUnitState,
        rng: &mut dyn BattleRng,
    ) -> CommandResult {
        if !ambusher.is_ambushing {
            return CommandResult::refused(FailReason::NotAmbushing);
        }
        if !victim.is_alive() {
            return CommandResult::refused(FailReason::TargetDefeated);
        }

        ambusher.is_ambushing = false;
        ambusher.ambush_position = None;

        let multiplier = AMBUSH_STRIKE_BASE + f64::from(ambusher.stats.intel) / AMBUSH_STRIKE_INTEL_DIVISOR;
        let variance = rng.range(AMBUSH_STRIKE_VARIANCE.0, AMBUSH_STRIKE_VARIANCE.1);
        let damage = round_half_up(f64::from(ambusher.unit.attack) * multiplier * variance).max(0);
        let actual_damage = resolve_hit(ambusher, victim, damage);

        let morale_scale = if victim.max_hp > 0 {
            f64::from(actual_damage) / f64::from(victim.max_hp) * AMBUSH_MORALE_SCALE
        } else {
            0.0
        };
        let morale_loss = victim.drain_atmos(round_half_up(morale_scale).min(AMBUSH_MORALE_CAP));
        let target_defeated = !victim.is_alive();

        tracing::trace!(multiplier, variance, damage, actual_damage, "ambush sprung");

        let mut logs = vec![
            format!("{} springs the {}!", markup::name(ambusher), markup::highlight("ambush")),
            format!(
                "{} is caught off guard: {} casualties, morale {}.",
                markup::name(victim),
                markup::loss(actual_damage),
                markup::loss(-morale_loss)
            ),
        ];
        if target_defeated {
            logs.push(format!("{} is {}!", markup::name(victim), markup::highlight("wiped out")));
        }

        CommandResult::succeeded(
            logs,
            CommandData::AmbushStrike(AmbushStrikeReport {
                damage,
                actual_damage,
                morale_loss,
                target_defeated,
            }),
        )
    }
}

impl BattleCommand for AmbushCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Ambush
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    fn can_execute(&self, ctx: &CommandContext<'_>) -> Availability {
        if let Err(reason) = self.requirement.check(self.kind(), ctx) {
            return Availability::blocked(reason);
        }
        if ctx.executor.is_ambushing {
            return Availability::blocked(FailReason::AlreadyAmbushing);
        }
        Availability::ok()
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if ctx.executor.is_ambushing {
            return CommandResult::refused(FailReason::AlreadyAmbushing);
        }
        let chance = Self::setup_chance(ctx.executor, ctx.battle);
        let position = ctx.target_position.unwrap_or(ctx.executor.position);

        if !ctx.rng.next_bool(chance) {
            return CommandResult::failed(
                FailReason::ChanceFailed { chance },
                vec![format!(
                    "{} was spotted setting an ambush ({} chance).",
                    markup::name(ctx.executor),
                    markup::percent(chance)
                )],
                None,
            );
        }

        let executor = &mut *ctx.executor;
        executor.is_ambushing = true;
        executor.ambush_position = Some(position);

        CommandResult::succeeded(
            vec![format!(
                "{} lies in {} at {}.",
                markup::name(executor),
                markup::highlight("ambush"),
                position
            )],
            CommandData::AmbushSetup(AmbushSetupReport { chance, position }),
        )
    }
}
