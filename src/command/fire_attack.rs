//! Fire attack (화공)
//!
//! Needs the fire-attack skill and dry weather. A failed attempt can blow back
//! on the executor; a successful one leaves the target burning. The per-turn
//! burn tick belongs to the orchestrator.

use crate::battle::constants::*;
use crate::battle::context::{BattleContext, BattleType, Terrain, Weather};
use crate::battle::crew::ArmType;
use crate::battle::state::{resolve_hit, StatusEffect, WarUnitState};
use crate::command::markup;
use crate::command::requirement::{Availability, FailReason, Requirement};
use crate::command::result::{CommandData, CommandResult, FireAttackReport};
use crate::command::{BattleCommand, CommandContext, CommandKind};

const WET_WEATHER: [Weather; 2] = [Weather::Rain, Weather::Snow];

#[derive(Debug, Clone)]
pub struct FireAttackCommand {
    requirement: Requirement,
}

impl Default for FireAttackCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl FireAttackCommand {
    pub fn new() -> Self {
        Self {
            requirement: Requirement::new()
                .target()
                .skill(SKILL_FIRE_ATTACK)
                .forbid_weathers(&WET_WEATHER),
        }
    }

    fn weather_bonus(weather: Weather) -> f64 {
        match weather {
            Weather::Wind => FIRE_WIND_BONUS,
            Weather::Clear => FIRE_CLEAR_BONUS,
            _ => 0.0,
        }
    }

    pub fn success_chance(unit: &WarUnitState, battle: &BattleContext) -> f64 {
        let mut chance = FIRE_BASE_CHANCE
            + (f64::from(unit.stats.intel) - STAT_BASELINE) / FIRE_INTEL_DIVISOR
            + Self::weather_bonus(battle.weather);
        if battle.terrain == Terrain::Plain {
            chance += FIRE_PLAIN_BONUS;
        }
        if battle.battle_type == BattleType::Siege {
            chance += FIRE_SIEGE_BONUS;
        }
        if unit.arm_type() == ArmType::Wizard {
            chance += FIRE_WIZARD_BONUS;
        }
        chance
    }

    fn wet(battle: &BattleContext) -> Option<FailReason> {
        battle.weather.is_wet().then_some(FailReason::WeatherForbidden {
            weather: battle.weather,
        })
    }
}

impl BattleCommand for FireAttackCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::FireAttack
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    fn can_execute(&self, ctx: &CommandContext<'_>) -> Availability {
        if let Some(reason) = Self::wet(ctx.battle) {
            return Availability::blocked(reason);
        }
        self.requirement.check(self.kind(), ctx).into()
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if let Some(reason) = Self::wet(ctx.battle) {
            return CommandResult::refused(reason);
        }
        if !ctx.executor.has_skill(SKILL_FIRE_ATTACK) {
            return CommandResult::refused(FailReason::MissingSkill {
                skill: SKILL_FIRE_ATTACK.to_string(),
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
        let battle = ctx.battle;

        let chance = Self::success_chance(executor, battle);
        if !rng.next_bool(chance) {
            let mut logs = vec![format!(
                "{}'s fire attack fizzles ({} chance).",
                markup::name(executor),
                markup::percent(chance)
            )];
            let mut backfire = None;
            if rng.next_bool(FIRE_BACKFIRE_CHANCE) {
                let variance = rng.range(FIRE_BACKFIRE_VARIANCE.0, FIRE_BACKFIRE_VARIANCE.1);
                let raw = round_half_up(f64::from(executor.hp) * FIRE_BACKFIRE_RATIO * variance);
                let lost = executor.receive_damage(raw);
                logs.push(format!(
                    "The flames turn back on {}: {} casualties.",
                    markup::name(executor),
                    markup::loss(lost)
                ));
                backfire = Some(lost);
            }
            let report = FireAttackReport {
                chance,
                damage: 0,
                actual_damage: 0,
                burn: None,
                morale_loss: 0,
                backfire,
            };
            return CommandResult::failed(
                FailReason::ChanceFailed { chance },
                logs,
                Some(CommandData::FireAttack(report)),
            );
        }

        let intel_mult = 1.0 + f64::from(executor.stats.intel) / FIRE_DAMAGE_INTEL_DIVISOR;
        let weather_mult = 1.0 + Self::weather_bonus(battle.weather);
        let variance = rng.range(FIRE_DAMAGE_VARIANCE.0, FIRE_DAMAGE_VARIANCE.1);
        let mut raw = f64::from(target.max_hp) * FIRE_DAMAGE_RATIO * intel_mult * weather_mult * variance;
        if battle.terrain.is_fortification() {
            raw *= FIRE_FORTIFICATION_MULT;
        }
        let damage = round_half_up(raw).max(0);
        let actual_damage = resolve_hit(executor, target, damage);

        let duration = rng.next_range_int(FIRE_BURN_DURATION.0, FIRE_BURN_DURATION.1).max(0) as u32;
        let burn = StatusEffect::Burn {
            duration,
            damage_per_turn: round_half_up(f64::from(actual_damage) * FIRE_BURN_RATIO),
        };
        target.status_effects.push(burn);

        let morale_scale = if target.max_hp > 0 {
            f64::from(actual_damage) / f64::from(target.max_hp) * FIRE_MORALE_SCALE
        } else {
            0.0
        };
        let morale_loss = target.drain_atmos(round_half_up(morale_scale).min(FIRE_MORALE_CAP));

        tracing::trace!(chance, variance, damage, actual_damage, duration, "fire attack");

        let mut logs = vec![
            format!(
                "{} sets {} {}!",
                markup::name(executor),
                markup::name(target),
                markup::highlight("ablaze")
            ),
            format!(
                "{} casualties, burning for {} turns, morale {}.",
                markup::loss(actual_damage),
                duration,
                markup::loss(-morale_loss)
            ),
        ];
        if !target.is_alive() {
            logs.push(format!("{} is {}!", markup::name(target), markup::highlight("consumed")));
        }

        CommandResult::succeeded(
            logs,
            CommandData::FireAttack(FireAttackReport {
                chance,
                damage,
                actual_damage,
                burn: Some(burn),
                morale_loss,
                backfire: None,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::crew::CrewType;
    use crate::command::test_support::{check, run, unit, vitals};
    use crate::core::rng::SequenceRng;

    fn arsonist() -> WarUnitState {
        unit(1, "Torchbearers", CrewType::Archer).with_skill(SKILL_FIRE_ATTACK)
    }

    #[test]
    fn test_chance_modifiers() {
        let clear = BattleContext::default();
        let windy_siege = BattleContext::new(BattleType::Siege, Terrain::Wall, Weather::Wind);
        let archer = arsonist();
        let wizard = unit(2, "Sages", CrewType::Wizard);

        // 0.5 + 0 + 0.1 clear + 0.05 plain
        assert!((FireAttackCommand::success_chance(&archer, &clear) - 0.65).abs() < 1e-9);
        assert!((FireAttackCommand::success_chance(&wizard, &clear) - 0.85).abs() < 1e-9);
        // 0.5 + 0.2 wind + 0.15 siege
        assert!((FireAttackCommand::success_chance(&archer, &windy_siege) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_rain_blocks_without_touching_anyone() {
        let cmd = FireAttackCommand::new();
        let rain = BattleContext::field(Terrain::Plain, Weather::Rain);
        let mut executor = arsonist();
        let mut target = unit(2, "Camp", CrewType::Footman);
        let before = (vitals(&executor), vitals(&target));

        let availability = check(&cmd, &mut executor, Some(&mut target), &rain);
        assert_eq!(availability.reason, Some(FailReason::WeatherForbidden { weather: Weather::Rain }));

        let result = run(&cmd, &mut executor, Some(&mut target), &rain, &mut SequenceRng::constant(0.0));
        assert!(!result.success);
        assert_eq!((vitals(&executor), vitals(&target)), before);
    }

    #[test]
    fn test_snow_also_blocks() {
        let cmd = FireAttackCommand::new();
        let snow = BattleContext::field(Terrain::Plain, Weather::Snow);
        let mut executor = arsonist();
        let mut target = unit(2, "Camp", CrewType::Footman);
        assert!(!check(&cmd, &mut executor, Some(&mut target), &snow).is_ok());
    }

    #[test]
    fn test_requires_skill() {
        let cmd = FireAttackCommand::new();
        let mut executor = unit(1, "Plain Archers", CrewType::Archer);
        let mut target = unit(2, "Camp", CrewType::Footman);
        let result = run(
            &cmd,
            &mut executor,
            Some(&mut target),
            &BattleContext::default(),
            &mut SequenceRng::constant(0.0),
        );
        assert!(matches!(result.fail_reason, Some(FailReason::MissingSkill { .. })));
        assert_eq!(target.hp, 1000);
    }

    #[test]
    fn test_success_burns_target() {
        let cmd = FireAttackCommand::new();
        let mut executor = arsonist();
        let mut target = unit(2, "Camp", CrewType::Footman);
        // chance roll 0.0 succeeds; variance 0.0 -> 0.8; duration roll 0.0 -> 2
        let result = run(
            &cmd,
            &mut executor,
            Some(&mut target),
            &BattleContext::default(),
            &mut SequenceRng::constant(0.0),
        );
        assert!(result.success);
        // 1000 * 0.15 * 1.25 * 1.1 * 0.8 = 165
        match &result.data {
            Some(CommandData::FireAttack(r)) => {
                assert_eq!(r.damage, 165);
                assert_eq!(r.actual_damage, 165);
                assert_eq!(
                    r.burn,
                    Some(StatusEffect::Burn { duration: 2, damage_per_turn: 17 })
                );
                // round(165 / 1000 * 20) = 3
                assert_eq!(r.morale_loss, 3);
            }
            other => panic!("expected fire report, got {:?}", other),
        }
        assert_eq!(target.hp, 835);
        assert_eq!(target.status_effects.len(), 1);
        assert_eq!(executor.killed_total, 165);
    }

    #[test]
    fn test_fortifications_burn_hotter() {
        let cmd = FireAttackCommand::new();
        let gate = BattleContext::new(BattleType::Siege, Terrain::Gate, Weather::Clear);
        let mut executor = arsonist();
        let mut target = unit(2, "Gatehouse", CrewType::Castle);
        let result = run(&cmd, &mut executor, Some(&mut target), &gate, &mut SequenceRng::constant(0.0));
        // 165 * 1.3 = 214.5 -> 215
        assert!(matches!(
            result.data,
            Some(CommandData::FireAttack(FireAttackReport { damage: 215, .. }))
        ));
    }

    #[test]
    fn test_failure_may_backfire() {
        let cmd = FireAttackCommand::new();
        let mut executor = arsonist();
        let mut target = unit(2, "Camp", CrewType::Footman);
        // chance roll 0.9 fails, backfire roll 0.1 hits, variance 0.5 -> 1.0
        let mut rng = SequenceRng::new(vec![0.9, 0.1, 0.5]);
        let result = run(&cmd, &mut executor, Some(&mut target), &BattleContext::default(), &mut rng);
        assert!(!result.success);
        assert!(matches!(result.fail_reason, Some(FailReason::ChanceFailed { .. })));
        assert!(matches!(
            result.data,
            Some(CommandData::FireAttack(FireAttackReport { backfire: Some(100), .. }))
        ));
        assert_eq!(executor.hp, 900);
        assert_eq!(target.hp, 1000);
    }

    #[test]
    fn test_failure_without_backfire_changes_nothing() {
        let cmd = FireAttackCommand::new();
        let mut executor = arsonist();
        let mut target = unit(2, "Camp", CrewType::Footman);
        let before = (vitals(&executor), vitals(&target));
        let result = run(
            &cmd,
            &mut executor,
            Some(&mut target),
            &BattleContext::default(),
            &mut SequenceRng::constant(0.9),
        );
        assert!(!result.success);
        assert_eq!((vitals(&executor), vitals(&target)), before);
    }
}
