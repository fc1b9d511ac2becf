//! Emergency retreat
//!
//! Usable at any strength. The retreating unit always keeps at least one
//! soldier; what it loses is split between pursuit casualties (when an enemy
//! is on its heels) and the disorder of the withdrawal itself.

use crate::battle::constants::*;
use crate::battle::crew::ArmType;
use crate::command::markup;
use crate::command::requirement::{Availability, FailReason, Requirement};
use crate::command::result::{CommandData, CommandResult, RetreatReport};
use crate::command::{BattleCommand, CommandContext, CommandKind};

#[derive(Debug, Clone)]
pub struct EmergencyRetreatCommand {
    requirement: Requirement,
}

impl Default for EmergencyRetreatCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl EmergencyRetreatCommand {
    pub fn new() -> Self {
        Self {
            requirement: Requirement::new(),
        }
    }

    fn pursuer_multiplier(pursuer: ArmType) -> f64 {
        match pursuer {
            ArmType::Cavalry => RETREAT_CAVALRY_PURSUER,
            ArmType::Archer => RETREAT_ARCHER_PURSUER,
            _ => 1.0,
        }
    }
}

impl BattleCommand for EmergencyRetreatCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::EmergencyRetreat
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    fn can_execute(&self, ctx: &CommandContext<'_>) -> Availability {
        if ctx.executor.is_retreating {
            return Availability::blocked(FailReason::AlreadyRetreating);
        }
        self.requirement.check(self.kind(), ctx).into()
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        if ctx.executor.is_retreating {
            return CommandResult::refused(FailReason::AlreadyRetreating);
        }
        let executor = &mut *ctx.executor;
        let rng = &mut *ctx.rng;
        let pursuer = ctx.target.as_deref_mut().filter(|t| t.is_alive());
        let hp = f64::from(executor.hp);

        let pursuit_damage = match pursuer.as_deref() {
            Some(p) => {
                let mult = Self::pursuer_multiplier(p.arm_type());
                let variance = rng.range(RETREAT_PURSUIT_VARIANCE.0, RETREAT_PURSUIT_VARIANCE.1);
                round_half_up(hp * RETREAT_PURSUIT_RATIO * mult * variance).max(0)
            }
            None => 0,
        };
        let penalty = ctx.traits.get(executor.arm_type()).retreat_penalty;
        let variance = rng.range(RETREAT_LOSS_VARIANCE.0, RETREAT_LOSS_VARIANCE.1);
        let retreat_loss = round_half_up(hp * penalty * variance).max(0);

        let total_loss = (pursuit_damage + retreat_loss).min(executor.hp - 1).max(0);
        executor.receive_damage(total_loss);
        if let Some(p) = pursuer {
            p.record_kills(pursuit_damage.min(total_loss));
        }

        let morale_scale = if executor.max_hp > 0 {
            f64::from(total_loss) / f64::from(executor.max_hp) * RETREAT_MORALE_SCALE
        } else {
            0.0
        };
        let morale_loss = executor.drain_atmos(round_half_up(morale_scale).min(RETREAT_MORALE_CAP));

        executor.is_retreating = true;
        executor.retreat_turn = Some(ctx.current_turn);
        executor.is_ambushing = false;
        executor.ambush_position = None;
        executor.is_defending = false;
        executor.defense_bonus = 0.0;
        executor.defend_turn = None;

        let recovered = if executor.arm_type() == ArmType::Cavalry {
            executor.heal(round_half_up(f64::from(total_loss) * RETREAT_CAVALRY_RECOVERY))
        } else {
            0
        };

        tracing::trace!(pursuit_damage, retreat_loss, total_loss, recovered, "emergency retreat");

        let mut logs = vec![format!(
            "{} {}! {} lost in the withdrawal, morale {}.",
            markup::name(executor),
            markup::highlight("falls back"),
            markup::loss(total_loss),
            markup::loss(-morale_loss)
        )];
        if recovered > 0 {
            logs.push(format!(
                "Swift riders regroup: {} return to the ranks.",
                markup::gain(recovered)
            ));
        }

        CommandResult::succeeded(
            logs,
            CommandData::EmergencyRetreat(RetreatReport {
                pursuit_damage,
                retreat_loss,
                total_loss,
                recovered,
                morale_loss,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::context::BattleContext;
    use crate::battle::crew::CrewType;
    use crate::battle::state::WarUnitState;
    use crate::command::test_support::{run, unit};
    use crate::core::rng::SequenceRng;
    use crate::core::types::Position;

    fn report(result: &CommandResult) -> &RetreatReport {
        match &result.data {
            Some(CommandData::EmergencyRetreat(r)) => r,
            other => panic!("expected retreat report, got {:?}", other),
        }
    }

    fn retreat(executor: &mut WarUnitState, pursuer: Option<&mut WarUnitState>, roll: f64) -> CommandResult {
        run(
            &EmergencyRetreatCommand::new(),
            executor,
            pursuer,
            &BattleContext::default(),
            &mut SequenceRng::constant(roll),
        )
    }

    #[test]
    fn test_unpursued_retreat() {
        let mut foot = unit(1, "Infantry", CrewType::Footman);
        // loss variance 0.5 -> 1.0; 1000 * 0.1 = 100
        let result = retreat(&mut foot, None, 0.5);
        let r = report(&result);
        assert_eq!(r.pursuit_damage, 0);
        assert_eq!(r.retreat_loss, 100);
        assert_eq!(r.total_loss, 100);
        // round(100 / 1000 * 50) = 5
        assert_eq!(r.morale_loss, 5);
        assert_eq!(foot.hp, 900);
        assert!(foot.is_retreating);
        assert_eq!(foot.retreat_turn, Some(1));
    }

    #[test]
    fn test_cavalry_pursuer_hits_harder() {
        let mut foot = unit(1, "Infantry", CrewType::Footman);
        let mut riders = unit(2, "Riders", CrewType::Cavalry);
        // pursuit variance 0.0 -> 0.5: 1000 * 0.2 * 1.5 * 0.5 = 150
        // loss variance 0.0 -> 0.8: 1000 * 0.1 * 0.8 = 80
        let result = retreat(&mut foot, Some(&mut riders), 0.0);
        let r = report(&result);
        assert_eq!(r.pursuit_damage, 150);
        assert_eq!(r.retreat_loss, 80);
        assert_eq!(r.total_loss, 230);
        assert_eq!(riders.killed_total, 150);
        assert_eq!(foot.dead_total, 230);
    }

    #[test]
    fn test_never_drops_to_zero() {
        let mut keep = unit(1, "Remnant", CrewType::Castle).with_hp(2, 1000);
        let mut riders = unit(2, "Riders", CrewType::Cavalry);
        // pursuit round(2 * 0.2 * 1.5 * 0.995) = 1, loss round(2 * 0.3 * 1.196) = 1
        let result = retreat(&mut keep, Some(&mut riders), 0.99);
        assert!(result.success);
        let r = report(&result);
        assert_eq!(r.pursuit_damage + r.retreat_loss, 2);
        assert_eq!(r.total_loss, 1);
        assert_eq!(keep.hp, 1);
        assert_eq!(riders.killed_total, 1);
    }

    #[test]
    fn test_single_soldier_can_still_retreat() {
        let mut foot = unit(1, "Last Man", CrewType::Footman).with_hp(1, 1000);
        let result = retreat(&mut foot, None, 0.5);
        assert!(result.success);
        assert_eq!(foot.hp, 1);
        assert_eq!(report(&result).total_loss, 0);
    }

    #[test]
    fn test_cavalry_recovers_part_of_loss() {
        let mut cav = unit(1, "Riders", CrewType::Cavalry);
        // 1000 * 0.05 * 1.0 = 50, recover round(50 * 0.2) = 10
        let result = retreat(&mut cav, None, 0.5);
        let r = report(&result);
        assert_eq!(r.total_loss, 50);
        assert_eq!(r.recovered, 10);
        assert_eq!(cav.hp, 960);
    }

    #[test]
    fn test_retreat_drops_stances() {
        let mut foot = unit(1, "Infantry", CrewType::Footman);
        foot.is_ambushing = true;
        foot.ambush_position = Some(Position::new(3, 3));
        foot.is_defending = true;
        foot.defense_bonus = 0.4;
        foot.defend_turn = Some(1);
        assert!(retreat(&mut foot, None, 0.5).success);
        assert!(!foot.is_ambushing);
        assert!(foot.ambush_position.is_none());
        assert!(!foot.is_defending);
        assert_eq!(foot.defense_bonus, 0.0);
    }

    #[test]
    fn test_cannot_retreat_twice() {
        let mut foot = unit(1, "Infantry", CrewType::Footman);
        assert!(retreat(&mut foot, None, 0.5).success);
        let hp = foot.hp;
        let again = retreat(&mut foot, None, 0.5);
        assert_eq!(again.fail_reason, Some(FailReason::AlreadyRetreating));
        assert_eq!(foot.hp, hp);
    }

    #[test]
    fn test_dead_pursuer_is_ignored() {
        let mut foot = unit(1, "Infantry", CrewType::Footman);
        let mut fallen = unit(2, "Fallen", CrewType::Cavalry).with_hp(0, 1000);
        let result = retreat(&mut foot, Some(&mut fallen), 0.5);
        assert_eq!(report(&result).pursuit_damage, 0);
        assert_eq!(fallen.killed_total, 0);
    }
}
