//! Declarative preconditions shared by every command

use std::fmt;

use serde::Serialize;

use crate::battle::context::{BattleType, Terrain, Weather};
use crate::battle::crew::ArmType;
use crate::command::{CommandContext, CommandKind};
use crate::core::types::Turn;

/// Why a command refused to run or failed its roll
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailReason {
    NotRegistered { kind: CommandKind },
    MissingTarget,
    TargetDefeated,
    MissingPosition,
    HpTooLow { required: f64, actual: f64 },
    AtmosTooLow { required: i32, actual: i32 },
    NotEnoughRice { required: i32, actual: i32 },
    ArmTypeNotAllowed { arm_type: ArmType },
    BattleTypeNotAllowed { battle_type: BattleType },
    TerrainNotAllowed { terrain: Terrain },
    WeatherForbidden { weather: Weather },
    OnCooldown { until: Turn },
    MissingSkill { skill: String },
    OutOfRange { distance: u32, allowance: f64 },
    Immobilized,
    AlreadyAmbushing,
    NotAmbushing,
    AlreadyRetreating,
    ChanceFailed { chance: f64 },
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::NotRegistered { kind } => write!(f, "{:?} is not registered", kind),
            FailReason::MissingTarget => write!(f, "no target"),
            FailReason::TargetDefeated => write!(f, "target already defeated"),
            FailReason::MissingPosition => write!(f, "no destination"),
            FailReason::HpTooLow { required, actual } => {
                write!(f, "hp ratio {:.2} below {:.2}", actual, required)
            }
            FailReason::AtmosTooLow { required, actual } => {
                write!(f, "morale {} below {}", actual, required)
            }
            FailReason::NotEnoughRice { required, actual } => {
                write!(f, "rice {} below {}", actual, required)
            }
            FailReason::ArmTypeNotAllowed { arm_type } => {
                write!(f, "{} cannot use this command", arm_type.label())
            }
            FailReason::BattleTypeNotAllowed { battle_type } => {
                write!(f, "not usable in a {:?} battle", battle_type)
            }
            FailReason::TerrainNotAllowed { terrain } => write!(f, "not usable on {:?}", terrain),
            FailReason::WeatherForbidden { weather } => write!(f, "not usable in {:?}", weather),
            FailReason::OnCooldown { until } => write!(f, "on cooldown until turn {}", until),
            FailReason::MissingSkill { skill } => write!(f, "requires skill {}", skill),
            FailReason::OutOfRange { distance, allowance } => {
                write!(f, "distance {} exceeds {:.1} move points", distance, allowance)
            }
            FailReason::Immobilized => write!(f, "unit is immobilized"),
            FailReason::AlreadyAmbushing => write!(f, "already lying in ambush"),
            FailReason::NotAmbushing => write!(f, "not lying in ambush"),
            FailReason::AlreadyRetreating => write!(f, "already retreating"),
            FailReason::ChanceFailed { chance } => write!(f, "failed a {:.0}% roll", chance * 100.0),
        }
    }
}

/// Outcome of `can_execute`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Availability {
    pub ok: bool,
    pub reason: Option<FailReason>,
}

impl Availability {
    pub fn ok() -> Self {
        Self { ok: true, reason: None }
    }

    pub fn blocked(reason: FailReason) -> Self {
        Self {
            ok: false,
            reason: Some(reason),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl From<Result<(), FailReason>> for Availability {
    fn from(result: Result<(), FailReason>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(reason) => Self::blocked(reason),
        }
    }
}

/// Precondition set. Empty lists mean "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Requirement {
    pub min_hp_ratio: Option<f64>,
    pub min_atmos: Option<i32>,
    pub min_rice: Option<i32>,
    pub allowed_arm_types: Vec<ArmType>,
    pub allowed_battle_types: Vec<BattleType>,
    pub allowed_terrains: Vec<Terrain>,
    pub forbidden_weathers: Vec<Weather>,
    pub cooldown_turns: u32,
    pub requires_skill: Option<&'static str>,
    pub requires_target: bool,
    pub requires_position: bool,
}

impl Requirement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self) -> Self {
        self.requires_target = true;
        self
    }

    pub fn position(mut self) -> Self {
        self.requires_position = true;
        self
    }

    pub fn arm_types(mut self, arm_types: &[ArmType]) -> Self {
        self.allowed_arm_types = arm_types.to_vec();
        self
    }

    pub fn battle_types(mut self, battle_types: &[BattleType]) -> Self {
        self.allowed_battle_types = battle_types.to_vec();
        self
    }

    pub fn terrains(mut self, terrains: &[Terrain]) -> Self {
        self.allowed_terrains = terrains.to_vec();
        self
    }

    pub fn forbid_weathers(mut self, weathers: &[Weather]) -> Self {
        self.forbidden_weathers = weathers.to_vec();
        self
    }

    pub fn skill(mut self, skill: &'static str) -> Self {
        self.requires_skill = Some(skill);
        self
    }

    pub fn cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = turns;
        self
    }

    pub fn min_hp_ratio(mut self, ratio: f64) -> Self {
        self.min_hp_ratio = Some(ratio);
        self
    }

    pub fn min_atmos(mut self, atmos: i32) -> Self {
        self.min_atmos = Some(atmos);
        self
    }

    pub fn min_rice(mut self, rice: i32) -> Self {
        self.min_rice = Some(rice);
        self
    }

    /// Check every condition in a fixed order and report the first failure.
    /// Reads only; never draws from the rng.
    pub fn check(&self, kind: CommandKind, ctx: &CommandContext<'_>) -> Result<(), FailReason> {
        let executor = &*ctx.executor;

        if self.requires_target {
            match ctx.target.as_deref() {
                None => return Err(FailReason::MissingTarget),
                Some(target) if !target.is_alive() => return Err(FailReason::TargetDefeated),
                Some(_) => {}
            }
        }
        if self.requires_position && ctx.target_position.is_none() {
            return Err(FailReason::MissingPosition);
        }
        if let Some(required) = self.min_hp_ratio {
            let actual = executor.hp_ratio();
            if actual < required {
                return Err(FailReason::HpTooLow { required, actual });
            }
        }
        if let Some(required) = self.min_atmos {
            if executor.atmos < required {
                return Err(FailReason::AtmosTooLow {
                    required,
                    actual: executor.atmos,
                });
            }
        }
        if let Some(required) = self.min_rice {
            if executor.rice < required {
                return Err(FailReason::NotEnoughRice {
                    required,
                    actual: executor.rice,
                });
            }
        }
        let arm_type = executor.arm_type();
        if !self.allowed_arm_types.is_empty() && !self.allowed_arm_types.contains(&arm_type) {
            return Err(FailReason::ArmTypeNotAllowed { arm_type });
        }
        let battle = ctx.battle;
        if !self.allowed_battle_types.is_empty()
            && !self.allowed_battle_types.contains(&battle.battle_type)
        {
            return Err(FailReason::BattleTypeNotAllowed {
                battle_type: battle.battle_type,
            });
        }
        if !self.allowed_terrains.is_empty() && !self.allowed_terrains.contains(&battle.terrain) {
            return Err(FailReason::TerrainNotAllowed {
                terrain: battle.terrain,
            });
        }
        if self.forbidden_weathers.contains(&battle.weather) {
            return Err(FailReason::WeatherForbidden {
                weather: battle.weather,
            });
        }
        if self.cooldown_turns > 0 {
            if let Some(until) = executor.cooldown_until(kind) {
                if ctx.current_turn < until {
                    return Err(FailReason::OnCooldown { until });
                }
            }
        }
        if let Some(skill) = self.requires_skill {
            if !executor.has_skill(skill) {
                return Err(FailReason::MissingSkill {
                    skill: skill.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::context::BattleContext;
    use crate::battle::crew::CrewType;
    use crate::battle::state::WarUnitState;
    use crate::battle::traits::TraitTable;
    use crate::core::rng::SequenceRng;
    use crate::core::types::UnitId;

    fn check(
        req: &Requirement,
        executor: &mut WarUnitState,
        target: Option<&mut WarUnitState>,
        battle: &BattleContext,
        turn: u32,
    ) -> Result<(), FailReason> {
        let traits = TraitTable::standard();
        let mut rng = SequenceRng::constant(0.5);
        let mut ctx = CommandContext::new(executor, battle, &traits, &mut rng).on_turn(turn);
        if let Some(t) = target {
            ctx = ctx.with_target(t);
        }
        req.check(CommandKind::Attack, &ctx)
    }

    #[test]
    fn test_empty_requirement_passes() {
        let mut unit = WarUnitState::new(UnitId(1), "A", CrewType::Footman);
        assert!(check(&Requirement::new(), &mut unit, None, &BattleContext::default(), 1).is_ok());
    }

    #[test]
    fn test_target_checks() {
        let req = Requirement::new().target();
        let mut unit = WarUnitState::new(UnitId(1), "A", CrewType::Footman);
        let battle = BattleContext::default();
        assert_eq!(check(&req, &mut unit, None, &battle, 1), Err(FailReason::MissingTarget));

        let mut dead = WarUnitState::new(UnitId(2), "B", CrewType::Footman).with_hp(0, 1000);
        assert_eq!(
            check(&req, &mut unit, Some(&mut dead), &battle, 1),
            Err(FailReason::TargetDefeated)
        );
    }

    #[test]
    fn test_first_failure_wins() {
        // Wrong arm type and wrong terrain: arm type is checked first
        let req = Requirement::new()
            .arm_types(&[ArmType::Cavalry])
            .terrains(&[Terrain::Plain]);
        let mut unit = WarUnitState::new(UnitId(1), "A", CrewType::Footman);
        let battle = BattleContext::field(Terrain::Mountain, Weather::Clear);
        assert_eq!(
            check(&req, &mut unit, None, &battle, 1),
            Err(FailReason::ArmTypeNotAllowed { arm_type: ArmType::Footman })
        );
    }

    #[test]
    fn test_cooldown_blocks_until_turn() {
        let req = Requirement::new().cooldown(1);
        let mut unit = WarUnitState::new(UnitId(1), "A", CrewType::Cavalry);
        unit.command_cooldowns.insert(CommandKind::Attack, 5);
        let battle = BattleContext::default();
        assert_eq!(
            check(&req, &mut unit, None, &battle, 4),
            Err(FailReason::OnCooldown { until: 5 })
        );
        assert!(check(&req, &mut unit, None, &battle, 5).is_ok());
    }

    #[test]
    fn test_resource_thresholds() {
        let req = Requirement::new().min_hp_ratio(0.5).min_atmos(40).min_rice(100);
        let battle = BattleContext::default();

        let mut wounded = WarUnitState::new(UnitId(1), "A", CrewType::Footman).with_hp(400, 1000);
        assert!(matches!(
            check(&req, &mut wounded, None, &battle, 1),
            Err(FailReason::HpTooLow { .. })
        ));

        let mut shaken = WarUnitState::new(UnitId(1), "A", CrewType::Footman);
        shaken.atmos = 20;
        assert_eq!(
            check(&req, &mut shaken, None, &battle, 1),
            Err(FailReason::AtmosTooLow { required: 40, actual: 20 })
        );

        let mut hungry = WarUnitState::new(UnitId(1), "A", CrewType::Footman);
        hungry.rice = 10;
        assert_eq!(
            check(&req, &mut hungry, None, &battle, 1),
            Err(FailReason::NotEnoughRice { required: 100, actual: 10 })
        );
    }

    #[test]
    fn test_skill_and_weather() {
        let req = Requirement::new().skill("화공").forbid_weathers(&[Weather::Rain]);
        let mut unit = WarUnitState::new(UnitId(1), "A", CrewType::Wizard);
        let rain = BattleContext::field(Terrain::Plain, Weather::Rain);
        let clear = BattleContext::default();
        assert_eq!(
            check(&req, &mut unit, None, &rain, 1),
            Err(FailReason::WeatherForbidden { weather: Weather::Rain })
        );
        assert_eq!(
            check(&req, &mut unit, None, &clear, 1),
            Err(FailReason::MissingSkill { skill: "화공".to_string() })
        );
        let mut skilled = unit.clone().with_skill("화공");
        assert!(check(&req, &mut skilled, None, &clear, 1).is_ok());
    }

    #[test]
    fn test_fail_reason_display() {
        assert_eq!(FailReason::OnCooldown { until: 3 }.to_string(), "on cooldown until turn 3");
        assert_eq!(
            FailReason::ChanceFailed { chance: 0.45 }.to_string(),
            "failed a 45% roll"
        );
    }
}
