//! Built-in combat traits for each army type
//!
//! Terrain and weather entries are multiplicative; anything not listed is 1.0.
//! Army-type counters form the basic triangle footman > cavalry > archer >
//! footman, with siege engines and castles outside it.

use std::collections::BTreeMap;

use crate::battle::context::{BattleType, Terrain, Weather};
use crate::battle::crew::ArmType;
use crate::battle::traits::{
    AbilityCondition, AbilityEffect, CombatPhase, CrewCombatTraits, RatioRange, SpecialAbility,
};

fn terrain(entries: &[(Terrain, f64)]) -> BTreeMap<Terrain, f64> {
    entries.iter().copied().collect()
}

fn weather(entries: &[(Weather, f64)]) -> BTreeMap<Weather, f64> {
    entries.iter().copied().collect()
}

fn in_phase(phase: CombatPhase) -> AbilityCondition {
    AbilityCondition {
        phase: Some(phase),
        ..AbilityCondition::default()
    }
}

fn in_battle(battle_type: BattleType) -> AbilityCondition {
    AbilityCondition {
        battle_type: Some(battle_type),
        ..AbilityCondition::default()
    }
}

pub fn castle() -> CrewCombatTraits {
    CrewCombatTraits {
        arm_type: ArmType::Castle,
        move_points: 0, // Fortifications do not move
        attack_range: 2,
        can_preemptive_attack: true,
        can_counter_attack: true,
        pursuit_bonus: 0.0,
        retreat_penalty: 0.3,
        siege_bonus: 0.0,
        defense_bonus: 0.5,
        field_bonus: 0.0,
        terrain_modifiers: terrain(&[
            (Terrain::Wall, 1.3),
            (Terrain::Gate, 1.2),
            (Terrain::InnerCastle, 1.4),
            (Terrain::Plain, 0.8),
        ]),
        weather_modifiers: weather(&[(Weather::Fog, 0.9)]),
        strong_against: vec![],
        weak_against: vec![ArmType::Siege],
        special_abilities: vec![
            SpecialAbility::new("fortify", 0.25, AbilityEffect::DamageReduction, 0.2)
                .when(in_battle(BattleType::Defense)),
            SpecialAbility::new("arrow_tower", 0.2, AbilityEffect::ExtraDamage, 0.15)
                .when(in_phase(CombatPhase::Counter)),
        ],
    }
}

pub fn footman() -> CrewCombatTraits {
    CrewCombatTraits {
        arm_type: ArmType::Footman,
        move_points: 3,
        attack_range: 1,
        can_preemptive_attack: false,
        can_counter_attack: true,
        pursuit_bonus: 0.1,
        retreat_penalty: 0.1,
        siege_bonus: 0.1,
        defense_bonus: 0.2,
        field_bonus: 0.1,
        terrain_modifiers: terrain(&[
            (Terrain::Mountain, 0.9),
            (Terrain::Water, 0.6),
            (Terrain::Wall, 0.8),
            (Terrain::InnerCastle, 1.1),
        ]),
        weather_modifiers: weather(&[(Weather::Rain, 0.95), (Weather::Snow, 0.9)]),
        strong_against: vec![ArmType::Cavalry],
        weak_against: vec![ArmType::Archer],
        special_abilities: vec![
            SpecialAbility::new("shield_wall", 0.15, AbilityEffect::DamageReduction, 0.3)
                .when(in_phase(CombatPhase::Counter)),
            SpecialAbility::new("last_stand", 0.1, AbilityEffect::MoraleBoost, 10.0).when(
                AbilityCondition {
                    atmos_ratio: Some(RatioRange::new(0.0, 0.5)),
                    ..AbilityCondition::default()
                },
            ),
        ],
    }
}

pub fn archer() -> CrewCombatTraits {
    CrewCombatTraits {
        arm_type: ArmType::Archer,
        move_points: 3,
        attack_range: 3,
        can_preemptive_attack: true,
        can_counter_attack: false,
        pursuit_bonus: 0.05,
        retreat_penalty: 0.12,
        siege_bonus: 0.15,
        defense_bonus: 0.1,
        field_bonus: 0.1,
        terrain_modifiers: terrain(&[
            (Terrain::Mountain, 1.1),
            (Terrain::Water, 0.7),
            (Terrain::Wall, 1.2),
        ]),
        weather_modifiers: weather(&[
            (Weather::Rain, 0.8),
            (Weather::Snow, 0.85),
            (Weather::Fog, 0.7),
            (Weather::Wind, 0.85),
        ]),
        strong_against: vec![ArmType::Footman],
        weak_against: vec![ArmType::Cavalry],
        special_abilities: vec![
            SpecialAbility::new("volley", 0.2, AbilityEffect::ExtraDamage, 0.25)
                .when(in_phase(CombatPhase::Preemptive)),
            SpecialAbility::new("pinning_fire", 0.1, AbilityEffect::Stun, 1.0),
        ],
    }
}

pub fn cavalry() -> CrewCombatTraits {
    CrewCombatTraits {
        arm_type: ArmType::Cavalry,
        move_points: 5,
        attack_range: 1,
        can_preemptive_attack: false,
        can_counter_attack: true,
        pursuit_bonus: 0.5,
        retreat_penalty: 0.05,
        siege_bonus: -0.2,
        defense_bonus: -0.1,
        field_bonus: 0.3,
        terrain_modifiers: terrain(&[
            (Terrain::Plain, 1.2),
            (Terrain::Mountain, 0.6),
            (Terrain::Water, 0.5),
            (Terrain::Wall, 0.4),
            (Terrain::Gate, 0.7),
            (Terrain::InnerCastle, 0.6),
        ]),
        weather_modifiers: weather(&[(Weather::Rain, 0.85), (Weather::Snow, 0.75)]),
        strong_against: vec![ArmType::Archer, ArmType::Wizard, ArmType::Siege],
        weak_against: vec![ArmType::Footman],
        special_abilities: vec![
            SpecialAbility::new("flanking", 0.2, AbilityEffect::ExtraDamage, 0.3)
                .when(in_battle(BattleType::Field)),
            SpecialAbility::new("trample", 0.1, AbilityEffect::MoraleDamage, 10.0)
                .when(in_phase(CombatPhase::Melee)),
            SpecialAbility::new("run_down", 0.3, AbilityEffect::ExtraDamage, 0.5)
                .when(in_phase(CombatPhase::Pursuit)),
        ],
    }
}

pub fn wizard() -> CrewCombatTraits {
    CrewCombatTraits {
        arm_type: ArmType::Wizard,
        move_points: 2,
        attack_range: 2,
        can_preemptive_attack: true,
        can_counter_attack: false,
        pursuit_bonus: 0.0,
        retreat_penalty: 0.12,
        siege_bonus: 0.1,
        defense_bonus: 0.05,
        field_bonus: 0.05,
        terrain_modifiers: terrain(&[(Terrain::Water, 0.7), (Terrain::Mountain, 0.9)]),
        weather_modifiers: weather(&[
            (Weather::Rain, 0.9),
            (Weather::Fog, 1.1),
            (Weather::Wind, 1.1),
        ]),
        strong_against: vec![ArmType::Footman],
        weak_against: vec![ArmType::Cavalry],
        special_abilities: vec![
            SpecialAbility::new("confusion", 0.15, AbilityEffect::Stun, 1.0),
            SpecialAbility::new("mending", 0.1, AbilityEffect::Heal, 0.05).when(AbilityCondition {
                hp_ratio: Some(RatioRange::new(0.0, 0.5)),
                ..AbilityCondition::default()
            }),
        ],
    }
}

pub fn siege() -> CrewCombatTraits {
    CrewCombatTraits {
        arm_type: ArmType::Siege,
        move_points: 1,
        attack_range: 4,
        can_preemptive_attack: false,
        can_counter_attack: false,
        pursuit_bonus: 0.0,
        retreat_penalty: 0.25,
        siege_bonus: 0.6,
        defense_bonus: -0.2,
        field_bonus: -0.2,
        terrain_modifiers: terrain(&[
            (Terrain::Mountain, 0.5),
            (Terrain::Water, 0.3),
            (Terrain::Wall, 1.5),
            (Terrain::Gate, 1.4),
        ]),
        weather_modifiers: weather(&[(Weather::Rain, 0.8), (Weather::Snow, 0.7)]),
        strong_against: vec![ArmType::Castle],
        weak_against: vec![ArmType::Cavalry],
        special_abilities: vec![
            SpecialAbility::new("wall_breaker", 0.3, AbilityEffect::WallDamage, 0.5)
                .when(in_battle(BattleType::Siege)),
        ],
    }
}
