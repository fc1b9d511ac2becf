//! Per-army-type combat traits
//!
//! Movement, bonus scalars, terrain/weather modifiers, counter lists and
//! special abilities for each army type. The table is a plain value: build
//! the standard one or load overrides from TOML, then pass it to commands.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{ADVANTAGE_FAVORABLE, ADVANTAGE_NEUTRAL, ADVANTAGE_UNFAVORABLE};
use crate::battle::context::{BattleContext, BattleType, Terrain, Weather};
use crate::battle::crew::{ArmType, CrewType};
use crate::battle::state::WarUnitState;
use crate::battle::trait_data;
use crate::core::error::Result;
use crate::core::rng::BattleRng;

/// Stage of an exchange an ability may be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombatPhase {
    Preemptive, // Opening volley before melee
    Melee,
    Counter,
    Pursuit,
    Siege,
}

/// What a triggered ability does. Applying it is the orchestrator's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbilityEffect {
    ExtraDamage,     // Multiplier bonus on outgoing damage
    DamageReduction, // Fraction of incoming damage ignored
    MoraleDamage,    // Flat morale loss on the enemy
    MoraleBoost,     // Flat morale gain on self
    Heal,            // Fraction of max hp restored
    Stun,            // Turns the enemy loses
    WallDamage,      // Multiplier on damage to fortifications
}

/// Inclusive ratio window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioRange {
    pub min: f64,
    pub max: f64,
}

impl RatioRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Optional gate on an ability. Every present field must match.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityCondition {
    pub phase: Option<CombatPhase>,
    pub battle_type: Option<BattleType>,
    pub hp_ratio: Option<RatioRange>,
    pub atmos_ratio: Option<RatioRange>,
}

impl AbilityCondition {
    pub fn matches(&self, ctx: &AbilityContext) -> bool {
        self.phase.map_or(true, |p| p == ctx.phase)
            && self.battle_type.map_or(true, |b| b == ctx.battle_type)
            && self.hp_ratio.map_or(true, |r| r.contains(ctx.hp_ratio))
            && self.atmos_ratio.map_or(true, |r| r.contains(ctx.atmos_ratio))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialAbility {
    pub id: String,
    pub trigger_chance: f64,
    pub effect_type: AbilityEffect,
    pub effect_value: f64,
    #[serde(default)]
    pub condition: Option<AbilityCondition>,
}

impl SpecialAbility {
    pub fn new(id: &str, trigger_chance: f64, effect_type: AbilityEffect, effect_value: f64) -> Self {
        Self {
            id: id.to_string(),
            trigger_chance,
            effect_type,
            effect_value,
            condition: None,
        }
    }

    pub fn when(mut self, condition: AbilityCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn is_eligible(&self, ctx: &AbilityContext) -> bool {
        self.condition.map_or(true, |c| c.matches(ctx))
    }
}

/// Situation an ability check is evaluated in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityContext {
    pub phase: CombatPhase,
    pub battle_type: BattleType,
    pub hp_ratio: f64,
    pub atmos_ratio: f64,
}

impl AbilityContext {
    pub fn for_unit(unit: &WarUnitState, battle: &BattleContext, phase: CombatPhase) -> Self {
        Self {
            phase,
            battle_type: battle.battle_type,
            hp_ratio: unit.hp_ratio(),
            atmos_ratio: unit.atmos_ratio(),
        }
    }
}

/// An ability that fired on this check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredAbility {
    pub id: String,
    pub effect_type: AbilityEffect,
    pub effect_value: f64,
}

/// Trait record for one army type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewCombatTraits {
    pub arm_type: ArmType,
    pub move_points: u32,
    pub attack_range: u32,
    pub can_preemptive_attack: bool,
    pub can_counter_attack: bool,
    pub pursuit_bonus: f64,
    pub retreat_penalty: f64,
    pub siege_bonus: f64,
    pub defense_bonus: f64,
    pub field_bonus: f64,
    #[serde(default)]
    pub terrain_modifiers: BTreeMap<Terrain, f64>,
    #[serde(default)]
    pub weather_modifiers: BTreeMap<Weather, f64>,
    #[serde(default)]
    pub strong_against: Vec<ArmType>,
    #[serde(default)]
    pub weak_against: Vec<ArmType>,
    #[serde(default)]
    pub special_abilities: Vec<SpecialAbility>,
}

impl CrewCombatTraits {
    pub fn terrain_modifier(&self, terrain: Terrain) -> f64 {
        self.terrain_modifiers.get(&terrain).copied().unwrap_or(1.0)
    }

    pub fn weather_modifier(&self, weather: Weather) -> f64 {
        self.weather_modifiers.get(&weather).copied().unwrap_or(1.0)
    }
}

#[derive(Debug, Deserialize)]
struct TraitFile {
    #[serde(default)]
    crew: Vec<CrewCombatTraits>,
}

/// Complete trait table, one record per army type
#[derive(Debug, Clone, PartialEq)]
pub struct TraitTable {
    records: [CrewCombatTraits; 6],
}

impl Default for TraitTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TraitTable {
    /// Built-in balance
    pub fn standard() -> Self {
        Self {
            records: [
                trait_data::castle(),
                trait_data::footman(),
                trait_data::archer(),
                trait_data::cavalry(),
                trait_data::wizard(),
                trait_data::siege(),
            ],
        }
    }

    /// Standard table with the records found in `source` replacing their
    /// built-in counterparts
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: TraitFile = toml::from_str(source)?;
        let mut table = Self::standard();
        for record in file.crew {
            tracing::debug!(arm_type = ?record.arm_type, "overriding combat traits");
            table.replace(record);
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn replace(&mut self, record: CrewCombatTraits) {
        let idx = record.arm_type.index();
        self.records[idx] = record;
    }

    pub fn get(&self, arm_type: ArmType) -> &CrewCombatTraits {
        &self.records[arm_type.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CrewCombatTraits> {
        self.records.iter()
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        #[derive(Serialize)]
        struct Out<'a> {
            crew: &'a [CrewCombatTraits],
        }
        toml::to_string(&Out { crew: &self.records })
    }

    /// Counter multiplier for `attacker` hitting `defender`.
    ///
    /// Crew-level matchups are consulted first; when they are silent the
    /// army-type lists decide.
    pub fn crew_advantage(&self, attacker: CrewType, defender: CrewType) -> f64 {
        if attacker.strong_against().contains(&defender) {
            return ADVANTAGE_FAVORABLE;
        }
        if attacker.weak_against().contains(&defender) {
            return ADVANTAGE_UNFAVORABLE;
        }

        let traits = self.get(attacker.arm_type());
        let defender_arm = defender.arm_type();
        if traits.strong_against.contains(&defender_arm) {
            ADVANTAGE_FAVORABLE
        } else if traits.weak_against.contains(&defender_arm) {
            ADVANTAGE_UNFAVORABLE
        } else {
            ADVANTAGE_NEUTRAL
        }
    }

    pub fn terrain_modifier(&self, arm_type: ArmType, terrain: Terrain) -> f64 {
        self.get(arm_type).terrain_modifier(terrain)
    }

    pub fn weather_modifier(&self, arm_type: ArmType, weather: Weather) -> f64 {
        self.get(arm_type).weather_modifier(weather)
    }

    /// Roll every eligible special ability of `arm_type` once.
    ///
    /// Each eligible ability consumes exactly one draw, in table order, so the
    /// outcome depends on where the caller's stream is positioned. Calling
    /// twice rolls twice.
    pub fn check_all_special_abilities(
        &self,
        arm_type: ArmType,
        ctx: &AbilityContext,
        rng: &mut dyn BattleRng,
    ) -> Vec<TriggeredAbility> {
        let mut triggered = Vec::new();
        for ability in &self.get(arm_type).special_abilities {
            if !ability.is_eligible(ctx) {
                continue;
            }
            if rng.next_bool(ability.trigger_chance) {
                tracing::trace!(ability = %ability.id, ?arm_type, "special ability triggered");
                triggered.push(TriggeredAbility {
                    id: ability.id.clone(),
                    effect_type: ability.effect_type,
                    effect_value: ability.effect_value,
                });
            }
        }
        triggered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SequenceRng;

    #[test]
    fn test_standard_table_has_every_arm_type() {
        let table = TraitTable::standard();
        for arm in ArmType::ALL {
            assert_eq!(table.get(arm).arm_type, arm);
        }
    }

    #[test]
    fn test_counter_cycle() {
        let table = TraitTable::standard();
        assert_eq!(table.crew_advantage(CrewType::Spearman, CrewType::Cavalry), 1.2);
        assert_eq!(table.crew_advantage(CrewType::Halberd, CrewType::Spearman), 1.2);
        assert_eq!(table.crew_advantage(CrewType::Cavalry, CrewType::Halberd), 1.2);
    }

    #[test]
    fn test_counter_cycle_reverse_is_unfavorable() {
        let table = TraitTable::standard();
        assert_eq!(table.crew_advantage(CrewType::Cavalry, CrewType::Spearman), 0.8);
        assert_eq!(table.crew_advantage(CrewType::Spearman, CrewType::Halberd), 0.8);
        assert_eq!(table.crew_advantage(CrewType::Halberd, CrewType::Cavalry), 0.8);
    }

    #[test]
    fn test_no_matchup_favors_both_sides() {
        let table = TraitTable::standard();
        for a in CrewType::ALL {
            for b in CrewType::ALL {
                if table.crew_advantage(a, b) > 1.0 {
                    assert!(
                        table.crew_advantage(b, a) <= 1.0,
                        "{:?} and {:?} both hold the advantage",
                        a,
                        b
                    );
                }
            }
        }
        assert_eq!(table.crew_advantage(CrewType::Crossbow, CrewType::HeavyCavalry), 1.2);
        assert_eq!(table.crew_advantage(CrewType::HeavyCavalry, CrewType::Crossbow), 0.8);
    }

    #[test]
    fn test_arm_level_fallback() {
        let table = TraitTable::standard();
        // Neither crew lists the other, so army-type counters decide
        assert_eq!(table.crew_advantage(CrewType::Archer, CrewType::Footman), 1.2);
        assert_eq!(table.crew_advantage(CrewType::Footman, CrewType::Archer), 0.8);
        assert_eq!(table.crew_advantage(CrewType::Wizard, CrewType::Wizard), 1.0);
    }

    #[test]
    fn test_missing_modifiers_default_to_one() {
        let table = TraitTable::standard();
        assert_eq!(table.terrain_modifier(ArmType::Wizard, Terrain::InnerCastle), 1.0);
        assert_eq!(table.weather_modifier(ArmType::Siege, Weather::Clear), 1.0);
        assert!(table.terrain_modifier(ArmType::Cavalry, Terrain::Mountain) < 1.0);
    }

    #[test]
    fn test_condition_filters_abilities() {
        let table = TraitTable::standard();
        // Always-succeeding stream: every eligible ability fires
        let mut rng = SequenceRng::constant(0.0);
        let field = AbilityContext {
            phase: CombatPhase::Melee,
            battle_type: BattleType::Field,
            hp_ratio: 1.0,
            atmos_ratio: 1.0,
        };
        let siege = AbilityContext { battle_type: BattleType::Siege, phase: CombatPhase::Siege, ..field };

        let in_field = table.check_all_special_abilities(ArmType::Siege, &field, &mut rng);
        let in_siege = table.check_all_special_abilities(ArmType::Siege, &siege, &mut rng);
        assert!(in_field.iter().all(|a| a.id != "wall_breaker"));
        assert!(in_siege.iter().any(|a| a.id == "wall_breaker"));
    }

    #[test]
    fn test_ability_rolls_consume_one_draw_each() {
        let table = TraitTable::standard();
        let ctx = AbilityContext {
            phase: CombatPhase::Melee,
            battle_type: BattleType::Field,
            hp_ratio: 1.0,
            atmos_ratio: 1.0,
        };
        let eligible = table
            .get(ArmType::Cavalry)
            .special_abilities
            .iter()
            .filter(|a| a.is_eligible(&ctx))
            .count();
        let mut rng = SequenceRng::constant(0.99);
        let fired = table.check_all_special_abilities(ArmType::Cavalry, &ctx, &mut rng);
        assert!(fired.is_empty());
        assert_eq!(rng.drawn(), eligible);
    }

    #[test]
    fn test_toml_override_replaces_one_record() {
        let source = r#"
            [[crew]]
            arm_type = "CAVALRY"
            move_points = 9
            attack_range = 1
            can_preemptive_attack = false
            can_counter_attack = true
            pursuit_bonus = 0.5
            retreat_penalty = 0.05
            siege_bonus = -0.2
            defense_bonus = -0.1
            field_bonus = 0.3
            [crew.terrain_modifiers]
            MOUNTAIN = 0.5
        "#;
        let table = TraitTable::from_toml_str(source).expect("valid override");
        assert_eq!(table.get(ArmType::Cavalry).move_points, 9);
        assert_eq!(table.terrain_modifier(ArmType::Cavalry, Terrain::Mountain), 0.5);
        assert!(table.get(ArmType::Cavalry).special_abilities.is_empty());
        assert_eq!(table.get(ArmType::Footman), TraitTable::standard().get(ArmType::Footman));
    }

    #[test]
    fn test_toml_round_trip_of_standard_table() {
        let table = TraitTable::standard();
        let text = table.to_toml_string().expect("serializes");
        let reloaded = TraitTable::from_toml_str(&text).expect("parses");
        assert_eq!(table, reloaded);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(TraitTable::from_toml_str("[[crew]]\narm_type = \"DRAGON\"").is_err());
    }
}
