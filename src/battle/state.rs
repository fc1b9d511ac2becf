//! Mutable combatant state
//!
//! One `WarUnitState` per participant, created by the orchestrator when a
//! battle starts and mutated in place by each command.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::battle::crew::{ArmType, CrewType};
use crate::command::CommandKind;
use crate::core::types::{Position, Turn, UnitId};

/// Combat profile of the troops a unit fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitProfile {
    pub crew_type: CrewType,
    pub attack: i32,
    pub defence: i32,
    pub speed: i32,
    pub avoid: i32,    // Percent chance to blunt an incoming hit
    pub critical: i32, // Percent chance to land a critical hit
}

impl Default for UnitProfile {
    fn default() -> Self {
        Self {
            crew_type: CrewType::Footman,
            attack: 100,
            defence: 60,
            speed: 50,
            avoid: 10,
            critical: 10,
        }
    }
}

impl UnitProfile {
    pub fn arm_type(&self) -> ArmType {
        self.crew_type.arm_type()
    }
}

/// Commander stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitStats {
    pub leadership: i32,
    pub strength: i32,
    pub intel: i32,
    pub special_skills: BTreeSet<String>,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            leadership: 50,
            strength: 50,
            intel: 50,
            special_skills: BTreeSet::new(),
        }
    }
}

/// Lingering effect appended by a command. Ticking and expiry happen outside
/// this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusEffect {
    Burn { duration: u32, damage_per_turn: i32 },
    Immobilize { duration: u32 },
}

impl StatusEffect {
    pub fn duration(&self) -> u32 {
        match self {
            StatusEffect::Burn { duration, .. } | StatusEffect::Immobilize { duration } => *duration,
        }
    }

    pub fn is_active(&self) -> bool {
        self.duration() > 0
    }
}

/// Full combat state of one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarUnitState {
    pub id: UnitId,
    pub name: String,

    pub hp: i32,
    pub max_hp: i32,
    pub atmos: i32,
    pub train: i32,
    pub rice: i32,
    pub position: Position,

    pub unit: UnitProfile,
    pub stats: UnitStats,

    pub killed_current: i32,
    pub killed_total: i32,
    pub dead_current: i32,
    pub dead_total: i32,

    pub status_effects: Vec<StatusEffect>,

    pub is_ambushing: bool,
    pub ambush_position: Option<Position>,
    pub is_defending: bool,
    pub defense_bonus: f64,
    pub defend_turn: Option<Turn>,
    pub is_retreating: bool,
    pub retreat_turn: Option<Turn>,

    /// Turn from which each command may be used again
    pub command_cooldowns: BTreeMap<CommandKind, Turn>,
}

impl Default for WarUnitState {
    fn default() -> Self {
        Self {
            id: UnitId::default(),
            name: String::new(),
            hp: 1000,
            max_hp: 1000,
            atmos: 100,
            train: 100,
            rice: 1000,
            position: Position::default(),
            unit: UnitProfile::default(),
            stats: UnitStats::default(),
            killed_current: 0,
            killed_total: 0,
            dead_current: 0,
            dead_total: 0,
            status_effects: Vec::new(),
            is_ambushing: false,
            ambush_position: None,
            is_defending: false,
            defense_bonus: 0.0,
            defend_turn: None,
            is_retreating: false,
            retreat_turn: None,
            command_cooldowns: BTreeMap::new(),
        }
    }
}

impl WarUnitState {
    pub fn new(id: UnitId, name: impl Into<String>, crew_type: CrewType) -> Self {
        Self {
            id,
            name: name.into(),
            unit: UnitProfile {
                crew_type,
                ..UnitProfile::default()
            },
            ..Self::default()
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_hp(mut self, hp: i32, max_hp: i32) -> Self {
        self.max_hp = max_hp;
        self.hp = hp.clamp(0, max_hp);
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.stats.special_skills.insert(skill.into());
        self
    }

    pub fn arm_type(&self) -> ArmType {
        self.unit.arm_type()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp)
    }

    /// Morale relative to the neutral level of 100
    pub fn atmos_ratio(&self) -> f64 {
        f64::from(self.atmos) / 100.0
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.stats.special_skills.contains(skill)
    }

    pub fn is_immobilized(&self) -> bool {
        self.status_effects
            .iter()
            .any(|e| matches!(e, StatusEffect::Immobilize { .. }) && e.is_active())
    }

    /// Turn from which `kind` is available again, if a cooldown was published
    pub fn cooldown_until(&self, kind: CommandKind) -> Option<Turn> {
        self.command_cooldowns.get(&kind).copied()
    }

    /// Apply incoming damage capped at remaining hp. Returns the hp actually lost.
    pub fn receive_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.hp);
        self.hp -= actual;
        self.dead_current += actual;
        self.dead_total += actual;
        actual
    }

    pub fn record_kills(&mut self, amount: i32) {
        self.killed_current += amount;
        self.killed_total += amount;
    }

    /// Lower morale, never below zero. Returns the morale actually lost.
    pub fn drain_atmos(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.atmos.max(0));
        self.atmos -= actual;
        actual
    }

    /// Raise morale up to `ceiling`; morale already above it is left alone.
    pub fn restore_atmos(&mut self, amount: i32, ceiling: i32) -> i32 {
        if self.atmos >= ceiling {
            return 0;
        }
        let before = self.atmos;
        self.atmos = (self.atmos + amount.max(0)).min(ceiling);
        self.atmos - before
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }
}

/// Attacker-side bookkeeping shared by every damaging command: the target
/// loses at most its remaining hp and the attacker is credited the same amount.
pub fn resolve_hit(attacker: &mut WarUnitState, target: &mut WarUnitState, damage: i32) -> i32 {
    let actual = target.receive_damage(damage);
    attacker.record_kills(actual);
    actual
}
