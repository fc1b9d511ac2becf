//! Army types and crew types
//!
//! An army type is the broad category every modifier table is keyed by.
//! A crew type is the concrete troop a unit fields; it maps onto exactly one
//! army type and may carry counter matchups of its own.

use serde::{Deserialize, Serialize};

/// Broad unit category driving all combat modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArmType {
    Castle,
    Footman,
    Archer,
    Cavalry,
    Wizard,
    Siege,
}

impl ArmType {
    pub const ALL: [ArmType; 6] = [
        ArmType::Castle,
        ArmType::Footman,
        ArmType::Archer,
        ArmType::Cavalry,
        ArmType::Wizard,
        ArmType::Siege,
    ];

    /// Dense index into per-army-type tables
    pub fn index(self) -> usize {
        match self {
            ArmType::Castle => 0,
            ArmType::Footman => 1,
            ArmType::Archer => 2,
            ArmType::Cavalry => 3,
            ArmType::Wizard => 4,
            ArmType::Siege => 5,
        }
    }

    pub fn is_infantry(self) -> bool {
        matches!(self, ArmType::Footman)
    }

    pub fn label(self) -> &'static str {
        match self {
            ArmType::Castle => "castle",
            ArmType::Footman => "footman",
            ArmType::Archer => "archer",
            ArmType::Cavalry => "cavalry",
            ArmType::Wizard => "wizard",
            ArmType::Siege => "siege",
        }
    }
}

/// Concrete troop kind fielded by a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrewType {
    #[default]
    Footman,
    Spearman,   // Anti-cavalry
    Halberd,    // Breaks spear walls
    Archer,
    Crossbow,   // Slow, punches through armor
    Cavalry,
    HeavyCavalry,
    Wizard,
    Siege,
    Castle,     // Garrison of a fortification
}

impl CrewType {
    pub const ALL: [CrewType; 10] = [
        CrewType::Footman,
        CrewType::Spearman,
        CrewType::Halberd,
        CrewType::Archer,
        CrewType::Crossbow,
        CrewType::Cavalry,
        CrewType::HeavyCavalry,
        CrewType::Wizard,
        CrewType::Siege,
        CrewType::Castle,
    ];

    pub fn arm_type(self) -> ArmType {
        match self {
            CrewType::Footman | CrewType::Spearman | CrewType::Halberd => ArmType::Footman,
            CrewType::Archer | CrewType::Crossbow => ArmType::Archer,
            CrewType::Cavalry | CrewType::HeavyCavalry => ArmType::Cavalry,
            CrewType::Wizard => ArmType::Wizard,
            CrewType::Siege => ArmType::Siege,
            CrewType::Castle => ArmType::Castle,
        }
    }

    /// Crew-level counters. These take precedence over army-type counters.
    pub fn strong_against(self) -> &'static [CrewType] {
        match self {
            CrewType::Spearman => &[CrewType::Cavalry, CrewType::HeavyCavalry],
            CrewType::Halberd => &[CrewType::Spearman],
            CrewType::Cavalry => &[CrewType::Halberd, CrewType::Crossbow],
            CrewType::HeavyCavalry => &[CrewType::Halberd, CrewType::Footman],
            CrewType::Crossbow => &[CrewType::HeavyCavalry],
            _ => &[],
        }
    }

    pub fn weak_against(self) -> &'static [CrewType] {
        match self {
            CrewType::Spearman => &[CrewType::Halberd],
            CrewType::Halberd => &[CrewType::Cavalry, CrewType::HeavyCavalry],
            CrewType::Cavalry => &[CrewType::Spearman],
            CrewType::HeavyCavalry => &[CrewType::Spearman, CrewType::Crossbow],
            CrewType::Crossbow => &[CrewType::Cavalry],
            CrewType::Footman => &[CrewType::HeavyCavalry],
            _ => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CrewType::Footman => "footmen",
            CrewType::Spearman => "spearmen",
            CrewType::Halberd => "halberdiers",
            CrewType::Archer => "archers",
            CrewType::Crossbow => "crossbowmen",
            CrewType::Cavalry => "cavalry",
            CrewType::HeavyCavalry => "heavy cavalry",
            CrewType::Wizard => "wizards",
            CrewType::Siege => "siege engines",
            CrewType::Castle => "garrison",
        }
    }
}
