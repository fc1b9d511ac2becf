//! Battle data model - combatants, environment and the trait table
//!
//! Everything here is data plus pure lookups. Commands in `crate::command`
//! are the only code that mutates a `WarUnitState`.

pub mod constants;
pub mod context;
pub mod crew;
pub mod state;
pub mod trait_data;
pub mod traits;

// Re-exports for convenient access
pub use constants::*;
pub use context::{BattleContext, BattleType, CityWall, Terrain, Weather};
pub use crew::{ArmType, CrewType};
pub use state::{resolve_hit, StatusEffect, UnitProfile, UnitStats, WarUnitState};
pub use traits::{
    AbilityCondition, AbilityContext, AbilityEffect, CombatPhase, CrewCombatTraits, RatioRange,
    SpecialAbility, TraitTable, TriggeredAbility,
};
