//! Battle environment shared by every command in one engagement

use serde::{Deserialize, Serialize};

/// Kind of engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleType {
    #[default]
    Field,
    Siege,   // Attacker assaulting a city
    Defense, // Defender holding a city
}

/// Ground the engagement is fought on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Terrain {
    #[default]
    Plain,
    Mountain,
    Water,
    Wall,
    Gate,
    InnerCastle,
}

impl Terrain {
    /// City fortifications
    pub fn is_fortification(self) -> bool {
        matches!(self, Terrain::Wall | Terrain::Gate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
    Fog,
    Wind,
}

impl Weather {
    /// Fire cannot be set in wet weather
    pub fn is_wet(self) -> bool {
        matches!(self, Weather::Rain | Weather::Snow)
    }
}

/// Fortification state of the city being fought over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityWall {
    pub durability: i32,
    pub max_durability: i32,
}

impl CityWall {
    pub fn integrity(&self) -> f64 {
        if self.max_durability <= 0 {
            return 0.0;
        }
        f64::from(self.durability.max(0)) / f64::from(self.max_durability)
    }
}

/// Immutable environment for one engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BattleContext {
    pub battle_type: BattleType,
    pub terrain: Terrain,
    pub weather: Weather,
    pub city_wall: Option<CityWall>,
    pub is_defender_city: bool,
}

impl BattleContext {
    pub fn new(battle_type: BattleType, terrain: Terrain, weather: Weather) -> Self {
        Self {
            battle_type,
            terrain,
            weather,
            city_wall: None,
            is_defender_city: false,
        }
    }

    pub fn field(terrain: Terrain, weather: Weather) -> Self {
        Self::new(BattleType::Field, terrain, weather)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_clear_plain_field() {
        let ctx = BattleContext::default();
        assert_eq!(ctx.battle_type, BattleType::Field);
        assert_eq!(ctx.terrain, Terrain::Plain);
        assert_eq!(ctx.weather, Weather::Clear);
        assert!(ctx.city_wall.is_none());
    }

    #[test]
    fn test_wet_weather() {
        assert!(Weather::Rain.is_wet());
        assert!(Weather::Snow.is_wet());
        assert!(!Weather::Wind.is_wet());
        assert!(!Weather::Fog.is_wet());
    }

    #[test]
    fn test_wall_integrity() {
        let wall = CityWall { durability: 250, max_durability: 1000 };
        assert!((wall.integrity() - 0.25).abs() < 1e-9);
        let broken = CityWall { durability: -5, max_durability: 0 };
        assert_eq!(broken.integrity(), 0.0);
    }

    #[test]
    fn test_context_from_toml() {
        let ctx: BattleContext = toml::from_str(
            r#"
            battle_type = "SIEGE"
            terrain = "GATE"
            weather = "WIND"
            city_wall = { durability = 400, max_durability = 1000 }
            "#,
        )
        .expect("valid context");
        assert_eq!(ctx.battle_type, BattleType::Siege);
        assert_eq!(ctx.terrain, Terrain::Gate);
        assert_eq!(ctx.weather, Weather::Wind);
        assert!(!ctx.is_defender_city);
        assert_eq!(ctx.city_wall.map(|w| w.integrity()), Some(0.4));
    }
}
