//! Combat constants - all tunable values in one place
//!
//! Per-army-type numbers (move points, terrain modifiers, abilities) live in
//! the trait table instead.

// Stat scales
pub const ATMOS_MAX: i32 = 150;
pub const TRAIN_MAX: i32 = 110;
pub const STAT_BASELINE: f64 = 50.0;

// Skills
pub const SKILL_FIRE_ATTACK: &str = "화공";
pub const SKILL_ROCK_DROP: &str = "낙석";

// Counter matchups
pub const ADVANTAGE_FAVORABLE: f64 = 1.2;
pub const ADVANTAGE_UNFAVORABLE: f64 = 0.8;
pub const ADVANTAGE_NEUTRAL: f64 = 1.0;

// Attack
pub const ATTACK_MIN_DAMAGE: i32 = 10;
pub const ATTACK_STRENGTH_DIVISOR: f64 = 10.0;
pub const ATTACK_DEFENCE_FACTOR: f64 = 0.5;
pub const ATTACK_ATMOS_MULT_RANGE: (f64, f64) = (0.5, 1.5);
pub const ATTACK_TRAIN_MULT_RANGE: (f64, f64) = (0.7, 1.3);
pub const ATTACK_VARIANCE: (f64, f64) = (0.9, 1.1);
pub const ATTACK_CRIT_MULT: (f64, f64) = (1.5, 2.0);
pub const ATTACK_AVOID_FACTOR: f64 = 0.3;
pub const ATTACK_MORALE_SCALE: f64 = 10.0;
pub const ATTACK_MORALE_CAP: i32 = 5;

// Movement
pub const MOVE_RICE_PER_TILE: f64 = 0.5;
pub const MOVE_RICE_HP_UNIT: f64 = 1000.0;
pub const MOVE_AMBUSH_DETECT_CHANCE: f64 = 0.1;

// Ambush
pub const AMBUSH_BASE_CHANCE: f64 = 0.7;
pub const AMBUSH_INTEL_DIVISOR: f64 = 200.0;
pub const AMBUSH_INFANTRY_BONUS: f64 = 0.1;
pub const AMBUSH_CAVALRY_PENALTY: f64 = 0.1;
pub const AMBUSH_MOUNTAIN_BONUS: f64 = 0.15;
pub const AMBUSH_FOG_BONUS: f64 = 0.2;
pub const AMBUSH_STRIKE_BASE: f64 = 1.3;
pub const AMBUSH_STRIKE_INTEL_DIVISOR: f64 = 200.0;
pub const AMBUSH_STRIKE_VARIANCE: (f64, f64) = (0.9, 1.2);
pub const AMBUSH_MORALE_SCALE: f64 = 30.0;
pub const AMBUSH_MORALE_CAP: i32 = 15;

// Fire attack
pub const FIRE_BASE_CHANCE: f64 = 0.5;
pub const FIRE_INTEL_DIVISOR: f64 = 100.0;
pub const FIRE_WIND_BONUS: f64 = 0.2;
pub const FIRE_CLEAR_BONUS: f64 = 0.1;
pub const FIRE_PLAIN_BONUS: f64 = 0.05;
pub const FIRE_SIEGE_BONUS: f64 = 0.15;
pub const FIRE_WIZARD_BONUS: f64 = 0.2;
pub const FIRE_BACKFIRE_CHANCE: f64 = 0.15;
pub const FIRE_BACKFIRE_RATIO: f64 = 0.1;
pub const FIRE_BACKFIRE_VARIANCE: (f64, f64) = (0.8, 1.2);
pub const FIRE_DAMAGE_RATIO: f64 = 0.15;
pub const FIRE_DAMAGE_INTEL_DIVISOR: f64 = 200.0;
pub const FIRE_DAMAGE_VARIANCE: (f64, f64) = (0.8, 1.3);
pub const FIRE_FORTIFICATION_MULT: f64 = 1.3;
pub const FIRE_BURN_DURATION: (i32, i32) = (2, 4);
pub const FIRE_BURN_RATIO: f64 = 0.1;
pub const FIRE_MORALE_SCALE: f64 = 20.0;
pub const FIRE_MORALE_CAP: i32 = 10;

// Rock drop
pub const ROCK_BASE_CHANCE: f64 = 0.6;
pub const ROCK_INTEL_CHANCE_DIVISOR: f64 = 150.0;
pub const ROCK_DEFENSE_BONUS: f64 = 0.15;
pub const ROCK_ELEVATION_STEP: f64 = 0.05;
pub const ROCK_ELEVATION_CAP: f64 = 0.2;
pub const ROCK_BASE_DAMAGE: f64 = 200.0;
pub const ROCK_HP_RATIO: f64 = 0.12;
pub const ROCK_INTEL_DAMAGE_DIVISOR: f64 = 300.0;
pub const ROCK_DAMAGE_VARIANCE: (f64, f64) = (0.8, 1.3);
pub const ROCK_VS_CAVALRY: f64 = 1.4;
pub const ROCK_VS_SIEGE: f64 = 1.5;
pub const ROCK_IMMOBILIZE_CHANCE: f64 = 0.3;
pub const ROCK_IMMOBILIZE_TURNS: u32 = 1;

// Emergency retreat
pub const RETREAT_PURSUIT_RATIO: f64 = 0.2;
pub const RETREAT_PURSUIT_VARIANCE: (f64, f64) = (0.5, 1.0);
pub const RETREAT_CAVALRY_PURSUER: f64 = 1.5;
pub const RETREAT_ARCHER_PURSUER: f64 = 1.3;
pub const RETREAT_LOSS_VARIANCE: (f64, f64) = (0.8, 1.2);
pub const RETREAT_MORALE_SCALE: f64 = 50.0;
pub const RETREAT_MORALE_CAP: i32 = 20;
pub const RETREAT_CAVALRY_RECOVERY: f64 = 0.2;

// Charge
pub const CHARGE_BASE_BONUS: f64 = 1.5;
pub const CHARGE_STRENGTH_DIVISOR: f64 = 100.0;
pub const CHARGE_MIN_ATMOS_MULT: f64 = 0.8;
pub const CHARGE_VS_FOOTMAN: f64 = 0.7;
pub const CHARGE_VS_ARCHER: f64 = 1.3;
pub const CHARGE_VARIANCE: (f64, f64) = (0.9, 1.2);
pub const CHARGE_CRIT_CAP: f64 = 0.3;
pub const CHARGE_CRIT_MULT: f64 = 1.5;
pub const CHARGE_BREAKTHROUGH_CHANCE: f64 = 0.25;
pub const CHARGE_BREAKTHROUGH_MORALE: (i32, i32) = (10, 15);
pub const CHARGE_RECOIL_RATIO: f64 = 0.1;
pub const CHARGE_RECOIL_VARIANCE: (f64, f64) = (0.5, 1.0);
pub const CHARGE_COOLDOWN_TURNS: u32 = 1;

// Defend
pub const DEFEND_BASE_BONUS: f64 = 0.3;
pub const DEFEND_ARM_ADJUST: f64 = 0.1;
pub const DEFEND_TRAIN_BASELINE: f64 = 70.0;
pub const DEFEND_STAT_DIVISOR: f64 = 200.0;
pub const DEFEND_BONUS_RANGE: (f64, f64) = (0.10, 0.60);
pub const DEFEND_ATMOS_REGEN: (i32, i32) = (2, 5);
pub const DEFEND_ATMOS_CAP: i32 = 130;

/// Round to nearest, halves toward positive infinity
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advantage_ordering() {
        assert!(ADVANTAGE_FAVORABLE > ADVANTAGE_NEUTRAL);
        assert!(ADVANTAGE_NEUTRAL > ADVANTAGE_UNFAVORABLE);
    }

    #[test]
    fn test_defend_bonus_range_ordered() {
        assert!(DEFEND_BONUS_RANGE.0 < DEFEND_BONUS_RANGE.1);
        assert!(DEFEND_ATMOS_CAP <= ATMOS_MAX);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(0.0), 0);
    }
}
