//! Uniform outcome envelope returned by every command

use serde::Serialize;

use crate::battle::state::StatusEffect;
use crate::command::requirement::FailReason;
use crate::core::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackReport {
    pub advantage: f64,
    pub damage: i32,
    pub actual_damage: i32,
    pub critical: bool,
    pub avoided: bool,
    pub morale_loss: i32,
    pub target_defeated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveReport {
    pub from: Position,
    pub to: Position,
    pub distance: u32,
    pub allowance: f64,
    pub rice_cost: i32,
    /// Informational only; acting on it is up to the orchestrator
    pub ambush_detected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbushSetupReport {
    pub chance: f64,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbushStrikeReport {
    pub damage: i32,
    pub actual_damage: i32,
    pub morale_loss: i32,
    pub target_defeated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FireAttackReport {
    pub chance: f64,
    pub damage: i32,
    pub actual_damage: i32,
    pub burn: Option<StatusEffect>,
    pub morale_loss: i32,
    /// Self-inflicted loss when a failed attempt backfires
    pub backfire: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RockDropReport {
    pub chance: f64,
    pub damage: i32,
    pub actual_damage: i32,
    pub immobilized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetreatReport {
    pub pursuit_damage: i32,
    pub retreat_loss: i32,
    pub total_loss: i32,
    pub recovered: i32,
    pub morale_loss: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeReport {
    pub charge_bonus: f64,
    pub damage: i32,
    pub actual_damage: i32,
    pub critical: bool,
    pub breakthrough_morale: Option<i32>,
    pub recoil: i32,
    pub cooldown_until: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefendReport {
    pub defense_bonus: f64,
    pub atmos_gain: i32,
}

/// Structured payload for the presentation layer and orchestrator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandData {
    Attack(AttackReport),
    Move(MoveReport),
    AmbushSetup(AmbushSetupReport),
    AmbushStrike(AmbushStrikeReport),
    FireAttack(FireAttackReport),
    RockDrop(RockDropReport),
    EmergencyRetreat(RetreatReport),
    Charge(ChargeReport),
    Defend(DefendReport),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub success: bool,
    pub logs: Vec<String>,
    pub fail_reason: Option<FailReason>,
    pub data: Option<CommandData>,
}

impl CommandResult {
    pub fn succeeded(logs: Vec<String>, data: CommandData) -> Self {
        Self {
            success: true,
            logs,
            fail_reason: None,
            data: Some(data),
        }
    }

    /// Refused before anything was touched
    pub fn refused(reason: FailReason) -> Self {
        Self {
            success: false,
            logs: vec![format!("<R>{}</>", reason)],
            fail_reason: Some(reason),
            data: None,
        }
    }

    /// Ran, but the roll went against the executor
    pub fn failed(reason: FailReason, logs: Vec<String>, data: Option<CommandData>) -> Self {
        Self {
            success: false,
            logs,
            fail_reason: Some(reason),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refused_carries_reason_and_log() {
        let result = CommandResult::refused(FailReason::MissingTarget);
        assert!(!result.success);
        assert_eq!(result.fail_reason, Some(FailReason::MissingTarget));
        assert_eq!(result.logs, vec!["<R>no target</>".to_string()]);
        assert!(result.data.is_none());
    }

    #[test]
    fn test_json_shape() {
        let result = CommandResult::succeeded(
            vec!["ok".into()],
            CommandData::Defend(DefendReport {
                defense_bonus: 0.35,
                atmos_gain: 3,
            }),
        );
        let value = serde_json::to_value(&result).expect("serializes");
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["command"], "defend");
        assert_eq!(value["data"]["atmos_gain"], 3);
        assert!(value["fail_reason"].is_null());
    }
}
