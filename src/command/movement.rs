//! Repositioning on the battle grid

use crate::battle::constants::*;
use crate::command::markup;
use crate::command::requirement::{Availability, FailReason, Requirement};
use crate::command::result::{CommandData, CommandResult, MoveReport};
use crate::command::{BattleCommand, CommandContext, CommandKind};

#[derive(Debug, Clone)]
pub struct MoveCommand {
    requirement: Requirement,
}

impl Default for MoveCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveCommand {
    pub fn new() -> Self {
        Self {
            requirement: Requirement::new().position(),
        }
    }

    /// Move points available to the executor on the current terrain
    pub fn allowance(ctx: &CommandContext<'_>) -> f64 {
        let arm_type = ctx.executor.arm_type();
        f64::from(ctx.traits.get(arm_type).move_points)
            * ctx.traits.terrain_modifier(arm_type, ctx.battle.terrain)
    }

    fn blocker(ctx: &CommandContext<'_>) -> Option<FailReason> {
        let destination = ctx.target_position?;
        if ctx.executor.is_immobilized() {
            return Some(FailReason::Immobilized);
        }
        let distance = ctx.executor.position.manhattan_distance(&destination);
        let allowance = Self::allowance(ctx);
        if f64::from(distance) > allowance {
            return Some(FailReason::OutOfRange { distance, allowance });
        }
        None
    }
}

impl BattleCommand for MoveCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Move
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    fn can_execute(&self, ctx: &CommandContext<'_>) -> Availability {
        if let Err(reason) = self.requirement.check(self.kind(), ctx) {
            return Availability::blocked(reason);
        }
        match Self::blocker(ctx) {
            Some(reason) => Availability::blocked(reason),
            None => Availability::ok(),
        }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let Some(destination) = ctx.target_position else {
            return CommandResult::refused(FailReason::MissingPosition);
        };
        if let Some(reason) = Self::blocker(ctx) {
            return CommandResult::refused(reason);
        }
        let allowance = Self::allowance(ctx);
        let executor = &mut *ctx.executor;

        let from = executor.position;
        let distance = from.manhattan_distance(&destination);
        let rice_cost = round_half_up(
            f64::from(distance) * MOVE_RICE_PER_TILE * (f64::from(executor.hp) / MOVE_RICE_HP_UNIT),
        )
        .max(0);

        executor.position = destination;
        executor.rice = (executor.rice - rice_cost).max(0);
        let ambush_detected = ctx.rng.next_bool(MOVE_AMBUSH_DETECT_CHANCE);
        tracing::trace!(distance, allowance, rice_cost, ambush_detected, "move");

        let mut logs = vec![format!(
            "{} moves from {} to {} ({} tiles, rice {}).",
            markup::name(executor),
            from,
            destination,
            distance,
            markup::loss(-rice_cost)
        )];
        if ambush_detected {
            logs.push(format!("{} Signs of an ambush nearby.", markup::highlight("Scouts report:")));
        }

        CommandResult::succeeded(
            logs,
            CommandData::Move(MoveReport {
                from,
                to: destination,
                distance,
                allowance,
                rice_cost,
                ambush_detected,
            }),
        )
    }
}
