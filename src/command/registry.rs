//! Command registry - built once by whoever runs the battle

use ahash::AHashMap;

use crate::command::requirement::FailReason;
use crate::command::result::CommandResult;
use crate::command::{
    AmbushCommand, AttackCommand, BattleCommand, ChargeCommand, CommandContext, CommandKind,
    DefendCommand, EmergencyRetreatCommand, FireAttackCommand, MoveCommand, RockDropCommand,
};

/// Maps each `CommandKind` to its implementation
pub struct CommandRegistry {
    commands: AHashMap<CommandKind, Box<dyn BattleCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self {
            commands: AHashMap::new(),
        }
    }

    /// Registry with every built-in command
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(AttackCommand::new()));
        registry.register(Box::new(MoveCommand::new()));
        registry.register(Box::new(AmbushCommand::new()));
        registry.register(Box::new(FireAttackCommand::new()));
        registry.register(Box::new(RockDropCommand::new()));
        registry.register(Box::new(EmergencyRetreatCommand::new()));
        registry.register(Box::new(ChargeCommand::new()));
        registry.register(Box::new(DefendCommand::new()));
        registry
    }

    /// Register a command under its own kind, replacing any previous one
    pub fn register(&mut self, command: Box<dyn BattleCommand>) {
        self.commands.insert(command.kind(), command);
    }

    pub fn get(&self, kind: CommandKind) -> Option<&dyn BattleCommand> {
        self.commands.get(&kind).map(|c| c.as_ref())
    }

    /// Registered kinds in declaration order
    pub fn kinds(&self) -> Vec<CommandKind> {
        CommandKind::ALL
            .into_iter()
            .filter(|k| self.commands.contains_key(k))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Check then execute. A failed check is returned as a refusal and the
    /// command never runs.
    pub fn dispatch(&self, kind: CommandKind, ctx: &mut CommandContext<'_>) -> CommandResult {
        let Some(command) = self.get(kind) else {
            tracing::debug!(?kind, "command not registered");
            return CommandResult::refused(FailReason::NotRegistered { kind });
        };
        let availability = command.can_execute(ctx);
        if let Some(reason) = availability.reason {
            tracing::debug!(?kind, unit = %ctx.executor.name, %reason, "command refused");
            return CommandResult::refused(reason);
        }
        tracing::debug!(?kind, unit = %ctx.executor.name, turn = ctx.current_turn, "dispatching command");
        command.execute(ctx)
    }
}
