//! Command definitions
//!
//! Represents commands issued to a session.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Set,
    Get,
    Delete,
    Begin,
    Commit,
    Rollback,
    Depth,
    Dump,
    Ping,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set a key in the current transaction
    Set { key: String, value: i64 },

    /// Read a key through the current transaction
    Get { key: String },

    /// Delete a key in the current transaction
    Delete { key: String },

    /// Open a nested transaction
    Begin,

    /// Commit the current transaction into its parent
    Commit,

    /// Discard the current transaction
    Rollback,

    /// Report the nesting depth
    Depth,

    /// List committed entries
    Dump,

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Set { .. } => CommandType::Set,
            Command::Get { .. } => CommandType::Get,
            Command::Delete { .. } => CommandType::Delete,
            Command::Begin => CommandType::Begin,
            Command::Commit => CommandType::Commit,
            Command::Rollback => CommandType::Rollback,
            Command::Depth => CommandType::Depth,
            Command::Dump => CommandType::Dump,
            Command::Ping => CommandType::Ping,
        }
    }

    /// Whether the command can change store or chain state
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Command::Get { .. } | Command::Depth | Command::Dump | Command::Ping
        )
    }
}
