//! Command definitions
//!
//! Represents commands sent from the client to the server.

use std::fmt;

use crate::error::{BoardError, Result};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Put,
    Login,
}

impl CommandType {
    /// Keyword that starts the command line on the wire
    pub fn keyword(&self) -> &'static str {
        match self {
            CommandType::Put => "PUT",
            CommandType::Login => "LOGIN",
        }
    }
}

/// A client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Place a stone at board coordinates
    Put { x: u32, y: u32 },

    /// Authenticate (the server registers unknown users on first login)
    Login { user: String, password: String },
}

impl Command {
    /// Build a PUT command from caller-supplied coordinates
    ///
    /// Negative coordinates and values that do not fit the wire type are
    /// rejected before anything reaches the connection.
    pub fn put(x: i64, y: i64) -> Result<Self> {
        Ok(Command::Put {
            x: coordinate("x", x)?,
            y: coordinate("y", y)?,
        })
    }

    /// Build a LOGIN command
    pub fn login(user: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let command = Command::Login {
            user: user.into(),
            password: password.into(),
        };
        command.validate()?;
        Ok(command)
    }

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Put { .. } => CommandType::Put,
            Command::Login { .. } => CommandType::Login,
        }
    }

    /// Check that the command encodes to exactly one well-formed line
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Put { .. } => Ok(()),
            Command::Login { user, password } => {
                word("user", user)?;
                word("password", password)
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.command_type().keyword();
        match self {
            Command::Put { x, y } => write!(f, "{keyword} {x} {y}"),
            Command::Login { user, password } => write!(f, "{keyword} {user} {password}"),
        }
    }
}

fn coordinate(name: &str, value: i64) -> Result<u32> {
    if value < 0 {
        return Err(BoardError::Validation(format!(
            "{name} coordinate must be non-negative, got {value}"
        )));
    }
    u32::try_from(value).map_err(|_| {
        BoardError::Validation(format!("{name} coordinate {value} is out of range"))
    })
}

fn word(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BoardError::Validation(format!("{name} must not be empty")));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(BoardError::Validation(format!(
            "{name} must not contain whitespace or control characters"
        )));
    }
    Ok(())
}
