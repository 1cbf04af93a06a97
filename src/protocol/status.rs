//! Status line definitions
//!
//! The server answers with one canonical status line and every query reads
//! that same shape:
//!
//! ```text
//! ID <id> <width> <height> <boardString>
//! ```
//!
//! `StatusTokens` splits a line into its five tokens without interpreting
//! them, so each typed query only validates the field it returns.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{BoardError, Result};
use super::Board;

/// Keyword that opens a status line
pub const STATUS_KEYWORD: &str = "ID";

/// Keyword emitted by older servers for the same line
pub const LEGACY_STATUS_KEYWORD: &str = "BOARD";

/// Number of whitespace-delimited tokens in a status line
pub const STATUS_TOKENS: usize = 5;

/// A status line split into raw tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTokens<'a> {
    pub keyword: &'a str,
    pub id: &'a str,
    pub width: &'a str,
    pub height: &'a str,
    pub board: &'a str,
}

impl<'a> StatusTokens<'a> {
    /// Split a decoded line (without its newline) into tokens
    pub fn parse(line: &'a str) -> Result<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut tokens = line.split_whitespace();
        let mut next = || tokens.next();
        let (Some(keyword), Some(id), Some(width), Some(height), Some(board)) =
            (next(), next(), next(), next(), next())
        else {
            return Err(BoardError::Protocol(format!(
                "status line has fewer than {STATUS_TOKENS} tokens: {line:?}"
            )));
        };
        if next().is_some() {
            return Err(BoardError::Protocol(format!(
                "status line has more than {STATUS_TOKENS} tokens: {line:?}"
            )));
        }
        if keyword != STATUS_KEYWORD && keyword != LEGACY_STATUS_KEYWORD {
            return Err(BoardError::Protocol(format!(
                "unexpected status keyword {keyword:?}"
            )));
        }

        Ok(Self {
            keyword,
            id,
            width,
            height,
            board,
        })
    }

    /// The client's marker
    pub fn identity(&self) -> Result<char> {
        let mut chars = self.id.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Ok(c),
            _ => Err(BoardError::Protocol(format!(
                "identity must be a single printable character, got {:?}",
                self.id
            ))),
        }
    }

    pub fn width(&self) -> Result<u32> {
        dimension("width", self.width)
    }

    pub fn height(&self) -> Result<u32> {
        dimension("height", self.height)
    }

    /// Decode the board snapshot, checking its length against the dimensions
    pub fn board(&self) -> Result<Board> {
        Board::from_flat(self.width()?, self.height()?, self.board)
    }

    /// Interpret every field
    pub fn status(&self) -> Result<StatusLine> {
        Ok(StatusLine {
            id: self.identity()?,
            board: self.board()?,
        })
    }
}

/// A fully parsed status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    /// The marker assigned to this client
    pub id: char,

    /// Board snapshot carried by the line
    pub board: Board,
}

impl StatusLine {
    pub fn width(&self) -> u32 {
        self.board.width()
    }

    pub fn height(&self) -> u32 {
        self.board.height()
    }
}

impl FromStr for StatusLine {
    type Err = BoardError;

    fn from_str(line: &str) -> Result<Self> {
        StatusTokens::parse(line)?.status()
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{STATUS_KEYWORD} {} {} {} {}",
            self.id,
            self.board.width(),
            self.board.height(),
            self.board
        )
    }
}

/// Parse a strictly positive decimal dimension
fn dimension(name: &str, token: &str) -> Result<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BoardError::Protocol(format!(
            "{name} is not a decimal integer: {token:?}"
        )));
    }
    match token.parse::<u32>() {
        Ok(0) => Err(BoardError::Protocol(format!("{name} must be positive"))),
        Ok(value) => Ok(value),
        Err(_) => Err(BoardError::Protocol(format!("{name} is out of range: {token}"))),
    }
}
