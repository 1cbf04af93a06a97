//! Protocol Module
//!
//! Defines the line-based wire protocol spoken with the game server.
//!
//! ## Protocol Format (UTF-8 text, one line per message)
//!
//! ### Commands
//! ```text
//! PUT <x> <y>\n               place a stone at (x, y), both non-negative
//! LOGIN <user> <password>\n   authenticate
//! ```
//!
//! ### Status Line
//! ```text
//! ID <id> <width> <height> <boardString>\n
//! ```
//! - `id`: single character, the marker assigned to this client
//! - `width`, `height`: positive decimal integers
//! - `boardString`: `width * height` symbols, row-major
//!
//! Every query reads this same line and extracts a different field. Requests
//! are synchronous with no pipelining.

mod board;
mod codec;
mod command;
mod status;

pub use board::{Board, Cell, EMPTY_SYMBOL, WALL_SYMBOL};
pub use codec::{
    encode_command, read_line, write_command, LineBuffer, DEFAULT_MAX_LINE_LEN, NEWLINE,
    READ_CHUNK_SIZE,
};
pub use command::{Command, CommandType};
pub use status::{StatusLine, StatusTokens, LEGACY_STATUS_KEYWORD, STATUS_KEYWORD, STATUS_TOKENS};
