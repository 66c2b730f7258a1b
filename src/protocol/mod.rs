//! Protocol Module
//!
//! Line-oriented command language for driving a session.
//!
//! ## Request Format
//! One command per line, verb first, arguments separated by whitespace.
//! Verbs are case-insensitive; keys are taken verbatim.
//!
//! ```text
//! SET <key> <int>
//! GET <key>
//! DELETE <key>      (alias: DEL)
//! BEGIN
//! COMMIT
//! ROLLBACK
//! DEPTH
//! DUMP
//! PING
//! ```
//!
//! Blank lines and lines starting with `#` carry no command.
//!
//! ## Response Format
//! - `OK` for an acknowledged write or transaction boundary
//! - the value, for a GET hit or DEPTH
//! - `(nil)` for a GET miss
//! - `ERR <message>` for a rejected command

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Status};
pub use codec::{parse_command, format_response, NIL};
