//! Protocol codec
//!
//! Parsing command lines and rendering responses.

use crate::error::{NestError, Result};
use super::{Command, Response, Status};

/// Rendering of a GET miss
pub const NIL: &str = "(nil)";

// =============================================================================
// Command Parsing
// =============================================================================

/// Parse a single command line
///
/// Returns `Ok(None)` for blank lines and `#` comments.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let verb = match parts.next() {
        Some(verb) => verb.to_ascii_uppercase(),
        None => return Ok(None),
    };
    let args: Vec<&str> = parts.collect();

    let command = match verb.as_str() {
        "SET" => {
            let [key, value] = expect_args::<2>(&verb, &args)?;
            Command::Set {
                key: key.to_string(),
                value: parse_value(value)?,
            }
        }
        "GET" => {
            let [key] = expect_args::<1>(&verb, &args)?;
            Command::Get {
                key: key.to_string(),
            }
        }
        "DELETE" | "DEL" => {
            let [key] = expect_args::<1>(&verb, &args)?;
            Command::Delete {
                key: key.to_string(),
            }
        }
        "BEGIN" => {
            expect_args::<0>(&verb, &args)?;
            Command::Begin
        }
        "COMMIT" => {
            expect_args::<0>(&verb, &args)?;
            Command::Commit
        }
        "ROLLBACK" => {
            expect_args::<0>(&verb, &args)?;
            Command::Rollback
        }
        "DEPTH" => {
            expect_args::<0>(&verb, &args)?;
            Command::Depth
        }
        "DUMP" => {
            expect_args::<0>(&verb, &args)?;
            Command::Dump
        }
        "PING" => {
            expect_args::<0>(&verb, &args)?;
            Command::Ping
        }
        _ => {
            return Err(NestError::Protocol(format!("Unknown command: {}", verb)));
        }
    };

    Ok(Some(command))
}

/// Check the argument count and hand the arguments back as an array
fn expect_args<'a, const N: usize>(verb: &str, args: &[&'a str]) -> Result<[&'a str; N]> {
    <[&'a str; N]>::try_from(args).map_err(|_| {
        NestError::Protocol(format!(
            "{} expects {} argument(s), got {}",
            verb,
            N,
            args.len()
        ))
    })
}

fn parse_value(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| NestError::Protocol(format!("Invalid integer value: {}", raw)))
}

// =============================================================================
// Response Rendering
// =============================================================================

/// Render a response as a single output block
pub fn format_response(response: &Response) -> String {
    match (response.status, &response.payload) {
        (Status::Ok, None) => "OK".to_string(),
        (Status::Ok, Some(payload)) => payload.clone(),
        (Status::NotFound, _) => NIL.to_string(),
        (Status::Error, Some(message)) => format!("ERR {}", message),
        (Status::Error, None) => "ERR".to_string(),
    }
}
