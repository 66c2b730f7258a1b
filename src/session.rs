//! Session Module
//!
//! A single actor navigating one transaction chain serially.
//!
//! ## Responsibilities
//! - Track the stack of open transactions (top = current)
//! - Route commands to the current overlay
//! - Turn store errors into error responses without ending the session
//! - Drive a script of command lines from any reader

use std::io::{BufRead, Write};

use crate::config::Config;
use crate::error::Result;
use crate::overlay::{OverlayId, TransactionalStore};
use crate::protocol::{format_response, parse_command, Command, Response, Status};

/// Counters reported after running a script
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStats {
    /// Lines that carried a command
    pub commands: usize,

    /// Commands answered with an error
    pub errors: usize,

    /// Accepted writes and transaction boundaries
    pub mutations: usize,
}

/// Command router over a [`TransactionalStore`]
pub struct Session {
    /// Backing store and overlay arena
    store: TransactionalStore,

    /// Open transactions, innermost last
    open: Vec<OverlayId>,
}

impl Session {
    /// Create a session over a fresh store
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            store: TransactionalStore::with_config(config)?,
            open: Vec::new(),
        })
    }

    /// Overlay that commands currently apply to
    pub fn current(&self) -> OverlayId {
        self.open.last().copied().unwrap_or(OverlayId::ROOT)
    }

    /// Number of open transactions
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn store(&self) -> &TransactionalStore {
        &self.store
    }

    /// Give up the session, keeping the store and its overlay arena
    pub fn into_store(self) -> TransactionalStore {
        self.store
    }

    /// Execute a command
    ///
    /// Routes commands to the store against the current overlay.
    pub fn execute(&mut self, command: Command) -> Result<Response> {
        let current = self.current();

        match command {
            Command::Set { key, value } => {
                self.store.set(current, key, value)?;
                Ok(Response::ok(None))
            }
            Command::Get { key } => {
                if self.store.config().sentinel_replies {
                    return Ok(Response::value(self.store.get_or_sentinel(current, &key)?));
                }
                Ok(match self.store.get(current, &key)? {
                    Some(value) => Response::value(value),
                    None => Response::not_found(),
                })
            }
            Command::Delete { key } => {
                self.store.delete(current, key)?;
                Ok(Response::ok(None))
            }
            Command::Begin => {
                let child = self.store.begin(current)?;
                self.open.push(child);
                Ok(Response::ok(None))
            }
            Command::Commit => {
                self.store.commit(current)?;
                self.open.pop();
                Ok(Response::ok(None))
            }
            Command::Rollback => {
                self.store.rollback(current)?;
                self.open.pop();
                Ok(Response::ok(None))
            }
            Command::Depth => Ok(Response::value(self.depth())),
            Command::Dump => Ok(Response::ok(Some(self.dump()))),
            Command::Ping => Ok(Response::value("PONG")),
        }
    }

    /// Execute a command, reporting failures as error responses
    pub fn handle(&mut self, command: Command) -> Response {
        let kind = command.command_type();
        match self.execute(command) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{:?} rejected at depth {}: {}", kind, self.depth(), e);
                Response::error(&e.to_string())
            }
        }
    }

    /// Parse and execute one line; `None` for blank lines and comments
    pub fn handle_line(&mut self, line: &str) -> Option<Response> {
        self.handle_line_tracked(line).map(|(response, _)| response)
    }

    /// Like `handle_line`, also reporting whether an accepted command
    /// could have changed store or chain state
    fn handle_line_tracked(&mut self, line: &str) -> Option<(Response, bool)> {
        match parse_command(line) {
            Ok(Some(command)) => {
                let mutation = command.is_mutation();
                let response = self.handle(command);
                let mutated = mutation && !response.is_error();
                Some((response, mutated))
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Malformed command line {:?}: {}", line, e);
                Some((Response::error(&e.to_string()), false))
            }
        }
    }

    /// Run every line of `input`, writing one response per command
    ///
    /// Bare `OK` acknowledgements are suppressed when the store's config
    /// disables `echo_acks`.
    pub fn run_script<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
    ) -> Result<ScriptStats> {
        let echo_acks = self.store.config().echo_acks;
        let mut stats = ScriptStats::default();

        for line in input.lines() {
            let line = line?;
            let Some((response, mutated)) = self.handle_line_tracked(&line) else {
                continue;
            };

            stats.commands += 1;
            if response.is_error() {
                stats.errors += 1;
            }
            if mutated {
                stats.mutations += 1;
            }

            let is_ack = response.status == Status::Ok && response.payload.is_none();
            if is_ack && !echo_acks {
                continue;
            }
            writeln!(output, "{}", format_response(&response))?;
        }

        output.flush()?;

        tracing::debug!(
            "Script done: {} commands, {} mutations, {} errors",
            stats.commands,
            stats.mutations,
            stats.errors
        );

        if !self.open.is_empty() {
            tracing::info!(
                "Input ended with {} open transaction(s) left uncommitted",
                self.open.len()
            );
        }

        Ok(stats)
    }

    /// Committed entries on one line as space-separated `key=value`
    /// pairs, sorted by key. Keys never contain whitespace, since the
    /// parser splits on it.
    fn dump(&self) -> String {
        let entries = self.store.base().sorted_entries();
        if entries.is_empty() {
            return "(empty)".to_string();
        }
        entries
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            store: TransactionalStore::new(),
            open: Vec::new(),
        }
    }
}

impl From<TransactionalStore> for Session {
    fn from(store: TransactionalStore) -> Self {
        Self {
            store,
            open: Vec::new(),
        }
    }
}
