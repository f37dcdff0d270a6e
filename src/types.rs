//! This module defines the core data structures and types used throughout the engine,
//! including machine definitions, states, head movements, step outcomes and error types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::table::TransitionTable;
use crate::validator::AnalysisError;
use crate::Rule;

/// A single tape symbol.
pub type Symbol = char;

/// The blank symbol that fills every tape cell not yet written.
pub const BLANK_SYMBOL: Symbol = '_';
/// The maximum allowed size for a machine definition in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// The default number of steps a driver performs before giving up.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// An interned state label.
///
/// Cloning a `State` only bumps a reference count, so the engine can move
/// between states on every step without allocating.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Arc<str>);

impl State {
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for State {
    fn from(label: String) -> Self {
        Self(Arc::from(label))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A complete machine definition.
///
/// A program bundles the transition table with the start state and the
/// accepting and rejecting state sets. It is immutable once handed to a
/// [`TuringMachine`](crate::TuringMachine).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// Human readable name of the machine.
    pub name: String,
    /// The state every run starts in.
    pub start: State,
    /// States that halt the machine with an accepting outcome.
    #[serde(default)]
    pub accept: BTreeSet<State>,
    /// States that halt the machine with a rejecting outcome.
    #[serde(default)]
    pub reject: BTreeSet<State>,
    /// The transition table.
    pub rules: TransitionTable,
}

impl Program {
    /// Creates a program with no rejecting states.
    pub fn new<I, S>(name: &str, rules: TransitionTable, start: &str, accept: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        Self {
            name: name.to_string(),
            start: State::new(start),
            accept: accept.into_iter().map(Into::into).collect(),
            reject: BTreeSet::new(),
            rules,
        }
    }

    /// Replaces the rejecting state set.
    pub fn with_reject<I, S>(mut self, reject: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.reject = reject.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_accepting(&self, state: &State) -> bool {
        self.accept.contains(state)
    }

    pub fn is_rejecting(&self, state: &State) -> bool {
        self.reject.contains(state)
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        };
        write!(f, "{c}")
    }
}

/// What the machine does for a matched `(state, symbol)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The symbol written under the head.
    pub write: Symbol,
    /// Where the head moves after writing.
    pub direction: Direction,
    /// The state the machine moves to.
    pub next: State,
}

/// A single transition rule in its flat form, as it appears in definition files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub state: State,
    pub read: Symbol,
    pub write: Symbol,
    pub direction: Direction,
    pub next: State,
}

/// The value returned by a single call to `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// A transition was applied and the machine keeps running.
    Running,
    /// The machine halted during this call with an accepting outcome.
    Accept,
    /// The machine halted during this call with a rejecting outcome, either
    /// through a rejecting state or an undefined transition.
    Reject,
    /// The machine had already halted; nothing changed.
    Halt,
}

impl Status {
    /// Returns `true` if a driver should stop stepping after this status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Running)
    }
}

/// The result attached to a halted configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Accepted,
    Rejected,
    /// No verdict was reached. Only drivers report this, when their step
    /// budget runs out before the machine halts.
    Undetermined,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Accepted => "ACCEPT",
            Outcome::Rejected => "REJECT",
            Outcome::Undetermined => "HALT",
        };
        f.pad(label)
    }
}

/// A read-only copy of a machine configuration, suitable for rendering or
/// serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub state: State,
    pub tape: String,
    pub head: usize,
    pub halted: bool,
    pub outcome: Option<Outcome>,
    pub steps: usize,
}

/// Represents the errors that can occur while building, loading or looking up machines.
///
/// Running a machine never produces one of these: undefined transitions are
/// reported as [`Status::Reject`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The machine definition failed construction-time validation.
    #[error("Program validation error: {0}")]
    Validation(#[from] AnalysisError),
    /// Indicates an error during the parsing of a `.tm` definition.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The definition is structurally invalid, e.g. malformed JSON or a duplicated rule.
    #[error("Program definition error: {0}")]
    DefinitionError(String),
    /// Indicates an error related to reading definition files.
    #[error("File error: {0}")]
    FileError(String),
    /// No library machine matches the requested name or index.
    #[error("Unknown machine: {0}")]
    UnknownMachine(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let stay_json = serde_json::to_string(&Direction::Stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let stay: Direction = serde_json::from_str(&stay_json).unwrap();
        assert_eq!(stay, Direction::Stay);
    }

    #[test]
    fn test_state_is_transparent() {
        let state = State::from("q0");
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"q0\"");
        assert_eq!(state.to_string(), "q0");
        assert_eq!(state, State::from("q0".to_string()));
    }

    #[test]
    fn test_status_terminal() {
        assert!(!Status::Running.is_terminal());
        assert!(Status::Accept.is_terminal());
        assert!(Status::Reject.is_terminal());
        assert!(Status::Halt.is_terminal());
    }

    #[test]
    fn test_program_halting_sets() {
        let program = Program::new("Test", TransitionTable::new(), "q0", ["qacc"])
            .with_reject(["qrej"]);

        assert!(program.is_accepting(&State::from("qacc")));
        assert!(program.is_rejecting(&State::from("qrej")));
        assert!(!program.is_accepting(&State::from("q0")));
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::UnknownMachine("busy beaver".to_string());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unknown machine"));
        assert!(error_msg.contains("busy beaver"));
    }
}
