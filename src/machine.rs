//! This module defines the `TuringMachine` struct, the deterministic single-tape engine.
//! It owns the tape and the current configuration, shares a read-only program, and
//! advances one transition per call to [`TuringMachine::step`].

use std::sync::Arc;

use tracing::{debug, trace};

use crate::tape::Tape;
use crate::types::{
    Configuration, Outcome, Program, State, Status, Symbol, TuringMachineError,
};
use crate::validator::validate;

/// Represents a single-tape Turing Machine.
///
/// The machine never loops on its own: callers drive it by calling
/// [`step`](Self::step) and read the configuration in between.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    program: Arc<Program>,
    state: State,
    tape: Tape,
    halted: bool,
    outcome: Option<Outcome>,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` from a given `Program`.
    ///
    /// The program is validated first; see [`validate`] for the checks.
    /// The machine starts with a single blank cell on its tape.
    pub fn new(program: Program) -> Result<Self, TuringMachineError> {
        Self::from_shared(Arc::new(program))
    }

    /// Creates a machine that shares `program` with other machines.
    pub fn from_shared(program: Arc<Program>) -> Result<Self, TuringMachineError> {
        validate(&program)?;

        Ok(Self {
            state: program.start.clone(),
            program,
            tape: Tape::new(Vec::new()),
            halted: false,
            outcome: None,
            step_count: 0,
        })
    }

    /// Replaces the tape with `symbols` and returns the machine to its start
    /// configuration. An empty sequence yields a single blank cell.
    pub fn reset<I>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = Symbol>,
    {
        self.tape = Tape::new(symbols);
        self.state = self.program.start.clone();
        self.halted = false;
        self.outcome = None;
        self.step_count = 0;
    }

    /// Resets the machine with one tape cell per character of `input`.
    pub fn load(&mut self, input: &str) {
        self.reset(input.chars());
    }

    /// Executes a single step of the computation.
    ///
    /// Halting states are checked before the table is consulted, so a machine
    /// halts on the call after it enters an accepting or rejecting state,
    /// regardless of the symbol under the head. A `(state, symbol)` pair with
    /// no rule halts the machine with a rejecting outcome.
    ///
    /// # Returns
    ///
    /// * `Status::Running` if a transition was applied.
    /// * `Status::Accept` / `Status::Reject` if the machine halted during this call.
    /// * `Status::Halt` if the machine had already halted; nothing is changed.
    pub fn step(&mut self) -> Status {
        if self.halted {
            return Status::Halt;
        }

        if self.program.is_accepting(&self.state) {
            return self.halt(Outcome::Accepted);
        }

        if self.program.is_rejecting(&self.state) {
            return self.halt(Outcome::Rejected);
        }

        let symbol = self.tape.read();
        let action = match self.program.rules.get(&self.state, symbol) {
            Some(action) => action.clone(),
            None => {
                debug!(state = %self.state, symbol = %symbol, "no transition defined");
                return self.halt(Outcome::Rejected);
            }
        };

        trace!(
            step = self.step_count,
            state = %self.state,
            symbol = %symbol,
            head = self.tape.head(),
            write = %action.write,
            direction = %action.direction,
            next = %action.next,
            "applying transition"
        );

        self.tape.write(action.write);
        self.tape.shift(action.direction);
        self.state = action.next;
        self.step_count += 1;

        Status::Running
    }

    fn halt(&mut self, outcome: Outcome) -> Status {
        debug!(state = %self.state, steps = self.step_count, %outcome, "machine halted");

        self.halted = true;
        self.outcome = Some(outcome);

        match outcome {
            Outcome::Accepted => Status::Accept,
            _ => Status::Reject,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the head position. The cell under the head is always materialized.
    pub fn head(&self) -> usize {
        self.tape.head()
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Symbol {
        self.tape.current()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Returns the outcome, or `None` while the machine is still running.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Returns the number of transitions applied since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the program this machine runs.
    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    /// Captures the current configuration.
    pub fn snapshot(&self) -> Configuration {
        Configuration {
            state: self.state.clone(),
            tape: self.tape.contents(),
            head: self.tape.head(),
            halted: self.halted,
            outcome: self.outcome,
            steps: self.step_count,
        }
    }
}
