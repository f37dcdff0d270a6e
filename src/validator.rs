//! This module provides construction-time checks for machine definitions. A program
//! that passes them can be stepped without any further validation: every remaining
//! runtime condition is expressed as a step status.

use crate::types::{Program, State, BLANK_SYMBOL};
use std::collections::BTreeSet;
use thiserror::Error;

/// Represents the problems that can be found in a machine definition.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum AnalysisError {
    /// The transition table defines no rules at all.
    #[error("Transition table is empty")]
    EmptyTable,
    /// Some states are declared both accepting and rejecting.
    #[error("States are both accepting and rejecting: {0:?}")]
    ConflictingHaltStates(Vec<String>),
    /// The start state has no outgoing rules and is not a halting state.
    #[error("Undefined start state: {0}")]
    UndefinedStartState(String),
    /// States with outgoing rules that can never be entered from the start state.
    #[error("Unreachable states detected: {0:?}")]
    UnreachableStates(Vec<String>),
    /// User input contains the blank symbol at the given index.
    #[error("Input contains the blank symbol '_' at index {0}")]
    BlankInInput(usize),
}

/// Validates a program before it is turned into a machine.
///
/// The checks run in order and the first failure is returned:
/// an empty table, overlapping accepting and rejecting sets, an undefined
/// start state, and finally states that cannot be reached from the start.
pub fn validate(program: &Program) -> Result<(), AnalysisError> {
    [
        check_nonempty_table,
        check_disjoint_halt_states,
        check_start_state,
        check_unreachable_states,
    ]
    .iter()
    .try_for_each(|check| check(program))
}

/// Checks that an input string can be loaded onto a tape.
pub fn check_input(input: &str) -> Result<(), AnalysisError> {
    match input.chars().position(|c| c == BLANK_SYMBOL) {
        Some(index) => Err(AnalysisError::BlankInInput(index)),
        None => Ok(()),
    }
}

fn check_nonempty_table(program: &Program) -> Result<(), AnalysisError> {
    if program.rules.is_empty() {
        return Err(AnalysisError::EmptyTable);
    }

    Ok(())
}

fn check_disjoint_halt_states(program: &Program) -> Result<(), AnalysisError> {
    let conflicting: Vec<String> = program
        .accept
        .intersection(&program.reject)
        .map(|state| state.to_string())
        .collect();

    if !conflicting.is_empty() {
        return Err(AnalysisError::ConflictingHaltStates(conflicting));
    }

    Ok(())
}

fn check_start_state(program: &Program) -> Result<(), AnalysisError> {
    let start = &program.start;
    let defined = program.rules.source_states().contains(start)
        || program.is_accepting(start)
        || program.is_rejecting(start);

    if !defined {
        return Err(AnalysisError::UndefinedStartState(start.to_string()));
    }

    Ok(())
}

/// Performs a depth-first walk from the start state over every rule's next
/// state and reports the source states it never visits.
fn check_unreachable_states(program: &Program) -> Result<(), AnalysisError> {
    let mut visited: BTreeSet<State> = BTreeSet::new();
    let mut stack = vec![program.start.clone()];

    while let Some(state) = stack.pop() {
        if !visited.insert(state.clone()) {
            continue;
        }

        // Halting states never consult the table.
        if program.is_accepting(&state) || program.is_rejecting(&state) {
            continue;
        }

        for (_, action) in program.rules.rules_from(&state) {
            if !visited.contains(&action.next) {
                stack.push(action.next.clone());
            }
        }
    }

    let unreachable: Vec<String> = program
        .rules
        .source_states()
        .difference(&visited)
        .map(|state| state.to_string())
        .collect();

    if !unreachable.is_empty() {
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}
