//! The built-in machine library: named constructors for the reference machines.

use crate::machine::TuringMachine;
use crate::table::TransitionTable;
use crate::types::{Program, TuringMachineError};

use crate::types::Direction::{Left, Right, Stay};

const ACCEPT: &str = "qacc";
const REJECT: &str = "qrej";

/// A named, zero-argument machine constructor.
#[derive(Debug, Clone, Copy)]
pub struct MachineEntry {
    pub name: &'static str,
    /// Input alphabet, for display.
    pub alphabet: &'static str,
    pub description: &'static str,
    program: fn() -> Program,
}

impl MachineEntry {
    /// Returns the machine definition.
    pub fn program(&self) -> Program {
        (self.program)()
    }

    /// Builds a fresh machine with an empty tape.
    pub fn build(&self) -> Result<TuringMachine, TuringMachineError> {
        TuringMachine::new(self.program())
    }
}

lazy_static::lazy_static! {
    /// Every machine in the library, in display order.
    pub static ref MACHINES: Vec<MachineEntry> = vec![
        MachineEntry {
            name: ENDS_WITH_ABB,
            alphabet: "{a, b}",
            description: "Accepts strings that end in \"abb\"",
            program: ends_with_abb_program,
        },
        MachineEntry {
            name: EVEN_ONES,
            alphabet: "{0, 1}",
            description: "Accepts binary strings with an even number of 1s",
            program: even_ones_program,
        },
        MachineEntry {
            name: AN_BN,
            alphabet: "{a, b}",
            description: "Accepts a^n b^n for n >= 1",
            program: an_bn_program,
        },
    ];
}

pub const ENDS_WITH_ABB: &str = "Ends with 'abb'";
pub const EVEN_ONES: &str = "Even number of 1s";
pub const AN_BN: &str = "a^n b^n";

/// Scans to the right end, then walks back over the last three symbols.
pub fn ends_with_abb_program() -> Program {
    let rules = TransitionTable::new()
        .with("q0", 'a', 'a', Right, "q0")
        .with("q0", 'b', 'b', Right, "q0")
        .with("q0", '_', '_', Left, "q1")
        .with("q1", 'b', 'b', Left, "q2")
        .with("q1", 'a', 'a', Stay, REJECT)
        .with("q1", '_', '_', Stay, REJECT)
        .with("q2", 'b', 'b', Left, "q3")
        .with("q2", 'a', 'a', Stay, REJECT)
        .with("q2", '_', '_', Stay, REJECT)
        .with("q3", 'a', 'a', Stay, ACCEPT)
        .with("q3", 'b', 'b', Stay, REJECT)
        .with("q3", '_', '_', Stay, REJECT);

    Program::new(ENDS_WITH_ABB, rules, "q0", [ACCEPT]).with_reject([REJECT])
}

/// Two-state parity automaton: `qE` after an even number of 1s, `qO` after an odd one.
pub fn even_ones_program() -> Program {
    let rules = TransitionTable::new()
        .with("qE", '0', '0', Right, "qE")
        .with("qE", '1', '1', Right, "qO")
        .with("qE", '_', '_', Stay, ACCEPT)
        .with("qO", '0', '0', Right, "qO")
        .with("qO", '1', '1', Right, "qE")
        .with("qO", '_', '_', Stay, REJECT);

    Program::new(EVEN_ONES, rules, "qE", [ACCEPT]).with_reject([REJECT])
}

/// Marks one `a` as `X` and the matching `b` as `Y` per pass. Once no `a` is
/// left, `qcheck` verifies that only `Y`s remain before the blank.
pub fn an_bn_program() -> Program {
    let rules = TransitionTable::new()
        .with("q0", 'a', 'X', Right, "q1")
        .with("q0", 'Y', 'Y', Right, "qcheck")
        .with("q0", 'b', 'b', Stay, REJECT)
        .with("q0", '_', '_', Stay, REJECT)
        .with("q1", 'a', 'a', Right, "q1")
        .with("q1", 'Y', 'Y', Right, "q1")
        .with("q1", 'b', 'Y', Left, "q2")
        .with("q1", '_', '_', Stay, REJECT)
        .with("q2", 'a', 'a', Left, "q2")
        .with("q2", 'Y', 'Y', Left, "q2")
        .with("q2", 'X', 'X', Right, "q0")
        .with("qcheck", 'Y', 'Y', Right, "qcheck")
        .with("qcheck", '_', '_', Stay, ACCEPT)
        .with("qcheck", 'a', 'a', Stay, REJECT)
        .with("qcheck", 'b', 'b', Stay, REJECT);

    Program::new(AN_BN, rules, "q0", [ACCEPT]).with_reject([REJECT])
}

/// Builds the "ends with abb" machine.
pub fn ends_with_abb() -> Result<TuringMachine, TuringMachineError> {
    TuringMachine::new(ends_with_abb_program())
}

/// Builds the "even number of 1s" machine.
pub fn even_ones() -> Result<TuringMachine, TuringMachineError> {
    TuringMachine::new(even_ones_program())
}

/// Builds the a^n b^n machine.
pub fn an_bn() -> Result<TuringMachine, TuringMachineError> {
    TuringMachine::new(an_bn_program())
}

/// Lookup helpers over [`MACHINES`].
pub struct MachineLibrary;

impl MachineLibrary {
    /// Get the number of available machines
    pub fn count() -> usize {
        MACHINES.len()
    }

    /// Get a machine entry by its index
    pub fn entry_by_index(index: usize) -> Result<&'static MachineEntry, TuringMachineError> {
        MACHINES.get(index).ok_or_else(|| {
            TuringMachineError::UnknownMachine(format!("index {} out of range", index))
        })
    }

    /// Get a machine entry by its exact name
    pub fn entry_by_name(name: &str) -> Result<&'static MachineEntry, TuringMachineError> {
        MACHINES
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| TuringMachineError::UnknownMachine(name.to_string()))
    }

    /// Build a fresh machine by its index
    pub fn get_by_index(index: usize) -> Result<TuringMachine, TuringMachineError> {
        Self::entry_by_index(index)?.build()
    }

    /// Build a fresh machine by its exact name
    pub fn get_by_name(name: &str) -> Result<TuringMachine, TuringMachineError> {
        Self::entry_by_name(name)?.build()
    }

    /// Resolves a name or a numeric index
    pub fn resolve(query: &str) -> Result<&'static MachineEntry, TuringMachineError> {
        match query.parse::<usize>() {
            Ok(index) => Self::entry_by_index(index),
            Err(_) => Self::entry_by_name(query),
        }
    }

    /// Search for machines whose name contains `query`, ignoring case
    pub fn search(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        MACHINES
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }
}
