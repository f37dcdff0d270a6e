//! This crate provides a deterministic single-tape Turing machine engine.
//! It includes modules for defining transition tables, validating and parsing machine
//! definitions, stepping machines through their configurations, and a small library
//! of reference machines.

pub mod driver;
pub mod library;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod table;
pub mod tape;
pub mod types;
pub mod validator;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the driver types.
pub use driver::{Driver, DriverConfig, RunReport};
/// Re-exports the machine library.
pub use library::{MachineEntry, MachineLibrary, MACHINES};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
pub use table::TransitionTable;
pub use tape::Tape;
/// Re-exports the types used to define and observe machines.
pub use types::{
    Action, Configuration, Direction, Outcome, Program, State, Status, Symbol, Transition,
    TuringMachineError, BLANK_SYMBOL, MAX_EXECUTION_STEPS, MAX_PROGRAM_SIZE,
};
/// Re-exports the validation entry points.
pub use validator::{check_input, validate, AnalysisError};
