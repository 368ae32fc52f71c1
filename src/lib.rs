//! This crate provides the core logic for a table-driven, single-tape Turing machine simulator.
//! It includes modules for loading machine descriptions, checking them against configured
//! limits, running them over input strings, and reporting the results.

pub mod analyzer;
pub mod config;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod report;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the loader limits.
pub use config::Config;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the interpreter entry points from the machine module.
pub use machine::{replay, run, Execution, Tape, TuringMachine};
/// Re-exports the `parse` functions from the parser module.
pub use parser::{parse, parse_with};
/// Re-exports the per-input report types.
pub use report::{HaltKind, Report};
/// Re-exports the machine definition and execution types from the types module.
pub use types::{
    Direction, Halt, MachineDefinition, Program, State, Step, Transition, TransitionEvent,
    TuringMachineError, Verdict, ACCEPT_STATE, BLANK_SYMBOL, DEFAULT_SOURCE, INITIAL_STATE,
    REJECT_STATE,
};
