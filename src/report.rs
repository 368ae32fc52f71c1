//! Per-input results as printed by front ends.
//!
//! Text output is one line per transition, an `Error:` line when a fault aborted the run,
//! and a summary line `<index>: <input> <OK|NAO OK!!>`. The same data serializes to JSON.

use crate::machine::Execution;
use crate::types::{Halt, TransitionEvent, TuringMachineError, Verdict};
use serde::Serialize;

/// How a run ended, without the fault details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltKind {
    AcceptState,
    RejectState,
    Blank,
    Fault,
}

impl From<&Halt> for HaltKind {
    fn from(halt: &Halt) -> Self {
        match halt {
            Halt::Accept => HaltKind::AcceptState,
            Halt::Reject => HaltKind::RejectState,
            Halt::Blank => HaltKind::Blank,
            Halt::Err(_) => HaltKind::Fault,
        }
    }
}

/// The outcome of one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// 1-based position of the input in the description.
    pub index: usize,
    pub input: String,
    pub verdict: Verdict,
    pub halt: HaltKind,
    /// Diagnostic of the fault that aborted the run.
    pub diagnostic: Option<String>,
    pub transitions: Vec<TransitionEvent>,
}

impl Report {
    pub fn new(index: usize, input: &str, halt: &Halt, transitions: Vec<TransitionEvent>) -> Self {
        Self {
            index,
            input: input.to_string(),
            verdict: halt.verdict(),
            halt: HaltKind::from(halt),
            diagnostic: halt.error().map(ToString::to_string),
            transitions,
        }
    }

    pub fn from_execution(index: usize, input: &str, execution: Execution) -> Self {
        Self::new(index, input, &execution.halt, execution.trace)
    }

    /// A rejected report for an input that could not be run at all.
    pub fn failed(index: usize, input: &str, error: &TuringMachineError) -> Self {
        Self {
            index,
            input: input.to_string(),
            verdict: Verdict::Rejected,
            halt: HaltKind::Fault,
            diagnostic: Some(error.to_string()),
            transitions: Vec::new(),
        }
    }

    /// The `Error:` line, if a fault aborted the run.
    pub fn diagnostic_line(&self) -> Option<String> {
        self.diagnostic.as_ref().map(|d| format!("Error: {d}"))
    }

    pub fn summary(&self) -> String {
        format!("{}: {} {}", self.index, self.input, self.verdict)
    }

    /// All text lines for this input, in output order.
    pub fn lines(&self) -> Vec<String> {
        self.transitions
            .iter()
            .map(ToString::to_string)
            .chain(self.diagnostic_line())
            .chain(std::iter::once(self.summary()))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
