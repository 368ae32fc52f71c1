//! This module defines the core data structures and types used throughout the simulator,
//! including the machine definition, transitions, execution outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The blank symbol. It is appended to every alphabet and placed right after the input.
pub const BLANK_SYMBOL: char = ' ';
/// Value of tape cells that were never written (past the trailing blank).
pub const EMPTY_CELL: char = '\0';
/// The state every run starts in.
pub const INITIAL_STATE: State = 1;
/// Reaching this state halts the machine with an accepting verdict.
pub const ACCEPT_STATE: State = 5;
/// Reaching this state halts the machine with a rejecting verdict.
pub const REJECT_STATE: State = 6;
/// Source read by the command-line front end when no path is given.
pub const DEFAULT_SOURCE: &str = "input.txt";

/// Machine states are plain integers.
pub type State = i32;

/// A loaded machine description: the machine itself plus the inputs to run it on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The machine definition shared by every run.
    pub definition: MachineDefinition,
    /// Input strings, in the order they were declared.
    pub inputs: Vec<String>,
}

/// An immutable single-tape machine.
///
/// The initial, accept and reject states are fixed by convention and never read
/// from a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    /// Declared symbols in declaration order, followed by [`BLANK_SYMBOL`].
    pub alphabet: Vec<char>,
    /// Declared number of states. Informational only.
    pub num_states: State,
    /// Transition rules. The first match for a (state, symbol) pair wins.
    pub transitions: Vec<Transition>,
    pub initial_state: State,
    pub accept_state: State,
    pub reject_state: State,
}

impl MachineDefinition {
    /// Creates a definition from a declared alphabet, appending the blank symbol.
    pub fn new(declared: &str, num_states: State, transitions: Vec<Transition>) -> Self {
        let mut alphabet: Vec<char> = Vec::with_capacity(declared.len() + 1);
        for symbol in declared.chars() {
            if !alphabet.contains(&symbol) {
                alphabet.push(symbol);
            }
        }
        if !alphabet.contains(&BLANK_SYMBOL) {
            alphabet.push(BLANK_SYMBOL);
        }

        Self {
            alphabet,
            num_states,
            transitions,
            initial_state: INITIAL_STATE,
            accept_state: ACCEPT_STATE,
            reject_state: REJECT_STATE,
        }
    }

    /// Checks whether `symbol` belongs to the alphabet (blank included).
    pub fn contains_symbol(&self, symbol: char) -> bool {
        self.alphabet.contains(&symbol)
    }

    /// Finds the first transition declared for `state` reading `symbol`.
    pub fn transition(&self, state: State, symbol: char) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.from == state && t.read == symbol)
    }

    /// Checks if `state` is the accept or the reject state.
    pub fn is_final(&self, state: State) -> bool {
        state == self.accept_state || state == self.reject_state
    }
}

/// A single transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state this rule applies to.
    pub from: State,
    /// The symbol that must be under the head.
    pub read: char,
    /// The symbol written over it.
    pub write: char,
    /// Where the head moves after writing.
    pub direction: Direction,
    /// The state the machine moves to.
    pub to: State,
}

/// Head movement. Descriptions spell right as `D` and anything else means left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Decodes a direction field from a description.
    pub fn from_symbol(symbol: char) -> Self {
        if symbol == 'D' {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// The symbol used for this direction in trace output.
    pub fn symbol(self) -> char {
        match self {
            Direction::Right => 'D',
            Direction::Left => 'E',
        }
    }
}

/// A transition that fired during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub state: State,
    pub read: char,
    pub write: char,
    pub direction: Direction,
    pub next_state: State,
}

impl From<&Transition> for TransitionEvent {
    fn from(t: &Transition) -> Self {
        Self {
            state: t.from,
            read: t.read,
            write: t.write,
            direction: t.direction,
            next_state: t.to,
        }
    }
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transition: ({}, {}) -> ({}, {}, {})",
            self.state,
            self.read,
            self.write,
            self.direction.symbol(),
            self.next_state
        )
    }
}

/// Represents the outcome of a single interpreter step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A transition fired and the machine keeps running.
    Continue,
    /// The machine stopped.
    Halt(Halt),
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// The machine entered the accept state.
    Accept,
    /// The machine entered the reject state.
    Reject,
    /// The head landed on a blank cell right after a transition.
    Blank,
    /// The run was aborted by a runtime fault.
    Err(TuringMachineError),
}

impl Halt {
    /// Maps the halt reason to the accept/reject outcome.
    pub fn verdict(&self) -> Verdict {
        match self {
            Halt::Accept | Halt::Blank => Verdict::Accepted,
            Halt::Reject | Halt::Err(_) => Verdict::Rejected,
        }
    }

    /// Returns the fault that aborted the run, if any.
    pub fn error(&self) -> Option<&TuringMachineError> {
        match self {
            Halt::Err(e) => Some(e),
            _ => None,
        }
    }
}

/// Accept/reject outcome of one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => f.write_str("OK"),
            Verdict::Rejected => f.write_str("NAO OK!!"),
        }
    }
}

/// Represents various errors that can occur while loading or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The symbol under the head is not part of the alphabet.
    #[error("unknown symbol {symbol:?} in state {state}")]
    UnknownSymbol { state: State, symbol: char },
    /// No rule is defined for the current state and symbol.
    #[error("no transition found for state {state} and symbol {symbol:?}")]
    UndefinedTransition { state: State, symbol: char },
    /// The head moved past either end of the tape.
    #[error("head position {position} is out of tape bounds (state {state})")]
    TapeBoundary { state: State, position: i64 },
    /// The configured step ceiling was reached before the machine halted.
    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(usize),
    /// An input does not fit on the tape together with its trailing blank.
    #[error("input {input:?} has {length} symbols but the tape holds at most {max}")]
    InputTooLong {
        input: String,
        length: usize,
        max: usize,
    },
    /// Indicates an error during the parsing of a machine description.
    #[error("parse error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The description parsed but exceeds a configured limit.
    #[error("invalid machine description: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading description files.
    #[error("file error: {0}")]
    FileError(String),
}

impl TuringMachineError {
    /// Faults abort a single input; every other error is fatal to the whole run.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            TuringMachineError::UnknownSymbol { .. }
                | TuringMachineError::UndefinedTransition { .. }
                | TuringMachineError::TapeBoundary { .. }
                | TuringMachineError::StepLimitExceeded(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(from: State, read: char, write: char, to: State) -> Transition {
        Transition {
            from,
            read,
            write,
            direction: Direction::Right,
            to,
        }
    }

    #[test]
    fn test_alphabet_gets_blank_appended() {
        let definition = MachineDefinition::new("ab", 6, Vec::new());

        assert_eq!(definition.alphabet, vec!['a', 'b', BLANK_SYMBOL]);
        assert!(definition.contains_symbol(BLANK_SYMBOL));
        assert!(!definition.contains_symbol('c'));
    }

    #[test]
    fn test_alphabet_drops_repeated_symbols() {
        let definition = MachineDefinition::new("abab", 6, Vec::new());
        assert_eq!(definition.alphabet, vec!['a', 'b', BLANK_SYMBOL]);
    }

    #[test]
    fn test_fixed_states() {
        let definition = MachineDefinition::new("a", 42, Vec::new());

        assert_eq!(definition.initial_state, 1);
        assert_eq!(definition.accept_state, 5);
        assert_eq!(definition.reject_state, 6);
        assert!(definition.is_final(5));
        assert!(definition.is_final(6));
        assert!(!definition.is_final(1));
    }

    #[test]
    fn test_first_matching_transition_wins() {
        let definition = MachineDefinition::new(
            "ab",
            6,
            vec![
                transition(1, 'a', 'b', 2),
                transition(1, 'a', 'a', 3),
                transition(2, 'a', 'a', 5),
            ],
        );

        assert_eq!(definition.transition(1, 'a').map(|t| t.to), Some(2));
        assert_eq!(definition.transition(2, 'a').map(|t| t.to), Some(5));
        assert!(definition.transition(1, 'b').is_none());
    }

    #[test]
    fn test_direction_from_symbol() {
        assert_eq!(Direction::from_symbol('D'), Direction::Right);
        assert_eq!(Direction::from_symbol('E'), Direction::Left);
        assert_eq!(Direction::from_symbol('x'), Direction::Left);
        assert_eq!(Direction::from_symbol('d'), Direction::Left);
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_string(&Direction::Right).unwrap();
        assert_eq!(json, "\"Right\"");

        let back: Direction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Direction::Right);
    }

    #[test]
    fn test_transition_event_display() {
        let event = TransitionEvent::from(&Transition {
            from: 1,
            read: 'a',
            write: 'b',
            direction: Direction::Left,
            to: 5,
        });

        assert_eq!(event.to_string(), "Transition: (1, a) -> (b, E, 5)");
    }

    #[test]
    fn test_halt_verdicts() {
        assert_eq!(Halt::Accept.verdict(), Verdict::Accepted);
        assert_eq!(Halt::Blank.verdict(), Verdict::Accepted);
        assert_eq!(Halt::Reject.verdict(), Verdict::Rejected);

        let fault = Halt::Err(TuringMachineError::StepLimitExceeded(3));
        assert_eq!(fault.verdict(), Verdict::Rejected);
        assert!(fault.error().is_some());
        assert!(Halt::Accept.error().is_none());
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Accepted.to_string(), "OK");
        assert_eq!(Verdict::Rejected.to_string(), "NAO OK!!");
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::UndefinedTransition {
            state: 3,
            symbol: 'x',
        };

        let msg = error.to_string();
        assert!(msg.contains("state 3"));
        assert!(msg.contains("'x'"));
        assert!(error.is_fault());
        assert!(!TuringMachineError::FileError("gone".into()).is_fault());
    }
}
