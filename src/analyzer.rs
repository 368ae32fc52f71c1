//! This module provides load-time checks for machine descriptions.
//!
//! Only what the interpreter needs is enforced: alphabet and input sizes must fit the
//! configured limits. Suspicious but runnable definitions are reported through `tracing`
//! and otherwise accepted, since the interpreter surfaces them as runtime faults.

use crate::config::Config;
use crate::types::{Program, TuringMachineError};
use std::collections::HashSet;
use tracing::warn;

/// Represents the errors that can be found during the analysis of a description.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The alphabet, blank included, is larger than allowed.
    TooManySymbols { count: usize, max: usize },
    /// An input string leaves no room for the trailing blank.
    InputTooLong {
        index: usize,
        length: usize,
        max: usize,
    },
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::TooManySymbols { count, max } => TuringMachineError::ValidationError(
                format!("too many symbols: {count} including the blank, at most {max} allowed"),
            ),
            AnalysisError::InputTooLong { index, length, max } => {
                TuringMachineError::ValidationError(format!(
                    "input {} is too long: {length} symbols, at most {max} allowed",
                    index + 1
                ))
            }
        }
    }
}

/// Analyzes a parsed `Program` against the configured limits.
///
/// # Returns
///
/// * `Ok(())` if the program fits.
/// * `Err(TuringMachineError::ValidationError)` describing the first violated limit.
pub fn analyze(program: &Program, config: &Config) -> Result<(), TuringMachineError> {
    let errors = [check_alphabet, check_inputs]
        .iter()
        .filter_map(|f| f(program, config).err())
        .collect::<Vec<_>>();

    if let Some(first_error) = errors.into_iter().next() {
        return Err(first_error.into());
    }

    warn_foreign_symbols(program);
    warn_shadowed_transitions(program);

    Ok(())
}

/// Checks the alphabet size, blank included.
fn check_alphabet(program: &Program, config: &Config) -> Result<(), AnalysisError> {
    let count = program.definition.alphabet.len();
    if count > config.max_symbols {
        return Err(AnalysisError::TooManySymbols {
            count,
            max: config.max_symbols,
        });
    }

    Ok(())
}

/// Checks that every input fits on the tape followed by one blank cell.
fn check_inputs(program: &Program, config: &Config) -> Result<(), AnalysisError> {
    let max = config.max_input_len();
    for (index, input) in program.inputs.iter().enumerate() {
        let length = input.chars().count();
        if length > max {
            return Err(AnalysisError::InputTooLong { index, length, max });
        }
    }

    Ok(())
}

/// Reports transitions that read or write symbols outside the alphabet.
fn warn_foreign_symbols(program: &Program) {
    let definition = &program.definition;
    for (index, t) in definition.transitions.iter().enumerate() {
        for symbol in [t.read, t.write] {
            if !definition.contains_symbol(symbol) {
                warn!(
                    transition = index + 1,
                    state = t.from,
                    symbol = %symbol,
                    "transition uses a symbol outside the alphabet"
                );
            }
        }
    }
}

/// Reports transitions that can never fire because an earlier one has the same key.
fn warn_shadowed_transitions(program: &Program) {
    let mut seen = HashSet::new();
    for (index, t) in program.definition.transitions.iter().enumerate() {
        if !seen.insert((t.from, t.read)) {
            warn!(
                transition = index + 1,
                state = t.from,
                symbol = %t.read,
                "transition is shadowed by an earlier one for the same state and symbol"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, MachineDefinition, Transition};

    fn program(alphabet: &str, inputs: &[&str]) -> Program {
        Program {
            definition: MachineDefinition::new(
                alphabet,
                6,
                vec![Transition {
                    from: 1,
                    read: 'a',
                    write: 'a',
                    direction: Direction::Right,
                    to: 5,
                }],
            ),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_program() {
        assert!(analyze(&program("ab", &["ab", "ba"]), &Config::default()).is_ok());
    }

    #[test]
    fn test_alphabet_at_limit() {
        // Nine declared symbols plus the blank.
        let p = program("abcdefghi", &[]);
        assert!(analyze(&p, &Config::default()).is_ok());
    }

    #[test]
    fn test_alphabet_over_limit() {
        let p = program("abcdefghij", &[]);
        assert_eq!(
            check_alphabet(&p, &Config::default()),
            Err(AnalysisError::TooManySymbols { count: 11, max: 10 })
        );

        let result = analyze(&p, &Config::default());
        match result {
            Err(TuringMachineError::ValidationError(msg)) => {
                assert!(msg.contains("too many symbols"));
            }
            other => panic!("Expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_input_length_limit() {
        let fits = "a".repeat(99);
        let too_long = "a".repeat(100);

        assert!(check_inputs(&program("a", &[&fits]), &Config::default()).is_ok());
        assert_eq!(
            check_inputs(&program("a", &["a", &too_long]), &Config::default()),
            Err(AnalysisError::InputTooLong {
                index: 1,
                length: 100,
                max: 99
            })
        );
    }

    #[test]
    fn test_foreign_and_shadowed_transitions_are_not_errors() {
        let mut p = program("a", &["a"]);
        p.definition.transitions.push(Transition {
            from: 1,
            read: 'a',
            write: 'z',
            direction: Direction::Left,
            to: 6,
        });

        assert!(analyze(&p, &Config::default()).is_ok());
    }
}
