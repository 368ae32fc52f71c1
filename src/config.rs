//! Limits applied while loading and running machines.
//!
//! The defaults reproduce the sizing the description format was designed around.
//! Front ends override individual fields; everything else falls back to [`Config::default`].

use serde::{Deserialize, Serialize};

/// Number of cells on every tape.
pub const DEFAULT_TAPE_SIZE: usize = 100;
/// Maximum alphabet size, blank symbol included.
pub const DEFAULT_MAX_SYMBOLS: usize = 10;
/// Maximum number of transition rules per machine.
pub const DEFAULT_MAX_TRANSITIONS: usize = 20;
/// Maximum number of input strings per description.
pub const DEFAULT_MAX_INPUTS: usize = 10;

/// Loader and interpreter limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tape capacity in cells. Inputs may use all but the last one.
    pub tape_size: usize,
    /// Maximum alphabet size, blank included.
    pub max_symbols: usize,
    /// Maximum number of transitions.
    pub max_transitions: usize,
    /// Maximum number of inputs.
    pub max_inputs: usize,
    /// Optional ceiling on transitions per input. `None` runs until the machine halts.
    pub max_steps: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            max_symbols: DEFAULT_MAX_SYMBOLS,
            max_transitions: DEFAULT_MAX_TRANSITIONS,
            max_inputs: DEFAULT_MAX_INPUTS,
            max_steps: None,
        }
    }
}

impl Config {
    /// Longest input that fits on the tape with its trailing blank.
    pub fn max_input_len(&self) -> usize {
        self.tape_size.saturating_sub(1)
    }

    /// Returns a copy with the given step ceiling.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.tape_size, 100);
        assert_eq!(config.max_symbols, 10);
        assert_eq!(config.max_transitions, 20);
        assert_eq!(config.max_inputs, 10);
        assert_eq!(config.max_steps, None);
        assert_eq!(config.max_input_len(), 99);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"max_steps": 500}"#).unwrap();

        assert_eq!(config.max_steps, Some(500));
        assert_eq!(config.tape_size, DEFAULT_TAPE_SIZE);
    }

    #[test]
    fn test_with_max_steps() {
        let config = Config::default().with_max_steps(Some(7));
        assert_eq!(config.max_steps, Some(7));
    }
}
