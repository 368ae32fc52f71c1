//! This module defines the `TuringMachine` struct, which runs a [`MachineDefinition`] against
//! one input on a bounded tape. It handles transition lookup, tape writes, head movement and
//! the halting rules.
//!
//! Every step checks, in order: the accept and reject states, the optional step ceiling,
//! the symbol under the head, and the transition table. After a transition fires the head
//! position is bounds checked, and a blank under the head accepts immediately, whatever the
//! current state.

use crate::config::Config;
use crate::types::{
    Direction, Halt, MachineDefinition, State, Step, TransitionEvent, TuringMachineError,
    Verdict, BLANK_SYMBOL, EMPTY_CELL, INITIAL_STATE,
};
use tracing::{debug, trace};

/// A fixed-capacity tape.
///
/// The input is copied to the start of the tape and followed by one blank cell. The
/// remaining cells hold [`EMPTY_CELL`], which is not part of any alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<char>,
}

impl Tape {
    /// Creates a tape of `capacity` cells holding `input` and its trailing blank.
    pub fn new(input: &str, capacity: usize) -> Result<Self, TuringMachineError> {
        let length = input.chars().count();
        if length >= capacity {
            return Err(TuringMachineError::InputTooLong {
                input: input.to_string(),
                length,
                max: capacity.saturating_sub(1),
            });
        }

        let mut cells = vec![EMPTY_CELL; capacity];
        for (cell, symbol) in cells.iter_mut().zip(input.chars()) {
            *cell = symbol;
        }
        cells[length] = BLANK_SYMBOL;

        Ok(Self { cells })
    }

    /// Returns the symbol at `position`, or [`EMPTY_CELL`] past the end.
    pub fn read(&self, position: usize) -> char {
        self.cells.get(position).copied().unwrap_or(EMPTY_CELL)
    }

    /// Writes `symbol` at `position`. Writes past the end are ignored.
    pub fn write(&mut self, position: usize, symbol: char) {
        if let Some(cell) = self.cells.get_mut(position) {
            *cell = symbol;
        }
    }

    /// Number of cells.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// The written part of the tape, up to the first empty cell.
    pub fn contents(&self) -> String {
        self.cells.iter().take_while(|&&c| c != EMPTY_CELL).collect()
    }
}

/// Computes the head position after a move, or the attempted position if it leaves the tape.
fn move_head(head: usize, direction: Direction, capacity: usize) -> Result<usize, i64> {
    let next = match direction {
        Direction::Right => head.checked_add(1),
        Direction::Left => head.checked_sub(1),
    };

    match next.filter(|&p| p < capacity) {
        Some(position) => Ok(position),
        None => Err(match direction {
            Direction::Right => i64::try_from(head).map_or(i64::MAX, |h| h.saturating_add(1)),
            Direction::Left => -1,
        }),
    }
}

/// Represents one run of a machine over one input.
///
/// The definition is borrowed and never modified; the tape and execution state belong to
/// this run only.
#[derive(Debug)]
pub struct TuringMachine<'a> {
    definition: &'a MachineDefinition,
    tape: Tape,
    state: State,
    head: usize,
    max_steps: Option<usize>,
    trace: Vec<TransitionEvent>,
    halt: Option<Halt>,
}

impl<'a> TuringMachine<'a> {
    /// Prepares a run of `definition` over `input`.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InputTooLong)` if the input and its blank do not fit the tape.
    pub fn new(
        definition: &'a MachineDefinition,
        input: &str,
        config: &Config,
    ) -> Result<Self, TuringMachineError> {
        Ok(Self {
            definition,
            tape: Tape::new(input, config.tape_size)?,
            state: definition.initial_state,
            head: 0,
            max_steps: config.max_steps,
            trace: Vec::new(),
            halt: None,
        })
    }

    /// Executes a single step of the machine.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition fired and the machine can keep going.
    /// * `Step::Halt(_)` once the machine has stopped. Further calls return the same halt.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = &self.halt {
            return Step::Halt(halt.clone());
        }

        let halt = match self.advance() {
            Ok(None) => return Step::Continue,
            Ok(Some(halt)) => halt,
            Err(e) => Halt::Err(e),
        };

        debug!(
            state = self.state,
            head = self.head,
            steps = self.trace.len(),
            verdict = %halt.verdict(),
            "machine halted"
        );

        self.halt = Some(halt.clone());
        Step::Halt(halt)
    }

    fn advance(&mut self) -> Result<Option<Halt>, TuringMachineError> {
        if self.state == self.definition.accept_state {
            return Ok(Some(Halt::Accept));
        }
        if self.state == self.definition.reject_state {
            return Ok(Some(Halt::Reject));
        }

        if let Some(max) = self.max_steps {
            if self.trace.len() >= max {
                return Err(TuringMachineError::StepLimitExceeded(max));
            }
        }

        let symbol = self.tape.read(self.head);
        if !self.definition.contains_symbol(symbol) {
            return Err(TuringMachineError::UnknownSymbol {
                state: self.state,
                symbol,
            });
        }

        let transition = *self.definition.transition(self.state, symbol).ok_or(
            TuringMachineError::UndefinedTransition {
                state: self.state,
                symbol,
            },
        )?;

        trace!(state = self.state, head = self.head, symbol = %symbol, "applying transition");

        self.tape.write(self.head, transition.write);
        self.state = transition.to;
        self.trace.push(TransitionEvent::from(&transition));

        self.head = move_head(self.head, transition.direction, self.tape.capacity()).map_err(
            |position| TuringMachineError::TapeBoundary {
                state: self.state,
                position,
            },
        )?;

        if self.tape.read(self.head) == BLANK_SYMBOL {
            return Ok(Some(Halt::Blank));
        }

        Ok(None)
    }

    /// Runs the machine until it halts.
    ///
    /// Without a step ceiling in the [`Config`], a machine that cycles forever never returns.
    pub fn run(&mut self) -> Halt {
        self.run_with(|_| {})
    }

    /// Runs the machine until it halts, calling `on_transition` for every transition as it fires.
    pub fn run_with<F>(&mut self, mut on_transition: F) -> Halt
    where
        F: FnMut(&TransitionEvent),
    {
        loop {
            let fired = self.trace.len();
            let step = self.step();

            for event in &self.trace[fired..] {
                on_transition(event);
            }

            if let Step::Halt(halt) = step {
                return halt;
            }
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the head position.
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the transitions taken so far, in order.
    pub fn trace(&self) -> &[TransitionEvent] {
        &self.trace
    }

    /// Returns the total number of transitions executed.
    pub fn step_count(&self) -> usize {
        self.trace.len()
    }

    /// Returns the halt reason once the machine has stopped.
    pub fn halt(&self) -> Option<&Halt> {
        self.halt.as_ref()
    }
}

/// The result of running one input to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub halt: Halt,
    pub trace: Vec<TransitionEvent>,
    pub tape: Tape,
    pub state: State,
    pub head: usize,
}

impl Execution {
    pub fn verdict(&self) -> Verdict {
        self.halt.verdict()
    }
}

/// Runs `definition` over `input` on a fresh tape.
pub fn run(
    definition: &MachineDefinition,
    input: &str,
    config: &Config,
) -> Result<Execution, TuringMachineError> {
    let mut machine = TuringMachine::new(definition, input, config)?;
    let halt = machine.run();

    Ok(Execution {
        halt,
        trace: machine.trace,
        tape: machine.tape,
        state: machine.state,
        head: machine.head,
    })
}

/// Re-applies a recorded trace to a fresh tape holding `input` and returns the final tape.
///
/// Fails with a `ValidationError` if an event does not match the state or the symbol under
/// the head at that point.
pub fn replay(
    input: &str,
    events: &[TransitionEvent],
    config: &Config,
) -> Result<Tape, TuringMachineError> {
    let mut tape = Tape::new(input, config.tape_size)?;
    let mut state = INITIAL_STATE;
    let mut head = 0;

    for (index, event) in events.iter().enumerate() {
        let symbol = tape.read(head);
        if event.state != state || event.read != symbol {
            return Err(TuringMachineError::ValidationError(format!(
                "trace step {} expects ({}, {:?}) but the machine is at ({}, {:?})",
                index + 1,
                event.state,
                event.read,
                state,
                symbol
            )));
        }

        tape.write(head, event.write);
        state = event.next_state;
        head = move_head(head, event.direction, tape.capacity())
            .map_err(|position| TuringMachineError::TapeBoundary { state, position })?;
    }

    Ok(tape)
}
