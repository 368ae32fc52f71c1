//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//!
//! A description is a flat sequence of whitespace separated tokens read in a fixed order:
//!
//! ```text
//! <alphabet>
//! <number of states>
//! <number of transitions>
//! <from> <read> <write> <direction> <to>    (once per transition)
//! <number of inputs>
//! <input>                                   (once per input)
//! ```
//!
//! The grammar splits tokens; the count-driven structure is read by a token cursor, which
//! validates every field as it goes and reports errors with the token's location.

use crate::{
    analyzer::analyze,
    config::Config,
    types::{Direction, MachineDefinition, Program, State, Transition, TuringMachineError},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Position, Span,
};
use pest_derive::Parser as PestParser;
use tracing::{debug, warn};

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses a machine description using the default [`Config`] limits.
pub fn parse(input: &str) -> Result<Program, TuringMachineError> {
    parse_with(input, &Config::default())
}

/// Parses a machine description and checks it against `config`.
///
/// # Returns
///
/// * `Ok(Program)` if the input is successfully parsed and fits the configured limits.
/// * `Err(TuringMachineError::ParseError)` if a field is missing or malformed.
/// * `Err(TuringMachineError::ValidationError)` if the machine exceeds a limit.
pub fn parse_with(input: &str, config: &Config) -> Result<Program, TuringMachineError> {
    let root = MachineParser::parse(Rule::source, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("empty description".to_string()))?;

    let program = parse_program(root, config)?;

    analyze(&program, config)?;

    Ok(program)
}

/// Reads the description fields in order from the token stream.
fn parse_program(root: Pair<Rule>, config: &Config) -> Result<Program, TuringMachineError> {
    let mut tokens = Tokens::new(root);

    let declared = tokens.word("alphabet")?;
    let num_states = tokens.state("number of states")?;

    let count = tokens.count("transitions", config.max_transitions)?;
    let transitions = (0..count)
        .map(|_| parse_transition(&mut tokens))
        .collect::<Result<Vec<_>, _>>()?;

    let count = tokens.count("inputs", config.max_inputs)?;
    let inputs = (0..count)
        .map(|_| tokens.word("input").map(String::from))
        .collect::<Result<Vec<_>, _>>()?;

    let trailing = tokens.remaining();
    if trailing > 0 {
        warn!(tokens = trailing, "ignoring tokens after the last input");
    }

    let definition = MachineDefinition::new(declared, num_states, transitions);
    debug!(
        symbols = definition.alphabet.len(),
        states = definition.num_states,
        transitions = definition.transitions.len(),
        inputs = inputs.len(),
        "parsed machine description"
    );

    Ok(Program { definition, inputs })
}

/// Parses one `<from> <read> <write> <direction> <to>` record.
fn parse_transition(tokens: &mut Tokens) -> Result<Transition, TuringMachineError> {
    let from = tokens.state("source state")?;
    let read = tokens.symbol("read symbol")?;
    let write = tokens.symbol("write symbol")?;
    let direction = Direction::from_symbol(tokens.symbol("direction")?);
    let to = tokens.state("target state")?;

    Ok(Transition {
        from,
        read,
        write,
        direction,
        to,
    })
}

/// Cursor over the tokens of a parsed description.
struct Tokens<'i> {
    pairs: Pairs<'i, Rule>,
    end: Position<'i>,
}

impl<'i> Tokens<'i> {
    fn new(root: Pair<'i, Rule>) -> Self {
        let end = root.as_span().end_pos();
        Self {
            pairs: root.into_inner(),
            end,
        }
    }

    /// Takes the next token, or fails at the end of the input naming the missing field.
    fn next(&mut self, field: &str) -> Result<Pair<'i, Rule>, TuringMachineError> {
        match self.pairs.find(|p| p.as_rule() == Rule::token) {
            Some(pair) => Ok(pair),
            None => Err(parse_error_at(
                &format!("expected {field}, found end of input"),
                self.end.clone(),
            )),
        }
    }

    fn word(&mut self, field: &str) -> Result<&'i str, TuringMachineError> {
        Ok(self.next(field)?.as_str())
    }

    fn state(&mut self, field: &str) -> Result<State, TuringMachineError> {
        let pair = self.next(field)?;
        pair.as_str().parse::<State>().map_err(|_| {
            parse_error(
                &format!("expected an integer {field}, found \"{}\"", pair.as_str()),
                pair.as_span(),
            )
        })
    }

    /// Reads a non-negative count of `what` and checks it against `max`.
    fn count(&mut self, what: &str, max: usize) -> Result<usize, TuringMachineError> {
        let pair = self.next(&format!("number of {what}"))?;
        let span = pair.as_span();
        let value = pair.as_str().parse::<i64>().map_err(|_| {
            parse_error(
                &format!("expected number of {what}, found \"{}\"", pair.as_str()),
                span,
            )
        })?;

        let count = usize::try_from(value).map_err(|_| {
            parse_error(&format!("number of {what} must not be negative"), span)
        })?;

        if count > max {
            return Err(parse_error(
                &format!("too many {what}: {count} declared, at most {max} allowed"),
                span,
            ));
        }

        Ok(count)
    }

    fn symbol(&mut self, field: &str) -> Result<char, TuringMachineError> {
        let pair = self.next(field)?;
        let mut chars = pair.as_str().chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Ok(symbol),
            _ => Err(parse_error(
                &format!(
                    "expected a single character {field}, found \"{}\"",
                    pair.as_str()
                ),
                pair.as_span(),
            )),
        }
    }

    /// Number of tokens left unread.
    fn remaining(self) -> usize {
        self.pairs.filter(|p| p.as_rule() == Rule::token).count()
    }
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Position`.
fn parse_error_at(msg: &str, pos: Position) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_pos(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        pos,
    )))
}
