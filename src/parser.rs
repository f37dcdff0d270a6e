//! This module provides the parser for `.tm` machine definitions, utilizing the `pest` crate.
//! It defines the grammar in `grammar.pest` and functions to turn parsed input into a `Program`.

use crate::{
    table::TransitionTable,
    types::{
        Action, Direction, Program, State, Symbol, TuringMachineError, BLANK_SYMBOL,
        MAX_PROGRAM_SIZE,
    },
    validator::validate,
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Position, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::{BTreeSet, HashSet};

/// Derives a `PestParser` for the definition grammar in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses the given input string into a `Program`.
///
/// This is the main entry point for parsing machine definitions. The parsed
/// program is validated before it is returned, so it can be handed straight to
/// [`TuringMachine::new`](crate::TuringMachine::new).
///
/// # Returns
///
/// * `Ok(Program)` if the input is successfully parsed and validated.
/// * `Err(TuringMachineError::ParseError)` if there are syntax errors, missing or
///   repeated sections, or a `(state, symbol)` pair defined twice.
/// * `Err(TuringMachineError::Validation)` if the program fails validation.
pub fn parse(input: &str) -> Result<Program, TuringMachineError> {
    if input.len() > MAX_PROGRAM_SIZE {
        return Err(TuringMachineError::DefinitionError(format!(
            "Program is {} bytes, the limit is {} bytes",
            input.len(),
            MAX_PROGRAM_SIZE
        )));
    }

    let input = input.trim();
    let mut pairs = MachineParser::parse(Rule::program, input)
        .map_err(|e| TuringMachineError::ParseError(Box::new(e)))?;

    let root = match pairs.next() {
        Some(root) => root,
        None => return Err(parse_error("Empty program", whole_span(input))),
    };

    let program = parse_program(root)?;
    validate(&program)?;

    Ok(program)
}

/// Parses the top-level sections of a definition.
///
/// The start state defaults to the first state that appears in `rules`.
fn parse_program(pair: Pair<Rule>) -> Result<Program, TuringMachineError> {
    let program_span = pair.as_span();
    let mut name: Option<String> = None;
    let mut start: Option<State> = None;
    let mut accept: Option<BTreeSet<State>> = None;
    let mut reject: Option<BTreeSet<State>> = None;
    let mut rules: Option<(TransitionTable, Option<State>)> = None;
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(next_inner(p)?.as_str().trim().to_string()),
            Rule::start => start = Some(State::new(next_inner(p)?.as_str())),
            Rule::accept => accept = Some(parse_states(next_inner(p)?)),
            Rule::reject => reject = Some(parse_states(next_inner(p)?)),
            Rule::rules => rules = Some(parse_transitions(p)?),
            _ => {} // EOI
        }
    }

    let name = check_required_rule(name, "name", program_span)?;
    let (rules, first_state) = check_required_rule(rules, "rules", program_span)?;
    let start = match start.or(first_state) {
        Some(start) => start,
        None => return Err(parse_error("No start state", program_span)),
    };

    Ok(Program {
        name,
        start,
        accept: accept.unwrap_or_default(),
        reject: reject.unwrap_or_default(),
        rules,
    })
}

/// Parses a comma separated list of states.
fn parse_states(pair: Pair<Rule>) -> BTreeSet<State> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::state)
        .map(|p| State::new(p.as_str()))
        .collect()
}

/// Parses the `rules` section into a table, also returning the first source state.
///
/// A `(state, symbol)` pair may only be defined once.
fn parse_transitions(
    pair: Pair<Rule>,
) -> Result<(TransitionTable, Option<State>), TuringMachineError> {
    let mut table = TransitionTable::new();
    let mut first_state = None;

    for transition_pair in pair.into_inner() {
        let span = transition_pair.as_span();
        let mut pairs = transition_pair.into_inner();

        let state = State::new(next_pair(&mut pairs, span)?.as_str());
        let read = parse_symbol(next_pair(&mut pairs, span)?.as_str());
        let write = parse_symbol(next_pair(&mut pairs, span)?.as_str());
        let direction = parse_direction(next_pair(&mut pairs, span)?)?;
        let next = State::new(next_pair(&mut pairs, span)?.as_str());

        if first_state.is_none() {
            first_state = Some(state.clone());
        }

        let action = Action {
            write,
            direction,
            next,
        };

        // Prevent duplicated transition rule
        if table.insert(state.clone(), read, action).is_some() {
            return Err(parse_error(
                &format!("Duplicate transition rule: {state}, {read}"),
                span,
            ));
        }
    }

    Ok((table, first_state))
}

/// Parses a single direction from a `Pair<Rule::direction>`.
///
/// Supports '<' or 'L' for Left, '>' or 'R' for Right, and '-' or 'S' for Stay.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, TuringMachineError> {
    let span = pair.as_span();
    match pair.as_str() {
        "<" | "L" => Ok(Direction::Left),
        ">" | "R" => Ok(Direction::Right),
        "-" | "S" => Ok(Direction::Stay),
        _ => Err(parse_error(
            &format!("Unsupported direction: {}", pair.as_str()),
            span,
        )),
    }
}

/// Parses a single character symbol, handling quoted and unquoted symbols.
fn parse_symbol(input: &str) -> Symbol {
    let unquoted = if input.len() > 1 {
        input.trim_matches('\'')
    } else {
        input
    };

    unquoted.chars().next().unwrap_or(BLANK_SYMBOL)
}

/// Returns the single inner pair of a section.
fn next_inner(pair: Pair<Rule>) -> Result<Pair<Rule>, TuringMachineError> {
    let span = pair.as_span();
    next_pair(&mut pair.into_inner(), span)
}

fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: Span,
) -> Result<Pair<'i, Rule>, TuringMachineError> {
    pairs
        .next()
        .ok_or_else(|| parse_error("Incomplete declaration", span))
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

fn whole_span(input: &str) -> Span<'_> {
    Position::from_start(input).span(&Position::from_start(input))
}

/// Checks that a top-level section is declared at most once.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), TuringMachineError> {
    if !matches!(
        rule,
        Rule::name | Rule::start | Rule::accept | Rule::reject | Rule::rules
    ) {
        return Ok(());
    };

    if !seen.insert(rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks that a required section was declared.
fn check_required_rule<T>(
    value: Option<T>,
    name: &str,
    span: Span,
) -> Result<T, TuringMachineError> {
    value.ok_or_else(|| parse_error(&format!("Missing \"{name}:\" declaration"), span))
}
