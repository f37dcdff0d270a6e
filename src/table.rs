//! The transition table: a deterministic mapping from `(state, symbol)` pairs to actions.

use crate::types::{Action, Direction, State, Symbol, Transition, TuringMachineError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A deterministic transition table.
///
/// Pairs that are not present are meaningful: a machine that reaches one halts
/// with a rejecting outcome. The table serializes as a list of [`Transition`]s
/// sorted by state and symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Transition>", into = "Vec<Transition>")]
pub struct TransitionTable {
    rules: HashMap<(State, Symbol), Action>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule and returns the table, for building tables inline.
    ///
    /// A later rule for the same `(state, read)` pair replaces the earlier one.
    pub fn with(
        mut self,
        state: &str,
        read: Symbol,
        write: Symbol,
        direction: Direction,
        next: &str,
    ) -> Self {
        self.insert(
            State::new(state),
            read,
            Action {
                write,
                direction,
                next: State::new(next),
            },
        );
        self
    }

    /// Inserts a rule, returning the action it replaced if the pair was already defined.
    pub fn insert(&mut self, state: State, read: Symbol, action: Action) -> Option<Action> {
        self.rules.insert((state, read), action)
    }

    /// Looks up the action for `state` reading `symbol`.
    pub fn get(&self, state: &State, symbol: Symbol) -> Option<&Action> {
        self.rules.get(&(state.clone(), symbol))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// States that have at least one outgoing rule, in sorted order.
    pub fn source_states(&self) -> BTreeSet<State> {
        self.rules.keys().map(|(state, _)| state.clone()).collect()
    }

    /// Every symbol the table reads or writes, in sorted order.
    pub fn alphabet(&self) -> BTreeSet<Symbol> {
        self.rules
            .iter()
            .flat_map(|((_, read), action)| [*read, action.write])
            .collect()
    }

    /// Iterates over the rules leaving `state`.
    pub fn rules_from<'a>(
        &'a self,
        state: &'a State,
    ) -> impl Iterator<Item = (Symbol, &'a Action)> + 'a {
        self.rules
            .iter()
            .filter(move |((source, _), _)| source == state)
            .map(|((_, read), action)| (*read, action))
    }

    /// Returns every rule in flat form, sorted by state and then by symbol.
    pub fn transitions(&self) -> Vec<Transition> {
        let mut transitions: Vec<Transition> = self
            .rules
            .iter()
            .map(|((state, read), action)| Transition {
                state: state.clone(),
                read: *read,
                write: action.write,
                direction: action.direction,
                next: action.next.clone(),
            })
            .collect();

        transitions.sort_by(|a, b| (&a.state, a.read).cmp(&(&b.state, b.read)));
        transitions
    }
}

impl TryFrom<Vec<Transition>> for TransitionTable {
    type Error = TuringMachineError;

    /// Builds a table from flat rules, refusing duplicated `(state, read)` pairs.
    fn try_from(transitions: Vec<Transition>) -> Result<Self, Self::Error> {
        let mut table = TransitionTable::new();

        for t in transitions {
            let action = Action {
                write: t.write,
                direction: t.direction,
                next: t.next,
            };

            if table.insert(t.state.clone(), t.read, action).is_some() {
                return Err(TuringMachineError::DefinitionError(format!(
                    "Duplicate transition rule for state {} reading '{}'",
                    t.state, t.read
                )));
            }
        }

        Ok(table)
    }
}

impl From<TransitionTable> for Vec<Transition> {
    fn from(table: TransitionTable) -> Self {
        table.transitions()
    }
}
