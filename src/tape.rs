//! A single tape that grows on demand at either end.

use crate::types::{Direction, Symbol, BLANK_SYMBOL};
use std::collections::VecDeque;

/// A conceptually bi-infinite tape.
///
/// Only the cells that have been touched are stored. Index 0 is always the
/// leftmost materialized cell, so moving the head left of it prepends a blank
/// cell instead of producing a negative index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<Symbol>,
    head: usize,
}

impl Tape {
    /// Creates a tape holding `symbols` with the head on the first cell.
    /// An empty input yields a tape with a single blank cell.
    pub fn new<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut cells: VecDeque<Symbol> = symbols.into_iter().collect();
        if cells.is_empty() {
            cells.push_back(BLANK_SYMBOL);
        }

        Self { cells, head: 0 }
    }

    /// Returns the symbol under the head, appending a blank cell first if the
    /// head sits past the right end.
    pub fn read(&mut self) -> Symbol {
        while self.head >= self.cells.len() {
            self.cells.push_back(BLANK_SYMBOL);
        }

        self.cells[self.head]
    }

    /// Writes `symbol` under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.read();
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell and materializes the cell it lands on.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    // Extend tape to the left
                    self.cells.push_front(BLANK_SYMBOL);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head >= self.cells.len() {
                    self.cells.push_back(BLANK_SYMBOL);
                }
            }
            Direction::Stay => {}
        }
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// Number of materialized cells. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns the cell at `index`, or `None` if it has not been materialized.
    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.cells.get(index).copied()
    }

    /// Returns the symbol under the head without growing the tape.
    pub fn current(&self) -> Symbol {
        self.get(self.head).unwrap_or(BLANK_SYMBOL)
    }

    /// Iterates over the materialized cells from left to right.
    pub fn cells(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.cells.iter().copied()
    }

    /// Returns the materialized cells as a string.
    pub fn contents(&self) -> String {
        self.cells().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tape_has_one_blank() {
        let tape = Tape::new(Vec::new());
        assert_eq!(tape.contents(), "_");
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.current(), BLANK_SYMBOL);
    }

    #[test]
    fn test_shift_right_appends_one_blank() {
        let mut tape = Tape::new("ab".chars());
        tape.shift(Direction::Right);
        assert_eq!(tape.len(), 2);

        tape.shift(Direction::Right);
        assert_eq!(tape.head(), 2);
        assert_eq!(tape.contents(), "ab_");
        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_shift_left_prepends_one_blank() {
        let mut tape = Tape::new("ab".chars());
        tape.shift(Direction::Left);

        assert_eq!(tape.head(), 0);
        assert_eq!(tape.contents(), "_ab");
        assert_eq!(tape.read(), BLANK_SYMBOL);
    }

    #[test]
    fn test_stay_keeps_head() {
        let mut tape = Tape::new("ab".chars());
        tape.shift(Direction::Right);
        tape.shift(Direction::Stay);
        assert_eq!(tape.head(), 1);
        assert_eq!(tape.len(), 2);
    }

    #[test]
    fn test_write_keeps_other_cells() {
        let mut tape = Tape::new("abc".chars());
        tape.shift(Direction::Right);
        tape.write('X');
        tape.shift(Direction::Left);
        tape.shift(Direction::Left);
        tape.write('Y');

        assert_eq!(tape.contents(), "YaXc");
    }
}
