//! Text rendering of transition tables.
//!
//! One line per state in numbering order:
//!
//! ```text
//! S  (0, a) -> 1
//!    (1, E) -> 2
//!    (2, b) -> 3
//!  F (3, E) -> -
//! ```
//!
//! The first column marks the start state, the second the final state.
//! Targets are listed out1, out2, loop-back; `-` marks a state with no
//! outgoing edges.

use std::fmt;

use crate::automaton::{Automaton, Numbering};

/// Line printed after each expression's table
pub const SEPARATOR: &str = "--------";

/// Display adapter for an automaton's transition table
pub struct Render<'a> {
    automaton: &'a Automaton,
    numbering: Numbering,
}

impl<'a> Render<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            numbering: automaton.number(),
        }
    }

    pub fn numbering(&self) -> &Numbering {
        &self.numbering
    }
}

impl fmt::Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, &state_id) in self.numbering.order().iter().enumerate() {
            let state = self.automaton.state(state_id);
            let start = if state.is_start { 'S' } else { ' ' };
            let fin = if state.is_final { 'F' } else { ' ' };
            write!(f, "{}{} ({}, {}) -> ", start, fin, id, state.label)?;

            if state.is_dead_end() {
                writeln!(f, "-")?;
                continue;
            }
            let mut sep = "";
            for target in state.targets() {
                // Every target is reachable, so it was numbered.
                match self.numbering.id_of(target) {
                    Some(n) => write!(f, "{}{}", sep, n)?,
                    None => return Err(fmt::Error),
                }
                sep = ", ";
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The full output block for one expression: its text, its table, and
/// the separator line.
pub fn render_block(expr: &str, automaton: &Automaton) -> String {
    format!("{}\n{}{}\n", expr, Render::new(automaton), SEPARATOR)
}
