//! Thompson NFA construction from postfix regular expressions
//!
//! Expressions are written in postfix notation over literal characters and
//! three operators: `&` (concatenation), `|` (union) and `*` (Kleene star).
//! For example `ab|c&` is `(a|b)c` in the usual infix syntax.
//!
//! ```
//! let automaton = postfix_nfa::compile("ab&").unwrap();
//! let table = postfix_nfa::Render::new(&automaton).to_string();
//! assert!(table.starts_with("S  (0, a) -> 1"));
//! ```
//!
//! The crate only builds and prints automata; it does not match input.


pub mod nfa;
pub mod compiler;
pub mod automaton;
pub mod render;
pub mod driver;

pub use nfa::{Nfa, State, StateId, Label, Fragment};
pub use compiler::{compile, Compiler, Token};
pub use automaton::{Automaton, Numbering};
pub use render::{render_block, Render};

/// The result of compiling a postfix expression
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// An operator found fewer fragments on the stack than it needs
    MissingOperand {
        operator: char,
        position: usize,
        needed: usize,
        found: usize,
    },
    /// The expression produced no fragment at all
    EmptyExpression,
    /// More than one fragment was left once the expression ended
    LeftoverOperands { count: usize },
    /// A construction invariant was broken
    Internal(String),
}

impl CompileError {
    /// True for the errors caused by the input rather than by the compiler
    pub fn is_malformed(&self) -> bool {
        !matches!(self, CompileError::Internal(_))
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::MissingOperand { operator, position, needed, found } => write!(
                f,
                "malformed expression: operator '{}' at position {} needs {} operand(s), found {}",
                operator, position, needed, found
            ),
            CompileError::EmptyExpression => write!(f, "empty expression"),
            CompileError::LeftoverOperands { count } => write!(
                f,
                "unbalanced expression: {} leftover operands",
                count
            ),
            CompileError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for CompileError {}
