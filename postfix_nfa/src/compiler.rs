use crate::{
    automaton::Automaton,
    nfa::{Fragment, Label, Nfa, State, StateId},
    CompileError, CompileResult,
};

/// A single postfix token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Any character that is not an operator, whitespace included
    Literal(char),
    /// `&`
    Concat,
    /// `|`
    Union,
    /// `*`
    Star,
}

impl Token {
    pub fn from_char(c: char) -> Self {
        match c {
            '&' => Token::Concat,
            '|' => Token::Union,
            '*' => Token::Star,
            c => Token::Literal(c),
        }
    }

    /// Number of fragments this token pops off the stack
    pub fn arity(&self) -> usize {
        match self {
            Token::Literal(_) => 0,
            Token::Star => 1,
            Token::Concat | Token::Union => 2,
        }
    }
}

/// Compiler that evaluates a postfix expression into a Thompson NFA.
///
/// Binary operators pop their right operand first: for `ab&` the stack
/// yields `b` then `a`, and the rule is applied as `concat(a, b)`.
pub struct Compiler {
    nfa: Nfa,
    stack: Vec<Fragment>,
}

impl Compiler {
    /// Create a new compiler with an empty arena
    pub fn new() -> Self {
        Self {
            nfa: Nfa::new(),
            stack: Vec::new(),
        }
    }

    /// Compile a postfix expression to an automaton
    pub fn compile(mut self, expr: &str) -> CompileResult<Automaton> {
        for (position, c) in expr.chars().enumerate() {
            let token = Token::from_char(c);
            let fragment = match token {
                Token::Literal(c) => self.single_char(c),
                Token::Concat => {
                    let (a, b) = self.pop_operands(c, position)?;
                    self.concat(a, b)?
                }
                Token::Union => {
                    let (a, b) = self.pop_operands(c, position)?;
                    self.union(a, b)?
                }
                Token::Star => {
                    let a = self.pop_operand(c, position)?;
                    self.kleene_star(a)?
                }
            };
            self.stack.push(fragment);
        }

        match self.stack.len() {
            0 => Err(CompileError::EmptyExpression),
            1 => {
                let fragment = self.stack[0];
                log::debug!(
                    "compiled {:?} into {} states, start {}",
                    expr,
                    self.nfa.len(),
                    fragment.start
                );
                Ok(Automaton::new(self.nfa, fragment.start))
            }
            count => Err(CompileError::LeftoverOperands { count }),
        }
    }

    fn pop_operand(&mut self, operator: char, position: usize) -> CompileResult<Fragment> {
        self.stack.pop().ok_or(CompileError::MissingOperand {
            operator,
            position,
            needed: 1,
            found: 0,
        })
    }

    /// Pop `(a, b)` where `b` was pushed last
    fn pop_operands(
        &mut self,
        operator: char,
        position: usize,
    ) -> CompileResult<(Fragment, Fragment)> {
        if self.stack.len() < 2 {
            return Err(CompileError::MissingOperand {
                operator,
                position,
                needed: 2,
                found: self.stack.len(),
            });
        }
        let b = self.pop_operand(operator, position)?;
        let a = self.pop_operand(operator, position)?;
        Ok((a, b))
    }

    /// Two states: start labeled `c`, one edge to the final state
    fn single_char(&mut self, c: char) -> Fragment {
        let fin = self.nfa.add_state(State {
            is_final: true,
            ..State::new(Label::Epsilon)
        });
        let start = self.nfa.add_state(State {
            out1: Some(fin),
            is_start: true,
            ..State::new(Label::Char(c))
        });
        log::trace!("literal {:?}: {} -> {}", c, start, fin);
        Fragment { start }
    }

    /// `a` then `b`: the final state of `a` gets an epsilon edge to `b`
    fn concat(&mut self, a: Fragment, b: Fragment) -> CompileResult<Fragment> {
        let a_fin = self.nfa.find_final(a.start)?;
        self.nfa.state_mut(b.start).is_start = false;
        self.absorb_final(a_fin);
        self.nfa.attach(a_fin, b.start)?;
        log::trace!("concat: {} -> {}", a_fin, b.start);
        Ok(a)
    }

    /// New split start and new final, both operands routed through them
    fn union(&mut self, a: Fragment, b: Fragment) -> CompileResult<Fragment> {
        let a_fin = self.nfa.find_final(a.start)?;
        let b_fin = self.nfa.find_final(b.start)?;

        let start = self.nfa.add_state(State {
            out1: Some(a.start),
            out2: Some(b.start),
            is_start: true,
            ..State::new(Label::Epsilon)
        });
        let fin = self.nfa.add_state(State {
            is_final: true,
            ..State::new(Label::Epsilon)
        });

        self.nfa.state_mut(a.start).is_start = false;
        self.nfa.state_mut(b.start).is_start = false;

        for old in [a_fin, b_fin] {
            self.absorb_final(old);
            self.nfa.attach(old, fin)?;
        }
        log::trace!("union: {} -> ({}, {}) -> {}", start, a.start, b.start, fin);
        Ok(Fragment { start })
    }

    /// New combined start/final state, looped back to from the old final
    fn kleene_star(&mut self, a: Fragment) -> CompileResult<Fragment> {
        let a_fin = self.nfa.find_final(a.start)?;

        let start = self.nfa.add_state(State {
            out1: Some(a.start),
            is_start: true,
            is_final: true,
            ..State::new(Label::Epsilon)
        });
        self.nfa.state_mut(a.start).is_start = false;

        self.absorb_final(a_fin);
        self.nfa.attach_loop_back(a_fin, start)?;
        log::trace!("star: {} -> {} loops back from {}", start, a.start, a_fin);
        Ok(Fragment { start })
    }

    /// Revoke final status; the state becomes an epsilon hop
    fn absorb_final(&mut self, id: StateId) {
        let state = self.nfa.state_mut(id);
        state.is_final = false;
        state.label = Label::Epsilon;
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile `expr` with a fresh [`Compiler`]
pub fn compile(expr: &str) -> CompileResult<Automaton> {
    Compiler::new().compile(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(Token::from_char('&'), Token::Concat);
        assert_eq!(Token::from_char('|'), Token::Union);
        assert_eq!(Token::from_char('*'), Token::Star);
        assert_eq!(Token::from_char(' '), Token::Literal(' '));
        assert_eq!(Token::from_char('E'), Token::Literal('E'));
        assert_eq!(Token::Concat.arity(), 2);
        assert_eq!(Token::Star.arity(), 1);
    }

    #[test]
    fn test_single_char() {
        let automaton = compile("a").unwrap();
        let nfa = automaton.nfa();
        let start = nfa.state(automaton.start());

        assert!(start.is_start);
        assert!(!start.is_final);
        assert_eq!(start.label, Label::Char('a'));
        let fin = nfa.state(start.out1.unwrap());
        assert!(fin.is_final);
        assert!(fin.is_dead_end());
    }

    #[test]
    fn test_concat_keeps_left_operand_start() {
        let automaton = compile("ab&").unwrap();
        let nfa = automaton.nfa();
        let a = nfa.state(automaton.start());
        assert_eq!(a.label, Label::Char('a'));

        let hop = nfa.state(a.out1.unwrap());
        assert_eq!(hop.label, Label::Epsilon);
        assert!(!hop.is_final);

        let b = nfa.state(hop.out1.unwrap());
        assert_eq!(b.label, Label::Char('b'));
        assert!(!b.is_start);
        assert!(nfa.state(b.out1.unwrap()).is_final);
    }

    #[test]
    fn test_union_shape() {
        let automaton = compile("ab|").unwrap();
        let nfa = automaton.nfa();
        let split = nfa.state(automaton.start());
        assert_eq!(split.label, Label::Epsilon);

        let a = split.out1.unwrap();
        let b = split.out2.unwrap();
        assert_eq!(nfa.state(a).label, Label::Char('a'));
        assert_eq!(nfa.state(b).label, Label::Char('b'));
        assert!(!nfa.state(a).is_start && !nfa.state(b).is_start);

        let a_hop = nfa.state(a).out1.unwrap();
        let b_hop = nfa.state(b).out1.unwrap();
        assert_eq!(nfa.state(a_hop).out1, nfa.state(b_hop).out1);
        assert_eq!(nfa.find_final(automaton.start()).unwrap(), nfa.state(a_hop).out1.unwrap());
    }

    #[test]
    fn test_star_uses_loop_back_slot() {
        let automaton = compile("a*").unwrap();
        let nfa = automaton.nfa();
        let k = automaton.start();
        assert!(nfa.state(k).is_start && nfa.state(k).is_final);

        let a = nfa.state(k).out1.unwrap();
        let hop = nfa.state(a).out1.unwrap();
        assert_eq!(nfa.state(hop).loop_back, Some(k));
        assert_eq!(nfa.state(hop).out1, None);
        assert!(!nfa.state(hop).is_final);
    }

    #[test]
    fn test_concat_after_star_does_not_clobber_edges() {
        let automaton = compile("a*b&").unwrap();
        let nfa = automaton.nfa();
        let k = nfa.state(automaton.start());
        assert!(!k.is_final);
        assert_eq!(nfa.state(k.out1.unwrap()).label, Label::Char('a'));
        assert_eq!(nfa.state(k.out2.unwrap()).label, Label::Char('b'));
    }

    #[test]
    fn test_missing_operands() {
        assert_eq!(
            compile("a|").unwrap_err(),
            CompileError::MissingOperand {
                operator: '|',
                position: 1,
                needed: 2,
                found: 1,
            }
        );
        assert_eq!(
            compile("*").unwrap_err(),
            CompileError::MissingOperand {
                operator: '*',
                position: 0,
                needed: 1,
                found: 0,
            }
        );
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(compile("").unwrap_err(), CompileError::EmptyExpression);
        assert_eq!(compile("ab").unwrap_err(), CompileError::LeftoverOperands { count: 2 });
        assert!(matches!(
            compile("ab&&").unwrap_err(),
            CompileError::MissingOperand { operator: '&', position: 3, .. }
        ));
    }
}
