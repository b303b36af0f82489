use std::collections::HashSet;
use std::fmt;

use crate::{CompileError, CompileResult};

/// A state ID in the NFA arena
pub type StateId = usize;

/// The symbol consumed on a state's outgoing transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Consume exactly this character
    Char(char),
    /// Consume nothing
    Epsilon,
}

impl Label {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Char(c) => write!(f, "{}", c),
            Label::Epsilon => write!(f, "E"),
        }
    }
}

/// A node in the automaton graph.
///
/// A state has up to three outgoing edges: the forward edge `out1`, an
/// alternate branch `out2`, and the `loop_back` edge laid down by a Kleene
/// star. All of them carry the same `label`.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub label: Label,
    pub out1: Option<StateId>,
    pub out2: Option<StateId>,
    pub loop_back: Option<StateId>,
    pub is_start: bool,
    pub is_final: bool,
}

impl State {
    /// Create a state with no outgoing edges and no markers
    pub fn new(label: Label) -> Self {
        Self {
            label,
            out1: None,
            out2: None,
            loop_back: None,
            is_start: false,
            is_final: false,
        }
    }

    /// Outgoing targets in out1, out2, loop_back order
    pub fn targets(&self) -> impl Iterator<Item = StateId> + '_ {
        [self.out1, self.out2, self.loop_back].into_iter().flatten()
    }

    /// True when no edge leaves this state
    pub fn is_dead_end(&self) -> bool {
        self.targets().next().is_none()
    }
}

/// A sub-automaton under construction, identified by its start state.
///
/// Exactly one state reachable from `start` over out1/out2 edges is
/// flagged final; see [`Nfa::find_final`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
}

/// Index-addressed arena holding every state built for one expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nfa {
    states: Vec<State>,
}

impl Nfa {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Add a new state and return its ID
    pub fn add_state(&mut self, state: State) -> StateId {
        let id = self.states.len();
        self.states.push(state);
        id
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id]
    }

    /// Number of states ever allocated in this arena
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Outgoing targets of `id` in out1, out2, loop_back order
    pub fn successors(&self, id: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.states[id].targets()
    }

    /// Add an edge from `from` to `to` in the first free of out1/out2.
    ///
    /// Existing edges are never overwritten.
    pub fn attach(&mut self, from: StateId, to: StateId) -> CompileResult<()> {
        let state = &mut self.states[from];
        if state.out1.is_none() {
            state.out1 = Some(to);
        } else if state.out2.is_none() {
            state.out2 = Some(to);
        } else {
            return Err(CompileError::Internal(format!(
                "state {} already has two outgoing edges",
                from
            )));
        }
        Ok(())
    }

    /// Add the loop-back edge from `from` to `to`
    pub fn attach_loop_back(&mut self, from: StateId, to: StateId) -> CompileResult<()> {
        let state = &mut self.states[from];
        if state.loop_back.is_some() {
            return Err(CompileError::Internal(format!(
                "state {} already has a loop-back edge",
                from
            )));
        }
        state.loop_back = Some(to);
        Ok(())
    }

    /// Find the final state of the fragment starting at `start`.
    ///
    /// Depth-first over out1 then out2; loop-back edges are not followed.
    pub fn find_final(&self, start: StateId) -> CompileResult<StateId> {
        let mut visited = HashSet::new();
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let state = &self.states[id];
            if state.is_final {
                return Ok(id);
            }
            // Pushed in reverse so out1 is explored first.
            if let Some(next) = state.out2 {
                stack.push(next);
            }
            if let Some(next) = state.out1 {
                stack.push(next);
            }
        }

        Err(CompileError::Internal(format!(
            "no final state reachable from state {}",
            start
        )))
    }
}
