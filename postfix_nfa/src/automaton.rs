use crate::nfa::{Nfa, State, StateId};

/// A finished NFA: the arena plus its distinguished start state
#[derive(Debug, Clone, PartialEq)]
pub struct Automaton {
    nfa: Nfa,
    start: StateId,
}

impl Automaton {
    pub fn new(nfa: Nfa, start: StateId) -> Self {
        Self { nfa, start }
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state(&self, id: StateId) -> &State {
        self.nfa.state(id)
    }

    /// Number every state reachable from the start.
    ///
    /// Depth-first pre-order over out1, out2, loop_back; ids start at 0.
    pub fn number(&self) -> Numbering {
        let mut numbering = Numbering::new(self.nfa.len());
        let mut stack = vec![self.start];

        while let Some(id) = stack.pop() {
            if numbering.id_of(id).is_some() {
                continue;
            }
            let n = numbering.assign(id);
            log::trace!("state {} numbered {}", id, n);

            let successors: Vec<StateId> = self.nfa.successors(id).collect();
            stack.extend(successors.into_iter().rev());
        }

        numbering
    }

    /// Reachable states in numbering order
    pub fn states(&self) -> Vec<StateId> {
        self.number().order().to_vec()
    }

    /// Reachable states flagged as start states
    pub fn start_states(&self) -> Vec<StateId> {
        self.states()
            .into_iter()
            .filter(|&id| self.nfa.state(id).is_start)
            .collect()
    }

    /// Reachable states flagged as final states
    pub fn final_states(&self) -> Vec<StateId> {
        self.states()
            .into_iter()
            .filter(|&id| self.nfa.state(id).is_final)
            .collect()
    }
}

/// Output ids for the states of one automaton.
///
/// Once a state has an id it keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Numbering {
    ids: Vec<Option<usize>>,
    order: Vec<StateId>,
}

impl Numbering {
    /// Create an empty numbering for an arena of `len` states
    pub fn new(len: usize) -> Self {
        Self {
            ids: vec![None; len],
            order: Vec::new(),
        }
    }

    /// Give `state` the next free id, or return the one it already has
    pub fn assign(&mut self, state: StateId) -> usize {
        if state >= self.ids.len() {
            self.ids.resize(state + 1, None);
        }
        if let Some(id) = self.ids[state] {
            return id;
        }
        let id = self.order.len();
        self.ids[state] = Some(id);
        self.order.push(state);
        id
    }

    pub fn id_of(&self, state: StateId) -> Option<usize> {
        self.ids.get(state).copied().flatten()
    }

    /// Arena ids, indexed by output id
    pub fn order(&self) -> &[StateId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
