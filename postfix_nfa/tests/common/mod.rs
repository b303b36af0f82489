#![allow(dead_code)]

use std::collections::{BTreeSet, HashSet};

use postfix_nfa::{Automaton, Label, StateId};

/// Every state reachable from `set` without consuming input
fn epsilon_closure(automaton: &Automaton, set: &HashSet<StateId>) -> HashSet<StateId> {
    let mut closure = set.clone();
    let mut stack: Vec<StateId> = set.iter().copied().collect();

    while let Some(id) = stack.pop() {
        let state = automaton.state(id);
        if !state.label.is_epsilon() {
            continue;
        }
        for next in state.targets() {
            if closure.insert(next) {
                stack.push(next);
            }
        }
    }

    closure
}

/// Simulate the automaton on the whole of `input`
pub fn accepts(automaton: &Automaton, input: &str) -> bool {
    let mut current = HashSet::new();
    current.insert(automaton.start());
    current = epsilon_closure(automaton, &current);

    for c in input.chars() {
        let mut next = HashSet::new();
        for &id in &current {
            let state = automaton.state(id);
            if state.label == Label::Char(c) {
                next.extend(state.targets());
            }
        }
        current = epsilon_closure(automaton, &next);
        if current.is_empty() {
            return false;
        }
    }

    current.iter().any(|&id| automaton.state(id).is_final)
}

/// All strings over `alphabet` of length at most `max_len`
pub fn strings(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for &c in alphabet {
                let mut s = prefix.clone();
                s.push(c);
                next.push(s);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

/// The strings from `strings(alphabet, max_len)` that the automaton accepts
pub fn language(automaton: &Automaton, alphabet: &[char], max_len: usize) -> BTreeSet<String> {
    strings(alphabet, max_len)
        .into_iter()
        .filter(|s| accepts(automaton, s))
        .collect()
}

/// Compile and collect the bounded language of a postfix expression
pub fn language_of(expr: &str, alphabet: &[char], max_len: usize) -> BTreeSet<String> {
    let automaton = postfix_nfa::compile(expr)
        .unwrap_or_else(|err| panic!("{:?} failed to compile: {}", expr, err));
    language(&automaton, alphabet, max_len)
}

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
