//! Stage 2 & 3: Thompson construction (postfix &rarr; NFA) and subset
//! construction (NFA &rarr; DFA).
//!
//! [`Nfa::from_postfix`] builds an NFA by walking a postfix token string with
//! a stack of endpoint pairs: each literal allocates a two-state fragment,
//! and each operator pops the fragments of its operands off the stack and
//! pushes a new combined fragment, exactly as described in the design notes
//! (indices into the state list, not pointers, so the stack survives the
//! state vector reallocating as it grows).
//!
//! [`Nfa::to_dfa`] determinizes the result via ε-closure + goto over symbol
//! classes, the classic subset construction.

use crate::automaton::{AutomatonView, Symbol, Transition, State, EPSILON};
use crate::dfa::Dfa;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Everything that can go wrong building an NFA from a postfix token string
/// (the `MalformedPostfix` error kind of the spec).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThompsonError {
    #[error("unknown postfix token '{0}' at byte offset {1}")]
    UnknownToken(char, usize),
    #[error("operator '{op}' at byte offset {offset} needs {needed} operand(s) on the stack, found {available}")]
    InsufficientOperands {
        op: char,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("postfix string left {0} endpoint(s) on the stack, expected exactly 2")]
    UnbalancedPostfix(usize),
}

/// A nondeterministic finite automaton, built by Thompson construction from
/// a postfix token string. May contain ε-transitions and duplicate
/// out-symbols per state; see [`crate::automaton`] for the shared shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<State>,
    start: usize,
    accept: Vec<usize>,
}

impl AutomatonView for Nfa {
    fn states(&self) -> &[State] {
        &self.states
    }

    fn start(&self) -> usize {
        self.start
    }

    fn accept(&self) -> &[usize] {
        &self.accept
    }
}

impl Nfa {
    /// Builds an NFA from already-assembled parts, performing no validation
    /// beyond what [`crate::codec::decode_nfa`] already checked (index
    /// range). ε-transitions and duplicate out-symbols are both legal on an
    /// NFA, so there's nothing further to enforce here.
    pub(crate) fn from_parts_unchecked(states: Vec<State>, start: usize, accept: Vec<usize>) -> Nfa {
        Nfa { states, start, accept }
    }

    /// Mutable access to the state list, used by callers that canonicalize
    /// transition order for comparison (e.g. round-trip tests, where two
    /// NFAs built along different paths may list a state's transitions in
    /// different orders despite being the same automaton).
    #[cfg(test)]
    pub(crate) fn states_mut(&mut self) -> &mut [State] {
        &mut self.states
    }

    /// Builds an NFA from a postfix token string (literals plus `. | * + ?`)
    /// using Thompson construction. The resulting NFA always has exactly one
    /// accept state.
    pub fn from_postfix(postfix: &str) -> Result<Nfa, ThompsonError> {
        let mut states: Vec<State> = Vec::new();
        // Stack of endpoint indices: two consecutive entries (entry, exit)
        // per sub-automaton fragment, with the exit of the most-recently
        // pushed fragment on top.
        let mut stack: Vec<usize> = Vec::new();

        let push_state = |states: &mut Vec<State>| -> usize {
            states.push(State::new());
            states.len() - 1
        };

        let add_eps = |states: &mut [State], from: usize, to: usize| {
            states[from].transitions.push(Transition::new(EPSILON, to));
        };

        for (offset, tok) in postfix.char_indices() {
            match tok {
                '.' => {
                    let (a, b, c, d) = pop4(&mut stack, '.', offset)?;
                    add_eps(&mut states, b, c);
                    stack.push(a);
                    stack.push(d);
                }
                '|' => {
                    let (a, b, c, d) = pop4(&mut stack, '|', offset)?;
                    let n = push_state(&mut states);
                    let n1 = push_state(&mut states);
                    add_eps(&mut states, n, a);
                    add_eps(&mut states, n, c);
                    add_eps(&mut states, b, n1);
                    add_eps(&mut states, d, n1);
                    stack.push(n);
                    stack.push(n1);
                }
                '*' => {
                    let (a, b) = pop2(&mut stack, '*', offset)?;
                    let n = push_state(&mut states);
                    let n1 = push_state(&mut states);
                    add_eps(&mut states, n, a);
                    add_eps(&mut states, n, n1);
                    add_eps(&mut states, b, a);
                    add_eps(&mut states, b, n1);
                    stack.push(n);
                    stack.push(n1);
                }
                '+' => {
                    let (a, b) = pop2(&mut stack, '+', offset)?;
                    let n = push_state(&mut states);
                    let n1 = push_state(&mut states);
                    add_eps(&mut states, n, a);
                    add_eps(&mut states, b, a);
                    add_eps(&mut states, b, n1);
                    stack.push(n);
                    stack.push(n1);
                }
                '?' => {
                    let (a, b) = pop2(&mut stack, '?', offset)?;
                    let n = push_state(&mut states);
                    let n1 = push_state(&mut states);
                    add_eps(&mut states, n, a);
                    add_eps(&mut states, n, n1);
                    add_eps(&mut states, b, n1);
                    stack.push(n);
                    stack.push(n1);
                }
                literal if is_symbol_char(literal) => {
                    let n = push_state(&mut states);
                    let n1 = push_state(&mut states);
                    states[n]
                        .transitions
                        .push(Transition::new(literal as Symbol, n1));
                    stack.push(n);
                    stack.push(n1);
                }
                other => return Err(ThompsonError::UnknownToken(other, offset)),
            }
        }

        if stack.len() != 2 {
            return Err(ThompsonError::UnbalancedPostfix(stack.len()));
        }
        let accept = stack.pop().unwrap();
        let start = stack.pop().unwrap();

        Ok(Nfa {
            states,
            start,
            accept: vec![accept],
        })
    }

    /// The ε-closure of a set of states: the smallest superset closed under
    /// following ε-transitions. Represented as a [`BTreeSet`] so it can be
    /// used directly as a canonical, hashable/ordered set key.
    pub fn closure(&self, from: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
        let mut seen: BTreeSet<usize> = from.into_iter().collect();
        let mut frontier: Vec<usize> = seen.iter().copied().collect();
        while let Some(s) = frontier.pop() {
            for t in &self.states[s].transitions {
                if t.symbol == EPSILON && seen.insert(t.target) {
                    frontier.push(t.target);
                }
            }
        }
        seen
    }

    /// Determinizes this NFA into a DFA via subset construction. States are
    /// numbered in discovery order starting at 0, and state 0 is always the
    /// start state.
    pub fn to_dfa(&self) -> Dfa {
        let c0 = self.closure([self.start]);
        let mut dfa_of: HashMap<BTreeSet<usize>, usize> = HashMap::new();
        dfa_of.insert(c0.clone(), 0);

        let mut dfa_states: Vec<State> = vec![State::new()];
        let mut accept: Vec<usize> = Vec::new();
        if c0.iter().any(|s| self.accept.contains(s)) {
            accept.push(0);
        }

        let mut frontier: Vec<BTreeSet<usize>> = vec![c0];

        while let Some(closure) = frontier.pop() {
            let from = *dfa_of.get(&closure).expect("frontier entries are always mapped");

            // Group reachable NFA states by the symbol they're reached on.
            let mut targets: BTreeMap<Symbol, BTreeSet<usize>> = BTreeMap::new();
            for &s in &closure {
                for t in &self.states[s].transitions {
                    if t.symbol != EPSILON {
                        targets.entry(t.symbol).or_default().extend(self.closure([t.target]));
                    }
                }
            }

            for (symbol, target_set) in targets {
                let to = if let Some(&to) = dfa_of.get(&target_set) {
                    to
                } else {
                    let to = dfa_states.len();
                    dfa_states.push(State::new());
                    if target_set.iter().any(|s| self.accept.contains(s)) {
                        accept.push(to);
                    }
                    dfa_of.insert(target_set.clone(), to);
                    frontier.push(target_set);
                    to
                };
                dfa_states[from].transitions.push(Transition::new(symbol, to));
            }
        }

        for state in &mut dfa_states {
            state.transitions.sort();
        }
        accept.sort_unstable();

        Dfa::from_parts_unchecked(dfa_states, 0, accept)
    }
}

fn is_symbol_char(c: char) -> bool {
    !matches!(c, '.' | '|' | '*' | '+' | '?') && (c as u32) < 128
}

fn pop2(stack: &mut Vec<usize>, op: char, offset: usize) -> Result<(usize, usize), ThompsonError> {
    if stack.len() < 2 {
        return Err(ThompsonError::InsufficientOperands {
            op,
            offset,
            needed: 2,
            available: stack.len(),
        });
    }
    let b = stack.pop().unwrap();
    let a = stack.pop().unwrap();
    Ok((a, b))
}

fn pop4(
    stack: &mut Vec<usize>,
    op: char,
    offset: usize,
) -> Result<(usize, usize, usize, usize), ThompsonError> {
    if stack.len() < 4 {
        return Err(ThompsonError::InsufficientOperands {
            op,
            offset,
            needed: 4,
            available: stack.len(),
        });
    }
    let d = stack.pop().unwrap();
    let c = stack.pop().unwrap();
    let b = stack.pop().unwrap();
    let a = stack.pop().unwrap();
    Ok((a, b, c, d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postfix::to_postfix;

    fn build(regex: &str) -> Nfa {
        let postfix = to_postfix(regex).unwrap();
        Nfa::from_postfix(&postfix).unwrap()
    }

    #[test]
    fn single_literal_has_two_states() {
        let nfa = build("a");
        assert_eq!(nfa.states().len(), 2);
        assert_eq!(nfa.accept().len(), 1);
        assert_eq!(nfa.states[nfa.start].transitions, vec![Transition::new(b'a' as Symbol, nfa.accept[0])]);
    }

    #[test]
    fn star_has_four_states() {
        let nfa = build("a*");
        assert_eq!(nfa.states().len(), 4);
        assert_eq!(nfa.accept().len(), 1);
    }

    #[test]
    fn unknown_token() {
        assert_eq!(
            Nfa::from_postfix("a^"),
            Err(ThompsonError::UnknownToken('^', 1))
        );
    }

    #[test]
    fn missing_operand() {
        assert_eq!(
            Nfa::from_postfix("*"),
            Err(ThompsonError::InsufficientOperands {
                op: '*',
                offset: 0,
                needed: 2,
                available: 0,
            })
        );
    }

    #[test]
    fn unbalanced_postfix() {
        assert_eq!(Nfa::from_postfix("ab"), Err(ThompsonError::UnbalancedPostfix(4)));
    }

    #[test]
    fn empty_postfix_is_rejected() {
        // The empty automaton isn't required to be supported (§6); this
        // crate rejects it uniformly via the final stack-depth check.
        assert_eq!(Nfa::from_postfix(""), Err(ThompsonError::UnbalancedPostfix(0)));
    }

    #[test]
    fn subset_construction_single_literal() {
        let dfa = build("a").to_dfa();
        assert_eq!(dfa.states().len(), 2);
        assert_eq!(dfa.accept(), &[1]);
    }

    #[test]
    fn subset_construction_alternation() {
        let dfa = build("a|b").to_dfa();
        assert_eq!(dfa.states().len(), 2);
        assert_eq!(dfa.accept(), &[1]);
    }
}
