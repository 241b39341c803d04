//! Stage 4: DFA minimization by table-filling (Hopcroft&ndash;McCluskey
//! equivalence).
//!
//! [`Dfa::minimize`] builds the upper-triangular distinguishability table
//! described in the design notes, refines it to a fixpoint, then collapses
//! the unmarked pairs into equivalence classes with a disjoint-set forest
//! and emits a freshly renumbered, canonical DFA.

use crate::automaton::{AutomatonView, Symbol, Transition, State};
use std::collections::BTreeSet;

/// A deterministic finite automaton: no ε-transitions, at most one outgoing
/// transition per symbol per state, transitions sorted by symbol, `accept`
/// sorted and deduplicated. Built by [`crate::nfa::Nfa::to_dfa`],
/// [`Dfa::minimize`], or decoded from the text format
/// ([`crate::codec::decode_dfa`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    states: Vec<State>,
    start: usize,
    accept: Vec<usize>,
}

impl AutomatonView for Dfa {
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

impl Dfa {
    /// Builds a DFA from already-canonical parts (sorted transitions, sorted
    /// deduped accept list) without re-checking the invariants. Used by
    /// [`crate::nfa::Nfa::to_dfa`] and [`Dfa::minimize`], which both
    /// construct their output in canonical form directly.
    pub(crate) fn from_parts_unchecked(states: Vec<State>, start: usize, accept: Vec<usize>) -> Dfa {
        Dfa { states, start, accept }
    }

    /// The alphabet actually appearing on this DFA's transitions, i.e. the
    /// set of symbols minimization must distinguish on (§4.4: "derive A from
    /// the DFA", not hardcode one).
    pub fn alphabet(&self) -> BTreeSet<Symbol> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.iter().map(|t| t.symbol))
            .collect()
    }

    fn target(&self, state: usize, symbol: Symbol) -> Option<usize> {
        self.states[state]
            .transitions
            .binary_search_by_key(&symbol, |t| t.symbol)
            .ok()
            .map(|i| self.states[state].transitions[i].target)
    }

    /// Minimizes this DFA via table-filling. Returns a new, canonically
    /// renumbered DFA; `self` is untouched. DFAs with fewer than two states
    /// are already minimal and are returned as an equal clone.
    pub fn minimize(&self) -> Dfa {
        let n = self.states.len();
        if n < 2 {
            return self.clone();
        }

        let alphabet: Vec<Symbol> = self.alphabet().into_iter().collect();
        let accept: BTreeSet<usize> = self.accept.iter().copied().collect();

        // distinct[i][j] for i < j, flattened into a triangular index.
        let idx = |i: usize, j: usize| {
            let (i, j) = if i < j { (i, j) } else { (j, i) };
            debug_assert!(i < j);
            i * n - i * (i + 1) / 2 + (j - i - 1)
        };
        let mut distinct = vec![false; n * (n - 1) / 2];

        for i in 0..n {
            for j in (i + 1)..n {
                if accept.contains(&i) != accept.contains(&j) {
                    distinct[idx(i, j)] = true;
                }
            }
        }

        loop {
            let mut changed = false;
            for i in 0..n {
                for j in (i + 1)..n {
                    if distinct[idx(i, j)] {
                        continue;
                    }
                    for &c in &alphabet {
                        let pi = self.target(i, c);
                        let pj = self.target(j, c);
                        let mark = match (pi, pj) {
                            (Some(pi), Some(pj)) => pi != pj && distinct[idx(pi, pj)],
                            (None, None) => false,
                            _ => true,
                        };
                        if mark {
                            distinct[idx(i, j)] = true;
                            changed = true;
                            break;
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let mut classes = DisjointSet::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if !distinct[idx(i, j)] {
                    classes.union(i, j);
                }
            }
        }

        // Canonical order: merged classes first (by min original member),
        // then remaining singletons, both ordered by their representative.
        let mut merged_reps: Vec<usize> = (0..n)
            .filter(|&s| classes.size(s) > 1 && classes.find(s) == s)
            .collect();
        merged_reps.sort_unstable();
        let mut singleton_reps: Vec<usize> = (0..n)
            .filter(|&s| classes.size(s) == 1)
            .collect();
        singleton_reps.sort_unstable();

        let mut class_index = vec![usize::MAX; n];
        let mut next = 0;
        for rep in merged_reps.iter().chain(singleton_reps.iter()) {
            for s in 0..n {
                if classes.find(s) == *rep {
                    class_index[s] = next;
                }
            }
            next += 1;
        }
        let m = |s: usize| class_index[s];

        let mut new_states: Vec<State> = vec![State::new(); next];
        for rep in merged_reps.iter().chain(singleton_reps.iter()) {
            let new_idx = m(*rep);
            let members: Vec<usize> = (0..n).filter(|&s| classes.find(s) == *rep).collect();
            for &c in &alphabet {
                if let Some(target) = members.iter().find_map(|&s| self.target(s, c)) {
                    new_states[new_idx]
                        .transitions
                        .push(Transition::new(c, m(target)));
                }
            }
            new_states[new_idx].transitions.sort();
        }

        let mut new_accept: Vec<usize> = (0..next)
            .filter(|&ni| {
                (0..n).any(|s| class_index[s] == ni && accept.contains(&s))
            })
            .collect();
        new_accept.sort_unstable();
        new_accept.dedup();

        Dfa {
            states: new_states,
            start: m(self.start),
            accept: new_accept,
        }
    }
}

/// A disjoint-set forest with path compression, used to collapse the
/// unmarked pairs of the distinguishability table into equivalence classes.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }

    fn size(&mut self, x: usize) -> usize {
        let r = self.find(x);
        self.size[r]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::Nfa;
    use crate::postfix::to_postfix;

    fn minimal_dfa(regex: &str) -> Dfa {
        let postfix = to_postfix(regex).unwrap();
        Nfa::from_postfix(&postfix).unwrap().to_dfa().minimize()
    }

    #[test]
    fn minimize_is_a_noop_below_two_states() {
        let dfa = Dfa {
            states: vec![State::new()],
            start: 0,
            accept: vec![0],
        };
        assert_eq!(dfa.minimize(), dfa);
    }

    #[test]
    fn single_literal_minimizes_to_two_states() {
        let dfa = minimal_dfa("a");
        assert_eq!(dfa.states().len(), 2);
        assert_eq!(dfa.accept(), &[1]);
    }

    #[test]
    fn star_of_alternation_minimizes_to_one_state() {
        let dfa = minimal_dfa("(a|b)*");
        assert_eq!(dfa.states().len(), 1);
        assert_eq!(dfa.accept(), &[0]);
        assert_eq!(dfa.states()[0].transitions.len(), 2);
    }

    #[test]
    fn alternation_minimizes_to_two_states() {
        let dfa = minimal_dfa("a|b");
        assert_eq!(dfa.states().len(), 2);
        let q0 = &dfa.states()[dfa.start()];
        assert_eq!(q0.transitions.len(), 2);
        for t in &q0.transitions {
            assert_eq!(t.target, 1);
        }
    }

    #[test]
    fn nested_alternatives_collapse() {
        // (ab|a): the two branches collapse into one equivalence class.
        let dfa = minimal_dfa("(ab|a)");
        assert_eq!(dfa.states().len(), 3);
        assert_eq!(dfa.accept().len(), 2);
    }

    #[test]
    fn minimize_is_idempotent() {
        let dfa = minimal_dfa("(ab|a)*a?");
        let twice = dfa.minimize();
        assert_eq!(dfa, twice);
    }
}
