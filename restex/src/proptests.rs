//! Property-based tests over the whole pipeline, exercising the invariants
//! from the design notes against a generator of small, well-formed regexes
//! rather than a fixed handful of examples.

use crate::automaton::AutomatonView;
use crate::codec::{decode_dfa, encode_dfa};
use crate::postfix::to_postfix;
use crate::Nfa;
use proptest::prelude::*;

/// A small regex generator over the literal alphabet `a..=e` plus grouping,
/// alternation, and the three postfix quantifiers. Bounded depth/size so
/// shrinking stays fast and the Thompson/subset-construction stages stay
/// cheap per case.
fn random_regex() -> impl Strategy<Value = String> {
    let literal = "[a-e]";
    literal.prop_recursive(6, 64, 8, |inner| {
        prop_oneof![
            5 => prop::collection::vec(inner.clone(), 1..5)
                .prop_map(|parts| parts.join("")),
            5 => prop::collection::vec(inner.clone(), 1..4)
                .prop_map(|parts| format!("({})", parts.join("|"))),
            2 => inner.clone().prop_map(|r| format!("({r})*")),
            2 => inner.clone().prop_map(|r| format!("({r})+")),
            2 => inner.clone().prop_map(|r| format!("({r})?")),
        ]
    })
}

proptest! {
    /// Invariant 1: the postfixer never emits a parenthesis, and it
    /// preserves every literal byte of the input (reordered, interleaved
    /// with explicit `.`, but never dropped or invented).
    #[test]
    fn postfix_has_no_parens_and_preserves_literals(regex in random_regex()) {
        let postfix = to_postfix(&regex).unwrap();
        prop_assert!(!postfix.contains('(') && !postfix.contains(')'));

        let mut input_literals: Vec<char> = regex.chars().filter(|c| c.is_ascii_lowercase()).collect();
        let mut output_literals: Vec<char> = postfix.chars().filter(|c| c.is_ascii_lowercase()).collect();
        input_literals.sort_unstable();
        output_literals.sort_unstable();
        prop_assert_eq!(input_literals, output_literals);
    }

    /// Invariant 2: Thompson construction produces exactly one accept state,
    /// and at most two new states per postfix token.
    #[test]
    fn thompson_output_is_bounded(regex in random_regex()) {
        let postfix = to_postfix(&regex).unwrap();
        let nfa = Nfa::from_postfix(&postfix).unwrap();
        prop_assert_eq!(nfa.accept().len(), 1);
        prop_assert!(nfa.states().len() <= 2 * postfix.chars().count());
    }

    /// Invariant 3: subset construction always produces a deterministic
    /// automaton — sorted transitions, no duplicate out-symbol per state.
    #[test]
    fn dfa_is_deterministic(regex in random_regex()) {
        let postfix = to_postfix(&regex).unwrap();
        let dfa = Nfa::from_postfix(&postfix).unwrap().to_dfa();
        for state in dfa.states() {
            let symbols: Vec<_> = state.transitions.iter().map(|t| t.symbol).collect();
            let mut sorted = symbols.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&symbols, &sorted);
            let mut deduped = sorted.clone();
            deduped.dedup();
            prop_assert_eq!(sorted.len(), deduped.len());
        }
    }

    /// Invariant 4: minimizing an already-minimal DFA changes nothing.
    #[test]
    fn minimize_is_idempotent(regex in random_regex()) {
        let postfix = to_postfix(&regex).unwrap();
        let dfa = Nfa::from_postfix(&postfix).unwrap().to_dfa().minimize();
        prop_assert_eq!(dfa.minimize(), dfa);
    }

    /// Invariant 5: a minimal DFA round-trips through the text codec exactly
    /// (both sides are already in canonical, sorted form).
    #[test]
    fn codec_round_trips(regex in random_regex()) {
        let postfix = to_postfix(&regex).unwrap();
        let dfa = Nfa::from_postfix(&postfix).unwrap().to_dfa().minimize();
        let decoded = decode_dfa(&encode_dfa(&dfa)).unwrap();
        prop_assert_eq!(dfa, decoded);
    }
}
