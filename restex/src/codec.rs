//! Stage 5: the text codec shared by NFAs and DFAs.
//!
//! ```text
//! <start> <num_states> <num_transitions>
//! (<from> <symbol> <to>)*  <num_accept> <accept>*
//! ```
//!
//! Everything is whitespace-separated; the decoder doesn't care whether
//! tokens are newline- or space-delimited. The encoder always emits
//! transitions sorted by `(from, symbol, to)` so the output is canonical
//! regardless of the in-memory transition order of the source automaton.

use crate::automaton::{AutomatonView, Symbol, State, Transition, EPSILON};
use crate::dfa::Dfa;
use crate::nfa::Nfa;
use std::fmt::Write as _;
use std::io;
use thiserror::Error;

/// Everything that can go wrong decoding the text format. Maps onto two of
/// the spec's four error kinds: a structurally invalid automaton (bad
/// index, non-deterministic DFA, trailing data), or a token the reader
/// itself couldn't make sense of.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(InvalidAutomatonKind),
    #[error(transparent)]
    IoError(#[from] io::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidAutomatonKind {
    #[error("fewer tokens than the header promised (expected {expected} more)")]
    UnexpectedEof { expected: &'static str },
    #[error("transition source state {0} out of range 0..{1}")]
    FromOutOfRange(usize, usize),
    #[error("transition target state {0} out of range 0..{1}")]
    TargetOutOfRange(usize, usize),
    #[error("accept state {0} out of range 0..{1}")]
    AcceptOutOfRange(usize, usize),
    #[error("trailing data after the accept list")]
    TrailingData,
    #[error("DFA state {state} has an ε-transition, which only NFAs may carry")]
    EpsilonInDfa { state: usize },
    #[error("DFA state {state} has two outgoing transitions on symbol {symbol}")]
    DuplicateSymbol { state: usize, symbol: Symbol },
}

/// Encodes an NFA in the shared text format.
pub fn encode_nfa(nfa: &Nfa) -> String {
    encode(nfa)
}

/// Encodes a DFA in the shared text format.
pub fn encode_dfa(dfa: &Dfa) -> String {
    encode(dfa)
}

fn encode(a: &impl AutomatonView) -> String {
    let mut transitions: Vec<(usize, Symbol, usize)> = a
        .states()
        .iter()
        .enumerate()
        .flat_map(|(from, s)| s.transitions.iter().map(move |t| (from, t.symbol, t.target)))
        .collect();
    transitions.sort();

    let mut out = String::new();
    writeln!(out, "{} {} {}", a.start(), a.states().len(), transitions.len())
        .expect("writing to a String never fails");
    for (from, symbol, to) in &transitions {
        writeln!(out, "{from} {symbol} {to}").unwrap();
    }
    writeln!(out, "{}", a.accept().len()).unwrap();
    let accept = a
        .accept()
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{accept}").unwrap();
    out
}

/// Decodes an NFA from the shared text format. ε-transitions and
/// duplicate-symbol states are both fine for an NFA; only index range and
/// stream well-formedness are checked.
pub fn decode_nfa(input: &str) -> Result<Nfa, CodecError> {
    let (states, start, accept) = decode_common(input)?;
    Ok(Nfa::from_parts_unchecked(states, start, accept))
}

/// Decodes a DFA from the shared text format. In addition to the generic
/// checks, rejects ε-transitions and states with two transitions on the
/// same symbol, then sorts each state's transitions and the accept list
/// into canonical order.
pub fn decode_dfa(input: &str) -> Result<Dfa, CodecError> {
    let (mut states, start, mut accept) = decode_common(input)?;

    for (state_idx, state) in states.iter().enumerate() {
        let mut seen = std::collections::HashSet::new();
        for t in &state.transitions {
            if t.symbol == EPSILON {
                return Err(CodecError::InvalidAutomaton(InvalidAutomatonKind::EpsilonInDfa {
                    state: state_idx,
                }));
            }
            if !seen.insert(t.symbol) {
                return Err(CodecError::InvalidAutomaton(
                    InvalidAutomatonKind::DuplicateSymbol {
                        state: state_idx,
                        symbol: t.symbol,
                    },
                ));
            }
        }
    }

    for state in &mut states {
        state.transitions.sort();
    }
    accept.sort_unstable();

    Ok(Dfa::from_parts_unchecked(states, start, accept))
}

fn decode_common(input: &str) -> Result<(Vec<State>, usize, Vec<usize>), CodecError> {
    let mut tokens = input.split_whitespace();

    let start = next_usize(&mut tokens, "start index")?;
    let num_states = next_usize(&mut tokens, "state count")?;
    let num_transitions = next_usize(&mut tokens, "transition count")?;

    if start >= num_states {
        return Err(CodecError::InvalidAutomaton(InvalidAutomatonKind::FromOutOfRange(
            start,
            num_states,
        )));
    }

    let mut states = vec![State::new(); num_states];
    for _ in 0..num_transitions {
        let from = next_usize(&mut tokens, "transition 'from'")?;
        let symbol = next_symbol(&mut tokens, "transition symbol")?;
        let to = next_usize(&mut tokens, "transition 'to'")?;
        if from >= num_states {
            return Err(CodecError::InvalidAutomaton(InvalidAutomatonKind::FromOutOfRange(
                from,
                num_states,
            )));
        }
        if to >= num_states {
            return Err(CodecError::InvalidAutomaton(InvalidAutomatonKind::TargetOutOfRange(
                to,
                num_states,
            )));
        }
        states[from].transitions.push(Transition::new(symbol, to));
    }

    let num_accept = next_usize(&mut tokens, "accept count")?;
    let mut accept = Vec::with_capacity(num_accept);
    for _ in 0..num_accept {
        let a = next_usize(&mut tokens, "accept index")?;
        if a >= num_states {
            return Err(CodecError::InvalidAutomaton(InvalidAutomatonKind::AcceptOutOfRange(
                a,
                num_states,
            )));
        }
        accept.push(a);
    }

    if tokens.next().is_some() {
        return Err(CodecError::InvalidAutomaton(InvalidAutomatonKind::TrailingData));
    }

    Ok((states, start, accept))
}

fn next_usize<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    ctx: &'static str,
) -> Result<usize, CodecError> {
    let tok = tokens
        .next()
        .ok_or(CodecError::InvalidAutomaton(InvalidAutomatonKind::UnexpectedEof {
            expected: ctx,
        }))?;
    tok.parse::<usize>().map_err(|_| malformed_token(tok))
}

fn next_symbol<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    ctx: &'static str,
) -> Result<Symbol, CodecError> {
    let tok = tokens
        .next()
        .ok_or(CodecError::InvalidAutomaton(InvalidAutomatonKind::UnexpectedEof {
            expected: ctx,
        }))?;
    tok.parse::<Symbol>().map_err(|_| malformed_token(tok))
}

fn malformed_token(tok: &str) -> CodecError {
    CodecError::IoError(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("malformed integer token {tok:?}"),
    ))
}
