//! # restex
//!
//! `restex` is a Rust library implementing a small regular-expression toolkit: a
//! pipeline that takes a concrete regex, converts it to postfix form, builds an
//! NFA by Thompson construction, determinizes it into a DFA by subset
//! construction, and minimizes the DFA by table-filling.
//!
//! ## Usage
//!
//! ```rust
//! use restex::postfix::to_postfix;
//! use restex::Nfa;
//!
//! let postfix = to_postfix("(a|b)*a").unwrap();
//! assert_eq!(postfix, "ab|*a.");
//!
//! let nfa = Nfa::from_postfix(&postfix).unwrap();
//! let dfa = nfa.to_dfa();
//! let minimal = dfa.minimize();
//! assert!(minimal.states().len() <= dfa.states().len());
//! ```
//!
//! ## File format
//!
//! NFAs and DFAs share one whitespace-separated text format: a `start` index, a
//! state count, a transition count, that many `(from symbol to)` triples, an
//! accept-list count, and that many accept indices. See [codec] for details.
//!
//! ## Pipeline
//!
//! * [postfix::to_postfix] — infix regex to postfix token string
//! * [Nfa::from_postfix] — Thompson construction
//! * [Nfa::to_dfa] — subset construction
//! * [Dfa::minimize] — table-filling minimization
//! * [codec] — text (de)serialization shared by [Nfa] and [Dfa]
//!
//! ## Non-goals
//!
//! This crate does not implement a matching/execution engine, Unicode support,
//! character classes, anchors, backreferences, or captures. The alphabet is
//! ASCII byte values `0..127`. There is no streaming or incremental
//! construction.

pub mod automaton;
pub mod codec;
pub mod dfa;
pub mod nfa;
pub mod postfix;

#[cfg(test)]
mod proptests;

pub use automaton::{Symbol, Transition, EPSILON};
pub use dfa::Dfa;
pub use nfa::Nfa;
