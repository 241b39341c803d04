//! Counts strings of a given length accepted by a regex's DFA, via repeated
//! squaring of the (un-minimized) transition matrix mod `1_000_000_007`.
//!
//! ```text
//! count-strings '(a|b)*' 5
//! 32
//! ```

use nalgebra::DMatrix;
use restex::automaton::AutomatonView;
use restex::postfix::to_postfix;
use restex::{Dfa, Nfa};
use std::env;
use std::process::ExitCode;

const MODULUS: i64 = 1_000_000_007;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let (Some(regex), Some(length)) = (args.next(), args.next()) else {
        eprintln!("usage: count-strings <regex> <length>");
        return ExitCode::FAILURE;
    };
    let length: u64 = match length.parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("length must be a non-negative integer");
            return ExitCode::FAILURE;
        }
    };

    let postfix = match to_postfix(&regex) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("malformed regex: {e}");
            return ExitCode::FAILURE;
        }
    };
    let dfa = match Nfa::from_postfix(&postfix) {
        Ok(nfa) => nfa.to_dfa(),
        Err(e) => {
            eprintln!("malformed postfix: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", count_strings(&dfa, length));
    ExitCode::SUCCESS
}

/// Counts, mod `1_000_000_007`, the strings of exactly `length` symbols that
/// `dfa` accepts. `M[i][j]` is the number of symbols taking state `i` to
/// state `j`; `M^length` summed over the accept columns of the start row is
/// the answer, by the standard walk-counting argument for adjacency
/// matrices.
fn count_strings(dfa: &Dfa, length: u64) -> i64 {
    let n = dfa.states().len();
    let mut m = DMatrix::<i64>::zeros(n, n);
    for (from, state) in dfa.states().iter().enumerate() {
        for t in &state.transitions {
            m[(from, t.target)] += 1;
        }
    }

    let powered = mat_pow(&m, length, n);
    dfa.accept()
        .iter()
        .map(|&a| powered[(dfa.start(), a)])
        .sum::<i64>()
        .rem_euclid(MODULUS)
}

fn mat_pow(m: &DMatrix<i64>, mut exp: u64, n: usize) -> DMatrix<i64> {
    let mut result = DMatrix::<i64>::identity(n, n);
    let mut base = m.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result = mat_mul_mod(&result, &base, n);
        }
        base = mat_mul_mod(&base, &base, n);
        exp >>= 1;
    }
    result
}

fn mat_mul_mod(a: &DMatrix<i64>, b: &DMatrix<i64>, n: usize) -> DMatrix<i64> {
    let mut out = DMatrix::<i64>::zeros(n, n);
    for i in 0..n {
        for k in 0..n {
            let aik = a[(i, k)];
            if aik == 0 {
                continue;
            }
            for j in 0..n {
                out[(i, j)] = (out[(i, j)] + aik * b[(k, j)]) % MODULUS;
            }
        }
    }
    out
}
