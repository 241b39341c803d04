//! Stage 1: infix regex &rarr; postfix token string.
//!
//! [`to_postfix`] performs a single left-to-right scan over the input,
//! maintaining a running count of pending operands (`exp`) and pending
//! alternation operators (`alt`) for the innermost parenthetical scope, plus
//! a stack of saved `(alt, exp)` pairs for enclosing scopes. No AST is ever
//! built; the output is just the same characters rearranged with explicit
//! `.` concatenation and the parentheses stripped out.
//!
//! ```
//! use restex::postfix::to_postfix;
//!
//! assert_eq!(to_postfix("a").unwrap(), "a");
//! assert_eq!(to_postfix("ab").unwrap(), "ab.");
//! assert_eq!(to_postfix("a|b").unwrap(), "ab|");
//! assert_eq!(to_postfix("(a|b)*").unwrap(), "ab|*");
//! assert_eq!(to_postfix("(ab|a)").unwrap(), "ab.a|");
//! assert_eq!(to_postfix("").unwrap(), "");
//! ```

use thiserror::Error;

/// Everything that can go wrong converting a regex to postfix form (the
/// `MalformedRegex` error kind of the spec).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostfixError {
    #[error("unmatched ')' at byte offset {0}")]
    UnmatchedCloseParen(usize),
    #[error("{0} unclosed '(' at end of input")]
    UnmatchedOpenParen(usize),
    #[error("'{op}' at byte offset {offset} has no operand")]
    MissingOperand { op: char, offset: usize },
    #[error("empty alternative or group at byte offset {0}")]
    EmptyAlternative(usize),
    #[error("'{0}' at byte offset {1} is not a valid regex character (whitespace and control bytes aren't allowed)")]
    InvalidCharacter(char, usize),
}

/// Converts `regex` (over `[A-Za-z0-9]` plus the operators `( ) | * + ?`,
/// with no escaping) into its postfix form: literals pass through, `.`
/// denotes explicit concatenation, and parentheses are removed.
///
/// An empty input produces an empty output; this is the only case where the
/// postfix builder downstream ([`crate::nfa::Nfa::from_postfix`]) is not
/// required to accept the result.
pub fn to_postfix(regex: &str) -> Result<String, PostfixError> {
    let mut out = String::with_capacity(regex.len() * 2);
    // Pending operands / pending alternation bars of the innermost scope.
    let mut exp: u32 = 0;
    let mut alt: u32 = 0;
    // Saved (alt, exp) of each enclosing scope, pushed on '(' and popped on ')'.
    let mut nests: Vec<(u32, u32)> = Vec::new();

    for (offset, c) in regex.char_indices() {
        match c {
            '(' => {
                if exp > 1 {
                    out.push('.');
                    exp -= 1;
                }
                nests.push((alt, exp));
                alt = 0;
                exp = 0;
            }
            ')' => {
                flush_concat(&mut out, &mut exp, offset)?;
                for _ in 0..alt {
                    out.push('|');
                }
                let (saved_alt, saved_exp) = nests
                    .pop()
                    .ok_or(PostfixError::UnmatchedCloseParen(offset))?;
                alt = saved_alt;
                exp = saved_exp + 1;
            }
            '|' => {
                if exp == 0 {
                    return Err(PostfixError::MissingOperand { op: '|', offset });
                }
                flush_concat(&mut out, &mut exp, offset)?;
                alt += 1;
            }
            '*' | '+' | '?' => {
                if exp == 0 {
                    return Err(PostfixError::MissingOperand { op: c, offset });
                }
                out.push(c);
            }
            literal if is_literal(literal) => {
                if exp > 1 {
                    out.push('.');
                    exp -= 1;
                }
                out.push(literal);
                exp += 1;
            }
            other => return Err(PostfixError::InvalidCharacter(other, offset)),
        }
    }

    if !nests.is_empty() {
        return Err(PostfixError::UnmatchedOpenParen(nests.len()));
    }

    if exp == 0 && alt > 0 {
        // A trailing '|' with nothing after it, e.g. "a|".
        return Err(PostfixError::MissingOperand {
            op: '|',
            offset: regex.len(),
        });
    }
    if exp != 0 {
        flush_concat(&mut out, &mut exp, regex.len())?;
    }
    for _ in 0..alt {
        out.push('|');
    }

    Ok(out)
}

/// Drains `exp` pending operands down to a single concatenated one, emitting
/// the `.` operators needed to join them. `exp == 0` on entry means there was
/// nothing pending to flush (an empty group or empty alternative), which is
/// a [`PostfixError::EmptyAlternative`] — this check is what keeps the
/// underflow bug described in the design notes from resurfacing.
fn flush_concat(out: &mut String, exp: &mut u32, offset: usize) -> Result<(), PostfixError> {
    loop {
        if *exp == 0 {
            return Err(PostfixError::EmptyAlternative(offset));
        }
        *exp -= 1;
        if *exp == 0 {
            break;
        }
        out.push('.');
    }
    Ok(())
}

fn is_literal(c: char) -> bool {
    !c.is_whitespace() && !c.is_control()
}
