//! Command-line driver for the postfix &rarr; NFA &rarr; DFA &rarr; minimal
//! DFA pipeline. Runs a regex through every stage and writes the postfix
//! string and a DOT rendering of each automaton to standard output, each
//! under a `# --> <label>   :` header.

use clap::Parser;
use restex::automaton::AutomatonView;
use restex::nfa::ThompsonError;
use restex::postfix::{to_postfix, PostfixError};
use restex::Nfa;
use std::process::ExitCode;
use thiserror::Error;

/// Runs a regex through postfix conversion, Thompson construction, subset
/// construction, and table-filling minimization, printing each stage's
/// output.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The regex to compile, over literals plus `( ) | * + ?`.
    regex: String,

    /// Don't print the postfix conversion.
    #[arg(long)]
    no_postfix: bool,

    /// Don't print any DOT graphs (NFA, DFA, minimal DFA).
    #[arg(long)]
    no_dot: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    MalformedRegex(#[from] PostfixError),
    #[error(transparent)]
    MalformedPostfix(#[from] ThompsonError),
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    log::debug!("regex received: {:?}", args.regex);

    let postfix = to_postfix(&args.regex)?;
    log::debug!("postfix computed: {postfix:?}");
    if !args.no_postfix {
        println!("# --> postfix   :");
        println!("{postfix}\n");
    }

    let nfa = Nfa::from_postfix(&postfix)?;
    log::trace!("nfa has {} states", nfa.states().len());
    if !args.no_dot {
        println!("# --> nfa   :");
        println!("{}", restex_draw::to_dot(&nfa));
    }

    let dfa = nfa.to_dfa();
    log::trace!("dfa has {} states", dfa.states().len());
    if !args.no_dot {
        println!("# --> dfa   :");
        println!("{}", restex_draw::to_dot(&dfa));
    }

    let minimal = dfa.minimize();
    log::trace!("minimal dfa has {} states", minimal.states().len());
    if !args.no_dot {
        println!("# --> min-dfa   :");
        println!("{}", restex_draw::to_dot(&minimal));
    }

    Ok(())
}
