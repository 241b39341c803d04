//! Renders [`restex`] automata as Graphviz DOT graphs, wrapped in an
//! Org-mode `#+BEGIN_SRC dot ... #+END_SRC` block so the output can be
//! pasted straight into an Org document and rendered in place.

use restex::automaton::{AutomatonView, EPSILON};

/// Renders any automaton implementing [`AutomatonView`] as an Org-mode
/// source block containing a Graphviz `digraph`.
///
/// States are labeled `q<index>`; accept states get a double circle; the
/// start state gets a dangling incoming arrow from an invisible point
/// node, the conventional way of drawing "this one's the start" in DOT
/// without a fake edge label. Edges are labeled by symbol, rendered as the
/// ASCII character it denotes, or `ε` for [`EPSILON`] (NFAs only).
pub fn to_dot(automaton: &impl AutomatonView) -> String {
    let mut dot = String::new();
    dot.push_str("#+BEGIN_SRC dot\n");
    dot.push_str("digraph automaton {\n");
    dot.push_str("    rankdir=LR;\n");
    dot.push_str("    __start__ [shape=point, style=invis];\n");
    dot.push_str(&format!("    __start__ -> q{};\n", automaton.start()));

    for i in 0..automaton.states().len() {
        let shape = if automaton.is_accepting(i) {
            "doublecircle"
        } else {
            "circle"
        };
        dot.push_str(&format!("    q{i} [shape={shape}];\n"));
    }

    for (from, state) in automaton.states().iter().enumerate() {
        for t in &state.transitions {
            let label = if t.symbol == EPSILON {
                "ε".to_string()
            } else {
                symbol_label(t.symbol)
            };
            dot.push_str(&format!(
                "    q{from} -> q{to} [label=\"{label}\"];\n",
                to = t.target
            ));
        }
    }

    dot.push_str("}\n");
    dot.push_str("#+END_SRC\n");
    dot
}

fn symbol_label(symbol: restex::Symbol) -> String {
    match u8::try_from(symbol).ok().map(char::from) {
        Some(c) if !c.is_control() => c.to_string(),
        _ => format!("\\{symbol}"),
    }
}
