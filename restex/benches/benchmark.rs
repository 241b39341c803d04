use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use restex::postfix::to_postfix;
use restex::Nfa;

lazy_static! {
    /// A fixed corpus of increasingly-nested regexes, growing from a single
    /// literal to several levels of grouped alternation and repetition.
    static ref REGEXES: Vec<String> = vec![
        "a".to_string(),
        "ab".to_string(),
        "a|b".to_string(),
        "(a|b)*".to_string(),
        "(ab|a)*c".to_string(),
        "((a|b)(c|d))*".to_string(),
        "(((a|b)*c)|((d|e)*f))*".to_string(),
        "(a|b|c|d|e|f|g|h)*".to_string(),
        "((ab|cd)*(ef|gh)*)*ij".to_string(),
        "(((((a|b)*|c)*|d)*|e)*f)*".to_string(),
    ];
}

pub fn postfix_conversion(c: &mut Criterion) {
    c.bench_function("postfix conversion", |b| {
        b.iter(|| {
            for regex in REGEXES.iter() {
                black_box(to_postfix(black_box(regex)).unwrap());
            }
        })
    });
}

pub fn thompson_construction(c: &mut Criterion) {
    let postfixes: Vec<String> = REGEXES.iter().map(|r| to_postfix(r).unwrap()).collect();
    c.bench_function("thompson construction", |b| {
        b.iter(|| {
            for postfix in postfixes.iter() {
                black_box(Nfa::from_postfix(black_box(postfix)).unwrap());
            }
        })
    });
}

pub fn subset_construction(c: &mut Criterion) {
    let nfas: Vec<Nfa> = REGEXES
        .iter()
        .map(|r| Nfa::from_postfix(&to_postfix(r).unwrap()).unwrap())
        .collect();
    c.bench_function("subset construction", |b| {
        b.iter(|| {
            for nfa in nfas.iter() {
                black_box(nfa.to_dfa());
            }
        })
    });
}

pub fn minimization(c: &mut Criterion) {
    let dfas: Vec<_> = REGEXES
        .iter()
        .map(|r| Nfa::from_postfix(&to_postfix(r).unwrap()).unwrap().to_dfa())
        .collect();
    c.bench_function("minimization", |b| {
        b.iter(|| {
            for dfa in dfas.iter() {
                black_box(dfa.minimize());
            }
        })
    });
}

criterion_group!(
    benches,
    postfix_conversion,
    thompson_construction,
    subset_construction,
    minimization
);
criterion_main!(benches);
