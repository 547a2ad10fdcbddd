use std::collections::BTreeSet;

use derivrune::{
    compile, default_representative, derivative, is_match, mk_and, mk_any_char, mk_char, mk_class,
    mk_class_runes, mk_concat, mk_empty_set, mk_empty_string, mk_not, mk_or, mk_star, normalised,
    nullability, parse, partitions, Exp, Kind, Regex, Rune, StateId, INVALID_RUNE,
};

fn samples() -> Vec<Exp> {
    vec![
        mk_empty_set(),
        mk_empty_string(),
        mk_any_char(),
        mk_char('a'),
        mk_class("0123456789".chars()),
        mk_concat(vec![mk_char('a'), mk_star(mk_char('b'))]),
        mk_star(mk_or(vec![mk_char('a'), mk_char('b')])),
        mk_not(mk_empty_set()),
        mk_and(vec![
            mk_star(mk_any_char()),
            mk_not(mk_concat(vec![
                mk_any_char(),
                mk_concat(vec![mk_char('x'), mk_star(mk_any_char())]),
            ])),
        ]),
        parse("a[bc]*(de|fg)").unwrap(),
        parse("(foo|ba[rz])*").unwrap(),
    ]
}

fn strings() -> Vec<&'static str> {
    vec![
        "", "a", "b", "x", "ab", "ba", "ax", "abb", "abc", "axc", "5", "55", "abde", "acfg",
        "foo", "bar", "foobaz", "źółw",
    ]
}

#[test]
fn dfa_agrees_with_direct_matching() {
    for e in samples() {
        let dfa = compile(&e);
        for s in strings() {
            assert_eq!(
                is_match(&e, s),
                dfa.is_match(s),
                "disagreement for {} on {:?}",
                e,
                s
            );
        }
    }
}

#[test]
fn state_counts() {
    let e = mk_concat(vec![mk_char('a'), mk_star(mk_char('b'))]);
    assert_eq!(compile(&e).state_count(), 2);

    let sigma_star = mk_not(mk_empty_set());
    let dfa = compile(&sigma_star);
    assert_eq!(dfa.state_count(), 1);
    assert!(dfa.is_accepting(StateId::START));
    assert_eq!(
        dfa.transition.get(&(StateId::START, INVALID_RUNE)),
        Some(&StateId::START)
    );

    let e = mk_star(mk_or(vec![mk_char('a'), mk_char('b')]));
    assert_eq!(compile(&e).state_count(), 1);
}

#[test]
fn empty_set_compiles() {
    let dfa = compile(&mk_empty_set());
    assert_eq!(dfa.state_count(), 1);
    assert!(!dfa.is_accepting(StateId::START));
    for s in strings() {
        assert!(!dfa.is_match(s));
    }
}

#[test]
fn every_state_has_a_default_transition() {
    for e in samples() {
        let dfa = compile(&e);
        for (&q, _) in &dfa.accepting {
            assert!(
                dfa.transition.contains_key(&(q, INVALID_RUNE)),
                "missing default for {:?} of {}",
                q,
                e
            );
        }
    }
}

#[test]
fn digit_class_partitions() {
    let e = mk_class("0123456789".chars());
    let parts = partitions(&e);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[1].len(), 10);
    assert_eq!(parts[0], parts[1]);

    assert_eq!(derivative(&e, '5' as Rune).kind(), Kind::EmptyString);
    assert_eq!(derivative(&e, 'a' as Rune).kind(), Kind::EmptySet);
}

// a second member of the Σ-default class, distinct from `first`
fn second_default_rune(excluded: &BTreeSet<Rune>, first: Rune) -> Rune {
    let mut r = first + 1;
    loop {
        if (0xD800..=0xDFFF).contains(&r) {
            r = 0xE000;
        }
        if !excluded.contains(&r) {
            return r;
        }
        r += 1;
    }
}

#[test]
fn partitions_are_sound() {
    for e in samples() {
        let parts = partitions(&e);
        for class in &parts[1..] {
            let mut members = class.iter();
            let first = *members.next().unwrap();
            let d = derivative(&e, first);
            for &r in members {
                assert_eq!(
                    d,
                    derivative(&e, r),
                    "class member {} disagrees for {}",
                    r,
                    e
                );
            }
        }
        let rep = default_representative(&parts).unwrap();
        let other = second_default_rune(&parts[0], rep);
        assert_eq!(
            derivative(&e, rep),
            derivative(&e, other),
            "default class disagrees for {}",
            e
        );
    }
}

#[test]
fn partitions_cover_sigma() {
    for e in samples() {
        let parts = partitions(&e);
        // explicit classes are pairwise disjoint
        for (i, a) in parts[1..].iter().enumerate() {
            for b in &parts[i + 2..] {
                assert!(a.is_disjoint(b), "overlapping classes for {}", e);
            }
        }
        // the stored default is exactly the union of the explicit classes,
        // so the default class (its complement) closes the cover of Σ
        let union: BTreeSet<Rune> = parts[1..].iter().flatten().copied().collect();
        assert_eq!(union, parts[0], "default complement mismatch for {}", e);
        // and for these expressions the default class is never empty
        assert!(default_representative(&parts).is_some());
    }
}

#[test]
fn wide_class_partitions() {
    // a few thousand contiguous code points
    let wide = mk_class((0u32..0x2000).filter_map(char::from_u32));
    let parts = partitions(&wide);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[1].len(), 0x2000);
    let rep = default_representative(&parts).unwrap();
    assert!(!parts[0].contains(&rep));
    assert_eq!(derivative(&wide, 0x123).kind(), Kind::EmptyString);
    assert_eq!(derivative(&wide, 0x3000).kind(), Kind::EmptySet);

    let dfa = compile(&wide);
    assert_eq!(dfa.state_count(), 2);
    assert!(dfa.is_match("\u{123}"));
    assert!(!dfa.is_match("\u{3000}"));
    assert!(!dfa.is_match(""));
}

#[test]
fn class_covering_sigma() {
    let all: BTreeSet<Rune> = (0u32..=0x10FFFF)
        .filter_map(char::from_u32)
        .map(|c| c as Rune)
        .collect();
    let e = mk_class_runes(all);
    // a class holding every scalar is the any-character expression
    assert_eq!(normalised(&e).kind(), Kind::AnyCharacter);
    let parts = partitions(&e);
    assert_eq!(parts.len(), 1);
    assert!(parts[0].is_empty());

    let dfa = compile(&e);
    assert_eq!(dfa.state_count(), 2);
    assert!(dfa.is_match("a"));
    assert!(dfa.is_match("\u{10FFFF}"));
    assert!(!dfa.is_match(""));
    assert!(!dfa.is_match("ab"));
}

#[test]
fn parsed_full_range_class() {
    let rx = Regex::new(r"[\x{0}-\x{10FFFF}]").unwrap();
    assert_eq!(rx.state_count(), 2);
    assert!(rx.is_match("a"));
    assert!(rx.is_match("ż"));
    assert!(!rx.is_match(""));
    assert!(!rx.is_match("ab"));
}

#[test]
fn partition_with_no_default_member() {
    let low = mk_class_runes((0..0xD800).collect());
    let high = mk_class_runes((0xE000..=0x10FFFF).collect());
    let e = mk_or(vec![low, high]);
    let parts = partitions(&e);
    assert!(default_representative(&parts).is_none());

    // the default branch goes to the dead sink; every rune has an explicit
    // transition of its own
    let dfa = compile(&e);
    assert_eq!(
        dfa.transition.get(&(StateId::START, INVALID_RUNE)),
        Some(&StateId::DEAD)
    );
    assert!(dfa.is_match("a"));
    assert!(dfa.is_match("\u{10FFFF}"));
    assert!(!dfa.is_match(""));
    assert!(!dfa.is_match("ab"));
}

#[test]
fn derivative_agrees_with_matching() {
    for e in samples() {
        for s in strings() {
            let mut chars = s.chars();
            if let Some(c) = chars.next() {
                let rest = chars.as_str();
                assert_eq!(
                    is_match(&e, s),
                    is_match(&derivative(&e, c as Rune), rest),
                    "derivative disagreement for {} on {:?}",
                    e,
                    s
                );
            }
        }
    }
}

#[test]
fn nullability_defines_acceptance() {
    for e in samples() {
        let nullable = nullability(&e).kind() == Kind::EmptyString;
        assert_eq!(is_match(&e, ""), nullable, "ε acceptance for {}", e);
        assert_eq!(compile(&e).is_match(""), nullable);
    }
}

#[test]
fn states_are_normalised_derivative_classes() {
    // deriving by any two runes of one class reaches the same state, so the
    // compiled automaton can never exceed the dissimilar-derivative count
    let e = normalised(&parse("a[bc]*(de|fg)").unwrap());
    let dfa = compile(&e);
    let mut derivatives: BTreeSet<Exp> = BTreeSet::new();
    let mut worklist = vec![e];
    while let Some(x) = worklist.pop() {
        if !derivatives.insert(x.clone()) {
            continue;
        }
        let parts = partitions(&x);
        let mut reps: Vec<Rune> = default_representative(&parts).into_iter().collect();
        reps.extend(parts[1..].iter().map(|c| *c.iter().next().unwrap()));
        for r in reps {
            let d = derivative(&x, r);
            if !derivatives.contains(&d) {
                worklist.push(d);
            }
        }
    }
    // the dead ∅ class is kept out of the state table
    assert!(dfa.state_count() <= derivatives.len());
}
