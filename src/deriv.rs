use crate::ast::{
    mk_and, mk_concat, mk_empty_set, mk_empty_string, mk_norm, mk_not, mk_or, mk_star, Exp, Node,
    Rune,
};
use crate::simplify::normalised;

/// Whether ε ∈ L(exp).
pub fn is_nullable(exp: &Exp) -> bool {
    match exp.node() {
        Node::EmptySet | Node::AnyCharacter | Node::Character(_) | Node::CharacterClass(_) => false,
        Node::EmptyString | Node::KleeneClosure(_) => true,
        Node::Concatenation(h, t) => is_nullable(h) && is_nullable(t),
        Node::Complement(x) => !is_nullable(x),
        Node::Conjunction(xs) => xs.iter().all(is_nullable),
        Node::Disjunction(xs) => xs.iter().any(is_nullable),
    }
}

/// The nullability of `exp` as an expression: EmptyString when ε is in the
/// language, EmptySet otherwise. Both results are in canonical form.
pub fn nullability(exp: &Exp) -> Exp {
    if is_nullable(exp) {
        mk_norm(Node::EmptyString)
    } else {
        mk_norm(Node::EmptySet)
    }
}

/// The Brzozowski derivative of `exp` with respect to `rune`, normalised so
/// that structurally identical derivatives collapse.
pub fn derivative(exp: &Exp, rune: Rune) -> Exp {
    let d = match exp.node() {
        Node::EmptySet | Node::EmptyString => mk_empty_set(),
        Node::AnyCharacter => mk_empty_string(),
        Node::Character(c) => {
            if *c == rune {
                mk_empty_string()
            } else {
                mk_empty_set()
            }
        }
        Node::CharacterClass(s) => {
            if s.contains(&rune) {
                mk_empty_string()
            } else {
                mk_empty_set()
            }
        }
        Node::KleeneClosure(x) => mk_concat(vec![derivative(x, rune), mk_star(x.clone())]),
        Node::Concatenation(h, t) => mk_or(vec![
            mk_concat(vec![derivative(h, rune), t.clone()]),
            mk_concat(vec![nullability(h), derivative(t, rune)]),
        ]),
        Node::Complement(x) => mk_not(derivative(x, rune)),
        Node::Conjunction(xs) => mk_and(xs.iter().map(|x| derivative(x, rune)).collect()),
        Node::Disjunction(xs) => mk_or(xs.iter().map(|x| derivative(x, rune)).collect()),
    };
    normalised(&d)
}

/// Matches by iterated derivation: one derivative per scalar of `text`,
/// accepting iff the final expression is nullable. Once the expression
/// degenerates to ∅ no continuation can match.
pub fn is_match(exp: &Exp, text: &str) -> bool {
    let mut e = normalised(exp);
    for c in text.chars() {
        e = derivative(&e, c as Rune);
        if matches!(e.node(), Node::EmptySet) {
            return false;
        }
    }
    is_nullable(&e)
}

/// Byte-level entry point: input that is not valid UTF-8 (overlong forms,
/// surrogates, truncated sequences) never matches.
pub fn is_match_bytes(exp: &Exp, bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(text) => is_match(exp, text),
        Err(_) => false,
    }
}
