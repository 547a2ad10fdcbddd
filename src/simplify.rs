use std::collections::BTreeSet;
use std::sync::Arc;

use crate::ast::{mk_norm, runeset_is_sigma, Exp, Kind, Node, Rune};

/// Returns the canonical form of `exp`.
///
/// The rewrite runs bottom-up and preserves the denoted language at every
/// step. It is idempotent, and a node already carrying the norm flag is
/// returned as-is.
pub fn normalised(exp: &Exp) -> Exp {
    if exp.is_norm() {
        return Arc::clone(exp);
    }
    match exp.node() {
        Node::EmptySet => mk_norm(Node::EmptySet),
        Node::EmptyString => mk_norm(Node::EmptyString),
        Node::AnyCharacter => mk_norm(Node::AnyCharacter),
        Node::Character(r) => mk_norm(Node::Character(*r)),
        Node::CharacterClass(s) => normalise_class(s),
        Node::KleeneClosure(x) => normalise_star(normalised(x)),
        Node::Concatenation(h, t) => normalise_concat(normalised(h), normalised(t)),
        Node::Complement(x) => normalise_not(normalised(x)),
        Node::Conjunction(xs) => normalise_nary(Kind::Conjunction, xs),
        Node::Disjunction(xs) => normalise_nary(Kind::Disjunction, xs),
    }
}

/// The universal language Σ*, in canonical form.
pub(crate) fn sigma_star() -> Exp {
    mk_norm(Node::Complement(mk_norm(Node::EmptySet)))
}

// An empty class matches nothing, a singleton is a plain character, and a
// class holding every scalar is the any-character expression.
fn normalise_class(s: &BTreeSet<Rune>) -> Exp {
    if runeset_is_sigma(s) {
        return mk_norm(Node::AnyCharacter);
    }
    match s.len() {
        0 => mk_norm(Node::EmptySet),
        1 => mk_norm(Node::Character(*s.iter().next().unwrap())),
        _ => mk_norm(Node::CharacterClass(s.clone())),
    }
}

// K(∅) = K(ε) = ε, K(K(x)) = K(x), K(Σ*) = Σ*.
fn normalise_star(x: Exp) -> Exp {
    match x.node() {
        Node::EmptySet | Node::EmptyString => mk_norm(Node::EmptyString),
        Node::KleeneClosure(_) => x,
        Node::Complement(y) if matches!(y.node(), Node::EmptySet) => x,
        _ => mk_norm(Node::KleeneClosure(x)),
    }
}

// ∅ annihilates, ε drops out, and a concatenation head rotates right until
// the spine is right-associated. Both arguments are already canonical.
fn normalise_concat(h: Exp, t: Exp) -> Exp {
    if matches!(h.node(), Node::EmptySet) || matches!(t.node(), Node::EmptySet) {
        return mk_norm(Node::EmptySet);
    }
    if matches!(h.node(), Node::EmptyString) {
        return t;
    }
    if matches!(t.node(), Node::EmptyString) {
        return h;
    }
    if let Node::Concatenation(a, b) = h.node() {
        let inner = normalise_concat(Arc::clone(b), t);
        return normalise_concat(Arc::clone(a), inner);
    }
    mk_norm(Node::Concatenation(h, t))
}

// C(C(y)) = y. The argument is already canonical.
fn normalise_not(x: Exp) -> Exp {
    if let Node::Complement(y) = x.node() {
        return Arc::clone(y);
    }
    mk_norm(Node::Complement(x))
}

fn is_empty_set(e: &Exp) -> bool {
    matches!(e.node(), Node::EmptySet)
}

fn is_universal(e: &Exp) -> bool {
    matches!(e.node(), Node::Complement(y) if matches!(y.node(), Node::EmptySet))
}

// Requires a sorted slice; the flag-blind order makes the search exact.
fn has_complement_pair(xs: &[Exp]) -> bool {
    xs.iter().any(|x| match x.node() {
        Node::Complement(y) => xs.binary_search(y).is_ok(),
        _ => false,
    })
}

// Shared shape rules for the two commutative operators: flatten same-kind
// children, sort, drop duplicates, then apply the lattice identities.
fn normalise_nary(kind: Kind, xs: &[Exp]) -> Exp {
    let mut flat: Vec<Exp> = Vec::with_capacity(xs.len());
    for x in xs {
        let n = normalised(x);
        if n.kind() == kind {
            flat.extend_from_slice(n.subexpressions());
        } else {
            flat.push(n);
        }
    }
    flat.sort();
    flat.dedup();

    match kind {
        Kind::Conjunction => {
            if flat.iter().any(is_empty_set) {
                return mk_norm(Node::EmptySet);
            }
            flat.retain(|e| !is_universal(e));
            if has_complement_pair(&flat) {
                return mk_norm(Node::EmptySet);
            }
            match flat.len() {
                0 => sigma_star(),
                1 => flat.pop().unwrap(),
                _ => mk_norm(Node::Conjunction(flat)),
            }
        }
        Kind::Disjunction => {
            if flat.iter().any(is_universal) {
                return sigma_star();
            }
            flat.retain(|e| !is_empty_set(e));
            if has_complement_pair(&flat) {
                return sigma_star();
            }
            match flat.len() {
                0 => mk_norm(Node::EmptySet),
                1 => flat.pop().unwrap(),
                _ => mk_norm(Node::Disjunction(flat)),
            }
        }
        _ => unreachable!("normalise_nary is only called for ∧ and ∨"),
    }
}
