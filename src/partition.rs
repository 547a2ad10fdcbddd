use std::collections::BTreeSet;

use crate::ast::{runeset_is_sigma, Exp, Node, Rune, MAX_RUNE};
use crate::deriv::is_nullable;

const SURROGATE_LO: Rune = 0xD800;
const SURROGATE_HI: Rune = 0xDFFF;

/// Partitions the alphabet into classes of runes that all yield the same
/// derivative of `exp` up to normalisation.
///
/// The first class covers Σ and is stored as its complement: the finite set
/// of runes it excludes, which is always the union of the explicit classes.
/// Every following class is an explicit, finite, non-empty rune set, and the
/// explicit classes are pairwise disjoint.
pub fn partitions(exp: &Exp) -> Vec<BTreeSet<Rune>> {
    match exp.node() {
        Node::EmptySet | Node::EmptyString | Node::AnyCharacter => vec![BTreeSet::new()],
        Node::Character(c) => {
            let single: BTreeSet<Rune> = std::iter::once(*c).collect();
            vec![single.clone(), single]
        }
        Node::CharacterClass(s) => {
            // empty and Σ-wide classes derive the same everywhere
            if s.is_empty() || runeset_is_sigma(s) {
                vec![BTreeSet::new()]
            } else {
                vec![s.clone(), s.clone()]
            }
        }
        Node::KleeneClosure(x) | Node::Complement(x) => partitions(x),
        Node::Concatenation(h, t) => {
            if is_nullable(h) {
                refine(partitions(h), partitions(t))
            } else {
                partitions(h)
            }
        }
        Node::Conjunction(xs) | Node::Disjunction(xs) => {
            let mut acc = partitions(&xs[0]);
            for x in &xs[1..] {
                acc = refine(acc, partitions(x));
            }
            acc
        }
    }
}

// Pairwise intersection of two partitions. With the defaults stored as
// complements, the intersection of the defaults is the union of the stored
// sets; an explicit class intersected with the other default is a set
// difference. Empty intersections are dropped.
fn refine(a: Vec<BTreeSet<Rune>>, b: Vec<BTreeSet<Rune>>) -> Vec<BTreeSet<Rune>> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.push(a[0].union(&b[0]).copied().collect());
    for x in &a[1..] {
        let d: BTreeSet<Rune> = x.difference(&b[0]).copied().collect();
        if !d.is_empty() {
            out.push(d);
        }
    }
    for y in &b[1..] {
        let d: BTreeSet<Rune> = y.difference(&a[0]).copied().collect();
        if !d.is_empty() {
            out.push(d);
        }
    }
    for x in &a[1..] {
        for y in &b[1..] {
            let i: BTreeSet<Rune> = x.intersection(y).copied().collect();
            if !i.is_empty() {
                out.push(i);
            }
        }
    }
    out
}

/// A representative rune of the Σ-covering default class: the smallest valid
/// scalar the stored set does not exclude. Returns `None` when the explicit
/// classes already cover every scalar, leaving the default class empty.
pub fn default_representative(parts: &[BTreeSet<Rune>]) -> Option<Rune> {
    let excluded = &parts[0];
    let mut r: Rune = 0;
    while r <= MAX_RUNE {
        if r == SURROGATE_LO {
            r = SURROGATE_HI + 1;
        }
        if !excluded.contains(&r) {
            return Some(r);
        }
        r += 1;
    }
    None
}
