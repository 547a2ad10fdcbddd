use std::collections::BTreeSet;
use std::fmt;

use crate::ast::{Exp, Expression, Node, Rune};

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(self, f)
    }
}

fn write_expr(e: &Expression, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match e.node() {
        Node::EmptySet => write!(f, "∅"),
        Node::EmptyString => write!(f, "ε"),
        Node::AnyCharacter => write!(f, "."),
        Node::Character(r) => write!(f, "{}", rune_to_string(*r)),
        Node::CharacterClass(s) => write!(f, "[{}]", runeset_to_string(s)),
        Node::KleeneClosure(x) => {
            write!(f, "(")?;
            write_expr(x, f)?;
            write!(f, ")*")
        }
        Node::Concatenation(h, t) => {
            write!(f, "(")?;
            write_expr(h, f)?;
            write!(f, " ")?;
            write_expr(t, f)?;
            write!(f, ")")
        }
        Node::Complement(x) => {
            write!(f, "(¬")?;
            write_expr(x, f)?;
            write!(f, ")")
        }
        Node::Conjunction(xs) => write_exprs(xs, " & ", f),
        Node::Disjunction(xs) => write_exprs(xs, " | ", f),
    }
}

fn write_exprs(xs: &[Exp], sep: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "(")?;
    for (i, x) in xs.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write_expr(x, f)?;
    }
    write!(f, ")")
}

pub fn rune_to_string(r: Rune) -> String {
    match char::from_u32(r as u32) {
        Some(c) if c.is_ascii_graphic() || c == ' ' => format!("{:?}", c),
        Some(c) => format!("U+{:04X}", c as u32),
        None => format!("U+{:04X}", r as u32),
    }
}

/// Renders a rune set with consecutive scalars collapsed into ranges,
/// `;`-separated.
pub fn runeset_to_string(s: &BTreeSet<Rune>) -> String {
    let mut res = String::new();
    let mut iter = s.iter().copied().peekable();
    let mut first = true;
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end = iter.next().unwrap();
        }
        if !first {
            res.push(';');
        }
        first = false;
        res.push_str(&rune_to_string(start));
        if end > start {
            res.push('-');
            res.push_str(&rune_to_string(end));
        }
    }
    res
}
