use std::collections::BTreeSet;

use anyhow::{bail, ensure, Result};
use regex_syntax::ast::{
    Ast, ClassBracketed, ClassPerl, ClassPerlKind, ClassSet, ClassSetItem, GroupKind,
    RepetitionKind, RepetitionRange,
};

use crate::ast::{
    concat_list, mk_and, mk_any_char, mk_char, mk_class_runes, mk_empty_string, mk_not, mk_or,
    mk_star, or_list, Exp, Rune,
};

/// Parses a textual regular expression into an expression tree.
///
/// The surface grammar is `regex_syntax`'s. Anchors, word boundaries, flags
/// and unicode classes have no counterpart in the core algebra and are
/// rejected; nothing is returned on failure. Complement and conjunction have
/// no surface syntax and enter through the builders instead.
pub fn parse(rx: &str) -> Result<Exp> {
    let mut parser = regex_syntax::ast::parse::Parser::new();
    let ast = parser.parse(rx)?;
    from_ast(&ast)
}

fn from_ast(ast: &Ast) -> Result<Exp> {
    match ast {
        Ast::Empty(_) => Ok(mk_empty_string()),
        Ast::Flags(_) => bail!("flags are not supported"),
        Ast::Literal(l) => Ok(mk_char(l.c)),
        Ast::Dot(_) => Ok(mk_any_char()),
        Ast::Assertion(_) => bail!("anchors and assertions are not supported"),
        Ast::ClassUnicode(_) => bail!("unicode classes are not supported"),
        Ast::ClassPerl(c) => Ok(perl_class(c)),
        Ast::ClassBracketed(c) => bracketed_class(c),
        Ast::Repetition(rep) => {
            let x = from_ast(&rep.ast)?;
            repetition(x, &rep.op.kind)
        }
        Ast::Group(g) => {
            if let GroupKind::NonCapturing(flags) = &g.kind {
                ensure!(flags.items.is_empty(), "flags are not supported");
            }
            from_ast(&g.ast)
        }
        Ast::Alternation(alt) => {
            let xs = alt.asts.iter().map(from_ast).collect::<Result<Vec<_>>>()?;
            Ok(or_list(xs))
        }
        Ast::Concat(c) => {
            let xs = c.asts.iter().map(from_ast).collect::<Result<Vec<_>>>()?;
            Ok(concat_list(xs))
        }
    }
}

fn repetition(x: Exp, kind: &RepetitionKind) -> Result<Exp> {
    match kind {
        RepetitionKind::ZeroOrOne => Ok(mk_or(vec![x, mk_empty_string()])),
        RepetitionKind::ZeroOrMore => Ok(mk_star(x)),
        RepetitionKind::OneOrMore => Ok(mk_concat_plus(x)),
        RepetitionKind::Range(range) => match range {
            RepetitionRange::Exactly(n) => Ok(repeat(&x, *n, *n)),
            RepetitionRange::AtLeast(n) => {
                let mut parts: Vec<Exp> = (0..*n).map(|_| x.clone()).collect();
                parts.push(mk_star(x));
                Ok(concat_list(parts))
            }
            RepetitionRange::Bounded(m, n) => {
                ensure!(m <= n, "invalid repetition range");
                Ok(repeat(&x, *m, *n))
            }
        },
    }
}

fn mk_concat_plus(x: Exp) -> Exp {
    concat_list(vec![x.clone(), mk_star(x)])
}

// m mandatory copies followed by n - m optional ones.
fn repeat(x: &Exp, m: u32, n: u32) -> Exp {
    let mut parts: Vec<Exp> = (0..m).map(|_| x.clone()).collect();
    for _ in m..n {
        parts.push(mk_or(vec![x.clone(), mk_empty_string()]));
    }
    concat_list(parts)
}

fn perl_runes(kind: &ClassPerlKind) -> BTreeSet<Rune> {
    match kind {
        ClassPerlKind::Digit => ('0'..='9').map(|c| c as Rune).collect(),
        ClassPerlKind::Space => " \t\n\x0B\x0C\r".chars().map(|c| c as Rune).collect(),
        ClassPerlKind::Word => ('0'..='9')
            .chain('A'..='Z')
            .chain('a'..='z')
            .chain(std::iter::once('_'))
            .map(|c| c as Rune)
            .collect(),
    }
}

fn perl_class(c: &ClassPerl) -> Exp {
    let runes = perl_runes(&c.kind);
    if c.negated {
        negated_class(runes)
    } else {
        mk_class_runes(runes)
    }
}

// A negated class is the single-rune complement within Σ, expressed in the
// algebra itself: any character, minus the listed ones.
fn negated_class(runes: BTreeSet<Rune>) -> Exp {
    mk_and(vec![mk_any_char(), mk_not(mk_class_runes(runes))])
}

fn bracketed_class(c: &ClassBracketed) -> Result<Exp> {
    let mut runes = BTreeSet::new();
    class_set_runes(&c.kind, &mut runes)?;
    if c.negated {
        Ok(negated_class(runes))
    } else {
        Ok(mk_class_runes(runes))
    }
}

fn class_set_runes(set: &ClassSet, out: &mut BTreeSet<Rune>) -> Result<()> {
    match set {
        ClassSet::Item(item) => class_item_runes(item, out),
        ClassSet::BinaryOp(_) => bail!("class set operations are not supported"),
    }
}

fn class_item_runes(item: &ClassSetItem, out: &mut BTreeSet<Rune>) -> Result<()> {
    match item {
        ClassSetItem::Empty(_) => Ok(()),
        ClassSetItem::Literal(l) => {
            out.insert(l.c as Rune);
            Ok(())
        }
        ClassSetItem::Range(r) => {
            ensure!(r.start.c <= r.end.c, "invalid class range");
            for u in (r.start.c as u32)..=(r.end.c as u32) {
                if let Some(c) = char::from_u32(u) {
                    out.insert(c as Rune);
                }
            }
            Ok(())
        }
        ClassSetItem::Ascii(_) => bail!("ascii classes are not supported"),
        ClassSetItem::Unicode(_) => bail!("unicode classes are not supported"),
        ClassSetItem::Perl(p) => {
            ensure!(
                !p.negated,
                "negated perl classes are not supported inside a class"
            );
            out.extend(perl_runes(&p.kind));
            Ok(())
        }
        ClassSetItem::Bracketed(b) => {
            ensure!(!b.negated, "nested negated classes are not supported");
            class_set_runes(&b.kind, out)
        }
        ClassSetItem::Union(u) => {
            for i in &u.items {
                class_item_runes(i, out)?;
            }
            Ok(())
        }
    }
}
