use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ast::{
    and_list, concat_list, mk_any_char, mk_char, mk_class, mk_empty_set, mk_empty_string, mk_not,
    mk_star, or_list, Exp,
};
use crate::syntax;

/// A serialisable construction AST.
///
/// The surface syntax cannot express complement or conjunction, so callers
/// that need the full algebra from data (tests, config files, RPC payloads)
/// describe expressions with this enum, mixing textual regexes in via
/// `Regex`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ExprAst {
    EmptySet,
    EmptyString,
    AnyChar,
    /// A literal string, one Character per scalar.
    Literal(String),
    Class(Vec<char>),
    /// A textual regex, parsed with the surface parser.
    Regex(String),
    Star(Box<ExprAst>),
    Not(Box<ExprAst>),
    Concat(Vec<ExprAst>),
    And(Vec<ExprAst>),
    Or(Vec<ExprAst>),
}

/// Lowers a builder AST to an expression tree.
pub fn build(ast: &ExprAst) -> Result<Exp> {
    let e = match ast {
        ExprAst::EmptySet => mk_empty_set(),
        ExprAst::EmptyString => mk_empty_string(),
        ExprAst::AnyChar => mk_any_char(),
        ExprAst::Literal(s) => concat_list(s.chars().map(mk_char).collect()),
        ExprAst::Class(chars) => mk_class(chars.iter().copied()),
        ExprAst::Regex(s) => syntax::parse(s)?,
        ExprAst::Star(x) => mk_star(build(x)?),
        ExprAst::Not(x) => mk_not(build(x)?),
        ExprAst::Concat(xs) => concat_list(build_all(xs)?),
        ExprAst::And(xs) => and_list(build_all(xs)?),
        ExprAst::Or(xs) => or_list(build_all(xs)?),
    };
    Ok(e)
}

fn build_all(xs: &[ExprAst]) -> Result<Vec<Exp>> {
    xs.iter().map(build).collect()
}
