//! Regular-expression matching with Brzozowski derivatives over Unicode
//! scalar values, extended with the full boolean algebra of regular
//! languages: complement and conjunction alongside union, concatenation and
//! Kleene star.
//!
//! Expression trees are immutable, shared by reference and totally ordered,
//! and the normaliser rewrites them to a canonical form under which the set
//! of dissimilar derivatives of any expression is finite. That finiteness
//! makes DFA construction a terminating fix-point: states are normalised
//! derivatives, and a per-state partition of the alphabet bounds the
//! transition fan-out.
//!
//! References
//! ----------
//!
//! "Derivatives of Regular Expressions"
//! Janusz A. Brzozowski
//! Journal of the ACM, vol. 11 iss. 4, pp. 481-494, October 1964
//!
//! "Regular-expression derivatives re-examined"
//! Scott Owens, John Reppy, Aaron Turon
//! Journal of Functional Programming, vol. 19 iss. 2, pp. 173-190, March 2009

mod ast;
mod deriv;
mod dfa;
mod partition;
mod pp;
mod regex;
mod regexbuilder;
mod simplify;
mod syntax;

pub use ast::{
    mk_and, mk_any_char, mk_char, mk_class, mk_class_runes, mk_concat, mk_empty_set,
    mk_empty_string, mk_not, mk_or, mk_rune, mk_star, Exp, Expression, Kind, Node, Rune,
    INVALID_RUNE,
};
pub use deriv::{derivative, is_match, is_match_bytes, is_nullable, nullability};
pub use dfa::{compile, Dfa, StateId};
pub use partition::{default_representative, partitions};
pub use pp::{rune_to_string, runeset_to_string};
pub use regex::Regex;
pub use regexbuilder::{build, ExprAst};
pub use simplify::normalised;
pub use syntax::parse;
