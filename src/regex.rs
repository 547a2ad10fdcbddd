use std::fmt::Debug;

use anyhow::Result;

use crate::ast::Exp;
use crate::deriv;
use crate::dfa::{compile, Dfa};
use crate::simplify::normalised;
use crate::syntax;

/// A parsed, normalised and compiled regular expression.
#[derive(Clone)]
pub struct Regex {
    exp: Exp,
    dfa: Dfa,
}

impl Regex {
    pub fn new(rx: &str) -> Result<Self> {
        let exp = syntax::parse(rx)?;
        Ok(Self::from_exp(exp))
    }

    pub fn from_exp(exp: Exp) -> Self {
        let exp = normalised(&exp);
        let dfa = compile(&exp);
        Regex { exp, dfa }
    }

    pub fn exp(&self) -> &Exp {
        &self.exp
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// Table-driven matching over the compiled automaton.
    pub fn is_match(&self, text: &str) -> bool {
        self.dfa.is_match(text)
    }

    pub fn is_match_bytes(&self, bytes: &[u8]) -> bool {
        self.dfa.is_match_bytes(bytes)
    }

    /// Matching by iterated derivation, bypassing the automaton.
    pub fn is_match_derivative(&self, text: &str) -> bool {
        deriv::is_match(&self.exp, text)
    }

    pub fn state_count(&self) -> usize {
        self.dfa.state_count()
    }

    pub fn stats(&self) -> String {
        format!(
            "regexp: {}; states: {}; transitions: {}",
            self.exp,
            self.dfa.state_count(),
            self.dfa.transition.len()
        )
    }
}

impl Debug for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Regex({})", self.stats())
    }
}
