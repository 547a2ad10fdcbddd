use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A Unicode scalar value, widened so that the sentinel fits.
pub type Rune = i32;

/// A value no valid scalar can have. Used as the key of the default
/// transition in DFA tables; never appears inside a character class.
pub const INVALID_RUNE: Rune = -1;

/// The highest valid scalar value.
pub(crate) const MAX_RUNE: Rune = 0x10FFFF;

/// How many scalars Σ contains: the code space minus the surrogate gap.
pub(crate) const SIGMA_SIZE: usize = 0x110000 - 0x800;

/// Whether `s` holds every valid scalar. Character classes only ever hold
/// scalars, so cardinality decides.
pub(crate) fn runeset_is_sigma(s: &BTreeSet<Rune>) -> bool {
    s.len() == SIGMA_SIZE
}

/// The ten expression kinds, in the order that drives [`Expression`]
/// comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    EmptySet,
    EmptyString,
    AnyCharacter,
    Character,
    CharacterClass,
    KleeneClosure,
    Concatenation,
    Complement,
    Conjunction,
    Disjunction,
}

/// The tagged sum behind an [`Expression`].
///
/// Concatenation is a binary head/tail pair; the variadic builder folds
/// longer factor lists into a right-associated spine, so the tail is
/// typically another Concatenation. Conjunction and Disjunction carry flat
/// child lists which normalisation sorts and deduplicates.
#[derive(Debug)]
pub enum Node {
    EmptySet,
    EmptyString,
    AnyCharacter,
    Character(Rune),
    CharacterClass(BTreeSet<Rune>),
    KleeneClosure(Exp),
    Concatenation(Exp, Exp),
    Complement(Exp),
    Conjunction(Vec<Exp>),
    Disjunction(Vec<Exp>),
}

/// An immutable regular expression node. Never mutated after construction,
/// so references may be shared freely, including across threads.
#[derive(Debug)]
pub struct Expression {
    node: Node,
    norm: bool,
}

/// A shared reference to an expression. Expression graphs are DAGs; cloning
/// is a reference-count bump.
pub type Exp = Arc<Expression>;

impl Expression {
    pub fn kind(&self) -> Kind {
        match &self.node {
            Node::EmptySet => Kind::EmptySet,
            Node::EmptyString => Kind::EmptyString,
            Node::AnyCharacter => Kind::AnyCharacter,
            Node::Character(_) => Kind::Character,
            Node::CharacterClass(_) => Kind::CharacterClass,
            Node::KleeneClosure(_) => Kind::KleeneClosure,
            Node::Concatenation(_, _) => Kind::Concatenation,
            Node::Complement(_) => Kind::Complement,
            Node::Conjunction(_) => Kind::Conjunction,
            Node::Disjunction(_) => Kind::Disjunction,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Whether this node was produced by the normaliser.
    pub fn is_norm(&self) -> bool {
        self.norm
    }

    // Payload accessors. Calling one for the wrong kind is a contract bug.

    pub fn character(&self) -> Rune {
        match &self.node {
            Node::Character(r) => *r,
            _ => panic!("not a Character expression"),
        }
    }

    pub fn character_class(&self) -> &BTreeSet<Rune> {
        match &self.node {
            Node::CharacterClass(s) => s,
            _ => panic!("not a CharacterClass expression"),
        }
    }

    /// The single subexpression of a KleeneClosure or Complement.
    pub fn sub(&self) -> &Exp {
        match &self.node {
            Node::KleeneClosure(x) | Node::Complement(x) => x,
            _ => panic!("not a unary expression"),
        }
    }

    pub fn head(&self) -> &Exp {
        match &self.node {
            Node::Concatenation(h, _) => h,
            _ => panic!("not a Concatenation expression"),
        }
    }

    pub fn tail(&self) -> &Exp {
        match &self.node {
            Node::Concatenation(_, t) => t,
            _ => panic!("not a Concatenation expression"),
        }
    }

    /// The child list of a Conjunction or Disjunction.
    pub fn subexpressions(&self) -> &[Exp] {
        match &self.node {
            Node::Conjunction(xs) | Node::Disjunction(xs) => xs,
            _ => panic!("not a variadic expression"),
        }
    }
}

// The total order: kind first, then payload. The norm flag does not
// participate, so a normalised expression and its raw twin collide as
// container keys.
impl Ord for Expression {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_kind = self.kind().cmp(&other.kind());
        if by_kind != Ordering::Equal {
            return by_kind;
        }
        match (&self.node, &other.node) {
            (Node::Character(a), Node::Character(b)) => a.cmp(b),
            (Node::CharacterClass(a), Node::CharacterClass(b)) => a.cmp(b),
            (Node::KleeneClosure(a), Node::KleeneClosure(b)) => a.cmp(b),
            (Node::Complement(a), Node::Complement(b)) => a.cmp(b),
            (Node::Concatenation(h1, t1), Node::Concatenation(h2, t2)) => {
                h1.cmp(h2).then_with(|| t1.cmp(t2))
            }
            (Node::Conjunction(a), Node::Conjunction(b)) => a.cmp(b),
            (Node::Disjunction(a), Node::Disjunction(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Expression {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Expression {}

fn mk(node: Node) -> Exp {
    Arc::new(Expression { node, norm: false })
}

/// Constructor reserved for the normaliser.
pub(crate) fn mk_norm(node: Node) -> Exp {
    Arc::new(Expression { node, norm: true })
}

// Builders. All of them produce raw (norm = false) nodes; canonical form is
// the normaliser's job.

pub fn mk_empty_set() -> Exp {
    mk(Node::EmptySet)
}

pub fn mk_empty_string() -> Exp {
    mk(Node::EmptyString)
}

pub fn mk_any_char() -> Exp {
    mk(Node::AnyCharacter)
}

pub fn mk_char(c: char) -> Exp {
    mk(Node::Character(c as Rune))
}

pub fn mk_rune(r: Rune) -> Exp {
    mk(Node::Character(r))
}

pub fn mk_class<I: IntoIterator<Item = char>>(chars: I) -> Exp {
    mk(Node::CharacterClass(
        chars.into_iter().map(|c| c as Rune).collect(),
    ))
}

pub fn mk_class_runes(runes: BTreeSet<Rune>) -> Exp {
    mk(Node::CharacterClass(runes))
}

pub fn mk_star(x: Exp) -> Exp {
    mk(Node::KleeneClosure(x))
}

pub fn mk_not(x: Exp) -> Exp {
    mk(Node::Complement(x))
}

/// Folds the factors into a right-associated binary spine.
pub fn mk_concat(xs: Vec<Exp>) -> Exp {
    assert!(xs.len() >= 2, "concatenation needs at least two factors");
    let mut it = xs.into_iter().rev();
    let mut acc = it.next().unwrap();
    for x in it {
        acc = mk(Node::Concatenation(x, acc));
    }
    acc
}

pub fn mk_and(xs: Vec<Exp>) -> Exp {
    assert!(xs.len() >= 2, "conjunction needs at least two children");
    mk(Node::Conjunction(xs))
}

pub fn mk_or(xs: Vec<Exp>) -> Exp {
    assert!(xs.len() >= 2, "disjunction needs at least two children");
    mk(Node::Disjunction(xs))
}

// List forms that tolerate degenerate lengths, for parser and builder code.

pub(crate) fn concat_list(mut xs: Vec<Exp>) -> Exp {
    match xs.len() {
        0 => mk_empty_string(),
        1 => xs.pop().unwrap(),
        _ => mk_concat(xs),
    }
}

pub(crate) fn or_list(mut xs: Vec<Exp>) -> Exp {
    match xs.len() {
        0 => mk_empty_set(),
        1 => xs.pop().unwrap(),
        _ => mk_or(xs),
    }
}

pub(crate) fn and_list(mut xs: Vec<Exp>) -> Exp {
    match xs.len() {
        0 => mk_not(mk_empty_set()),
        1 => xs.pop().unwrap(),
        _ => mk_and(xs),
    }
}
