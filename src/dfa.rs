use std::collections::{BTreeMap, VecDeque};
use std::fmt::Debug;

use crate::ast::{Exp, Node, Rune, INVALID_RUNE};
use crate::deriv::{derivative, is_nullable};
use crate::partition::{default_representative, partitions};
use crate::simplify::normalised;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    /// The start state of every compiled DFA.
    pub const START: StateId = StateId(0);
    /// The sink for derivatives that degenerate to ∅; not counted as a
    /// state and never accepting.
    pub const DEAD: StateId = StateId(u32::MAX);

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn is_dead(&self) -> bool {
        *self == Self::DEAD
    }
}

impl Debug for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == StateId::DEAD {
            write!(f, "StateId(DEAD)")
        } else {
            write!(f, "StateId({})", self.0)
        }
    }
}

/// A compiled deterministic automaton.
///
/// `transition` maps `(state, rune)` to the successor state; the key rune
/// [`INVALID_RUNE`] holds the default branch taken by every rune without an
/// explicit entry. Every state in `accepting` has such a default. State 0 is
/// the start state.
#[derive(Clone, Debug, Default)]
pub struct Dfa {
    pub transition: BTreeMap<(StateId, Rune), StateId>,
    pub accepting: BTreeMap<StateId, bool>,
}

impl Dfa {
    pub fn state_count(&self) -> usize {
        self.accepting.len()
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.get(&state).copied().unwrap_or(false)
    }

    /// Follows the explicit transition for `rune`, falling back to the
    /// state's default branch.
    pub fn next_state(&self, state: StateId, rune: Rune) -> StateId {
        if state.is_dead() {
            return StateId::DEAD;
        }
        if let Some(&t) = self.transition.get(&(state, rune)) {
            return t;
        }
        match self.transition.get(&(state, INVALID_RUNE)) {
            Some(&t) => t,
            None => StateId::DEAD,
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        let mut state = StateId::START;
        for c in text.chars() {
            state = self.next_state(state, c as Rune);
            if state.is_dead() {
                return false;
            }
        }
        self.is_accepting(state)
    }

    /// Input that is not valid UTF-8 never matches.
    pub fn is_match_bytes(&self, bytes: &[u8]) -> bool {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.is_match(text),
            Err(_) => false,
        }
    }
}

/// Compiles `exp` into a DFA whose states are the normalised derivatives
/// reachable from `normalised(exp)`.
///
/// Per state, the alphabet partition bounds the fan-out: one transition per
/// rune of every explicit class, plus the default branch keyed by
/// [`INVALID_RUNE`] for the Σ-covering class. A state is accepting iff its
/// expression is nullable. Termination follows from the finiteness of
/// dissimilar derivatives under normalisation.
pub fn compile(exp: &Exp) -> Dfa {
    let start = normalised(exp);
    let mut dfa = Dfa::default();
    let mut states: BTreeMap<Exp, StateId> = BTreeMap::new();
    let mut worklist: VecDeque<(StateId, Exp)> = VecDeque::new();
    let mut dead_reached = false;

    states.insert(start.clone(), StateId::START);
    worklist.push_back((StateId::START, start));

    while let Some((q, e)) = worklist.pop_front() {
        let parts = partitions(&e);
        log::trace!("state {:?}: {} partition classes", q, parts.len());

        let target = match default_representative(&parts) {
            Some(rep) => intern(
                derivative(&e, rep),
                &mut states,
                &mut worklist,
                &mut dead_reached,
            ),
            // the explicit classes cover Σ, so no rune can take the default
            None => {
                dead_reached = true;
                StateId::DEAD
            }
        };
        dfa.transition.insert((q, INVALID_RUNE), target);

        for class in &parts[1..] {
            let rep = *class.iter().next().unwrap();
            let target = intern(
                derivative(&e, rep),
                &mut states,
                &mut worklist,
                &mut dead_reached,
            );
            for &r in class {
                dfa.transition.insert((q, r), target);
            }
        }

        dfa.accepting.insert(q, is_nullable(&e));
    }

    if dead_reached {
        dfa.transition.insert((StateId::DEAD, INVALID_RUNE), StateId::DEAD);
    }

    log::debug!(
        "compiled {} states, {} transitions",
        dfa.state_count(),
        dfa.transition.len()
    );
    dfa
}

// Interns a normalised derivative, queueing it for exploration when new.
// ∅ folds into the dead sink unless it is the start expression itself.
fn intern(
    e: Exp,
    states: &mut BTreeMap<Exp, StateId>,
    worklist: &mut VecDeque<(StateId, Exp)>,
    dead_reached: &mut bool,
) -> StateId {
    if let Some(&id) = states.get(&e) {
        return id;
    }
    if matches!(e.node(), Node::EmptySet) {
        *dead_reached = true;
        return StateId::DEAD;
    }
    let id = StateId(states.len() as u32);
    states.insert(e.clone(), id);
    worklist.push_back((id, e));
    id
}
