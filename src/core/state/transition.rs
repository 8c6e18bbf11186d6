//=========================================================================
// Transition Slot
//=========================================================================
//
// Single-slot holder for the pending stack transition.
//
// States record intents here during update/render. The state stack
// takes the intent at the frame's commit point. Only one intent is
// held: a later request replaces an earlier one (last writer wins).
//
//   Idle ──change()──→ PendingChange ─┐
//   Idle ──push()────→ PendingPush   ─┼── commit ──→ Idle
//   Idle ──pop()─────→ PendingPop    ─┘
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{State, WakeArgs};

//=== Transition ==========================================================

/// A recorded stack operation awaiting commit.
pub enum Transition {
    /// Close and replace the top state.
    Change(Box<dyn State>),

    /// Put a new state on top; the old top stays on the stack.
    Push(Box<dyn State>),

    /// Close and remove the top state, waking the one beneath with the args.
    Pop(WakeArgs),
}

impl Transition {
    /// Returns the payload-free kind of this transition.
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::Change(_) => TransitionKind::Change,
            Self::Push(_) => TransitionKind::Push,
            Self::Pop(_) => TransitionKind::Pop,
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change(state) => f.debug_tuple("Change").field(&state.name()).finish(),
            Self::Push(state) => f.debug_tuple("Push").field(&state.name()).finish(),
            Self::Pop(args) => f.debug_tuple("Pop").field(args).finish(),
        }
    }
}

//=== TransitionKind ======================================================

/// Payload-free tag of a [`Transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Change,
    Push,
    Pop,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Change => "change",
            Self::Push => "push",
            Self::Pop => "pop",
        };
        f.write_str(name)
    }
}

//=== TransitionSlot ======================================================

/// Holds at most one pending [`Transition`].
#[derive(Debug, Default)]
pub struct TransitionSlot {
    pending: Option<Transition>,
}

impl TransitionSlot {
    /// Creates an idle slot.
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Records `transition`, returning the intent it overwrote, if any.
    pub fn request(&mut self, transition: Transition) -> Option<Transition> {
        let kind = transition.kind();
        let replaced = self.pending.replace(transition);

        match &replaced {
            Some(old) => debug!(target: "state", "Pending {} overwritten by {}", old.kind(), kind),
            None => debug!(target: "state", "Recorded {} request", kind),
        }

        replaced
    }

    /// Takes the pending transition, leaving the slot idle.
    pub fn take(&mut self) -> Option<Transition> {
        self.pending.take()
    }

    /// Kind of the pending transition, `None` when idle.
    pub fn pending(&self) -> Option<TransitionKind> {
        self.pending.as_ref().map(Transition::kind)
    }

    /// Returns true if no transition is pending.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Drops the pending transition without applying it.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

//=========================================================================
// Tests
//=========================================================================
