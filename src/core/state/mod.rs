//=========================================================================
// State System
//=========================================================================
//
// Stack of game states with deferred transitions.
//
// Architecture:
//   StateStack
//     ├─ stack: Vec<Box<dyn State>>   (last = top)
//     └─ pending: TransitionSlot      (at most one intent)
//
// Flow:
//   update_all() → render_all() → [present] → commit()
//
// Hooks request transitions through `Context`; nothing on the stack
// changes until `commit()` runs at the end of the frame.
//
//=========================================================================

//=== Module Declarations =================================================

mod state_stack;
mod transition;
mod wake_args;

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::error::HookResult;
use crate::core::registry::ComponentRegistry;

//=== Public API ==========================================================

pub use state_stack::StateStack;
pub use transition::{Transition, TransitionKind, TransitionSlot};
pub use wake_args::{ArgValue, WakeArgs};

//=== State Trait =========================================================

/// A unit of game logic living on the [`StateStack`].
///
/// Only `update()` and `render()` are required. A state is closed exactly
/// once, when it leaves the stack for good (replaced by `change` or
/// removed by `pop`). Being covered by a `push` does not close it.
///
/// ```rust
/// # use strata_engine::prelude::*;
/// struct Title;
///
/// impl State for Title {
///     fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
///         if ctx.frame() > 120 {
///             ctx.pop();
///         }
///         Ok(())
///     }
///
///     fn render(&mut self, _ctx: &mut Context<'_>) -> HookResult {
///         Ok(())
///     }
/// }
/// ```
pub trait State {
    /// Called once per frame while the state is in the active window.
    fn update(&mut self, ctx: &mut Context<'_>) -> HookResult;

    /// Called once per frame after every active state has updated.
    fn render(&mut self, ctx: &mut Context<'_>) -> HookResult;

    /// Called when the state above this one is popped.
    ///
    /// `args` is whatever the popped state passed to [`Context::pop_with`].
    fn wakeup(&mut self, _ctx: &mut Context<'_>, _args: &WakeArgs) -> HookResult {
        Ok(())
    }

    /// Called once when the state is permanently removed from the stack.
    fn close(&mut self, _ctx: &mut Context<'_>) -> HookResult {
        Ok(())
    }

    /// Whether states beneath this one keep receiving update and render.
    ///
    /// Defaults to `true`. An opaque state (returning `false`) leaves
    /// everything below it dormant until it is removed.
    fn is_transparent(&self) -> bool {
        true
    }

    /// Name used in logs and error reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

//=== Context =============================================================

/// Per-hook view of the engine handed to states and game objects.
///
/// Gives access to the shared [`ComponentRegistry`] and records stack
/// transition requests. Requests are applied at the end of the frame;
/// only the last one survives.
pub struct Context<'f> {
    components: &'f mut ComponentRegistry,
    transitions: &'f mut TransitionSlot,
    delta: Duration,
    frame: u64,
}

impl<'f> Context<'f> {
    /// Builds a context over borrowed engine parts.
    ///
    /// The engine does this every frame; it is public so states and
    /// objects can be driven directly in tests.
    pub fn new(
        components: &'f mut ComponentRegistry,
        transitions: &'f mut TransitionSlot,
        delta: Duration,
        frame: u64,
    ) -> Self {
        Self {
            components,
            transitions,
            delta,
            frame,
        }
    }

    //--- Frame Info -------------------------------------------------------

    /// Time elapsed during the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Zero-based index of the current frame.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    //--- Components -------------------------------------------------------

    pub fn components(&self) -> &ComponentRegistry {
        &*self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut *self.components
    }

    //--- Transition Requests ----------------------------------------------

    /// Replaces the top state with `state` at the end of the frame.
    pub fn change(&mut self, state: impl State + 'static) {
        self.transitions.request(Transition::Change(Box::new(state)));
    }

    /// Pushes `state` on top at the end of the frame.
    pub fn push(&mut self, state: impl State + 'static) {
        self.transitions.request(Transition::Push(Box::new(state)));
    }

    /// Pops the top state at the end of the frame without arguments.
    pub fn pop(&mut self) {
        self.pop_with(WakeArgs::new());
    }

    /// Pops the top state at the end of the frame, waking the next one with `args`.
    pub fn pop_with(&mut self, args: WakeArgs) {
        self.transitions.request(Transition::Pop(args));
    }

    /// Kind of the transition currently pending, if any.
    pub fn pending_transition(&self) -> Option<TransitionKind> {
        self.transitions.pending()
    }
}

//=========================================================================
// Tests
//=========================================================================
