//=========================================================================
// State Stack
//=========================================================================
//
// Owns the ordered stack of states and the pending transition slot.
//
// The stack never changes while update or render is running. Hooks only
// record intents; `commit()` applies at most one of them at the end of
// the frame, outside every pass.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::{Context, State, Transition, TransitionKind, TransitionSlot, WakeArgs};
use crate::core::error::{EngineError, Phase};
use crate::core::registry::ComponentRegistry;

//=== State Stack =========================================================

/// Ordered stack of game states (last = top).
///
/// Transitions requested through [`change`](Self::change),
/// [`push`](Self::push), [`pop`](Self::pop) or a hook's [`Context`] are
/// deferred until [`commit`](Self::commit).
pub struct StateStack {
    stack: Vec<Box<dyn State>>,
    pending: TransitionSlot,
}

impl StateStack {
    //--- Construction -----------------------------------------------------

    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            pending: TransitionSlot::new(),
        }
    }

    /// Creates a stack holding `initial` as its only state.
    pub fn with_initial(initial: Box<dyn State>) -> Self {
        debug!(target: "state", "Initial state: {}", initial.name());
        Self {
            stack: vec![initial],
            pending: TransitionSlot::new(),
        }
    }

    //--- Transition Requests ----------------------------------------------

    /// Records a `change` to `state`, replacing any pending request.
    pub fn change(&mut self, state: impl State + 'static) {
        self.pending.request(Transition::Change(Box::new(state)));
    }

    /// Records a `push` of `state`, replacing any pending request.
    pub fn push(&mut self, state: impl State + 'static) {
        self.pending.request(Transition::Push(Box::new(state)));
    }

    /// Records a `pop` with `args`, replacing any pending request.
    pub fn pop(&mut self, args: WakeArgs) {
        self.pending.request(Transition::Pop(args));
    }

    /// Kind of the pending request, `None` when idle.
    pub fn pending(&self) -> Option<TransitionKind> {
        self.pending.pending()
    }

    /// Drops the pending request without applying it.
    pub fn discard_pending(&mut self) {
        if let Some(kind) = self.pending.pending() {
            debug!(target: "state", "Discarding pending {}", kind);
        }
        self.pending.clear();
    }

    //--- Frame Passes -----------------------------------------------------

    /// Updates every state in the active window, bottom to top.
    ///
    /// Stops at the first hook error.
    pub fn update_all(
        &mut self,
        components: &mut ComponentRegistry,
        delta: Duration,
        frame: u64,
    ) -> Result<(), EngineError> {
        let start = self.active_start();

        for state in &mut self.stack[start..] {
            let mut ctx = Context::new(components, &mut self.pending, delta, frame);
            state
                .update(&mut ctx)
                .map_err(|e| EngineError::hook(state.name(), Phase::Update, frame, e))?;
        }

        Ok(())
    }

    /// Renders every state in the active window, bottom to top.
    ///
    /// Stops at the first hook error.
    pub fn render_all(
        &mut self,
        components: &mut ComponentRegistry,
        delta: Duration,
        frame: u64,
    ) -> Result<(), EngineError> {
        let start = self.active_start();

        for state in &mut self.stack[start..] {
            let mut ctx = Context::new(components, &mut self.pending, delta, frame);
            state
                .render(&mut ctx)
                .map_err(|e| EngineError::hook(state.name(), Phase::Render, frame, e))?;
        }

        Ok(())
    }

    //--- Commit -----------------------------------------------------------

    /// Applies the pending transition, if any, and returns its kind.
    ///
    /// The slot is emptied before the transition runs, so a request made
    /// from `close` or `wakeup` stays pending for the next commit.
    pub fn commit(
        &mut self,
        components: &mut ComponentRegistry,
        delta: Duration,
        frame: u64,
    ) -> Result<Option<TransitionKind>, EngineError> {
        let Some(transition) = self.pending.take() else {
            return Ok(None);
        };
        let kind = transition.kind();

        match transition {
            Transition::Change(state) => {
                let mut outgoing = self
                    .stack
                    .pop()
                    .ok_or(EngineError::EmptyStack { op: "change" })?;

                debug!(target: "state", "Changing {} to {}", outgoing.name(), state.name());

                let mut ctx = Context::new(components, &mut self.pending, delta, frame);
                let closed = outgoing.close(&mut ctx);
                self.stack.push(state);

                closed.map_err(|e| EngineError::hook(outgoing.name(), Phase::Close, frame, e))?;
            }

            Transition::Push(state) => {
                debug!(target: "state", "Pushing {} (depth {})", state.name(), self.stack.len() + 1);
                self.stack.push(state);
            }

            Transition::Pop(args) => {
                let mut outgoing = self
                    .stack
                    .pop()
                    .ok_or(EngineError::EmptyStack { op: "pop" })?;

                debug!(target: "state", "Popping {} (depth {})", outgoing.name(), self.stack.len());

                let mut ctx = Context::new(components, &mut self.pending, delta, frame);
                outgoing
                    .close(&mut ctx)
                    .map_err(|e| EngineError::hook(outgoing.name(), Phase::Close, frame, e))?;

                if let Some(top) = self.stack.last_mut() {
                    trace!(target: "state", "Waking {} with {} args", top.name(), args.len());
                    let mut ctx = Context::new(components, &mut self.pending, delta, frame);
                    top.wakeup(&mut ctx, &args)
                        .map_err(|e| EngineError::hook(top.name(), Phase::Wakeup, frame, e))?;
                }
            }
        }

        Ok(Some(kind))
    }

    //--- Shutdown ---------------------------------------------------------

    /// Closes every remaining state, top first, and drops any pending request.
    ///
    /// All states are closed even if one fails; the first error is returned.
    pub fn close_all(
        &mut self,
        components: &mut ComponentRegistry,
        frame: u64,
    ) -> Result<(), EngineError> {
        let mut first_error = None;

        while let Some(mut state) = self.stack.pop() {
            let mut ctx = Context::new(components, &mut self.pending, Duration::ZERO, frame);
            if let Err(e) = state.close(&mut ctx) {
                warn!(target: "state", "Closing {} failed: {}", state.name(), e);
                if first_error.is_none() {
                    first_error = Some(EngineError::hook(state.name(), Phase::Close, frame, e));
                }
            }
        }

        self.pending.clear();
        first_error.map_or(Ok(()), Err)
    }

    //--- Query API --------------------------------------------------------

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The active (top) state.
    pub fn top(&self) -> Option<&dyn State> {
        self.stack.last().map(|s| s.as_ref())
    }

    /// State names, bottom to top.
    pub fn names(&self) -> Vec<&str> {
        self.stack.iter().map(|s| s.name()).collect()
    }

    /// Number of states visited by update and render this frame.
    pub fn active_len(&self) -> usize {
        self.stack.len() - self.active_start()
    }

    //--- Internal Helpers -------------------------------------------------

    /// Index of the lowest state in the active window.
    ///
    /// The window starts at the topmost opaque state.
    fn active_start(&self) -> usize {
        self.stack
            .iter()
            .rposition(|s| !s.is_transparent())
            .unwrap_or(0)
    }
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
