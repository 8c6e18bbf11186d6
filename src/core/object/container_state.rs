//=========================================================================
// Container State
//=========================================================================
//
// A ready-made State that owns an ObjectCollection and forwards every
// hook to it.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{ObjectCollection, ObjectNode};
use crate::core::error::HookResult;
use crate::core::state::{Context, State, WakeArgs};

//=== ContainerState ======================================================

/// A [`State`] whose behaviour is entirely its game objects.
///
/// - `update` / `render` / `wakeup` forward to the [`ObjectCollection`]
/// - `close` destroys every object
#[derive(Debug)]
pub struct ContainerState {
    name: String,
    objects: ObjectCollection,
    transparent: bool,
}

impl ContainerState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: ObjectCollection::new(),
            transparent: true,
        }
    }

    /// Builder-style root insertion.
    pub fn with_object(mut self, node: ObjectNode) -> Self {
        self.objects.add(node);
        self
    }

    /// Hides every state below this one while it is on the stack.
    pub fn opaque(mut self) -> Self {
        self.transparent = false;
        self
    }

    pub fn add(&mut self, node: ObjectNode) {
        self.objects.add(node);
    }

    pub fn objects(&self) -> &ObjectCollection {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectCollection {
        &mut self.objects
    }
}

impl State for ContainerState {
    fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
        self.objects.update(ctx)
    }

    fn render(&mut self, ctx: &mut Context<'_>) -> HookResult {
        self.objects.render(ctx)
    }

    fn wakeup(&mut self, ctx: &mut Context<'_>, args: &WakeArgs) -> HookResult {
        self.objects.wakeup(ctx, args)
    }

    fn close(&mut self, ctx: &mut Context<'_>) -> HookResult {
        self.objects.close(ctx)
    }

    fn is_transparent(&self) -> bool {
        self.transparent
    }

    fn name(&self) -> &str {
        &self.name
    }
}

//=========================================================================
// Tests
//=========================================================================
