//=========================================================================
// Object System
//=========================================================================
//
// Trees of game objects owned by a state, with deferred destruction.
//
// Architecture:
//   ContainerState
//     └─ ObjectCollection
//          └─ roots: Vec<ObjectNode>
//               └─ children: Vec<ObjectNode> ...
//
// Flow:
//   update()  → skip destroyed subtrees, update the rest (pre-order)
//   render()  → evict + destroy flagged nodes, render the rest,
//               then flush the pass's RendererBucket
//
// A destroy request only sets a flag. Nodes leave their collection
// during the next render walk, never while update is iterating.
//
//=========================================================================

//=== Module Declarations =================================================

mod container_state;
mod object_collection;
mod object_node;

//=== External Dependencies ===============================================

use std::ops::{Deref, DerefMut};

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::error::{HookError, HookResult, Phase};
use crate::core::render::RendererBucket;
use crate::core::state::{Context, WakeArgs};

//=== Public API ==========================================================

pub use container_state::ContainerState;
pub use object_collection::ObjectCollection;
pub use object_node::ObjectNode;

//=== GameObject Trait ====================================================

/// Behaviour of a node in an object tree.
///
/// ```rust
/// # use strata_engine::prelude::*;
/// struct Spark {
///     ttl: u32,
/// }
///
/// impl GameObject for Spark {
///     fn update(&mut self, ctx: &mut ObjectContext<'_, '_>) -> HookResult {
///         self.ttl = self.ttl.saturating_sub(1);
///         if self.ttl == 0 {
///             ctx.destroy();
///         }
///         Ok(())
///     }
///
///     fn render(&mut self, _ctx: &mut ObjectContext<'_, '_>, bucket: &mut RendererBucket) -> HookResult {
///         let ttl = self.ttl;
///         bucket.put(2, move |_| log::trace!("spark ttl {}", ttl));
///         Ok(())
///     }
/// }
/// ```
pub trait GameObject {
    /// Called each update pass while the node is not destroyed.
    fn update(&mut self, ctx: &mut ObjectContext<'_, '_>) -> HookResult;

    /// Called each render pass while the node is not destroyed.
    ///
    /// Draw work goes into `bucket`; it runs when the owning collection flushes.
    fn render(&mut self, ctx: &mut ObjectContext<'_, '_>, bucket: &mut RendererBucket) -> HookResult;

    /// Called when the owning state is woken by a pop, destroyed or not.
    fn wakeup(&mut self, _ctx: &mut ObjectContext<'_, '_>, _args: &WakeArgs) -> HookResult {
        Ok(())
    }

    /// Called exactly once when the node is evicted or its state closes.
    fn destroy(&mut self, _ctx: &mut Context<'_>) -> HookResult {
        Ok(())
    }

    /// Name used in logs and error reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

//=== ObjectContext =======================================================

/// The hook [`Context`] plus control over the node being visited.
///
/// Dereferences to [`Context`], so transition requests and component
/// access work the same as in state hooks.
pub struct ObjectContext<'c, 'f> {
    ctx: &'c mut Context<'f>,
    destroyed: &'c mut bool,
    children: &'c mut Vec<ObjectNode>,
}

impl<'c, 'f> ObjectContext<'c, 'f> {
    pub(crate) fn new(
        ctx: &'c mut Context<'f>,
        destroyed: &'c mut bool,
        children: &'c mut Vec<ObjectNode>,
    ) -> Self {
        Self {
            ctx,
            destroyed,
            children,
        }
    }

    /// Flags the current node (and its subtree) for destruction.
    pub fn destroy(&mut self) {
        *self.destroyed = true;
    }

    /// Returns true if the current node is flagged for destruction.
    pub fn is_destroyed(&self) -> bool {
        *self.destroyed
    }

    /// Adds a child under the current node.
    pub fn spawn(&mut self, child: ObjectNode) {
        self.children.push(child);
    }

    /// Number of direct children of the current node.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl<'c, 'f> Deref for ObjectContext<'c, 'f> {
    type Target = Context<'f>;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl<'c, 'f> DerefMut for ObjectContext<'c, 'f> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

//=== ObjectError =========================================================

/// A game object hook failed.
#[derive(Debug, Error)]
#[error("{phase} hook of object `{object}` failed: {source}")]
pub struct ObjectError {
    pub object: String,
    pub phase: Phase,
    #[source]
    pub source: HookError,
}

impl ObjectError {
    pub(crate) fn wrap(object: &str, phase: Phase, source: HookError) -> HookError {
        Box::new(Self {
            object: object.to_string(),
            phase,
            source,
        })
    }
}
