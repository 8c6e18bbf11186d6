//=========================================================================
// Object Collection
//=========================================================================
//
// Ordered roots of a state's object forest.
//
// Update never changes the collection's shape. Render is the only pass
// that removes nodes: flagged roots and children are destroyed and
// dropped there, then the pass's draw work is flushed by plane.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::ObjectNode;
use crate::core::error::HookResult;
use crate::core::render::RendererBucket;
use crate::core::state::{Context, WakeArgs};

//=== ObjectCollection ====================================================

/// Root nodes owned by a [`ContainerState`](super::ContainerState).
#[derive(Debug, Default)]
pub struct ObjectCollection {
    roots: Vec<ObjectNode>,
}

impl ObjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Membership -------------------------------------------------------

    /// Appends a root node.
    pub fn add(&mut self, node: ObjectNode) {
        trace!(target: "object", "Adding root {}", node.name());
        self.roots.push(node);
    }

    /// Number of root nodes, destroyed ones included until the next render.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectNode> {
        self.roots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ObjectNode> {
        self.roots.iter_mut()
    }

    //--- Passes -----------------------------------------------------------

    /// Updates every live root and its live descendants.
    pub fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
        for root in &mut self.roots {
            root.update_tree(ctx)?;
        }
        Ok(())
    }

    /// Evicts destroyed roots, renders the rest, then flushes the bucket.
    pub fn render(&mut self, ctx: &mut Context<'_>) -> HookResult {
        let mut bucket = RendererBucket::new();

        let mut i = 0;
        while i < self.roots.len() {
            if self.roots[i].is_destroyed() {
                let mut evicted = self.roots.remove(i);
                debug!(target: "object", "Evicting root {}", evicted.name());
                evicted.destroy_tree(ctx)?;
            } else {
                self.roots[i].render_tree(ctx, &mut bucket)?;
                i += 1;
            }
        }

        let drawn = bucket.flush();
        trace!(target: "render", "Flushed {} renderers for {} roots", drawn, self.roots.len());

        Ok(())
    }

    /// Forwards wakeup arguments to every node.
    pub fn wakeup(&mut self, ctx: &mut Context<'_>, args: &WakeArgs) -> HookResult {
        for root in &mut self.roots {
            root.wakeup_tree(ctx, args)?;
        }
        Ok(())
    }

    /// Destroys every node and empties the collection.
    ///
    /// Every root is destroyed even if one fails; the first error is returned.
    pub fn close(&mut self, ctx: &mut Context<'_>) -> HookResult {
        let mut first_error = None;

        for mut root in self.roots.drain(..) {
            if let Err(e) = root.destroy_tree(ctx) {
                warn!(target: "object", "Destroying {} failed: {}", root.name(), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

//=========================================================================
// Tests
//=========================================================================
