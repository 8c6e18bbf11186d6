//=========================================================================
// Renderer Bucket
//=========================================================================
//
// Collects draw closures for one render pass and runs them by plane.
//
// Planes drain in ascending order. Within a plane, closures run in the
// order they were queued. A bucket is created empty for each pass and is
// empty again once `flush()` returns.
//
// Re-entrancy: a running closure receives the bucket and may queue more
// work. Each plane slot is detached from the map before it drains, so
// work queued into the draining plane (or any lower plane) lands in a
// fresh slot that the flush loop picks up before it exits.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{BTreeMap, VecDeque};

use log::trace;

//=== Renderer ============================================================

/// A queued draw operation.
///
/// Receives the bucket being flushed so it can queue follow-up work.
pub type Renderer = Box<dyn FnOnce(&mut RendererBucket)>;

//=== RendererBucket ======================================================

/// Plane-ordered queue of draw operations.
#[derive(Default)]
pub struct RendererBucket {
    planes: BTreeMap<i32, VecDeque<Renderer>>,
}

impl RendererBucket {
    /// Creates an empty bucket.
    pub fn new() -> Self {
        Self {
            planes: BTreeMap::new(),
        }
    }

    //--- Queueing ---------------------------------------------------------

    /// Queues `renderer` on `plane`. Any `i32` is a valid plane.
    pub fn put<F>(&mut self, plane: i32, renderer: F)
    where
        F: FnOnce(&mut RendererBucket) + 'static,
    {
        self.planes
            .entry(plane)
            .or_default()
            .push_back(Box::new(renderer));
    }

    //--- Flushing ---------------------------------------------------------

    /// Runs every queued renderer, lowest plane first, and empties the bucket.
    ///
    /// Returns the number of renderers invoked.
    pub fn flush(&mut self) -> usize {
        let mut invoked = 0;

        while let Some((plane, mut slot)) = self.planes.pop_first() {
            trace!(target: "render", "Draining plane {} ({} queued)", plane, slot.len());

            while let Some(renderer) = slot.pop_front() {
                renderer(self);
                invoked += 1;
            }
        }

        invoked
    }

    //--- Query API --------------------------------------------------------

    /// Number of renderers currently queued across all planes.
    pub fn len(&self) -> usize {
        self.planes.values().map(VecDeque::len).sum()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Number of planes with queued work.
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }
}

//=========================================================================
// Tests
//=========================================================================
