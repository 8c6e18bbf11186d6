//=========================================================================
// Render System
//=========================================================================
//
// Per-pass draw batching.
//
// Architecture:
//   ObjectNode::render() → put(plane, renderer) → BTreeMap<i32, VecDeque>
//                                                      ↓
//   ObjectCollection::render() ──────────────→ flush() (low plane first)
//
//=========================================================================

//=== Module Declarations =================================================

mod renderer_bucket;

//=== Public API ==========================================================

pub use renderer_bucket::{Renderer, RendererBucket};
