//=========================================================================
// Input
//=========================================================================
//
// Portable input events and the per-frame snapshot states read.
//
// Architecture:
//   InputSource (platform) → InputEvent → InputState (registry)
//
// States read input through the registry:
//   ctx.components().get::<InputState>()
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod input_state;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use input_state::InputState;
