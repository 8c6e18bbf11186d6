//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use strata_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, RunReport, TickControl};
pub use crate::config::Settings;

// States and transitions
pub use crate::core::state::{ArgValue, Context, State, StateStack, TransitionKind, WakeArgs};

// Game objects
pub use crate::core::object::{ContainerState, GameObject, ObjectCollection, ObjectContext, ObjectNode};

// Rendering
pub use crate::core::render::RendererBucket;

// Shared components and input
pub use crate::core::input::{InputEvent, InputState, KeyCode, Modifiers, MouseButton};
pub use crate::core::registry::ComponentRegistry;

// Errors
pub use crate::core::error::{ConfigError, EngineError, HookError, HookResult};

// Platform seams
pub use crate::platform::{EventPump, FrameTimer, HeadlessScreen, InputSource, ManualTimer, Screen, Timer};
