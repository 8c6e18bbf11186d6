//=========================================================================
// Core Systems
//=========================================================================
//
// Everything the run loop drives, independent of any platform backend.
//
// Components:
// - `state`: State trait, hook Context, StateStack with deferred commits
// - `object`: GameObject trees and the ContainerState that owns them
// - `render`: plane-ordered RendererBucket
// - `registry`: type-keyed ComponentRegistry shared with every hook
// - `input`: portable input events and the per-frame InputState
// - `error`: error taxonomy of the loop
// - `error_log`: ErrorLog.txt writer for fatal run errors
//
//=========================================================================

//=== Module Declarations =================================================

pub mod error;
pub mod error_log;
pub mod input;
pub mod object;
pub mod registry;
pub mod render;
pub mod state;

//=== Public API ==========================================================

pub use error::{ConfigError, EngineError, HookError, HookResult, Phase};
pub use object::{ContainerState, GameObject, ObjectCollection, ObjectContext, ObjectNode};
pub use registry::ComponentRegistry;
pub use render::RendererBucket;
pub use state::{Context, State, StateStack, TransitionKind, WakeArgs};
