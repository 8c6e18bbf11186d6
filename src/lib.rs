//=========================================================================
// Strata Engine ─ Library Root
//
// Run loop and state management core for small 2D games.
//
// Responsibilities:
// - Drive a stack of game states through a fixed update/render cycle
// - Apply stack transitions at a single commit point per frame
// - Own per-state object trees with lazy destruction
// - Batch draw work into planes flushed in ascending order
//
// Typical usage:
// ```no_run
// use strata_engine::prelude::*;
//
// let mut engine = EngineBuilder::new()
//     .with_initial_state(ContainerState::new("Title"))
//     .build()?;
// engine.run()?;
// # Ok::<(), Box<dyn std::error::Error>>(())
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the state stack, object trees, renderer bucket, registry
// and input snapshot. `platform` holds the Timer / Screen / InputSource
// seams and their default implementations. `config` holds Settings.
//
pub mod config;
pub mod core;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, RunReport, TickControl};
