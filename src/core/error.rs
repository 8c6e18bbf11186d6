//=========================================================================
// Engine Errors
//=========================================================================
//
// Error taxonomy for the run loop.
//
//   ConfigError  ── fatal before the first frame (bad settings, no state)
//   EngineError  ── fatal during the loop (hook failure, broken stack)
//   HookError    ── whatever a state or game object hook returns
//
// Nothing here is retried. A failing hook aborts the frame, and the
// frame aborts the loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use thiserror::Error;

//=== Hook Results ========================================================

/// Error type returned by state and game object hooks.
///
/// Boxed so game code can bubble up any error with `?`.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by state and game object hooks.
pub type HookResult = Result<(), HookError>;

//=== Phase ===============================================================

/// The hook that was running when an error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Update,
    Render,
    Wakeup,
    Close,
    Destroy,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Update => "update",
            Self::Render => "render",
            Self::Wakeup => "wakeup",
            Self::Close => "close",
            Self::Destroy => "destroy",
        };
        f.write_str(name)
    }
}

//=== ConfigError =========================================================

/// Errors detected while validating settings or wiring the engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The builder was finished without an initial state.
    #[error("First game state not defined")]
    NoInitialState,

    /// Window dimensions must both be non-zero.
    #[error("Invalid window size: {width}x{height}")]
    InvalidWindowSize { width: u32, height: u32 },

    /// Target frame rate must be finite and positive.
    #[error("Invalid target frame rate: {0}")]
    InvalidFrameRate(f64),

    /// Settings file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

//=== EngineError =========================================================

/// Fatal errors raised while the run loop executes.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration was rejected before the loop started.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A state or game object hook returned an error.
    #[error("{phase} hook of state `{state}` failed in frame {frame}: {source}")]
    Hook {
        state: String,
        phase: Phase,
        frame: u64,
        #[source]
        source: HookError,
    },

    /// A transition that needs a top state was committed on an empty stack.
    #[error("Cannot {op} with an empty state stack")]
    EmptyStack { op: &'static str },
}

impl EngineError {
    pub(crate) fn hook(state: &str, phase: Phase, frame: u64, source: HookError) -> Self {
        Self::Hook {
            state: state.to_string(),
            phase,
            frame,
            source,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
