//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Narrow seams between the run loop and the outside world.
//
// Architecture:
// ```text
//  Backend thread(s):               Loop thread:
//  ┌──────────────────────┐        ┌──────────────────────────┐
//  │  window / replay /   │        │  Engine::step()          │
//  │  test harness        │        │   ├─ Timer::start()      │
//  │   ↓                  │        │   ├─ InputSource::poll() │
//  │  Sender<InputEvent> ─┼────────┼─► │  (EventPump)         │
//  └──────────────────────┘        │   ├─ update / render     │
//                                  │   ├─ Screen::present()   │
//                                  │   └─ Timer::finish()     │
//                                  └──────────────────────────┘
// ```
//
// The loop never blocks on a backend. Input is drained with try_recv,
// the screen only gets a present() call, and pacing lives in the Timer.
//
//=========================================================================

//=== Module Declarations =================================================

mod event_pump;
mod screen;
mod timer;

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::registry::ComponentRegistry;

//=== Public API ==========================================================

pub use event_pump::EventPump;
pub use screen::HeadlessScreen;
pub use timer::{FrameTimer, ManualTimer};

//=== Timer ===============================================================

/// Frame clock. `start()` and `finish()` are each called once per frame.
pub trait Timer {
    /// Marks the beginning of a frame.
    fn start(&mut self);

    /// Marks the end of a frame, sleeping if the timer paces the loop.
    fn finish(&mut self);

    /// Duration of the most recently finished frame.
    fn delta(&self) -> Duration;
}

//=== Screen ==============================================================

/// Presentation target, flipped once per frame after every render.
pub trait Screen {
    fn present(&mut self);
}

//=== InputSource =========================================================

/// Something that feeds input into the registry once per frame.
///
/// `poll` must not block.
pub trait InputSource {
    fn poll(&mut self, components: &mut ComponentRegistry);
}
