//=========================================================================
// Strata Engine
//=========================================================================
//
// Run loop and builder.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  step() until Exit
//         │                          │
//         ├─ with_settings()         ├─ StateStack
//         ├─ with_timer()            ├─ ComponentRegistry
//         ├─ with_screen()           ├─ Timer / Screen
//         ├─ with_input_source()     └─ InputSources
//         ├─ with_component()
//         └─ with_initial_state()
// ```
//
// One frame:
//   timer.start → poll inputs → update_all → render_all → present
//     → timer.finish → commit → (Exit if the stack is empty)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use crate::config::Settings;
use crate::core::error::{ConfigError, EngineError};
use crate::core::error_log;
use crate::core::input::InputState;
use crate::core::registry::ComponentRegistry;
use crate::core::state::{State, StateStack};
use crate::platform::{FrameTimer, HeadlessScreen, InputSource, Screen, Timer};

//=== TickControl =========================================================

/// Loop control signal returned by [`Engine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== RunReport ===========================================================

/// Summary of a completed [`Engine::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Frames executed, including the one whose commit emptied the stack.
    pub frames: u64,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Settings**: [`Settings::default`]
/// - **Timer**: [`FrameTimer`] at `settings.target_fps`
/// - **Screen**: [`HeadlessScreen`] sized from the settings
/// - **Input sources**: none
///
/// # Examples
///
/// ```no_run
/// use strata_engine::prelude::*;
///
/// struct Splash;
///
/// impl State for Splash {
///     fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
///         if ctx.frame() == 180 {
///             ctx.pop();
///         }
///         Ok(())
///     }
///
///     fn render(&mut self, _ctx: &mut Context<'_>) -> HookResult {
///         Ok(())
///     }
/// }
///
/// let mut engine = EngineBuilder::new()
///     .with_initial_state(Splash)
///     .build()?;
/// let report = engine.run()?;
/// assert_eq!(report.frames, 181);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EngineBuilder {
    settings: Settings,
    timer: Option<Box<dyn Timer>>,
    screen: Option<Box<dyn Screen>>,
    inputs: Vec<Box<dyn InputSource>>,
    components: ComponentRegistry,
    initial: Option<Box<dyn State>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            timer: None,
            screen: None,
            inputs: Vec::new(),
            components: ComponentRegistry::new(),
            initial: None,
        }
    }

    /// Replaces the settings. They are validated in [`build`](Self::build).
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the default [`FrameTimer`].
    pub fn with_timer(mut self, timer: impl Timer + 'static) -> Self {
        self.timer = Some(Box::new(timer));
        self
    }

    /// Replaces the default [`HeadlessScreen`].
    pub fn with_screen(mut self, screen: impl Screen + 'static) -> Self {
        self.screen = Some(Box::new(screen));
        self
    }

    /// Adds an input source, polled once per frame in registration order.
    pub fn with_input_source(mut self, source: impl InputSource + 'static) -> Self {
        self.inputs.push(Box::new(source));
        self
    }

    /// Inserts a component into the registry shared with every hook.
    pub fn with_component<T: 'static>(mut self, component: T) -> Self {
        self.components.insert(component);
        self
    }

    /// Sets the state the stack starts with.
    ///
    /// # Panics
    ///
    /// Panics if an initial state was already set.
    pub fn with_initial_state(mut self, state: impl State + 'static) -> Self {
        assert!(self.initial.is_none(), "Initial state already set");
        self.initial = Some(Box::new(state));
        self
    }

    /// Validates the configuration and produces a ready [`Engine`].
    ///
    /// A failure is logged and appended to `<root_path>/ErrorLog.txt`
    /// before it is returned.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoInitialState`] if no initial state was given
    /// - [`ConfigError::InvalidWindowSize`] / [`ConfigError::InvalidFrameRate`]
    ///   for out-of-range settings
    pub fn build(self) -> Result<Engine, ConfigError> {
        let root_path = self.settings.root_path.clone();

        self.assemble().map_err(|e| {
            error!("Engine build failed: {}", e);
            error_log::record(&root_path, &e);
            e
        })
    }

    fn assemble(self) -> Result<Engine, ConfigError> {
        let settings = self.settings.validate()?;
        let initial = self.initial.ok_or(ConfigError::NoInitialState)?;

        info!(
            "Building engine ({}, {}x{} @ {} fps, {} input sources)",
            settings.window_title,
            settings.window_width,
            settings.window_height,
            settings.target_fps,
            self.inputs.len()
        );

        let timer = self
            .timer
            .unwrap_or_else(|| Box::new(FrameTimer::new(settings.target_fps)));
        let screen = self.screen.unwrap_or_else(|| {
            Box::new(HeadlessScreen::new(
                settings.window_title.clone(),
                settings.window_width,
                settings.window_height,
            ))
        });

        let mut components = self.components;
        let root_path = settings.root_path.clone();
        components.insert(settings);
        components.get_or_default::<InputState>();

        Ok(Engine {
            stack: StateStack::with_initial(initial),
            components,
            timer,
            screen,
            inputs: self.inputs,
            root_path,
            frame: 0,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Strata Engine runtime.
///
/// Owns the state stack and drives it one frame per [`step`](Self::step)
/// until the stack is empty. Create via [`EngineBuilder`].
pub struct Engine {
    stack: StateStack,
    components: ComponentRegistry,
    timer: Box<dyn Timer>,
    screen: Box<dyn Screen>,
    inputs: Vec<Box<dyn InputSource>>,
    root_path: PathBuf,
    frame: u64,
}

impl Engine {
    //--- Execution --------------------------------------------------------

    /// Runs frames until the stack empties or a hook fails.
    ///
    /// A failure is logged, appended to `<root_path>/ErrorLog.txt` and
    /// returned. States left on the stack are not closed; call
    /// [`shutdown`](Self::shutdown) for that.
    pub fn run(&mut self) -> Result<RunReport, EngineError> {
        info!("Starting run loop ({} states)", self.stack.len());
        let first_frame = self.frame;

        loop {
            match self.step() {
                Ok(TickControl::Continue) => {}
                Ok(TickControl::Exit) => break,
                Err(e) => {
                    error!("Run loop aborted: {}", e);
                    error_log::record(&self.root_path, &e);
                    return Err(e);
                }
            }
        }

        let report = RunReport {
            frames: self.frame - first_frame,
        };
        info!("Run loop finished after {} frames", report.frames);
        Ok(report)
    }

    /// Runs exactly one frame.
    ///
    /// Returns [`TickControl::Exit`] once the stack is empty, either
    /// because this frame's commit emptied it or because it already was.
    ///
    /// If an update or render hook fails, the transition requested during
    /// that frame is dropped and the frame counter does not advance.
    pub fn step(&mut self) -> Result<TickControl, EngineError> {
        if self.stack.is_empty() {
            return Ok(TickControl::Exit);
        }

        let frame = self.frame;

        //--- 1. Frame start ------------------------------------------------
        self.timer.start();
        let delta = self.timer.delta();

        //--- 2. Input -----------------------------------------------------
        self.poll_inputs();

        //--- 3. Update and render -----------------------------------------
        if let Err(e) = self.run_passes(delta, frame) {
            // The aborted frame never reaches its commit.
            self.stack.discard_pending();
            return Err(e);
        }
        self.screen.present();

        //--- 4. Frame end -------------------------------------------------
        self.timer.finish();

        //--- 5. Commit ----------------------------------------------------
        if let Some(kind) = self.stack.commit(&mut self.components, delta, frame)? {
            debug!("Frame {}: committed {} (depth {})", frame, kind, self.stack.len());
        }

        self.frame += 1;

        if self.stack.is_empty() {
            info!("State stack empty after frame {}", frame);
            Ok(TickControl::Exit)
        } else {
            Ok(TickControl::Continue)
        }
    }

    /// Closes every state still on the stack, top first.
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        if !self.stack.is_empty() {
            info!("Shutting down with {} states on the stack", self.stack.len());
        }
        self.stack.close_all(&mut self.components, self.frame)
    }

    //--- Query API --------------------------------------------------------

    /// Frames executed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_running(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    /// Mutable stack access, for requesting transitions between frames.
    pub fn stack_mut(&mut self) -> &mut StateStack {
        &mut self.stack
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    //--- Internal Helpers -------------------------------------------------

    fn run_passes(&mut self, delta: Duration, frame: u64) -> Result<(), EngineError> {
        self.stack.update_all(&mut self.components, delta, frame)?;
        self.stack.render_all(&mut self.components, delta, frame)
    }

    fn poll_inputs(&mut self) {
        self.components.get_or_default::<InputState>().begin_frame();

        for source in &mut self.inputs {
            source.poll(&mut self.components);
        }

        self.components.get_or_default::<InputState>().end_frame();
        trace!(target: "input", "Polled {} input sources", self.inputs.len());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{HookResult, Phase};
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::state::Context;
    use crate::platform::{EventPump, ManualTimer};
    use std::cell::Cell;
    use std::rc::Rc;

    //--- Test Doubles -----------------------------------------------------

    #[derive(Default)]
    struct Calls {
        starts: Cell<u32>,
        finishes: Cell<u32>,
        presents: Cell<u32>,
        updates: Cell<u32>,
    }

    struct SharedTimer(Rc<Calls>);

    impl Timer for SharedTimer {
        fn start(&mut self) {
            self.0.starts.set(self.0.starts.get() + 1);
        }

        fn finish(&mut self) {
            self.0.finishes.set(self.0.finishes.get() + 1);
        }

        fn delta(&self) -> Duration {
            Duration::from_millis(16)
        }
    }

    struct SharedScreen(Rc<Calls>);

    impl Screen for SharedScreen {
        fn present(&mut self) {
            self.0.presents.set(self.0.presents.get() + 1);
        }
    }

    /// Pops itself during update number `pop_at` (1-based).
    struct Countdown {
        calls: Rc<Calls>,
        pop_at: u32,
    }

    impl State for Countdown {
        fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
            let n = self.calls.updates.get() + 1;
            self.calls.updates.set(n);
            if n == self.pop_at {
                ctx.pop();
            }
            Ok(())
        }

        fn render(&mut self, _ctx: &mut Context<'_>) -> HookResult {
            Ok(())
        }
    }

    fn countdown_engine(pop_at: u32) -> (Engine, Rc<Calls>) {
        let calls = Rc::new(Calls::default());
        let engine = EngineBuilder::new()
            .with_timer(SharedTimer(Rc::clone(&calls)))
            .with_screen(SharedScreen(Rc::clone(&calls)))
            .with_initial_state(Countdown {
                calls: Rc::clone(&calls),
                pop_at,
            })
            .build()
            .unwrap();
        (engine, calls)
    }

    //--- Builder ----------------------------------------------------------

    fn rooted_at(dir: &tempfile::TempDir) -> Settings {
        Settings {
            root_path: dir.path().to_path_buf(),
            ..Settings::default()
        }
    }

    #[test]
    fn build_without_initial_state_fails_and_writes_error_log() {
        let dir = tempfile::tempdir().unwrap();

        let result = EngineBuilder::new().with_settings(rooted_at(&dir)).build();

        assert!(matches!(result, Err(ConfigError::NoInitialState)));
        let log = std::fs::read_to_string(dir.path().join("ErrorLog.txt")).unwrap();
        assert!(log.contains("First game state not defined"));
    }

    #[test]
    fn build_rejects_invalid_settings() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(Calls::default());
        let settings = Settings {
            target_fps: 0.0,
            ..rooted_at(&dir)
        };

        let result = EngineBuilder::new()
            .with_settings(settings)
            .with_initial_state(Countdown { calls, pop_at: 1 })
            .build();

        assert!(matches!(result, Err(ConfigError::InvalidFrameRate(_))));
        let log = std::fs::read_to_string(dir.path().join("ErrorLog.txt")).unwrap();
        assert!(log.contains("Invalid target frame rate"));
    }

    #[test]
    fn successful_build_leaves_no_error_log() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(Calls::default());

        EngineBuilder::new()
            .with_settings(rooted_at(&dir))
            .with_timer(ManualTimer::default())
            .with_initial_state(Countdown { calls, pop_at: 1 })
            .build()
            .unwrap();

        assert!(!dir.path().join("ErrorLog.txt").exists());
    }

    #[test]
    #[should_panic(expected = "Initial state already set")]
    fn second_initial_state_panics() {
        let calls = Rc::new(Calls::default());
        EngineBuilder::new()
            .with_initial_state(Countdown {
                calls: Rc::clone(&calls),
                pop_at: 1,
            })
            .with_initial_state(Countdown { calls, pop_at: 1 });
    }

    #[test]
    fn build_registers_settings_input_and_components() {
        let calls = Rc::new(Calls::default());
        let engine = EngineBuilder::new()
            .with_timer(ManualTimer::default())
            .with_component(42u32)
            .with_initial_state(Countdown { calls, pop_at: 1 })
            .build()
            .unwrap();

        assert!(engine.components().contains::<Settings>());
        assert!(engine.components().contains::<InputState>());
        assert_eq!(engine.components().get::<u32>(), Some(&42));
        assert_eq!(engine.frame(), 0);
        assert!(engine.is_running());
    }

    //--- Run Loop ---------------------------------------------------------

    #[test]
    fn pop_in_first_update_runs_exactly_one_frame() {
        let (mut engine, calls) = countdown_engine(1);

        let report = engine.run().unwrap();

        assert_eq!(report.frames, 1);
        assert_eq!(calls.updates.get(), 1);
        assert!(!engine.is_running());
    }

    #[test]
    fn timer_and_screen_called_once_per_frame() {
        let (mut engine, calls) = countdown_engine(3);

        let report = engine.run().unwrap();

        assert_eq!(report.frames, 3);
        assert_eq!(calls.starts.get(), 3);
        assert_eq!(calls.finishes.get(), 3);
        assert_eq!(calls.presents.get(), 3);
    }

    #[test]
    fn step_reports_exit_and_stays_exited() {
        let (mut engine, calls) = countdown_engine(2);

        assert_eq!(engine.step().unwrap(), TickControl::Continue);
        assert_eq!(engine.step().unwrap(), TickControl::Exit);
        assert_eq!(engine.step().unwrap(), TickControl::Exit);

        assert_eq!(engine.frame(), 2);
        assert_eq!(calls.starts.get(), 2);
    }

    #[test]
    fn input_reaches_states_through_the_registry() {
        struct WaitForEscape;

        impl State for WaitForEscape {
            fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
                let escape = ctx
                    .components()
                    .get::<InputState>()
                    .map_or(false, |input| input.is_key_pressed(KeyCode::Escape));
                if escape {
                    ctx.pop();
                }
                Ok(())
            }

            fn render(&mut self, _ctx: &mut Context<'_>) -> HookResult {
                Ok(())
            }
        }

        let (tx, pump) = EventPump::channel();
        let mut engine = EngineBuilder::new()
            .with_timer(ManualTimer::default())
            .with_input_source(pump)
            .with_initial_state(WaitForEscape)
            .build()
            .unwrap();

        assert_eq!(engine.step().unwrap(), TickControl::Continue);
        assert_eq!(engine.step().unwrap(), TickControl::Continue);

        tx.send(InputEvent::key_down(KeyCode::Escape)).unwrap();
        assert_eq!(engine.step().unwrap(), TickControl::Exit);
        assert_eq!(engine.frame(), 3);
    }

    #[test]
    fn hook_failure_aborts_run_and_writes_error_log() {
        struct Crashes;

        impl State for Crashes {
            fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
                if ctx.frame() == 2 {
                    return Err("level data corrupt".into());
                }
                Ok(())
            }

            fn render(&mut self, _ctx: &mut Context<'_>) -> HookResult {
                Ok(())
            }

            fn name(&self) -> &str {
                "Crashes"
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut engine = EngineBuilder::new()
            .with_settings(rooted_at(&dir))
            .with_timer(ManualTimer::default())
            .with_initial_state(Crashes)
            .build()
            .unwrap();

        let err = engine.run().unwrap_err();

        assert!(matches!(
            err,
            EngineError::Hook { phase: Phase::Update, frame: 2, .. }
        ));
        assert_eq!(engine.frame(), 2);

        let log = std::fs::read_to_string(dir.path().join("ErrorLog.txt")).unwrap();
        assert!(log.contains("Crashes"));
        assert!(log.contains("level data corrupt"));
    }

    #[test]
    fn failed_frame_drops_its_pending_transition() {
        /// Requests a pop in update, then fails in render, once.
        struct Flaky {
            failed: bool,
            renders: Rc<Cell<u32>>,
        }

        impl State for Flaky {
            fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
                if !self.failed {
                    ctx.pop();
                }
                Ok(())
            }

            fn render(&mut self, _ctx: &mut Context<'_>) -> HookResult {
                self.renders.set(self.renders.get() + 1);
                if !self.failed {
                    self.failed = true;
                    return Err("lost the framebuffer".into());
                }
                Ok(())
            }
        }

        let renders = Rc::new(Cell::new(0));
        let mut engine = EngineBuilder::new()
            .with_timer(ManualTimer::default())
            .with_initial_state(Flaky {
                failed: false,
                renders: Rc::clone(&renders),
            })
            .build()
            .unwrap();

        let err = engine.step().unwrap_err();

        assert!(matches!(err, EngineError::Hook { phase: Phase::Render, frame: 0, .. }));
        assert_eq!(engine.stack().pending(), None);
        assert_eq!(engine.frame(), 0);

        assert_eq!(engine.step().unwrap(), TickControl::Continue);
        assert_eq!(engine.stack().len(), 1);
        assert_eq!(renders.get(), 2);
    }

    #[test]
    fn shutdown_closes_remaining_states() {
        struct Closes(Rc<Cell<bool>>);

        impl State for Closes {
            fn update(&mut self, _ctx: &mut Context<'_>) -> HookResult {
                Ok(())
            }

            fn render(&mut self, _ctx: &mut Context<'_>) -> HookResult {
                Ok(())
            }

            fn close(&mut self, _ctx: &mut Context<'_>) -> HookResult {
                self.0.set(true);
                Ok(())
            }
        }

        let closed = Rc::new(Cell::new(false));
        let mut engine = EngineBuilder::new()
            .with_timer(ManualTimer::default())
            .with_initial_state(Closes(Rc::clone(&closed)))
            .build()
            .unwrap();

        engine.step().unwrap();
        engine.shutdown().unwrap();

        assert!(closed.get());
        assert!(!engine.is_running());
        assert_eq!(engine.step().unwrap(), TickControl::Exit);
    }
}
