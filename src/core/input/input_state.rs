//=========================================================================
// Input State
//=========================================================================
//
// Per-frame input snapshot stored in the ComponentRegistry.
//
// Architecture:
//   InputEvent → apply() → HashSet (keys/buttons held) → query
//
// Frame lifecycle: begin_frame() → apply()* → end_frame() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputState ==========================================================

/// Held keys and buttons plus this frame's transitions.
///
/// The engine inserts one into the registry at build time; input sources
/// update it at the start of every frame, before any state updates.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: (f32, f32),
    modifiers: Modifiers,
    close_requested: bool,

    //--- Frame Deltas (reset by begin_frame) ------------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    mouse_delta: (f32, f32),
    last_mouse_position: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears the per-frame deltas.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.last_mouse_position = self.mouse_position;
    }

    /// Folds one event into the snapshot.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = modifiers;
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }

            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = modifiers;
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }

            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = modifiers;
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }

            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = modifiers;
                if self.buttons_down.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }

            InputEvent::MouseMoved { x, y } => {
                self.mouse_position = (x, y);
            }

            InputEvent::CloseRequested => {
                trace!(target: "input", "Close requested");
                self.close_requested = true;
            }
        }
    }

    /// Computes the mouse delta for the frame.
    pub fn end_frame(&mut self) {
        self.mouse_delta = (
            self.mouse_position.0 - self.last_mouse_position.0,
            self.mouse_position.1 - self.last_mouse_position.1,
        );
    }

    /// Acknowledges a close request so it is not seen again.
    pub fn clear_close_request(&mut self) {
        self.close_requested = false;
    }

    //--- Query API - Keyboard ---------------------------------------------

    /// Returns `true` only on the frame the key went down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `true` only on the frame the key went up.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    //--- Query API - Mouse ------------------------------------------------

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Movement since the previous frame, `(0, 0)` when still.
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    //--- Query API - Misc -------------------------------------------------

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Returns `true` once a close request arrived, until acknowledged.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
