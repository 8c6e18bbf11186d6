//=========================================================================
// Event Pump
//=========================================================================
//
// Channel-fed input source with bounded, non-blocking draining.
//
// Architecture:
//   Sender<InputEvent> → Receiver → poll() → InputState (registry)
//
// Bounded draining keeps a flooded channel from starving the frame;
// the rest of the backlog is picked up next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::InputSource;
use crate::core::input::{InputEvent, InputState};
use crate::core::registry::ComponentRegistry;

//=== EventPump ===========================================================

/// Drains [`InputEvent`]s from a channel into the registry's [`InputState`].
pub struct EventPump {
    receiver: Receiver<InputEvent>,
    disconnected: bool,
}

impl EventPump {
    /// Upper bound on events applied in a single poll.
    pub const MAX_EVENTS_PER_FRAME: usize = 256;

    pub fn new(receiver: Receiver<InputEvent>) -> Self {
        Self {
            receiver,
            disconnected: false,
        }
    }

    /// Creates a pump over a fresh unbounded channel.
    pub fn channel() -> (Sender<InputEvent>, Self) {
        let (tx, rx) = unbounded();
        (tx, Self::new(rx))
    }

    /// Returns `true` once every sender has been dropped and the queue is empty.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Applies up to [`MAX_EVENTS_PER_FRAME`](Self::MAX_EVENTS_PER_FRAME)
    /// queued events to `input`, returning how many were applied.
    pub fn drain_into(&mut self, input: &mut InputState) -> usize {
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    input.apply(&event);
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        debug!(target: "input", "Input channel disconnected");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }

        let left = self.backlog();
        if left > 0 {
            warn!(target: "input", "Input backlog: {} events left after draining {}", left, drained);
        }

        drained
    }

    /// Events still queued in the channel.
    pub fn backlog(&self) -> usize {
        self.receiver.len()
    }
}

impl InputSource for EventPump {
    fn poll(&mut self, components: &mut ComponentRegistry) {
        let input = components.get_or_default::<InputState>();
        self.drain_into(input);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
