//! # ludus_input
//!
//! Input backend for the ludus engine: a shared pressed-key set fed by
//! the host (window events, a replay file, tests) and polled
//! synchronously by gameplay components as joystick-style axes.

use std::collections::HashSet;

use parking_lot::RwLock;

/// The keys the engine cares about. Key codes are layout-independent
/// positions, so the W/S pair works the same on QWERTY and AZERTY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `KeyW` — player 0 up.
    W,
    /// `KeyS` — player 0 down.
    S,
    /// `ArrowUp` — player 1 up.
    Up,
    /// `ArrowDown` — player 1 down.
    Down,
}

/// Current keyboard state, shared between the host event loop that feeds
/// it and the components that poll it.
#[derive(Debug, Default)]
pub struct InputState {
    pressed: RwLock<HashSet<Key>>,
}

impl InputState {
    /// Create a state with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as held down.
    pub fn press(&self, key: Key) {
        self.pressed.write().insert(key);
    }

    /// Mark `key` as released.
    pub fn release(&self, key: Key) {
        self.pressed.write().remove(&key);
    }

    /// Returns `true` while `key` is held down.
    #[must_use]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.read().contains(&key)
    }

    /// Vertical axis for `player`, in `{-1.0, 0.0, 1.0}`.
    ///
    /// Player 0 reads the W/S pair, player 1 the arrow pair. Up is
    /// negative: the axis is in screen coordinates, where y grows
    /// downward. Unknown player ids read as centred.
    #[must_use]
    pub fn axis_y(&self, player: u32) -> f32 {
        let (up, down) = match player {
            0 => (Key::W, Key::S),
            1 => (Key::Up, Key::Down),
            _ => return 0.0,
        };
        if self.is_pressed(up) {
            -1.0
        } else if self.is_pressed(down) {
            1.0
        } else {
            0.0
        }
    }
}
