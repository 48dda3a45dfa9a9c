//! Pointer and keyboard input types for the interaction engine.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Any key that toggles selection or locks aspect/rotation.
    pub fn additive(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    DoubleClick {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::DoubleClick { position }
            | PointerEvent::Scroll { position, .. } => *position,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Character(char),
}

/// A key press with its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
    /// A text field outside the canvas has focus.
    pub text_field_focused: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            text_field_focused: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_field(mut self) -> Self {
        self.text_field_focused = true;
        self
    }

    /// Whether this is the given letter, case-insensitively.
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.key, Key::Character(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Turns primary-button presses into double-click events.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press; returns true when it completes a double click.
    pub fn register(&mut self, position: Point, now: Instant) -> bool {
        if let Some((time, pos)) = self.last {
            let close = (position - pos).hypot() < DOUBLE_CLICK_DISTANCE;
            if close && now.saturating_duration_since(time) < DOUBLE_CLICK_TIME {
                // Reset so a triple click is not reported twice
                self.last = None;
                return true;
            }
        }
        self.last = Some((now, position));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        assert!(!clicks.register(Point::new(10.0, 10.0), t0));
        assert!(clicks.register(Point::new(11.0, 10.0), t0 + Duration::from_millis(200)));
        // Third click starts a new sequence
        assert!(!clicks.register(Point::new(11.0, 10.0), t0 + Duration::from_millis(300)));
    }

    #[test]
    fn test_slow_or_distant_clicks() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        clicks.register(Point::new(10.0, 10.0), t0);
        assert!(!clicks.register(Point::new(10.0, 10.0), t0 + Duration::from_millis(900)));
        assert!(!clicks.register(Point::new(40.0, 10.0), t0 + Duration::from_millis(950)));
    }

    #[test]
    fn test_modifier_helpers() {
        assert!(Modifiers::CTRL.command());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.command());
        assert!(!Modifiers::ALT.additive());
        assert!(KeyInput::new(Key::Character('Z')).is_char('z'));
    }
}
