//! Pointer input normalization.
//!
//! Raw pointer events from the windowing layer are turned into the
//! left-button [`CanvasEvent`]s the gesture controller understands.

use kurbo::Point;
use std::collections::HashSet;
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Raw pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Left-button gesture step delivered to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    Press { position: Point, modifiers: Modifiers },
    Drag { position: Point },
    Release { position: Point },
    DoubleClick { position: Point },
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks buttons, modifiers and click timing across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last known pointer position.
    pub pointer_position: Point,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    pressed_buttons: HashSet<MouseButton>,
    last_click: Option<(Instant, Point)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Process a pointer event and return the canvas events it produces.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Vec<CanvasEvent> {
        self.handle_pointer_event_at(event, Instant::now())
    }

    fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) -> Vec<CanvasEvent> {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                if !self.pressed_buttons.insert(button) || button != MouseButton::Left {
                    return Vec::new();
                }
                let mut events = vec![CanvasEvent::Press {
                    position,
                    modifiers: self.modifiers,
                }];
                if self.register_click(position, now) {
                    events.push(CanvasEvent::DoubleClick { position });
                }
                events
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                if self.pressed_buttons.remove(&button) && button == MouseButton::Left {
                    vec![CanvasEvent::Release { position }]
                } else {
                    Vec::new()
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
                if self.is_button_pressed(MouseButton::Left) {
                    vec![CanvasEvent::Drag { position }]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Record a left click; returns true when it completes a double click.
    fn register_click(&mut self, position: Point, now: Instant) -> bool {
        if let Some((last_time, last_pos)) = self.last_click {
            let elapsed = now.duration_since(last_time).as_millis();
            if elapsed < DOUBLE_CLICK_TIME_MS && position.distance(last_pos) < DOUBLE_CLICK_DISTANCE {
                // A third click starts a new sequence.
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((now, position));
        false
    }

    /// Forget pressed buttons, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.pressed_buttons.clear();
        self.last_click = None;
    }
}
