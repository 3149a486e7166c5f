/// Pointer button that started a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button / single touch: orbit.
    Primary,
    /// Middle button: dolly.
    Auxiliary,
    /// Right mouse button: pan.
    Secondary,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Canvas input events the camera controls understand.
/// Coordinates are CSS pixels relative to the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, button: PointerButton },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// Wheel scroll; negative `delta_y` scrolls up (zoom in).
    Wheel { delta_y: f32 },
}

/// A queue of input events.
/// Canvas listeners push events; the scene drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0, button: PointerButton::Primary });
        q.push(InputEvent::Wheel { delta_y: -100.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn dom_button_mapping() {
        assert_eq!(PointerButton::from_dom(0), PointerButton::Primary);
        assert_eq!(PointerButton::from_dom(1), PointerButton::Auxiliary);
        assert_eq!(PointerButton::from_dom(2), PointerButton::Secondary);
        assert_eq!(PointerButton::from_dom(4), PointerButton::Primary);
    }
}
