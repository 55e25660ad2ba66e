use winit::event::{ElementState, WindowEvent};

/// The window events that matter for dismissal, stripped of device ids and
/// platform data so the rules can be checked without a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserInput {
    Close,
    Key(ElementState),
    Button(ElementState),
    Wheel,
    CursorMoved { x: f64, y: f64 },
}

impl UserInput {
    /// `None` for events that are not user input (resize, redraw, ...).
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CloseRequested => Some(Self::Close),
            WindowEvent::KeyboardInput { event, .. } => Some(Self::Key(event.state)),
            WindowEvent::MouseInput { state, .. } => Some(Self::Button(*state)),
            WindowEvent::MouseWheel { .. } => Some(Self::Wheel),
            WindowEvent::CursorMoved { position, .. } => Some(Self::CursorMoved {
                x: position.x,
                y: position.y,
            }),
            _ => None,
        }
    }
}

/// Decides when user input counts as waking the screen.
///
/// Most platforms report a cursor position as soon as the window appears
/// under the pointer. That first report only sets the anchor; the saver is
/// dismissed once the pointer moves further than `tolerance` from it.
#[derive(Debug, Clone)]
pub struct DismissGuard {
    anchor: Option<(f64, f64)>,
    tolerance: f64,
}

impl DismissGuard {
    pub fn new(tolerance: f64) -> Self {
        Self {
            anchor: None,
            tolerance: tolerance.max(0.0),
        }
    }

    /// `true` when this input should close the saver.
    ///
    /// Presses close it, releases don't: a key still held when the saver
    /// starts would otherwise close it right away.
    pub fn dismisses(&mut self, input: UserInput) -> bool {
        match input {
            UserInput::Close | UserInput::Wheel => true,
            UserInput::Key(state) | UserInput::Button(state) => state.is_pressed(),
            UserInput::CursorMoved { x, y } => self.cursor_moved(x, y),
        }
    }

    /// `true` when this position should close the saver.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> bool {
        match self.anchor {
            None => {
                self.anchor = Some((x, y));
                false
            }
            Some((ax, ay)) => (x - ax).abs() > self.tolerance || (y - ay).abs() > self.tolerance,
        }
    }

    /// Forget the anchor, e.g. after the window was recreated.
    pub fn reset(&mut self) {
        self.anchor = None;
    }
}

impl Default for DismissGuard {
    fn default() -> Self {
        Self::new(2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::{DeviceId, MouseButton, MouseScrollDelta, TouchPhase};

    fn device() -> DeviceId {
        // SAFETY: only compared against other ids, never handed to winit
        unsafe { DeviceId::dummy() }
    }

    #[test]
    fn first_report_only_anchors() {
        let mut guard = DismissGuard::default();
        assert!(!guard.cursor_moved(500.0, 400.0));
        assert!(!guard.cursor_moved(501.0, 399.0));
        assert!(guard.cursor_moved(510.0, 400.0));
    }

    #[test]
    fn reset_drops_the_anchor() {
        let mut guard = DismissGuard::new(0.0);
        assert!(!guard.cursor_moved(0.0, 0.0));
        guard.reset();
        assert!(!guard.cursor_moved(100.0, 100.0));
        assert!(guard.cursor_moved(100.0, 100.5));
    }

    #[test]
    fn presses_dismiss_and_releases_do_not() {
        let mut guard = DismissGuard::default();
        assert!(guard.dismisses(UserInput::Close));
        assert!(guard.dismisses(UserInput::Wheel));
        assert!(guard.dismisses(UserInput::Key(ElementState::Pressed)));
        assert!(!guard.dismisses(UserInput::Key(ElementState::Released)));
        assert!(guard.dismisses(UserInput::Button(ElementState::Pressed)));
        assert!(!guard.dismisses(UserInput::Button(ElementState::Released)));
    }

    #[test]
    fn cursor_input_goes_through_the_anchor() {
        let mut guard = DismissGuard::default();
        assert!(!guard.dismisses(UserInput::CursorMoved { x: 10.0, y: 10.0 }));
        assert!(!guard.dismisses(UserInput::CursorMoved { x: 12.0, y: 8.0 }));
        assert!(guard.dismisses(UserInput::CursorMoved { x: 10.0, y: 13.0 }));
    }

    #[test]
    fn window_events_map_to_inputs() {
        assert_eq!(
            UserInput::from_window_event(&WindowEvent::CloseRequested),
            Some(UserInput::Close)
        );
        assert_eq!(
            UserInput::from_window_event(&WindowEvent::MouseInput {
                device_id: device(),
                state: ElementState::Released,
                button: MouseButton::Left,
            }),
            Some(UserInput::Button(ElementState::Released))
        );
        assert_eq!(
            UserInput::from_window_event(&WindowEvent::MouseWheel {
                device_id: device(),
                delta: MouseScrollDelta::LineDelta(0.0, -1.0),
                phase: TouchPhase::Moved,
            }),
            Some(UserInput::Wheel)
        );
        assert_eq!(
            UserInput::from_window_event(&WindowEvent::CursorMoved {
                device_id: device(),
                position: PhysicalPosition::new(3.0, 4.0),
            }),
            Some(UserInput::CursorMoved { x: 3.0, y: 4.0 })
        );
        assert_eq!(UserInput::from_window_event(&WindowEvent::RedrawRequested), None);
        assert_eq!(UserInput::from_window_event(&WindowEvent::Focused(true)), None);
    }
}
