use std::time::Duration;

use crate::{
    adapter::JoystickAdapter,
    joystick::{JoystickAxis, JoystickEvent},
};
use color_eyre::eyre::{eyre, Result};
use gilrs::{Axis, EventType, GamepadId, Gilrs};

/// Position of a physical thumbstick, with `y` positive when pushed up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickPosition {
    pub x: f32,
    pub y: f32,
}

impl StickPosition {
    /// Express this position as the polar event an on-screen joystick of the
    /// given radius would report.
    pub fn to_event(self, radius: f64, deadzone: f64) -> JoystickEvent {
        let x = f64::from(self.x);
        let y = f64::from(self.y);
        let magnitude = x.hypot(y);

        if magnitude < deadzone {
            return JoystickEvent::Release;
        }

        JoystickEvent::Move {
            angle: y.atan2(x),
            distance: magnitude.min(1.0) * radius,
        }
    }
}

/// Drives the two virtual joysticks from a game controller: the left stick
/// acts as the linear joystick and the right stick as the angular one.
pub struct ControllerMonitor {
    name_matches: String,
    gilrs: Gilrs,
    selected_gamepad: Option<GamepadId>,
    deadzone: f64,
    left: StickPosition,
    right: StickPosition,
}

impl ControllerMonitor {
    /// Create a new monitor. Only events from the first controller found whose
    /// name contains the given string will be used.
    pub fn new(name_matches: &str, deadzone: f64) -> Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| eyre!("failed to initialize gamepad input: {e}"))?;

        Ok(Self {
            name_matches: name_matches.to_string(),
            gilrs,
            selected_gamepad: None,
            deadzone,
            left: StickPosition::default(),
            right: StickPosition::default(),
        })
    }

    /// Forward controller input to the adapter until no event arrives for a
    /// second.
    pub fn run(&mut self, adapter: &mut JoystickAdapter) {
        let radius = adapter.config().joystick_radius;

        while let Some(event) = self.gilrs.next_event_blocking(Some(Duration::from_secs(1))) {
            // Re-select a gamepad whenever one is connected or disconnected.
            if let EventType::Connected | EventType::Disconnected = event.event {
                self.select_gamepad();
                self.left = StickPosition::default();
                self.right = StickPosition::default();
                adapter.handle_event(JoystickAxis::Linear, JoystickEvent::Release);
                adapter.handle_event(JoystickAxis::Angular, JoystickEvent::Release);
                continue;
            }

            if self.selected_gamepad != Some(event.id) {
                continue;
            }

            let (axis, stick) = match event.event {
                EventType::AxisChanged(Axis::LeftStickX, value, ..) => {
                    self.left.x = value;
                    (JoystickAxis::Linear, self.left)
                }
                EventType::AxisChanged(Axis::LeftStickY, value, ..) => {
                    self.left.y = value;
                    (JoystickAxis::Linear, self.left)
                }
                EventType::AxisChanged(Axis::RightStickX, value, ..) => {
                    self.right.x = value;
                    (JoystickAxis::Angular, self.right)
                }
                EventType::AxisChanged(Axis::RightStickY, value, ..) => {
                    self.right.y = value;
                    (JoystickAxis::Angular, self.right)
                }
                _ => continue,
            };

            adapter.handle_event(axis, stick.to_event(radius, self.deadzone));
        }
    }

    pub fn select_gamepad(&mut self) {
        tracing::info!("discovering game controllers");
        let mut selected = None;

        for (id, gamepad) in self.gilrs.gamepads() {
            tracing::info!(name = gamepad.name(), "found game controller");

            if selected.is_none() && gamepad.name().contains(&self.name_matches) {
                selected = Some(id);
            }
        }

        if selected.is_none() {
            tracing::warn!(name_matches = %self.name_matches, "no matching game controller");
        }

        self.selected_gamepad = selected;
    }
}
