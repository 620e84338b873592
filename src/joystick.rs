use watch::{WatchReceiver, WatchSender};

/// Pixel deflection at which a virtual joystick is considered fully deflected.
pub const DEFAULT_JOYSTICK_RADIUS: f64 = 100.0;

/// Which part of the velocity command a joystick drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickAxis {
    /// Vertical deflection drives forward speed; straight up (90°) is full
    /// forward.
    Linear,
    /// Horizontal deflection drives rotation; straight right (0°) is full
    /// positive rotation.
    Angular,
}

/// An input event reported by a virtual joystick widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JoystickEvent {
    /// The stick was dragged. `angle` is in radians, `distance` in pixels from
    /// the widget center.
    Move { angle: f64, distance: f64 },
    /// The stick was let go and snapped back to center.
    Release,
}

/// Normalize a raw pixel distance into `0.0..=1.0`.
pub fn normalize_distance(distance: f64, radius: f64) -> f64 {
    (distance / radius).clamp(0.0, 1.0)
}

/// Project a polar deflection onto the given axis and scale it.
pub fn axis_contribution(
    axis: JoystickAxis,
    angle: f64,
    distance: f64,
    radius: f64,
    max_magnitude: f64,
) -> f64 {
    let projection = match axis {
        JoystickAxis::Linear => angle.sin(),
        JoystickAxis::Angular => angle.cos(),
    };

    normalize_distance(distance, radius) * projection * max_magnitude
}

/// One on-screen joystick and the scalar it currently contributes.
///
/// The scalar is published through a watch channel so that a publish tick on
/// another thread always sees the most recently stored value.
pub struct VirtualJoystick {
    axis: JoystickAxis,
    max_magnitude: f64,
    radius: f64,
    value: f64,
    sender: WatchSender<f64>,
}

impl VirtualJoystick {
    /// Create a joystick at rest, along with a receiver for its value.
    pub fn new(axis: JoystickAxis, max_magnitude: f64, radius: f64) -> (Self, WatchReceiver<f64>) {
        let (sender, receiver) = watch::channel(0.0);

        let joystick = Self {
            axis,
            max_magnitude,
            radius,
            value: 0.0,
            sender,
        };

        (joystick, receiver)
    }

    pub fn axis(&self) -> JoystickAxis {
        self.axis
    }

    /// The scalar this joystick currently contributes.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn handle_event(&mut self, event: JoystickEvent) {
        match event {
            // A zero (or nonsensical) reading keeps the previous value.
            JoystickEvent::Move { angle, distance }
                if !(angle.is_finite() && distance.is_finite() && distance > 0.0) => {}
            JoystickEvent::Move { angle, distance } => {
                let value =
                    axis_contribution(self.axis, angle, distance, self.radius, self.max_magnitude);
                self.store(value);
            }
            JoystickEvent::Release => self.store(0.0),
        }
    }

    fn store(&mut self, value: f64) {
        tracing::trace!(axis = ?self.axis, value, "joystick value updated");
        self.value = value;
        self.sender.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn distance_saturates_at_radius() {
        assert_close(normalize_distance(0.0, 100.0), 0.0);
        assert_close(normalize_distance(50.0, 100.0), 0.5);
        assert_close(normalize_distance(100.0, 100.0), 1.0);
        assert_close(normalize_distance(250.0, 100.0), 1.0);
    }

    #[test]
    fn distance_ratio_never_goes_negative() {
        assert_close(normalize_distance(50.0, -1.0), 0.0);
        assert_close(
            axis_contribution(JoystickAxis::Linear, -FRAC_PI_2, 50.0, -1.0, 1.0),
            0.0,
        );
    }

    #[test]
    fn straight_up_is_full_forward() {
        let value = axis_contribution(JoystickAxis::Linear, FRAC_PI_2, 100.0, 100.0, 1.0);
        assert_close(value, 1.0);
    }

    #[test]
    fn half_right_at_double_max_is_one() {
        let value = axis_contribution(JoystickAxis::Angular, 0.0, 50.0, 100.0, 2.0);
        assert_close(value, 1.0);
    }

    #[test]
    fn linear_ignores_horizontal_and_angular_ignores_vertical() {
        assert_close(axis_contribution(JoystickAxis::Linear, 0.0, 100.0, 100.0, 1.0), 0.0);
        assert_close(axis_contribution(JoystickAxis::Angular, FRAC_PI_2, 100.0, 100.0, 1.0), 0.0);
        assert_close(axis_contribution(JoystickAxis::Linear, -FRAC_PI_2, 100.0, 100.0, 1.5), -1.5);
        assert_close(axis_contribution(JoystickAxis::Angular, PI, 100.0, 100.0, 1.5), -1.5);
    }

    #[test]
    fn magnitude_never_exceeds_max() {
        let max = 0.75;

        for step in 0..64 {
            let angle = step as f64 * PI / 16.0 - 2.0 * PI;
            for distance in [1.0, 37.0, 100.0, 101.0, 1_000.0, 1e9] {
                for axis in [JoystickAxis::Linear, JoystickAxis::Angular] {
                    let value = axis_contribution(axis, angle, distance, 100.0, max);
                    assert!(value.abs() <= max + EPSILON, "{axis:?} {angle} {distance}");
                }
            }
        }
    }

    #[test]
    fn move_updates_value_and_receiver() {
        let (mut joystick, mut receiver) =
            VirtualJoystick::new(JoystickAxis::Linear, 1.0, DEFAULT_JOYSTICK_RADIUS);
        assert_eq!(joystick.axis(), JoystickAxis::Linear);

        joystick.handle_event(JoystickEvent::Move {
            angle: FRAC_PI_4,
            distance: 100.0,
        });

        assert_close(joystick.value(), FRAC_PI_4.sin());
        assert_close(receiver.get(), FRAC_PI_4.sin());
    }

    #[test]
    fn release_resets_to_zero() {
        let (mut joystick, mut receiver) =
            VirtualJoystick::new(JoystickAxis::Angular, 3.0, DEFAULT_JOYSTICK_RADIUS);

        joystick.handle_event(JoystickEvent::Move {
            angle: PI,
            distance: 80.0,
        });
        assert_close(joystick.value(), -2.4);

        joystick.handle_event(JoystickEvent::Release);
        assert_eq!(joystick.value(), 0.0);
        assert_eq!(receiver.get(), 0.0);
    }

    #[test]
    fn zero_distance_keeps_previous_value() {
        let (mut joystick, mut receiver) =
            VirtualJoystick::new(JoystickAxis::Linear, 1.0, DEFAULT_JOYSTICK_RADIUS);

        joystick.handle_event(JoystickEvent::Move {
            angle: FRAC_PI_2,
            distance: 60.0,
        });
        joystick.handle_event(JoystickEvent::Move {
            angle: -FRAC_PI_2,
            distance: 0.0,
        });

        assert_close(joystick.value(), 0.6);
        assert_close(receiver.get(), 0.6);
    }

    #[test]
    fn non_finite_distance_is_ignored() {
        let (mut joystick, _receiver) =
            VirtualJoystick::new(JoystickAxis::Linear, 1.0, DEFAULT_JOYSTICK_RADIUS);

        joystick.handle_event(JoystickEvent::Move {
            angle: FRAC_PI_2,
            distance: f64::NAN,
        });
        joystick.handle_event(JoystickEvent::Move {
            angle: FRAC_PI_2,
            distance: f64::INFINITY,
        });

        assert_eq!(joystick.value(), 0.0);
    }

    #[test]
    fn non_finite_angle_is_ignored() {
        let (mut joystick, mut receiver) =
            VirtualJoystick::new(JoystickAxis::Angular, 1.0, DEFAULT_JOYSTICK_RADIUS);
        assert_eq!(joystick.axis(), JoystickAxis::Angular);

        joystick.handle_event(JoystickEvent::Move {
            angle: 0.0,
            distance: 50.0,
        });
        for angle in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            joystick.handle_event(JoystickEvent::Move {
                angle,
                distance: 50.0,
            });
        }

        assert_close(joystick.value(), 0.5);
        assert_close(receiver.get(), 0.5);
    }
}
