/// A three-component vector, as used by the linear and angular parts of a
/// velocity command.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A velocity command emitted once per publish tick.
///
/// Only `linear.x` (forward speed) and `angular.z` (rotation speed) are ever
/// non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityCommand {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl VelocityCommand {
    pub fn new(linear: f64, angular: f64) -> Self {
        Self {
            linear: Vector3 {
                x: linear,
                ..Vector3::default()
            },
            angular: Vector3 {
                z: angular,
                ..Vector3::default()
            },
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.linear.x == 0.0 && self.angular.z == 0.0
    }
}
