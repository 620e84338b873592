//! Turns two virtual joysticks into a periodic stream of velocity commands.
//!
//! One joystick drives forward speed from its vertical deflection, the other
//! drives rotation from its horizontal deflection. A [`JoystickAdapter`]
//! owns both and hands a [`VelocityCommand`] to a publisher callback on a
//! fixed interval.

pub mod adapter;
pub mod command;
pub mod controller;
pub mod joystick;

pub use adapter::{AdapterConfig, JoystickAdapter, Publisher, Ticker};
pub use command::{Vector3, VelocityCommand};
pub use joystick::{JoystickAxis, JoystickEvent, VirtualJoystick};
