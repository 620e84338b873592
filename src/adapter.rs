use crate::{
    command::VelocityCommand,
    joystick::{JoystickAxis, JoystickEvent, VirtualJoystick, DEFAULT_JOYSTICK_RADIUS},
};
use color_eyre::eyre::{ensure, Result};
use std::{
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};
use watch::WatchReceiver;

/// Receives every velocity command produced by a publish tick.
pub type Publisher = Box<dyn FnMut(VelocityCommand) + Send>;

/// Settings fixed at adapter construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    pub max_linear: f64,
    pub max_angular: f64,
    pub publish_interval: Duration,
    pub joystick_radius: f64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            max_linear: 1.0,
            max_angular: 1.0,
            publish_interval: Duration::from_millis(100),
            joystick_radius: DEFAULT_JOYSTICK_RADIUS,
        }
    }
}

impl AdapterConfig {
    pub fn with_max_linear(mut self, max_linear: f64) -> Self {
        self.max_linear = max_linear;
        self
    }

    pub fn with_max_angular(mut self, max_angular: f64) -> Self {
        self.max_angular = max_angular;
        self
    }

    pub fn with_publish_interval(mut self, publish_interval: Duration) -> Self {
        self.publish_interval = publish_interval;
        self
    }

    pub fn with_joystick_radius(mut self, joystick_radius: f64) -> Self {
        self.joystick_radius = joystick_radius;
        self
    }

    /// Check that every published value stays within its configured maximum
    /// and that the timer has a period to wait on.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_linear.is_finite() && self.max_linear >= 0.0,
            "max linear speed must be a finite, non-negative number, got {}",
            self.max_linear
        );
        ensure!(
            self.max_angular.is_finite() && self.max_angular >= 0.0,
            "max angular speed must be a finite, non-negative number, got {}",
            self.max_angular
        );
        ensure!(
            self.joystick_radius.is_finite() && self.joystick_radius > 0.0,
            "joystick radius must be a finite, positive number, got {}",
            self.joystick_radius
        );
        ensure!(
            !self.publish_interval.is_zero(),
            "publish interval must be greater than zero"
        );

        Ok(())
    }
}

/// Samples both joysticks and hands the resulting command to the publisher.
pub struct Ticker {
    linear: WatchReceiver<f64>,
    angular: WatchReceiver<f64>,
    publisher: Option<Publisher>,
}

impl Ticker {
    pub fn new(
        linear: WatchReceiver<f64>,
        angular: WatchReceiver<f64>,
        publisher: Option<Publisher>,
    ) -> Self {
        Self {
            linear,
            angular,
            publisher,
        }
    }

    /// Perform one publish tick, returning the command that was built.
    pub fn tick(&mut self) -> VelocityCommand {
        let command = VelocityCommand::new(self.linear.get(), self.angular.get());

        match self.publisher.as_mut() {
            Some(publish) => publish(command),
            None => tracing::debug!(?command, "no publisher configured, skipping"),
        }

        command
    }

    fn run(mut self, period: Duration, stop: mpsc::Receiver<()>) {
        loop {
            match stop.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {
                    self.tick();
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }
}

struct Timer {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Turns two virtual joysticks into a periodic stream of velocity commands.
///
/// Widget events are fed in through [`JoystickAdapter::handle_event`] (or the
/// joystick accessors) while a background timer publishes a command every
/// `publish_interval` until [`JoystickAdapter::stop`] is called or the adapter
/// is dropped.
pub struct JoystickAdapter {
    config: AdapterConfig,
    linear: VirtualJoystick,
    angular: VirtualJoystick,
    timer: Option<Timer>,
}

impl JoystickAdapter {
    /// Create both joysticks at rest and start the publish timer.
    ///
    /// Fails without starting anything if the configuration is invalid.
    pub fn new(config: AdapterConfig, publisher: Option<Publisher>) -> Result<Self> {
        config.validate()?;

        let (linear, linear_receiver) =
            VirtualJoystick::new(JoystickAxis::Linear, config.max_linear, config.joystick_radius);
        let (angular, angular_receiver) = VirtualJoystick::new(
            JoystickAxis::Angular,
            config.max_angular,
            config.joystick_radius,
        );

        let ticker = Ticker::new(linear_receiver, angular_receiver, publisher);
        let (stop, stop_receiver) = mpsc::channel();
        let period = config.publish_interval;
        let handle = thread::spawn(move || ticker.run(period, stop_receiver));

        tracing::info!(?config, "joystick adapter started");

        Ok(Self {
            config,
            linear,
            angular,
            timer: Some(Timer { stop, handle }),
        })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn linear(&self) -> &VirtualJoystick {
        &self.linear
    }

    pub fn angular(&self) -> &VirtualJoystick {
        &self.angular
    }

    pub fn joystick_mut(&mut self, axis: JoystickAxis) -> &mut VirtualJoystick {
        match axis {
            JoystickAxis::Linear => &mut self.linear,
            JoystickAxis::Angular => &mut self.angular,
        }
    }

    pub fn handle_event(&mut self, axis: JoystickAxis, event: JoystickEvent) {
        self.joystick_mut(axis).handle_event(event);
    }

    /// The command the next tick would publish if nothing changes before it.
    pub fn current_command(&self) -> VelocityCommand {
        VelocityCommand::new(self.linear.value(), self.angular.value())
    }

    /// Whether the publish timer is still ticking. This turns false after
    /// [`JoystickAdapter::stop`] or if the publisher panicked.
    pub fn is_running(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|timer| !timer.handle.is_finished())
    }

    /// Stop the publish timer. Once this returns the publisher will not be
    /// called again. Calling it more than once has no effect.
    pub fn stop(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };

        // The thread may already be gone if the publisher panicked.
        let _ = timer.stop.send(());

        if timer.handle.join().is_err() {
            tracing::warn!("publish timer exited with a panic");
        }

        tracing::info!("joystick adapter stopped");
    }
}

impl Drop for JoystickAdapter {
    fn drop(&mut self) {
        self.stop();
    }
}
