use clap::Parser;
use color_eyre::eyre::Result;
use joystick_cmd_vel::{controller::ControllerMonitor, AdapterConfig, JoystickAdapter, Publisher};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The name of the controller to use
    #[arg(long)]
    controller: String,

    /// Forward speed at full deflection of the linear joystick
    #[arg(long, default_value_t = 1.0, value_parser = parse_non_negative)]
    max_linear: f64,

    /// Rotation speed at full deflection of the angular joystick
    #[arg(long, default_value_t = 1.0, value_parser = parse_non_negative)]
    max_angular: f64,

    /// Milliseconds between published velocity commands
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    publish_interval: u64,

    /// Joystick deflection, in pixels, that counts as fully deflected
    #[arg(long, default_value_t = 100.0, value_parser = parse_positive)]
    joystick_radius: f64,

    /// Stick magnitude below which a joystick counts as released
    #[arg(long, default_value_t = 0.1)]
    deadzone: f64,
}

fn parse_non_negative(value: &str) -> Result<f64, String> {
    let value: f64 = value.parse().map_err(|e| format!("{e}"))?;

    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a finite, non-negative number"))
    }
}

fn parse_positive(value: &str) -> Result<f64, String> {
    let value: f64 = value.parse().map_err(|e| format!("{e}"))?;

    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a finite, positive number"))
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = AdapterConfig::default()
        .with_max_linear(args.max_linear)
        .with_max_angular(args.max_angular)
        .with_publish_interval(Duration::from_millis(args.publish_interval))
        .with_joystick_radius(args.joystick_radius);

    let publisher: Publisher = Box::new(|command| {
        tracing::info!(
            linear = command.linear.x,
            angular = command.angular.z,
            "velocity command"
        );
    });

    let mut controller_monitor = ControllerMonitor::new(&args.controller, args.deadzone)?;
    controller_monitor.select_gamepad();

    let mut adapter = JoystickAdapter::new(config, Some(publisher))?;

    loop {
        controller_monitor.run(&mut adapter);
    }
}
